//! Record normalization at the ingestion boundary
//!
//! Malformed metadata is never fatal: it only removes the record's audio
//! contribution. Survey answers survive independently.

use tracing::{debug, warn};

use crate::feedback::record::{
    AudioFeedback, NormalizedRecord, RawFeedbackRecord, RawMetadata,
};

/// Normalize a batch of raw records, dropping those that carry no signal.
pub fn normalize_records(raw: &[RawFeedbackRecord]) -> Vec<NormalizedRecord> {
    raw.iter().filter_map(normalize_record).collect()
}

/// Normalize one raw record.
///
/// Returns `None` when the record has neither survey answers nor usable
/// audio metadata. Never fails on malformed input.
pub fn normalize_record(raw: &RawFeedbackRecord) -> Option<NormalizedRecord> {
    let record_id = raw
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let answers = raw.survey_answers.clone().unwrap_or_default();
    let audio = raw
        .metadata
        .as_ref()
        .and_then(|meta| extract_audio(meta, &record_id));

    if answers.is_empty() && audio.is_none() {
        debug!(record_id = %record_id, "record carries no signal, dropping");
        return None;
    }

    Some(NormalizedRecord {
        record_id,
        company_id: raw.company_id.clone(),
        user_email: raw.user_email.clone(),
        answers,
        audio,
    })
}

/// Parse the string-or-object metadata field into typed audio feedback.
///
/// String metadata that is not valid JSON, and metadata missing any required
/// analysis field (or carrying an unknown sentiment value), both disqualify
/// the audio contribution without touching the rest of the record.
fn extract_audio(meta: &RawMetadata, record_id: &str) -> Option<AudioFeedback> {
    let value = match meta {
        RawMetadata::Object(map) => serde_json::Value::Object(map.clone()),
        RawMetadata::Text(text) => match serde_json::from_str(text) {
            Ok(value) => value,
            Err(err) => {
                debug!(record_id = %record_id, error = %err, "metadata is not valid JSON, treating as absent");
                return None;
            }
        },
    };

    match serde_json::from_value::<AudioFeedback>(value) {
        Ok(audio) => Some(audio),
        Err(err) => {
            warn!(record_id = %record_id, error = %err, "metadata missing required analysis fields, excluding audio contribution");
            None
        }
    }
}
