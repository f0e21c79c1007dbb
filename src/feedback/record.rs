//! Wire and normalized feedback record types

use serde::{Deserialize, Deserializer, Serialize};

/// One raw feedback record as returned by the reviews API.
///
/// Everything except the identifier is optional on the wire; a record is
/// only rejected wholesale when it carries neither survey answers nor usable
/// audio metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFeedbackRecord {
    #[serde(default)]
    pub id: Option<RecordId>,

    #[serde(rename = "companyId", default)]
    pub company_id: Option<String>,

    #[serde(rename = "userEmail", default)]
    pub user_email: Option<String>,

    /// Survey answers. The upstream field name is historical.
    #[serde(rename = "quess", default)]
    pub survey_answers: Option<Vec<SurveyAnswer>>,

    /// Audio-derived metadata: either a JSON-encoded string or an object.
    #[serde(rename = "metaData", default)]
    pub metadata: Option<RawMetadata>,
}

/// Record identifiers arrive as strings or as raw numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// The `metaData` field before the ingestion boundary has parsed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMetadata {
    /// JSON document shipped inside a string
    Text(String),
    /// Already-structured object
    Object(serde_json::Map<String, serde_json::Value>),
}

/// A single survey answer within a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyAnswer {
    pub question: String,

    #[serde(deserialize_with = "lenient_f64")]
    pub answer: f64,

    #[serde(rename = "questionId")]
    pub question_id: String,
}

/// Audio feedback extracted from record metadata.
///
/// Every field except `transcript` is required; a metadata blob missing any
/// of them does not qualify as an audio contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFeedback {
    pub audio_id: String,

    pub detected_language: String,

    #[serde(deserialize_with = "lenient_f64")]
    pub audio_duration_sec: f64,

    #[serde(default)]
    pub transcript: Option<String>,

    pub feedback_analysis: FeedbackAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalysis {
    pub overall_sentiment: Sentiment,

    pub tone_primary: String,

    pub positive_indicators: Vec<String>,

    pub negative_indicators: Vec<String>,

    #[serde(deserialize_with = "lenient_bool")]
    pub complaints_detected: bool,

    pub recommendations: Vec<String>,

    pub retention_risk: String,
}

/// The three sentiment buckets.
///
/// Any other wire value fails deserialization, which disqualifies the
/// record's audio contribution the same way a missing field does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }
}

/// A feedback record after the ingestion boundary.
///
/// Survey answers and audio feedback are independent: a record may carry
/// both, either, or (upstream of normalization) neither.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedRecord {
    pub record_id: String,
    pub company_id: Option<String>,
    pub user_email: Option<String>,
    pub answers: Vec<SurveyAnswer>,
    pub audio: Option<AudioFeedback>,
}

/// Accept numbers that upstream producers ship as strings.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// Accept booleans that upstream producers ship as "true"/"false" strings.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrText {
        Flag(bool),
        Text(String),
    }

    match BoolOrText::deserialize(deserializer)? {
        BoolOrText::Flag(b) => Ok(b),
        BoolOrText::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean value: {}",
                other
            ))),
        },
    }
}
