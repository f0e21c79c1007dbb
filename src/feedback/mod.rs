//! Feedback intake and aggregation
//!
//! Raw records from the reviews API are normalized once at the ingestion
//! boundary; everything downstream operates on the typed form only.

mod metrics;
mod normalize;
mod record;

pub use metrics::{
    aggregate, percentage, round1, AggregatedMetrics, AudioMetrics, OverallStats, QuestionAverage,
    SentimentDistribution, SurveyMetrics,
};
pub use normalize::{normalize_record, normalize_records};
pub use record::{
    AudioFeedback, FeedbackAnalysis, NormalizedRecord, RawFeedbackRecord, RawMetadata, RecordId,
    Sentiment, SurveyAnswer,
};
