//! Presentation-ready report model
//!
//! Combines aggregated metrics with the company profile and reporting
//! period. Everything is passed in explicitly; nothing reads ambient state.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::client::CompanyProfile;
use crate::feedback::{percentage, round1, AggregatedMetrics, QuestionAverage};
use crate::report::period::ReportPeriod;

pub const FALLBACK_COMPANY_NAME: &str = "Unknown Company";
pub const FALLBACK_COMPANY_CITY: &str = "Unknown";
pub const FALLBACK_COMPANY_INDUSTRY: &str = "Unknown";

/// The synthetic trend series are single-point values perturbed by fixed
/// offsets; there is no historical data behind them. Real trends need a
/// time-series input, which the upstream APIs do not provide yet.
const SENTIMENT_TREND_OFFSETS: [i64; 7] = [0, 5, -3, 8, 2, 10, 6];
const NPS_TREND_OFFSETS: [i64; 4] = [-2, 1, -1, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelMix {
    pub survey_pct: u32,
    pub audio_pct: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarRatings {
    /// Five buckets, 5★ down to 1★, as percentages
    pub values: [i64; 5],
    /// Mean of the survey question averages, one decimal
    pub average: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportModel {
    pub company_name: String,
    pub company_city: String,
    pub company_industry: String,

    pub period: ReportPeriod,
    pub generated_at: DateTime<Local>,

    pub total_reviews: usize,
    pub positive_reviews: usize,
    pub neutral_reviews: usize,
    pub negative_reviews: usize,

    pub positive_percentage: u32,
    pub neutral_percentage: u32,
    pub negative_percentage: u32,

    pub survey_responses: usize,
    pub audio_feedback: usize,
    pub sentiment_counts: crate::feedback::SentimentDistribution,

    pub avg_feedback_duration: String,
    pub nps_score: i64,

    pub top_questions: Vec<QuestionAverage>,
    pub channels: ChannelMix,

    pub positive_themes: Vec<String>,
    pub negative_themes: Vec<String>,
    pub notable_quotes: Vec<String>,
    pub recommendation: String,

    pub sentiment_trend: TrendSeries,
    pub nps_trend: TrendSeries,
    pub star_ratings: StarRatings,
}

/// Build the report model from aggregated metrics.
///
/// `fallback_company_id` is used as the display name when the profile lookup
/// failed; it is normally the company id carried by the first feedback
/// record.
pub fn build_model(
    metrics: &AggregatedMetrics,
    profile: Option<&CompanyProfile>,
    fallback_company_id: Option<&str>,
    period: ReportPeriod,
    generated_at: DateTime<Local>,
) -> ReportModel {
    let company_name = profile
        .and_then(|p| p.name.clone())
        .or_else(|| fallback_company_id.map(str::to_string))
        .unwrap_or_else(|| FALLBACK_COMPANY_NAME.to_string());
    let company_city = profile
        .and_then(|p| p.city.clone())
        .unwrap_or_else(|| FALLBACK_COMPANY_CITY.to_string());
    let company_industry = profile
        .and_then(|p| p.industry.clone())
        .unwrap_or_else(|| FALLBACK_COMPANY_INDUSTRY.to_string());

    let overall = &metrics.overall;
    let total = overall.total_feedback;

    // Integer truncation: the three buckets need not sum back to the total.
    let positive_reviews = total * overall.positive_percentage as usize / 100;
    let neutral_reviews = total * overall.neutral_percentage as usize / 100;
    let negative_reviews = total * overall.negative_percentage as usize / 100;

    let nps_score = (50 + overall.positive_percentage as i64 - overall.negative_percentage as i64)
        .clamp(10, 100);

    let channels = ChannelMix {
        survey_pct: percentage(metrics.survey.total_responses, total),
        audio_pct: percentage(metrics.audio.total_feedback, total),
    };

    let avg_feedback_duration = if metrics.audio.total_feedback == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1} min", metrics.audio.average_duration_secs / 60.0)
    };

    let recommendation = metrics
        .audio
        .recommendations
        .join(". ")
        .replace("; ", ". ")
        .replace(';', "");

    let base = overall.positive_percentage as i64;
    let sentiment_trend = TrendSeries {
        labels: (1..=7).map(|d| format!("Day {}", d)).collect(),
        values: SENTIMENT_TREND_OFFSETS.iter().map(|o| base + o).collect(),
    };

    let nps_trend = TrendSeries {
        labels: (1..=4).map(|w| format!("Week {}", w)).collect(),
        values: NPS_TREND_OFFSETS.iter().map(|o| nps_score + o).collect(),
    };

    let star_ratings = StarRatings {
        values: star_buckets(
            overall.positive_percentage,
            overall.neutral_percentage,
            overall.negative_percentage,
        ),
        average: question_average_mean(&metrics.survey.question_averages),
    };

    ReportModel {
        company_name,
        company_city,
        company_industry,
        period,
        generated_at,
        total_reviews: total,
        positive_reviews,
        neutral_reviews,
        negative_reviews,
        positive_percentage: overall.positive_percentage,
        neutral_percentage: overall.neutral_percentage,
        negative_percentage: overall.negative_percentage,
        survey_responses: metrics.survey.total_responses,
        audio_feedback: metrics.audio.total_feedback,
        sentiment_counts: metrics.audio.sentiment_distribution,
        avg_feedback_duration,
        nps_score,
        top_questions: metrics.survey.question_averages.clone(),
        channels,
        positive_themes: metrics.audio.positive_themes.clone(),
        negative_themes: metrics.audio.negative_themes.clone(),
        notable_quotes: metrics.audio.sample_quotes.clone(),
        recommendation,
        sentiment_trend,
        nps_trend,
        star_ratings,
    }
}

/// Split the three sentiment percentages into five presentation buckets
/// (5★ .. 1★). A display approximation, not measured ratings.
fn star_buckets(positive: u32, neutral: u32, negative: u32) -> [i64; 5] {
    let (positive, neutral, negative) = (positive as i64, neutral as i64, negative as i64);
    [
        positive,
        (100 - positive - neutral - negative).max(0),
        neutral,
        negative / 2,
        negative - negative / 2,
    ]
}

fn question_average_mean(averages: &[QuestionAverage]) -> f64 {
    if averages.is_empty() {
        return 0.0;
    }
    let sum: f64 = averages.iter().map(|q| q.average).sum();
    round1(sum / averages.len() as f64)
}
