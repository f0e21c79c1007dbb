//! HTML rendering of the weekly analytics report
//!
//! Produces a self-contained A4 document plus the header/footer templates
//! the PDF renderer overlays on every page. Pure string assembly; the
//! rendering service is the only consumer.

use std::fmt::Write;

use crate::feedback::percentage;
use crate::report::charts::{bar_chart_svg, line_chart_svg};
use crate::report::model::ReportModel;

const STYLES: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Inter', 'Segoe UI', sans-serif; background: white; color: #1e293b; -webkit-print-color-adjust: exact; }
.page { width: 210mm; min-height: 297mm; padding: 30mm 15mm 25mm 15mm; background: white; page-break-inside: avoid; }
@page { size: A4; margin: 0; }
.row { display: flex; gap: 10px; margin-bottom: 12px; }
.col { flex: 1; }
.kpi { border: 1px solid #e2e8f0; border-radius: 8px; padding: 14px; text-align: center; }
.kpi-value { font-size: 24px; font-weight: 800; }
.kpi-label { font-size: 10px; color: #64748b; font-weight: 500; }
.card { border: 1px solid #e2e8f0; border-radius: 8px; padding: 15px; height: 100%; }
.card-title { font-size: 12px; font-weight: 700; margin-bottom: 8px; }
.chart { width: 100%; }
.questions-table { width: 100%; border-collapse: collapse; font-size: 10px; }
.questions-table td { padding: 4px; text-align: left; border-bottom: 1px solid #e2e8f0; }
.rating-stars { color: #fbbf24; }
.theme-list { list-style: none; display: flex; flex-wrap: wrap; gap: 4px; margin-bottom: 8px; }
.theme-tag { background: #eff6ff; color: #1d4ed8; padding: 2px 8px; border-radius: 12px; font-size: 10px; }
.theme-tag.negative { background: #fef2f2; color: #dc2626; }
.quote { font-style: italic; color: #64748b; margin-bottom: 4px; padding: 6px; background: #f8fafc; border-radius: 4px; border-left: 2px solid #3b82f6; font-size: 10px; }
.split { display: flex; justify-content: space-between; font-size: 11px; margin-bottom: 6px; }
.channel-bar { height: 10px; border-radius: 5px; background: #e2e8f0; overflow: hidden; margin: 4px 0 10px 0; }
.channel-fill { height: 100%; background: #3b82f6; }
.nps-badge { display: inline-block; background: #3b82f6; color: white; font-weight: 600; font-size: 11px; padding: 4px 10px; border-radius: 4px; }
.disclaimer { background: #fef3c7; border: 1px solid #f59e0b; border-radius: 6px; padding: 8px; font-size: 9px; color: #92400e; }
"#;

/// Escape text destined for HTML element content or attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Star glyph rendering with half-star handling, e.g. `★★★½☆ 3.4`.
fn star_rating_html(rating: f64) -> String {
    let full = rating.floor() as usize;
    let half = rating - full as f64 >= 0.5;
    let empty = 5usize.saturating_sub(full + usize::from(half));

    format!(
        "<span class=\"rating-stars\">{}{}{}</span> {}",
        "★".repeat(full.min(5)),
        if half { "½" } else { "" },
        "☆".repeat(empty),
        rating
    )
}

fn theme_tags(themes: &[String], negative: bool) -> String {
    let class = if negative {
        "theme-tag negative"
    } else {
        "theme-tag"
    };
    themes
        .iter()
        .map(|theme| format!("<span class=\"{}\">{}</span>", class, escape(theme)))
        .collect()
}

fn kpi(value: &str, label: &str) -> String {
    format!(
        "<div class=\"col\"><div class=\"kpi\"><div class=\"kpi-value\">{}</div><div class=\"kpi-label\">{}</div></div></div>",
        value, label
    )
}

/// Render the full report document.
pub fn render_document(model: &ReportModel) -> String {
    let total = model.total_reviews;
    let company = escape(&model.company_name);

    let mut quotes = String::new();
    if model.notable_quotes.is_empty() {
        quotes.push_str("<div class=\"quote\">No notable quotes this period</div>");
    } else {
        for quote in &model.notable_quotes {
            let _ = write!(quotes, "<div class=\"quote\">\"{}\"</div>", escape(quote));
        }
    }

    let mut question_rows = String::new();
    for entry in &model.top_questions {
        let _ = write!(
            question_rows,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(&entry.question),
            star_rating_html(entry.average)
        );
    }

    let sentiment_chart = line_chart_svg(&model.sentiment_trend, "#10b981");
    let star_chart = bar_chart_svg(
        &model.star_ratings.values,
        &["5 ★", "4 ★", "3 ★", "2 ★", "1 ★"],
        &["#10b981", "#84cc16", "#f59e0b", "#f97316", "#ef4444"],
    );
    let nps_chart = line_chart_svg(&model.nps_trend, "#8b5cf6");

    let recommendation = if model.recommendation.is_empty() {
        "No recommendations extracted this period".to_string()
    } else {
        escape(&model.recommendation)
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{company} Weekly Analytics Report - InstaReview.ai</title>
<style>{STYLES}</style>
</head>
<body>
<div class="page">
  <div class="row">
    {kpi_total}{kpi_positive}{kpi_neutral}{kpi_negative}
  </div>
  <div class="row">
    <div class="col"><div class="card"><div class="card-title">Sentiment Trend (7 Days)</div><div class="chart">{sentiment_chart}</div></div></div>
    <div class="col"><div class="card"><div class="card-title">Star Ratings Distribution</div><div class="chart">{star_chart}</div></div></div>
  </div>
  <div class="row">
    <div class="col"><div class="card">
      <div class="card-title">Top Positive Themes</div>
      <div class="theme-list">{positive_themes}</div>
      <div class="card-title">Areas for Improvement</div>
      <div class="theme-list">{negative_themes}</div>
    </div></div>
    <div class="col"><div class="card">
      <div class="card-title">Notable Customer Quotes</div>
      {quotes}
    </div></div>
  </div>
  <div class="row">
    <div class="col"><div class="card">
      <div class="card-title">Survey Questions Performance</div>
      <table class="questions-table"><tbody>{question_rows}</tbody></table>
    </div></div>
    <div class="col"><div class="card">
      <div class="card-title">Key Recommendations</div>
      <div style="font-size: 11px;">{recommendation}</div>
    </div></div>
  </div>
</div>
<div class="page" style="page-break-before: always;">
  <div class="row">
    <div class="col"><div class="card"><div class="card-title">NPS Trend (4 Weeks)</div><div class="chart">{nps_chart}</div></div></div>
    <div class="col"><div class="card">
      <div class="card-title">Channel Breakdown</div>
      <div class="split"><span>Survey</span><strong>{survey_pct}%</strong></div>
      <div class="channel-bar"><div class="channel-fill" style="width: {survey_pct}%;"></div></div>
      <div class="split"><span>Audio Feedback</span><strong>{audio_pct}%</strong></div>
      <div class="channel-bar"><div class="channel-fill" style="width: {audio_pct}%; background: #10b981;"></div></div>
    </div></div>
  </div>
  <div class="row">
    <div class="col"><div class="card">
      <div class="card-title">Sentiment Breakdown</div>
      <div class="split"><span>Positive</span><strong>{positive_pct}% ({positive_count} reviews)</strong></div>
      <div class="split"><span>Neutral</span><strong>{neutral_pct}% ({neutral_count} reviews)</strong></div>
      <div class="split"><span>Negative</span><strong>{negative_pct}% ({negative_count} reviews)</strong></div>
    </div></div>
    <div class="col"><div class="card">
      <div class="card-title">Feedback Distribution</div>
      <div class="split"><span>Survey Responses</span><strong>{survey_responses}</strong></div>
      <div class="split"><span>Audio Feedback</span><strong>{audio_feedback}</strong></div>
      <div class="split"><span>Total Feedback</span><strong>{total}</strong></div>
      <div class="split"><span>Avg Feedback Duration</span><strong>{avg_duration}</strong></div>
    </div></div>
  </div>
  <div class="row">
    <div class="col"><div class="card">
      <div class="split"><span><strong>Next Steps</strong></span><span class="nps-badge">NPS Score: {nps}</span></div>
      <div style="font-size: 11px; color: #64748b;">Focus on product and service improvements surfaced by this week's feedback</div>
    </div></div>
  </div>
  <div class="row">
    <div class="col"><div class="disclaimer"><strong>Disclaimer:</strong> This analysis is generated by AI based on transcript metadata and automated sentiment analysis. Results should be verified by human review for business-critical decisions.</div></div>
  </div>
</div>
</body>
</html>
"#,
        kpi_total = kpi(&total.to_string(), "Total Reviews"),
        kpi_positive = kpi(
            &format!("{}%", percentage(model.positive_reviews, total)),
            "Positive"
        ),
        kpi_neutral = kpi(
            &format!("{}%", percentage(model.neutral_reviews, total)),
            "Neutral"
        ),
        kpi_negative = kpi(
            &format!("{}%", percentage(model.negative_reviews, total)),
            "Negative"
        ),
        positive_themes = theme_tags(&model.positive_themes, false),
        negative_themes = theme_tags(&model.negative_themes, true),
        survey_pct = model.channels.survey_pct,
        audio_pct = model.channels.audio_pct,
        positive_pct = model.positive_percentage,
        neutral_pct = model.neutral_percentage,
        negative_pct = model.negative_percentage,
        positive_count = model.sentiment_counts.positive,
        neutral_count = model.sentiment_counts.neutral,
        negative_count = model.sentiment_counts.negative,
        survey_responses = model.survey_responses,
        audio_feedback = model.audio_feedback,
        avg_duration = escape(&model.avg_feedback_duration),
        nps = model.nps_score,
    )
}

/// Per-page header overlay for the PDF renderer.
pub fn header_template(model: &ReportModel) -> String {
    format!(
        r#"<div style="width: 100%; font-family: 'Inter', sans-serif; background: #f8fafc; padding: 15px 20mm; box-sizing: border-box; border-bottom: 3px solid #3b82f6;">
  <div style="display: flex; justify-content: space-between; align-items: center;">
    <div>
      <div style="font-size: 14px; font-weight: 700; color: #1e293b;">{company} Weekly Analytics Report</div>
      <div style="font-size: 9px; color: #64748b;">{city} | {industry} Industry</div>
      <div style="font-size: 9px; color: #64748b;">Powered by InstaReview.ai</div>
    </div>
    <div style="text-align: right;">
      <div style="font-size: 11px; font-weight: 600; color: #3b82f6;">Week of {week_start} &ndash; {week_end}</div>
      <div style="font-size: 9px; color: #64748b;">Generated on {generated}</div>
    </div>
  </div>
</div>"#,
        company = escape(&model.company_name),
        city = escape(&model.company_city),
        industry = escape(&model.company_industry),
        week_start = model.period.start.format("%b %d"),
        week_end = model.period.end.format("%b %d, %Y"),
        generated = model.generated_at.format("%B %d, %Y"),
    )
}

/// Per-page footer overlay with page-number placeholders.
pub fn footer_template(model: &ReportModel) -> String {
    format!(
        r#"<div style="width: 100%; font-family: 'Inter', sans-serif; background: #1e293b; color: white; padding: 12px 20mm; box-sizing: border-box; border-top: 3px solid #3b82f6;">
  <div style="display: flex; justify-content: space-between; align-items: center;">
    <div style="font-size: 10px; font-weight: 500;">{company} | Weekly Analytics Report</div>
    <div style="display: flex; align-items: center; gap: 12px;">
      <div style="font-size: 9px; color: #94a3b8;">InstaReview.ai Analytics</div>
      <div style="font-size: 10px; font-weight: 600;">Page <span class="pageNumber"></span> of <span class="totalPages"></span></div>
    </div>
  </div>
</div>"#,
        company = escape(&model.company_name),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{
        AggregatedMetrics, AudioMetrics, OverallStats, QuestionAverage, SentimentDistribution,
        SurveyMetrics,
    };
    use crate::report::model::build_model;
    use crate::report::period::ReportPeriod;
    use chrono::{Local, NaiveDate};

    fn sample_model() -> ReportModel {
        let metrics = AggregatedMetrics {
            survey: SurveyMetrics {
                total_responses: 2,
                question_averages: vec![QuestionAverage {
                    question: "How was the <service>?".into(),
                    average: 3.5,
                }],
            },
            audio: AudioMetrics {
                total_feedback: 2,
                sentiment_distribution: SentimentDistribution {
                    positive: 1,
                    neutral: 0,
                    negative: 1,
                },
                positive_themes: vec!["great service".into()],
                negative_themes: vec!["too slow".into()],
                recommendations: vec!["shorter queues".into()],
                sample_quotes: vec!["Customer mentioned: great service".into()],
                average_duration_secs: 108.0,
            },
            overall: OverallStats {
                total_feedback: 4,
                positive_percentage: 50,
                neutral_percentage: 0,
                negative_percentage: 50,
            },
        };
        let period = ReportPeriod {
            start: NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(),
        };
        build_model(&metrics, None, Some("Acme & Sons"), period, Local::now())
    }

    #[test]
    fn document_contains_key_sections() {
        let html = render_document(&sample_model());

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("Total Reviews"));
        assert!(html.contains("Customer mentioned: great service"));
        assert!(html.contains("Sentiment Trend (7 Days)"));
        assert!(html.contains("<svg"));
        assert!(html.contains("Disclaimer"));
    }

    #[test]
    fn company_names_are_html_escaped() {
        let html = render_document(&sample_model());
        assert!(html.contains("Acme &amp; Sons"));
        assert!(html.contains("How was the &lt;service&gt;?"));
        assert!(!html.contains("Acme & Sons Weekly"));
    }

    #[test]
    fn footer_keeps_page_number_placeholders() {
        let footer = footer_template(&sample_model());
        assert!(footer.contains("pageNumber"));
        assert!(footer.contains("totalPages"));
    }

    #[test]
    fn header_shows_period_bounds() {
        let header = header_template(&sample_model());
        assert!(header.contains("Sep 08"));
        assert!(header.contains("Sep 14, 2025"));
    }

    #[test]
    fn star_glyphs_handle_half_stars() {
        assert_eq!(
            star_rating_html(3.5),
            "<span class=\"rating-stars\">★★★½☆</span> 3.5"
        );
        assert_eq!(
            star_rating_html(5.0),
            "<span class=\"rating-stars\">★★★★★</span> 5"
        );
    }
}
