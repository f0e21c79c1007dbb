//! Customer feedback API client

use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::Settings;
use crate::feedback::RawFeedbackRecord;

pub struct ReviewsClient {
    http: Client,
    base_url: String,
}

impl ReviewsClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.api.reviews_url.trim().trim_end_matches('?').to_string();
        if base_url.is_empty() {
            anyhow::bail!("Reviews API URL is missing. Set api.reviews_url in config.");
        }

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(settings.api.timeout_secs))
                .build()
                .context("Failed to build reviews HTTP client")?,
            base_url,
        })
    }

    /// Fetch all raw feedback records for one company.
    pub async fn fetch_feedback(&self, company_id: &str) -> Result<Vec<RawFeedbackRecord>> {
        let url = format!(
            "{}?companyId={}",
            self.base_url,
            urlencoding::encode(company_id)
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Reviews API request failed")?
            .error_for_status()
            .context("Reviews API returned an error status")?;

        let records: Vec<RawFeedbackRecord> = response
            .json()
            .await
            .context("Failed to parse reviews API response")?;

        tracing::info!(
            company_id = %company_id,
            records = records.len(),
            "fetched customer feedback"
        );

        Ok(records)
    }
}
