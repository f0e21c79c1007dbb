//! Company profile and directory client

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// Company display attributes. Missing fields fall back to the report
/// model's "Unknown" placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(rename = "companyName", default)]
    pub name: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub industry: Option<String>,

    /// Report recipient address
    #[serde(default)]
    pub email: Option<String>,
}

/// One entry of the company directory listing used by batch mode.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyDirectoryEntry {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "companyName", default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(rename = "dateUpdated", default)]
    pub date_updated: Option<String>,
}

pub struct CompanyClient {
    http: Client,
    details_url: String,
    companies_url: String,
    api_key: String,
}

impl CompanyClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let details_url = settings.api.company_details_url.trim().to_string();
        if details_url.is_empty() {
            anyhow::bail!("Company details URL is missing. Set api.company_details_url in config.");
        }

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(settings.api.timeout_secs))
                .build()
                .context("Failed to build company HTTP client")?,
            details_url,
            companies_url: settings.api.companies_url.trim().to_string(),
            api_key: settings.api.api_key.trim().to_string(),
        })
    }

    /// Look up one company profile. Returns `None` when the company is
    /// unknown upstream; callers treat errors the same way after logging.
    pub async fn fetch_profile(&self, company_id: &str) -> Result<Option<CompanyProfile>> {
        let url = format!(
            "{}?companyId={}",
            self.details_url,
            urlencoding::encode(company_id)
        );

        let mut request = self.http.get(&url);
        if !self.api_key.is_empty() {
            request = request.header("x-api-key", &self.api_key);
        }

        let response = request
            .send()
            .await
            .context("Company details request failed")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .context("Company details API returned an error status")?;

        let profile: CompanyProfile = response
            .json()
            .await
            .context("Failed to parse company details response")?;

        Ok(Some(profile))
    }

    /// List all companies for batch processing, most recently updated first.
    pub async fn list_companies(&self) -> Result<Vec<CompanyDirectoryEntry>> {
        if self.companies_url.is_empty() {
            anyhow::bail!("Company directory URL is missing. Set api.companies_url in config.");
        }

        let mut request = self.http.get(&self.companies_url);
        if !self.api_key.is_empty() {
            request = request.header("x-api-key", &self.api_key);
        }

        let response = request
            .send()
            .await
            .context("Company directory request failed")?
            .error_for_status()
            .context("Company directory API returned an error status")?;

        let mut companies: Vec<CompanyDirectoryEntry> = response
            .json()
            .await
            .context("Failed to parse company directory response")?;

        companies.sort_by(|a, b| b.date_updated.cmp(&a.date_updated));

        tracing::info!(companies = companies.len(), "fetched company directory");

        Ok(companies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_tolerates_missing_fields() {
        let profile: CompanyProfile =
            serde_json::from_str(r#"{"companyName": "Acme Foods"}"#).unwrap();

        assert_eq!(profile.name.as_deref(), Some("Acme Foods"));
        assert!(profile.city.is_none());
        assert!(profile.email.is_none());
    }

    #[test]
    fn directory_sort_is_most_recent_first() {
        let mut entries: Vec<CompanyDirectoryEntry> = serde_json::from_str(
            r#"[
                {"id": "a", "dateUpdated": "2025-01-01"},
                {"id": "b", "dateUpdated": "2025-06-01"},
                {"id": "c"}
            ]"#,
        )
        .unwrap();

        entries.sort_by(|a, b| b.date_updated.cmp(&a.date_updated));

        assert_eq!(entries[0].id.as_deref(), Some("b"));
        assert_eq!(entries[1].id.as_deref(), Some("a"));
        assert_eq!(entries[2].id.as_deref(), Some("c"));
    }
}
