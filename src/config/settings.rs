//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Upstream feedback and company APIs
    #[serde(default)]
    pub api: ApiSettings,

    /// Headless-browser rendering service
    #[serde(default)]
    pub render: RenderSettings,

    /// Object storage for generated reports
    #[serde(default)]
    pub storage: StorageSettings,

    /// SMTP delivery of report links
    #[serde(default)]
    pub email: EmailSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for audit snapshots and generated reports
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Customer feedback endpoint; queried as `?companyId=<id>`
    #[serde(default)]
    pub reviews_url: String,

    /// Company profile lookup endpoint; queried as `?companyId=<id>`
    #[serde(default)]
    pub company_details_url: String,

    /// Company directory listing endpoint used by batch mode
    #[serde(default)]
    pub companies_url: String,

    /// API key sent as `x-api-key` to the company endpoints
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    /// PDF rendering service endpoint (accepts HTML, returns PDF bytes)
    #[serde(default)]
    pub endpoint: String,

    /// Render timeout in seconds; PDF rasterization is slow
    #[serde(default = "default_render_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Bucket endpoint URL, e.g. `https://<bucket>.s3.<region>.amazonaws.com`
    #[serde(default)]
    pub endpoint: String,

    /// Signing region
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub access_key_id: String,

    #[serde(default)]
    pub secret_access_key: String,

    /// Key prefix for uploaded reports
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Signed download link lifetime in seconds (default 7 days)
    #[serde(default = "default_link_expiry")]
    pub link_expiry_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub smtp_host: String,

    /// SMTPS port (implicit TLS)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Customer dashboard link embedded in the email body
    #[serde(default = "default_portal_url")]
    pub portal_url: String,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("ai", "instareview", "instareport")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/instareport"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_api_timeout() -> u64 {
    30
}

fn default_render_timeout() -> u64 {
    120
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_key_prefix() -> String {
    "instareview-reports".to_string()
}

fn default_link_expiry() -> u64 {
    604_800
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from_address() -> String {
    "reports@instareview.ai".to_string()
}

fn default_portal_url() -> String {
    "https://app.instareview.ai/".to_string()
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            reviews_url: String::new(),
            company_details_url: String::new(),
            companies_url: String::new(),
            api_key: String::new(),
            timeout_secs: default_api_timeout(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            timeout_secs: default_render_timeout(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            key_prefix: default_key_prefix(),
            link_expiry_secs: default_link_expiry(),
        }
    }
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: default_from_address(),
            portal_url: default_portal_url(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            api: ApiSettings::default(),
            render: RenderSettings::default(),
            storage: StorageSettings::default(),
            email: EmailSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides for secrets.
    fn apply_env_overrides(&mut self) {
        if self.api.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("INSTAREPORT_API_KEY") {
                if !key.trim().is_empty() {
                    self.api.api_key = key;
                }
            }
        }
        if self.storage.secret_access_key.trim().is_empty() {
            if let Ok(key) = std::env::var("INSTAREPORT_STORAGE_SECRET_KEY") {
                if !key.trim().is_empty() {
                    self.storage.secret_access_key = key;
                }
            }
        }
        if self.email.password.trim().is_empty() {
            if let Ok(pass) = std::env::var("INSTAREPORT_SMTP_PASSWORD") {
                if !pass.trim().is_empty() {
                    self.email.password = pass;
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("ai", "instareview", "instareport")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory for timestamped audit snapshots
    pub fn snapshots_dir(&self) -> PathBuf {
        self.general.data_dir.join("data")
    }

    /// Directory for locally generated PDF reports
    pub fn reports_dir(&self) -> PathBuf {
        self.general.data_dir.join("reports")
    }

    /// Directory for reports served by the HTTP API
    pub fn api_reports_dir(&self) -> PathBuf {
        self.general.data_dir.join("api_reports")
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.data_dir)?;
        std::fs::create_dir_all(self.snapshots_dir())?;
        std::fs::create_dir_all(self.reports_dir())?;
        std::fs::create_dir_all(self.api_reports_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_links_default_to_seven_days() {
        let settings = Settings::default();
        assert_eq!(settings.storage.link_expiry_secs, 7 * 24 * 60 * 60);
    }

    #[test]
    fn report_key_prefix_matches_bucket_layout() {
        let settings = Settings::default();
        assert_eq!(settings.storage.key_prefix, "instareview-reports");
    }
}
