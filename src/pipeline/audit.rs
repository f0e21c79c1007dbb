//! Timestamped audit snapshots of pipeline intermediates
//!
//! Raw API responses and derived aggregates are written as JSON for
//! debugging and audit. Write-only: nothing in the pipeline reads them back.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

pub struct AuditLog {
    dir: PathBuf,
    stamp: String,
}

impl AuditLog {
    pub fn new(dir: PathBuf, started_at: DateTime<Local>) -> Self {
        Self {
            dir,
            stamp: started_at.format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// Timestamp shared by every snapshot of one run.
    pub fn stamp(&self) -> &str {
        &self.stamp
    }

    /// Write one snapshot as `<name>_<stamp>.json` under the audit directory.
    pub fn write_snapshot<T: Serialize>(&self, name: &str, payload: &T) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create audit dir: {}", self.dir.display()))?;

        let path = self.dir.join(format!("{}_{}.json", name, self.stamp));
        let json = serde_json::to_string_pretty(payload).context("Failed to encode snapshot")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "wrote audit snapshot");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshots_share_the_run_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let started = Local.with_ymd_and_hms(2025, 9, 8, 10, 30, 0).unwrap();
        let audit = AuditLog::new(tmp.path().to_path_buf(), started);

        let first = audit
            .write_snapshot("api_response", &serde_json::json!([{"id": 1}]))
            .unwrap();
        let second = audit
            .write_snapshot("analytics_summary", &serde_json::json!({"total": 1}))
            .unwrap();

        assert_eq!(
            first.file_name().unwrap().to_string_lossy(),
            "api_response_20250908_103000.json"
        );
        assert_eq!(
            second.file_name().unwrap().to_string_lossy(),
            "analytics_summary_20250908_103000.json"
        );

        let content = std::fs::read_to_string(first).unwrap();
        assert!(content.contains("\"id\": 1"));
    }
}
