//! Per-company report generation pipeline
//!
//! One `ReportRequest` value carries the company id and period bounds
//! through every stage; there is no ambient per-run state, so concurrent
//! invocations for different companies are safe.

mod audit;

pub use audit::AuditLog;

use std::path::PathBuf;

use chrono::Local;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::client::{CompanyClient, ReviewsClient};
use crate::config::Settings;
use crate::email::Mailer;
use crate::feedback::{aggregate, normalize_records};
use crate::objectstore::{report_key, ObjectStore};
use crate::render::{build_renderer, RenderRequest, Renderer};
use crate::report::{
    build_model, footer_template, header_template, render_document, ReportPeriod,
};
use crate::ReportError;

/// One report-generation request. Built per call and passed explicitly.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub company_id: String,
    /// Explicit reporting period; defaults to the current ISO week
    pub period: Option<ReportPeriod>,
    pub upload: bool,
    pub email: bool,
}

impl ReportRequest {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            period: None,
            upload: true,
            email: true,
        }
    }
}

/// Outcome of one successful report generation.
#[derive(Debug)]
pub struct GeneratedReport {
    /// Correlation id stamped on every log line of the run
    pub run_id: Uuid,
    pub company_id: String,
    pub company_name: String,
    pub total_reviews: usize,
    pub pdf_path: PathBuf,
    pub html: String,
    pub storage_key: Option<String>,
    pub download_url: Option<String>,
    pub emailed_to: Option<String>,
}

/// Counters for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub processed: usize,
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Pipeline {
    settings: Settings,
    reviews: ReviewsClient,
    companies: CompanyClient,
    renderer: Box<dyn Renderer>,
    store: Option<ObjectStore>,
    mailer: Option<Mailer>,
}

impl Pipeline {
    /// Build the pipeline and its collaborators from settings.
    ///
    /// Object storage and SMTP are optional: when unconfigured the pipeline
    /// still renders PDFs locally and skips upload/email with a warning.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let reviews = ReviewsClient::from_settings(settings)?;
        let companies = CompanyClient::from_settings(settings)?;
        let renderer = build_renderer(settings)?;

        let store = if settings.storage.endpoint.trim().is_empty() {
            warn!("object storage not configured; uploads and signed links disabled");
            None
        } else {
            Some(ObjectStore::from_settings(settings)?)
        };

        let mailer = if settings.email.smtp_host.trim().is_empty() {
            warn!("SMTP not configured; report emails disabled");
            None
        } else {
            Some(Mailer::from_settings(settings)?)
        };

        Ok(Self {
            settings: settings.clone(),
            reviews,
            companies,
            renderer,
            store,
            mailer,
        })
    }

    /// Generate one company report end to end.
    pub async fn generate(&self, request: &ReportRequest) -> crate::Result<GeneratedReport> {
        let company_id = request.company_id.as_str();
        let run_id = Uuid::new_v4();
        let started_at = Local::now();
        let audit = AuditLog::new(self.settings.snapshots_dir(), started_at);

        info!(company_id, run_id = %run_id, "starting report generation");

        // Upstream fetch errors degrade to an empty record set; the empty
        // set is then reported as an input error below.
        let raw = match self.reviews.fetch_feedback(company_id).await {
            Ok(records) => records,
            Err(err) => {
                warn!(company_id, error = %err, "feedback fetch failed, treating as empty");
                Vec::new()
            }
        };

        if let Err(err) = audit.write_snapshot("api_response", &raw) {
            warn!(company_id, error = %err, "failed to write raw audit snapshot");
        }

        let records = normalize_records(&raw);
        if records.is_empty() {
            return Err(ReportError::NoData(company_id.to_string()));
        }
        info!(
            company_id,
            raw = raw.len(),
            normalized = records.len(),
            "normalized feedback records"
        );

        if let Err(err) = audit.write_snapshot("customer_feedback", &records) {
            warn!(company_id, error = %err, "failed to write filtered audit snapshot");
        }

        let metrics = aggregate(&records);
        if let Err(err) = audit.write_snapshot("analytics_summary", &metrics) {
            warn!(company_id, error = %err, "failed to write analytics audit snapshot");
        }

        let profile = match self.companies.fetch_profile(company_id).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(company_id, error = %err, "profile lookup failed, using fallback values");
                None
            }
        };

        let period = request
            .period
            .unwrap_or_else(|| ReportPeriod::current_week(started_at.date_naive()));
        let fallback_id = records.first().and_then(|r| r.company_id.as_deref());
        let model = build_model(&metrics, profile.as_ref(), fallback_id, period, started_at);

        let html = render_document(&model);
        let pdf = self
            .renderer
            .render_pdf(RenderRequest {
                html: &html,
                header_template: &header_template(&model),
                footer_template: &footer_template(&model),
            })
            .await
            .map_err(|err| ReportError::Render(format!("{:#}", err)))?;

        std::fs::create_dir_all(self.settings.reports_dir())?;
        let pdf_path = self.settings.reports_dir().join(format!(
            "Company_Weekly_Analytics_{}_{}.pdf",
            company_id,
            audit.stamp()
        ));
        std::fs::write(&pdf_path, &pdf)?;
        info!(company_id, path = %pdf_path.display(), "report rendered");

        let mut storage_key = None;
        let mut download_url = None;
        if request.upload {
            match &self.store {
                Some(store) => {
                    let key = report_key(
                        &self.settings.storage.key_prefix,
                        company_id,
                        started_at.date_naive(),
                    );
                    store
                        .put_object(&key, pdf.clone(), "application/pdf")
                        .await
                        .map_err(|err| ReportError::Storage(format!("{:#}", err)))?;
                    download_url =
                        Some(store.presign_get(&key, self.settings.storage.link_expiry_secs));
                    storage_key = Some(key);
                }
                None => warn!(company_id, "upload requested but storage is not configured"),
            }
        }

        let mut emailed_to = None;
        if request.email {
            let recipient = profile.as_ref().and_then(|p| p.email.clone());
            match (&self.mailer, &download_url, recipient) {
                (Some(mailer), Some(url), Some(recipient)) => {
                    mailer
                        .send_report_link(&model.company_name, &recipient, url)
                        .await
                        .map_err(|err| ReportError::Email(format!("{:#}", err)))?;
                    emailed_to = Some(recipient);
                }
                (_, _, None) => {
                    info!(company_id, "no recipient email on profile, skipping email")
                }
                (None, _, _) => info!(company_id, "SMTP not configured, skipping email"),
                (_, None, _) => {
                    info!(company_id, "no signed link available, skipping email")
                }
            }
        }

        Ok(GeneratedReport {
            run_id,
            company_id: company_id.to_string(),
            company_name: model.company_name.clone(),
            total_reviews: model.total_reviews,
            pdf_path,
            html,
            storage_key,
            download_url,
            emailed_to,
        })
    }

    /// Process every company in the directory sequentially.
    ///
    /// One company's failure never aborts the batch: it is logged and
    /// counted, and the loop proceeds.
    pub async fn run_batch(&self, limit: Option<usize>) -> anyhow::Result<BatchOutcome> {
        let mut companies = self.companies.list_companies().await?;
        if let Some(limit) = limit {
            companies.truncate(limit);
        }

        info!(companies = companies.len(), "starting batch report generation");

        let mut outcome = BatchOutcome::default();

        for entry in &companies {
            let Some(company_id) = entry.id.as_deref() else {
                warn!("company entry missing id, skipping");
                outcome.skipped += 1;
                continue;
            };

            outcome.processed += 1;
            let request = ReportRequest::new(company_id);

            match self.generate(&request).await {
                Ok(report) => {
                    info!(
                        company_id,
                        company = %report.company_name,
                        reviews = report.total_reviews,
                        emailed = report.emailed_to.is_some(),
                        "report completed"
                    );
                    outcome.generated += 1;
                }
                Err(ReportError::NoData(_)) => {
                    info!(company_id, "no feedback data, skipping");
                    outcome.skipped += 1;
                }
                Err(err) => {
                    error!(company_id, error = %err, "report generation failed, moving on");
                    outcome.failed += 1;
                }
            }
        }

        info!(
            processed = outcome.processed,
            generated = outcome.generated,
            skipped = outcome.skipped,
            failed = outcome.failed,
            "batch report generation finished"
        );

        Ok(outcome)
    }
}
