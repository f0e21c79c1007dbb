//! instareport - Customer feedback analytics and weekly PDF report pipeline
//!
//! Pulls survey and audio-derived feedback for a company, aggregates it into
//! summary metrics, renders an HTML report, rasterizes it to PDF through a
//! headless-browser rendering service, uploads the PDF to object storage and
//! emails a signed download link.

pub mod cli;
pub mod client;
pub mod config;
pub mod email;
pub mod feedback;
pub mod objectstore;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod server;

use thiserror::Error;

/// Main error taxonomy for the report pipeline.
///
/// Interactive callers map these onto HTTP statuses; the batch driver only
/// distinguishes "no data" (skip) from everything else (failure).
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    Input(String),

    #[error("No feedback data for company {0}")]
    NoData(String),

    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Email delivery failed: {0}")]
    Email(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "instareport";
