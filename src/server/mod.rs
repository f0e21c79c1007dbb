//! Inbound HTTP trigger for report generation
//!
//! Thin wrapper over the pipeline: one POST endpoint to generate a report
//! for an explicit company and period, plus GET endpoints serving the
//! artifacts produced by earlier generate calls.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Host, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Settings;
use crate::pipeline::{Pipeline, ReportRequest};
use crate::report::ReportPeriod;
use crate::ReportError;

#[derive(Clone)]
struct AppContext {
    pipeline: Arc<Pipeline>,
    settings: Arc<Settings>,
}

/// Run the HTTP server until shutdown.
pub async fn run(settings: Settings, port: u16) -> anyhow::Result<()> {
    settings.ensure_dirs()?;
    let pipeline = Pipeline::from_settings(&settings)?;

    let ctx = AppContext {
        pipeline: Arc::new(pipeline),
        settings: Arc::new(settings),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/reports/generate", post(generate_report))
        .route("/reports/view/:filename", get(view_report))
        .route("/reports/download/:filename", get(download_report))
        .route("/reports/html-file/:filename", get(serve_html_report))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("report API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(rename = "companyId")]
    company_id: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    #[serde(rename = "viewUrl")]
    view_url: String,
    #[serde(rename = "downloadUrl")]
    download_url: String,
    #[serde(rename = "htmlUrl")]
    html_url: String,
}

async fn generate_report(
    State(ctx): State<AppContext>,
    Host(host): Host,
    Json(body): Json<GenerateRequest>,
) -> Response {
    let (Some(company_id), Some(from), Some(to)) = (body.company_id, body.from, body.to) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required parameters");
    };

    let period = match ReportPeriod::from_bounds(&from, &to) {
        Ok(period) => period,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };

    // The interactive path uploads for the signed link but leaves email
    // delivery to the batch schedule.
    let request = ReportRequest {
        company_id: company_id.clone(),
        period: Some(period),
        upload: true,
        email: false,
    };

    let report = match ctx.pipeline.generate(&request).await {
        Ok(report) => report,
        Err(err) => {
            error!(company_id = %company_id, error = %err, stage = "generate", "report request failed");
            return error_response(status_for(&err), &err.to_string());
        }
    };

    // Persist artifacts under api_reports/ where the serve endpoints look
    let filename = format!(
        "{}_{}.pdf",
        company_id,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let html_filename = filename.replace(".pdf", ".html");
    let api_dir = ctx.settings.api_reports_dir();

    if let Err(err) = std::fs::copy(&report.pdf_path, api_dir.join(&filename)) {
        error!(company_id = %company_id, error = %err, stage = "persist", "failed to store report PDF");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Generated PDF not found");
    }
    if let Err(err) = std::fs::write(api_dir.join(&html_filename), &report.html) {
        error!(company_id = %company_id, error = %err, stage = "persist", "failed to store report HTML");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store report HTML");
    }

    let base_url = format!("http://{}", host);
    Json(GenerateResponse {
        view_url: format!("{}/reports/view/{}", base_url, filename),
        download_url: format!("{}/reports/download/{}", base_url, filename),
        html_url: format!("{}/reports/html-file/{}", base_url, html_filename),
    })
    .into_response()
}

async fn view_report(State(ctx): State<AppContext>, Path(filename): Path<String>) -> Response {
    serve_file(&ctx, &filename, "application/pdf", false).await
}

async fn download_report(State(ctx): State<AppContext>, Path(filename): Path<String>) -> Response {
    serve_file(&ctx, &filename, "application/pdf", true).await
}

async fn serve_html_report(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> Response {
    serve_file(&ctx, &filename, "text/html; charset=utf-8", false).await
}

async fn serve_file(
    ctx: &AppContext,
    filename: &str,
    content_type: &str,
    attachment: bool,
) -> Response {
    if !is_safe_filename(filename) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid file name");
    }

    let path = ctx.settings.api_reports_dir().join(filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(_) => return error_response(StatusCode::NOT_FOUND, "Report not found"),
    };

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type);
    if attachment {
        response = response.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        );
    }

    response
        .body(axum::body::Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Map the pipeline error taxonomy onto HTTP statuses.
fn status_for(err: &ReportError) -> StatusCode {
    match err {
        ReportError::Input(_) | ReportError::Config(_) => StatusCode::BAD_REQUEST,
        ReportError::NoData(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Only bare file names are served, never paths.
fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_maps_to_http_statuses() {
        assert_eq!(
            status_for(&ReportError::Input("missing".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ReportError::NoData("acme".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&ReportError::Render("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&ReportError::Storage("denied".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn path_traversal_is_rejected() {
        assert!(is_safe_filename("acme_20250908_103000.pdf"));
        assert!(!is_safe_filename("../secrets.toml"));
        assert!(!is_safe_filename("a/b.pdf"));
        assert!(!is_safe_filename(""));
    }
}
