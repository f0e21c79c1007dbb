//! Headless-browser PDF rendering client
//!
//! The rendering service is an opaque boundary: it receives a self-contained
//! HTML document plus page-layout parameters and returns a PDF byte stream.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::Settings;

/// Rendering request payload.
pub struct RenderRequest<'a> {
    pub html: &'a str,
    pub header_template: &'a str,
    pub footer_template: &'a str,
}

#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render_pdf(&self, request: RenderRequest<'_>) -> Result<Vec<u8>>;
}

/// Build a renderer from runtime settings.
pub fn build_renderer(settings: &Settings) -> Result<Box<dyn Renderer>> {
    Ok(Box::new(HttpRenderer::from_settings(settings)?))
}

/// Renderer backed by a Chromium rendering service.
pub struct HttpRenderer {
    http: Client,
    endpoint: String,
}

impl HttpRenderer {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let endpoint = settings.render.endpoint.trim().trim_end_matches('/').to_string();
        if endpoint.is_empty() {
            anyhow::bail!("Render service endpoint is missing. Set render.endpoint in config.");
        }

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(settings.render.timeout_secs))
                .build()
                .context("Failed to build render HTTP client")?,
            endpoint,
        })
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render_pdf(&self, request: RenderRequest<'_>) -> Result<Vec<u8>> {
        let body = RenderPayload {
            html: request.html,
            options: RenderOptions {
                format: "A4",
                print_background: true,
                display_header_footer: true,
                header_template: request.header_template,
                footer_template: request.footer_template,
                margin: PageMargin {
                    top: "25mm",
                    bottom: "22mm",
                    left: "15mm",
                    right: "15mm",
                },
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("Render service request failed")?
            .error_for_status()
            .context("Render service returned an error status")?;

        let pdf = response
            .bytes()
            .await
            .context("Failed to read rendered PDF")?;

        if pdf.is_empty() {
            anyhow::bail!("Render service returned an empty document");
        }

        Ok(pdf.to_vec())
    }
}

#[derive(Serialize)]
struct RenderPayload<'a> {
    html: &'a str,
    options: RenderOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderOptions<'a> {
    format: &'a str,
    print_background: bool,
    display_header_footer: bool,
    header_template: &'a str,
    footer_template: &'a str,
    margin: PageMargin<'a>,
}

#[derive(Serialize)]
struct PageMargin<'a> {
    top: &'a str,
    bottom: &'a str,
    left: &'a str,
    right: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_requires_an_endpoint() {
        let settings = Settings::default();

        let err = match build_renderer(&settings) {
            Ok(_) => panic!("expected renderer creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Render service endpoint is missing"));
    }

    #[test]
    fn payload_serializes_page_layout() {
        let payload = RenderPayload {
            html: "<html></html>",
            options: RenderOptions {
                format: "A4",
                print_background: true,
                display_header_footer: true,
                header_template: "<div/>",
                footer_template: "<div/>",
                margin: PageMargin {
                    top: "25mm",
                    bottom: "22mm",
                    left: "15mm",
                    right: "15mm",
                },
            },
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["options"]["format"], "A4");
        assert_eq!(json["options"]["printBackground"], true);
        assert_eq!(json["options"]["margin"]["top"], "25mm");
    }
}
