//! SMTP delivery of report download links

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Settings;

pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    portal_url: String,
}

impl Mailer {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let host = settings.email.smtp_host.trim();
        if host.is_empty() {
            anyhow::bail!("SMTP host is missing. Set email.smtp_host in config.");
        }

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .context("Failed to configure SMTP relay")?
            .port(settings.email.smtp_port)
            .credentials(Credentials::new(
                settings.email.username.clone(),
                settings.email.password.clone(),
            ))
            .build();

        let from = settings
            .email
            .from_address
            .parse::<Mailbox>()
            .with_context(|| {
                format!("Invalid from address: {}", settings.email.from_address)
            })?;

        Ok(Self {
            transport,
            from,
            portal_url: settings.email.portal_url.clone(),
        })
    }

    /// Send the weekly report email with the signed download link.
    pub async fn send_report_link(
        &self,
        company_name: &str,
        recipient: &str,
        download_url: &str,
    ) -> Result<()> {
        let to = recipient
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid recipient address: {}", recipient))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(report_subject(company_name))
            .multipart(MultiPart::alternative_plain_html(
                report_text_body(company_name, download_url, &self.portal_url),
                report_html_body(company_name, download_url, &self.portal_url),
            ))
            .context("Failed to build report email")?;

        self.transport
            .send(message)
            .await
            .context("SMTP send failed")?;

        tracing::info!(recipient = %recipient, "report email sent");

        Ok(())
    }
}

pub fn report_subject(company_name: &str) -> String {
    format!("Your Weekly InstaReview Report is Ready - {}", company_name)
}

fn report_text_body(company_name: &str, download_url: &str, portal_url: &str) -> String {
    format!(
        "Hello {company_name},\n\
\n\
Your weekly consolidated InstaReview report is now available. This report \
highlights actionable insights gathered from your customer reviews over the \
past week, helping you identify trends and areas of improvement quickly.\n\
\n\
What's inside:\n\
- Key performance highlights and metrics\n\
- Actionable insights and recommendations\n\
- Customer sentiment trends analysis\n\
- Detailed analytics and visual charts\n\
\n\
Download your report here: {download_url}\n\
\n\
Access your dashboard anytime at: {portal_url}\n\
\n\
Thank you for choosing InstaReview to power your customer experience journey.\n\
\n\
Best regards,\n\
The InstaReview Team\n"
    )
}

fn report_html_body(company_name: &str, download_url: &str, portal_url: &str) -> String {
    let year = Utc::now().year();
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="margin: 0; font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; background: #f8fafc;">
  <div style="max-width: 600px; margin: 0 auto; background: white;">
    <div style="background: #667eea; padding: 40px 30px; text-align: center;">
      <h1 style="color: white; font-size: 28px; margin: 0 0 8px 0;">Weekly Analytics Report</h1>
      <p style="color: rgba(255,255,255,0.9); font-size: 16px; margin: 0;">Your customer insights are ready</p>
    </div>
    <div style="padding: 40px 30px;">
      <div style="font-size: 18px; color: #1a202c; margin-bottom: 24px;">Hello {company_name}</div>
      <div style="font-size: 16px; color: #4a5568; line-height: 1.6; margin-bottom: 32px;">
        Your weekly consolidated InstaReview report is now available. This report highlights
        actionable insights gathered from your customer reviews over the past week, helping you
        identify trends and areas of improvement quickly.
      </div>
      <div style="text-align: center; margin: 40px 0;">
        <a href="{download_url}" style="display: inline-block; background: #667eea; color: white; padding: 16px 32px; text-decoration: none; border-radius: 8px; font-weight: 600; font-size: 16px;">Download Your Report</a>
      </div>
      <div style="text-align: center; margin: 24px 0; padding: 20px; background: #f7fafc; border-radius: 8px;">
        <p style="margin: 0;">Access your dashboard anytime at <a href="{portal_url}" style="color: #667eea; text-decoration: none;">{portal_url}</a></p>
      </div>
      <div style="margin-top: 32px; color: #4a5568; line-height: 1.6;">
        <p>Thank you for choosing InstaReview to power your customer experience journey.</p>
        <p><strong>Best regards,</strong><br>The InstaReview Team</p>
      </div>
    </div>
    <div style="background: #2d3748; color: #a0aec0; padding: 30px; text-align: center; font-size: 14px;">
      <div style="color: white; font-weight: 600; margin-bottom: 8px;">InstaReview.ai</div>
      <div>&copy; {year} InstaReview.ai. All rights reserved.</div>
    </div>
  </div>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_names_the_company() {
        assert_eq!(
            report_subject("Acme Foods"),
            "Your Weekly InstaReview Report is Ready - Acme Foods"
        );
    }

    #[test]
    fn bodies_embed_the_signed_link() {
        let url = "https://bucket.example.com/report.pdf?X-Amz-Signature=abc";
        let text = report_text_body("Acme", url, "https://app.instareview.ai/");
        let html = report_html_body("Acme", url, "https://app.instareview.ai/");

        assert!(text.contains(url));
        assert!(html.contains(url));
        assert!(html.contains("Hello Acme"));
    }

    #[test]
    fn mailer_requires_an_smtp_host() {
        let settings = Settings::default();

        let err = match Mailer::from_settings(&settings) {
            Ok(_) => panic!("expected mailer creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("SMTP host is missing"));
    }
}
