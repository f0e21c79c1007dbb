//! CLI command implementations

use anyhow::Result;

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::pipeline::{Pipeline, ReportRequest};
use crate::report::ReportPeriod;
use crate::ReportError;

/// Generate the weekly report for one company.
pub async fn generate_report(
    settings: &Settings,
    company_id: &str,
    from: Option<String>,
    to: Option<String>,
    no_upload: bool,
    no_email: bool,
) -> Result<()> {
    settings.ensure_dirs()?;

    let period = match (from, to) {
        (Some(from), Some(to)) => Some(ReportPeriod::from_bounds(&from, &to)?),
        _ => None,
    };

    let pipeline = Pipeline::from_settings(settings)?;
    let request = ReportRequest {
        company_id: company_id.to_string(),
        period,
        upload: !no_upload,
        email: !no_email,
    };

    let report = match pipeline.generate(&request).await {
        Ok(report) => report,
        Err(ReportError::NoData(company)) => {
            anyhow::bail!("No feedback data available for company {}", company);
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "Report generated for {} ({} reviews)",
        report.company_name, report.total_reviews
    );
    println!("PDF: {}", report.pdf_path.display());

    if let Some(key) = &report.storage_key {
        println!("Uploaded: {}", key);
    }
    if let Some(url) = &report.download_url {
        println!("Download link (7 days): {}", url);
    }
    if let Some(recipient) = &report.emailed_to {
        println!("Emailed to: {}", recipient);
    }

    Ok(())
}

/// Generate and deliver reports for every company in the directory.
pub async fn run_batch(settings: &Settings, limit: Option<usize>) -> Result<()> {
    settings.ensure_dirs()?;

    let pipeline = Pipeline::from_settings(settings)?;
    let outcome = pipeline.run_batch(limit).await?;

    println!(
        "Batch finished: {} generated, {} skipped, {} failed ({} processed)",
        outcome.generated, outcome.skipped, outcome.failed, outcome.processed
    );

    if outcome.failed > 0 {
        anyhow::bail!("{} companies failed; see logs for details", outcome.failed);
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}
