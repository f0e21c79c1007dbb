//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// instareport - Customer feedback analytics and weekly PDF report pipeline
#[derive(Parser, Debug)]
#[command(name = "instareport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the report for one company
    Generate {
        /// Company identifier
        #[arg(long)]
        company_id: String,

        /// Period start date (ISO-8601); defaults to the current ISO week
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Period end date (ISO-8601)
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Render and save locally without uploading to object storage
        #[arg(long)]
        no_upload: bool,

        /// Skip emailing the signed download link
        #[arg(long)]
        no_email: bool,
    },

    /// Generate and deliver reports for every company in the directory
    Batch {
        /// Process at most this many companies
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Run the report-generation HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
