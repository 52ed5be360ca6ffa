//! CLI for bidfetch.

mod commands;

use anyhow::Result;
use bidfetch_core::config::{self, FetchConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{collect_sources, run_extract, run_merge, run_pipeline};

/// Top-level CLI for bidfetch.
#[derive(Debug, Parser)]
#[command(name = "bidfetch")]
#[command(
    about = "bidfetch: download the documents linked from tender notice PDFs and merge them",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Process source notices: extract links, download, merge per notice.
    Run(RunArgs),

    /// Print the download items found in one notice without fetching them.
    Extract {
        /// Path to the source PDF.
        path: PathBuf,
    },

    /// Merge the PDFs of one folder into 0_<NAME>.pdf.
    Merge {
        /// Folder holding the downloaded PDFs.
        dir: PathBuf,
        /// Base name of the merged file (defaults to the folder name).
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Source notice PDFs.
    pub paths: Vec<PathBuf>,

    /// File with one source path per line ("-" for stdin).
    #[arg(long, value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Verify TLS certificates (overrides config).
    #[arg(long)]
    pub verify_tls: bool,

    /// Connect and idle timeout per download (overrides config).
    #[arg(long, value_name = "N")]
    pub timeout_secs: Option<u64>,

    /// Pause between downloads in milliseconds (overrides config).
    #[arg(long, value_name = "N")]
    pub pace_ms: Option<u64>,
}

impl RunArgs {
    /// Applies command-line overrides on top of the loaded config.
    pub fn apply_to(&self, cfg: &mut FetchConfig) {
        if self.verify_tls {
            cfg.verify_tls = true;
        }
        if let Some(secs) = self.timeout_secs {
            cfg.timeout_secs = secs;
        }
        if let Some(ms) = self.pace_ms {
            cfg.pace_ms = ms;
        }
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run(args) => {
                let mut cfg = config::load_or_init()?;
                args.apply_to(&mut cfg);
                cfg.validate()?;
                tracing::debug!("effective config: {:?}", cfg);
                let sources = collect_sources(&args.paths, args.list.as_deref())?;
                run_pipeline(sources, &cfg).await?;
            }
            CliCommand::Extract { path } => run_extract(&path)?,
            CliCommand::Merge { dir, name } => run_merge(&dir, name.as_deref())?,
        }

        Ok(())
    }
}
