//! svgward CLI.
//!
//! `check` reports per-file verdicts without touching anything; `clean`
//! prints sanitized markup, or rewrites files in place with `--write` using
//! the same filter the upload pipeline runs.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use svgward::sanitize::Sanitizer;
use svgward::upload::{SvgUploadFilter, Uploader};
use svgward::{GuardConfig, GuardError};

#[derive(Parser)]
#[command(name = "svgward", version, about = "SVG upload sanitizer")]
struct Cli {
    /// Emit machine-readable JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate and sanitize files, reporting what would happen.
    Check { files: Vec<PathBuf> },
    /// Print sanitized markup to stdout, or rewrite files with --write.
    Clean {
        files: Vec<PathBuf>,
        /// Rewrite each file in place instead of printing.
        #[arg(long)]
        write: bool,
    },
}

/// Per-file verdict for `check`.
#[derive(Debug, Serialize)]
struct Verdict {
    file: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = GuardConfig::from_env().context("failed to load configuration")?;

    match cli.command {
        Command::Check { files } => check(files, cli.json).await,
        Command::Clean { files, write } => clean(files, write, config).await,
    }
}

async fn check(files: Vec<PathBuf>, json: bool) -> Result<ExitCode> {
    let sanitizer = Sanitizer::default();
    let mut failed = false;
    let mut verdicts = Vec::new();

    for file in files {
        let verdict = match tokio::fs::read(&file).await {
            Err(e) => {
                failed = true;
                Verdict {
                    file: file.display().to_string(),
                    status: "unreadable",
                    reason: Some(e.to_string()),
                }
            }
            Ok(data) => match sanitizer.sanitize_bytes(&data) {
                Err(e) => {
                    failed = true;
                    Verdict {
                        file: file.display().to_string(),
                        status: "rejected",
                        reason: Some(e.to_string()),
                    }
                }
                Ok(output) => {
                    let unchanged = output.as_bytes() == data.as_slice();
                    if !unchanged {
                        failed = true;
                    }
                    Verdict {
                        file: file.display().to_string(),
                        status: if unchanged { "clean" } else { "needs-sanitizing" },
                        reason: None,
                    }
                }
            },
        };
        verdicts.push(verdict);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
    } else {
        for v in &verdicts {
            match &v.reason {
                Some(reason) => println!("{}: {} ({reason})", v.file, v.status),
                None => println!("{}: {}", v.file, v.status),
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn clean(files: Vec<PathBuf>, write: bool, config: GuardConfig) -> Result<ExitCode> {
    let mut failed = false;

    if write {
        // The CLI acts as its own privileged host.
        let filter = SvgUploadFilter::new(config);
        let uploader = Uploader {
            can_upload_files: true,
            is_admin: true,
        };

        for file in files {
            match filter.filter(&file, &uploader).await {
                Ok(outcome) => debug!(file = %file.display(), ?outcome, "cleaned"),
                Err(e) => {
                    failed = true;
                    eprintln!("{}: {e}", file.display());
                }
            }
        }
    } else {
        let sanitizer = Sanitizer::default();
        for file in files {
            let result = tokio::fs::read(&file)
                .await
                .map_err(GuardError::UnreadableFile)
                .and_then(|data| sanitizer.sanitize_bytes(&data));
            match result {
                Ok(output) => println!("{output}"),
                Err(e) => {
                    failed = true;
                    eprintln!("{}: {e}", file.display());
                }
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
