//! CLI for the mfetch request dispatcher.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use mfetch_core::config;
use mfetch_core::RequestType;
use std::path::PathBuf;

use commands::{run_config, run_decode, run_errors, run_fetch};

/// Top-level CLI for mfetch.
#[derive(Debug, Parser)]
#[command(name = "mfetch")]
#[command(about = "mfetch: fetch media resources through pluggable scheme handlers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URI (http, https or data) with retries.
    Fetch(FetchArgs),

    /// Decode a text file, detecting UTF-8 / UTF-16 from its first bytes.
    Decode {
        /// Path to the file.
        path: PathBuf,
    },

    /// List error codes.
    Errors {
        /// Only list codes of this category (e.g. NETWORK, text).
        #[arg(long)]
        category: Option<String>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// URI to fetch.
    pub uri: String,

    /// HTTP method.
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// Extra request header, `Name: value`. Repeatable.
    #[arg(long = "header", short = 'H', value_name = "K:V", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body.
    #[arg(long)]
    pub data: Option<String>,

    /// Which configuration block supplies retry parameters.
    #[arg(long, value_enum, default_value_t = Kind::Manifest)]
    pub kind: Kind,

    /// Write the response body here instead of reporting its size.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Forward credentials across hosts and keep cookies between redirects.
    #[arg(long)]
    pub credentials: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Manifest,
    Segment,
    License,
}

impl From<Kind> for RequestType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Manifest => RequestType::Manifest,
            Kind::Segment => RequestType::Segment,
            Kind::License => RequestType::License,
        }
    }
}

fn parse_header(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in `{s}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Fetch(args) => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_fetch(&cfg, args).await?;
            }
            CliCommand::Decode { path } => run_decode(&path)?,
            CliCommand::Errors { category } => run_errors(category.as_deref())?,
            CliCommand::Config => {
                let cfg = config::load_or_init()?;
                run_config(&cfg)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
