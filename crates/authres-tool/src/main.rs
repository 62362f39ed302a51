use anyhow::Context;
use authres::{FormatOptions, ParseOptions};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

mod format;
mod parse;

/// Authentication-Results header parser and formatter.
///
/// Set AUTHRES_LOG in the environment to control diagnostic
/// logging, for example AUTHRES_LOG=authres=debug.
#[derive(Debug, Parser)]
#[command(about, version)]
struct Opt {
    /// TOML file with `[parse]` and `[format]` tables holding
    /// the default options for the subcommands
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: SubCommand,
}

#[derive(Debug, Parser)]
enum SubCommand {
    Parse(parse::ParseCommand),
    Format(format::FormatCommand),
}

impl SubCommand {
    fn run(&self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Parse(cmd) => cmd.run(&config.parse),
            Self::Format(cmd) => cmd.run(&config.format),
        }
    }
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default)]
struct Config {
    parse: ParseOptions,
    format: FormatOptions,
}

impl Config {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opt::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("AUTHRES_LOG"))
        .init();

    let config = match &opts.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    tracing::debug!(?config, "loaded configuration");

    opts.cmd.run(&config)
}
