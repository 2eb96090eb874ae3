//! easel CLI - single-document static site builder.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "easel")]
#[command(about = "Render one Markdown document into a static site")]
#[command(version)]
pub struct Cli {
    /// Start the development server instead of building once
    #[arg(long)]
    serve: bool,

    /// Port for the development server
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Open the served site in a browser (with --serve)
    #[arg(long)]
    open: bool,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let config = config::load(&cli.config)?;

    if cli.serve {
        commands::serve::run(config, cli.port, cli.open).await?;
    } else {
        commands::build::run(config)?;
    }

    Ok(())
}
