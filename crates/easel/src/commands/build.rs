//! One-shot site build.

use anyhow::Result;

use easel_site::Builder;

use crate::config::ConfigFile;

/// Run a single build and exit.
pub fn run(config: ConfigFile) -> Result<()> {
    tracing::info!("building site");

    let builder = Builder::new(config.into_site_config());
    let report = builder.build()?;

    tracing::info!("built \"{}\" in {}ms", report.title, report.duration_ms);
    tracing::info!("output: {}", report.output_file.display());

    Ok(())
}
