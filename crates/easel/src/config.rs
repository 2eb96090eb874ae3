//! Optional `site.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use easel_markdown::MarkdownOptions;
use easel_site::SiteConfig;

/// Configuration file structure (`site.toml`).
///
/// Every field is optional; the defaults reproduce the conventional
/// layout: `tutorial.md`, `template.html`, `static/`, `output/`.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    site: SiteSection,
    #[serde(default)]
    markdown: MarkdownOptions,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SiteSection {
    source: PathBuf,
    template: PathBuf,
    static_dir: PathBuf,
    output: PathBuf,
    title: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            source: PathBuf::from("tutorial.md"),
            template: PathBuf::from("template.html"),
            static_dir: PathBuf::from("static"),
            output: PathBuf::from("output"),
            title: "Untitled".to_string(),
        }
    }
}

impl ConfigFile {
    /// Convert into the build pipeline's configuration.
    pub fn into_site_config(self) -> SiteConfig {
        SiteConfig {
            source: self.site.source,
            template: self.site.template,
            static_dir: self.site.static_dir,
            output_dir: self.site.output,
            default_title: self.site.title,
            markdown: self.markdown,
        }
    }
}

/// Load configuration from `path` if it exists, defaults otherwise.
/// A present but malformed file is an error.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}
