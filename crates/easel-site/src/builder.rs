//! The build pipeline: one Markdown document plus a template become a
//! served site.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use easel_markdown::{Converter, MarkdownOptions};

use crate::assets;
use crate::template::{self, PageContext};

/// Name of the asset directory inside the output tree.
const STATIC_SUBDIR: &str = "static";

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// The Markdown document to render.
    pub source: PathBuf,

    /// HTML template with the substitution tokens.
    pub template: PathBuf,

    /// Directory of static assets, mirrored into `static/` in the output.
    pub static_dir: PathBuf,

    /// Output directory.
    pub output_dir: PathBuf,

    /// Title used when the document does not start with a heading.
    pub default_title: String,

    /// Markdown extension options.
    pub markdown: MarkdownOptions,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("tutorial.md"),
            template: PathBuf::from("template.html"),
            static_dir: PathBuf::from("static"),
            output_dir: PathBuf::from("output"),
            default_title: "Untitled".to_string(),
            markdown: MarkdownOptions::default(),
        }
    }
}

/// Result of one build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// The rendered page.
    pub output_file: PathBuf,

    /// Title the page was rendered with.
    pub title: String,

    /// Total build time in milliseconds.
    pub duration_ms: u64,
}

/// Errors that can occur during a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("failed to mirror static assets: {0}")]
    Mirror(String),

    #[error(transparent)]
    Stylesheet(#[from] easel_markdown::HighlightError),
}

/// Site builder.
///
/// Holds the converter so syntax definitions load once; `build` can run
/// any number of times against the same configuration.
pub struct Builder {
    config: SiteConfig,
    converter: Converter,
}

impl Builder {
    pub fn new(config: SiteConfig) -> Self {
        let converter = Converter::new(config.markdown.clone());
        Self { config, converter }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Run the pipeline once: mirror assets, write the highlight
    /// stylesheets, convert the document, render the template, write
    /// `index.html`.
    ///
    /// Every step rewrites its outputs from current inputs, so a build
    /// after a failed or stale one still converges.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir).map_err(|e| BuildError::Write {
            path: self.config.output_dir.clone(),
            message: e.to_string(),
        })?;

        let static_out = self.config.output_dir.join(STATIC_SUBDIR);
        if self.config.static_dir.exists() {
            assets::mirror_dir(&self.config.static_dir, &static_out)?;
        }

        if self.config.markdown.highlight.enabled {
            assets::write_highlight_stylesheets(
                self.converter.highlighter(),
                &self.config.markdown.highlight,
                &static_out,
            )?;
        }

        let source = fs::read_to_string(&self.config.source).map_err(|e| BuildError::Read {
            path: self.config.source.clone(),
            message: e.to_string(),
        })?;

        let rendered = self.converter.convert(&source);
        let title = derive_title(&source, &self.config.default_title);

        let template = fs::read_to_string(&self.config.template).map_err(|e| BuildError::Read {
            path: self.config.template.clone(),
            message: e.to_string(),
        })?;

        let page = template::render_page(
            &template,
            &PageContext {
                title: title.clone(),
                content: rendered.html,
                toc: rendered.toc,
            },
        );

        let output_file = self.config.output_dir.join("index.html");
        fs::write(&output_file, page).map_err(|e| BuildError::Write {
            path: output_file.clone(),
            message: e.to_string(),
        })?;

        Ok(BuildReport {
            output_file,
            title,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Derive the page title from the document.
///
/// The first non-blank line decides: a `# ` heading yields its text,
/// anything else yields the fallback.
pub fn derive_title(source: &str, fallback: &str) -> String {
    source
        .lines()
        .find(|line| !line.trim().is_empty())
        .and_then(|line| line.strip_prefix("# "))
        .map(|title| title.to_string())
        .unwrap_or_else(|| fallback.to_string())
}
