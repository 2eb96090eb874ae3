//! Static site build pipeline.
//!
//! Renders one Markdown document through an HTML template into an output
//! directory, alongside mirrored static assets and generated highlight
//! stylesheets.

pub mod assets;
pub mod builder;
pub mod template;

pub use builder::{derive_title, BuildError, Builder, BuildReport, SiteConfig};
pub use template::{render_page, PageContext};
