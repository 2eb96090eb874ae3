//! Extension options for the Markdown converter.

use serde::Deserialize;

/// Named-extension configuration for a [`Converter`](crate::Converter).
///
/// Every extension can be switched off; the defaults match the full set the
/// site pipeline ships with. All fields deserialize with defaults so a
/// config file only has to name what it changes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkdownOptions {
    /// GitHub-style tables.
    pub tables: bool,

    /// Footnote references and definitions.
    pub footnotes: bool,

    /// `~~strikethrough~~` spans.
    pub strikethrough: bool,

    /// Task-list checkboxes (`- [x]`).
    pub tasklists: bool,

    /// `!!! note "Title"` call-out blocks.
    pub admonitions: bool,

    /// `??? note "Title"` collapsible blocks.
    pub details: bool,

    /// `=== "Label"` tabbed content blocks.
    pub tabbed: TabbedOptions,

    /// Fenced code block highlighting.
    pub highlight: HighlightOptions,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            admonitions: true,
            details: true,
            tabbed: TabbedOptions::default(),
            highlight: HighlightOptions::default(),
        }
    }
}

/// Options for tabbed content blocks.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TabbedOptions {
    pub enabled: bool,

    /// Emit the grouped label-row markup instead of interleaved tabs.
    pub alternate_style: bool,
}

impl Default for TabbedOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            alternate_style: true,
        }
    }
}

/// Options for code highlighting and the generated theme stylesheets.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HighlightOptions {
    pub enabled: bool,

    /// Class applied to the wrapper around each highlighted block.
    pub css_class: String,

    /// Render a line-number gutter next to each block.
    pub line_numbers: bool,

    /// Theme used for the light stylesheet.
    pub light_theme: String,

    /// Theme used for the dark stylesheet.
    pub dark_theme: String,

    /// Filename of the generated light stylesheet.
    pub light_stylesheet: String,

    /// Filename of the generated dark stylesheet.
    pub dark_stylesheet: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            css_class: "highlight".to_string(),
            line_numbers: false,
            light_theme: "InspiredGitHub".to_string(),
            dark_theme: "base16-ocean.dark".to_string(),
            // Templates link the stylesheets by these names.
            light_stylesheet: "pygments-light.css".to_string(),
            dark_stylesheet: "pygments-dark.css".to_string(),
        }
    }
}
