//! Markdown conversion for the site pipeline.
//!
//! Wraps the CommonMark parser with the extension set the build depends
//! on: tables, footnotes, strikethrough, task lists, admonitions,
//! collapsible detail blocks, tabbed content, and syntax-highlighted code
//! with class-based theme stylesheets.

mod blocks;
pub mod convert;
pub mod highlight;
pub mod options;
pub mod toc;

pub use convert::{Converter, Rendered};
pub use highlight::{HighlightError, Highlighter};
pub use options::{HighlightOptions, MarkdownOptions, TabbedOptions};
pub use toc::{slugify, TocBuilder, TocEntry};

/// Minimal HTML escaping for text interpolated into generated markup.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("a < b & c > \"d\""),
            "a &lt; b &amp; c &gt; &quot;d&quot;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
