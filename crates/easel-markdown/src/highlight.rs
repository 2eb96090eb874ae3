//! Fenced code block highlighting and theme stylesheet generation.

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

use crate::escape_html;
use crate::options::HighlightOptions;

/// Errors from theme stylesheet generation.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("unknown highlight theme '{0}'")]
    UnknownTheme(String),

    #[error("failed to generate theme stylesheet: {0}")]
    Css(#[from] syntect::Error),
}

/// Code highlighter emitting class-annotated HTML.
///
/// The markup carries no colors; those come from the generated theme
/// stylesheets, so one build serves both light and dark pages.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
    options: HighlightOptions,
}

impl Highlighter {
    pub fn new(options: HighlightOptions) -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
            options,
        }
    }

    /// Render one code block as an HTML fragment.
    ///
    /// Unknown languages fall back to plain-text tokenization, and a
    /// tokenizer failure falls back to escaped text; a code block never
    /// fails a conversion.
    pub fn render_block(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang
            .and_then(|token| self.syntaxes.find_syntax_by_token(token))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());

        let body = self
            .classed_body(code, syntax)
            .unwrap_or_else(|_| escape_html(code));

        let lang_class = match lang {
            Some(token) => format!(" class=\"language-{}\"", token),
            None => String::new(),
        };

        if self.options.line_numbers {
            let gutter: Vec<String> = (1..=line_count(code)).map(|n| n.to_string()).collect();
            format!(
                "<div class=\"{}\"><table class=\"highlighttable\"><tr>\
                 <td class=\"linenos\"><pre>{}</pre></td>\
                 <td class=\"code\"><pre><code{}>{}</code></pre></td>\
                 </tr></table></div>\n",
                self.options.css_class,
                gutter.join("\n"),
                lang_class,
                body
            )
        } else {
            format!(
                "<div class=\"{}\"><pre><code{}>{}</code></pre></div>\n",
                self.options.css_class, lang_class, body
            )
        }
    }

    /// Generate the CSS for a named theme from the bundled theme set.
    pub fn theme_css(&self, theme: &str) -> Result<String, HighlightError> {
        let theme = self
            .themes
            .themes
            .get(theme)
            .ok_or_else(|| HighlightError::UnknownTheme(theme.to_string()))?;
        Ok(css_for_theme_with_class_style(theme, ClassStyle::Spaced)?)
    }

    fn classed_body(&self, code: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }
}

fn line_count(code: &str) -> usize {
    LinesWithEndings::from(code).count().max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighter() -> Highlighter {
        Highlighter::new(HighlightOptions::default())
    }

    #[test]
    fn highlights_known_language() {
        let html = highlighter().render_block("fn main() {}\n", Some("rust"));

        assert!(html.starts_with("<div class=\"highlight\">"));
        assert!(html.contains("class=\"language-rust\""));
        assert!(html.contains("<span"));
        assert!(html.contains("main"));
    }

    #[test]
    fn unknown_language_falls_back_to_plain_text() {
        let html = highlighter().render_block("hello world\n", Some("nosuchlang"));

        assert!(html.contains("class=\"language-nosuchlang\""));
        assert!(html.contains("hello world"));
    }

    #[test]
    fn code_content_is_escaped() {
        let html = highlighter().render_block("<b>&\n", None);

        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn custom_css_class_is_used() {
        let options = HighlightOptions {
            css_class: "codehilite".to_string(),
            ..Default::default()
        };
        let html = Highlighter::new(options).render_block("x\n", None);

        assert!(html.starts_with("<div class=\"codehilite\">"));
    }

    #[test]
    fn line_numbers_render_a_gutter() {
        let options = HighlightOptions {
            line_numbers: true,
            ..Default::default()
        };
        let html = Highlighter::new(options).render_block("a\nb\nc\n", Some("rust"));

        assert!(html.contains("class=\"highlighttable\""));
        assert!(html.contains("<td class=\"linenos\"><pre>1\n2\n3</pre></td>"));
    }

    #[test]
    fn generates_css_for_bundled_themes() {
        let h = highlighter();

        let light = h.theme_css("InspiredGitHub").unwrap();
        let dark = h.theme_css("base16-ocean.dark").unwrap();

        assert!(light.contains("color"));
        assert!(dark.contains("color"));
        assert_ne!(light, dark);
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let err = highlighter().theme_css("no-such-theme").unwrap_err();

        assert!(matches!(err, HighlightError::UnknownTheme(_)));
        assert!(err.to_string().contains("no-such-theme"));
    }
}
