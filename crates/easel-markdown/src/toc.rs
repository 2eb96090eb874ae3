//! Heading anchors and table-of-contents rendering.

use std::collections::HashMap;

use crate::escape_html;

/// A heading collected during conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text with inline markup flattened.
    pub title: String,
    /// Anchor id, unique within the document.
    pub id: String,
    /// Heading level, 1-6.
    pub level: u8,
}

/// Collects headings in document order and renders the TOC fragment.
///
/// Duplicate slugs get a numeric suffix (`intro`, `intro-1`, `intro-2`) so
/// every anchor stays addressable.
#[derive(Debug, Default)]
pub struct TocBuilder {
    entries: Vec<TocEntry>,
    seen: HashMap<String, usize>,
}

impl TocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a heading and return the anchor id assigned to it.
    pub fn push(&mut self, level: u8, title: &str) -> String {
        let mut slug = slugify(title);
        if slug.is_empty() {
            slug = "section".to_string();
        }

        let id = match self.seen.get(&slug) {
            None => slug.clone(),
            Some(n) => format!("{}-{}", slug, n),
        };
        *self.seen.entry(slug).or_insert(0) += 1;

        self.entries.push(TocEntry {
            title: title.to_string(),
            id: id.clone(),
            level,
        });
        id
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Render the collected headings as a nested list wrapped in
    /// `<div class="toc">`. Empty string when no headings were seen.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return String::new();
        }

        let mut out = String::from("<div class=\"toc\">\n<ul>\n");
        // Levels of the currently open list items, outermost first.
        let mut open: Vec<u8> = Vec::new();

        for entry in &self.entries {
            match open.last().copied() {
                None => open.push(entry.level),
                Some(top) if entry.level > top => {
                    out.push_str("\n<ul>\n");
                    open.push(entry.level);
                }
                Some(mut top) => {
                    while open.len() > 1 && entry.level < top {
                        open.pop();
                        out.push_str("</li>\n</ul>\n");
                        top = *open.last().unwrap();
                    }
                    out.push_str("</li>\n");
                    *open.last_mut().unwrap() = entry.level;
                }
            }
            out.push_str(&format!(
                "<li><a href=\"#{}\">{}</a>",
                entry.id,
                escape_html(&entry.title)
            ));
        }

        out.push_str("</li>\n");
        for _ in 1..open.len() {
            out.push_str("</ul>\n</li>\n");
        }
        out.push_str("</ul>\n</div>");
        out
    }
}

/// Turn heading text into an anchor slug: lowercase alphanumerics with
/// single hyphens between words.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "what-s-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Ünïcödé"), "ünïcödé");
        assert_eq!(slugify("100% Coverage"), "100-coverage");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn duplicate_titles_get_suffixes() {
        let mut toc = TocBuilder::new();

        assert_eq!(toc.push(2, "Setup"), "setup");
        assert_eq!(toc.push(2, "Setup"), "setup-1");
        assert_eq!(toc.push(2, "Setup"), "setup-2");
    }

    #[test]
    fn symbol_only_heading_gets_fallback_slug() {
        let mut toc = TocBuilder::new();

        assert_eq!(toc.push(1, "???"), "section");
        assert_eq!(toc.push(1, "!!!"), "section-1");
    }

    #[test]
    fn renders_flat_list() {
        let mut toc = TocBuilder::new();
        toc.push(1, "One");
        toc.push(1, "Two");

        assert_eq!(
            toc.render(),
            "<div class=\"toc\">\n<ul>\n\
             <li><a href=\"#one\">One</a></li>\n\
             <li><a href=\"#two\">Two</a></li>\n\
             </ul>\n</div>"
        );
    }

    #[test]
    fn renders_nested_list() {
        let mut toc = TocBuilder::new();
        toc.push(1, "Intro");
        toc.push(2, "Details");
        toc.push(2, "More");
        toc.push(1, "Outro");

        assert_eq!(
            toc.render(),
            "<div class=\"toc\">\n<ul>\n\
             <li><a href=\"#intro\">Intro</a>\n<ul>\n\
             <li><a href=\"#details\">Details</a></li>\n\
             <li><a href=\"#more\">More</a></li>\n\
             </ul>\n</li>\n\
             <li><a href=\"#outro\">Outro</a></li>\n\
             </ul>\n</div>"
        );
    }

    #[test]
    fn returning_to_shallower_level_closes_lists() {
        let mut toc = TocBuilder::new();
        toc.push(1, "A");
        toc.push(3, "B");
        toc.push(2, "C");

        let html = toc.render();
        assert_eq!(html.matches("<ul>").count(), html.matches("</ul>").count());
        assert_eq!(html.matches("<li>").count(), html.matches("</li>").count());
    }

    #[test]
    fn titles_are_escaped() {
        let mut toc = TocBuilder::new();
        toc.push(1, "Less < More & Such");

        let html = toc.render();
        assert!(html.contains("Less &lt; More &amp; Such"));
        assert!(!html.contains("< More"));
    }

    #[test]
    fn empty_toc_renders_nothing() {
        assert_eq!(TocBuilder::new().render(), "");
    }
}
