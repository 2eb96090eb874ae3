//! Markdown to HTML conversion.

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::blocks::{Block, BlockScanner, Tab};
use crate::escape_html;
use crate::highlight::Highlighter;
use crate::options::MarkdownOptions;
use crate::toc::TocBuilder;

/// Output of one conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Converted body HTML.
    pub html: String,
    /// Table-of-contents fragment; empty when the document has no headings.
    pub toc: String,
}

/// Markdown converter with a fixed extension configuration.
///
/// Construct once and reuse; loading the syntax definitions for
/// highlighting is the expensive part.
pub struct Converter {
    options: MarkdownOptions,
    scanner: BlockScanner,
    highlighter: Highlighter,
}

impl Converter {
    pub fn new(options: MarkdownOptions) -> Self {
        let highlighter = Highlighter::new(options.highlight.clone());
        Self {
            options,
            scanner: BlockScanner::new(),
            highlighter,
        }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Convert a document to body HTML plus a TOC fragment.
    ///
    /// Conversion never fails; malformed input renders best-effort.
    pub fn convert(&self, source: &str) -> Rendered {
        let mut toc = TocBuilder::new();
        let mut tab_sets = 0;
        let html = self.convert_fragment(source, &mut toc, &mut tab_sets);
        Rendered {
            html,
            toc: toc.render(),
        }
    }

    fn convert_fragment(
        &self,
        source: &str,
        toc: &mut TocBuilder,
        tab_sets: &mut usize,
    ) -> String {
        let mut out = String::with_capacity(source.len() * 2);
        for block in self.scanner.scan(source, &self.options) {
            match block {
                Block::Markdown(text) => self.push_markdown(&text, toc, &mut out),
                Block::Admonition {
                    classes,
                    title,
                    body,
                } => self.push_admonition(&classes, title.as_deref(), &body, toc, tab_sets, &mut out),
                Block::Details {
                    classes,
                    title,
                    open,
                    body,
                } => self.push_details(&classes, title.as_deref(), open, &body, toc, tab_sets, &mut out),
                Block::TabbedSet { tabs } => self.push_tabbed(&tabs, toc, tab_sets, &mut out),
            }
        }
        out
    }

    fn push_markdown(&self, text: &str, toc: &mut TocBuilder, out: &mut String) {
        let parser = Parser::new_ext(text, self.parser_options());
        let events = self.map_events(parser, toc);
        html::push_html(out, events.into_iter());
    }

    /// Rewrite the event stream: headings gain anchor ids and feed the TOC,
    /// code blocks go through the highlighter.
    fn map_events<'a>(&self, parser: Parser<'a>, toc: &mut TocBuilder) -> Vec<Event<'a>> {
        let mut events: Vec<Event<'a>> = Vec::new();
        // Buffered heading: level, flattened text, inline events.
        let mut heading: Option<(u8, String, Vec<Event<'a>>)> = None;
        // Buffered code block: language token, source text.
        let mut code: Option<(Option<String>, String)> = None;

        for event in parser {
            match &event {
                Event::Start(Tag::CodeBlock(kind)) if self.options.highlight.enabled => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            let token = info.split_whitespace().next().unwrap_or("");
                            if token.is_empty() {
                                None
                            } else {
                                Some(token.to_string())
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code = Some((lang, String::new()));
                }
                Event::Text(text) if code.is_some() => {
                    if let Some((_, buf)) = code.as_mut() {
                        buf.push_str(text);
                    }
                }
                Event::End(TagEnd::CodeBlock) if code.is_some() => {
                    if let Some((lang, buf)) = code.take() {
                        let html = self.highlighter.render_block(&buf, lang.as_deref());
                        events.push(Event::Html(html.into()));
                    }
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some((*level as u8, String::new(), Vec::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, text, inner)) = heading.take() {
                        let id = toc.push(level, &text);
                        events.push(Event::Html(
                            format!("<h{} id=\"{}\">", level, id).into(),
                        ));
                        events.extend(inner);
                        events.push(Event::Html(format!("</h{}>", level).into()));
                    }
                }
                Event::Text(text) if heading.is_some() => {
                    if let Some((_, buf, _)) = heading.as_mut() {
                        buf.push_str(text);
                    }
                    if let Some((_, _, inner)) = heading.as_mut() {
                        inner.push(event);
                    }
                }
                Event::Code(text) if heading.is_some() => {
                    if let Some((_, buf, _)) = heading.as_mut() {
                        buf.push_str(text);
                    }
                    if let Some((_, _, inner)) = heading.as_mut() {
                        inner.push(event);
                    }
                }
                _ if heading.is_some() => {
                    if let Some((_, _, inner)) = heading.as_mut() {
                        inner.push(event);
                    }
                }
                _ => events.push(event),
            }
        }
        events
    }

    fn push_admonition(
        &self,
        classes: &str,
        title: Option<&str>,
        body: &str,
        toc: &mut TocBuilder,
        tab_sets: &mut usize,
        out: &mut String,
    ) {
        out.push_str(&format!("<div class=\"admonition {}\">\n", classes));
        if let Some(title) = effective_title(classes, title) {
            out.push_str(&format!(
                "<p class=\"admonition-title\">{}</p>\n",
                escape_html(&title)
            ));
        }
        out.push_str(&self.convert_fragment(body, toc, tab_sets));
        out.push_str("</div>\n");
    }

    fn push_details(
        &self,
        classes: &str,
        title: Option<&str>,
        open: bool,
        body: &str,
        toc: &mut TocBuilder,
        tab_sets: &mut usize,
        out: &mut String,
    ) {
        let open_attr = if open { " open" } else { "" };
        out.push_str(&format!("<details class=\"{}\"{}>\n", classes, open_attr));
        if let Some(title) = effective_title(classes, title) {
            out.push_str(&format!("<summary>{}</summary>\n", escape_html(&title)));
        }
        out.push_str(&self.convert_fragment(body, toc, tab_sets));
        out.push_str("</details>\n");
    }

    fn push_tabbed(
        &self,
        tabs: &[Tab],
        toc: &mut TocBuilder,
        tab_sets: &mut usize,
        out: &mut String,
    ) {
        *tab_sets += 1;
        let set = *tab_sets;

        if self.options.tabbed.alternate_style {
            out.push_str(&format!(
                "<div class=\"tabbed-set tabbed-alternate\" data-tabs=\"{}:{}\">\n",
                set,
                tabs.len()
            ));
            for i in 1..=tabs.len() {
                let checked = if i == 1 { "checked=\"checked\" " } else { "" };
                out.push_str(&format!(
                    "<input {}id=\"__tabbed_{}_{}\" name=\"__tabbed_{}\" type=\"radio\" />\n",
                    checked, set, i, set
                ));
            }
            out.push_str("<div class=\"tabbed-labels\">\n");
            for (i, tab) in tabs.iter().enumerate() {
                out.push_str(&format!(
                    "<label for=\"__tabbed_{}_{}\">{}</label>\n",
                    set,
                    i + 1,
                    escape_html(&tab.label)
                ));
            }
            out.push_str("</div>\n<div class=\"tabbed-content\">\n");
            for tab in tabs {
                out.push_str("<div class=\"tabbed-block\">\n");
                out.push_str(&self.convert_fragment(&tab.body, toc, tab_sets));
                out.push_str("</div>\n");
            }
            out.push_str("</div>\n</div>\n");
        } else {
            out.push_str(&format!(
                "<div class=\"tabbed-set\" data-tabs=\"{}:{}\">\n",
                set,
                tabs.len()
            ));
            for (i, tab) in tabs.iter().enumerate() {
                let checked = if i == 0 { "checked=\"checked\" " } else { "" };
                out.push_str(&format!(
                    "<input {}id=\"__tabbed_{}_{}\" name=\"__tabbed_{}\" type=\"radio\" />\n",
                    checked,
                    set,
                    i + 1,
                    set
                ));
                out.push_str(&format!(
                    "<label for=\"__tabbed_{}_{}\">{}</label>\n",
                    set,
                    i + 1,
                    escape_html(&tab.label)
                ));
                out.push_str("<div class=\"tabbed-content\">\n");
                out.push_str(&self.convert_fragment(&tab.body, toc, tab_sets));
                out.push_str("</div>\n");
            }
            out.push_str("</div>\n");
        }
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.options.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.options.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.options.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.options.tasklists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        options
    }
}

/// Title shown for an admonition or foldout: an explicit empty title
/// suppresses it, no title defaults to the capitalized first class.
fn effective_title(classes: &str, title: Option<&str>) -> Option<String> {
    match title {
        Some("") => None,
        Some(title) => Some(title.to_string()),
        None => {
            let first = classes.split_whitespace().next().unwrap_or("note");
            Some(capitalize(first))
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
