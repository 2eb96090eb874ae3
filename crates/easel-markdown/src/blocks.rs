//! Line-level scanner for the block extensions.
//!
//! Splits a document into plain Markdown segments and extension blocks
//! (`!!!` admonitions, `???` foldouts, `===` tabs) ahead of the Markdown
//! parser. Block bodies are the following lines indented by four spaces or
//! a tab; they are dedented here and converted recursively by the caller.

use regex::Regex;

use crate::options::MarkdownOptions;

/// One top-level piece of a document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Block {
    /// Plain Markdown, handed to the parser untouched.
    Markdown(String),

    /// `!!! type "Title"` call-out.
    Admonition {
        classes: String,
        title: Option<String>,
        body: String,
    },

    /// `??? type "Title"` foldout; `open` when the marker was `???+`.
    Details {
        classes: String,
        title: Option<String>,
        open: bool,
        body: String,
    },

    /// A run of consecutive `=== "Label"` tabs.
    TabbedSet { tabs: Vec<Tab> },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tab {
    pub label: String,
    pub body: String,
}

pub(crate) struct BlockScanner {
    admonition: Regex,
    details: Regex,
    tab: Regex,
}

impl BlockScanner {
    pub fn new() -> Self {
        Self {
            admonition: Regex::new(
                r#"^!!!\s+(?P<classes>[\w-]+(?:\s+[\w-]+)*)(?:\s+"(?P<title>[^"]*)")?\s*$"#,
            )
            .expect("Invalid admonition regex"),
            details: Regex::new(
                r#"^\?\?\?(?P<plus>\+)?\s+(?P<classes>[\w-]+(?:\s+[\w-]+)*)(?:\s+"(?P<title>[^"]*)")?\s*$"#,
            )
            .expect("Invalid details regex"),
            tab: Regex::new(r#"^===\s+"(?P<label>[^"]*)"\s*$"#).expect("Invalid tab regex"),
        }
    }

    /// Split `source` into blocks. Markers inside fenced code are ignored.
    pub fn scan(&self, source: &str, options: &MarkdownOptions) -> Vec<Block> {
        let lines: Vec<&str> = source.lines().collect();
        let mut blocks = Vec::new();
        let mut plain: Vec<&str> = Vec::new();
        let mut fence: Option<(char, usize)> = None;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if let Some((ch, len)) = fence {
                plain.push(line);
                if is_closing_fence(line, ch, len) {
                    fence = None;
                }
                i += 1;
                continue;
            }
            if let Some(run) = fence_run(line) {
                fence = Some(run);
                plain.push(line);
                i += 1;
                continue;
            }

            if options.admonitions {
                if let Some(caps) = self.admonition.captures(line) {
                    flush_plain(&mut plain, &mut blocks);
                    let (body, next) = take_indented_body(&lines, i + 1);
                    blocks.push(Block::Admonition {
                        classes: normalize_classes(&caps["classes"]),
                        title: caps.name("title").map(|m| m.as_str().to_string()),
                        body,
                    });
                    i = next;
                    continue;
                }
            }

            if options.details {
                if let Some(caps) = self.details.captures(line) {
                    flush_plain(&mut plain, &mut blocks);
                    let (body, next) = take_indented_body(&lines, i + 1);
                    blocks.push(Block::Details {
                        classes: normalize_classes(&caps["classes"]),
                        title: caps.name("title").map(|m| m.as_str().to_string()),
                        open: caps.name("plus").is_some(),
                        body,
                    });
                    i = next;
                    continue;
                }
            }

            if options.tabbed.enabled && self.tab.is_match(line) {
                flush_plain(&mut plain, &mut blocks);
                let mut tabs = Vec::new();
                // Consecutive tab markers form one set; anything else ends it.
                loop {
                    let caps = match self.tab.captures(lines[i]) {
                        Some(caps) => caps,
                        None => break,
                    };
                    let (body, next) = take_indented_body(&lines, i + 1);
                    tabs.push(Tab {
                        label: caps["label"].to_string(),
                        body,
                    });
                    i = next;
                    if i >= lines.len() || !self.tab.is_match(lines[i]) {
                        break;
                    }
                }
                blocks.push(Block::TabbedSet { tabs });
                continue;
            }

            plain.push(line);
            i += 1;
        }

        flush_plain(&mut plain, &mut blocks);
        blocks
    }
}

fn flush_plain(plain: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    // Boundary blank lines separate segments; they carry no content.
    if let Some(first) = plain.iter().position(|line| !line.trim().is_empty()) {
        let last = plain
            .iter()
            .rposition(|line| !line.trim().is_empty())
            .unwrap_or(first);
        blocks.push(Block::Markdown(plain[first..=last].join("\n")));
    }
    plain.clear();
}

/// Collect the indented body starting at `start`. Interior blank lines are
/// kept; blank lines after the last indented line are consumed but not part
/// of the body. Returns the dedented body and the index to resume at.
fn take_indented_body(lines: &[&str], start: usize) -> (String, usize) {
    let mut body: Vec<String> = Vec::new();
    let mut pending_blanks = 0;
    let mut i = start;

    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() {
            pending_blanks += 1;
            i += 1;
            continue;
        }
        match dedent(line) {
            Some(rest) => {
                for _ in 0..pending_blanks {
                    body.push(String::new());
                }
                pending_blanks = 0;
                body.push(rest.to_string());
                i += 1;
            }
            None => break,
        }
    }

    (body.join("\n"), i)
}

/// Strip one level of body indentation: four spaces or one tab.
fn dedent(line: &str) -> Option<&str> {
    line.strip_prefix("    ").or_else(|| line.strip_prefix('\t'))
}

fn normalize_classes(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fence character and run length when `line` opens or closes a fence.
fn fence_run(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() >= 4 {
        return None;
    }
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run = trimmed.chars().take_while(|&c| c == first).count();
    (run >= 3).then_some((first, run))
}

fn is_closing_fence(line: &str, ch: char, len: usize) -> bool {
    match fence_run(line) {
        Some((c, n)) if c == ch && n >= len => {
            line.trim_start().trim_start_matches(c).trim().is_empty()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(source: &str) -> Vec<Block> {
        BlockScanner::new().scan(source, &MarkdownOptions::default())
    }

    #[test]
    fn plain_text_is_one_block() {
        let blocks = scan("# Title\n\nSome paragraph.\n");

        assert_eq!(
            blocks,
            vec![Block::Markdown("# Title\n\nSome paragraph.".to_string())]
        );
    }

    #[test]
    fn admonition_with_title_and_body() {
        let blocks = scan("before\n\n!!! note \"Heads Up\"\n    First line.\n    Second line.\n\nafter\n");

        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[1],
            Block::Admonition {
                classes: "note".to_string(),
                title: Some("Heads Up".to_string()),
                body: "First line.\nSecond line.".to_string(),
            }
        );
        assert_eq!(blocks[2], Block::Markdown("after".to_string()));
    }

    #[test]
    fn admonition_without_title() {
        let blocks = scan("!!! warning\n    Careful.\n");

        assert_eq!(
            blocks,
            vec![Block::Admonition {
                classes: "warning".to_string(),
                title: None,
                body: "Careful.".to_string(),
            }]
        );
    }

    #[test]
    fn admonition_with_empty_title_keeps_it_empty() {
        let blocks = scan("!!! note \"\"\n    Body.\n");

        match &blocks[0] {
            Block::Admonition { title, .. } => assert_eq!(title.as_deref(), Some("")),
            other => panic!("expected admonition, got {:?}", other),
        }
    }

    #[test]
    fn multiple_classes_are_kept() {
        let blocks = scan("!!! note custom\n    Body.\n");

        match &blocks[0] {
            Block::Admonition { classes, .. } => assert_eq!(classes, "note custom"),
            other => panic!("expected admonition, got {:?}", other),
        }
    }

    #[test]
    fn blank_lines_inside_body_are_kept() {
        let blocks = scan("!!! note\n    One.\n\n    Two.\n");

        match &blocks[0] {
            Block::Admonition { body, .. } => assert_eq!(body, "One.\n\nTwo."),
            other => panic!("expected admonition, got {:?}", other),
        }
    }

    #[test]
    fn details_marker_with_plus_is_open() {
        let blocks = scan("???+ tip \"Show Me\"\n    Hidden.\n");

        assert_eq!(
            blocks,
            vec![Block::Details {
                classes: "tip".to_string(),
                title: Some("Show Me".to_string()),
                open: true,
                body: "Hidden.".to_string(),
            }]
        );
    }

    #[test]
    fn details_marker_without_plus_is_closed() {
        let blocks = scan("??? info\n    Hidden.\n");

        match &blocks[0] {
            Block::Details { open, .. } => assert!(!open),
            other => panic!("expected details, got {:?}", other),
        }
    }

    #[test]
    fn consecutive_tabs_group_into_one_set() {
        let blocks = scan(
            "=== \"One\"\n    first\n\n=== \"Two\"\n    second\n\ntrailing text\n",
        );

        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::TabbedSet {
                tabs: vec![
                    Tab {
                        label: "One".to_string(),
                        body: "first".to_string(),
                    },
                    Tab {
                        label: "Two".to_string(),
                        body: "second".to_string(),
                    },
                ],
            }
        );
        assert_eq!(blocks[1], Block::Markdown("trailing text".to_string()));
    }

    #[test]
    fn separated_tab_runs_form_separate_sets() {
        let blocks = scan("=== \"A\"\n    a\n\nbetween\n\n=== \"B\"\n    b\n");

        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[0], Block::TabbedSet { .. }));
        assert_eq!(blocks[1], Block::Markdown("between".to_string()));
        assert!(matches!(blocks[2], Block::TabbedSet { .. }));
    }

    #[test]
    fn markers_inside_fences_are_not_blocks() {
        let blocks = scan("```\n!!! note\n    not a block\n```\n");

        assert_eq!(
            blocks,
            vec![Block::Markdown(
                "```\n!!! note\n    not a block\n```".to_string()
            )]
        );
    }

    #[test]
    fn longer_closing_fence_closes_shorter_opening() {
        let blocks = scan("````\n!!! note\n`````\n!!! note\n    body\n");

        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[1], Block::Admonition { .. }));
    }

    #[test]
    fn setext_underline_is_not_a_tab() {
        let blocks = scan("Heading\n===\n");

        assert_eq!(blocks, vec![Block::Markdown("Heading\n===".to_string())]);
    }

    #[test]
    fn tab_indented_body_line_is_dedented() {
        let blocks = scan("!!! note\n\tTabbed body.\n");

        match &blocks[0] {
            Block::Admonition { body, .. } => assert_eq!(body, "Tabbed body."),
            other => panic!("expected admonition, got {:?}", other),
        }
    }

    #[test]
    fn disabled_extensions_stay_plain() {
        let options = MarkdownOptions {
            admonitions: false,
            ..Default::default()
        };
        let blocks = BlockScanner::new().scan("!!! note\n    Body.\n", &options);

        assert_eq!(
            blocks,
            vec![Block::Markdown("!!! note\n    Body.".to_string())]
        );
    }
}
