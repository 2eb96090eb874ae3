//! Literal placeholder substitution for the page template.

/// Token replaced by the page title.
pub const TITLE_TOKEN: &str = "{{ title }}";
/// Token replaced by the converted body HTML.
pub const CONTENT_TOKEN: &str = "{{ content }}";
/// Token replaced by the table-of-contents fragment.
pub const TOC_TOKEN: &str = "{{ toc }}";

/// Values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContext {
    pub title: String,
    pub content: String,
    pub toc: String,
}

/// Substitute the fixed tokens in `template`.
///
/// Plain text replacement, not a template language: every occurrence of a
/// token is replaced, tokens the template does not use are ignored, and
/// everything else (including other `{{ ... }}` sequences) passes through
/// untouched.
pub fn render_page(template: &str, page: &PageContext) -> String {
    template
        .replace(TITLE_TOKEN, &page.title)
        .replace(CONTENT_TOKEN, &page.content)
        .replace(TOC_TOKEN, &page.toc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page() -> PageContext {
        PageContext {
            title: "My Page".to_string(),
            content: "<p>Body</p>".to_string(),
            toc: "<div class=\"toc\"></div>".to_string(),
        }
    }

    #[test]
    fn substitutes_every_token() {
        let html = render_page(
            "<title>{{ title }}</title>{{ toc }}<main>{{ content }}</main>",
            &page(),
        );

        assert_eq!(
            html,
            "<title>My Page</title><div class=\"toc\"></div><main><p>Body</p></main>"
        );
    }

    #[test]
    fn replaces_repeated_tokens() {
        let html = render_page("{{ title }} and {{ title }}", &page());

        assert_eq!(html, "My Page and My Page");
    }

    #[test]
    fn ignores_tokens_missing_from_the_template() {
        let html = render_page("<main>{{ content }}</main>", &page());

        assert_eq!(html, "<main><p>Body</p></main>");
    }

    #[test]
    fn leaves_unknown_placeholders_alone() {
        let html = render_page("{{ author }} wrote {{ title }}", &page());

        assert_eq!(html, "{{ author }} wrote My Page");
    }

    #[test]
    fn requires_exact_token_spelling() {
        let html = render_page("{{title}} {{ title }}", &page());

        assert_eq!(html, "{{title}} My Page");
    }
}
