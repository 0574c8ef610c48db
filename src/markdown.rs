//! Markdown Rendering
//!
//! Sprint and task descriptions are Markdown. Raw HTML in a description
//! is shown as text, and link or image targets outside http(s), mailto
//! and relative addresses are replaced by `#`.

use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag};

const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

fn get_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

/// Whether a link destination may reach the page as an `href`/`src`
pub fn is_safe_destination(url: &str) -> bool {
    let url = url.trim();
    // A scheme ends at the first ':' that comes before any '/', '?' or '#'
    match url.find([':', '/', '?', '#']) {
        Some(end) if url[end..].starts_with(':') => {
            let scheme = url[..end].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

fn sanitize_destination(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_destination(&url) {
        url
    } else {
        log::warn!("[MARKDOWN] Dropped link target '{}'", url);
        CowStr::Borrowed("#")
    }
}

/// Render a description to HTML
pub fn render_markdown(text: &str) -> String {
    let events = Parser::new_ext(text, get_options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_destination(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_destination(dest_url),
            title,
            id,
        }),
        other => other,
    });
    let mut html_output = String::new();
    push_html(&mut html_output, events);
    html_output
}

/// Render for inline use (strips the outer <p> tags)
pub fn render_markdown_inline(text: &str) -> String {
    let html = render_markdown(text);

    html.trim()
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .map(|s| s.to_string())
        .unwrap_or(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = render_markdown("**Goal**: ship ~~v1~~ v2");
        assert!(html.contains("<strong>Goal</strong>"));
        assert!(html.contains("<del>v1</del>"));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_markdown("before <script>alert(1)</script> after");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn script_links_are_neutralised() {
        for text in [
            "[click](javascript:alert(document.cookie))",
            "[click](JavaScript:alert(1))",
            "[data](data:text/html;base64,PHNjcmlwdD4=)",
            "![img](vbscript:msgbox(1))",
        ] {
            let html = render_markdown(text);
            assert!(!html.to_ascii_lowercase().contains("script:"), "{}", html);
            assert!(!html.contains("data:"), "{}", html);
            assert!(html.contains("\"#\""), "{}", html);
        }
    }

    #[test]
    fn ordinary_links_are_kept() {
        let html = render_markdown("[a](https://example.org/x) [b](/api/sprints/1/) [c](mailto:dev@example.org) [d](#sprint/2)");
        assert!(html.contains("href=\"https://example.org/x\""));
        assert!(html.contains("href=\"/api/sprints/1/\""));
        assert!(html.contains("href=\"mailto:dev@example.org\""));
        assert!(html.contains("href=\"#sprint/2\""));
    }

    #[test]
    fn destination_schemes() {
        assert!(is_safe_destination("page/with:colon"));
        assert!(is_safe_destination("?q=a:b"));
        assert!(is_safe_destination("HTTPS://example.org"));
        assert!(!is_safe_destination("  javascript:void(0)"));
        assert!(!is_safe_destination("java\tscript:void(0)"));
        assert!(!is_safe_destination("file:///etc/passwd"));
    }

    #[test]
    fn inline_strips_paragraph() {
        assert_eq!(render_markdown_inline("*fix* login"), "<em>fix</em> login");
    }
}
