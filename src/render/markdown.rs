use pulldown_cmark::{html, Options, Parser};

/// Converts review markdown to sanitized HTML.
///
/// Fenced code blocks are part of CommonMark; tables and strikethrough are
/// switched on as well. The output passes through ammonia, which keeps the
/// `language-*` class pulldown-cmark puts on `<code>`.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);
    let mut raw = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut raw, parser);

    ammonia::Builder::default()
        .add_tag_attributes("code", &["class"])
        .clean(&raw)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_formatting() {
        let html = to_html("Loved it. **Must** see.");
        assert!(html.contains("<p>Loved it. <strong>Must</strong> see.</p>"));
    }

    #[test]
    fn test_fenced_code_block() {
        let html = to_html("```rust\nfn main() {}\n```");
        assert!(html.contains("<pre><code class=\"language-rust\">fn main() {}"));
    }

    #[test]
    fn test_script_is_stripped() {
        let html = to_html("Nice <script>alert('x')</script> film");
        assert!(!html.contains("<script"));
        assert!(!html.contains("alert"));
    }

    #[test]
    fn test_event_handlers_are_stripped() {
        let html = to_html("<img src=\"p.jpg\" onerror=\"alert(1)\">");
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn test_table() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }
}
