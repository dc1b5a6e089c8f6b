//! Markdown rendering for assistant content
//!
//! Assistant replies arrive as CommonMark/GFM text. Rendering must never
//! pass raw HTML through: embedded tags are demoted to text so they arrive
//! escaped on the page.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Renders assistant markdown to a display format
pub trait MarkdownRenderer: Send + Sync {
    /// Render markdown to safe markup (no raw HTML passthrough)
    fn render(&self, markdown: &str) -> String;
}

fn gfm_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// HTML renderer with raw HTML blocks and inlines escaped as text
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl MarkdownRenderer for HtmlRenderer {
    fn render(&self, markdown: &str) -> String {
        // Demoting Html events to Text makes push_html escape them.
        let parser = Parser::new_ext(markdown, gfm_options()).map(|event| match event {
            Event::Html(raw) => Event::Text(raw),
            Event::InlineHtml(raw) => Event::Text(raw),
            other => other,
        });

        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }
}

/// Terminal renderer: headings and strong text bolded, list bullets
/// normalized, code spans verbatim
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiRenderer;

impl MarkdownRenderer for AnsiRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, gfm_options());

        let mut out = String::new();
        let mut list_depth: usize = 0;

        for event in parser {
            match event {
                Event::Start(Tag::Heading { .. }) | Event::Start(Tag::Strong) => {
                    out.push_str(BOLD);
                }
                Event::End(TagEnd::Heading(_)) => {
                    out.push_str(RESET);
                    out.push_str("\n\n");
                }
                Event::End(TagEnd::Strong) => out.push_str(RESET),
                Event::Start(Tag::List(_)) => {
                    // a nested list opens mid-item, before the item's line break
                    if list_depth > 0 && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    list_depth += 1;
                }
                Event::End(TagEnd::List(_)) => {
                    list_depth = list_depth.saturating_sub(1);
                    if list_depth == 0 {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::Item) => {
                    for _ in 1..list_depth {
                        out.push_str("  ");
                    }
                    out.push_str("• ");
                }
                Event::End(TagEnd::Item) => out.push('\n'),
                Event::End(TagEnd::Paragraph) => out.push_str("\n\n"),
                Event::End(TagEnd::CodeBlock) => out.push('\n'),
                Event::Text(text) => out.push_str(&text),
                Event::Code(code) => out.push_str(&code),
                Event::SoftBreak | Event::HardBreak => out.push('\n'),
                Event::Rule => out.push_str("---\n"),
                _ => {}
            }
        }

        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_renders_formatting() {
        let out = HtmlRenderer.render("**bold** and *italic* and `code`");
        assert!(out.contains("<strong>bold</strong>"));
        assert!(out.contains("<em>italic</em>"));
        assert!(out.contains("<code>code</code>"));
    }

    #[test]
    fn test_html_escapes_raw_blocks() {
        let out = HtmlRenderer.render("<script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_html_escapes_inline_tags() {
        let out = HtmlRenderer.render("see <b>this</b> word");
        assert!(!out.contains("<b>"));
        assert!(out.contains("&lt;b&gt;"));
        assert!(out.contains("this"));
    }

    #[test]
    fn test_ansi_bolds_headings_and_strong() {
        let out = AnsiRenderer.render("# Eligibility\n\nYou **must** apply.");
        assert!(out.contains("\x1b[1mEligibility\x1b[0m"));
        assert!(out.contains("\x1b[1mmust\x1b[0m"));
    }

    #[test]
    fn test_ansi_normalizes_bullets() {
        let out = AnsiRenderer.render("- one\n- two\n  - nested");
        assert!(out.contains("• one"));
        assert!(out.contains("• two"));
        assert!(out.contains("  • nested"));
    }

    #[test]
    fn test_ansi_keeps_code_verbatim() {
        let out = AnsiRenderer.render("run `pmay-status --check` now");
        assert!(out.contains("pmay-status --check"));
    }
}
