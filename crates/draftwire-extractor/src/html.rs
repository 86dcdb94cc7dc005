//! HTML to plain text conversion
//!
//! A regex heuristic, not a real HTML parser: good enough to hand an
//! article body to the generator, and deliberately tolerant of broken
//! markup.

use regex::Regex;
use std::sync::OnceLock;

/// Maximum number of characters of extracted text
///
/// Bounds downstream prompt size. Truncation is silent; partial
/// content is acceptable generator input.
pub const MAX_TEXT_CHARS: usize = 8000;

fn script_blocks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script\b.*?</script>").unwrap())
}

fn style_blocks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style\b.*?</style>").unwrap())
}

fn tags() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Convert an HTML document into normalized plain text
///
/// Strips script/style blocks and remaining tags, collapses common
/// entities and whitespace runs, trims, and truncates to
/// [`MAX_TEXT_CHARS`] characters.
pub fn html_to_text(html: &str) -> String {
    let text = script_blocks().replace_all(html, " ");
    let text = style_blocks().replace_all(&text, " ");
    let text = tags().replace_all(&text, " ");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let text = whitespace().replace_all(&text, " ");
    let text = text.trim();

    if text.chars().count() > MAX_TEXT_CHARS {
        text.chars().take(MAX_TEXT_CHARS).collect()
    } else {
        text.to_string()
    }
}
