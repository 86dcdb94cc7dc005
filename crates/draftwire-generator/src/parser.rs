//! Two-stage parsing of generator output into a draft
//!
//! The model is asked for a JSON object, but it is known to wrap the
//! result in markdown fences or plain prose instead of hard-failing.
//! Stage one strips an optional code fence and parses strict JSON;
//! stage two falls back to splitting on a `Post:` marker. Parsing
//! therefore never fails a row - at worst the post comes back empty.

use draftwire_domain::Draft;
use tracing::warn;

/// Parse raw generator output into a draft
pub fn parse_draft(content: &str) -> Draft {
    let cleaned = strip_code_fence(content);

    match serde_json::from_str::<Draft>(cleaned) {
        Ok(draft) => draft,
        Err(e) => {
            warn!(error = %e, "structured parse failed, using marker fallback");
            split_on_post_marker(content)
        }
    }
}

/// Strip a leading/trailing markdown code fence if present
///
/// Handles an optional language tag after the opening fence,
/// case-insensitively (```json, ```JSON, bare ```).
fn strip_code_fence(content: &str) -> &str {
    let mut text = content.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the language tag up to the first newline
        text = match rest.split_once('\n') {
            Some((_tag, body)) => body,
            None => rest,
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Heuristic fallback: split on a case-insensitive `Post:` marker
///
/// Everything before the marker, minus a leading `Summary:` label, is
/// the summary; everything after is the post (empty if absent).
fn split_on_post_marker(content: &str) -> Draft {
    let (summary_part, post_part) = match find_marker(content, "post:") {
        Some(idx) => (&content[..idx], &content[idx + "post:".len()..]),
        None => (content, ""),
    };

    let summary = match find_marker(summary_part, "summary:") {
        Some(idx) if summary_part[..idx].trim().is_empty() => {
            &summary_part[idx + "summary:".len()..]
        }
        _ => summary_part,
    };

    Draft::new(summary.trim(), post_part.trim())
}

/// Byte offset of a case-insensitive ASCII marker, if present
///
/// Byte-wise search so offsets stay valid even when the surrounding
/// text contains non-ASCII characters.
fn find_marker(haystack: &str, marker: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(marker.len())
        .position(|window| window.eq_ignore_ascii_case(marker.as_bytes()))
}
