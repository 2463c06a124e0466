// src/render/escape.rs
// =============================================================================
// HTML entity escaping for user-supplied text.
//
// Every URL and page URL in the result set comes from a crawled page, which
// means it is attacker-controlled text. Anything we interpolate into HTML
// must pass through here first - this is a security contract, not cosmetics.
// The table is fixed and total: the five characters & < > " ' and nothing
// else.
// =============================================================================

/// Escapes the five HTML-significant characters in `raw`.
///
/// Safe to call on already-plain text; everything else passes through
/// unchanged, including non-ASCII.
pub fn escape_html(raw: &str) -> String {
    // & must be handled like the rest in a single pass; a naive sequence of
    // replace() calls would double-escape the entities it just produced
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}
