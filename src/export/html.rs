//! HTML helpers for generated documents.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ai::prompts::PRIMARY_COLOR;
use crate::workflow::WebSource;

static BODY_INNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<body[^>]*>([\s\S]*)</body>").expect("Invalid regex"));

static CLOSING_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</body>").expect("Invalid regex"));

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("Invalid regex"));

static BLOCK_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|h[1-6]|li|tr|table)>").expect("Invalid regex")
});

static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n+").expect("Invalid regex"));

/// Inner content of `<body ...>...</body>`, or the whole document when absent
pub fn extract_body_inner(html: &str) -> &str {
    BODY_INNER
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|inner| !inner.is_empty())
        .unwrap_or(html)
}

/// Insert a "Sources" block before the first `</body>`, or append it
pub fn inject_sources(html: &str, sources: &[WebSource]) -> String {
    if sources.is_empty() {
        return html.to_string();
    }

    let items: String = sources
        .iter()
        .map(|s| {
            format!(
                r#"<li><a href="{}" target="_blank" style="color: {};">{}</a></li>"#,
                s.uri,
                PRIMARY_COLOR,
                s.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(&s.uri)
            )
        })
        .collect();

    let block = format!(
        r#"<div style="margin-top: 20px; padding-top: 10px; border-top: 1px solid #eeeeee; text-align: left; font-size: 10px; color: #777777;"><strong>Sources:</strong><ul>{}</ul></div>"#,
        items
    );

    match CLOSING_BODY.find(html) {
        Some(m) => format!("{}{}{}", &html[..m.start()], block, &html[m.start()..]),
        None => format!("{}{}", html, block),
    }
}

/// Rough plain-text rendering, used as the clipboard alternative
pub fn to_plain_text(html: &str) -> String {
    let with_breaks = BLOCK_BREAK.replace_all(html, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"");
    BLANK_LINES
        .replace_all(decoded.trim(), "\n\n")
        .into_owned()
}
