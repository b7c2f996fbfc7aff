//! Download file names derived from a document subject.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid regex"));

/// Spaces become `_`, then anything outside `[A-Za-z0-9_]` is dropped
pub fn sanitize_subject(subject: &str) -> String {
    let underscored = subject.replace(' ', "_");
    DISALLOWED.replace_all(&underscored, "").into_owned()
}

/// `<sanitized subject>.html`, or `<default_name>.html` when nothing survives
pub fn download_name(subject: &str, default_name: &str) -> String {
    let stem = sanitize_subject(subject);
    if stem.is_empty() {
        format!("{}.html", default_name)
    } else {
        format!("{}.html", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_subject() {
        assert_eq!(sanitize_subject("Your Auto Quote: 2024!"), "Your_Auto_Quote_2024");
        assert_eq!(sanitize_subject("Résumé & more"), "Rsum__more");
        assert_eq!(sanitize_subject("a-b.c"), "abc");
    }

    #[test]
    fn test_download_name_falls_back() {
        assert_eq!(download_name("Policy Review", "document"), "Policy_Review.html");
        assert_eq!(download_name("", "quote_proposal"), "quote_proposal.html");
        assert_eq!(download_name("!!! ???", "property_report"), "_.html");
        assert_eq!(download_name("***", "property_report"), "property_report.html");
    }
}
