//! Text normalization applied to scraped or pasted job descriptions before prompting.
//!
//! Lossy on purpose: markup, links, and punctuation are noise to the extraction prompt.
//! The passes run in a fixed order because each one operates on the output of the previous.

use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*?>").expect("valid HTML tag pattern"));

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\\(\\,)]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
        .expect("valid URL pattern")
});

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("valid character class pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Strips tags, URLs, and punctuation, then collapses whitespace to single spaces.
///
/// Total and idempotent. The output alphabet is `[A-Za-z0-9 ]` with no leading,
/// trailing, or repeated spaces.
pub fn normalize_text(text: &str) -> String {
    let text = HTML_TAG.replace_all(text, "");
    let text = URL.replace_all(&text, "");
    let text = NON_ALPHANUMERIC.replace_all(&text, " ");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_normalized_alphabet(s: &str) {
        assert!(
            s.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '),
            "unexpected character in {s:?}"
        );
        assert!(!s.contains("  "), "double space in {s:?}");
        assert_eq!(s, s.trim());
    }

    const SCRAPED_JD: &str = r#"
        <div class="job"><h1>Senior Rust Engineer</h1>
        <p>Apply at https://careers.acme.io/jobs/42?ref=board&utm=x today!</p>
        <ul><li>5+ years   experience</li><li>Tokio, Axum &amp; SQL</li></ul>
        Salary: $150k–$180k (négociable)</div>
    "#;

    #[test]
    fn test_strips_html_tags() {
        assert_eq!(normalize_text("<b>Rust</b> <i>Engineer</i>"), "Rust Engineer");
    }

    #[test]
    fn test_strips_urls() {
        assert_eq!(
            normalize_text("see http://example.com/a/b and https://x.io/?q=1 now"),
            "see and now"
        );
    }

    #[test]
    fn test_replaces_punctuation_with_space() {
        assert_eq!(normalize_text("C++/Rust, Go; (Python)"), "C Rust Go Python");
    }

    #[test]
    fn test_collapses_whitespace_including_single_newlines() {
        assert_eq!(normalize_text("a\nb\t\tc   d\r\n e"), "a b c d e");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(normalize_text("   hello world \n"), "hello world");
    }

    #[test]
    fn test_empty_and_symbol_only_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("!!! ??? ---"), "");
    }

    #[test]
    fn test_tags_removed_before_punctuation_pass() {
        // If punctuation went first, the tag name would survive as a word.
        assert_eq!(normalize_text("<span>Go</span>"), "Go");
    }

    #[test]
    fn test_scraped_fixture_output_alphabet() {
        let out = normalize_text(SCRAPED_JD);
        assert_normalized_alphabet(&out);
        assert!(out.starts_with("Senior Rust Engineer Apply at today"));
        assert!(!out.contains("careers"));
        assert!(out.contains("Tokio Axum amp SQL"));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            SCRAPED_JD,
            "",
            "plain text",
            "  <a href='https://x.y'>link</a>\n\n\tTabs & stuff ",
            "unicode: café, naïve — “quotes”",
            "<<>>http://",
        ];
        for input in inputs {
            let once = normalize_text(input);
            assert_normalized_alphabet(&once);
            assert_eq!(normalize_text(&once), once, "not idempotent for {input:?}");
        }
    }
}
