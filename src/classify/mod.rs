//! Content classifier. Heuristic text → url, code or text.
//!
//! Not a parser. Scores the presence of a handful of signals and picks
//! a bucket; misclassification is acceptable, nondeterminism is not.
//! [`classify`] is a pure function with no state between calls.

pub mod patterns;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(patterns::URL).expect("URL pattern compiles"));

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(patterns::LEADING_DECLARATION).expect("declaration pattern compiles")
});

/// Semantic bucket for captured text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    Url,
    Code,
    Text,
}

impl TextKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TextKind::Url => "url",
            TextKind::Code => "code",
            TextKind::Text => "text",
        }
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a string.
///
/// URL detection runs on the trimmed text and must match the whole
/// string. Code detection runs on the raw text and requires at least
/// [`patterns::CODE_THRESHOLD`] distinct signals.
pub fn classify(text: &str) -> TextKind {
    if URL_RE.is_match(text.trim()) {
        return TextKind::Url;
    }
    if code_signal_count(text) >= patterns::CODE_THRESHOLD {
        TextKind::Code
    } else {
        TextKind::Text
    }
}

/// Count how many distinct code signals fire for `text`.
pub fn code_signal_count(text: &str) -> usize {
    let keywords = patterns::KEYWORDS
        .iter()
        .filter(|kw| text.contains(**kw))
        .count();

    let structural = [
        text.contains('{') && text.contains('}'),
        text.contains("=>"),
        text.contains("//") || text.contains("/*"),
        DECLARATION_RE.is_match(text),
    ];

    keywords + structural.iter().filter(|fired| **fired).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_string_url() {
        assert_eq!(classify("https://example.com/path"), TextKind::Url);
        assert_eq!(classify("  http://localhost:8080/x?y=1\n"), TextKind::Url);
        assert_eq!(classify("ftp://mirror.example.net/iso"), TextKind::Url);
    }

    #[test]
    fn url_inside_sentence_is_text() {
        assert_eq!(classify("see https://example.com for info"), TextKind::Text);
    }

    #[test]
    fn unsupported_scheme_is_not_url() {
        assert_ne!(classify("mailto:someone@example.com"), TextKind::Url);
        assert_ne!(classify("file:///etc/hosts"), TextKind::Url);
    }

    #[test]
    fn multiline_url_is_not_url() {
        assert_ne!(classify("https://a.example\nhttps://b.example"), TextKind::Url);
    }

    #[test]
    fn javascript_is_code() {
        let src = "const add = (a, b) => {\n  return a + b;\n};";
        assert_eq!(classify(src), TextKind::Code);
    }

    #[test]
    fn python_is_code() {
        let src = "import os\n\ndef main():\n    print(os.getcwd())";
        assert_eq!(classify(src), TextKind::Code);
    }

    #[test]
    fn single_signal_is_not_enough() {
        // Only the brace pair fires.
        assert_eq!(classify("the set {1, 2, 3}"), TextKind::Text);
        assert_eq!(code_signal_count("the set {1, 2, 3}"), 1);
    }

    #[test]
    fn repeated_signal_counts_once() {
        // "let " keyword plus the leading-declaration regex.
        assert_eq!(code_signal_count("let let let let"), 2);
    }

    #[test]
    fn prose_is_text() {
        assert_eq!(
            classify("Meeting moved to Thursday, bring the slides."),
            TextKind::Text
        );
        assert_eq!(classify(""), TextKind::Text);
    }

    #[test]
    fn deterministic_across_calls() {
        let inputs = [
            "https://example.com/path",
            "fn main() { let x = 1; }",
            "plain words",
            "// note\nvar x",
        ];
        for input in inputs {
            assert_eq!(classify(input), classify(input), "unstable for {input:?}");
        }
    }
}
