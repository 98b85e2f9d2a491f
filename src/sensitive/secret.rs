//! Secret-likeness heuristic for copied text.
//!
//! A string is first screened against shapes that are common and
//! harmless (URLs, hex colors, code, phone numbers, prose). Survivors
//! are judged on character-class mix and diversity, or on well-known
//! API key prefixes and base64 shape.

use std::collections::HashSet;

const MIN_LEN: usize = 8;
const MAX_LEN: usize = 128;

/// More whitespace than this reads as prose.
const MAX_WHITESPACE: usize = 2;

/// Minimum `unique chars / total chars` for the character-class rule.
const MIN_DIVERSITY: f64 = 0.4;

/// Base64 rule only applies above this length.
const BASE64_MIN_LEN: usize = 20;

const URL_PREFIXES: &[&str] = &["http://", "https://", "ftp://", "www."];
const DOMAIN_MARKERS: &[&str] = &[".com", ".org", ".net"];

/// Matched case-insensitively as substrings. Short entries such as
/// `if` and `int` make this screen aggressive.
const CODE_KEYWORDS: &[&str] = &[
    "function", "import", "export", "const", "let", "var", "class", "def", "return", "if",
    "else", "for", "while", "public", "private", "static", "void", "int", "string",
];

const BRACKET_PAIRS: &[&str] = &["()", "{}", "[]"];

const API_KEY_PREFIXES: &[&str] = &[
    "sk_", "pk_", "api_", "key_", "token_", "AIza", "AKIA", "ya29.", "ghp_", "gho_",
];

/// Returns `true` if `text` looks like a password, token or key.
pub fn is_likely_secret(text: &str) -> bool {
    let len = text.chars().count();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return false;
    }

    if looks_like_url(text)
        || is_hex_color(text)
        || looks_like_code(text)
        || is_phone_number(text)
        || text.chars().filter(|c| c.is_whitespace()).count() > MAX_WHITESPACE
    {
        return false;
    }

    if character_class_count(text) >= 3 && diversity(text, len) >= MIN_DIVERSITY {
        return true;
    }

    looks_like_api_key(text, len)
}

fn looks_like_url(text: &str) -> bool {
    let lower = text.to_lowercase();
    URL_PREFIXES.iter().any(|p| lower.starts_with(p))
        || DOMAIN_MARKERS.iter().any(|m| text.contains(m))
}

/// `#RRGGBB` or `0xRRGGBB`, ignoring surrounding spaces and tabs.
fn is_hex_color(text: &str) -> bool {
    let trimmed = text.trim_matches(|c: char| c == ' ' || c == '\t');
    let hex = if let Some(rest) = trimmed.strip_prefix('#') {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("0x") {
        rest
    } else {
        return false;
    };
    hex.chars().count() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn looks_like_code(text: &str) -> bool {
    let lower = text.to_lowercase();
    CODE_KEYWORDS.iter().any(|kw| lower.contains(kw))
        || BRACKET_PAIRS.iter().any(|pair| text.contains(pair))
}

/// 10–15 digits once separators are removed, with an optional leading `+`.
fn is_phone_number(text: &str) -> bool {
    let cleaned: String = text
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')' | '.')))
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    let count = digits.chars().count();
    (10..=15).contains(&count) && digits.chars().all(char::is_numeric)
}

/// Number of classes present among upper, lower, digit and symbol.
fn character_class_count(text: &str) -> usize {
    let has_upper = text.chars().any(char::is_uppercase);
    let has_lower = text.chars().any(char::is_lowercase);
    let has_digit = text.chars().any(char::is_numeric);
    let has_symbol = text
        .chars()
        .any(|c| !c.is_alphabetic() && !c.is_numeric() && !c.is_whitespace());
    [has_upper, has_lower, has_digit, has_symbol]
        .iter()
        .filter(|present| **present)
        .count()
}

fn diversity(text: &str, len: usize) -> f64 {
    let unique: HashSet<char> = text.chars().collect();
    unique.len() as f64 / len as f64
}

fn looks_like_api_key(text: &str, len: usize) -> bool {
    if API_KEY_PREFIXES.iter().any(|p| text.starts_with(p)) {
        return true;
    }
    len > BASE64_MIN_LEN
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
}
