//! Regex sources and keyword tables for the text classifier.
//!
//! Kept separate from the scoring logic so the patterns can be checked
//! for validity on their own.

/// Whole-string URL match for `http`, `https` and `ftp` schemes.
///
/// Applied to whitespace-trimmed text. There is no multi-line flag, so
/// `^`/`$` anchor the entire input and embedded newlines never match.
pub const URL: &str = r"^(https?|ftp)://[^\s/$.?#].[^\s]*$";

/// Declaration or import keyword at the very start of the text,
/// optionally after leading whitespace.
pub const LEADING_DECLARATION: &str =
    r"^\s*(import|from|export|const|let|var|function|class|def|public|private)";

/// Keyword signals. Each is counted once if present, regardless of how
/// often it appears. The trailing space keeps `classification` from
/// counting as `class`.
pub const KEYWORDS: &[&str] = &[
    "func ",
    "class ",
    "import ",
    "const ",
    "let ",
    "var ",
    "function ",
    "def ",
    "public ",
    "private ",
];

/// Minimum number of distinct signals before text is treated as code.
pub const CODE_THRESHOLD: usize = 2;
