//! `clippo inspect`: run the classifier and the secret heuristic on a
//! string without a daemon, to see why a copy was or was not captured.

use crate::classify;
use crate::sensitive::secret;

/// Heuristic verdicts for one string.
#[derive(Debug, PartialEq, Eq)]
pub struct Inspection {
    pub kind: classify::TextKind,
    pub code_signals: usize,
    pub likely_secret: bool,
}

pub fn inspect(text: &str) -> Inspection {
    Inspection {
        kind: classify::classify(text),
        code_signals: classify::code_signal_count(text),
        likely_secret: secret::is_likely_secret(text),
    }
}

pub fn print(text: &str) {
    let result = inspect(text);
    println!("Category:      {}", result.kind);
    println!(
        "Code signals:  {} (threshold {})",
        result.code_signals,
        classify::patterns::CODE_THRESHOLD
    );
    println!(
        "Likely secret: {}",
        if result.likely_secret { "yes" } else { "no" }
    );
}
