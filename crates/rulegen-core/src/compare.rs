//! Width- and punctuation-insensitive comparison of Japanese labels
//!
//! Field comments in entity sources and field labels in rule lines are typed by
//! different people, so they disagree on half/full width, spacing and
//! separators. Two labels match when their comparison keys are equal.

use crate::normalize::fold_digits;
use unicode_normalization::UnicodeNormalization;

/// Compute the comparison key for a label
pub fn comparison_key(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !is_marker(*c)).collect();
    fold_digits(&stripped)
        .nfkc()
        .filter(|c| !is_insignificant(*c))
        .collect()
}

/// Whether two labels are equal under normalized-Japanese comparison
///
/// Labels that reduce to an empty key never match anything.
pub fn japanese_eq(a: &str, b: &str) -> bool {
    let left = comparison_key(a);
    !left.is_empty() && left == comparison_key(b)
}

fn is_marker(c: char) -> bool {
    c.is_whitespace() || matches!(c, '*' | '"' | '.' | '/' | '[' | ']')
}

fn is_insignificant(c: char) -> bool {
    c.is_whitespace()
        || c.is_ascii_punctuation()
        || matches!(c, '\u{2010}'..='\u{2015}' | '\u{2212}')
}
