//! Text normalization for raw rule lines
//!
//! Rule lines are copied out of spreadsheets, so they arrive wrapped in quotes,
//! padded with full-width spaces and with stray whitespace inside references.
//! `normalize_line` canonicalizes all of that so the classifier only has to deal
//! with one spelling of each construct.
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

/// Ideographic (full-width) space
pub const FULL_WIDTH_SPACE: char = '\u{3000}';

/// Normalize one raw input line
///
/// Returns `None` when nothing but whitespace and quotes remains. The function
/// is idempotent: `normalize_line(normalize_line(x)) == normalize_line(x)`.
pub fn normalize_line(raw: &str) -> Option<String> {
    let unquoted = strip_enclosing_quotes(raw);
    if unquoted.is_empty() {
        return None;
    }

    let spaced = unquoted.replace(FULL_WIDTH_SPACE, " ");
    let compact = remove_bracketed_whitespace(&spaced);
    let collapsed = collapse_whitespace(&compact);

    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Whether the raw line starts with indentation once an opening quote is removed
pub fn leading_indent(raw: &str) -> bool {
    let body = raw.strip_prefix('"').unwrap_or(raw);
    body.starts_with(|c: char| c == ' ' || c == '\t' || c == FULL_WIDTH_SPACE)
}

/// Fold full-width digits (U+FF10..U+FF19) to ASCII
pub fn fold_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            other => other,
        })
        .collect()
}

/// Whether the text is a non-empty run of ASCII or full-width digits
pub fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || ('０'..='９').contains(&c))
}

/// Trim and peel off one leading and one trailing `"` until the ends are stable
fn strip_enclosing_quotes(raw: &str) -> &str {
    let mut current = raw.trim();
    loop {
        let mut next = current;
        if let Some(rest) = next.strip_prefix('"') {
            next = rest;
        }
        if let Some(rest) = next.strip_suffix('"') {
            next = rest;
        }
        let next = next.trim();
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

/// Delete whitespace inside every closed `「…」` and `(…)` span
fn remove_bracketed_whitespace(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut inside = vec![false; chars.len()];
    let mut corner_stack = Vec::new();
    let mut paren_stack = Vec::new();

    for (index, &c) in chars.iter().enumerate() {
        match c {
            '「' => corner_stack.push(index),
            '」' => {
                if let Some(open) = corner_stack.pop() {
                    mark_span(&mut inside, open, index);
                }
            }
            '(' => paren_stack.push(index),
            ')' => {
                if let Some(open) = paren_stack.pop() {
                    mark_span(&mut inside, open, index);
                }
            }
            _ => {}
        }
    }

    chars
        .iter()
        .zip(inside)
        .filter(|(c, in_span)| !(*in_span && c.is_whitespace()))
        .map(|(c, _)| *c)
        .collect()
}

fn mark_span(inside: &mut [bool], open: usize, close: usize) {
    for flag in &mut inside[open + 1..close] {
        *flag = true;
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
