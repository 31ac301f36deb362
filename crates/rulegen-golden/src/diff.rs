//! Line diffs between expected and generated Java

use colored::*;
use similar::{ChangeTag, TextDiff};

/// Options for diff comparison
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Whether to use colored output
    pub colored: bool,

    /// Context lines to show around changes
    pub context_lines: usize,

    /// Maximum diff lines to show (0 = unlimited)
    pub max_diff_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            colored: true,
            context_lines: 3,
            max_diff_lines: 100,
        }
    }
}

/// Result of a diff operation
#[derive(Debug)]
pub struct DiffResult {
    /// Whether the texts match
    pub matches: bool,

    /// Human-readable diff output
    pub diff_output: String,

    /// Lines only in the generated text
    pub added: usize,

    /// Lines only in the expected text
    pub removed: usize,
}

/// Engine for comparing generated code against expectations
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    /// Create a new diff engine
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Compare two normalized texts
    pub fn compare(&self, expected: &str, actual: &str) -> DiffResult {
        if expected == actual {
            return DiffResult {
                matches: true,
                diff_output: String::new(),
                added: 0,
                removed: 0,
            };
        }

        let text_diff = TextDiff::from_lines(expected, actual);
        let mut added = 0;
        let mut removed = 0;
        for change in text_diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => added += 1,
                ChangeTag::Delete => removed += 1,
                ChangeTag::Equal => {}
            }
        }

        DiffResult {
            matches: false,
            diff_output: self.render(&text_diff),
            added,
            removed,
        }
    }

    fn render(&self, text_diff: &TextDiff<'_, '_, '_, str>) -> String {
        let mut output = self.paint("=== Diff (-expected +generated) ===\n", |s| s.bold());
        let mut line_count = 0;

        for (index, group) in text_diff.grouped_ops(self.options.context_lines).iter().enumerate() {
            if index > 0 {
                output.push_str(&self.paint("@@\n", |s| s.cyan()));
            }
            for op in group {
                for change in text_diff.iter_changes(op) {
                    if self.options.max_diff_lines > 0 && line_count >= self.options.max_diff_lines {
                        output.push_str("... (diff truncated) ...\n");
                        return output;
                    }

                    let mut line = match change.tag() {
                        ChangeTag::Delete => self.paint(&format!("-{}", change), |s| s.red()),
                        ChangeTag::Insert => self.paint(&format!("+{}", change), |s| s.green()),
                        ChangeTag::Equal => format!(" {}", change),
                    };
                    if change.missing_newline() {
                        line.push('\n');
                    }
                    output.push_str(&line);
                    line_count += 1;
                }
            }
        }

        output
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.options.colored {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DiffEngine {
        DiffEngine::new(DiffOptions {
            colored: false,
            ..DiffOptions::default()
        })
    }

    #[test]
    fn test_identical() {
        let result = engine().compare("a;\nb;\n", "a;\nb;\n");
        assert!(result.matches);
        assert!(result.diff_output.is_empty());
    }

    #[test]
    fn test_changed_line() {
        let result = engine().compare("a;\nb;\nc;\n", "a;\nB;\nc;\n");
        assert!(!result.matches);
        assert_eq!((result.added, result.removed), (1, 1));
        assert_eq!(
            result.diff_output,
            "=== Diff (-expected +generated) ===\n a;\n-b;\n+B;\n c;\n"
        );
    }

    #[test]
    fn test_truncation() {
        let expected: String = (0..50).map(|i| format!("x{i};\n")).collect();
        let actual: String = (0..50).map(|i| format!("y{i};\n")).collect();
        let engine = DiffEngine::new(DiffOptions {
            colored: false,
            context_lines: 0,
            max_diff_lines: 10,
        });
        let result = engine.compare(&expected, &actual);
        assert!(result.diff_output.ends_with("... (diff truncated) ...\n"));
        assert_eq!(result.diff_output.lines().count(), 12);
    }
}
