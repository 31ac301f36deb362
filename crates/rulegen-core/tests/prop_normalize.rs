//! Property-based tests for normalization, comparison and postprocessing
//!
//! These tests verify invariants that should hold for arbitrary rule text,
//! not just the notation found in real documents.

use proptest::prelude::*;
use rulegen_core::compare::{comparison_key, japanese_eq};
use rulegen_core::{normalize_line, HelperNames, Postprocessor, TranspileOptions, Transpiler, TypeIndex, VariableDefinitions};

// Strategy functions for property testing

/// Fragments of the rule notation mixed with noise
fn notation_piece_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("項目「".to_string()),
        Just("」".to_string()),
        Just("(".to_string()),
        Just(")".to_string()),
        Just("\"".to_string()),
        Just("\u{3000}".to_string()),
        Just(" ".to_string()),
        Just("\t".to_string()),
        Just("＝".to_string()),
        Just("ブランク".to_string()),
        Just("》【条件】".to_string()),
        Just("のとき".to_string()),
        Just("を代入します。".to_string()),
        "[a-zA-Z0-9０-９ｱ-ﾝ亜-熙]{1,6}",
    ]
}

/// A line assembled from notation pieces
fn notation_line_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(notation_piece_strategy(), 0..12).prop_map(|pieces| pieces.concat())
}

/// Labels with width and separator noise
fn label_strategy() -> impl Strategy<Value = String> {
    "[ 　a-zA-Zａ-ｚ0-9０-９ｱ-ﾝア-ン亜-熙./／\\[\\]*\"ー-]{0,16}"
}

proptest! {
    /// Property: normalization is idempotent
    #[test]
    fn prop_normalize_idempotent(line in notation_line_strategy()) {
        if let Some(once) = normalize_line(&line) {
            prop_assert_eq!(normalize_line(&once), Some(once.clone()));
            prop_assert_eq!(once.trim(), once.as_str());
            prop_assert!(!once.contains('\u{3000}'), "normalized output contains U+3000");
        }
    }

    /// Property: normalizing arbitrary text never panics
    #[test]
    fn prop_normalize_any_text(line in "\\PC{0,40}") {
        let _ = normalize_line(&line);
    }

    /// Property: label comparison is symmetric
    #[test]
    fn prop_japanese_eq_symmetric(a in label_strategy(), b in label_strategy()) {
        prop_assert_eq!(japanese_eq(&a, &b), japanese_eq(&b, &a));
    }

    /// Property: spaces and ignored markers never change the comparison key
    #[test]
    fn prop_comparison_key_ignores_markers(label in label_strategy(), marker in "[ 　./\\[\\]*\"]") {
        let mut noisy = marker.clone();
        noisy.push_str(&label);
        noisy.push_str(&marker);
        prop_assert_eq!(comparison_key(&noisy), comparison_key(&label));
    }

    /// Property: transpiling arbitrary notation never panics
    #[test]
    fn prop_transpile_never_panics(lines in prop::collection::vec(notation_line_strategy(), 0..8)) {
        let mut transpiler = Transpiler::new(TranspileOptions::default()).unwrap();
        let output = transpiler.transpile(&lines);
        prop_assert_eq!(output.report.lines_read, lines.len());
        for line in &lines {
            if let Some(code) = transpiler.convert_line(line) {
                prop_assert!(code.starts_with("//TODO:") || code.ends_with(';'));
            }
        }
    }

    /// Property: postprocessing its own output is a no-op
    #[test]
    fn prop_postprocess_idempotent(
        left in "(this\\.[A-Z][a-z]{1,5}|[a-z]{1,5}\\.get[A-Z][a-z]{0,4}\\(\\))",
        operator in prop_oneof![Just("=="), Just("!="), Just(">"), Just(">="), Just("<"), Just("<=")],
        right in "(\"\"|'[A-Z]{1,3}'|[0-9]{1,4}|this\\.[A-Z][a-z]{1,5})",
        joiner in prop_oneof![Just(" && "), Just(" || ")],
    ) {
        let types = TypeIndex::default();
        let definitions = VariableDefinitions::default();
        let helpers = HelperNames::default();
        let postprocessor = Postprocessor::new(&types, &definitions, &helpers);

        let code = format!("if({left} {operator} {right}{joiner}{left} {operator} {right}) {{\n    x();\n}}");
        let once = postprocessor.process(&code).code;
        let twice = postprocessor.process(&once);
        prop_assert_eq!(&twice.code, &once);
        prop_assert_eq!(twice.rewritten, 0);
    }
}
