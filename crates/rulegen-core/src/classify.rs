//! Line classification
//!
//! A normalized line is offered to an ordered list of rules; the first rule that
//! returns a fragment wins. A rule answers `None` when the line is not its
//! business. When a rule recognizes its trigger but cannot resolve an operand it
//! still answers, with a TODO assignment naming the reason, so later rules never
//! see a half-matched line.
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use crate::error::ResolveError;
use crate::ir::{Assignment, ComparisonOperator, ConditionPart, Fragment, LogicalOperator};
use crate::java::{string_literal, SemanticType};
use crate::normalize::{fold_digits, is_number};
use crate::options::HelperNames;
use crate::resolve::{
    contains_blank_literal, contains_reference, is_blank_literal, leading_reference, parse_reference,
    FieldTarget, Reference, Resolver,
};
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

const CONDITION_MARKER: &str = "》【条件】";
const CONDITION_SUFFIX: &str = "のとき";
const OR_MARKER: &str = "または、";
const AND_MARKER: &str = "かつ、";

/// Shared state available to every rule
pub struct RuleContext<'a> {
    pub resolver: &'a mut Resolver,
    pub helpers: &'a HelperNames,
}

/// A classification rule
pub type Rule = fn(&str, &mut RuleContext<'_>) -> Option<Fragment>;

/// Rules in priority order
pub const RULES: &[(&str, Rule)] = &[
    ("condition_start", condition_start as Rule),
    ("condition_continuation", condition_continuation as Rule),
    ("blank_assignment", blank_assignment as Rule),
    ("numeric_assignment", numeric_assignment as Rule),
    ("boolean_assignment", boolean_assignment as Rule),
    ("direct_assignment", direct_assignment as Rule),
    ("reference_assignment", reference_assignment as Rule),
    ("string_assignment", string_assignment as Rule),
];

/// Runs the rule list over normalized lines
#[derive(Clone)]
pub struct Classifier {
    rules: Vec<(&'static str, Rule)>,
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|(name, _)| name))
            .finish()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            rules: RULES.to_vec(),
        }
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one normalized line
    pub fn classify(&self, line: &str, context: &mut RuleContext<'_>) -> Fragment {
        self.classify_traced(line, context).1
    }

    /// Classify and report which rule matched
    pub fn classify_traced(&self, line: &str, context: &mut RuleContext<'_>) -> (&'static str, Fragment) {
        for &(name, rule) in &self.rules {
            if let Some(fragment) = rule(line, context) {
                trace!(rule = name, "Rule matched");
                return (name, fragment);
            }
        }
        (
            "unrecognized",
            Fragment::Unrecognized {
                text: line.to_string(),
            },
        )
    }
}

fn assign_regex() -> &'static Regex {
    static ASSIGN: OnceLock<Regex> = OnceLock::new();
    ASSIGN.get_or_init(|| {
        Regex::new(r"^に\s*(.+?)\s*を(?:右詰で|左詰で)?代入(?:します|する)?\s*[。．.]?$").unwrap()
    })
}

fn equals_regex() -> &'static Regex {
    static EQUALS: OnceLock<Regex> = OnceLock::new();
    EQUALS.get_or_init(|| Regex::new(r"^[＝=]\s*(.+?)\s*[。．.]?$").unwrap())
}

fn bit_regex() -> &'static Regex {
    static BIT: OnceLock<Regex> = OnceLock::new();
    BIT.get_or_init(|| Regex::new(r"['＇‘’]([01０１])['＇‘’]").unwrap())
}

fn copy_regex() -> &'static Regex {
    static COPY: OnceLock<Regex> = OnceLock::new();
    COPY.get_or_init(|| {
        Regex::new(concat!(
            r"^(?P<target>(?:項目)?「[^」]*」)\s*に\s*(?P<source>(?:項目)?「[^」]*」)\s*",
            r"(?:の\s*(?P<start>[0-9０-９]+)\s*文字目から\s*(?P<length>[0-9０-９]+)\s*文字)?\s*",
            r"を\s*(?P<align>右詰で|左詰で)?\s*代入(?:します|する)?\s*[。．.]?$",
        ))
        .unwrap()
    })
}

/// Value of `に<V>を代入します`
fn assigned_to(rest: &str) -> Option<&str> {
    assign_regex().captures(rest.trim()).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Value of `＝<V>。`
fn equals_value(rest: &str) -> Option<&str> {
    equals_regex().captures(rest.trim()).and_then(|c| c.get(1)).map(|m| m.as_str())
}

fn assigned_value(rest: &str) -> Option<&str> {
    assigned_to(rest).or_else(|| equals_value(rest))
}

fn bit_literal(text: &str) -> Option<bool> {
    let captures = bit_regex().captures(text)?;
    Some(matches!(&captures[1], "1" | "１"))
}

/// Inner text of a quoted literal
pub fn quoted_literal(text: &str) -> Option<&str> {
    const QUOTES: [(char, char); 5] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’'), ('＇', '＇')];
    let text = text.trim();
    QUOTES.iter().find_map(|&(open, close)| {
        let inner = text.strip_prefix(open)?.strip_suffix(close)?;
        Some(inner)
    })
}

fn todo(line: &str, reason: ResolveError) -> Fragment {
    Assignment::todo(line, reason).into()
}

fn unsupported(line: &str, value: &str) -> Fragment {
    todo(
        line,
        ResolveError::UnsupportedValue {
            value: value.trim().to_string(),
        },
    )
}

fn entity_assignment(target: &FieldTarget, value: impl Into<String>) -> Fragment {
    Assignment::EntityField {
        target: target.setter_expression(),
        value: value.into(),
        comment: Some(target.field.comment.clone()),
    }
    .into()
}

/// Split `<left><op><right>` at the first operator outside `「…」`
pub fn parse_comparison(text: &str) -> ConditionPart {
    let text = text.trim();
    let mut depth = 0usize;
    for (index, c) in text.char_indices() {
        match c {
            '「' => depth += 1,
            '」' => depth = depth.saturating_sub(1),
            '＝' | '=' | '≠' if depth == 0 => {
                let Some(operator) = ComparisonOperator::from_token(&text[index..index + c.len_utf8()]) else {
                    continue;
                };
                let left = text[..index].trim();
                let right = text[index + c.len_utf8()..].trim();
                if left.is_empty() || right.is_empty() {
                    return ConditionPart::error(text);
                }
                return ConditionPart::comparison(left, operator, right, text);
            }
            _ => {}
        }
    }
    ConditionPart::error(text)
}

fn condition_body(text: &str) -> ConditionPart {
    match text.rfind(CONDITION_SUFFIX) {
        Some(end) => parse_comparison(&text[..end]),
        None => ConditionPart::error(text.trim()),
    }
}

fn condition_start(line: &str, _context: &mut RuleContext<'_>) -> Option<Fragment> {
    let rest = line.strip_prefix(CONDITION_MARKER)?;
    Some(Fragment::ConditionStart {
        part: condition_body(rest),
    })
}

fn condition_continuation(line: &str, _context: &mut RuleContext<'_>) -> Option<Fragment> {
    let (operator, rest) = if let Some(rest) = line.strip_prefix(OR_MARKER) {
        (LogicalOperator::Or, rest)
    } else if let Some(rest) = line.strip_prefix(AND_MARKER) {
        (LogicalOperator::And, rest)
    } else {
        return None;
    };
    Some(Fragment::ConditionContinuation {
        operator,
        part: condition_body(rest),
    })
}

fn blank_assignment(line: &str, context: &mut RuleContext<'_>) -> Option<Fragment> {
    let (Reference::EntityField { entity, comment }, rest) = leading_reference(line)? else {
        return None;
    };
    if !contains_blank_literal(rest) || contains_reference(rest) {
        return None;
    }
    Some(match context.resolver.resolve_field(entity, comment) {
        Ok(target) => entity_assignment(&target, "\"\""),
        Err(reason) => todo(line, reason),
    })
}

fn numeric_assignment(line: &str, context: &mut RuleContext<'_>) -> Option<Fragment> {
    let (Reference::EntityField { entity, comment }, rest) = leading_reference(line)? else {
        return None;
    };

    let number = if let Some(value) = equals_value(rest) {
        if is_number(value) {
            Ok(fold_digits(value))
        } else if quoted_literal(value).is_some() || is_blank_literal(value) || contains_reference(value) {
            return None;
        } else {
            Err(value)
        }
    } else {
        match assigned_to(rest) {
            Some(value) if is_number(value) => Ok(fold_digits(value)),
            _ => return None,
        }
    };

    let target = match context.resolver.resolve_field(entity, comment) {
        Ok(target) => target,
        Err(reason) => return Some(todo(line, reason)),
    };
    Some(match number {
        Ok(digits) => {
            let is_zero = digits.chars().all(|c| c == '0');
            if is_zero && target.field.semantic_type == SemanticType::Date {
                entity_assignment(&target, "null")
            } else {
                entity_assignment(&target, digits)
            }
        }
        Err(value) => unsupported(line, value),
    })
}

fn boolean_assignment(line: &str, _context: &mut RuleContext<'_>) -> Option<Fragment> {
    let (Reference::Flag { name }, rest) = leading_reference(line)? else {
        return None;
    };
    if contains_reference(rest) {
        return None;
    }
    Some(match bit_literal(rest) {
        Some(value) => Assignment::BooleanField {
            target: name.to_string(),
            value,
        }
        .into(),
        None => unsupported(line, rest),
    })
}

fn direct_assignment(line: &str, _context: &mut RuleContext<'_>) -> Option<Fragment> {
    let (Reference::Direct { category, name }, rest) = leading_reference(line)? else {
        return None;
    };
    if contains_reference(rest) {
        return None;
    }

    let value = if contains_blank_literal(rest) {
        Some("\"\"".to_string())
    } else if let Some(bit) = bit_literal(rest) {
        Some(if bit { "'1'" } else { "'0'" }.to_string())
    } else {
        assigned_value(rest).and_then(|value| {
            if is_number(value) {
                Some(fold_digits(value))
            } else {
                quoted_literal(value).map(string_literal)
            }
        })
    };

    Some(match value {
        Some(value) => Assignment::DirectField {
            target: format!("{category}{name}"),
            value,
        }
        .into(),
        None => unsupported(line, rest),
    })
}

enum CopyTarget {
    Field(FieldTarget),
    Variable(String),
}

fn reference_assignment(line: &str, context: &mut RuleContext<'_>) -> Option<Fragment> {
    let captures = copy_regex().captures(line)?;
    let target = parse_reference(captures.name("target")?.as_str())?;
    let source = parse_reference(captures.name("source")?.as_str())?;

    let copy_target = match target {
        Reference::EntityField { entity, comment } => match context.resolver.resolve_field(entity, comment) {
            Ok(field) => CopyTarget::Field(field),
            Err(reason) => return Some(todo(line, reason)),
        },
        Reference::Direct { category, name } => CopyTarget::Variable(format!("{category}{name}")),
        Reference::Flag { name } => CopyTarget::Variable(name.to_string()),
    };

    let mut value = match context.resolver.resolve_reference(&source) {
        Ok(resolved) => resolved.expression,
        Err(reason) => return Some(todo(line, reason)),
    };
    let string_helper = &context.helpers.string;
    if let (Some(start), Some(length)) = (captures.name("start"), captures.name("length")) {
        value = format!(
            "{string_helper}.mid({value}, {}, {})",
            fold_digits(start.as_str()),
            fold_digits(length.as_str())
        );
    }
    match captures.name("align").map(|m| m.as_str()) {
        Some("右詰で") => value = format!("{string_helper}.alignRight({value})"),
        Some("左詰で") => value = format!("{string_helper}.alignLeft({value})"),
        _ => {}
    }

    Some(match copy_target {
        CopyTarget::Field(field) => entity_assignment(&field, value),
        CopyTarget::Variable(target) => Assignment::DirectField { target, value }.into(),
    })
}

fn string_assignment(line: &str, context: &mut RuleContext<'_>) -> Option<Fragment> {
    let (Reference::EntityField { entity, comment }, rest) = leading_reference(line)? else {
        return None;
    };
    let literal = quoted_literal(assigned_value(rest)?)?;
    Some(match context.resolver.resolve_field(entity, comment) {
        Ok(target) => entity_assignment(&target, string_literal(literal)),
        Err(reason) => todo(line, reason),
    })
}
