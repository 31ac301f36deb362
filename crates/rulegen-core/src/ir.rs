//! Intermediate representation between classification and code generation
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Operator joining a condition part to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_java(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
}

impl ComparisonOperator {
    /// Parse `＝`, `=` or `≠`
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "＝" | "=" => Some(ComparisonOperator::Equal),
            "≠" => Some(ComparisonOperator::NotEqual),
            _ => None,
        }
    }

    pub fn as_java(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "==",
            ComparisonOperator::NotEqual => "!=",
        }
    }
}

/// One comparison inside a condition
///
/// Operands are raw tokens; they are resolved when the block is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionPart {
    pub logical: Option<LogicalOperator>,
    pub left: String,
    pub operator: ComparisonOperator,
    pub right: String,
    /// The comparison could not be parsed; `raw` is kept for the TODO trail
    pub is_error: bool,
    pub raw: String,
}

impl ConditionPart {
    pub fn comparison(
        left: impl Into<String>,
        operator: ComparisonOperator,
        right: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            logical: None,
            left: left.into(),
            operator,
            right: right.into(),
            is_error: false,
            raw: raw.into(),
        }
    }

    pub fn error(raw: impl Into<String>) -> Self {
        Self {
            logical: None,
            left: String::new(),
            operator: ComparisonOperator::Equal,
            right: String::new(),
            is_error: true,
            raw: raw.into(),
        }
    }
}

/// Ordered comparisons; only the first part has no logical operator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    parts: Vec<ConditionPart>,
}

impl Condition {
    /// Start a condition with its first part
    pub fn new(mut first: ConditionPart) -> Self {
        first.logical = None;
        Self { parts: vec![first] }
    }

    /// Append a part joined by `operator`
    pub fn extend(&mut self, operator: LogicalOperator, mut part: ConditionPart) {
        part.logical = if self.parts.is_empty() {
            None
        } else {
            Some(operator)
        };
        self.parts.push(part);
    }

    pub fn parts(&self) -> &[ConditionPart] {
        &self.parts
    }
}

/// A generated statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignment {
    /// `<instance>.<setter>(<value>);`
    EntityField {
        target: String,
        value: String,
        /// Field comment, emitted above the statement when enabled
        comment: Option<String>,
    },
    /// `this.<target> = <value>;`
    DirectField { target: String, value: String },
    /// `this.<target> = true|false;`
    BooleanField { target: String, value: bool },
    /// `//TODO: <original>`
    Todo {
        original: String,
        reason: ResolveError,
    },
}

impl Assignment {
    pub fn todo(original: impl Into<String>, reason: ResolveError) -> Self {
        Assignment::Todo {
            original: original.into(),
            reason,
        }
    }

    pub fn is_todo(&self) -> bool {
        matches!(self, Assignment::Todo { .. })
    }
}

/// A condition and the statements it guards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionBlock {
    /// 1-based line of the condition start
    pub line: usize,
    pub condition: Condition,
    pub assignments: Vec<Assignment>,
}

impl ConditionBlock {
    pub fn new(line: usize, first: ConditionPart) -> Self {
        Self {
            line,
            condition: Condition::new(first),
            assignments: Vec::new(),
        }
    }

    /// Append a statement; a TODO already present for the same text is skipped
    pub fn add_assignment(&mut self, assignment: Assignment) -> bool {
        if let Assignment::Todo { original, .. } = &assignment {
            let duplicate = self.assignments.iter().any(|existing| {
                matches!(existing, Assignment::Todo { original: seen, .. } if seen == original)
            });
            if duplicate {
                debug!(line = self.line, original = %original, "Skipping duplicate TODO in block");
                return false;
            }
        }
        self.assignments.push(assignment);
        true
    }
}

/// Classification result for one normalized line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fragment {
    ConditionStart { part: ConditionPart },
    ConditionContinuation {
        operator: LogicalOperator,
        part: ConditionPart,
    },
    Assignment { assignment: Assignment },
    /// No rule recognized the line
    Unrecognized { text: String },
}

impl From<Assignment> for Fragment {
    fn from(assignment: Assignment) -> Self {
        Fragment::Assignment { assignment }
    }
}
