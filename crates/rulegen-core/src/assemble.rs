//! Block assembly
//!
//! Classified lines arrive in source order. The assembler keeps at most one open
//! condition block; assignment lines either join it or stand alone depending on
//! the configured `BlockScope`.
//!
//! ```text
//! Idle --ConditionStart--> InBlock
//! InBlock --ConditionStart--> InBlock (previous block closed)
//! InBlock --non-member line--> Idle (block closed, line handled standalone)
//! ```
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use crate::error::ResolveError;
use crate::ir::{Assignment, ConditionBlock, Fragment};
use crate::options::{BlockScope, UnrecognizedPolicy};
use tracing::debug;

/// A classified line with its position and indentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// 1-based line number
    pub number: usize,
    pub indented: bool,
    /// Normalized text of the line
    pub text: String,
    pub fragment: Fragment,
}

/// An output unit before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembledUnit {
    Block(ConditionBlock),
    Standalone { line: usize, assignment: Assignment },
}

impl AssembledUnit {
    pub fn line(&self) -> usize {
        match self {
            AssembledUnit::Block(block) => block.line,
            AssembledUnit::Standalone { line, .. } => *line,
        }
    }
}

/// Builds blocks and standalone assignments from classified lines
#[derive(Debug)]
pub struct BlockAssembler {
    scope: BlockScope,
    policy: UnrecognizedPolicy,
    current: Option<ConditionBlock>,
    units: Vec<AssembledUnit>,
    skipped: usize,
}

impl BlockAssembler {
    pub fn new(scope: BlockScope, policy: UnrecognizedPolicy) -> Self {
        Self {
            scope,
            policy,
            current: None,
            units: Vec::new(),
            skipped: 0,
        }
    }

    /// Feed the next classified line
    pub fn push(&mut self, line: ClassifiedLine) {
        let ClassifiedLine {
            number,
            indented,
            text,
            fragment,
        } = line;

        match fragment {
            Fragment::ConditionStart { part } => {
                self.close();
                self.current = Some(ConditionBlock::new(number, part));
            }
            Fragment::ConditionContinuation { operator, part } => match self.current.as_mut() {
                Some(block) => block.condition.extend(operator, part),
                None => {
                    debug!(line = number, "Continuation without an open condition");
                    self.emit(
                        number,
                        Assignment::todo(
                            text,
                            ResolveError::PatternMismatch {
                                text: "continuation without an open condition".to_string(),
                            },
                        ),
                    );
                }
            },
            Fragment::Assignment { assignment } => {
                if self.accepts(indented) {
                    if let Some(block) = self.current.as_mut() {
                        block.add_assignment(assignment);
                    }
                } else {
                    self.close();
                    self.emit(number, assignment);
                }
            }
            Fragment::Unrecognized { text } => {
                let todo = Assignment::todo(text.clone(), ResolveError::PatternMismatch { text });
                if self.accepts(indented) {
                    if let Some(block) = self.current.as_mut() {
                        block.add_assignment(todo);
                    }
                } else {
                    self.close();
                    match self.policy {
                        UnrecognizedPolicy::Todo => self.emit(number, todo),
                        UnrecognizedPolicy::Skip => {
                            debug!(line = number, "Skipping unrecognized line");
                            self.skipped += 1;
                        }
                    }
                }
            }
        }
    }

    /// A blank line ends an indentation-scoped block
    pub fn push_blank(&mut self) {
        if self.scope == BlockScope::Indented {
            self.close();
        }
    }

    /// Close any open block and return the units in line order
    pub fn finish(mut self) -> (Vec<AssembledUnit>, usize) {
        self.close();
        self.units.sort_by_key(AssembledUnit::line);
        (self.units, self.skipped)
    }

    fn accepts(&self, indented: bool) -> bool {
        self.current.is_some() && (self.scope == BlockScope::UntilNextCondition || indented)
    }

    fn close(&mut self) {
        if let Some(block) = self.current.take() {
            debug!(
                line = block.line,
                assignments = block.assignments.len(),
                "Closing condition block"
            );
            self.units.push(AssembledUnit::Block(block));
        }
    }

    fn emit(&mut self, line: usize, assignment: Assignment) {
        self.units.push(AssembledUnit::Standalone { line, assignment });
    }
}
