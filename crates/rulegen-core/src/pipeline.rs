//! The transpilation pipeline
//!
//! `Transpiler` owns everything a run needs: the entity catalog (inside the
//! resolver), the variable definitions and the options. It can be reused for
//! several inputs; entity metadata loaded for one input stays cached.
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use crate::assemble::{AssembledUnit, BlockAssembler, ClassifiedLine};
use crate::classify::{Classifier, RuleContext};
use crate::codegen::CodeGenerator;
use crate::definitions::VariableDefinitions;
use crate::error::{ResolveError, Result};
use crate::ir::{Assignment, ConditionBlock, Fragment};
use crate::metadata::EntityCatalog;
use crate::normalize::{leading_indent, normalize_line};
use crate::options::{ConversionMode, TranspileOptions, UnrecognizedPolicy};
use crate::postprocess::Postprocessor;
use crate::resolve::Resolver;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What a generated unit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Block,
    Standalone,
    Todo,
}

/// One rendered piece of output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedUnit {
    /// 1-based line number of the source line
    pub line: usize,
    pub kind: UnitKind,
    pub code: String,
}

/// A line that ended up as a TODO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub line: usize,
    pub original: String,
    pub code: String,
    pub reason: String,
}

/// Summary of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspileReport {
    pub lines_read: usize,
    pub blank_lines: usize,
    pub skipped_lines: usize,
    pub blocks: usize,
    pub standalone: usize,
    pub todos: Vec<TodoItem>,
    pub comparisons_rewritten: usize,
    pub entities_loaded: usize,
}

impl TranspileReport {
    fn record_todo(&mut self, line: usize, assignment: &Assignment) {
        if let Assignment::Todo { original, reason } = assignment {
            self.todos.push(TodoItem {
                line,
                original: original.clone(),
                code: reason.code().to_string(),
                reason: reason.to_string(),
            });
        }
    }
}

/// Result of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranspileOutput {
    pub units: Vec<GeneratedUnit>,
    pub report: TranspileReport,
}

impl TranspileOutput {
    /// Join unit codes with newlines
    pub fn render(&self) -> String {
        self.units
            .iter()
            .map(|unit| unit.code.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Converts rule lines to Java statements
#[derive(Debug)]
pub struct Transpiler {
    options: TranspileOptions,
    classifier: Classifier,
    resolver: Resolver,
    definitions: VariableDefinitions,
    generator: CodeGenerator,
}

impl Transpiler {
    /// Create a transpiler; the definitions file is read now when postprocessing is on
    pub fn new(options: TranspileOptions) -> Result<Self> {
        let catalog = EntityCatalog::new(options.entity_files.clone());
        Self::with_catalog(options, catalog)
    }

    /// Create a transpiler over a prepared catalog
    pub fn with_catalog(options: TranspileOptions, catalog: EntityCatalog) -> Result<Self> {
        let definitions = match (&options.definitions_file, options.postprocess) {
            (Some(path), true) => VariableDefinitions::load(path)?,
            _ => VariableDefinitions::default(),
        };
        let resolver = Resolver::new(catalog, options.entity_instances.clone());
        Ok(Self {
            generator: CodeGenerator::new(options.emit_field_comments),
            classifier: Classifier::new(),
            resolver,
            definitions,
            options,
        })
    }

    pub fn options(&self) -> &TranspileOptions {
        &self.options
    }

    pub fn definitions(&self) -> &VariableDefinitions {
        &self.definitions
    }

    /// Run in the configured mode
    pub fn run<S: AsRef<str>>(&mut self, lines: &[S]) -> TranspileOutput {
        match self.options.mode {
            ConversionMode::Block => self.transpile(lines),
            ConversionMode::Line => self.convert_lines(lines),
        }
    }

    /// Block mode: assemble condition blocks and standalone assignments
    pub fn transpile<S: AsRef<str>>(&mut self, lines: &[S]) -> TranspileOutput {
        let mut report = TranspileReport::default();
        let mut assembler = BlockAssembler::new(self.options.block_scope, self.options.unrecognized);

        for (index, raw) in lines.iter().enumerate() {
            let raw = raw.as_ref();
            report.lines_read += 1;
            let Some(text) = normalize_line(raw) else {
                report.blank_lines += 1;
                assembler.push_blank();
                continue;
            };
            let fragment = self.classify(index + 1, &text);
            assembler.push(ClassifiedLine {
                number: index + 1,
                indented: leading_indent(raw),
                text,
                fragment,
            });
        }

        let (assembled, skipped) = assembler.finish();
        report.skipped_lines = skipped;

        let mut units = Vec::with_capacity(assembled.len());
        for unit in assembled {
            match unit {
                AssembledUnit::Block(block) => {
                    let code = self.render_block(&block, &mut report);
                    if code.is_empty() {
                        continue;
                    }
                    report.blocks += 1;
                    units.push(GeneratedUnit {
                        line: block.line,
                        kind: UnitKind::Block,
                        code,
                    });
                }
                AssembledUnit::Standalone { line, assignment } => {
                    units.push(self.standalone_unit(line, &assignment, &mut report));
                }
            }
        }

        self.finish(units, report)
    }

    /// Line mode over many lines: every line is converted independently
    pub fn convert_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> TranspileOutput {
        let mut report = TranspileReport::default();
        let mut units = Vec::new();

        for (index, raw) in lines.iter().enumerate() {
            report.lines_read += 1;
            let Some(text) = normalize_line(raw.as_ref()) else {
                report.blank_lines += 1;
                continue;
            };
            match self.line_assignment(index + 1, &text) {
                Some(assignment) => units.push(self.standalone_unit(index + 1, &assignment, &mut report)),
                None => report.skipped_lines += 1,
            }
        }

        self.finish(units, report)
    }

    /// Line mode: convert one line on its own
    ///
    /// Returns `None` for blank lines and for unrecognized text under the skip
    /// policy.
    pub fn convert_line(&mut self, line: &str) -> Option<String> {
        let text = normalize_line(line)?;
        let assignment = self.line_assignment(1, &text)?;
        Some(self.generator.render_assignment(&assignment))
    }

    fn line_assignment(&mut self, number: usize, text: &str) -> Option<Assignment> {
        match self.classify(number, text) {
            Fragment::Assignment { assignment } => Some(assignment),
            Fragment::ConditionStart { .. }
            | Fragment::ConditionContinuation { .. }
            | Fragment::Unrecognized { .. } => match self.options.unrecognized {
                UnrecognizedPolicy::Todo => Some(Assignment::todo(
                    text,
                    ResolveError::PatternMismatch {
                        text: text.to_string(),
                    },
                )),
                UnrecognizedPolicy::Skip => None,
            },
        }
    }

    fn classify(&mut self, number: usize, text: &str) -> Fragment {
        let mut context = RuleContext {
            resolver: &mut self.resolver,
            helpers: &self.options.helpers,
        };
        let (rule, fragment) = self.classifier.classify_traced(text, &mut context);
        debug!(line = number, rule, "Classified line");
        fragment
    }

    fn render_block(&mut self, block: &ConditionBlock, report: &mut TranspileReport) -> String {
        for assignment in &block.assignments {
            report.record_todo(block.line, assignment);
        }
        let code = self.generator.render_block(block, &mut self.resolver);
        if !self.options.postprocess {
            return code;
        }
        let processed = Postprocessor::new(self.resolver.type_index(), &self.definitions, &self.options.helpers)
            .process(&code);
        report.comparisons_rewritten += processed.rewritten;
        processed.code
    }

    fn standalone_unit(&self, line: usize, assignment: &Assignment, report: &mut TranspileReport) -> GeneratedUnit {
        let kind = if assignment.is_todo() {
            report.record_todo(line, assignment);
            UnitKind::Todo
        } else {
            report.standalone += 1;
            UnitKind::Standalone
        };
        GeneratedUnit {
            line,
            kind,
            code: self.generator.render_assignment(assignment),
        }
    }

    fn finish(&self, units: Vec<GeneratedUnit>, mut report: TranspileReport) -> TranspileOutput {
        report.entities_loaded = self.resolver.catalog().loaded_count();
        info!(
            lines = report.lines_read,
            units = units.len(),
            blocks = report.blocks,
            todos = report.todos.len(),
            "Transpilation finished"
        );
        TranspileOutput { units, report }
    }
}
