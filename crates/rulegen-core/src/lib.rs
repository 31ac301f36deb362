//! Rulegen Core - transpiles design-document rule lines into Java statements
//!
//! Business rules in Japanese design documents follow a small fixed notation:
//! condition lines (`》【条件】…のとき`), continuations (`または、…` / `かつ、…`)
//! and assignment lines that reference entity fields by their column comment.
//! This crate turns such lines into Java assignments and `if` blocks against the
//! generated entity classes.
//!
//! # Pipeline
//!
//! - **Normalization** ([`normalize`]): quotes, full-width spaces, whitespace inside references
//! - **Entity metadata** ([`metadata`]): comment → accessor index read from entity sources
//! - **Classification** ([`classify`]): prioritized rules producing [`Fragment`]s
//! - **Assembly** ([`assemble`]): condition blocks and standalone statements
//! - **Generation** ([`codegen`]): Java text, resolving operands through [`Resolver`]
//! - **Postprocessing** ([`postprocess`]): type-directed helper calls for comparisons
//!
//! # Example
//!
//! ```no_run
//! use rulegen_core::{Result, TranspileOptions, Transpiler};
//!
//! fn example() -> Result<()> {
//!     let options = TranspileOptions::default()
//!         .with_entity("手袋(Ｌ０１)", "input/TestTable1BaseEntity.java");
//!     let mut transpiler = Transpiler::new(options)?;
//!     let output = transpiler.transpile(&["項目「手袋(Ｌ０１).(請求 コード)」＝　０。"]);
//!     println!("{}", output.render());
//!     Ok(())
//! }
//! ```

pub mod assemble;
pub mod classify;
pub mod codegen;
pub mod compare;
pub mod definitions;
pub mod error;
pub mod ir;
pub mod java;
pub mod metadata;
pub mod normalize;
pub mod options;
pub mod pipeline;
pub mod postprocess;
pub mod resolve;

// Re-export main types for convenience
pub use error::{Error, ResolveError, Result, SourceKind};
pub use options::{BlockScope, ConversionMode, HelperNames, TranspileOptions, UnrecognizedPolicy};
pub use pipeline::{GeneratedUnit, TodoItem, TranspileOutput, TranspileReport, Transpiler, UnitKind};

pub use classify::Classifier;
pub use compare::japanese_eq;
pub use definitions::{VariableDefinition, VariableDefinitions};
pub use ir::{Assignment, Condition, ConditionBlock, ConditionPart, Fragment};
pub use java::SemanticType;
pub use metadata::{extract_entity, parse_entity_source, EntityCatalog, EntityMetadata, FieldMetadata};
pub use normalize::normalize_line;
pub use postprocess::Postprocessor;
pub use resolve::{Resolver, TypeIndex};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
