//! Java rendering of the intermediate representation
//!
//! Copyright (c) 2025 Rulegen Team
//! Licensed under the Apache-2.0 license

use crate::error::ResolveError;
use crate::ir::{Assignment, Condition, ConditionBlock, ConditionPart};
use crate::resolve::Resolver;

const INDENT: &str = "    ";

/// Renders assignments, conditions and blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeGenerator {
    /// Precede entity-field assignments with `// <field comment>`
    pub emit_field_comments: bool,
}

impl CodeGenerator {
    pub fn new(emit_field_comments: bool) -> Self {
        Self { emit_field_comments }
    }

    /// Render one statement; may span two lines when field comments are enabled
    pub fn render_assignment(&self, assignment: &Assignment) -> String {
        match assignment {
            Assignment::EntityField { target, value, comment } => match comment {
                Some(comment) if self.emit_field_comments => format!("// {comment}\n{target}({value});"),
                _ => format!("{target}({value});"),
            },
            Assignment::DirectField { target, value } => {
                let value = match value.as_str() {
                    "'1'" => "true",
                    "'0'" => "false",
                    other => other,
                };
                format!("this.{target} = {value};")
            }
            Assignment::BooleanField { target, value } => format!("this.{target} = {value};"),
            Assignment::Todo { original, reason } => render_todo(original, reason),
        }
    }

    /// Render `if(...)`, resolving operands now
    pub fn render_condition(&self, condition: &Condition, resolver: &mut Resolver) -> String {
        let mut out = String::from("if(");
        for part in condition.parts() {
            if let Some(logical) = part.logical {
                out.push(' ');
                out.push_str(logical.as_java());
                out.push(' ');
            }
            out.push_str(&render_part(part, resolver));
        }
        out.push(')');
        out
    }

    /// Render a whole block
    pub fn render_block(&self, block: &ConditionBlock, resolver: &mut Resolver) -> String {
        let mut out = self.render_condition(&block.condition, resolver);
        out.push_str(" {\n");
        for assignment in &block.assignments {
            for line in self.render_assignment(assignment).lines() {
                out.push_str(INDENT);
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push('}');
        out
    }
}

/// `//TODO: <original>`, with the reason unless it only repeats the text
pub fn render_todo(original: &str, reason: &ResolveError) -> String {
    if reason.is_pattern_mismatch() {
        format!("//TODO: {original}")
    } else {
        format!("//TODO: {original} [{reason}]")
    }
}

fn render_part(part: &ConditionPart, resolver: &mut Resolver) -> String {
    if part.is_error {
        return error_marker(&part.raw, None);
    }
    let left = resolver.resolve(&part.left);
    let right = resolver.resolve(&part.right);
    match (left, right) {
        (Ok(left), Ok(right)) => format!(
            "{} {} {}",
            left.expression,
            part.operator.as_java(),
            right.expression
        ),
        (Err(reason), _) | (_, Err(reason)) => error_marker(&part.raw, Some(&reason)),
    }
}

fn error_marker(raw: &str, reason: Option<&ResolveError>) -> String {
    let raw = raw.replace("*/", "* /");
    match reason {
        Some(reason) => format!("/*ERROR: {raw} [{reason}]*/"),
        None => format!("/*ERROR: {raw}*/"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ComparisonOperator, LogicalOperator};
    use crate::metadata::{EntityCatalog, EntityMetadata, FieldMetadata};
    use std::collections::BTreeMap;

    fn resolver() -> Resolver {
        let entity = EntityMetadata::new("Glove")
            .with_field(FieldMetadata::new("code", "コード").with_type("String"))
            .with_field(FieldMetadata::new("count", "数量").with_type("Integer"));
        Resolver::new(EntityCatalog::default().with_entity("手袋", entity), BTreeMap::new())
    }

    fn entity(target: &str, value: &str) -> Assignment {
        Assignment::EntityField {
            target: target.to_string(),
            value: value.to_string(),
            comment: Some("コード".to_string()),
        }
    }

    #[test]
    fn test_render_assignments() {
        let generator = CodeGenerator::default();
        assert_eq!(generator.render_assignment(&entity("glove.setCode", "\"\"")), "glove.setCode(\"\");");
        assert_eq!(
            generator.render_assignment(&Assignment::DirectField {
                target: "D区分".to_string(),
                value: "'1'".to_string()
            }),
            "this.D区分 = true;"
        );
        assert_eq!(
            generator.render_assignment(&Assignment::BooleanField {
                target: "flag".to_string(),
                value: false
            }),
            "this.flag = false;"
        );
        assert_eq!(
            generator.render_assignment(&Assignment::todo(
                "項目「帽子.(色)」にブランク",
                ResolveError::EntityNotFound {
                    entity: "帽子".to_string()
                }
            )),
            "//TODO: 項目「帽子.(色)」にブランク [entity not found: 帽子]"
        );
        assert_eq!(
            generator.render_assignment(&Assignment::todo(
                "謎",
                ResolveError::PatternMismatch { text: "謎".to_string() }
            )),
            "//TODO: 謎"
        );
    }

    #[test]
    fn test_field_comments() {
        let generator = CodeGenerator::new(true);
        assert_eq!(
            generator.render_assignment(&entity("glove.setCode", "1")),
            "// コード\nglove.setCode(1);"
        );
    }

    #[test]
    fn test_render_block() {
        let mut resolver = resolver();
        let mut block = ConditionBlock::new(
            3,
            ConditionPart::comparison("項目「手袋.(コード)」", ComparisonOperator::Equal, "'A'", "x"),
        );
        block.condition.extend(
            LogicalOperator::Or,
            ConditionPart::comparison("項目「手袋.(数量)」", ComparisonOperator::NotEqual, "０", "y"),
        );
        block.add_assignment(entity("glove.setCode", "\"\""));

        let code = CodeGenerator::new(true).render_block(&block, &mut resolver);
        assert_eq!(
            code,
            "if(glove.getCode() == 'A' || glove.getCount() != 0) {\n    // コード\n    glove.setCode(\"\");\n}"
        );
    }

    #[test]
    fn test_error_parts() {
        let mut resolver = resolver();
        let mut block = ConditionBlock::new(1, ConditionPart::error("何か*/変"));
        block.condition.extend(
            LogicalOperator::And,
            ConditionPart::comparison("項目「帽子.(色)」", ComparisonOperator::Equal, "1", "帽子＝1"),
        );
        let code = CodeGenerator::default().render_condition(&block.condition, &mut resolver);
        assert_eq!(
            code,
            "if(/*ERROR: 何か* /変*/ && /*ERROR: 帽子＝1 [entity not found: 帽子]*/)"
        );
    }
}
