//! Inspect command handler

use crate::cli::InspectArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use rulegen_core::extract_entity;

/// Handle the inspect command
pub fn handle_inspect(args: InspectArgs, output: &mut OutputWriter) -> Result<()> {
    if !args.entity_file.exists() {
        return Err(Error::FileNotFound {
            path: args.entity_file,
        });
    }

    let entity = extract_entity(&args.entity_file)?;
    tracing::debug!(
        path = %args.entity_file.display(),
        fields = entity.fields.len(),
        "Extracted entity metadata"
    );

    output.entity(&entity)?;
    if entity.fields.is_empty() {
        output.warning("No commented fields found; expected `/** [column] comment */` blocks")?;
    } else if let Some(instance) = entity.instance_name() {
        output.info(&format!(
            "{} field(s); default receiver `{}`",
            entity.fields.len(),
            instance
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_inspect_missing_file() {
        let mut output =
            OutputWriter::with_writer(OutputFormat::Human, false, false, 0, Box::new(io::sink()));
        let err = handle_inspect(
            InspectArgs {
                entity_file: PathBuf::from("/nonexistent/Entity.java"),
            },
            &mut output,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_inspect_entity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Glove.java");
        std::fs::write(
            &path,
            "public class Glove {\n    /** [code] コード */\n    private String code;\n}\n",
        )
        .unwrap();
        let mut output =
            OutputWriter::with_writer(OutputFormat::Json, false, false, 0, Box::new(io::sink()));
        handle_inspect(InspectArgs { entity_file: path }, &mut output).unwrap();
    }
}
