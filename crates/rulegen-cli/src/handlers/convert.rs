//! Convert command handler

use crate::cli::ConvertArgs;
use crate::config::{Config, ConverterConfig};
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use is_terminal::IsTerminal;
use rulegen_core::{GeneratedUnit, TranspileReport, Transpiler};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Machine-readable result of a conversion
#[derive(Debug, Serialize)]
struct ConvertSummary<'a> {
    output_file: Option<&'a Path>,
    /// Present when the code was not written to a file
    code: Option<&'a str>,
    units: &'a [GeneratedUnit],
    report: &'a TranspileReport,
}

/// Handle the convert command
pub fn handle_convert(args: ConvertArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let mut converter = config.converter.clone();
    apply_overrides(&mut converter, &args);

    let input = args.input.clone().or_else(|| converter.input_file.clone());
    let content = read_input(input.as_deref())?;
    let lines: Vec<&str> = content.lines().collect();

    let options = converter.to_options();
    info!(
        lines = lines.len(),
        mode = %options.mode,
        entities = options.entity_files.len(),
        postprocess = options.postprocess,
        "Converting rule lines"
    );

    let mut transpiler = Transpiler::new(options)?;
    let result = {
        let _timer = Timer::new("transpile");
        transpiler.run(&lines)
    };
    let code = result.render();
    let report = &result.report;

    let output_file = args.output_file.clone().or_else(|| converter.output_file.clone());
    if let Some(path) = &output_file {
        write_code(path, &code)?;
    }

    if !output.is_human() {
        return output.data(&ConvertSummary {
            output_file: output_file.as_deref(),
            code: output_file.is_none().then_some(code.as_str()),
            units: &result.units,
            report,
        });
    }

    match &output_file {
        Some(path) => {
            output.success(&format!(
                "✓ Wrote {} unit(s) to {}",
                result.units.len(),
                path.display()
            ))?;
            if !report.todos.is_empty() {
                output.warning(&format!(
                    "{} line(s) could not be converted and were left as //TODO: comments",
                    report.todos.len()
                ))?;
            }
        }
        None => {
            if !code.is_empty() {
                output.writeln(&code)?;
            }
            if !report.todos.is_empty() {
                warn!(todos = report.todos.len(), "Some lines were left as TODO comments");
            }
        }
    }

    if args.report {
        output.report(report)?;
    }

    Ok(())
}

/// Command-line values win over the configuration file
fn apply_overrides(converter: &mut ConverterConfig, args: &ConvertArgs) {
    if let Some(mode) = args.mode {
        converter.mode = mode.into();
    }
    if let Some(policy) = args.todo_policy {
        converter.unrecognized = policy.into();
    }
    if let Some(scope) = args.block_scope {
        converter.block_scope = scope.into();
    }
    if let Some(postprocess) = args.postprocess_override() {
        converter.postprocess = postprocess;
    }
    if let Some(path) = &args.definitions {
        converter.definitions_file = Some(path.clone());
    }
    if args.field_comments {
        converter.emit_field_comments = true;
    }
    for (entity, path) in &args.entities {
        converter.entity_files.insert(entity.clone(), PathBuf::from(path));
    }
    for (entity, instance) in &args.instances {
        converter.entity_instances.insert(entity.clone(), instance.clone());
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    let content = match path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            fs::read_to_string(path)?
        }
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                return Err(Error::invalid_args(
                    "no input given: pass INPUT, set converter.input_file or pipe rule lines on stdin",
                ));
            }
            io::read_to_string(stdin)?
        }
    };
    Ok(content.trim_start_matches('\u{feff}').to_string())
}

fn write_code(path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut content = code.to_string();
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(path, content)?;
    Ok(())
}
