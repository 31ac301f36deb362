//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigInitArgs};
use crate::config::{Config, STARTER_CONFIG};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use rulegen_core::{extract_entity, VariableDefinitions};
use std::fs;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Show => handle_config_show(config, output),
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Validate => handle_config_validate(config, output),
    }
}

fn handle_config_show(config: &Config, output: &mut OutputWriter) -> Result<()> {
    match &config.source {
        Some(path) => output.info(&format!("Configuration from {}", path.display()))?,
        None => output.info("No configuration file found; showing defaults")?,
    }
    output.data(config)
}

fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(Error::config(format!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        )));
    }

    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.path, STARTER_CONFIG)?;

    output.success(&format!("✓ Created {}", args.path.display()))?;
    output.info("Add entity_files entries for every entity your rules reference.")?;
    Ok(())
}

fn handle_config_validate(config: &Config, output: &mut OutputWriter) -> Result<()> {
    let mut problems = Vec::new();

    for (key, path) in config.missing_paths() {
        problems.push(format!("{}: {} does not exist", key, path.display()));
    }

    for (entity, path) in &config.converter.entity_files {
        if !path.exists() {
            continue;
        }
        match extract_entity(path) {
            Ok(metadata) if metadata.fields.is_empty() => {
                output.warning(&format!("{}: no commented fields in {}", entity, path.display()))?;
            }
            Ok(metadata) => {
                output.debug(&format!("{}: {} field(s)", entity, metadata.fields.len()))?;
            }
            Err(e) => problems.push(format!("{}: {}", entity, e)),
        }
    }

    if let Some(path) = config.converter.definitions_file.as_ref().filter(|p| p.exists()) {
        if let Err(e) = VariableDefinitions::load(path) {
            problems.push(e.to_string());
        }
    }

    if config.converter.postprocess && config.converter.definitions_file.is_none() {
        output.warning("postprocess is enabled without a definitions_file; only entity fields get typed comparisons")?;
    }

    if problems.is_empty() {
        output.success("✓ Configuration is valid")?;
        return Ok(());
    }

    for problem in &problems {
        output.error(&format!("✗ {}", problem))?;
    }
    Err(Error::config(format!("{} problem(s) found", problems.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use std::io;
    use tempfile::TempDir;

    fn sink() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Human, false, false, 0, Box::new(io::sink()))
    }

    #[test]
    fn test_init_writes_starter_config_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf/rulegen.yaml");
        let args = || ConfigInitArgs {
            path: path.clone(),
            force: false,
        };

        handle_config_init(args(), &mut sink()).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(
            loaded.converter.input_file,
            Some(dir.path().join("conf/input/rules.txt"))
        );

        let err = handle_config_init(args(), &mut sink()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_reports_missing_paths() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.converter.input_file = Some(dir.path().join("rules.txt"));
        config.converter.definitions_file = Some(dir.path().join("Defs.java"));

        let err = handle_config_validate(&config, &mut sink()).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: 2 problem(s) found");
    }

    #[test]
    fn test_validate_defaults() {
        handle_config_validate(&Config::default(), &mut sink()).unwrap();
    }
}
