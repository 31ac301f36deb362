//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Rulegen - convert Japanese design-document rule lines into Java
///
/// Reads condition and assignment lines written in the design notation,
/// resolves field references against generated entity classes and emits
/// Java statements and `if` blocks.
#[derive(Parser, Debug)]
#[command(
    name = "rulegen",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "RULEGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert rule lines into Java code
    Convert(ConvertArgs),

    /// Show the field metadata extracted from an entity source file
    Inspect(InspectArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the convert command
#[derive(Parser, Debug, Default)]
pub struct ConvertArgs {
    /// Rule lines to convert (stdin when omitted and not configured)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Write generated code to this file instead of stdout
    #[arg(long = "out", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Conversion mode
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Entity source file for an entity identifier (repeatable)
    #[arg(long = "entity", value_name = "ID=PATH", value_parser = parse_key_value)]
    pub entities: Vec<(String, String)>,

    /// Receiver instance name for an entity identifier (repeatable)
    #[arg(long = "instance", value_name = "ID=NAME", value_parser = parse_key_value)]
    pub instances: Vec<(String, String)>,

    /// Variable definitions used when rewriting comparisons
    #[arg(long, value_name = "FILE")]
    pub definitions: Option<PathBuf>,

    /// Rewrite comparisons into helper calls
    #[arg(long, conflicts_with = "no_postprocess")]
    pub postprocess: bool,

    /// Leave comparisons as generated
    #[arg(long)]
    pub no_postprocess: bool,

    /// What to do with lines no rule recognizes
    #[arg(long, value_enum)]
    pub todo_policy: Option<TodoPolicy>,

    /// How far a condition block extends
    #[arg(long, value_enum)]
    pub block_scope: Option<Scope>,

    /// Precede entity assignments with the field comment
    #[arg(long)]
    pub field_comments: bool,

    /// Print a summary of the run and the TODO lines
    #[arg(long)]
    pub report: bool,
}

impl ConvertArgs {
    /// The postprocess override, if any flag was given
    pub fn postprocess_override(&self) -> Option<bool> {
        match (self.postprocess, self.no_postprocess) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Entity source file (Java)
    #[arg(value_name = "ENTITY_FILE")]
    pub entity_file: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Write a starter configuration file
    Init(ConfigInitArgs),

    /// Check that every path the configuration references exists
    Validate,
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the configuration
    #[arg(long, default_value = "rulegen.yaml")]
    pub path: PathBuf,

    /// Force overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Conversion mode
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Condition blocks plus standalone assignments
    Block,
    /// Every line converted on its own
    Line,
}

/// Handling of unrecognized lines
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TodoPolicy {
    /// Drop them
    Skip,
    /// Emit a `//TODO:` comment
    Todo,
}

/// Extent of a condition block
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Scope {
    /// Indented lines after the condition
    Indented,
    /// Every line up to the next condition
    UntilNextCondition,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

/// Parse `KEY=VALUE`; the key may itself contain no `=`
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return Err(format!("expected KEY=VALUE, got '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

impl From<Mode> for rulegen_core::ConversionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Block => rulegen_core::ConversionMode::Block,
            Mode::Line => rulegen_core::ConversionMode::Line,
        }
    }
}

impl From<TodoPolicy> for rulegen_core::UnrecognizedPolicy {
    fn from(policy: TodoPolicy) -> Self {
        match policy {
            TodoPolicy::Skip => rulegen_core::UnrecognizedPolicy::Skip,
            TodoPolicy::Todo => rulegen_core::UnrecognizedPolicy::Todo,
        }
    }
}

impl From<Scope> for rulegen_core::BlockScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Indented => rulegen_core::BlockScope::Indented,
            Scope::UntilNextCondition => rulegen_core::BlockScope::UntilNextCondition,
        }
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
