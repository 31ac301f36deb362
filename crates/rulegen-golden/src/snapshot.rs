//! Expected-output files for golden cases

use crate::Result;
use std::fs;
use std::path::Path;

/// Normalize generated or expected Java before comparison
///
/// Line endings become `\n`, trailing whitespace is dropped from every line and
/// the text ends with exactly one newline (none when empty).
pub fn normalize_output(text: &str) -> String {
    let lines: Vec<&str> = text
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim_end)
        .collect();
    let mut out = lines.join("\n").trim_end_matches('\n').to_string();
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Reads and writes expectation files
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotManager;

impl SnapshotManager {
    pub fn new() -> Self {
        Self
    }

    /// Whether an expectation exists
    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Load an expectation, normalized
    pub fn load(&self, path: &Path) -> Result<String> {
        Ok(normalize_output(&fs::read_to_string(path)?))
    }

    /// Write an expectation, keeping the previous one as `<file>.bak`
    pub fn save(&self, path: &Path, content: &str) -> Result<()> {
        if path.exists() {
            let mut backup = path.as_os_str().to_owned();
            backup.push(".bak");
            fs::copy(path, &backup)?;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, normalize_output(content))?;
        Ok(())
    }
}
