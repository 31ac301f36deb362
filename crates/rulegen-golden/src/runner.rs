//! Golden test runner for executing corpus cases

use crate::{
    corpus::{CorpusManager, GoldenCase},
    diff::DiffEngine,
    snapshot::{normalize_output, SnapshotManager},
    GoldenConfig, GoldenError, Result,
};
use colored::*;
use rulegen_core::Transpiler;
use std::time::Instant;

/// Result of running a golden test
#[derive(Debug)]
pub struct TestResult {
    /// Name of the case
    pub name: String,

    /// Whether the test passed
    pub passed: bool,

    /// Error message if failed
    pub error: Option<String>,

    /// Diff output if comparison failed
    pub diff: Option<String>,

    /// Execution time in milliseconds
    pub duration_ms: u64,

    /// Whether the expectation was written
    pub updated: bool,
}

impl TestResult {
    /// Print the test result
    pub fn print(&self, verbose: bool) {
        let status = if self.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("{} {} ({}ms)", status, self.name, self.duration_ms);

        if let Some(ref error) = self.error {
            println!("  {}: {}", "Error".red(), error);
        }

        if verbose || !self.passed {
            if let Some(ref diff) = self.diff {
                println!("{}", diff);
            }
        }

        if self.updated {
            println!("  {}", "Expectation updated".yellow());
        }
    }
}

/// Outcome of one case before timing is attached
struct Outcome {
    passed: bool,
    diff: Option<String>,
    updated: bool,
}

/// Runner for golden tests
pub struct GoldenTestRunner {
    config: GoldenConfig,
    corpus_manager: CorpusManager,
    snapshot_manager: SnapshotManager,
}

impl GoldenTestRunner {
    /// Create a new test runner
    pub fn new(config: GoldenConfig) -> Self {
        let corpus_manager = CorpusManager::new(&config.corpus_dir);

        Self {
            config,
            corpus_manager,
            snapshot_manager: SnapshotManager::new(),
        }
    }

    /// Run a single case by directory name
    pub fn run_case(&self, name: &str) -> Result<TestResult> {
        let case = self.corpus_manager.load_case(name)?;
        let result = self.run_loaded(&case);

        if self.config.verbose {
            result.print(true);
        }

        if result.passed {
            Ok(result)
        } else {
            Err(GoldenError::TestFailed(format!(
                "Case '{}' failed: {}{}",
                name,
                result.error.as_deref().unwrap_or("Unknown error"),
                result
                    .diff
                    .as_deref()
                    .map(|d| format!("\n{}", d))
                    .unwrap_or_default()
            )))
        }
    }

    /// Run every enabled case whose name or tags match `pattern`
    pub fn run_batch(&self, pattern: &str) -> Result<Vec<TestResult>> {
        let cases = self.corpus_manager.discover()?;
        let cases = self
            .corpus_manager
            .filter_enabled(self.corpus_manager.filter(cases, pattern));

        if cases.is_empty() {
            return Err(GoldenError::CorpusError(format!(
                "No cases found matching pattern '{}'",
                pattern
            )));
        }

        println!("Running {} golden cases...\n", cases.len());

        let results: Vec<TestResult> = cases
            .iter()
            .map(|case| {
                let result = self.run_loaded(case);
                result.print(self.config.verbose);
                result
            })
            .collect();

        let failed = results.iter().filter(|r| !r.passed).count();
        println!("\n{}", "=== Golden Summary ===".bold());
        println!(
            "{}: {} passed, {} failed",
            "Results".bold(),
            (results.len() - failed).to_string().green(),
            failed.to_string().red()
        );

        if failed > 0 {
            Err(GoldenError::TestFailed(format!("{} case(s) failed", failed)))
        } else {
            Ok(results)
        }
    }

    /// Names of all discovered cases
    pub fn list_cases(&self) -> Result<Vec<String>> {
        Ok(self
            .corpus_manager
            .discover()?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    fn run_loaded(&self, case: &GoldenCase) -> TestResult {
        let start = Instant::now();
        let outcome = self.execute(case);
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(outcome) => TestResult {
                name: case.name.clone(),
                passed: outcome.passed,
                error: (!outcome.passed).then(|| "Output differs from expectation".to_string()),
                diff: outcome.diff,
                duration_ms,
                updated: outcome.updated,
            },
            Err(e) => TestResult {
                name: case.name.clone(),
                passed: false,
                error: Some(e.to_string()),
                diff: None,
                duration_ms,
                updated: false,
            },
        }
    }

    fn execute(&self, case: &GoldenCase) -> Result<Outcome> {
        if !case.spec.enabled {
            return Ok(Outcome {
                passed: true,
                diff: None,
                updated: false,
            });
        }

        let actual = self.transpile(case)?;
        let expected_path = case.expected_path();

        if !self.snapshot_manager.exists(&expected_path) {
            if self.config.create_missing || self.config.update_snapshots {
                self.snapshot_manager.save(&expected_path, &actual)?;
                return Ok(Outcome {
                    passed: true,
                    diff: None,
                    updated: true,
                });
            }
            return Err(GoldenError::SnapshotMismatch(format!(
                "{} does not exist. Run with UPDATE_GOLDEN=1 to create it.",
                expected_path.display()
            )));
        }

        let expected = self.snapshot_manager.load(&expected_path)?;
        let diff = DiffEngine::new(self.config.diff_options.clone()).compare(&expected, &actual);

        if diff.matches {
            Ok(Outcome {
                passed: true,
                diff: None,
                updated: false,
            })
        } else if self.config.update_snapshots {
            self.snapshot_manager.save(&expected_path, &actual)?;
            Ok(Outcome {
                passed: true,
                diff: Some(diff.diff_output),
                updated: true,
            })
        } else {
            Ok(Outcome {
                passed: false,
                diff: Some(diff.diff_output),
                updated: false,
            })
        }
    }

    fn transpile(&self, case: &GoldenCase) -> Result<String> {
        let lines = case.read_input()?;
        let mut transpiler = Transpiler::new(case.spec.options.clone())?;
        let output = transpiler.run(&lines);
        Ok(normalize_output(&output.render()))
    }
}
