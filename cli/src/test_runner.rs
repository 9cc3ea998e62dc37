use std::path::{Path, PathBuf};

use serde::Deserialize;

use cbscript::parser::ParseError;
use placer::PlacementConfig;

const FIXTURE_SUFFIX: &str = ".test.cb";

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning must be on this 1-based line of the instruction source
    /// (counted after the frontmatter).
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Placement settings for this fixture. Defaults apply when absent.
    #[serde(default)]
    pub placement: PlacementConfig,

    /// Expected rendered commands, in order.
    #[serde(default)]
    pub expect_commands: Option<Vec<String>>,

    /// If true, the source must produce no instructions at all.
    #[serde(default)]
    pub expect_empty: bool,

    /// Expected warnings. If present (even empty), warning count and content are checked.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

/// Split a `.test.cb` file into its TOML config and instruction source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.strip_suffix(FIXTURE_SUFFIX))
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("cannot read file: {}", e)),
            };
        }
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("frontmatter error: {}", e)),
            };
        }
    };

    let outcome = match check_fixture(&config, source) {
        None => TestOutcome::Pass,
        Some(reason) => TestOutcome::Fail(reason),
    };

    TestResult {
        path: path.to_path_buf(),
        description: config.description,
        outcome,
    }
}

/// Returns `Some(reason)` on the first unmet expectation.
fn check_fixture(config: &TestConfig, source: &str) -> Option<String> {
    let (program, warnings) = cbscript::parser::Parser::new(source.to_string(), 0).parse();

    if let Some(expected) = &config.expect_warnings {
        if let Some(reason) = check_warnings(&warnings, expected) {
            return Some(reason);
        }
    }

    if config.expect_empty && !program.is_empty() {
        return Some(format!(
            "expected no instructions, got {}",
            program.len()
        ));
    }

    if let Some(expected) = &config.expect_commands {
        let actual = placer::compile_commands(&program, &config.placement);
        if let Some(reason) = check_commands(&actual, expected) {
            return Some(reason);
        }
    }

    None
}

fn check_commands(actual: &[String], expected: &[String]) -> Option<String> {
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        if a != e {
            return Some(format!(
                "command[{}] mismatch\n  expected: {}\n  actual:   {}",
                i, e, a
            ));
        }
    }

    if actual.len() != expected.len() {
        let extra = if actual.len() > expected.len() {
            format!("  first unexpected: {}", actual[expected.len()])
        } else {
            format!("  first missing:    {}", expected[actual.len()])
        };
        return Some(format!(
            "expected {} command(s), got {}\n{}",
            expected.len(),
            actual.len(),
            extra
        ));
    }

    None
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(warnings: &[ParseError], expected: &[ExpectedWarning]) -> Option<String> {
    if warnings.len() != expected.len() {
        let actual_msgs: Vec<String> = warnings
            .iter()
            .map(|w| format!("  - line {}: {}", w.line, w.message))
            .collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            warnings.len(),
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in warnings.iter().zip(expected.iter()).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, actual.message
            ));
        }

        if let Some(expected_line) = expected.line {
            if actual.line != expected_line {
                return Some(format!(
                    "warning[{}]: expected on line {}, but it is on line {}",
                    i, expected_line, actual.line
                ));
            }
        }
    }

    None
}

/// Recursively collect fixture files under `root`, sorted by path.
fn discover(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    collect_tests(root, &mut out);
    out.sort();
    out
}

fn collect_tests(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, out);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(FIXTURE_SUFFIX))
        {
            out.push(path);
        }
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

/// Run every fixture under `path` (or a single file).
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, filter: Option<&str>) -> i32 {
    let files = if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        discover(path)
    };

    let files: Vec<PathBuf> = match filter {
        Some(filter) => files
            .into_iter()
            .filter(|f| f.to_string_lossy().contains(filter))
            .collect(),
        None => files,
    };

    if files.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for file in &files {
        let result = run_single_test(file);
        match &result.outcome {
            TestOutcome::Pass => {
                passed += 1;
                eprintln!("  {}  {}", pass_label(no_color), result.label());
            }
            TestOutcome::Fail(_) => {
                eprintln!("  {}  {}", fail_label(no_color), result.label());
                failures.push(result);
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!("test result: {}. {} passed, 0 failed", ok, passed);
        0
    } else {
        let label = if no_color { "FAILED" } else { "\x1b[31mFAILED\x1b[0m" };
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            label,
            passed,
            failed,
            passed + failed
        );
        1
    }
}
