use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn cbplace(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cbplace"))
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run cbplace")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn cases_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../cases")
}

const NO_DELAYS: &str = "[dispatch]
focus_wait_ms = 0
open_delay_ms = 0
char_delay_ms = 0
submit_delay_ms = 0
command_delay_ms = 0
";

#[test]
fn fixtures_pass() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let cases = cases_dir();
    let output = cbplace(&["--no-color", "test", cases.to_str().unwrap()], dir.path());
    assert!(output.status.success(), "fixtures failed:\n{}", stderr(&output));
    assert!(stderr(&output).contains("test result: ok"));
}

#[test]
fn emit_writes_commands_to_stdout() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join("cb.mcfunction"), "# move, 0, 60, 0\nsay hi\nsay bye\n").unwrap();

    let output = cbplace(&["emit", "cb.mcfunction"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "fill 0 60 0 0 128 0 minecraft:air replace\n\
         setblock 0 60 0 minecraft:repeating_command_block[facing=up,conditional=false]{Command:\"say hi\",auto:0b} replace\n\
         setblock 0 61 0 minecraft:chain_command_block[facing=up,conditional=false]{Command:\"say bye\",auto:1b} replace\n"
    );
}

#[test]
fn emit_picks_up_config_from_working_directory() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join("cb.mcfunction"), "say hi\n").unwrap();
    std::fs::write(
        dir.path().join("cbplace.toml"),
        "[placement]\norigin = { x = 7, y = 8, z = 9 }\nfacing = \"down\"\n",
    )
    .unwrap();

    let output = cbplace(&["emit", "cb.mcfunction", "-o", "out.mcfunction"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    let written = std::fs::read_to_string(dir.path().join("out.mcfunction")).unwrap();
    assert_eq!(
        written,
        "setblock 7 8 9 minecraft:repeating_command_block[facing=down,conditional=false]{Command:\"say hi\",auto:0b} replace\n"
    );
}

#[test]
fn run_types_commands_into_output_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join("cb.mcfunction"), "# move, 1, 300, 1\nsay a\nsay b\n").unwrap();
    std::fs::write(dir.path().join("fast.toml"), NO_DELAYS).unwrap();

    let output = cbplace(
        &["run", "cb.mcfunction", "--config", "fast.toml", "--output", "typed.txt"],
        dir.path(),
    );
    assert!(output.status.success(), "{}", stderr(&output));
    let typed = std::fs::read_to_string(dir.path().join("typed.txt")).unwrap();
    assert_eq!(typed.lines().count(), 2);
    assert!(typed.starts_with("setblock 1 300 1 minecraft:repeating_command_block"));
}

#[test]
fn bare_file_argument_means_run() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join("cb.mcfunction"), "say a\n").unwrap();
    std::fs::write(dir.path().join("cbplace.toml"), NO_DELAYS).unwrap();

    let output = cbplace(&["cb.mcfunction", "--no-focus-wait"], dir.path());
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).starts_with("setblock 0 60 0 "));
}

#[test]
fn missing_source_fails() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let output = cbplace(&["--no-color", "run", "nope.mcfunction", "--no-focus-wait"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not found"), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn comment_only_source_is_not_an_error() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join("cb.mcfunction"), "# comment\n\n").unwrap();

    let output = cbplace(&["--no-color", "run", "cb.mcfunction", "--no-focus-wait"], dir.path());
    assert!(output.status.success());
    assert!(stderr(&output).contains("no instructions"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn check_reports_malformed_move() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join("cb.mcfunction"), "say a\n# move, abc, 1, 2\nsay b\n").unwrap();

    let output = cbplace(&["--no-color", "check", "cb.mcfunction"], dir.path());
    assert!(output.status.success());
    let err = stderr(&output);
    assert!(err.contains("invalid coordinates in move instruction at line 2"), "{}", err);
    assert_eq!(err.matches("invalid coordinates").count(), 1, "{}", err);
    assert!(!err.contains("skipping move"), "{}", err);
    assert!(err.contains("2 instructions"), "{}", err);
}

#[test]
fn bad_config_is_reported() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    std::fs::write(dir.path().join("cb.mcfunction"), "say a\n").unwrap();
    std::fs::write(dir.path().join("cbplace.toml"), "[placement]\nfacing = 3\n").unwrap();

    let output = cbplace(&["--no-color", "emit", "cb.mcfunction"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to parse config file"));
}
