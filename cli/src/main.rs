mod config;
mod test_runner;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use cbscript::Program;
use cbscript::parser::ParseError;
use placer::{
    CancelFlag, DispatchConfig, DispatchOutcome, Dispatcher, WriterInjector, wait_for_focus,
};

use crate::config::Config;

const SUBCOMMANDS: &[&str] = &["run", "emit", "check", "test", "help"];

#[derive(Parser)]
#[command(name = "cbplace", version, about = "Build command block chains from an instruction file")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile an instruction file and type the commands into the target
    Run(RunArgs),

    /// Compile an instruction file and write the commands without pacing
    Emit(EmitArgs),

    /// Parse only and report warnings
    Check(CheckArgs),

    /// Run .test.cb fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Instruction file
    file: PathBuf,

    /// Config file (defaults to ./cbplace.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Type into this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Start sending immediately instead of waiting for the window to be focused
    #[arg(long)]
    no_focus_wait: bool,
}

#[derive(clap::Args)]
struct EmitArgs {
    /// Instruction file
    file: PathBuf,

    /// Config file (defaults to ./cbplace.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write commands to this file (e.g. a .mcfunction) instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Instruction file
    file: PathBuf,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.cb file or a directory containing them
    path: PathBuf,

    /// Only run fixtures whose path contains this substring
    #[arg(short, long)]
    filter: Option<String>,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "run" so `cbplace cb.mcfunction` works.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args
        .iter()
        .skip(1)
        .position(|a| !a.starts_with('-'))
        .map(|p| p + 1)
    {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "run".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    let default_level = match cli.command {
        Command::Test(_) => "warn",
        _ => "info",
    };
    init_tracing(default_level, cli.no_color);

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let result = match cli.command {
        Command::Run(run_args) => {
            let result = do_run(run_args, color_choice);
            tracing::info!("exiting");
            result
        }
        Command::Emit(emit_args) => do_emit(emit_args, color_choice),
        Command::Check(check_args) => do_check(check_args, color_choice),
        Command::Test(test_args) => Ok(test_runner::run_tests(
            &test_args.path,
            cli.no_color,
            test_args.filter.as_deref(),
        )),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("error: {:?}", err);
            process::exit(1);
        }
    }
}

fn init_tracing(default_level: &str, no_color: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .init();
}

fn do_run(args: RunArgs, color_choice: ColorChoice) -> Result<i32> {
    let config = Config::resolve(args.config.as_deref())?;
    let Some(program) = load_program(&args.file, color_choice)? else {
        return Ok(0);
    };

    let commands = placer::compile_commands(&program, &config.placement);

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    ctrlc::set_handler(move || on_interrupt.cancel())
        .context("failed to install Ctrl+C handler")?;

    if !args.no_focus_wait {
        wait_for_focus(config.dispatch.focus_wait());
    }

    let writer = open_output(args.output.as_deref())?;
    let injector = WriterInjector::new(writer, &config.dispatch);
    let mut dispatcher = Dispatcher::new(injector, config.dispatch.clone(), cancel);
    let report = dispatcher.dispatch(&commands)?;

    match report.outcome {
        DispatchOutcome::Completed => {
            tracing::info!(sent = report.sent, "all instructions have been processed");
        }
        DispatchOutcome::Interrupted => {
            tracing::info!(
                sent = report.sent,
                total = commands.len(),
                "interrupted (Ctrl+C), remaining commands were not sent"
            );
        }
    }
    Ok(0)
}

fn do_emit(args: EmitArgs, color_choice: ColorChoice) -> Result<i32> {
    let config = Config::resolve(args.config.as_deref())?;
    let Some(program) = load_program(&args.file, color_choice)? else {
        return Ok(0);
    };

    let commands = placer::compile_commands(&program, &config.placement);
    let immediate = DispatchConfig::immediate();
    let writer = open_output(args.output.as_deref())?;
    let mut dispatcher = Dispatcher::new(
        WriterInjector::new(writer, &immediate),
        immediate,
        CancelFlag::new(),
    );
    let report = dispatcher.dispatch(&commands)?;
    tracing::info!(commands = report.sent, "emitted");
    Ok(0)
}

fn do_check(args: CheckArgs, color_choice: ColorChoice) -> Result<i32> {
    let Some(program) = load_program(&args.file, color_choice)? else {
        return Ok(0);
    };
    eprintln!(
        "ok: {} has {} instructions ({} command blocks)",
        args.file.display(),
        program.len(),
        program.command_count()
    );
    Ok(0)
}

/// Read and parse `path`, printing any warnings.
///
/// Returns `None` when the file holds no instructions.
fn load_program(path: &Path, color_choice: ColorChoice) -> Result<Option<Program>> {
    tracing::info!(file = %path.display(), "reading instructions");
    let source = cbscript::parser::read_source(path)?;

    let mut files = SimpleFiles::new();
    let file_id = files.add(path.display().to_string(), source.clone());

    let (program, warnings) = cbscript::parser::Parser::new(source, file_id).parse();
    emit_diagnostics(color_choice, &files, &warnings);

    if program.is_empty() {
        eprintln!("no instructions to process were found in {}", path.display());
        return Ok(None);
    }
    Ok(Some(program))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("cannot create output file '{}'", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    })
}

fn emit_diagnostics(
    color_choice: ColorChoice,
    files: &SimpleFiles<String, String>,
    diagnostics: &[ParseError],
) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for diag in diagnostics {
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diag.to_diagnostic());
    }
}
