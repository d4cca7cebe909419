//! Projectr CLI - Interactive scaffolding for MSBuild C++ projects

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use projectr_core::{
    ConsoleTerminal, Outcome, PresetCatalog, PromptError, ScaffoldOptions, Writer,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter (logging is off when unset)
const LOG_ENV: &str = "PROJECTR_LOG";

/// Exit code after Ctrl+C
const INTERRUPTED_EXIT: u8 = 130;

#[derive(Parser, Debug, Default)]
#[command(name = "projectr")]
#[command(about = "CLI for scaffolding MSBuild C++ projects")]
#[command(version = CLI_VERSION)]
#[command(disable_help_flag = true)]
pub struct Args {
    /// Name of the project directory to create
    #[arg(allow_hyphen_values = true)]
    pub names: Vec<String>,

    /// YAML file overriding the built-in preset tables
    #[arg(long, env = "PROJECTR_PRESETS")]
    pub presets: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(INTERRUPTED_EXIT.into());
    })
    .ok();

    init_logging();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        // Anything clap rejects ends up on the usage screen
        Err(e) => {
            tracing::debug!(error = %e, "argument parsing failed");
            Args::default()
        }
    };

    match run(args) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        // Key reads see Ctrl+C before the signal handler gets to run
        Err(e) if is_interrupted(&e) => ExitCode::from(INTERRUPTED_EXIT),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn is_interrupted(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<PromptError>()
            .is_some_and(PromptError::is_interrupted)
            || cause
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::Interrupted)
    })
}

fn run(args: Args) -> Result<Outcome> {
    let presets =
        PresetCatalog::resolve(args.presets.as_deref()).context("Failed to load presets")?;
    let options = ScaffoldOptions {
        base_dir: std::env::current_dir().context("Failed to read current directory")?,
        presets,
    };

    let mut out = Writer::new(ConsoleTerminal::stdout());
    let result = projectr_core::run(&mut out, &args.names, &options);

    // Ensure cursor is visible on normal exit
    let _ = out.term().show_cursor();

    result
}
