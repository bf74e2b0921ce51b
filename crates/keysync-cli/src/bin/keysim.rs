//! Headless driver: replay an event script through the engine and print what
//! the document looks like afterwards.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use keysync_cli::script::{parse_script, ScriptError, ScriptRunner};
use keysync_cli::seq_keyboard::{PassthroughKeyboard, SequenceKeyboard};
use keysync_core::keyboard::KeyboardRegistry;
use keysync_core::settings::{Settings, SettingsError};
use keysync_session::InputSession;

#[derive(Parser)]
#[command(name = "keysim", about = "Keystroke engine simulator", version)]
struct Cli {
    /// Settings file (TOML). Defaults apply when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON-lines event script and print the resulting document.
    Run {
        /// Script path, or `-` for stdin.
        script: PathBuf,
        /// Print every committed edit, not just the final document.
        #[arg(long)]
        verbose: bool,
    },
    /// List the installed keyboards.
    Keyboards,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    ReadScript {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

fn registry() -> KeyboardRegistry {
    KeyboardRegistry::new(vec![
        Box::new(SequenceKeyboard::latin_demo()),
        Box::new(PassthroughKeyboard),
    ])
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    if settings.logging {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Command::Run { script, verbose } => {
            let text = if script.as_os_str() == "-" {
                use std::io::Read as _;
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|source| CliError::ReadScript {
                        path: script.clone(),
                        source,
                    })?;
                buf
            } else {
                std::fs::read_to_string(&script).map_err(|source| CliError::ReadScript {
                    path: script.clone(),
                    source,
                })?
            };
            let events = parse_script(&text)?;

            let mut session = InputSession::new(registry());
            session.set_active_keyboard(settings.active_keyboard);

            let mut runner = ScriptRunner::new(session);
            runner.run(&events)?;

            if verbose {
                for commit in &runner.host.commits {
                    println!("commit: {commit:?}");
                }
            }
            println!("{}", runner.host.document);
        }
        Command::Keyboards => {
            let session = InputSession::new(registry());
            for (idx, name) in session.keyboard_names().iter().enumerate() {
                let marker = if idx == settings.active_keyboard {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {idx}: {name}");
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("keysim: {err}");
            ExitCode::FAILURE
        }
    }
}
