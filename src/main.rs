//! sprig command line entry point.
//!
//! Usage:
//!   sprig                      # Interactive REPL
//!   sprig -c <source>          # Run source and exit
//!   sprig a.sprig b.sprig      # Run scripts in one session

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use sprig::interpreter::{
    evaluator::core::DEFAULT_MAX_CALL_DEPTH,
    output::{OutputEvent, OutputKind},
    session::{Session, SessionConfig},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod repl;

/// sprig is a small dynamically typed scripting language with an interactive
/// read-eval-print loop.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script files to run, in order, in a single session.
    files: Vec<PathBuf>,

    /// Runs the given source instead of starting the interactive loop.
    #[arg(short, long, value_name = "SOURCE", conflicts_with = "files")]
    command: Option<String>,

    /// Prints the value of every top-level expression statement, as the
    /// interactive loop does.
    #[arg(short, long)]
    echo: bool,

    /// Maximum depth of nested function calls.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Line history file of the interactive loop.
    #[arg(long, value_name = "PATH", conflicts_with = "no_history")]
    history: Option<PathBuf>,

    /// Neither loads nor saves line history.
    #[arg(long)]
    no_history: bool,
}

fn main() -> ExitCode {
    // Respects RUST_LOG; silent by default.
    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr))
                                  .with(EnvFilter::from_default_env())
                                  .init();

    match run(&Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let interactive = args.command.is_none() && args.files.is_empty();
    let mut session = Session::with_config(SessionConfig { echo_results:   interactive || args.echo,
                                                           max_call_depth: args.max_call_depth, });
    session.register(print_event);

    if interactive {
        repl::run(&mut session, history_path(args))?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut failed = false;
    if let Some(source) = &args.command {
        failed |= session.submit(source).is_err();
    }
    for path in &args.files {
        let source = fs::read_to_string(path).with_context(|| {
                                                 format!("Failed to read the script '{}'",
                                                         path.display())
                                             })?;
        failed |= session.submit(&source).is_err();
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Writes results to stdout and errors to stderr.
fn print_event(event: &OutputEvent) {
    match event.kind {
        OutputKind::Error(_) => eprintln!("{}", event.text),
        OutputKind::Print | OutputKind::Value => println!("{}", event.text),
    }
}

fn history_path(args: &Args) -> Option<PathBuf> {
    if args.no_history {
        return None;
    }
    args.history.clone().or_else(|| {
                            directories::BaseDirs::new().map(|dirs| {
                                                            dirs.data_dir()
                                                                .join("sprig")
                                                                .join("history.txt")
                                                        })
                        })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn arguments_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn command_and_files_conflict() {
        assert!(Args::try_parse_from(["sprig", "-c", "1", "script.sprig"]).is_err());
    }

    #[test]
    fn no_history_disables_the_history_file() {
        let args = Args::try_parse_from(["sprig", "--no-history"]).unwrap();
        assert_eq!(history_path(&args), None);

        let args = Args::try_parse_from(["sprig", "--history", "h.txt"]).unwrap();
        assert_eq!(history_path(&args), Some(PathBuf::from("h.txt")));
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["sprig"]).unwrap();
        assert_eq!(args.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
        assert!(!args.echo);
        assert!(args.files.is_empty());
    }
}
