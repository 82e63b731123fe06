//! The interactive read-eval-print loop.
//!
//! Lines are read with rustyline. A submission may span several lines: while
//! a bracket or a string is still open the loop keeps reading with a
//! continuation prompt and then submits everything at once.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use rustyline::{Editor, error::ReadlineError, history::DefaultHistory};
use sprig::{
    error::LexError,
    interpreter::{
        lexer::{Token, tokenize},
        session::Session,
        value::core::Value,
    },
};
use tracing::{debug, warn};

const PROMPT: &str = "sprig> ";
const CONTINUATION_PROMPT: &str = "   ... ";

const HELP_TEXT: &str = r"Commands:
  :help          Show this help
  :env           List the variables and functions defined so far
  :reset         Forget all variables and functions
  :quit, :exit   Leave the REPL

Statements end at a newline or ';'. Lines with an open '(', '{' or string
continue on the next line. Ctrl-C discards the pending input.";

/// A REPL command starting with `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MetaCommand {
    Help,
    Quit,
    Reset,
    Env,
    Unknown(String),
}

impl MetaCommand {
    /// Recognizes `line` as a meta command. Anything not starting with `:` is
    /// source code.
    fn parse(line: &str) -> Option<Self> {
        let name = line.trim().strip_prefix(':')?;
        Some(match name.trim() {
                 "help" => Self::Help,
                 "quit" | "exit" => Self::Quit,
                 "reset" => Self::Reset,
                 "env" => Self::Env,
                 other => Self::Unknown(other.to_string()),
             })
    }
}

/// Result from meta-command handling.
#[derive(Debug, PartialEq, Eq)]
enum MetaResult {
    Continue,
    Exit,
}

/// Runs the interactive loop until end of input or `:quit`.
///
/// Output of the submissions reaches the user through the listeners already
/// registered on `session`.
pub fn run(session: &mut Session, history_path: Option<PathBuf>) -> Result<()> {
    println!("sprig {}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for commands, :quit to exit.");

    let mut rl: Editor<(), DefaultHistory> = Editor::new().context("Failed to create editor")?;
    if let Some(path) = &history_path {
        load_history(&mut rl, path);
    }

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { PROMPT } else { CONTINUATION_PROMPT };

        match rl.readline(prompt) {
            Ok(line) => {
                if buffer.is_empty()
                   && let Some(command) = MetaCommand::parse(&line)
                {
                    add_history(&mut rl, &line);
                    if handle_meta(&command, session) == MetaResult::Exit {
                        break;
                    }
                    continue;
                }

                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&line);
                if needs_continuation(&buffer) {
                    continue;
                }

                let submission = std::mem::take(&mut buffer);
                if submission.trim().is_empty() {
                    continue;
                }
                add_history(&mut rl, &submission);
                // Errors were already shown by the output listener.
                if session.submit(&submission).is_err() {
                    debug!("submission failed");
                }
            },
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                println!("^C");
            },
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                save_history(&mut rl, history_path.as_deref());
                return Err(anyhow!("Failed to read input: {err}"));
            },
        }
    }

    save_history(&mut rl, history_path.as_deref());
    Ok(())
}

fn handle_meta(command: &MetaCommand, session: &mut Session) -> MetaResult {
    match command {
        MetaCommand::Help => println!("{HELP_TEXT}"),
        MetaCommand::Quit => return MetaResult::Exit,
        MetaCommand::Reset => {
            session.reset();
            println!("Session reset.");
        },
        MetaCommand::Env => {
            let bindings = describe_bindings(session);
            if bindings.is_empty() {
                println!("(no bindings)");
            }
            for binding in bindings {
                println!("{binding}");
            }
        },
        MetaCommand::Unknown(name) => eprintln!("Unknown command ':{name}'. Type :help for commands."),
    }
    MetaResult::Continue
}

/// Renders the user-defined global bindings as `name = value`, sorted by
/// name. Builtins are left out.
fn describe_bindings(session: &Session) -> Vec<String> {
    let globals = session.globals();
    globals.names()
           .into_iter()
           .filter_map(|name| match globals.get(&name) {
               Some(Value::Builtin(_)) | None => None,
               Some(value) => Some(format!("{name} = {value}")),
           })
           .collect()
}

/// Whether `source` is an incomplete submission: a string is still open or
/// more `(`/`{` have been opened than closed.
///
/// Any other lexical error ends the submission so it can be reported.
fn needs_continuation(source: &str) -> bool {
    match tokenize(source) {
        Ok(lexemes) => {
            let depth = lexemes.iter().fold(0_i64, |depth, lexeme| match lexeme.token {
                                          Token::LParen | Token::LBrace => depth + 1,
                                          Token::RParen | Token::RBrace => depth - 1,
                                          _ => depth,
                                      });
            depth > 0
        },
        Err(LexError::UnterminatedString { .. }) => true,
        Err(_) => false,
    }
}

fn load_history(rl: &mut Editor<(), DefaultHistory>, path: &Path) {
    if let Err(e) = rl.load_history(path) {
        let is_not_found = matches!(&e, ReadlineError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound);
        if !is_not_found {
            warn!("Failed to load history: {e}");
        }
    }
}

fn add_history(rl: &mut Editor<(), DefaultHistory>, entry: &str) {
    if let Err(e) = rl.add_history_entry(entry) {
        warn!("Failed to add history entry: {e}");
    }
}

fn save_history(rl: &mut Editor<(), DefaultHistory>, path: Option<&Path>) {
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent()
       && let Err(e) = std::fs::create_dir_all(parent)
    {
        warn!("Failed to create history directory: {e}");
    }
    if let Err(e) = rl.save_history(path) {
        warn!("Failed to save history: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_commands_are_recognized() {
        assert_eq!(MetaCommand::parse(":help"), Some(MetaCommand::Help));
        assert_eq!(MetaCommand::parse("  :quit "), Some(MetaCommand::Quit));
        assert_eq!(MetaCommand::parse(":exit"), Some(MetaCommand::Quit));
        assert_eq!(MetaCommand::parse(":reset"), Some(MetaCommand::Reset));
        assert_eq!(MetaCommand::parse(":env"), Some(MetaCommand::Env));
        assert_eq!(MetaCommand::parse(":frob"), Some(MetaCommand::Unknown("frob".to_string())));
        assert_eq!(MetaCommand::parse("print 1"), None);
    }

    #[test]
    fn open_brackets_continue_the_submission() {
        assert!(needs_continuation("fun f(n) {"));
        assert!(needs_continuation("print max(1,"));
        assert!(needs_continuation("print \"abc"));
        assert!(!needs_continuation("fun f(n) { return n }"));
        assert!(!needs_continuation("print 1"));
    }

    #[test]
    fn surplus_closers_and_bad_characters_are_submitted() {
        assert!(!needs_continuation("}"));
        assert!(!needs_continuation("{ @"));
    }

    #[test]
    fn env_lists_user_bindings_only() {
        let mut session = Session::new();
        session.set_echo(false);
        session.submit("let b = 2; let a = \"x\"; fun f() {}").unwrap();

        assert_eq!(describe_bindings(&session), vec!["a = x", "b = 2", "f = <fn f>"]);
    }

    #[test]
    fn reset_meta_command_clears_bindings() {
        let mut session = Session::new();
        session.submit("let a = 1").unwrap();

        assert_eq!(handle_meta(&MetaCommand::Reset, &mut session), MetaResult::Continue);
        assert!(describe_bindings(&session).is_empty());
        assert_eq!(handle_meta(&MetaCommand::Quit, &mut session), MetaResult::Exit);
    }
}
