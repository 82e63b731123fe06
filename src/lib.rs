//! # sprig
//!
//! sprig is an embeddable interpreter for a small dynamically typed scripting
//! language. Source text is submitted one unit at a time to a
//! [`Session`](interpreter::session::Session), which keeps variables and
//! functions alive between submissions and reports everything it produces
//! through listeners registered on its output channel.
//!
//! ```
//! use std::{cell::RefCell, rc::Rc};
//!
//! use sprig::interpreter::{output::OutputEvent, session::Session};
//!
//! let mut session = Session::new();
//! let lines = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&lines);
//! session.register(move |event: &OutputEvent| sink.borrow_mut().push(event.text.clone()));
//!
//! session.submit("fun square(n) { return n * n }").unwrap();
//! session.submit("print square(12)").unwrap();
//!
//! assert_eq!(*lines.borrow(), vec!["144".to_string()]);
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related types
/// that represent the syntactic structure of source code as a tree. The AST is
/// built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source positions to AST nodes for error reporting.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while running a
/// submission. Every error carries the source position it refers to.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Wraps them in a single `InterpreterError` tagged with its stage.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, scopes, values and
/// output to provide a complete runtime for source code evaluation.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides sessions as the entry point for running user code.
/// - Delivers results and errors to registered listeners.
pub mod interpreter;
/// General utilities shared by the interpreter phases.
///
/// # Responsibilities
/// - Represent source positions and map byte offsets to them.
pub mod util;

pub use interpreter::session::evaluate_source;
