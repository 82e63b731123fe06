/// Entry points, the statement sink and the assignment level.
///
/// Contains `parse`, `parse_into`, the `StatementSink` abstraction that
/// decouples statement construction from storage, and the lowest-precedence
/// expression rule.
pub mod core;

/// Statement and declaration parsing.
///
/// Implements recursive-descent rules for `let`, `fun`, `print`, `if`,
/// `while`, `return`, `break`, `continue` and expression statements.
pub mod statement;

/// Block parsing.
///
/// Parses brace-delimited statement sequences and reports unterminated blocks.
pub mod block;

/// Binary operator parsing.
///
/// Implements the precedence-climbing loop and the binary operator table.
pub mod binary;

/// Unary, call and primary expression parsing.
///
/// Handles prefix operators, call suffixes, literals, identifiers and
/// parenthesized groupings.
pub mod unary;

/// Shared helpers for the parser.
///
/// Provides comma-separated lists, identifier and token expectations and
/// error construction.
pub mod utils;

pub use self::core::{Nesting, ParseResult, StatementSink, parse, parse_into};
