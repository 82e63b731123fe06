/// Source positions and offset-to-position mapping.
///
/// This module provides the `Position` type attached to every lexeme, AST
/// node and error, and the `LineIndex` used by the lexer to translate byte
/// offsets of a submission into line and column numbers.
///
/// # Responsibilities
/// - Represent 1-based line/column locations for diagnostics.
/// - Convert byte offsets into positions without rescanning the source.
pub mod position;

/// Stack growth for the recursive parser and evaluator.
///
/// Deeply nested source and deep call chains recurse once per level. The
/// helpers here grow the native stack on demand so that such input fails
/// with an interpreter error instead of overflowing the thread's stack.
pub mod stack;
