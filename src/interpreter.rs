/// The environment module implements lexical scopes.
///
/// Scopes map names to values and are chained to their enclosing scope
/// through shared pointers, so closures can keep the scope they were declared
/// in alive after it has been left.
///
/// # Responsibilities
/// - Defines, assigns and looks up variables along the scope chain.
/// - Reports undefined variables and assignments to undeclared names.
pub mod environment;
/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// performs arithmetic and logical operations, calls functions and emits
/// output. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Propagates `return`, `break` and `continue` as explicit control-flow
///   signals.
/// - Reports runtime errors such as division by zero or type mismatches.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer (tokenizer) reads the raw source text and produces a sequence of
/// lexemes, each corresponding to meaningful language elements such as
/// numbers, strings, identifiers, operators, delimiters, and keywords. This is
/// the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with source positions.
/// - Skips whitespace and comments.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The output module decouples evaluation from presentation.
///
/// Everything a submission produces is published as an `OutputEvent` on an
/// `OutputChannel`, which forwards it to every registered listener.
pub mod output;
/// The parser module builds the abstract syntax tree (AST) from lexemes.
///
/// The parser processes the lexemes produced by the lexer and constructs an
/// AST that represents the syntactic structure of the submission.
///
/// # Responsibilities
/// - Converts lexemes into structured AST nodes (expressions, statements).
/// - Validates grammar, reporting errors with their position.
/// - Rejects `return`, `break` and `continue` where there is nothing to leave.
pub mod parser;
/// The session module runs submissions against persistent state.
///
/// A session wires the lexer, parser and evaluator together, owns the global
/// environment and reports every failure through the output channel.
pub mod session;
/// The value module defines the runtime data types for evaluation.
///
/// # Responsibilities
/// - Defines the `Value` enum and all supported value variants.
/// - Implements rendering, truthiness and equality.
/// - Defines closures, the values of user-defined functions.
pub mod value;
