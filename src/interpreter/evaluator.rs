/// Core evaluation logic and the evaluator state.
///
/// Contains the `Evaluator`, the control-flow signal `Flow`, submission
/// execution and expression dispatch.
pub mod core;

/// Statement execution.
///
/// Runs declarations, blocks, conditionals, loops and the control-flow
/// statements, propagating `Flow` outward.
pub mod statement;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, string concatenation, comparisons, equality and the
/// short-circuit logical operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Function call evaluation.
///
/// Calls user-defined closures and built-in functions, checking arity and
/// call depth.
pub mod call;

/// Built-in functions.
///
/// Defines the native function table installed in every global environment.
pub mod builtin;
