/// The runtime value type.
///
/// Defines `Value`, its rendering, truthiness and equality rules.
pub mod core;

/// User-defined function values.
///
/// Defines `Closure`, the pairing of a function declaration with the
/// environment it was declared in.
pub mod function;
