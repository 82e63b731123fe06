use std::rc::Rc;

use crate::util::position::Position;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers all raw, constant values that can appear directly in
/// source code: numbers, strings, booleans and `nil`.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit floating-point literal.
    Number(f64),
    /// A string literal, without its quotes.
    String(String),
    /// A boolean literal value: `true` or `false`.
    Bool(bool),
    /// The `nil` literal.
    Nil,
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Each variant models a distinct syntactic construct and records the source
/// position used when reporting errors about it. Expressions form a tree: a
/// node is owned by exactly one parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean or nil).
    Literal {
        /// The constant value.
        value:    LiteralValue,
        /// Position in the source code.
        position: Position,
    },
    /// Reference to a variable by name.
    Identifier {
        /// Name of the variable.
        name:     String,
        /// Position in the source code.
        position: Position,
    },
    /// A unary operation (negation or logical not).
    Unary {
        /// The unary operator to apply.
        op:       UnaryOperator,
        /// The operand expression.
        operand:  Box<Self>,
        /// Position of the operator.
        position: Position,
    },
    /// A binary operation, including the short-circuit `and` and `or`.
    Binary {
        /// Left operand.
        left:     Box<Self>,
        /// The operator.
        op:       BinaryOperator,
        /// Right operand.
        right:    Box<Self>,
        /// Position of the operator.
        position: Position,
    },
    /// Function call expression (e.g. `add(1, 2)`).
    Call {
        /// The expression producing the function.
        callee:    Box<Self>,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Position of the opening parenthesis.
        position:  Position,
    },
    /// Assignment to an existing variable (`x = value`).
    Assignment {
        /// Name of the variable being assigned.
        target:   String,
        /// The value being assigned.
        value:    Box<Self>,
        /// Position of the `=`.
        position: Position,
    },
    /// A parenthesized expression.
    Grouping {
        /// The enclosed expression.
        inner:    Box<Self>,
        /// Position of the opening parenthesis.
        position: Position,
    },
}

impl Expr {
    /// Gets the source position from `self`.
    /// ## Example
    /// ```
    /// use sprig::{ast::Expr, util::position::Position};
    ///
    /// let expr = Expr::Identifier { name:     "x".to_string(),
    ///                               position: Position::new(5, 2), };
    ///
    /// assert_eq!(expr.position(), Position::new(5, 2));
    /// ```
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Literal { position, .. }
            | Self::Identifier { position, .. }
            | Self::Unary { position, .. }
            | Self::Binary { position, .. }
            | Self::Call { position, .. }
            | Self::Assignment { position, .. }
            | Self::Grouping { position, .. } => *position,
        }
    }
}

/// Represents a user-defined function declaration.
///
/// Declarations are shared through `Rc` because function values created at
/// runtime keep referring to the body after the submission that declared them
/// has been dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:     String,
    /// The parameter names, in order.
    pub params:   Vec<String>,
    /// The statements executed when the function is called.
    pub body:     Vec<Statement>,
    /// Position of the `fun` keyword.
    pub position: Position,
}

/// Represents a statement.
///
/// A submission parses into an ordered sequence of statements that is
/// executed front to back.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A standalone expression evaluated for its effects and result.
    Expression {
        /// The expression to evaluate.
        expr:     Expr,
        /// Position in the source code.
        position: Position,
    },
    /// A variable declaration using `let`.
    VariableDeclaration {
        /// The name of the variable.
        name:        String,
        /// The initial value; `nil` when absent.
        initializer: Option<Expr>,
        /// Position of the `let` keyword.
        position:    Position,
    },
    /// A braced sequence of statements with its own scope.
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Position of the opening brace.
        position:   Position,
    },
    /// An `if` statement with an optional `else` branch.
    Conditional {
        /// The condition.
        test:        Expr,
        /// Statement run when the condition is truthy.
        then_branch: Box<Self>,
        /// Statement run otherwise, if any.
        else_branch: Option<Box<Self>>,
        /// Position of the `if` keyword.
        position:    Position,
    },
    /// A `while` loop.
    Loop {
        /// The condition checked before every iteration.
        test:     Expr,
        /// The loop body.
        body:     Box<Self>,
        /// Position of the `while` keyword.
        position: Position,
    },
    /// A user-defined function declaration.
    Function(Rc<FunctionDef>),
    /// A `return` statement with an optional value.
    Return {
        /// The returned expression; `nil` when absent.
        value:    Option<Expr>,
        /// Position of the `return` keyword.
        position: Position,
    },
    /// A `print` statement.
    Print {
        /// The expression whose value is printed.
        expr:     Expr,
        /// Position of the `print` keyword.
        position: Position,
    },
    /// Leaves the innermost loop.
    Break {
        /// Position of the keyword.
        position: Position,
    },
    /// Skips to the next iteration of the innermost loop.
    Continue {
        /// Position of the keyword.
        position: Position,
    },
}

impl Statement {
    /// Gets the source position from `self`.
    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::Expression { position, .. }
            | Self::VariableDeclaration { position, .. }
            | Self::Block { position, .. }
            | Self::Conditional { position, .. }
            | Self::Loop { position, .. }
            | Self::Return { position, .. }
            | Self::Print { position, .. }
            | Self::Break { position }
            | Self::Continue { position } => *position,
            Self::Function(def) => def.position,
        }
    }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons and the logical
/// connectives.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Remainder (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Short-circuit logical and (`and`)
    And,
    /// Short-circuit logical or (`or`)
    Or,
}

/// Represents a unary operator.
///
/// Unary operators include negation and logical NOT.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `!x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}
