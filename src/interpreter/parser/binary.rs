use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::{ParseResult, descend},
            unary::parse_unary,
        },
    },
};

/// Binding strength of the binary operators, weakest first.
///
/// Assignment binds looser than every level here and is handled by its own
/// right-associative rule. Prefix operators and calls bind tighter and are
/// handled by the unary parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// `or`
    Or,
    /// `and`
    And,
    /// `==` `!=`
    Equality,
    /// `<` `<=` `>` `>=`
    Relational,
    /// `+` `-`
    Additive,
    /// `*` `/` `%`
    Multiplicative,
    /// Operands only. No binary operator binds this tightly.
    Unary,
}

impl Precedence {
    /// The level directly above `self`.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Or => Self::And,
            Self::And => Self::Equality,
            Self::Equality => Self::Relational,
            Self::Relational => Self::Additive,
            Self::Additive => Self::Multiplicative,
            Self::Multiplicative | Self::Unary => Self::Unary,
        }
    }

    /// The level of a binary operator.
    #[must_use]
    pub const fn of(op: BinaryOperator) -> Self {
        match op {
            BinaryOperator::Or => Self::Or,
            BinaryOperator::And => Self::And,
            BinaryOperator::Equal | BinaryOperator::NotEqual => Self::Equality,
            BinaryOperator::Less
            | BinaryOperator::LessEqual
            | BinaryOperator::Greater
            | BinaryOperator::GreaterEqual => Self::Relational,
            BinaryOperator::Add | BinaryOperator::Sub => Self::Additive,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => Self::Multiplicative,
        }
    }
}

/// Parses a binary expression whose operators bind at least as tightly as
/// `min`.
///
/// This is a precedence-climbing loop: after an operand, every operator of
/// level `min` or higher is consumed together with a right operand parsed at
/// the next level up, which makes all binary operators left-associative.
///
/// The rule for one level is:
/// `level(p) := level(p + 1) (operator(p) level(p + 1))*`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the first operand.
/// - `min`: The weakest level this call may consume.
/// - `depth`: Nesting depth of the expression. Each operator applied adds a
///   level, so long operator chains count against the limit too.
///
/// # Returns
/// An `Expr::Binary` tree, or the single operand if no operator follows.
pub fn parse_precedence<'a, I>(tokens: &mut Peekable<I>,
                               min: Precedence,
                               mut depth: usize)
                               -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let mut left = parse_unary(tokens, depth)?;
    while let Some(lexeme) = tokens.peek()
          && let Some(op) = token_to_binary_operator(&lexeme.token)
          && Precedence::of(op) >= min
    {
        let position = lexeme.position;
        tokens.next();
        depth = descend(depth, position)?;
        let right = parse_precedence(tokens, Precedence::of(op).next(), depth)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              position };
    }
    Ok(left)
}

/// Maps a token to its binary operator, if it is one.
///
/// # Example
/// ```
/// use sprig::{
///     ast::BinaryOperator,
///     interpreter::{lexer::Token, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&Token::Percent), Some(BinaryOperator::Mod));
/// assert_eq!(token_to_binary_operator(&Token::Or), Some(BinaryOperator::Or));
/// assert_eq!(token_to_binary_operator(&Token::Equals), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    match token {
        Token::Plus => Some(BinaryOperator::Add),
        Token::Minus => Some(BinaryOperator::Sub),
        Token::Star => Some(BinaryOperator::Mul),
        Token::Slash => Some(BinaryOperator::Div),
        Token::Percent => Some(BinaryOperator::Mod),
        Token::Less => Some(BinaryOperator::Less),
        Token::LessEqual => Some(BinaryOperator::LessEqual),
        Token::Greater => Some(BinaryOperator::Greater),
        Token::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        Token::EqualEqual => Some(BinaryOperator::Equal),
        Token::BangEqual => Some(BinaryOperator::NotEqual),
        Token::And => Some(BinaryOperator::And),
        Token::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}
