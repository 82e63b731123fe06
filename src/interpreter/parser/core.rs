use std::iter::Peekable;

use crate::{
    ast::{Expr, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            binary::{Precedence, parse_precedence},
            statement::parse_declaration,
            utils::skip_semicolons,
        },
    },
    util::{position::Position, stack::ensure_sufficient_stack},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum number of parameters of a function and arguments of a call.
pub const MAX_ARGUMENTS: usize = 255;

/// Maximum nesting depth of statements and expressions within a submission.
///
/// Every block, branch, loop or function body, every operator application,
/// grouping and call counts as one level.
pub const MAX_NESTING: usize = 1000;

/// Receives statements from the parser one at a time.
///
/// Implement this to stream parsed statements into any collector. A
/// `Vec<Statement>` is the simplest sink.
pub trait StatementSink {
    /// Takes ownership of the next statement, in source order.
    fn accept(&mut self, statement: Statement);
}

impl StatementSink for Vec<Statement> {
    fn accept(&mut self, statement: Statement) {
        self.push(statement);
    }
}

/// Where the statement being parsed sits, for rejecting misplaced `return`,
/// `break` and `continue` and for bounding the depth of the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nesting {
    /// Inside a function body.
    pub in_function: bool,
    /// Inside a loop body, without an intervening function boundary.
    pub in_loop:     bool,
    /// Number of enclosing levels.
    pub depth:       usize,
}

impl Nesting {
    /// The nesting of a function body declared in `self`.
    #[must_use]
    pub const fn function_body(self) -> Self {
        Self { in_function: true,
               in_loop:     false,
               depth:       self.depth, }
    }

    /// The nesting of a loop body nested in `self`.
    #[must_use]
    pub const fn loop_body(self) -> Self {
        Self { in_loop: true,
               ..self }
    }

    /// `self`, one level deeper.
    ///
    /// # Errors
    /// `TooDeeplyNested` at `position` once [`MAX_NESTING`] is reached.
    pub fn descend(self, position: Position) -> ParseResult<Self> {
        Ok(Self { depth: descend(self.depth, position)?,
                  ..self })
    }
}

/// The depth one level below `depth`.
///
/// # Errors
/// `TooDeeplyNested` at `position` once [`MAX_NESTING`] is reached.
pub fn descend(depth: usize, position: Position) -> ParseResult<usize> {
    if depth >= MAX_NESTING {
        return Err(ParseError::TooDeeplyNested { limit: MAX_NESTING,
                                                 position });
    }
    Ok(depth + 1)
}

/// Parses the lexemes of one submission into its statements.
///
/// Statements are returned in source order. Parsing stops at the first error,
/// in which case no statement of the submission is returned.
///
/// Grammar: `program := declaration* EOF`
///
/// # Errors
/// Returns the first [`ParseError`] of the submission.
///
/// # Example
/// ```
/// use sprig::interpreter::{lexer::tokenize, parser::parse};
///
/// let lexemes = tokenize("let x = 1; print x").unwrap();
/// let statements = parse(&lexemes).unwrap();
///
/// assert_eq!(statements.len(), 2);
/// assert!(parse(&tokenize("1 +").unwrap()).is_err());
/// ```
pub fn parse(lexemes: &[Lexeme]) -> ParseResult<Vec<Statement>> {
    let mut tokens = lexemes.iter().peekable();
    let mut statements = Vec::new();

    loop {
        skip_semicolons(&mut tokens);
        match tokens.peek() {
            None | Some(Lexeme { token: Token::Eof, .. }) => break,
            Some(_) => statements.push(parse_declaration(&mut tokens, Nesting::default())?),
        }
    }

    Ok(statements)
}

/// Parses the lexemes of one submission and hands every statement to `sink`.
///
/// The sink receives statements only once the whole submission parsed, so a
/// malformed submission never leaves a partial statement list behind.
///
/// # Errors
/// Returns the first [`ParseError`] of the submission.
pub fn parse_into<S>(lexemes: &[Lexeme], sink: &mut S) -> ParseResult<()>
    where S: StatementSink + ?Sized
{
    for statement in parse(lexemes)? {
        sink.accept(statement);
    }

    Ok(())
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, assignment, and climbs the
/// precedence table from there.
///
/// Grammar: `expression := assignment`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the start of the expression.
/// - `depth`: Nesting depth of the expression.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    parse_assignment(tokens, depth)
}

/// Parses an assignment, the only right-associative operator.
///
/// The left side is parsed as an ordinary expression first and only accepted
/// as a target if it turns out to be a plain identifier, so `a = b = 1`
/// assigns `1` to both names.
///
/// Grammar: `assignment := IDENTIFIER "=" assignment | logical_or`
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let target = parse_precedence(tokens, Precedence::Or, depth)?;

    if let Some(equals) = tokens.next_if(|l| l.token == Token::Equals) {
        let value = ensure_sufficient_stack(|| {
            parse_assignment(tokens, descend(depth, equals.position)?)
        })?;

        return match target {
            Expr::Identifier { name, .. } => Ok(Expr::Assignment { target:   name,
                                                                   value:    Box::new(value),
                                                                   position: equals.position, }),
            other => Err(ParseError::InvalidAssignmentTarget { position: other.position() }),
        };
    }

    Ok(target)
}
