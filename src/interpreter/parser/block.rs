use std::iter::Peekable;

use crate::{
    ast::Statement,
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::{Nesting, ParseResult},
            statement::parse_declaration,
            utils::skip_semicolons,
        },
    },
    util::position::Position,
};

/// Parses the statements of a block delimited by braces.
///
/// A block consists of zero or more declarations, optionally separated by
/// semicolons. Parsing continues until the closing `}` token is consumed.
///
/// Grammar: `block := "{" declaration* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned after the opening brace.
/// - `open`: Position of the opening brace.
/// - `nesting`: Nesting of the statements inside the block, already one
///   level below the block itself.
///
/// # Errors
/// Returns `UnterminatedBlock` at `open` if the input ends before the closing
/// brace.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>,
                          open: Position,
                          nesting: Nesting)
                          -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a Lexeme>
{
    let mut statements = Vec::new();

    loop {
        skip_semicolons(tokens);

        match tokens.peek() {
            Some(Lexeme { token: Token::RBrace, .. }) => {
                tokens.next();
                return Ok(statements);
            },
            None | Some(Lexeme { token: Token::Eof, .. }) => {
                return Err(ParseError::UnterminatedBlock { position: open });
            },
            Some(_) => statements.push(parse_declaration(tokens, nesting)?),
        }
    }
}
