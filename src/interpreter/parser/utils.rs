use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::core::{MAX_ARGUMENTS, ParseResult},
    },
    util::position::Position,
};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by function parameter lists and call argument
/// lists. It repeatedly calls `parse_item` to parse one element, expecting
/// either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list.
/// - `what`: Name of the items, used when the list is too long.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - the list holds more than [`MAX_ARGUMENTS`] items,
/// - something other than `,` or `closing` follows an item.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    what: &'static str)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Lexeme>
{
    let mut items = Vec::new();
    if tokens.next_if(|l| l.token == *closing).is_some() {
        return Ok(items);
    }
    loop {
        if items.len() == MAX_ARGUMENTS {
            let position = tokens.peek().map_or_else(Position::default, |l| l.position);
            return Err(ParseError::TooManyArguments { what,
                                                      limit: MAX_ARGUMENTS,
                                                      position });
        }
        items.push(parse_item(tokens)?);
        match tokens.peek().copied() {
            Some(Lexeme { token: Token::Comma, .. }) => {
                tokens.next();
            },
            Some(lexeme) if lexeme.token == *closing => {
                tokens.next();
                break;
            },
            Some(lexeme) => return Err(expected(format!("',' or '{closing}'"), lexeme)),
            None => return Err(end_of_input()),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name and position.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at an identifier.
/// - `description`: What the identifier names, for the error message.
///
/// # Errors
/// Returns `ExpectedToken` if the next token is not an identifier. The token
/// is left in the stream.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              description: &str)
                                                              -> ParseResult<(String, Position)>
    where I: Iterator<Item = &'a Lexeme>
{
    match tokens.peek().copied() {
        Some(Lexeme { token: Token::Identifier(name),
                      position,
                      .. }) => {
            tokens.next();
            Ok((name.clone(), *position))
        },
        Some(lexeme) => Err(expected(description, lexeme)),
        None => Err(end_of_input()),
    }
}

/// Consumes the next token if it equals `token`.
///
/// # Errors
/// Returns `ExpectedToken`, naming `description`, if the next token is
/// anything else. The token is left in the stream.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    token: &Token,
                                                    description: &str)
                                                    -> ParseResult<&'a Lexeme>
    where I: Iterator<Item = &'a Lexeme>
{
    match tokens.peek().copied() {
        Some(lexeme) if lexeme.token == *token => {
            tokens.next();
            Ok(lexeme)
        },
        Some(lexeme) => Err(expected(description, lexeme)),
        None => Err(end_of_input()),
    }
}

/// Skips any number of `;` tokens.
pub(in crate::interpreter::parser) fn skip_semicolons<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Lexeme>
{
    while tokens.next_if(|l| l.token == Token::Semicolon).is_some() {}
}

/// Whether the next token ends a statement without being part of it.
pub(in crate::interpreter::parser) fn at_statement_end<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a Lexeme>
{
    matches!(tokens.peek(),
             None | Some(Lexeme { token: Token::Semicolon | Token::RBrace | Token::Eof,
                                  .. }))
}

/// The error for a token that cannot appear where it was found.
pub(in crate::interpreter::parser) fn unexpected(lexeme: &Lexeme) -> ParseError {
    match lexeme.token {
        Token::Eof => ParseError::UnexpectedEndOfInput { position: lexeme.position },
        _ => ParseError::UnexpectedToken { token:    lexeme.text.clone(),
                                           position: lexeme.position, },
    }
}

/// The error for a missing required token.
pub(in crate::interpreter::parser) fn expected(description: impl Into<String>,
                                               found: &Lexeme)
                                               -> ParseError {
    ParseError::ExpectedToken { expected: description.into(),
                                found:    found.token.to_string(),
                                position: found.position, }
}

/// The error for a lexeme stream that ends without [`Token::Eof`].
pub(in crate::interpreter::parser) fn end_of_input() -> ParseError {
    ParseError::UnexpectedEndOfInput { position: Position::default() }
}
