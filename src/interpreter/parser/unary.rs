use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue, UnaryOperator},
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            core::{ParseResult, descend, parse_expression},
            utils::{end_of_input, expect, parse_comma_separated, unexpected},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (numeric negation)
/// - `!`  (logical not)
///
/// Unary operators are right-associative, so an input like `!-x` is parsed as
/// `!( -x )`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`] and then applies any call suffixes via [`parse_call`].
///
/// Every nested expression passes through here, so this is also where the
/// native stack is grown for deeply nested input.
///
/// Grammar:
/// ```text
///     unary := ("-" | "!") unary
///            | primary call_suffix*
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    ensure_sufficient_stack(|| {
        if let Some(operator) = tokens.next_if(|l| matches!(l.token, Token::Minus | Token::Bang)) {
            let op = if operator.token == Token::Minus { UnaryOperator::Negate } else { UnaryOperator::Not };
            let operand = parse_unary(tokens, descend(depth, operator.position)?)?;

            return Ok(Expr::Unary { op,
                                    operand: Box::new(operand),
                                    position: operator.position });
        }

        let primary = parse_primary(tokens, depth)?;
        parse_call(tokens, primary, depth)
    })
}

/// Parses a primary (atomic) expression.
///
/// Grammar:
/// ```text
///     primary := NUMBER | STRING | "true" | "false" | "nil"
///              | IDENTIFIER
///              | "(" expression ")"
/// ```
///
/// # Errors
/// Returns `UnexpectedEndOfInput` at the end of the submission and
/// `UnexpectedToken` for any token that cannot start an expression.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let lexeme = tokens.peek().copied().ok_or_else(end_of_input)?;
    let position = lexeme.position;

    let value = match &lexeme.token {
        Token::Number(n) => LiteralValue::Number(*n),
        Token::String(s) => LiteralValue::String(s.clone()),
        Token::True => LiteralValue::Bool(true),
        Token::False => LiteralValue::Bool(false),
        Token::Nil => LiteralValue::Nil,
        Token::Identifier(name) => {
            tokens.next();
            return Ok(Expr::Identifier { name: name.clone(),
                                         position });
        },
        Token::LParen => return parse_grouping(tokens, depth),
        _ => return Err(unexpected(lexeme)),
    };

    tokens.next();
    Ok(Expr::Literal { value, position })
}

/// Parses a parenthesized expression.
///
/// Grammar: `grouping := "(" expression ")"`
fn parse_grouping<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    let open = expect(tokens, &Token::LParen, "'('")?;
    let inner = parse_expression(tokens, descend(depth, open.position)?)?;
    expect(tokens, &Token::RParen, "')' after expression")?;

    Ok(Expr::Grouping { inner:    Box::new(inner),
                        position: open.position, })
}

/// Parses any number of call suffixes applied to an expression.
///
/// Calls chain, so `make()(1)` calls the result of `make()` with `1`.
///
/// Grammar:
/// ```text
///     call := primary ( "(" arguments? ")" )*
///     arguments := expression ("," expression)*
/// ```
fn parse_call<'a, I>(tokens: &mut Peekable<I>, mut node: Expr, mut depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Lexeme>
{
    while let Some(open) = tokens.next_if(|l| l.token == Token::LParen) {
        depth = descend(depth, open.position)?;
        let arguments = parse_comma_separated(tokens,
                                              |tokens| parse_expression(tokens, depth),
                                              &Token::RParen,
                                              "arguments")?;
        node = Expr::Call { callee: Box::new(node),
                            arguments,
                            position: open.position };
    }
    Ok(node)
}
