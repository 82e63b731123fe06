use std::{collections::HashSet, iter::Peekable, rc::Rc};

use crate::{
    ast::{FunctionDef, Statement},
    error::ParseError,
    interpreter::{
        lexer::{Lexeme, Token},
        parser::{
            block::parse_block,
            core::{Nesting, ParseResult, parse_expression},
            utils::{
                at_statement_end, end_of_input, expect, parse_comma_separated, parse_identifier,
            },
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Parses a declaration or, failing that, a statement.
///
/// Declarations are tried in order: `let`, then `fun`. If neither keyword is
/// present the input is parsed by [`parse_statement`].
///
/// Grammar: `declaration := var_decl | fun_decl | statement`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of the declaration.
/// - `nesting`: Whether the declaration sits inside a function or loop, and
///   how deep.
pub fn parse_declaration<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme>
{
    ensure_sufficient_stack(|| {
        if let Some(statement) = parse_variable_declaration(tokens, nesting)? {
            return Ok(statement);
        }
        if let Some(statement) = parse_function_declaration(tokens, nesting)? {
            return Ok(statement);
        }

        parse_statement(tokens, nesting)
    })
}

/// Parses a single statement.
///
/// A statement may be one of:
/// - a `print` statement,
/// - a block,
/// - an `if` or `while` statement,
/// - `return`, `break` or `continue`,
/// - an expression used as a statement.
///
/// A trailing `;` is optional and consumed by the caller. A `return` with
/// nothing else on its line returns `nil`; the next line starts a new
/// statement.
///
/// # Errors
/// Besides any error of the statement's parts, returns
/// `ReturnOutsideFunction` and `LoopControlOutsideLoop` for control flow that
/// has nothing to leave.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme>
{
    ensure_sufficient_stack(|| parse_statement_inner(tokens, nesting))
}

fn parse_statement_inner<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme>
{
    let lexeme = tokens.peek().copied().ok_or_else(end_of_input)?;
    let position = lexeme.position;

    match lexeme.token {
        Token::Print => {
            tokens.next();
            let expr = parse_expression(tokens, nesting.depth)?;
            Ok(Statement::Print { expr, position })
        },
        Token::LBrace => {
            tokens.next();
            let statements = parse_block(tokens, position, nesting.descend(position)?)?;
            Ok(Statement::Block { statements, position })
        },
        Token::If => parse_conditional(tokens, nesting),
        Token::While => parse_loop(tokens, nesting),
        Token::Return => {
            if !nesting.in_function {
                return Err(ParseError::ReturnOutsideFunction { position });
            }
            tokens.next();
            let ends_line = tokens.peek().is_some_and(|next| next.position.line != position.line);
            let value = if ends_line || at_statement_end(tokens) {
                None
            } else {
                Some(parse_expression(tokens, nesting.depth)?)
            };
            Ok(Statement::Return { value, position })
        },
        Token::Break | Token::Continue => {
            let keyword = if lexeme.token == Token::Break { "break" } else { "continue" };
            if !nesting.in_loop {
                return Err(ParseError::LoopControlOutsideLoop { keyword, position });
            }
            tokens.next();
            Ok(if lexeme.token == Token::Break {
                   Statement::Break { position }
               } else {
                   Statement::Continue { position }
               })
        },
        _ => {
            let expr = parse_expression(tokens, nesting.depth)?;
            Ok(Statement::Expression { expr, position })
        },
    }
}

/// Parses a variable declaration in the form: `let name` or
/// `let name = expr`.
///
/// # Returns
/// - `Ok(Some(statement))` if a declaration was parsed,
/// - `Ok(None)` if the next token is not `let`.
fn parse_variable_declaration<'a, I>(tokens: &mut Peekable<I>,
                                    nesting: Nesting)
                                    -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a Lexeme>
{
    let Some(keyword) = tokens.next_if(|l| l.token == Token::Let) else {
        return Ok(None);
    };

    let (name, _) = parse_identifier(tokens, "variable name after 'let'")?;
    let initializer = match tokens.next_if(|l| l.token == Token::Equals) {
        Some(_) => Some(parse_expression(tokens, nesting.depth)?),
        None => None,
    };

    Ok(Some(Statement::VariableDeclaration { name,
                                             initializer,
                                             position: keyword.position }))
}

/// Parses a function declaration.
///
/// Grammar:
/// ```text
///     fun_decl := "fun" IDENTIFIER "(" parameters? ")" block
///     parameters := IDENTIFIER ("," IDENTIFIER)*
/// ```
///
/// The body is parsed as a fresh function context: `return` is allowed in it
/// and `break`/`continue` of an enclosing loop are not.
///
/// # Returns
/// - `Ok(Some(statement))` if a declaration was parsed,
/// - `Ok(None)` if the next token is not `fun`.
///
/// # Errors
/// Returns `DuplicateParameter` if a parameter name repeats, and
/// `TooManyArguments` for more than 255 parameters.
fn parse_function_declaration<'a, I>(tokens: &mut Peekable<I>,
                                    nesting: Nesting)
                                    -> ParseResult<Option<Statement>>
    where I: Iterator<Item = &'a Lexeme>
{
    let Some(keyword) = tokens.next_if(|l| l.token == Token::Fun) else {
        return Ok(None);
    };

    let (name, _) = parse_identifier(tokens, "function name after 'fun'")?;
    expect(tokens, &Token::LParen, "'(' after function name")?;
    let params = parse_comma_separated(tokens,
                                       |tokens| parse_identifier(tokens, "parameter name"),
                                       &Token::RParen,
                                       "parameters")?;

    let mut seen = HashSet::new();
    for (param, position) in &params {
        if !seen.insert(param.as_str()) {
            return Err(ParseError::DuplicateParameter { name:     param.clone(),
                                                        position: *position, });
        }
    }

    let open = expect(tokens, &Token::LBrace, "'{' before function body")?;
    let body_nesting = nesting.function_body().descend(open.position)?;
    let body = parse_block(tokens, open.position, body_nesting)?;

    let def = FunctionDef { name,
                            params: params.into_iter().map(|(param, _)| param).collect(),
                            body,
                            position: keyword.position };

    Ok(Some(Statement::Function(Rc::new(def))))
}

/// Parses an `if` statement with an optional `else` branch.
///
/// An `else` binds to the nearest `if`.
///
/// Grammar: `if_stmt := "if" expression statement ("else" statement)?`
fn parse_conditional<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme>
{
    let keyword = expect(tokens, &Token::If, "'if'")?;
    let test = parse_expression(tokens, nesting.depth)?;
    let branch = nesting.descend(keyword.position)?;
    let then_branch = parse_statement(tokens, branch)?;
    let else_branch = match tokens.next_if(|l| l.token == Token::Else) {
        Some(_) => Some(Box::new(parse_statement(tokens, branch)?)),
        None => None,
    };

    Ok(Statement::Conditional { test,
                                then_branch: Box::new(then_branch),
                                else_branch,
                                position: keyword.position })
}

/// Parses a `while` loop.
///
/// Grammar: `while_stmt := "while" expression statement`
fn parse_loop<'a, I>(tokens: &mut Peekable<I>, nesting: Nesting) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Lexeme>
{
    let keyword = expect(tokens, &Token::While, "'while'")?;
    let test = parse_expression(tokens, nesting.depth)?;
    let body = parse_statement(tokens, nesting.loop_body().descend(keyword.position)?)?;

    Ok(Statement::Loop { test,
                         body: Box::new(body),
                         position: keyword.position })
}
