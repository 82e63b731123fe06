use logos::Logos;

use crate::{
    error::LexError,
    util::position::{LineIndex, Position},
};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `42` or `3.25`.
    #[regex(r"[0-9]+(\.[0-9]+)?", parse_number)]
    Number(f64),
    /// String literal tokens such as `"hello"`, without the quotes.
    #[regex(r#""[^"]*""#, parse_string, allow_greedy = true)]
    String(String),
    /// A string literal missing its closing quote. Never reaches the parser.
    #[regex(r#""[^"]*"#, allow_greedy = true)]
    UnterminatedString,
    /// Identifier tokens; variable or function names such as `x` or `square`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `let`
    #[token("let")]
    Let,
    /// `fun`
    #[token("fun")]
    Fun,
    /// `return`
    #[token("return")]
    Return,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `print`
    #[token("print")]
    Print,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `nil`
    #[token("nil")]
    Nil,

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `!`
    #[token("!")]
    Bang,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,

    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// ```text
    /// /* Multi line comments. */
    /// ```
    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    MultiLineComment,
    /// Spaces, tabs, feeds and newlines.
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Ignored,

    /// End of the submission. Appended by [`tokenize`], never matched.
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::Identifier(name) => write!(f, "{name}"),
            Self::Let => write!(f, "let"),
            Self::Fun => write!(f, "fun"),
            Self::Return => write!(f, "return"),
            Self::If => write!(f, "if"),
            Self::Else => write!(f, "else"),
            Self::While => write!(f, "while"),
            Self::Break => write!(f, "break"),
            Self::Continue => write!(f, "continue"),
            Self::Print => write!(f, "print"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::True => write!(f, "true"),
            Self::False => write!(f, "false"),
            Self::Nil => write!(f, "nil"),
            Self::Plus => write!(f, "+"),
            Self::Minus => write!(f, "-"),
            Self::Star => write!(f, "*"),
            Self::Slash => write!(f, "/"),
            Self::Percent => write!(f, "%"),
            Self::Bang => write!(f, "!"),
            Self::Equals => write!(f, "="),
            Self::EqualEqual => write!(f, "=="),
            Self::BangEqual => write!(f, "!="),
            Self::Less => write!(f, "<"),
            Self::LessEqual => write!(f, "<="),
            Self::Greater => write!(f, ">"),
            Self::GreaterEqual => write!(f, ">="),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::Comma => write!(f, ","),
            Self::Semicolon => write!(f, ";"),
            Self::Comment | Self::MultiLineComment => write!(f, "comment"),
            Self::Ignored => write!(f, "whitespace"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// A token together with the text it was read from and where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// The recognized token.
    pub token:    Token,
    /// The exact source text of the token. Empty for [`Token::Eof`].
    pub text:     String,
    /// Where the token starts.
    pub position: Position,
}

/// Converts a submission into its lexemes.
///
/// Whitespace and comments are skipped. The returned sequence always ends
/// with a single [`Token::Eof`] lexeme positioned just past the last
/// character, so the parser never runs off the end of the input. Lexing stops
/// at the first malformed token.
///
/// # Errors
/// - [`LexError::InvalidCharacter`] for a character that starts no token.
/// - [`LexError::UnterminatedString`] for a string literal missing its closing
///   quote.
///
/// # Example
/// ```
/// use sprig::interpreter::lexer::{Token, tokenize};
///
/// let lexemes = tokenize("let x = 1.5 // one and a half").unwrap();
/// let tokens: Vec<Token> = lexemes.into_iter().map(|l| l.token).collect();
///
/// assert_eq!(tokens,
///            vec![Token::Let,
///                 Token::Identifier("x".to_string()),
///                 Token::Equals,
///                 Token::Number(1.5),
///                 Token::Eof]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Lexeme>, LexError> {
    let index = LineIndex::new(source);
    let mut lexemes = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(token) = lexer.next() {
        let position = index.position(lexer.span().start);
        match token {
            Ok(Token::UnterminatedString) => {
                return Err(LexError::UnterminatedString { position });
            },
            Ok(token) => lexemes.push(Lexeme { token,
                                               text: lexer.slice().to_string(),
                                               position }),
            Err(()) => {
                let character = lexer.slice().chars().next().unwrap_or('\0');
                return Err(LexError::InvalidCharacter { character, position });
            },
        }
    }

    lexemes.push(Lexeme { token:    Token::Eof,
                          text:     String::new(),
                          position: index.end(), });

    Ok(lexemes)
}

/// Parses a number literal from the current token slice.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Strips the surrounding quotes from a string literal.
fn parse_string(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source).unwrap()
                        .into_iter()
                        .map(|lexeme| lexeme.token)
                        .collect()
    }

    #[test]
    fn keywords_win_over_identifiers() {
        assert_eq!(tokens("let letter fun funny"),
                   vec![Token::Let,
                        Token::Identifier("letter".into()),
                        Token::Fun,
                        Token::Identifier("funny".into()),
                        Token::Eof]);
    }

    #[test]
    fn two_character_operators() {
        assert_eq!(tokens("== != <= >= = ! < >"),
                   vec![Token::EqualEqual,
                        Token::BangEqual,
                        Token::LessEqual,
                        Token::GreaterEqual,
                        Token::Equals,
                        Token::Bang,
                        Token::Less,
                        Token::Greater,
                        Token::Eof]);
    }

    #[test]
    fn string_literals_drop_their_quotes() {
        assert_eq!(tokens("\"hi there\""),
                   vec![Token::String("hi there".into()), Token::Eof]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(tokens("1 // one\n/* two\n lines */ 2"),
                   vec![Token::Number(1.0), Token::Number(2.0), Token::Eof]);
    }

    #[test]
    fn lexemes_carry_positions_and_text() {
        let lexemes = tokenize("print 12\n  x").unwrap();
        assert_eq!(lexemes[1].text, "12");
        assert_eq!(lexemes[1].position, Position::new(1, 7));
        assert_eq!(lexemes[2].position, Position::new(2, 3));
        assert_eq!(lexemes[3].token, Token::Eof);
        assert_eq!(lexemes[3].position, Position::new(2, 4));
    }

    #[test]
    fn positions_after_multi_line_strings_are_correct() {
        let lexemes = tokenize("\"a\nb\" c").unwrap();
        assert_eq!(lexemes[1].position, Position::new(2, 4));
    }

    #[test]
    fn invalid_character_is_reported_with_position() {
        assert_eq!(tokenize("1 + @"),
                   Err(LexError::InvalidCharacter { character: '@',
                                                    position:  Position::new(1, 5), }));
    }

    #[test]
    fn unterminated_string_is_reported_at_opening_quote() {
        assert_eq!(tokenize("print \"oops"),
                   Err(LexError::UnterminatedString { position: Position::new(1, 7) }));
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(tokens("   "), vec![Token::Eof]);
    }
}
