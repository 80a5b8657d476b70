//! Logos-based lexer shared by the `.fidl` and `.fdepl` readers.
//!
//! Whitespace, comments and `<** ... **>` annotation blocks are dropped
//! here so the readers only ever see significant tokens.

use logos::Logos;
use text_size::{TextRange, TextSize};

use super::error::ParseError;
use crate::base::LineIndex;

/// A token with its kind, text, and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Logos token enum
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    #[token("/*", lex_block_comment)]
    BlockComment,

    #[token("<**", lex_annotation)]
    Annotation,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    /// Anything starting with a digit. Kept loose so malformed literals such
    /// as `0x1G` reach the validator instead of failing the parse.
    #[regex(r"[0-9][a-zA-Z0-9_]*")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("=")]
    Eq,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("*")]
    Star,

    #[token(":")]
    Colon,

    #[token(";")]
    Semi,

    #[token("-")]
    Minus,

    #[token("+")]
    Plus,
}

fn lex_annotation(lex: &mut logos::Lexer<TokenKind>) -> bool {
    bump_past(lex, "**>")
}

fn lex_block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    bump_past(lex, "*/")
}

/// Extend the current token through the next `close`; unterminated is an error.
fn bump_past(lex: &mut logos::Lexer<TokenKind>, close: &str) -> bool {
    match lex.remainder().find(close) {
        Some(end) => {
            lex.bump(end + close.len());
            true
        }
        None => false,
    }
}

impl TokenKind {
    /// Short description used in "expected ..." messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::BlockComment => "comment",
            TokenKind::Annotation => "annotation",
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string literal",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Eq => "'='",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Star => "'*'",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Minus => "'-'",
            TokenKind::Plus => "'+'",
        }
    }
}

/// Tokenize an entire string, dropping block comments and annotations.
pub fn tokenize<'a>(input: &'a str, lines: &LineIndex) -> Result<Vec<Token<'a>>, ParseError> {
    let mut lexer = TokenKind::lexer(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        match result {
            Ok(TokenKind::BlockComment | TokenKind::Annotation) => {}
            Ok(kind) => tokens.push(Token {
                kind,
                text: lexer.slice(),
                range,
            }),
            Err(()) => {
                let at = lines.line_col(range.start());
                return Err(ParseError::syntax(
                    format!("unexpected character sequence '{}'", lexer.slice()),
                    at,
                ));
            }
        }
    }

    Ok(tokens)
}
