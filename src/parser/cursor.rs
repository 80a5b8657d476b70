//! Token cursor shared by the recursive-descent readers.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::error::ParseError;
use super::lexer::{Token, TokenKind};
use crate::base::{LineIndex, Span};

pub(crate) type PResult<T> = Result<T, ParseError>;

pub(crate) struct Cursor<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    lines: &'a LineIndex,
    /// End of the most recently consumed token.
    last_end: TextSize,
    source_len: TextSize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: Vec<Token<'a>>, lines: &'a LineIndex, source: &'a str) -> Self {
        Self {
            tokens,
            pos: 0,
            lines,
            last_end: TextSize::from(0),
            source_len: TextSize::of(source),
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    pub(crate) fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.nth_kind(0) == Some(kind)
    }

    pub(crate) fn at_keyword(&self, keyword: &str) -> bool {
        self.current()
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text == keyword)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Start offset of the current token (or end of input).
    pub(crate) fn offset(&self) -> TextSize {
        self.current()
            .map(|t| t.range.start())
            .unwrap_or(self.source_len)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    pub(crate) fn bump(&mut self) -> Option<Token<'a>> {
        let token = *self.tokens.get(self.pos)?;
        self.pos += 1;
        self.last_end = token.range.end();
        Some(token)
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Token<'a>> {
        if self.at(kind) {
            if let Some(token) = self.bump() {
                return Ok(token);
            }
        }
        Err(self.error(format!("expected {}", kind.describe())))
    }

    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> PResult<Token<'a>> {
        if self.at_keyword(keyword) {
            if let Some(token) = self.bump() {
                return Ok(token);
            }
        }
        Err(self.error(format!("expected '{keyword}'")))
    }

    pub(crate) fn ident(&mut self) -> PResult<(SmolStr, TextRange)> {
        let token = self.expect(TokenKind::Ident)?;
        Ok((SmolStr::new(token.text), token.range))
    }

    /// `a.b.c`
    pub(crate) fn qualified_name(&mut self) -> PResult<(SmolStr, TextRange)> {
        let first = self.expect(TokenKind::Ident)?;
        let mut text = String::from(first.text);
        let mut range = first.range;
        while self.at(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident) {
            self.bump();
            if let Some(segment) = self.bump() {
                text.push('.');
                text.push_str(segment.text);
                range = range.cover(segment.range);
            }
        }
        Ok((SmolStr::new(text), range))
    }

    /// A string literal with its quotes removed and `\"` escapes folded.
    pub(crate) fn string_literal(&mut self) -> PResult<(String, TextRange)> {
        let token = self.expect(TokenKind::String)?;
        Ok((unquote(token.text), token.range))
    }

    /// Consume a balanced `{ ... }` block. The cursor must sit on `{`.
    pub(crate) fn skip_block(&mut self) -> PResult<()> {
        self.expect(TokenKind::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                Some(t) if t.kind == TokenKind::LBrace => depth += 1,
                Some(t) if t.kind == TokenKind::RBrace => depth -= 1,
                Some(_) => {}
                None => return Err(self.error("unterminated block, expected '}'")),
            }
        }
        Ok(())
    }

    // =========================================================================
    // Positions and errors
    // =========================================================================

    pub(crate) fn span(&self, range: TextRange) -> Span {
        self.lines.span(range)
    }

    /// Span from `start` to the end of the last consumed token.
    pub(crate) fn span_from(&self, start: TextSize) -> Span {
        let end = self.last_end.max(start);
        self.lines.span(TextRange::new(start, end))
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        let found = match self.current() {
            Some(token) => format!(", found '{}'", token.text),
            None => ", found end of file".to_string(),
        };
        ParseError::syntax(
            format!("{}{}", message.into(), found),
            self.lines.line_col(self.offset()),
        )
    }
}

fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text);
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}
