//! Tokenizer for Go source text.
//!
//! Only the distinctions needed for top-level structure are made: identifiers,
//! literals, single-character punctuation and line breaks. Comments are
//! collected separately so doc comments can be attached to declarations.

use super::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    /// Interpreted (`"..."`) or raw (`` `...` ``) string literal.
    String,
    Char,
    Number,
    Punct(u8),
    /// A line break, or a block comment spanning lines.
    Newline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn is_punct(&self, c: u8) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    pub fn is_ident(&self, source: &str, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(source) == word
    }

    /// Whether a line break after this token terminates a statement.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Ident
                | TokenKind::String
                | TokenKind::Char
                | TokenKind::Number
                | TokenKind::Punct(b')' | b']' | b'}')
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Comment {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Default)]
pub(crate) struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

pub(crate) fn lex(source: &str) -> Result<Lexed, ParseError> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut out = Lexed::default();
    let mut i = 0;

    while i < len {
        let c = bytes[i];
        match c {
            b'\n' => {
                out.tokens.push(token(TokenKind::Newline, i, i + 1));
                i += 1;
            }
            b' ' | b'\t' | b'\r' => i += 1,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = find_byte(bytes, i, b'\n').unwrap_or(len);
                out.comments.push(Comment {
                    start: i,
                    end,
                });
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = source[i + 2..]
                    .find("*/")
                    .map(|offset| i + 2 + offset + 2)
                    .ok_or_else(|| ParseError::at(source, i, "unterminated block comment"))?;
                out.comments.push(Comment {
                    start: i,
                    end,
                });
                if bytes[i..end].contains(&b'\n') {
                    out.tokens.push(token(TokenKind::Newline, i, end));
                }
                i = end;
            }
            b'"' => {
                let end = scan_quoted(source, i, b'"', "unterminated string literal")?;
                out.tokens.push(token(TokenKind::String, i, end));
                i = end;
            }
            b'\'' => {
                let end = scan_quoted(source, i, b'\'', "unterminated rune literal")?;
                out.tokens.push(token(TokenKind::Char, i, end));
                i = end;
            }
            b'`' => {
                let end = find_byte(bytes, i + 1, b'`')
                    .map(|close| close + 1)
                    .ok_or_else(|| ParseError::at(source, i, "unterminated raw string literal"))?;
                out.tokens.push(token(TokenKind::String, i, end));
                i = end;
            }
            b'0'..=b'9' => {
                let end = scan_while(bytes, i, |b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
                out.tokens.push(token(TokenKind::Number, i, end));
                i = end;
            }
            // Bytes >= 0x80 are parts of UTF-8 letters in identifiers
            b if b == b'_' || b.is_ascii_alphabetic() || b >= 0x80 => {
                let end = scan_while(bytes, i, |b| b == b'_' || b.is_ascii_alphanumeric() || b >= 0x80);
                out.tokens.push(token(TokenKind::Ident, i, end));
                i = end;
            }
            _ => {
                out.tokens.push(token(TokenKind::Punct(c), i, i + 1));
                i += 1;
            }
        }
    }

    Ok(out)
}

const fn token(kind: TokenKind, start: usize, end: usize) -> Token {
    Token {
        kind,
        start,
        end,
    }
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|offset| from + offset)
}

fn scan_while(bytes: &[u8], from: usize, accept: impl Fn(u8) -> bool) -> usize {
    let mut end = from;
    while end < bytes.len() && accept(bytes[end]) {
        end += 1;
    }
    end
}

/// Scan an escaped literal starting at the opening quote; returns the end offset.
fn scan_quoted(source: &str, start: usize, quote: u8, reason: &str) -> Result<usize, ParseError> {
    let bytes = source.as_bytes();
    let mut j = start + 1;
    loop {
        match bytes.get(j) {
            None | Some(b'\n') => return Err(ParseError::at(source, start, reason)),
            Some(b'\\') => j += 2,
            Some(&b) if b == quote => return Ok(j + 1),
            Some(_) => j += 1,
        }
    }
}
