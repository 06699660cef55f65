//! Top-level declaration scanner for Go source files.

use std::collections::BTreeSet;
use std::ops::Range;

use super::ParseError;
use super::lexer::{Comment, Token, TokenKind, lex};
use super::{MethodKey, SymbolSet};

/// One import spec, e.g. `corev1 "k8s.io/api/core/v1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit name (`corev1`, `_`, `.`), if any.
    pub alias: Option<String>,
    /// Unquoted import path.
    pub path: String,
    /// Byte range of the import line, alias included.
    pub span: Range<usize>,
}

/// An `import` declaration, grouped (`import ( ... )`) or single.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Byte range from the `import` keyword to the end of the declaration.
    pub span: Range<usize>,
    /// Offset of the closing parenthesis of a grouped declaration.
    pub close_paren: Option<usize>,
    pub specs: Vec<ImportSpec>,
}

impl ImportDecl {
    #[must_use]
    pub const fn is_grouped(&self) -> bool {
        self.close_paren.is_some()
    }
}

/// A top-level function or method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Receiver base type with pointer and type parameters stripped.
    pub receiver: Option<String>,
    pub name: String,
    /// Parameters and results with whitespace collapsed, for change detection.
    pub signature: String,
    /// Byte range including the doc comment directly above the declaration.
    pub span: Range<usize>,
}

/// A parsed Go source file.
///
/// Holds the original text; every span indexes into it.
#[derive(Debug, Clone)]
pub struct SourceFile<'a> {
    text: &'a str,
    pub package_name: String,
    /// Offset just past the package name.
    pub package_end: usize,
    pub imports: Vec<ImportDecl>,
    pub funcs: Vec<FuncDecl>,
}

impl<'a> SourceFile<'a> {
    /// Scan `text` into its top-level declarations.
    ///
    /// # Errors
    ///
    /// Fails on unterminated literals or comments, unbalanced brackets, a
    /// missing package clause, or a malformed import or function declaration.
    pub fn parse(text: &'a str) -> Result<Self, ParseError> {
        let lexed = lex(text)?;
        Parser {
            text,
            tokens: &lexed.tokens,
            comments: &lexed.comments,
            pos: 0,
        }
        .parse_file()
    }

    /// The text this file was parsed from.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Verbatim source of a declaration span.
    #[must_use]
    pub fn slice(&self, span: &Range<usize>) -> &'a str {
        &self.text[span.clone()]
    }

    /// All import specs in declaration order.
    pub fn import_specs(&self) -> impl Iterator<Item = &ImportSpec> {
        self.imports.iter().flat_map(|decl| decl.specs.iter())
    }

    /// Methods declared on `receiver`.
    pub fn methods_of<'s, 'r>(&'s self, receiver: &'r str) -> impl Iterator<Item = &'s FuncDecl> {
        self.funcs.iter().filter(move |f| f.receiver.as_deref() == Some(receiver))
    }

    /// Extract the symbol set: every import path and every `(receiver, method)` pair.
    #[must_use]
    pub fn symbols(&self) -> SymbolSet {
        let import_paths: BTreeSet<String> =
            self.import_specs().map(|spec| spec.path.clone()).collect();
        let method_keys = self
            .funcs
            .iter()
            .filter_map(|f| {
                f.receiver.as_ref().map(|receiver| MethodKey::new(receiver.clone(), f.name.clone()))
            })
            .collect();
        SymbolSet {
            import_paths,
            method_keys,
        }
    }
}

struct Parser<'a, 't> {
    text: &'a str,
    tokens: &'t [Token],
    comments: &'t [Comment],
    pos: usize,
}

impl<'a> Parser<'a, '_> {
    fn parse_file(mut self) -> Result<SourceFile<'a>, ParseError> {
        self.skip_separators();
        let keyword = self.next().ok_or_else(|| self.error_at_end("missing package clause"))?;
        if !keyword.is_ident(self.text, "package") {
            return Err(self.error(keyword, "expected package clause"));
        }
        let name = self.expect_ident("expected package name")?;
        self.expect_statement_end()?;

        let mut file = SourceFile {
            text: self.text,
            package_name: name.text(self.text).to_string(),
            package_end: name.end,
            imports: Vec::new(),
            funcs: Vec::new(),
        };

        loop {
            self.skip_separators();
            let Some(tok) = self.next() else {
                break;
            };
            match (tok.kind, tok.text(self.text)) {
                (TokenKind::Ident, "import") => file.imports.push(self.parse_import(tok)?),
                (TokenKind::Ident, "func") => file.funcs.push(self.parse_func(tok)?),
                (TokenKind::Ident, "type" | "var" | "const") => self.skip_decl()?,
                (_, other) => {
                    return Err(self.error(tok, &format!("expected declaration, found `{other}`")));
                }
            }
        }

        Ok(file)
    }

    fn parse_import(&mut self, keyword: Token) -> Result<ImportDecl, ParseError> {
        let grouped = self.peek().is_some_and(|t| t.is_punct(b'('));
        if !grouped {
            let spec = self.parse_import_spec()?;
            self.expect_statement_end()?;
            return Ok(ImportDecl {
                span: keyword.start..spec.span.end,
                close_paren: None,
                specs: vec![spec],
            });
        }

        self.pos += 1;
        let mut specs = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                None => return Err(self.error(keyword, "unterminated import block")),
                Some(t) if t.is_punct(b')') => {
                    let close = *t;
                    self.pos += 1;
                    return Ok(ImportDecl {
                        span: keyword.start..close.end,
                        close_paren: Some(close.start),
                        specs,
                    });
                }
                Some(_) => specs.push(self.parse_import_spec()?),
            }
        }
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let first = self.next().ok_or_else(|| self.error_at_end("expected import path"))?;
        let (alias, path_tok) = match first.kind {
            TokenKind::String => (None, first),
            TokenKind::Ident | TokenKind::Punct(b'.') => {
                let path_tok =
                    self.next().ok_or_else(|| self.error_at_end("expected import path"))?;
                (Some(first.text(self.text).to_string()), path_tok)
            }
            _ => return Err(self.error(first, "expected import path")),
        };
        if path_tok.kind != TokenKind::String {
            return Err(self.error(path_tok, "expected import path string"));
        }
        if let Some(next) = self.peek()
            && !(next.kind == TokenKind::Newline || next.is_punct(b';') || next.is_punct(b')'))
        {
            return Err(self.error(*next, "unexpected token after import path"));
        }

        let quoted = path_tok.text(self.text);
        Ok(ImportSpec {
            alias,
            path: quoted[1..quoted.len() - 1].to_string(),
            span: first.start..path_tok.end,
        })
    }

    fn parse_func(&mut self, keyword: Token) -> Result<FuncDecl, ParseError> {
        let start = self.doc_start(keyword.start);

        let receiver = if self.peek().is_some_and(|t| t.is_punct(b'(')) {
            let open = self.pos;
            let close = self.skip_balanced(open)?;
            self.pos = close + 1;
            let receiver = self.receiver_type(&self.tokens[open + 1..close]);
            if receiver.is_none() {
                return Err(self.error(self.tokens[open], "malformed method receiver"));
            }
            receiver
        } else {
            None
        };

        let name = self.expect_ident("expected function name")?;
        let signature_start = name.end;

        // Braces of struct{} and interface{} type literals belong to the signature
        let mut prev = name;
        let (signature_end, end) = loop {
            let Some(tok) = self.peek().copied() else {
                break (prev.end, prev.end);
            };
            match tok.kind {
                TokenKind::Punct(b'(' | b'[') => {
                    let close = self.skip_balanced(self.pos)?;
                    prev = self.tokens[close];
                    self.pos = close + 1;
                }
                TokenKind::Punct(b'{') => {
                    let is_type_literal =
                        prev.is_ident(self.text, "struct") || prev.is_ident(self.text, "interface");
                    let close = self.skip_balanced(self.pos)?;
                    self.pos = close + 1;
                    if !is_type_literal {
                        break (tok.start, self.tokens[close].end);
                    }
                    prev = self.tokens[close];
                }
                // Declaration without a body
                TokenKind::Newline | TokenKind::Punct(b';') if prev.ends_statement() => {
                    break (prev.end, prev.end);
                }
                TokenKind::Punct(b')' | b']' | b'}') => {
                    return Err(self.error(tok, "unbalanced brackets in function signature"));
                }
                _ => {
                    prev = tok;
                    self.pos += 1;
                }
            }
        };

        Ok(FuncDecl {
            receiver,
            name: name.text(self.text).to_string(),
            signature: collapse_whitespace(&self.text[signature_start..signature_end]),
            span: start..end,
        })
    }

    /// Skip a `type`, `var` or `const` declaration.
    fn skip_decl(&mut self) -> Result<(), ParseError> {
        if self.peek().is_some_and(|t| t.is_punct(b'(')) {
            let close = self.skip_balanced(self.pos)?;
            self.pos = close + 1;
            return Ok(());
        }
        let mut prev: Option<Token> = None;
        while let Some(tok) = self.peek().copied() {
            match tok.kind {
                TokenKind::Punct(b'(' | b'[' | b'{') => {
                    let close = self.skip_balanced(self.pos)?;
                    prev = Some(self.tokens[close]);
                    self.pos = close + 1;
                }
                TokenKind::Punct(b')' | b']' | b'}') => {
                    return Err(self.error(tok, "unbalanced brackets"));
                }
                TokenKind::Newline | TokenKind::Punct(b';')
                    if prev.is_some_and(|p| p.ends_statement()) =>
                {
                    return Ok(());
                }
                _ => {
                    prev = Some(tok);
                    self.pos += 1;
                }
            }
        }
        Ok(())
    }

    /// Index of the bracket closing the one at `open`.
    fn skip_balanced(&self, open: usize) -> Result<usize, ParseError> {
        let mut stack: Vec<u8> = Vec::new();
        for (index, tok) in self.tokens.iter().enumerate().skip(open) {
            match tok.kind {
                TokenKind::Punct(b'(') => stack.push(b')'),
                TokenKind::Punct(b'[') => stack.push(b']'),
                TokenKind::Punct(b'{') => stack.push(b'}'),
                TokenKind::Punct(c @ (b')' | b']' | b'}')) => {
                    if stack.pop() != Some(c) {
                        return Err(self.error(*tok, &format!("unexpected `{}`", c as char)));
                    }
                    if stack.is_empty() {
                        return Ok(index);
                    }
                }
                _ => {}
            }
        }
        Err(self.error(self.tokens[open], "unclosed bracket"))
    }

    /// Base type name of a receiver: `c *Controller[T]` → `Controller`.
    fn receiver_type(&self, inner: &[Token]) -> Option<String> {
        let inner: Vec<&Token> = inner.iter().filter(|t| t.kind != TokenKind::Newline).collect();
        let named = matches!(
            inner.as_slice(),
            [first, second, ..] if first.kind == TokenKind::Ident
                && !second.is_punct(b'[')
                && !second.is_punct(b'.')
        );
        let rest = if named { &inner[1..] } else { &inner[..] };
        rest.iter()
            .find(|t| !(t.is_punct(b'*') || t.is_punct(b'(')))
            .filter(|t| t.kind == TokenKind::Ident)
            .map(|t| t.text(self.text).to_string())
    }

    /// Start of the comment group directly above `decl_start`, or `decl_start`.
    fn doc_start(&self, decl_start: usize) -> usize {
        let mut start = decl_start;
        for comment in self.comments.iter().rev().filter(|c| c.end <= decl_start) {
            let gap = &self.text[comment.end..start];
            let attached = gap.chars().all(char::is_whitespace) && gap.matches('\n').count() <= 1;
            let line_start = self.text[..comment.start].rfind('\n').map_or(0, |i| i + 1);
            let own_line = self.text[line_start..comment.start].chars().all(char::is_whitespace);
            if !(attached && own_line) {
                break;
            }
            start = comment.start;
        }
        start
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).copied();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn skip_separators(&mut self) {
        while self.peek().is_some_and(|t| t.kind == TokenKind::Newline || t.is_punct(b';')) {
            self.pos += 1;
        }
    }

    fn expect_ident(&mut self, reason: &str) -> Result<Token, ParseError> {
        match self.next() {
            Some(tok) if tok.kind == TokenKind::Ident => Ok(tok),
            Some(tok) => Err(self.error(tok, reason)),
            None => Err(self.error_at_end(reason)),
        }
    }

    fn expect_statement_end(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(t) if t.kind == TokenKind::Newline || t.is_punct(b';') => {
                self.pos += 1;
                Ok(())
            }
            Some(t) => Err(self.error(*t, "expected end of statement")),
        }
    }

    fn error(&self, tok: Token, reason: &str) -> ParseError {
        ParseError::at(self.text, tok.start, reason)
    }

    fn error_at_end(&self, reason: &str) -> ParseError {
        ParseError::at(self.text, self.text.len(), reason)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
