//! Go source scanning for the merge engine.
//!
//! This is not a Go parser. It understands the top level of a file well
//! enough to locate the package clause, import declarations and function
//! declarations by byte offset, which is all the merge engine needs to splice
//! new declarations into hand-edited code without reformatting it.
//!
//! Bodies of functions and `type`/`var`/`const` declarations are skipped by
//! bracket matching. String, rune and raw string literals and comments are
//! recognized so that brackets inside them are ignored.

mod lexer;
mod source;

use std::collections::BTreeSet;
use std::fmt;

use crate::core::CtrlgenError;

pub use source::{FuncDecl, ImportDecl, ImportSpec, SourceFile};

/// A method identity: receiver base type plus method name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodKey {
    pub receiver: String,
    pub name: String,
}

impl MethodKey {
    pub fn new(receiver: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}).{}", self.receiver, self.name)
    }
}

/// The symbols of a file that merging compares: import paths and method keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet {
    pub import_paths: BTreeSet<String>,
    pub method_keys: BTreeSet<MethodKey>,
}

impl SymbolSet {
    #[must_use]
    pub fn has_method(&self, receiver: &str, name: &str) -> bool {
        self.method_keys.iter().any(|key| key.receiver == receiver && key.name == name)
    }
}

/// A scan failure with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    /// 1-based line number of `offset`.
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    pub(crate) fn at(source: &str, offset: usize, reason: &str) -> Self {
        let offset = offset.min(source.len());
        let line = source.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1;
        Self {
            offset,
            line,
            reason: reason.to_string(),
        }
    }

    /// Attach the file name and convert into the crate error.
    pub fn into_error(self, source_name: &str) -> CtrlgenError {
        CtrlgenError::GoParseError {
            source_name: source_name.to_string(),
            line: self.line,
            reason: self.reason,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

impl std::error::Error for ParseError {}
