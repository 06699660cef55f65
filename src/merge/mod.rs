//! Symbol-level merging of a regenerated file into a hand-edited one.
//!
//! The existing file is treated as the source of truth. From the freshly
//! rendered candidate only two kinds of symbols are taken:
//!
//! - imports whose path the existing file does not import yet, and
//! - methods on the controller receiver whose `(receiver, name)` key the
//!   existing file does not declare yet.
//!
//! Everything else in the existing file, including formatting, comments and
//! any method the developer rewrote, is kept byte for byte. Methods are
//! matched by name only; a key present in both files with a different
//! signature is reported with a warning and left alone.
//!
//! When nothing is added the result is [`MergeOutcome::Unchanged`] and the
//! caller must not rewrite the file. Running a merge a second time with the
//! same candidate therefore always ends in `Unchanged`.
//!
//! Both inputs are scanned before anything is produced. If either fails to
//! scan the merge aborts with
//! [`GoParseError`](crate::core::CtrlgenError::GoParseError) and no text is
//! returned.

use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::core::Result;
use crate::golang::{FuncDecl, ImportSpec, MethodKey, SourceFile};

/// Name used in errors for the file already on disk.
const EXISTING: &str = "existing file";
/// Name used in errors for the rendered text.
const CANDIDATE: &str = "rendered candidate";

/// Result of [`merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No existing file; the candidate is the new content.
    Created(String),
    /// New symbols were folded into the existing file.
    Merged {
        text: String,
        /// Import paths added, in candidate order.
        added_imports: Vec<String>,
        /// Methods appended, in candidate order.
        added_methods: Vec<MethodKey>,
    },
    /// Every candidate symbol already exists.
    Unchanged,
}

impl MergeOutcome {
    /// The text to write, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Created(text)
            | Self::Merged {
                text,
                ..
            } => Some(text),
            Self::Unchanged => None,
        }
    }
}

/// Merge `candidate` into `existing`, appending the imports and the methods on
/// `receiver` that `existing` lacks.
///
/// # Errors
///
/// Returns [`GoParseError`](crate::core::CtrlgenError::GoParseError) if either text cannot be scanned.
pub fn merge(existing: Option<&str>, candidate: &str, receiver: &str) -> Result<MergeOutcome> {
    let candidate = SourceFile::parse(candidate).map_err(|e| e.into_error(CANDIDATE))?;
    let Some(existing) = existing else {
        return Ok(MergeOutcome::Created(candidate.text().to_string()));
    };
    let existing = SourceFile::parse(existing).map_err(|e| e.into_error(EXISTING))?;
    let symbols = existing.symbols();

    let new_imports = missing_imports(&candidate, &symbols.import_paths);
    let new_methods = missing_methods(&existing, &candidate, receiver);

    if new_imports.is_empty() && new_methods.is_empty() {
        debug!(receiver, "merge found nothing new");
        return Ok(MergeOutcome::Unchanged);
    }

    let import_lines: Vec<&str> = new_imports.iter().map(|spec| candidate.slice(&spec.span)).collect();
    let mut text = insert_imports(&existing, &import_lines);
    for method in &new_methods {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push('\n');
        text.push_str(candidate.slice(&method.span));
        text.push('\n');
    }

    let added_imports: Vec<String> = new_imports.iter().map(|spec| spec.path.clone()).collect();
    let added_methods: Vec<MethodKey> =
        new_methods.iter().map(|f| MethodKey::new(receiver, f.name.clone())).collect();
    debug!(
        imports = added_imports.len(),
        methods = added_methods.len(),
        "merged new symbols"
    );

    Ok(MergeOutcome::Merged {
        text,
        added_imports,
        added_methods,
    })
}

fn missing_imports<'c>(
    candidate: &'c SourceFile<'_>,
    existing_paths: &BTreeSet<String>,
) -> Vec<&'c ImportSpec> {
    let mut seen = BTreeSet::new();
    candidate
        .import_specs()
        .filter(|spec| !existing_paths.contains(&spec.path) && seen.insert(spec.path.as_str()))
        .collect()
}

fn missing_methods<'c>(
    existing: &SourceFile<'_>,
    candidate: &'c SourceFile<'_>,
    receiver: &str,
) -> Vec<&'c FuncDecl> {
    let mut seen = BTreeSet::new();
    let mut missing = Vec::new();
    for method in candidate.methods_of(receiver) {
        if !seen.insert(method.name.as_str()) {
            continue;
        }
        match existing.methods_of(receiver).find(|m| m.name == method.name) {
            Some(current) if current.signature != method.signature => {
                warn!(
                    method = %MethodKey::new(receiver, method.name.clone()),
                    current = current.signature.as_str(),
                    generated = method.signature.as_str(),
                    "method signature differs from the generated one; keeping the existing method"
                );
            }
            Some(_) => {}
            None => missing.push(method),
        }
    }
    missing
}

/// Splice import specs into the existing text.
///
/// The first grouped declaration receives them before its closing paren. A
/// lone single-line declaration is rewritten into a group. Without any import
/// a new group is placed after the package clause.
fn insert_imports(file: &SourceFile<'_>, specs: &[&str]) -> String {
    let text = file.text();
    if specs.is_empty() {
        return text.to_string();
    }
    let lines: String = specs.iter().map(|spec| format!("\t{spec}\n")).collect();

    if let Some(close) = file.imports.iter().find_map(|decl| decl.close_paren) {
        let line_start = text[..close].rfind('\n').map_or(0, |i| i + 1);
        let mut out = String::with_capacity(text.len() + lines.len() + 1);
        if text[line_start..close].trim().is_empty() {
            out.push_str(&text[..line_start]);
            out.push_str(&lines);
            out.push_str(&text[line_start..]);
        } else {
            // `import ("fmt")` or an import sharing the line with `)`
            out.push_str(&text[..close]);
            out.push('\n');
            out.push_str(&lines);
            out.push_str(&text[close..]);
        }
        return out;
    }

    if let Some(single) = file.imports.first() {
        let existing_spec = single.specs.first().map_or("", |spec| file.slice(&spec.span));
        return format!(
            "{}import (\n\t{existing_spec}\n{lines})\n{}",
            &text[..single.span.start],
            text[single.span.end..].strip_prefix('\n').unwrap_or(&text[single.span.end..]),
        );
    }

    format!(
        "{}\n\nimport (\n{lines})\n{}",
        &text[..file.package_end],
        text[file.package_end..].strip_prefix('\n').unwrap_or(&text[file.package_end..]),
    )
}
