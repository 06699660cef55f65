//! Per-artifact write policies.
//!
//! Each generated artifact carries one of three policies:
//!
//! - [`WritePolicy::Overwrite`]: regenerated from the configuration on every
//!   run, for files nobody is expected to edit.
//! - [`WritePolicy::WriteOnce`]: created when absent and never touched again
//!   (`go.mod`, which `go mod tidy` and the developer own afterwards).
//! - [`WritePolicy::Merge`]: folded into the existing file by
//!   [`crate::merge::merge`], for the one file holding hand-written logic.
//!
//! Each write is committed on its own through [`atomic_write`]. There is no
//! rollback across artifacts: when a later write fails, earlier ones stay on
//! disk.

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::CtrlgenError;
use crate::merge::{self, MergeOutcome};
use crate::utils::{atomic_write, read_optional};

/// How an artifact is written when a file already exists at its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WritePolicy {
    Overwrite,
    WriteOnce,
    /// Merge methods declared on `receiver`.
    Merge {
        receiver: String,
    },
}

/// A rendered artifact waiting to be written.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub policy: WritePolicy,
    pub content: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, policy: WritePolicy, content: String) -> Self {
        Self {
            path: path.into(),
            policy,
            content,
        }
    }
}

/// What happened to one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Created,
    Overwritten,
    /// New imports or methods were appended to a hand-edited file.
    Merged,
    /// A mergeable file already held every generated symbol.
    Unchanged,
    /// A write-once file already existed.
    Skipped,
}

impl WriteOutcome {
    /// Whether the file on disk was (or in a dry run, would be) modified.
    #[must_use]
    pub const fn modifies(self) -> bool {
        matches!(self, Self::Created | Self::Overwritten | Self::Merged)
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Created => "created",
            Self::Overwritten => "overwritten",
            Self::Merged => "merged",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
        };
        f.write_str(text)
    }
}

/// Outcomes of a generator run, in write order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteReport {
    pub entries: Vec<ReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

impl WriteReport {
    pub fn push(&mut self, path: PathBuf, outcome: WriteOutcome) {
        self.entries.push(ReportEntry {
            path,
            outcome,
        });
    }

    /// Outcome recorded for `path`, if it was part of the run.
    #[must_use]
    pub fn outcome_of(&self, path: &Path) -> Option<WriteOutcome> {
        self.entries.iter().find(|entry| entry.path == path).map(|entry| entry.outcome)
    }

    /// Number of artifacts that modified the filesystem.
    #[must_use]
    pub fn modified(&self) -> usize {
        self.entries.iter().filter(|entry| entry.outcome.modifies()).count()
    }
}

/// Applies write policies to artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactWriter {
    /// Decide outcomes without touching the filesystem.
    pub dry_run: bool,
}

impl ArtifactWriter {
    #[must_use]
    pub const fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
        }
    }

    /// Write one artifact according to its policy.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, or with [`CtrlgenError::GoParseError`] when a
    /// mergeable file cannot be scanned. In the latter case the file is left
    /// untouched.
    pub fn write(&self, artifact: &Artifact) -> Result<WriteOutcome> {
        let path = &artifact.path;
        let outcome = match &artifact.policy {
            WritePolicy::WriteOnce => {
                if path.exists() {
                    debug!(path = %path.display(), "write-once artifact exists, skipping");
                    WriteOutcome::Skipped
                } else {
                    self.commit(path, &artifact.content)?;
                    WriteOutcome::Created
                }
            }
            WritePolicy::Overwrite => {
                let existed = path.exists();
                self.commit(path, &artifact.content)?;
                if existed { WriteOutcome::Overwritten } else { WriteOutcome::Created }
            }
            WritePolicy::Merge {
                receiver,
            } => self.write_merged(path, &artifact.content, receiver)?,
        };

        info!(path = %path.display(), %outcome, dry_run = self.dry_run, "artifact");
        Ok(outcome)
    }

    fn write_merged(&self, path: &Path, candidate: &str, receiver: &str) -> Result<WriteOutcome> {
        let existing = read_optional(path)?;
        let outcome = merge::merge(existing.as_deref(), candidate, receiver)
            .map_err(|error| name_source(error, path))?;

        match outcome {
            MergeOutcome::Created(text) => {
                self.commit(path, &text)?;
                Ok(WriteOutcome::Created)
            }
            MergeOutcome::Merged {
                text,
                added_imports,
                added_methods,
            } => {
                for import in &added_imports {
                    info!(path = %path.display(), import = import.as_str(), "adding import");
                }
                for method in &added_methods {
                    info!(path = %path.display(), %method, "adding method");
                }
                self.commit(path, &text)?;
                Ok(WriteOutcome::Merged)
            }
            MergeOutcome::Unchanged => Ok(WriteOutcome::Unchanged),
        }
    }

    fn commit(&self, path: &Path, content: &str) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        atomic_write(path, content.as_bytes())
    }
}

/// Replace the generic side name of a scan error with the artifact path.
fn name_source(error: CtrlgenError, path: &Path) -> CtrlgenError {
    match error {
        CtrlgenError::GoParseError {
            source_name,
            line,
            reason,
        } => CtrlgenError::GoParseError {
            source_name: format!("{} ({source_name})", path.display()),
            line,
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const RECEIVER: &str = "Controller";

    fn merge_policy() -> WritePolicy {
        WritePolicy::Merge {
            receiver: RECEIVER.to_string(),
        }
    }

    #[test]
    fn test_write_once_never_touches_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("go.mod");
        let writer = ArtifactWriter::default();

        let first = Artifact::new(&path, WritePolicy::WriteOnce, "module a\n".to_string());
        assert_eq!(writer.write(&first).unwrap(), WriteOutcome::Created);

        let second = Artifact::new(&path, WritePolicy::WriteOnce, "module b\n".to_string());
        assert_eq!(writer.write(&second).unwrap(), WriteOutcome::Skipped);
        assert_eq!(fs::read_to_string(&path).unwrap(), "module a\n");
    }

    #[test]
    fn test_overwrite_replaces_hand_edits() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("main.go");
        fs::write(&path, "package main // edited\n").unwrap();

        let artifact = Artifact::new(&path, WritePolicy::Overwrite, "package main\n".to_string());
        assert_eq!(ArtifactWriter::default().write(&artifact).unwrap(), WriteOutcome::Overwritten);
        assert_eq!(fs::read_to_string(&path).unwrap(), "package main\n");
    }

    #[test]
    fn test_merge_creates_then_reports_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.go");
        let content = "package main\n\nfunc (c *Controller) AddPod(obj interface{}) {}\n";
        let artifact = Artifact::new(&path, merge_policy(), content.to_string());
        let writer = ArtifactWriter::default();

        assert_eq!(writer.write(&artifact).unwrap(), WriteOutcome::Created);
        assert_eq!(writer.write(&artifact).unwrap(), WriteOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_merge_appends_to_hand_edited_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.go");
        fs::write(&path, "package main\n\nfunc (c *Controller) AddPod(obj interface{}) {\n\t// mine\n}\n").unwrap();

        let candidate = "package main\n\nfunc (c *Controller) AddPod(obj interface{}) {}\n\nfunc (c *Controller) DeletePod(obj interface{}) {}\n";
        let artifact = Artifact::new(&path, merge_policy(), candidate.to_string());
        assert_eq!(ArtifactWriter::default().write(&artifact).unwrap(), WriteOutcome::Merged);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("// mine"));
        assert!(text.ends_with("\nfunc (c *Controller) DeletePod(obj interface{}) {}\n"));
    }

    #[test]
    fn test_malformed_mergeable_file_is_left_untouched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.go");
        let broken = "package main\n\nfunc (c *Controller) AddPod( {\n";
        fs::write(&path, broken).unwrap();

        let candidate = "package main\n\nfunc (c *Controller) DeletePod() {}\n";
        let artifact = Artifact::new(&path, merge_policy(), candidate.to_string());
        let err = ArtifactWriter::default().write(&artifact).unwrap_err();

        match err.downcast_ref::<CtrlgenError>() {
            Some(CtrlgenError::GoParseError {
                source_name,
                ..
            }) => assert!(source_name.contains("custom.go")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("controller.go");
        let artifact = Artifact::new(&path, WritePolicy::Overwrite, "package main\n".to_string());

        assert_eq!(ArtifactWriter::new(true).write(&artifact).unwrap(), WriteOutcome::Created);
        assert!(!path.exists());
    }

    #[test]
    fn test_report_counts_modifications() {
        let mut report = WriteReport::default();
        report.push(PathBuf::from("go.mod"), WriteOutcome::Skipped);
        report.push(PathBuf::from("main.go"), WriteOutcome::Overwritten);
        report.push(PathBuf::from("custom.go"), WriteOutcome::Unchanged);

        assert_eq!(report.modified(), 1);
        assert_eq!(report.outcome_of(Path::new("custom.go")), Some(WriteOutcome::Unchanged));
        assert_eq!(report.outcome_of(Path::new("other.go")), None);
    }
}
