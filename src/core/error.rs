//! Error handling for ctrlgen
//!
//! This module provides the error types and user-facing error reporting for the
//! generator. It follows two rules:
//! 1. **Strongly-typed errors** so callers can match on the failure kind
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Configuration** (always fatal, raised before any artifact is written):
//!   [`CtrlgenError::InvalidRetry`], [`CtrlgenError::NoResources`],
//!   [`CtrlgenError::EmptyKind`], [`CtrlgenError::UnknownResourceKind`],
//!   [`CtrlgenError::InvalidThirdPartyGroup`], [`CtrlgenError::ConfigParseError`]
//! - **I/O**: [`CtrlgenError::FileSystemError`], [`CtrlgenError::NetworkError`],
//!   [`CtrlgenError::IoError`]
//! - **Source parsing**: [`CtrlgenError::GoParseError`]. Raised by the merge
//!   engine; the existing artifact is left untouched.
//! - **Rendering and post-processing**: [`CtrlgenError::TemplateRenderFailed`],
//!   [`CtrlgenError::TidyFailed`]
//!
//! Non-fatal resolution problems are not errors; see
//! [`crate::resolver::ResolutionWarning`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use ctrlgen_cli::core::{CtrlgenError, user_friendly_error};
//!
//! let error = CtrlgenError::NoResources;
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::lookup::BUILTIN_GROUPS;

/// The main error type for ctrlgen operations.
#[derive(Error, Debug)]
pub enum CtrlgenError {
    /// `retryOnError` is outside the accepted range.
    #[error("retryOnError must be between 0 and 10, got {value}")]
    InvalidRetry {
        /// The rejected value
        value: i64,
    },

    /// The controller description lists no resources to watch.
    #[error("no resource to control: the resources list is empty")]
    NoResources,

    /// A resource entry has no kind.
    #[error("resource #{index} has an empty kind")]
    EmptyKind {
        /// Position of the entry in the resources list
        index: usize,
    },

    /// A built-in resource kind is not in the well-known table and no package was given.
    #[error("unknown resource kind: {kind}")]
    UnknownResourceKind {
        /// The kind that could not be resolved
        kind: String,
    },

    /// A third-party resource uses a group reserved for Kubernetes built-ins.
    #[error("invalid third-party group '{group}' for kind {kind}")]
    InvalidThirdPartyGroup {
        /// The offending group
        group: String,
        /// The kind declared with that group
        kind: String,
    },

    /// The controller description could not be parsed.
    #[error("invalid controller description in {source_name}")]
    ConfigParseError {
        /// Path or URL of the description
        source_name: String,
        /// Parser message
        reason: String,
    },

    /// An existing or freshly rendered Go source file failed to parse.
    #[error("failed to parse Go source {source_name} at line {line}: {reason}")]
    GoParseError {
        /// Which text failed ("existing custom.go", "rendered candidate", ...)
        source_name: String,
        /// 1-based line of the failure
        line: usize,
        /// What the scanner expected
        reason: String,
    },

    /// A template failed to render.
    #[error("failed to render template '{template}'")]
    TemplateRenderFailed {
        /// Template name
        template: String,
        /// Cleaned-up Tera message
        reason: String,
    },

    /// A filesystem operation failed.
    #[error("file system error: {operation} {path}")]
    FileSystemError {
        /// What was being attempted
        operation: String,
        /// Path involved
        path: String,
    },

    /// Fetching a remote description failed.
    #[error("network error: {operation}")]
    NetworkError {
        /// What was being attempted
        operation: String,
        /// Underlying reason
        reason: Option<String>,
    },

    /// The external module-tidy step failed.
    #[error("go mod tidy failed: {reason}")]
    TidyFailed {
        /// Exit status or spawn failure
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl CtrlgenError {
    /// Whether this error belongs to the configuration category.
    ///
    /// Configuration errors are always raised before any artifact is written.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRetry { .. }
                | Self::NoResources
                | Self::EmptyKind { .. }
                | Self::UnknownResourceKind { .. }
                | Self::InvalidThirdPartyGroup { .. }
                | Self::ConfigParseError { .. }
        )
    }
}

impl Clone for CtrlgenError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidRetry {
                value,
            } => Self::InvalidRetry {
                value: *value,
            },
            Self::NoResources => Self::NoResources,
            Self::EmptyKind {
                index,
            } => Self::EmptyKind {
                index: *index,
            },
            Self::UnknownResourceKind {
                kind,
            } => Self::UnknownResourceKind {
                kind: kind.clone(),
            },
            Self::InvalidThirdPartyGroup {
                group,
                kind,
            } => Self::InvalidThirdPartyGroup {
                group: group.clone(),
                kind: kind.clone(),
            },
            Self::ConfigParseError {
                source_name,
                reason,
            } => Self::ConfigParseError {
                source_name: source_name.clone(),
                reason: reason.clone(),
            },
            Self::GoParseError {
                source_name,
                line,
                reason,
            } => Self::GoParseError {
                source_name: source_name.clone(),
                line: *line,
                reason: reason.clone(),
            },
            Self::TemplateRenderFailed {
                template,
                reason,
            } => Self::TemplateRenderFailed {
                template: template.clone(),
                reason: reason.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::NetworkError {
                operation,
                reason,
            } => Self::NetworkError {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            Self::TidyFailed {
                reason,
            } => Self::TidyFailed {
                reason: reason.clone(),
            },
            // io::Error is not Clone; keep kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying a user-facing suggestion and details.
///
/// ```rust,no_run
/// use ctrlgen_cli::core::{CtrlgenError, ErrorContext};
///
/// let context = ErrorContext::new(CtrlgenError::NoResources)
///     .with_suggestion("Add at least one entry under `resources:`")
///     .with_details("The first resource is the primary reconciliation target");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CtrlgenError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: CtrlgenError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error. Shown in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error. Shown in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`].
///
/// Recognises [`CtrlgenError`] (tailored suggestions), [`std::io::Error`] and
/// [`serde_yaml::Error`]. Anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctrlgen_error) = error.downcast_ref::<CtrlgenError>() {
        let context = create_error_context(ctrlgen_error.clone());
        // Typed errors attached with `.context()` keep their cause underneath
        if context.details.is_none()
            && let Some(cause) = error.chain().nth(1)
        {
            return context.with_details(cause.to_string());
        }
        return context;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(CtrlgenError::FileSystemError {
                    operation: "permission denied".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check ownership and permissions of the base directory")
                .with_details(io_error.to_string());
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(CtrlgenError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(io_error.to_string());
            }
            _ => {}
        }
    }

    if let Some(yaml_error) = error.downcast_ref::<serde_yaml::Error>() {
        return ErrorContext::new(CtrlgenError::ConfigParseError {
            source_name: "controller description".to_string(),
            reason: yaml_error.to_string(),
        })
        .with_suggestion("Check the YAML syntax and field names of the controller description");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(CtrlgenError::Other {
        message,
    })
}

fn create_error_context(error: CtrlgenError) -> ErrorContext {
    match &error {
        CtrlgenError::InvalidRetry {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Set retryOnError to a value between 0 and 10"),
        CtrlgenError::NoResources => ErrorContext::new(error)
            .with_suggestion("Add at least one entry under `resources:`")
            .with_details("The first resource is the primary reconciliation target"),
        CtrlgenError::EmptyKind {
            ..
        } => ErrorContext::new(error).with_suggestion("Set `kind` on every resource entry"),
        CtrlgenError::UnknownResourceKind {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "If you need to control a builtin resource, set package to \
             k8s.io/api/<package-group>/<version> and try again",
        ),
        CtrlgenError::InvalidThirdPartyGroup {
            ..
        } => ErrorContext::new(error)
            .with_details(format!(
                "group name cannot be any of {} or end with \".k8s.io\" because they are builtin groups",
                BUILTIN_GROUPS.join(", ")
            ))
            .with_suggestion(
                "If you need a builtin resource, leave group empty, set package to \
                 k8s.io/api/<package-group>/<version> and try again",
            ),
        CtrlgenError::ConfigParseError {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error)
                .with_details(reason)
                .with_suggestion("Check the YAML syntax and field names of the controller description")
        }
        CtrlgenError::GoParseError {
            ..
        } => ErrorContext::new(error)
            .with_details("The file was not modified")
            .with_suggestion("Fix the syntax error in the file and run the generator again"),
        CtrlgenError::TemplateRenderFailed {
            reason,
            ..
        } => {
            let reason = reason.clone();
            ErrorContext::new(error).with_details(reason)
        }
        CtrlgenError::NetworkError {
            reason,
            ..
        } => {
            let details = reason.clone().unwrap_or_default();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check the URL and your network connection, or use a local file")
        }
        CtrlgenError::TidyFailed {
            ..
        } => ErrorContext::new(error)
            .with_details("All artifacts were written before the tidy step ran")
            .with_suggestion("Install Go and run `go mod tidy` manually, or pass --no-tidy"),
        _ => ErrorContext::new(error),
    }
}
