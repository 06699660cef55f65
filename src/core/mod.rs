//! Core types and error handling for ctrlgen.
//!
//! - [`error`] - the [`CtrlgenError`] enum, [`ErrorContext`] and
//!   [`user_friendly_error`] used by the CLI to print diagnostics

pub mod error;

pub use error::{CtrlgenError, ErrorContext, user_friendly_error};

/// Result alias for operations that fail with a [`CtrlgenError`].
pub type Result<T, E = CtrlgenError> = std::result::Result<T, E>;
