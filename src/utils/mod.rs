//! Shared utilities.
//!
//! - [`fs`] - atomic writes and directory creation for generated artifacts

pub mod fs;

pub use fs::{atomic_write, ensure_dir, read_optional};
