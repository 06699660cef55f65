//! Integration test suite for ctrlgen
//!
//! End-to-end tests driving the `ctrlgen` binary against temporary
//! directories. None of them need a Go toolchain: every `generate` run
//! passes `--no-tidy`.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **generate**: first generation and the per-file write policies
//! - **regenerate**: re-running against an existing, hand-edited project
//! - **validate**: the `validate` command in text and JSON form
//! - **error_scenarios**: failures that must leave the output untouched

#[path = "../common/mod.rs"]
mod common;

mod error_scenarios;
mod generate;
mod regenerate;
mod validate;
