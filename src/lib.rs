//! ctrlgen - declarative scaffolding for Kubernetes resource-watching controllers
//!
//! ctrlgen reads a YAML description of the resources a controller should
//! watch and writes a buildable Go project for it: `go.mod`, `main.go`,
//! `controller.go`, `custom.go` and, for local custom types, deep-copy files.
//! Re-running the generator after editing the description is safe:
//! `custom.go` is merged rather than overwritten, so hand-written handler
//! bodies survive and only missing imports and methods are appended.
//!
//! # Architecture Overview
//!
//! ```text
//! YAML ──config::load──▶ ControllerSpec
//!                          │
//!                          ▼ resolver::resolve (per resource)
//!                        ControllerConfig (assembler)
//!                          │
//!                          ▼ templating::TemplateRenderer
//!                        [Artifact] ──writer::ArtifactWriter──▶ files
//!                                          │
//!                                          └─ merge::merge (custom.go)
//! ```
//!
//! # Core Modules
//!
//! ## Description and resolution
//! - [`config`] - The YAML description and its loader (path or URL)
//! - [`lookup`] - Built-in kind table, package defaults and import aliases
//! - [`resolver`] - Turns one resource entry into a [`resolver::ResourceDescriptor`]
//! - [`assembler`] - Builds the template-ready [`assembler::ControllerConfig`]
//!
//! ## Generation
//! - [`templating`] - Tera templates for every generated file
//! - [`golang`] - Top-level Go source scanner (package, imports, functions)
//! - [`merge`] - Idempotent merge of a rendered file into an edited one
//! - [`writer`] - Write policies: overwrite, write-once, merge
//! - [`generator`] - The end-to-end pipeline
//! - [`tidy`] - `go mod tidy` in the output directory
//!
//! ## Supporting modules
//! - [`cli`] - Command-line interface
//! - [`core`] - Error types and user-facing error formatting
//! - [`constants`] - File names, defaults and limits
//! - [`utils`] - Atomic file operations
//!
//! # Description Format
//!
//! ```yaml
//! base: ./podwatcher
//! name: Controller
//! namespace: ""          # empty: watch all namespaces
//! retryOnError: 3
//! go:
//!   module: example.com/podwatcher
//!   version: "1.21.1"
//!   k8sAPIVersion: "0.28.3"
//! resources:
//!   - kind: Pod          # built-in: group and package come from the kind table
//!   - kind: Deployment
//!     customHandlers: [Add]
//!   - kind: Widget       # local custom type
//!     group: example.com
//!     genDeepCopy: true
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! ctrlgen generate -f controller.yaml
//! ctrlgen validate -f controller.yaml --format json
//! ```

// Description and resolution
pub mod assembler;
pub mod config;
pub mod lookup;
pub mod resolver;

// Generation
pub mod generator;
pub mod golang;
pub mod merge;
pub mod templating;
pub mod tidy;
pub mod writer;

// Supporting modules
pub mod cli;
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
