//! Test utilities for ctrlgen
//!
//! Helpers shared by unit tests and the integration suite: one-time logging
//! setup and writers for controller descriptions in temporary directories.
//!
//! # Example
//!
//! ```rust,no_run
//! use ctrlgen_cli::test_utils::{ControllerFixture, init_test_logging};
//! use tempfile::TempDir;
//!
//! init_test_logging(None);
//! let temp = TempDir::new().unwrap();
//! let description = ControllerFixture::new(temp.path().join("out"))
//!     .resource("Pod")
//!     .write_to(temp.path())
//!     .unwrap();
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Module path used by fixtures unless overridden.
pub const FIXTURE_MODULE: &str = "example.com/podwatcher";

/// Initialize logging for tests.
///
/// Respects `RUST_LOG` when `level` is `None`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=ctrlgen_cli=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Builder for a controller description YAML file.
#[derive(Debug, Clone)]
pub struct ControllerFixture {
    base: PathBuf,
    name: String,
    namespace: String,
    module: String,
    resources: Vec<String>,
}

impl ControllerFixture {
    /// A description generating into `base`, with no resources yet.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            name: "Controller".to_string(),
            namespace: String::new(),
            module: FIXTURE_MODULE.to_string(),
            resources: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    #[must_use]
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    /// A built-in resource by kind only.
    #[must_use]
    pub fn resource(mut self, kind: &str) -> Self {
        self.resources.push(format!("  - kind: {kind}\n"));
        self
    }

    /// A raw resource entry; `entry` is the YAML mapping without the list dash,
    /// one key per line.
    #[must_use]
    pub fn raw_resource(mut self, entry: &str) -> Self {
        let mut item = String::new();
        for (i, line) in entry.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let marker = if i == 0 { "  - " } else { "    " };
            let _ = writeln!(item, "{marker}{}", line.trim());
        }
        self.resources.push(item);
        self
    }

    /// Render the description as YAML.
    #[must_use]
    pub fn to_yaml(&self) -> String {
        let mut yaml = String::new();
        let _ = writeln!(yaml, "base: {:?}", self.base.display().to_string());
        let _ = writeln!(yaml, "name: {}", self.name);
        let _ = writeln!(yaml, "namespace: {:?}", self.namespace);
        let _ = writeln!(yaml, "go:\n  module: {}", self.module);
        yaml.push_str("resources:\n");
        for resource in &self.resources {
            yaml.push_str(resource);
        }
        yaml
    }

    /// Write the description to `dir/controller.yaml` and return its path.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be written.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join("controller.yaml");
        std::fs::write(&path, self.to_yaml())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn test_fixture_yaml_parses() {
        let yaml = ControllerFixture::new("/tmp/out")
            .name("PodWatcher")
            .namespace("default")
            .resource("Pod")
            .raw_resource("kind: Widget\ngroup: example.com\ngenDeepCopy: true")
            .to_yaml();

        let spec = config::parse(&yaml, "fixture").unwrap();
        assert_eq!(spec.base, "/tmp/out");
        assert_eq!(spec.name, "PodWatcher");
        assert_eq!(spec.namespace, "default");
        assert_eq!(spec.go.module, FIXTURE_MODULE);
        assert_eq!(spec.resources.len(), 2);
        assert_eq!(spec.resources[1].group, "example.com");
        assert!(spec.resources[1].gen_deep_copy);
    }
}
