//! Global constants used throughout the ctrlgen codebase.
//!
//! Defaults for the controller description, retry bounds, generated artifact
//! names and process timeouts live here so they are discoverable in one place.

use std::time::Duration;

/// Default output directory.
pub const DEFAULT_BASE: &str = ".";

/// Default controller type name.
pub const DEFAULT_CONTROLLER_NAME: &str = "Controller";

/// Default Go toolchain version written to `go.mod`.
pub const DEFAULT_GO_VERSION: &str = "1.21.1";

/// Module path used when the description has no `go` section at all.
pub const DEFAULT_MODULE: &str = "controller";

/// Default version of the upstream Kubernetes API modules.
pub const DEFAULT_K8S_API_VERSION: &str = "0.28.3";

/// Default number of retries for a failing key.
pub const DEFAULT_RETRY_ON_ERROR: i64 = 3;

/// Largest accepted `retryOnError`.
pub const MAX_RETRY_ON_ERROR: i64 = 10;

/// Default API version for built-in resources when none can be derived.
pub const DEFAULT_RESOURCE_VERSION: &str = "v1";

/// Resync period used in informer construction expressions.
pub const INFORMER_RESYNC: &str = "30*time.Second";

/// Handler operation names accepted in `customHandlers`.
pub const HANDLER_OPERATIONS: [&str; 3] = ["Add", "Update", "Delete"];

/// Project manifest (write-once).
pub const GO_MOD_FILE: &str = "go.mod";

/// Main entrypoint (overwritten every run).
pub const MAIN_FILE: &str = "main.go";

/// Controller definition (overwritten every run).
pub const CONTROLLER_FILE: &str = "controller.go";

/// User customisation file (merged).
pub const CUSTOM_FILE: &str = "custom.go";

/// Suffix of per-resource deep-copy files: `<lowerkind>_gen.deepcopy.go`.
pub const DEEP_COPY_SUFFIX: &str = "_gen.deepcopy.go";

/// Timeout for the `go mod tidy` post-step (120 seconds).
///
/// Tidy downloads modules on a cold cache, so this is generous.
pub const TIDY_TIMEOUT: Duration = Duration::from_secs(120);
