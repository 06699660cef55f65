//! Controller description: the user-facing input of a generator run.
//!
//! The description is a YAML document, loaded from a local path or fetched
//! over HTTP(S) (see [`loader`]). It names the controller, its target module,
//! and the resources the controller watches.
//!
//! # Format
//!
//! ```yaml
//! base: ./podwatcher
//! name: Controller
//! retryOnError: 3
//! namespace: ""            # empty = cluster-scoped
//! go:
//!   module: example.com/podwatcher
//!   version: "1.21.1"
//!   k8sAPIVersion: 0.28.3
//! resources:
//!   - kind: Pod
//!   - kind: Deployment
//!     customHandlers: [Update]
//!   - kind: Widget
//!     group: example.com
//!     package: example.com/podwatcher/api/v1
//!     genDeepCopy: true
//! ```
//!
//! Missing fields are defaulted during deserialisation where a default is
//! independent of other fields. Defaults that depend on other fields (such as
//! the module name derived from the controller name) are applied by
//! [`ControllerSpec::apply_defaults`].

pub mod loader;

pub use loader::{load, parse};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE, DEFAULT_CONTROLLER_NAME, DEFAULT_GO_VERSION, DEFAULT_K8S_API_VERSION,
    DEFAULT_MODULE, DEFAULT_RETRY_ON_ERROR,
};

/// Top-level controller description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerSpec {
    /// Output directory; generated artifact paths are relative to it.
    #[serde(default = "default_base")]
    pub base: String,

    /// Controller type name; also the receiver type of generated methods.
    #[serde(default = "default_name")]
    pub name: String,

    /// Target module context. Without a `go` section the module is
    /// `controller`; a section without `module` uses the lowercase name.
    #[serde(default = "default_module_context")]
    pub go: ModuleContext,

    /// Number of retries for a failing key, `0..=10`.
    #[serde(default = "default_retry")]
    pub retry_on_error: i64,

    /// Namespace to watch; empty means cluster-scoped.
    #[serde(default)]
    pub namespace: String,

    /// Watched resources. The first entry is the primary reconciliation target.
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
}

/// Module-context block (`go:` in YAML).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleContext {
    /// Go module path of the generated project.
    #[serde(default)]
    pub module: String,

    /// Go toolchain version written to `go.mod`.
    #[serde(default = "default_go_version")]
    pub version: String,

    /// Version of the upstream API packages (`k8s.io/api`, `k8s.io/client-go`, ...).
    #[serde(default = "default_k8s_api_version", rename = "k8sAPIVersion")]
    pub k8s_api_version: String,
}

impl Default for ModuleContext {
    fn default() -> Self {
        Self {
            module: String::new(),
            version: default_go_version(),
            k8s_api_version: default_k8s_api_version(),
        }
    }
}

/// One watched resource as written by the user.
///
/// Every field except `kind` may be left out. The resolver fills in group,
/// version and package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    /// Resource kind, e.g. `Deployment`.
    #[serde(default)]
    pub kind: String,

    /// API group; empty selects the built-in resolution path.
    #[serde(default)]
    pub group: String,

    /// API version, e.g. `v1`.
    #[serde(default)]
    pub version: String,

    /// Go package that defines the type; empty for local types.
    #[serde(default)]
    pub package: String,

    /// Operations (`Add`, `Update`, `Delete`) that get hand-written handlers.
    /// Empty means all of them.
    #[serde(default)]
    pub custom_handlers: Vec<String>,

    /// Whether to generate deep-copy functions for the type.
    #[serde(default)]
    pub gen_deep_copy: bool,
}

impl ResourceSpec {
    /// Convenience constructor for a resource identified only by kind.
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

impl Default for ControllerSpec {
    fn default() -> Self {
        Self {
            base: default_base(),
            name: default_name(),
            go: default_module_context(),
            retry_on_error: default_retry(),
            namespace: String::new(),
            resources: Vec::new(),
        }
    }
}

impl ControllerSpec {
    /// Replace empty fields with their defaults.
    ///
    /// Explicitly empty strings in YAML (`name: ""`) bypass serde defaults, so
    /// this runs again before resolution. An empty module name falls back to the
    /// lowercase controller name.
    pub fn apply_defaults(&mut self) {
        if self.base.is_empty() {
            self.base = default_base();
        }
        if self.name.is_empty() {
            self.name = default_name();
        }
        if self.go.module.is_empty() {
            self.go.module = self.name.to_lowercase();
        }
        if self.go.version.is_empty() {
            self.go.version = default_go_version();
        }
        if self.go.k8s_api_version.is_empty() {
            self.go.k8s_api_version = default_k8s_api_version();
        }
    }
}

fn default_base() -> String {
    DEFAULT_BASE.to_string()
}

fn default_name() -> String {
    DEFAULT_CONTROLLER_NAME.to_string()
}

fn default_module_context() -> ModuleContext {
    ModuleContext {
        module: DEFAULT_MODULE.to_string(),
        ..ModuleContext::default()
    }
}

fn default_go_version() -> String {
    DEFAULT_GO_VERSION.to_string()
}

fn default_k8s_api_version() -> String {
    DEFAULT_K8S_API_VERSION.to_string()
}

const fn default_retry() -> i64 {
    DEFAULT_RETRY_ON_ERROR
}
