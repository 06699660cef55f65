//! Configuration assembly: from a controller description to the read-only
//! [`ControllerConfig`] that templates render from.
//!
//! Assembly is all-or-nothing. Controller-level validation runs first, then
//! every resource is resolved in declaration order, and the first failure
//! aborts the run before anything touches the filesystem.
//!
//! # Imports
//!
//! Imports are collected into a map keyed by package path, so the final list
//! has no duplicate package and is sorted ascending by package path. Aliases
//! are a pure function of the package path, so two resources that share a
//! package also share an alias and there is nothing to reconcile.
//!
//! # Field lists
//!
//! The field lists consumed by the controller and main templates come in a
//! cluster-scoped and a namespaced flavor, selected by whether `namespace` is
//! empty. All of them are linear maps over the resource list and keep its
//! order.

mod fields;

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{ControllerSpec, ModuleContext};
use crate::constants::MAX_RETRY_ON_ERROR;
use crate::core::{CtrlgenError, Result};
use crate::resolver::{self, ResolutionWarning, ResourceDescriptor};

/// A Go import: alias plus package path. Identity is the package path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Import {
    pub alias: String,
    pub package: String,
}

/// Fully resolved configuration of one generator run.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerConfig {
    pub base: String,
    pub name: String,
    pub namespace: String,
    pub retry: i64,
    pub module: ModuleContext,
    pub resources: Vec<ResourceDescriptor>,
    /// Unique, sorted by package path.
    pub imports: Vec<Import>,
    /// Subset of `imports` used by resources with at least one custom handler.
    pub custom_imports: Vec<Import>,
    pub lister_fields: Vec<String>,
    pub has_synced_fields: Vec<String>,
    pub struct_field_inits: Vec<String>,
    pub informer_inits: Vec<String>,
    pub new_controller_args: Vec<String>,
    #[serde(skip)]
    pub warnings: Vec<ResolutionWarning>,
}

impl ControllerConfig {
    /// Validate a description, resolve every resource and derive the template fields.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found; see [`resolver::resolve`]
    /// for the per-resource errors.
    pub fn assemble(mut spec: ControllerSpec) -> Result<Self> {
        spec.apply_defaults();

        if !(0..=MAX_RETRY_ON_ERROR).contains(&spec.retry_on_error) {
            return Err(CtrlgenError::InvalidRetry {
                value: spec.retry_on_error,
            });
        }
        if spec.resources.is_empty() {
            return Err(CtrlgenError::NoResources);
        }

        let mut resources = Vec::with_capacity(spec.resources.len());
        let mut warnings = Vec::new();
        for (index, entry) in spec.resources.iter().enumerate() {
            let resolved = resolver::resolve(index, entry, &spec.go.module)?;
            debug!(
                kind = resolved.descriptor.kind.as_str(),
                qualified_type = resolved.descriptor.qualified_type.as_str(),
                "resolved resource"
            );
            resources.push(resolved.descriptor);
            warnings.extend(resolved.warnings);
        }

        let imports = collect_imports(resources.iter());
        let custom_imports = collect_imports(resources.iter().filter(|r| r.has_custom_handler()));

        let mut config = Self {
            base: spec.base,
            name: spec.name,
            namespace: spec.namespace,
            retry: spec.retry_on_error,
            module: spec.go,
            resources,
            imports,
            custom_imports,
            lister_fields: Vec::new(),
            has_synced_fields: Vec::new(),
            struct_field_inits: Vec::new(),
            informer_inits: Vec::new(),
            new_controller_args: Vec::new(),
            warnings,
        };
        config.derive_fields();
        Ok(config)
    }

    /// Whether the controller watches all namespaces.
    #[must_use]
    pub fn is_cluster_scoped(&self) -> bool {
        self.namespace.is_empty()
    }

    fn derive_fields(&mut self) {
        if self.is_cluster_scoped() {
            self.lister_fields = fields::global_lister_fields(&self.resources);
            self.informer_inits = fields::global_informer_inits(&self.resources);
            self.new_controller_args = fields::global_new_controller_args(&self.resources);
        } else {
            self.lister_fields = fields::namespaced_lister_fields(&self.resources);
            self.informer_inits =
                fields::namespaced_informer_inits(&self.resources, &self.namespace);
            self.new_controller_args = fields::namespaced_new_controller_args(&self.resources);
        }
        self.has_synced_fields = fields::has_synced_fields(&self.resources);
        self.struct_field_inits = fields::struct_field_inits(&self.resources);
    }
}

fn collect_imports<'a>(resources: impl Iterator<Item = &'a ResourceDescriptor>) -> Vec<Import> {
    let mut by_package: BTreeMap<&str, &str> = BTreeMap::new();
    for resource in resources {
        if let (Some(package), Some(alias)) = (&resource.package, &resource.alias) {
            by_package.insert(package, alias);
        }
    }
    by_package
        .into_iter()
        .map(|(package, alias)| Import {
            alias: alias.to_string(),
            package: package.to_string(),
        })
        .collect()
}
