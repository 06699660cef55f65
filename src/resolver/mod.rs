//! Resource resolution: turning a loosely specified resource entry into a
//! fully qualified, import-resolvable descriptor.
//!
//! # Resolution paths
//!
//! The path is selected by whether the entry has a group:
//!
//! - **Built-in** (`group` empty): the kind is looked up in the static
//!   kind → group table. Version and package are derived from each other or
//!   defaulted to `v1` / `k8s.io/api/<group>/<version>`.
//! - **Third-party or local** (`group` set): the group must not be reserved for
//!   built-ins. Without a package the type is local to the generated module and
//!   needs no import. With a package the version is derived or checked exactly
//!   as on the built-in path.
//!
//! Problems that have a documented fallback are reported as
//! [`ResolutionWarning`]s and never abort a run. Everything else is a
//! [`CtrlgenError`] and aborts before any artifact is written.
//!
//! # Example
//!
//! ```rust
//! use ctrlgen_cli::config::ResourceSpec;
//! use ctrlgen_cli::resolver::resolve;
//!
//! let resolved = resolve(0, &ResourceSpec::kind("Deployment"), "example.com/op").unwrap();
//! let d = resolved.descriptor;
//! assert_eq!(d.group, "apps");
//! assert_eq!(d.version, "v1");
//! assert_eq!(d.package.as_deref(), Some("k8s.io/api/apps/v1"));
//! assert_eq!(d.alias.as_deref(), Some("appsv1"));
//! assert_eq!(d.qualified_type, "appsv1.Deployment");
//! ```

mod descriptor;
mod warnings;


pub use descriptor::ResourceDescriptor;
pub use warnings::ResolutionWarning;

use tracing::{info, warn};

use crate::config::ResourceSpec;
use crate::constants::{DEFAULT_RESOURCE_VERSION, HANDLER_OPERATIONS};
use crate::core::{CtrlgenError, Result};
use crate::lookup::{
    alias_for_package, default_package, group_for_kind, is_builtin_group, version_in_package,
};

/// Outcome of resolving one resource entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The resolved descriptor.
    pub descriptor: ResourceDescriptor,
    /// Non-fatal problems found while resolving.
    pub warnings: Vec<ResolutionWarning>,
}

/// Group, version and package after path-specific resolution.
struct Coordinates {
    group: String,
    version: String,
    package: Option<String>,
}

/// Resolve one resource entry.
///
/// `index` is the entry's position in the resource list; index 0 is the
/// primary reconciliation target and always gets all custom handlers.
/// `module_root` is the Go module of the generated project, used to decide
/// whether deep-copy code may be written into the resource's package.
///
/// # Errors
///
/// - [`CtrlgenError::EmptyKind`] when `kind` is blank
/// - [`CtrlgenError::UnknownResourceKind`] for a built-in entry whose kind is not
///   in the table and that has no package
/// - [`CtrlgenError::InvalidThirdPartyGroup`] when a third-party entry uses a
///   reserved group
pub fn resolve(index: usize, spec: &ResourceSpec, module_root: &str) -> Result<Resolved> {
    let kind = spec.kind.trim();
    if kind.is_empty() {
        return Err(CtrlgenError::EmptyKind {
            index,
        });
    }

    let mut warnings = Vec::new();
    let builtin = spec.group.is_empty();
    let coordinates = if builtin {
        resolve_builtin(kind, spec, &mut warnings)?
    } else {
        resolve_third_party(kind, spec, &mut warnings)?
    };

    let alias = coordinates.package.as_deref().map(alias_for_package);
    let qualified_type = match &alias {
        Some(alias) => format!("{alias}.{kind}"),
        None => kind.to_string(),
    };

    let gen_deep_copy = resolve_deep_copy(
        kind,
        spec.gen_deep_copy,
        builtin,
        coordinates.package.as_deref(),
        module_root,
        &mut warnings,
    );

    check_handler_names(kind, &spec.custom_handlers, &mut warnings);
    let wants = |operation: &str| {
        index == 0
            || spec.custom_handlers.is_empty()
            || spec.custom_handlers.iter().any(|h| h == operation)
    };

    let descriptor = ResourceDescriptor {
        kind: kind.to_string(),
        lower_kind: kind.to_lowercase(),
        group: coordinates.group,
        version: coordinates.version,
        package: coordinates.package,
        alias,
        qualified_type,
        custom_handlers: spec.custom_handlers.clone(),
        gen_deep_copy,
        custom_add: wants("Add"),
        custom_update: wants("Update"),
        custom_delete: wants("Delete"),
    };

    Ok(Resolved {
        descriptor,
        warnings,
    })
}

fn resolve_builtin(
    kind: &str,
    spec: &ResourceSpec,
    warnings: &mut Vec<ResolutionWarning>,
) -> Result<Coordinates> {
    let group = group_for_kind(kind);
    if group.is_none() && spec.package.is_empty() {
        return Err(CtrlgenError::UnknownResourceKind {
            kind: kind.to_string(),
        });
    }
    // Only reachable with an explicit package when the kind is unknown
    let group = group.unwrap_or_default();

    let (version, package) = match (spec.version.is_empty(), spec.package.is_empty()) {
        (true, true) => {
            (DEFAULT_RESOURCE_VERSION.to_string(), default_package(group, DEFAULT_RESOURCE_VERSION))
        }
        (false, true) => (spec.version.clone(), default_package(group, &spec.version)),
        (true, false) => (version_from_package(kind, &spec.package, warnings), spec.package.clone()),
        (false, false) => {
            check_version_consistency(kind, &spec.version, &spec.package, warnings);
            (spec.version.clone(), spec.package.clone())
        }
    };

    Ok(Coordinates {
        group: group.to_string(),
        version,
        package: Some(package),
    })
}

fn resolve_third_party(
    kind: &str,
    spec: &ResourceSpec,
    warnings: &mut Vec<ResolutionWarning>,
) -> Result<Coordinates> {
    if is_builtin_group(&spec.group) {
        return Err(CtrlgenError::InvalidThirdPartyGroup {
            group: spec.group.clone(),
            kind: kind.to_string(),
        });
    }

    if spec.package.is_empty() {
        // Local type: lives in the generated module, nothing to import
        let version = if spec.version.is_empty() {
            DEFAULT_RESOURCE_VERSION.to_string()
        } else {
            spec.version.clone()
        };
        return Ok(Coordinates {
            group: spec.group.clone(),
            version,
            package: None,
        });
    }

    let version = if spec.version.is_empty() {
        version_from_package(kind, &spec.package, warnings)
    } else {
        check_version_consistency(kind, &spec.version, &spec.package, warnings);
        spec.version.clone()
    };

    Ok(Coordinates {
        group: spec.group.clone(),
        version,
        package: Some(spec.package.clone()),
    })
}

fn version_from_package(
    kind: &str,
    package: &str,
    warnings: &mut Vec<ResolutionWarning>,
) -> String {
    if let Some(version) = version_in_package(package) {
        return version.to_string();
    }
    let warning = ResolutionWarning::NoVersionInPackage {
        kind: kind.to_string(),
        package: package.to_string(),
    };
    warn!(kind, package, "{warning}");
    warnings.push(warning);
    DEFAULT_RESOURCE_VERSION.to_string()
}

fn check_version_consistency(
    kind: &str,
    version: &str,
    package: &str,
    warnings: &mut Vec<ResolutionWarning>,
) {
    let Some(package_version) = version_in_package(package) else {
        return;
    };
    if package_version != version {
        let warning = ResolutionWarning::InconsistentVersion {
            kind: kind.to_string(),
            package_version: package_version.to_string(),
            resource_version: version.to_string(),
        };
        warn!(kind, package_version, resource_version = version, "{warning}");
        warnings.push(warning);
    }
}

fn resolve_deep_copy(
    kind: &str,
    requested: bool,
    builtin: bool,
    package: Option<&str>,
    module_root: &str,
    warnings: &mut Vec<ResolutionWarning>,
) -> bool {
    if !requested {
        return false;
    }
    if builtin {
        let warning = ResolutionWarning::DeepCopyNotNeeded {
            kind: kind.to_string(),
        };
        info!(kind, "{warning}");
        warnings.push(warning);
        return false;
    }
    match package {
        Some(package) if !is_within_module(package, module_root) => {
            let warning = ResolutionWarning::DeepCopyForeignPackage {
                kind: kind.to_string(),
                package: package.to_string(),
            };
            info!(kind, package, "{warning}");
            warnings.push(warning);
            false
        }
        _ => true,
    }
}

fn check_handler_names(kind: &str, handlers: &[String], warnings: &mut Vec<ResolutionWarning>) {
    for handler in handlers {
        if !HANDLER_OPERATIONS.contains(&handler.as_str()) {
            let warning = ResolutionWarning::UnknownHandler {
                kind: kind.to_string(),
                handler: handler.clone(),
            };
            warn!(kind, handler = handler.as_str(), "{warning}");
            warnings.push(warning);
        }
    }
}

/// Whether `package` lives inside the module rooted at `module_root`.
///
/// Matches on whole path segments, so `example.com/opx` is not inside
/// `example.com/op`.
#[must_use]
pub fn is_within_module(package: &str, module_root: &str) -> bool {
    match package.strip_prefix(module_root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
