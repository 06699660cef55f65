use serde::Serialize;
use std::fmt;

/// Non-fatal problem found during resolution.
///
/// Each variant has a documented fallback, so resolution continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// The package has no version-shaped segment; `v1` was assumed.
    NoVersionInPackage {
        kind: String,
        package: String,
    },
    /// The package's version segment disagrees with the declared version.
    /// The declared version wins.
    InconsistentVersion {
        kind: String,
        package_version: String,
        resource_version: String,
    },
    /// Deep copy was requested for a built-in kind, which already ships it.
    DeepCopyNotNeeded {
        kind: String,
    },
    /// Deep copy was requested for a package outside the generated module.
    DeepCopyForeignPackage {
        kind: String,
        package: String,
    },
    /// A `customHandlers` entry is not one of `Add`, `Update`, `Delete`.
    UnknownHandler {
        kind: String,
        handler: String,
    },
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoVersionInPackage {
                kind,
                package,
            } => write!(
                f,
                "{kind}: no version information in package {package}, using \"v1\"; this may cause incompatibility"
            ),
            Self::InconsistentVersion {
                kind,
                package_version,
                resource_version,
            } => write!(
                f,
                "{kind}: package version {package_version} is inconsistent with resource version {resource_version}; this may cause incompatibility"
            ),
            Self::DeepCopyNotNeeded {
                kind,
            } => write!(f, "{kind}: builtin types ship DeepCopy already, not generating it"),
            Self::DeepCopyForeignPackage {
                kind,
                package,
            } => write!(
                f,
                "{kind}: package {package} is outside the module, not generating DeepCopy"
            ),
            Self::UnknownHandler {
                kind,
                handler,
            } => write!(f, "{kind}: unknown custom handler {handler:?}, expected Add, Update or Delete"),
        }
    }
}
