use serde::Serialize;

/// A fully resolved resource.
///
/// Invariants once produced by [`super::resolve`]:
/// - `alias` is `Some` exactly when `package` is `Some`, and equals
///   [`crate::lookup::alias_for_package`] of it
/// - `qualified_type` is `<alias>.<kind>` for imported types and `<kind>` for
///   local ones
/// - if `package` embeds a version token and no mismatch warning was raised,
///   it equals `version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub kind: String,
    /// Lowercase kind, used for generated identifiers and file names.
    pub lower_kind: String,
    /// Empty for built-in kinds that were only resolvable through an explicit package.
    pub group: String,
    pub version: String,
    /// Go package that defines the type; `None` for local types.
    pub package: Option<String>,
    pub alias: Option<String>,
    /// Type expression used in generated code, e.g. `corev1.Pod`.
    pub qualified_type: String,
    pub custom_handlers: Vec<String>,
    pub gen_deep_copy: bool,
    pub custom_add: bool,
    pub custom_update: bool,
    pub custom_delete: bool,
}

impl ResourceDescriptor {
    /// Whether any event handler of this resource is hand-written.
    #[must_use]
    pub const fn has_custom_handler(&self) -> bool {
        self.custom_add || self.custom_update || self.custom_delete
    }

    /// Whether the type lives in the generated module without an import.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.package.is_none()
    }

    /// Go package name of the defining package (`main` for local types).
    #[must_use]
    pub fn go_package_name(&self) -> &str {
        match &self.package {
            Some(package) => package.rsplit('/').next().unwrap_or(package),
            None => "main",
        }
    }
}
