//! Static lookup tables for Kubernetes built-in resources.
//!
//! Everything in this module is immutable and process-wide:
//! - the kind → group table for well-known built-in kinds
//! - the reserved built-in group names
//! - the group → default package mapping (`k8s.io/api/<group>/<version>`)
//! - the version-token matcher (`v1`, `v2beta1`, `v1alpha3`, `v1rc1`, ...)
//!
//! Package helpers ([`version_in_package`], [`alias_for_package`]) are pure
//! functions of the package path.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Domain suffix shared by every built-in API group that is not in [`BUILTIN_GROUPS`].
pub const BUILTIN_DOMAIN_SUFFIX: &str = ".k8s.io";

/// Root of the upstream Go package that ships built-in API types.
pub const BUILTIN_PACKAGE_ROOT: &str = "k8s.io/api";

/// Group names reserved for built-in resources.
pub const BUILTIN_GROUPS: &[&str] = &[
    "apps",
    "autoscaling",
    "batch",
    "core",
    "discovery",
    "networking",
    "policy",
    "rbac",
    "scheduling",
    "storage",
    "v1",
];

const KIND_GROUPS: &[(&str, &str)] = &[
    ("Deployment", "apps"),
    ("StatefulSet", "apps"),
    ("ReplicaSet", "apps"),
    ("DaemonSet", "apps"),
    ("HorizontalPodAutoscaler", "autoscaling"),
    ("Job", "batch"),
    ("CronJob", "batch"),
    ("Binding", "core"),
    ("Pod", "core"),
    ("PodTemplate", "core"),
    ("Endpoints", "core"),
    ("ReplicationController", "core"),
    ("Node", "core"),
    ("Namespace", "core"),
    ("Service", "core"),
    ("ServiceAccount", "core"),
    ("ConfigMap", "core"),
    ("Secret", "core"),
    ("LimitRange", "core"),
    ("ResourceQuota", "core"),
    ("PersistentVolume", "core"),
    ("PersistentVolumeClaim", "core"),
    ("Event", "core"),
    ("EndpointSlice", "discovery"),
    ("Ingress", "networking"),
    ("IngressClass", "networking"),
    ("NetworkPolicy", "networking"),
    ("PodDisruptionBudget", "policy"),
    ("Role", "rbac"),
    ("RoleBinding", "rbac"),
    ("ClusterRole", "rbac"),
    ("ClusterRoleBinding", "rbac"),
    ("PriorityClass", "scheduling"),
    ("CSIDriver", "storage"),
    ("CSINode", "storage"),
    ("CSIStorageCapacity", "storage"),
    ("StorageClass", "storage"),
];

static KIND_GROUP_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| KIND_GROUPS.iter().copied().collect());

// Anchored so that "v1" matches but "v1x" and "api" do not
static VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v\d+((alpha|beta|rc)\d+)?$").expect("version token pattern is valid")
});

/// Look up the owning group of a well-known built-in kind.
///
/// ```rust
/// use ctrlgen_cli::lookup::group_for_kind;
///
/// assert_eq!(group_for_kind("Deployment"), Some("apps"));
/// assert_eq!(group_for_kind("FrobulatorWidget"), None);
/// ```
#[must_use]
pub fn group_for_kind(kind: &str) -> Option<&'static str> {
    KIND_GROUP_TABLE.get(kind).copied()
}

/// Whether `group` is reserved for built-in resources.
#[must_use]
pub fn is_builtin_group(group: &str) -> bool {
    BUILTIN_GROUPS.contains(&group) || group.ends_with(BUILTIN_DOMAIN_SUFFIX)
}

/// Default Go package for a built-in group at a given version.
#[must_use]
pub fn default_package(group: &str, version: &str) -> String {
    format!("{BUILTIN_PACKAGE_ROOT}/{group}/{version}")
}

/// Whether a path segment is a version token such as `v1` or `v2beta1`.
#[must_use]
pub fn is_version_token(segment: &str) -> bool {
    VERSION_TOKEN.is_match(segment)
}

/// First version-shaped segment of a package path, if any.
#[must_use]
pub fn version_in_package(package: &str) -> Option<&str> {
    package.split('/').find(|segment| is_version_token(segment))
}

/// Derive the import alias of a package path.
///
/// - one segment: the path itself
/// - two segments: the second segment
/// - three or more: `<second-to-last><last>` when the last segment is a
///   version token, otherwise the last segment
///
/// ```rust
/// use ctrlgen_cli::lookup::alias_for_package;
///
/// assert_eq!(alias_for_package("k8s.io/api/apps/v1"), "appsv1");
/// assert_eq!(alias_for_package("example.com/widgets"), "widgets");
/// assert_eq!(alias_for_package("example.com/foo/api"), "api");
/// ```
#[must_use]
pub fn alias_for_package(package: &str) -> String {
    let segments: Vec<&str> = package.split('/').collect();
    match segments.as_slice() {
        [_] => package.to_string(),
        [_, second] => (*second).to_string(),
        [.., parent, last] if is_version_token(last) => format!("{parent}{last}"),
        [.., last] => (*last).to_string(),
        [] => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_for_known_kinds() {
        assert_eq!(group_for_kind("Pod"), Some("core"));
        assert_eq!(group_for_kind("CronJob"), Some("batch"));
        assert_eq!(group_for_kind("StorageClass"), Some("storage"));
        assert_eq!(group_for_kind("Ingress"), Some("networking"));
    }

    #[test]
    fn test_group_lookup_is_case_sensitive() {
        assert_eq!(group_for_kind("pod"), None);
    }

    #[test]
    fn test_builtin_groups() {
        assert!(is_builtin_group("apps"));
        assert!(is_builtin_group("v1"));
        assert!(is_builtin_group("admissionregistration.k8s.io"));
        assert!(!is_builtin_group("example.com"));
        assert!(!is_builtin_group("k8s.io.example.com"));
    }

    #[test]
    fn test_version_tokens() {
        for token in ["v1", "v2", "v1alpha1", "v2beta3", "v1rc2", "v10"] {
            assert!(is_version_token(token), "{token} should be a version");
        }
        for token in ["v", "1", "version1", "v1gamma1", "v1beta", "apps", "v1.2"] {
            assert!(!is_version_token(token), "{token} should not be a version");
        }
    }

    #[test]
    fn test_version_in_package_takes_first_match() {
        assert_eq!(version_in_package("k8s.io/api/apps/v1"), Some("v1"));
        assert_eq!(version_in_package("example.com/v2/api/v1beta1"), Some("v2"));
        assert_eq!(version_in_package("example.com/api"), None);
        assert_eq!(version_in_package(""), None);
    }

    #[test]
    fn test_alias_derivation() {
        assert_eq!(alias_for_package("widgets"), "widgets");
        assert_eq!(alias_for_package("example.com/widgets"), "widgets");
        assert_eq!(alias_for_package("example.com/v1"), "v1");
        assert_eq!(alias_for_package("k8s.io/api/core/v1"), "corev1");
        assert_eq!(alias_for_package("example.com/op/api/v1alpha1"), "apiv1alpha1");
        assert_eq!(alias_for_package("example.com/op/pkg/types"), "types");
    }

    #[test]
    fn test_default_package() {
        assert_eq!(default_package("batch", "v1beta1"), "k8s.io/api/batch/v1beta1");
    }
}
