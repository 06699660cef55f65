//! Go snippets derived from the resource list.
//!
//! Each function maps resources one-to-one (or one-to-two) in list order.

use std::fmt::Write as _;

use crate::constants::INFORMER_RESYNC;
use crate::resolver::ResourceDescriptor;

/// `<kind>Lister kool.Lister[<T>]`
pub(super) fn global_lister_fields(resources: &[ResourceDescriptor]) -> Vec<String> {
    resources
        .iter()
        .map(|r| format!("{}Lister kool.Lister[{}]", r.lower_kind, r.qualified_type))
        .collect()
}

/// `<kind>Informer := kool.NewInformer[<T>](client, <resync>)`
pub(super) fn global_informer_inits(resources: &[ResourceDescriptor]) -> Vec<String> {
    resources
        .iter()
        .map(|r| {
            format!(
                "{}Informer := kool.NewInformer[{}](client, {INFORMER_RESYNC})",
                r.lower_kind, r.qualified_type
            )
        })
        .collect()
}

/// `<kind>Informer kool.Informer[<T>],`
pub(super) fn global_new_controller_args(resources: &[ResourceDescriptor]) -> Vec<String> {
    resources
        .iter()
        .map(|r| format!("{}Informer kool.Informer[{}],", r.lower_kind, r.qualified_type))
        .collect()
}

/// `<kind>Lister kool.NamespacedLister[<T>]`
pub(super) fn namespaced_lister_fields(resources: &[ResourceDescriptor]) -> Vec<String> {
    resources
        .iter()
        .map(|r| format!("{}Lister kool.NamespacedLister[{}]", r.lower_kind, r.qualified_type))
        .collect()
}

/// `<kind>Informer := kool.NewNamespacedInformer[<T>](client, "<ns>", <resync>)`
pub(super) fn namespaced_informer_inits(
    resources: &[ResourceDescriptor],
    namespace: &str,
) -> Vec<String> {
    let namespace = go_string_literal(namespace);
    resources
        .iter()
        .map(|r| {
            format!(
                "{}Informer := kool.NewNamespacedInformer[{}](client, {namespace}, {INFORMER_RESYNC})",
                r.lower_kind, r.qualified_type
            )
        })
        .collect()
}

/// `<kind>Informer kool.NamespacedInformer[<T>],`
pub(super) fn namespaced_new_controller_args(resources: &[ResourceDescriptor]) -> Vec<String> {
    resources
        .iter()
        .map(|r| {
            format!("{}Informer kool.NamespacedInformer[{}],", r.lower_kind, r.qualified_type)
        })
        .collect()
}

/// `<kind>Synced cache.InformerSynced`
pub(super) fn has_synced_fields(resources: &[ResourceDescriptor]) -> Vec<String> {
    resources.iter().map(|r| format!("{}Synced cache.InformerSynced", r.lower_kind)).collect()
}

/// Composite-literal entries wiring listers and sync checks from informers.
pub(super) fn struct_field_inits(resources: &[ResourceDescriptor]) -> Vec<String> {
    resources
        .iter()
        .flat_map(|r| {
            let kind = &r.lower_kind;
            [
                format!("{kind}Lister: {kind}Informer.Lister(),"),
                format!("{kind}Synced: {kind}Informer.Informer().HasSynced,"),
            ]
        })
        .collect()
}

/// Quote `value` as a Go interpreted string literal.
pub(super) fn go_string_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(quoted, "\\u{:04x}", u32::from(c));
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
