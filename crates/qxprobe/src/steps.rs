//! Single-step resolvers: each maps one non-wildcard step to at most one value.

use crate::descendants::descendants_of;
use crate::graph::{TypeRegistry, Value, WidgetGraph};
use crate::path::AttributeStep;
use crate::result::{QxError, QxResult};
use tracing::debug;

/// `button1`: the value of the node's own member with that name.
///
/// Null and undefined members count as absent.
pub fn by_member<G: WidgetGraph + ?Sized>(
    graph: &G,
    node: &G::Node,
    name: &str,
) -> Option<Value<G::Node>> {
    debug!(name, "Qxh Locator: member step");
    graph
        .member(node, name)
        .filter(|value| !matches!(value, Value::Undefined | Value::Null))
}

/// `qx.ui.form.Button`: first immediate descendant that is an instance of the
/// class (or a subclass).
///
/// A class name the registry does not know matches nothing.
///
/// # Errors
///
/// Returns [`QxError::TypeRegistryUnavailable`] when there is no registry.
pub fn by_class<G: WidgetGraph + ?Sized>(
    graph: &G,
    registry: Option<&dyn TypeRegistry<G::Node>>,
    node: &G::Node,
    class_name: &str,
) -> QxResult<Option<G::Node>> {
    debug!(class_name, "Qxh Locator: class step");
    let registry = registry.ok_or_else(|| QxError::TypeRegistryUnavailable {
        step: class_name.to_string(),
    })?;

    let Some(class) = registry.class_by_name(class_name) else {
        debug!(class_name, "Qxh Locator: class not registered");
        return Ok(None);
    };

    Ok(descendants_of(graph, node)
        .into_iter()
        .find(|child| registry.is_instance_of(child, &class)))
}

/// `child[n]`: the n-th immediate descendant, 0-based. Out of range is no match.
pub fn by_index<G: WidgetGraph + ?Sized>(
    graph: &G,
    node: &G::Node,
    index: usize,
) -> Option<G::Node> {
    debug!(index, "Qxh Locator: indexed child step");
    descendants_of(graph, node).into_iter().nth(index)
}

/// `[@key]` and `[@key=pattern]`.
///
/// Without a value the step dereferences: the attribute on `node` itself must
/// hold an object, which becomes the match. With a value, the first immediate
/// descendant whose attribute matches the pattern wins.
pub fn by_attribute<G: WidgetGraph + ?Sized>(
    graph: &G,
    registry: Option<&dyn TypeRegistry<G::Node>>,
    node: &G::Node,
    step: &AttributeStep,
) -> Option<G::Node> {
    let Some(predicate) = step.predicate() else {
        debug!(step = step.raw(), "Qxh Locator: unparsable attribute step");
        return None;
    };
    let key = predicate.key();

    let Some(pattern) = predicate.pattern() else {
        return general_property(graph, registry, node, key).and_then(Value::into_object);
    };

    descendants_of(graph, node).into_iter().find(|child| {
        if let Some(registry) = registry.filter(|r| r.has_property(child, key)) {
            let current = registry.property(child, key);
            debug!(key, value = ?current, "Qxh Locator: checking declared property");
            current.is_truthy() && pattern.is_match(&graph.stringify(&current))
        } else if let Some(member) = graph.member(child, key) {
            debug!(key, "Qxh Locator: checking plain member");
            pattern.is_match(&graph.stringify(&member))
        } else {
            debug!(key, "Qxh Locator: no match for current child");
            false
        }
    })
}

/// Declared property if the class has one, else plain member.
pub fn general_property<G: WidgetGraph + ?Sized>(
    graph: &G,
    registry: Option<&dyn TypeRegistry<G::Node>>,
    node: &G::Node,
    key: &str,
) -> Option<Value<G::Node>> {
    if let Some(registry) = registry.filter(|r| r.has_property(node, key)) {
        return Some(registry.property(node, key));
    }
    graph.member(node, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathStep;
    use crate::snapshot::{NodeId, WidgetSnapshot};
    use serde_json::json;

    fn registry(snap: &WidgetSnapshot) -> Option<&dyn TypeRegistry<NodeId>> {
        Some(snap)
    }

    fn attribute(segment: &str) -> AttributeStep {
        match PathStep::parse(segment).unwrap() {
            PathStep::Attribute(step) => step,
            other => panic!("not an attribute step: {other:?}"),
        }
    }

    fn form() -> WidgetSnapshot {
        WidgetSnapshot::from_json_value(json!({
            "classes": {
                "qx.ui.core.Widget": {"properties": ["enabled"]},
                "qx.ui.form.Button": {"extends": "qx.ui.core.Widget", "properties": ["label"]},
                "qx.ui.form.TextField": {"extends": "qx.ui.core.Widget", "properties": ["value"]}
            },
            "nodes": {
                "form": {
                    "class": "qx.ui.core.Widget",
                    "children": [{"$ref": "name"}, {"$ref": "ok"}, {"$ref": "cancel"}],
                    "members": {"title": "Login", "nothing": null, "menu": {"$ref": "menu"}}
                },
                "name": {"class": "qx.ui.form.TextField", "properties": {"value": ""}},
                "ok": {"class": "qx.ui.form.Button", "properties": {"label": "Ok"}},
                "cancel": {
                    "class": "qx.ui.form.Button",
                    "properties": {"label": "Cancel"},
                    "members": {"tooltip": "Abort the login"}
                },
                "menu": {}
            }
        }))
        .unwrap()
    }

    mod member_tests {
        use super::*;

        #[test]
        fn test_member_found() {
            let snap = form();
            let root = snap.node("form").unwrap();
            assert_eq!(
                by_member(&snap, &root, "menu"),
                Some(Value::Object(snap.node("menu").unwrap()))
            );
            assert_eq!(by_member(&snap, &root, "title"), Some(Value::from("Login")));
        }

        #[test]
        fn test_null_member_is_absent() {
            let snap = form();
            let root = snap.node("form").unwrap();
            assert_eq!(by_member(&snap, &root, "nothing"), None);
            assert_eq!(by_member(&snap, &root, "missing"), None);
        }
    }

    mod class_tests {
        use super::*;

        #[test]
        fn test_first_instance_wins() {
            let snap = form();
            let root = snap.node("form").unwrap();
            let found = by_class(&snap, registry(&snap), &root, "qx.ui.form.Button").unwrap();
            assert_eq!(found, snap.node("ok"));
        }

        #[test]
        fn test_subclass_matches_base_class() {
            let snap = form();
            let root = snap.node("form").unwrap();
            let found = by_class(&snap, registry(&snap), &root, "qx.ui.core.Widget").unwrap();
            assert_eq!(found, snap.node("name"));
        }

        #[test]
        fn test_unknown_class_matches_nothing() {
            let snap = form();
            let root = snap.node("form").unwrap();
            assert_eq!(
                by_class(&snap, registry(&snap), &root, "qx.ui.tree.Tree").unwrap(),
                None
            );
        }

        #[test]
        fn test_missing_registry_is_fatal() {
            let snap = form();
            let root = snap.node("form").unwrap();
            let err = by_class(&snap, None, &root, "qx.ui.form.Button").unwrap_err();
            assert!(matches!(err, QxError::TypeRegistryUnavailable { .. }));
        }
    }

    mod index_tests {
        use super::*;

        #[test]
        fn test_index_in_range() {
            let snap = form();
            let root = snap.node("form").unwrap();
            assert_eq!(by_index(&snap, &root, 1), snap.node("ok"));
        }

        #[test]
        fn test_index_out_of_range() {
            let snap = form();
            let root = snap.node("form").unwrap();
            assert_eq!(by_index(&snap, &root, 3), None);
            assert_eq!(by_index(&snap, &root, usize::MAX), None);
        }
    }

    mod attribute_tests {
        use super::*;

        #[test]
        fn test_declared_property_pattern() {
            let snap = form();
            let root = snap.node("form").unwrap();
            let found = by_attribute(&snap, registry(&snap), &root, &attribute("[@label=Canc]"));
            assert_eq!(found, snap.node("cancel"));
        }

        #[test]
        fn test_empty_property_never_matches() {
            let snap = form();
            let root = snap.node("form").unwrap();
            let found = by_attribute(&snap, registry(&snap), &root, &attribute("[@value=.*]"));
            assert_eq!(found, None);
        }

        #[test]
        fn test_plain_member_pattern() {
            let snap = form();
            let root = snap.node("form").unwrap();
            let step = attribute("[@tooltip=Abort]");
            let found = by_attribute(&snap, registry(&snap), &root, &step);
            assert_eq!(found, snap.node("cancel"));
        }

        #[test]
        fn test_without_registry_properties_are_invisible() {
            let snap = form();
            let root = snap.node("form").unwrap();
            assert_eq!(
                by_attribute(&snap, None, &root, &attribute("[@label=Ok]")),
                None
            );
        }

        #[test]
        fn test_dereference_returns_object() {
            let snap = form();
            let root = snap.node("form").unwrap();
            let found = by_attribute(&snap, registry(&snap), &root, &attribute("[@menu]"));
            assert_eq!(found, snap.node("menu"));
        }

        #[test]
        fn test_dereference_of_scalar_is_no_match() {
            let snap = form();
            let root = snap.node("form").unwrap();
            assert_eq!(
                by_attribute(&snap, registry(&snap), &root, &attribute("[@title]")),
                None
            );
        }

        #[test]
        fn test_unparsable_predicate_is_no_match() {
            let snap = form();
            let root = snap.node("form").unwrap();
            let step = attribute("[@]");
            assert_eq!(by_attribute(&snap, registry(&snap), &root, &step), None);
        }
    }
}
