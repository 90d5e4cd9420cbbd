//! Immediate-descendant enumeration over the widget graph.

use crate::graph::{Value, WidgetGraph};
use tracing::debug;

/// How a node exposes its immediate descendants.
///
/// Chosen once per node by [`detect_shape`]; strategies are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// Node has an item collection (tree folders, lists)
    ItemCollection,
    /// Node has a child collection (containers)
    ChildCollection,
    /// Anything else: descendants are the values of its own members
    PlainObject,
}

/// Pick the descendant strategy for `node`: items, then children, then members.
pub fn detect_shape<G: WidgetGraph + ?Sized>(graph: &G, node: &G::Node) -> NodeShape {
    if graph.has_items(node) {
        NodeShape::ItemCollection
    } else if graph.has_children(node) {
        NodeShape::ChildCollection
    } else {
        NodeShape::PlainObject
    }
}

/// Immediate descendants of `node`, in enumeration order.
///
/// Non-object values and `node` itself are dropped. Longer cycles are not
/// detected here.
///
/// Recomputed on every call; the graph may change between calls.
pub fn descendants_of<G: WidgetGraph + ?Sized>(graph: &G, node: &G::Node) -> Vec<G::Node> {
    let shape = detect_shape(graph, node);
    let raw: Vec<Value<G::Node>> = match shape {
        NodeShape::ItemCollection => {
            debug!("descendants: using item collection");
            graph.items(node)
        }
        NodeShape::ChildCollection => {
            debug!("descendants: using child collection");
            graph.children(node)
        }
        NodeShape::PlainObject => {
            debug!("descendants: using plain members");
            graph
                .members(node)
                .into_iter()
                .map(|(_, value)| value)
                .collect()
        }
    };

    let descendants: Vec<G::Node> = raw
        .into_iter()
        .filter_map(Value::into_object)
        .filter(|candidate| candidate != node)
        .collect();

    debug!(
        count = descendants.len(),
        "descendants: immediate children of {:?}", node
    );
    descendants
}
