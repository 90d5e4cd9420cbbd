//! User-tag search, the traversal behind `qx=`, `qxx=` and `qxp=` locators.
//!
//! Applications mark widgets with user data (`button.setUserData("ok", true)`)
//! and tests address them by a `/`-separated list of those keys. Each key is
//! searched depth-first below the object found for the previous key, so a tag
//! only needs to be unique within its enclosing tagged widget.

use crate::graph::{Value, WidgetGraph};
use tracing::{debug, error, info};

/// Depth-first, pre-order search below `node` for the first child whose user
/// data under `key` is truthy.
///
/// Only child collections are searched; a node without one has no matches.
pub fn search_by_user_data<G: WidgetGraph + ?Sized>(
    graph: &G,
    node: &G::Node,
    key: &str,
) -> Option<G::Node> {
    if !graph.has_children(node) {
        return None;
    }

    for child in graph.children(node) {
        let Value::Object(child) = child else {
            continue;
        };
        if graph.user_data(&child, key).is_truthy() {
            info!(key, widget = %graph.display(&child), "qx-widget found for user data");
            return Some(child);
        }
        if let Some(found) = search_by_user_data(graph, &child, key) {
            return Some(found);
        }
    }
    None
}

/// Resolve a whole tag path (`dialog/ok`) starting at `root`.
///
/// Empty segments are ignored, so `/dialog//ok/` equals `dialog/ok`. Returns
/// `None` as soon as one segment finds nothing.
pub fn resolve_tag_path<G: WidgetGraph + ?Sized>(
    graph: &G,
    root: &G::Node,
    tag_path: &str,
) -> Option<G::Node> {
    let mut current = root.clone();
    for segment in tag_path.split('/').filter(|s| !s.is_empty()) {
        debug!(segment, "qx-locator: searching tag");
        match search_by_user_data(graph, &current, segment) {
            Some(found) => current = found,
            None => {
                error!(tag_path, segment, "qx-locator: element not found");
                return None;
            }
        }
    }
    Some(current)
}
