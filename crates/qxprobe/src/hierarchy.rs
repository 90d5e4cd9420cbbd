//! Hierarchy path evaluation (`qxh=` locators).
//!
//! Resolves a [`Path`] against a root node by recursive descent:
//!
//! - name, class, index and attribute steps each pick at most one node, then
//!   the rest of the path is resolved below it;
//! - a wildcard first tries the rest of the path on the current node, then
//!   retries the whole path (wildcard included) on each descendant,
//!   depth-first and left to right.
//!
//! A step that matches nothing yields [`ResolveError::Unresolved`], which an
//! enclosing wildcard swallows to try the next branch. Fatal errors abort the
//! whole lookup. First match wins everywhere; there are no result sets.

use crate::descendants::descendants_of;
use crate::graph::{TypeRegistry, Value, WidgetGraph};
use crate::path::{join_steps, Path, PathStep};
use crate::result::QxError;
use crate::steps;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// The steps that could not be matched, outermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct UnresolvedSuffix {
    steps: Vec<PathStep>,
}

impl UnresolvedSuffix {
    fn single(step: &PathStep) -> Self {
        Self {
            steps: vec![step.clone()],
        }
    }

    fn prepend(mut self, step: &PathStep) -> Self {
        self.steps.insert(0, step.clone());
        self
    }

    /// The unmatched steps
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }
}

impl fmt::Display for UnresolvedSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_steps(&self.steps))
    }
}

/// Failure of a hierarchy lookup.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Well-formed steps that matched nothing. Recoverable.
    #[error("Qxh Locator: could not resolve {0}")]
    Unresolved(UnresolvedSuffix),

    /// Anything that must abort the lookup
    #[error(transparent)]
    Fatal(#[from] QxError),
}

/// Outcome of resolving a path: `Ok(None)` means the path led to a value
/// that is not a node (a scalar member), which counts as no match.
pub type Resolution<N> = Result<Option<N>, ResolveError>;

/// Everything a lookup needs besides the path: the graph, the optional host
/// type registry, and whether to guard wildcard descent against cycles.
///
/// Built once by the caller and threaded through every step.
pub struct ResolveContext<'a, G: WidgetGraph + ?Sized> {
    graph: &'a G,
    registry: Option<&'a dyn TypeRegistry<G::Node>>,
    cycle_guard: bool,
}

impl<G: WidgetGraph + ?Sized> fmt::Debug for ResolveContext<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveContext")
            .field("registry", &self.registry.is_some())
            .field("cycle_guard", &self.cycle_guard)
            .finish_non_exhaustive()
    }
}

impl<'a, G: WidgetGraph + ?Sized> ResolveContext<'a, G> {
    /// Context without type registry; class steps will fail
    #[must_use]
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            registry: None,
            cycle_guard: false,
        }
    }

    /// Set the host type registry used by class and attribute steps
    #[must_use]
    pub fn with_registry(mut self, registry: Option<&'a dyn TypeRegistry<G::Node>>) -> Self {
        self.registry = registry;
        self
    }

    /// Skip descendants already on the current wildcard descent.
    ///
    /// Off by default: only immediate self-references are excluded, and a
    /// longer cycle under a wildcard recurses without bound.
    #[must_use]
    pub const fn with_cycle_guard(mut self, cycle_guard: bool) -> Self {
        self.cycle_guard = cycle_guard;
        self
    }

    /// Resolve `path` starting at `root`.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Unresolved`] if no branch matched, [`ResolveError::Fatal`]
    /// if the lookup had to be aborted.
    pub fn resolve(&self, root: &G::Node, path: &Path) -> Resolution<G::Node> {
        self.resolve_steps(root, path.steps(), &mut Vec::new())
    }

    fn resolve_steps(
        &self,
        root: &G::Node,
        path: &[PathStep],
        descent: &mut Vec<G::Node>,
    ) -> Resolution<G::Node> {
        let Some((step, rest)) = path.split_first() else {
            return Err(QxError::syntax("QPath: empty hierarchy path").into());
        };
        debug!(step = %step, "Qxh Locator: inspecting current step");

        if matches!(step, PathStep::Wildcard) {
            return self.resolve_wildcard(root, path, rest, descent);
        }

        let Some(found) = self.resolve_step(root, step)? else {
            return Err(ResolveError::Unresolved(UnresolvedSuffix::single(step)));
        };

        let Value::Object(next) = found else {
            // Scalars cannot be traversed, nor returned as a widget.
            debug!(step = %step, "Qxh Locator: step led to a non-object value");
            return Ok(None);
        };

        if rest.is_empty() {
            debug!(step = %step, "Qxh Locator: terminating search, found match");
            return Ok(Some(next));
        }

        debug!(
            step = %step,
            rest = %join_steps(rest),
            "Qxh Locator: tail-recursing"
        );
        match self.resolve_steps(&next, rest, &mut Vec::new()) {
            Err(ResolveError::Unresolved(suffix)) => {
                debug!("Qxh Locator: nothing found in this branch; going up");
                Err(ResolveError::Unresolved(suffix.prepend(step)))
            }
            other => other,
        }
    }

    /// `path[0]` is the wildcard, `rest` what follows it.
    fn resolve_wildcard(
        &self,
        root: &G::Node,
        path: &[PathStep],
        rest: &[PathStep],
        descent: &mut Vec<G::Node>,
    ) -> Resolution<G::Node> {
        if rest.is_empty() {
            return Ok(Some(root.clone()));
        }

        // Zero descent: the wildcard matches the current node itself.
        match self.resolve_steps(root, rest, &mut Vec::new()) {
            Ok(Some(found)) => return Ok(Some(found)),
            Ok(None) | Err(ResolveError::Unresolved(_)) => {}
            Err(fatal) => return Err(fatal),
        }

        if self.cycle_guard {
            descent.push(root.clone());
        }
        let outcome = self.search_descendants(root, path, descent);
        if self.cycle_guard {
            descent.pop();
        }

        match outcome {
            Ok(Some(found)) => Ok(Some(found)),
            Ok(None) => Err(ResolveError::Unresolved(UnresolvedSuffix::single(
                &PathStep::Wildcard,
            ))),
            Err(fatal) => Err(fatal),
        }
    }

    fn search_descendants(
        &self,
        root: &G::Node,
        path: &[PathStep],
        descent: &mut Vec<G::Node>,
    ) -> Resolution<G::Node> {
        for child in descendants_of(self.graph, root) {
            if self.cycle_guard && descent.contains(&child) {
                debug!("Qxh Locator: skipping {:?}, already on this descent", child);
                continue;
            }
            debug!(
                path = %join_steps(path),
                "Qxh Locator: recursing with root {:?}", child
            );
            match self.resolve_steps(&child, path, descent) {
                Ok(Some(found)) => return Ok(Some(found)),
                Ok(None) | Err(ResolveError::Unresolved(_)) => {}
                Err(fatal) => return Err(fatal),
            }
        }
        Ok(None)
    }

    /// Resolve one non-wildcard step to at most one value.
    fn resolve_step(
        &self,
        root: &G::Node,
        step: &PathStep,
    ) -> Result<Option<Value<G::Node>>, QxError> {
        let found = match step {
            PathStep::Name(name) if step.is_class_name() => {
                debug!("Qxh Locator: ... identified as class name");
                steps::by_class(self.graph, self.registry, root, name)?
                    .map(Value::Object)
            }
            PathStep::Name(name) => {
                debug!("Qxh Locator: ... identified as general identifier");
                steps::by_member(self.graph, root, name)
            }
            PathStep::Index(index) => {
                debug!("Qxh Locator: ... identified as indexed child");
                steps::by_index(self.graph, root, *index).map(Value::Object)
            }
            PathStep::Attribute(attribute) => {
                debug!("Qxh Locator: ... identified as attribute specifier");
                steps::by_attribute(self.graph, self.registry, root, attribute)
                    .map(Value::Object)
            }
            PathStep::Wildcard => Some(Value::Object(root.clone())),
        };
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{NodeId, WidgetSnapshot};
    use serde_json::json;

    fn snapshot(doc: serde_json::Value) -> WidgetSnapshot {
        WidgetSnapshot::from_json_value(doc).unwrap()
    }

    fn resolve(snap: &WidgetSnapshot, root: &str, path: &str) -> Resolution<NodeId> {
        let ctx = ResolveContext::new(snap).with_registry(Some(snap));
        ctx.resolve(&snap.node(root).unwrap(), &Path::parse(path).unwrap())
    }

    fn unresolved_suffix(result: Resolution<NodeId>) -> String {
        match result {
            Err(ResolveError::Unresolved(suffix)) => suffix.to_string(),
            other => panic!("expected unresolved, got {other:?}"),
        }
    }

    mod plain_tests {
        use super::*;

        #[test]
        fn test_nested_members() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"members": {"a": {"$ref": "a"}}},
                    "a": {"members": {"b": {"$ref": "b"}}},
                    "b": {}
                }
            }));
            assert_eq!(resolve(&snap, "root", "a/b").unwrap(), snap.node("b"));
        }

        #[test]
        fn test_deterministic_without_wildcard() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"children": [{"$ref": "x"}, {"$ref": "y"}]},
                    "x": {}, "y": {"members": {"z": {"$ref": "z"}}}, "z": {}
                }
            }));
            let first = resolve(&snap, "root", "child[1]/z").unwrap();
            let second = resolve(&snap, "root", "child[1]/z").unwrap();
            assert_eq!(first, second);
            assert_eq!(first, snap.node("z"));
        }

        #[test]
        fn test_index_step_picks_second_child() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"children": [{"$ref": "A"}, {"$ref": "B"}, {"$ref": "C"}]},
                    "A": {}, "B": {}, "C": {}
                }
            }));
            assert_eq!(resolve(&snap, "root", "child[1]").unwrap(), snap.node("B"));
        }

        #[test]
        fn test_index_past_end_is_unresolved() {
            let snap = snapshot(json!({
                "nodes": {"root": {"children": [{"$ref": "A"}]}, "A": {}}
            }));
            assert_eq!(
                unresolved_suffix(resolve(&snap, "root", "child[5]")),
                "child[5]"
            );
        }

        #[test]
        fn test_attribute_match_on_plain_member() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"children": [{"$ref": "a"}, {"$ref": "b"}]},
                    "a": {"members": {"label": "bar"}},
                    "b": {"members": {"label": "foo"}}
                }
            }));
            let snap_ref = &snap;
            let ctx = ResolveContext::new(snap_ref);
            let found = ctx
                .resolve(
                    &snap.node("root").unwrap(),
                    &Path::parse("[@label=foo]").unwrap(),
                )
                .unwrap();
            assert_eq!(found, snap.node("b"));
        }

        #[test]
        fn test_unparsable_attribute_is_unresolved() {
            let snap = snapshot(json!({
                "nodes": {"root": {"children": [{"$ref": "a"}]}, "a": {}}
            }));
            assert_eq!(unresolved_suffix(resolve(&snap, "root", "[@]")), "[@]");
        }

        #[test]
        fn test_suffix_trail_prepends_matched_steps() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"members": {"a": {"$ref": "a"}}},
                    "a": {"members": {"b": {"$ref": "b"}}},
                    "b": {}
                }
            }));
            assert_eq!(unresolved_suffix(resolve(&snap, "root", "a/b/c")), "a/b/c");
        }

        #[test]
        fn test_scalar_member_is_no_match() {
            let snap = snapshot(json!({
                "nodes": {"root": {"members": {"title": "Login"}}}
            }));
            assert_eq!(resolve(&snap, "root", "title").unwrap(), None);
            assert_eq!(resolve(&snap, "root", "title/x").unwrap(), None);
        }
    }

    mod wildcard_tests {
        use super::*;

        #[test]
        fn test_wildcard_descends_to_member() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"members": {"mid": {"$ref": "mid"}}},
                    "mid": {"members": {"inner": {"$ref": "inner"}}},
                    "inner": {"members": {"x": {"$ref": "target"}}},
                    "target": {}
                }
            }));
            assert_eq!(resolve(&snap, "root", "*/x").unwrap(), snap.node("target"));
        }

        #[test]
        fn test_trailing_wildcard_matches_current_node() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"members": {"a": {"$ref": "a"}}},
                    "a": {"children": [{"$ref": "b"}]},
                    "b": {}
                }
            }));
            assert_eq!(resolve(&snap, "root", "a/*").unwrap(), snap.node("a"));
            assert_eq!(resolve(&snap, "root", "*").unwrap(), snap.node("root"));
        }

        #[test]
        fn test_zero_descent_preferred_over_descendants() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"members": {"x": {"$ref": "near"}, "deep": {"$ref": "deep"}}},
                    "deep": {"members": {"x": {"$ref": "far"}}},
                    "near": {}, "far": {}
                }
            }));
            assert_eq!(resolve(&snap, "root", "*/x").unwrap(), snap.node("near"));
        }

        #[test]
        fn test_depth_first_left_to_right() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"children": [{"$ref": "left"}, {"$ref": "right"}]},
                    "left": {"children": [{"$ref": "leftInner"}]},
                    "leftInner": {"members": {"x": {"$ref": "deepLeft"}}},
                    "right": {"members": {"x": {"$ref": "shallowRight"}}},
                    "deepLeft": {}, "shallowRight": {}
                }
            }));
            assert_eq!(
                resolve(&snap, "root", "*/x").unwrap(),
                snap.node("deepLeft")
            );
        }

        #[test]
        fn test_backtracks_out_of_dead_end() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"children": [{"$ref": "a"}, {"$ref": "b"}]},
                    "a": {"members": {"x": {"$ref": "ax"}}},
                    "ax": {},
                    "b": {"members": {"x": {"$ref": "bx"}}},
                    "bx": {"members": {"y": {"$ref": "target"}}},
                    "target": {}
                }
            }));
            assert_eq!(
                resolve(&snap, "root", "*/x/y").unwrap(),
                snap.node("target")
            );
        }

        #[test]
        fn test_wildcard_miss_reports_only_wildcard() {
            let snap = snapshot(json!({
                "nodes": {"root": {"children": [{"$ref": "a"}]}, "a": {}}
            }));
            assert_eq!(unresolved_suffix(resolve(&snap, "root", "*/nope")), "*");
        }

        #[test]
        fn test_self_loop_terminates() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"members": {"me": {"$ref": "root"}}}
                }
            }));
            assert_eq!(unresolved_suffix(resolve(&snap, "root", "*/nope")), "*");
        }

        #[test]
        fn test_cycle_guard_stops_longer_cycles() {
            let snap = snapshot(json!({
                "nodes": {
                    "root": {"members": {"a": {"$ref": "a"}}},
                    "a": {"members": {"b": {"$ref": "b"}}},
                    "b": {"members": {"back": {"$ref": "root"}}}
                }
            }));
            let ctx = ResolveContext::new(&snap).with_cycle_guard(true);
            let result = ctx.resolve(&snap.node("root").unwrap(), &Path::parse("*/nope").unwrap());
            assert!(matches!(result, Err(ResolveError::Unresolved(_))));
        }

        #[test]
        fn test_class_step_under_wildcard() {
            let snap = snapshot(json!({
                "classes": {"qx.ui.form.Button": {}},
                "nodes": {
                    "root": {"children": [{"$ref": "box"}]},
                    "box": {"children": [{"$ref": "label"}, {"$ref": "ok"}]},
                    "label": {},
                    "ok": {"class": "qx.ui.form.Button"}
                }
            }));
            assert_eq!(
                resolve(&snap, "root", "*/qx.ui.form.Button").unwrap(),
                snap.node("ok")
            );
        }
    }

    mod fatal_tests {
        use super::*;

        #[test]
        fn test_missing_registry_aborts_wildcard_search() {
            let snap = snapshot(json!({
                "nodes": {"root": {"children": [{"$ref": "a"}]}, "a": {}}
            }));
            let ctx = ResolveContext::new(&snap);
            let result = ctx.resolve(
                &snap.node("root").unwrap(),
                &Path::parse("*/qx.ui.form.Button").unwrap(),
            );
            assert!(matches!(
                result,
                Err(ResolveError::Fatal(QxError::TypeRegistryUnavailable { .. }))
            ));
        }

        #[test]
        fn test_malformed_path_rejected_before_search() {
            assert!(matches!(Path::parse("1bad/x"), Err(QxError::Syntax { .. })));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn children(count: usize) -> WidgetSnapshot {
            let mut nodes = serde_json::Map::new();
            let refs: Vec<_> = (0..count).map(|i| json!({"$ref": format!("c{i}")})).collect();
            nodes.insert("root".to_string(), json!({"children": refs}));
            for i in 0..count {
                nodes.insert(format!("c{i}"), json!({}));
            }
            snapshot(json!({"nodes": nodes}))
        }

        proptest! {
            #[test]
            fn index_step_in_range_or_unresolved(count in 0usize..8, index in 0usize..12) {
                let snap = children(count);
                let step = format!("child[{index}]");
                match resolve(&snap, "root", &step) {
                    Ok(found) => {
                        prop_assert!(index < count);
                        prop_assert_eq!(found, snap.node(&format!("c{index}")));
                    }
                    Err(ResolveError::Unresolved(suffix)) => {
                        prop_assert!(index >= count);
                        prop_assert_eq!(suffix.to_string(), step);
                    }
                    Err(other) => prop_assert!(false, "unexpected {:?}", other),
                }
            }
        }
    }
}
