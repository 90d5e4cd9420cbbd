//! Read-only view of the live widget graph.
//!
//! The widget graph is owned and mutated by the application under test.
//! Qxprobe never builds or destroys nodes; it only reads them through the
//! [`WidgetGraph`] and [`TypeRegistry`] traits, which a host (a browser
//! bridge, or the in-memory [`WidgetSnapshot`](crate::WidgetSnapshot))
//! implements.
//!
//! A node is polymorphic over the capabilities it happens to expose: an item
//! collection, a child collection, plain members, declared properties, user
//! data. There is no common base type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value read from the widget graph.
///
/// Mirrors the shapes a member or property of a live widget can take.
/// Only [`Value::Object`] is traversable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<N> {
    /// Missing member
    Undefined,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// String
    Str(String),
    /// Reference to another node of the graph
    Object(N),
}

impl<N> Value<N> {
    /// Consume the value, keeping only a node handle
    #[must_use]
    pub fn into_object(self) -> Option<N> {
        match self {
            Self::Object(node) => Some(node),
            _ => None,
        }
    }

    /// Truthiness as the widget runtime sees it
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Str(s) => !s.is_empty(),
            Self::Object(_) => true,
        }
    }

    /// String conversion of a scalar; `None` for objects, which need the
    /// graph to render them (see [`WidgetGraph::stringify`]).
    #[must_use]
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            Self::Undefined => Some("undefined".to_string()),
            Self::Null => Some("null".to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(format_number(*n)),
            Self::Str(s) => Some(s.clone()),
            Self::Object(_) => None,
        }
    }
}

impl<N> From<&str> for Value<N> {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl<N> From<bool> for Value<N> {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<N> From<f64> for Value<N> {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Render a number the way the widget runtime prints it (`3`, not `3.0`).
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == n.trunc() && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Enabled state of a widget. `Inherit` defers to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnabledState {
    /// Widget is enabled
    Enabled,
    /// Widget is disabled
    Disabled,
    /// Widget takes its state from its parent
    Inherit,
}

/// Opaque reference to a class registered in the host type registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef(String);

impl ClassRef {
    /// Create a class reference from its registered name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The registered (dotted) class name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability view of the widget graph.
///
/// Every method is a query: a node that lacks a capability answers with the
/// default (`false`, empty, `None`).
pub trait WidgetGraph {
    /// Handle to a node. Equality is reference identity.
    type Node: Clone + PartialEq + fmt::Debug;

    /// Whether the node exposes an item collection (tree folders, lists)
    fn has_items(&self, _node: &Self::Node) -> bool {
        false
    }

    /// The node's item collection
    fn items(&self, _node: &Self::Node) -> Vec<Value<Self::Node>> {
        Vec::new()
    }

    /// Whether the node exposes a child collection (widgets built with `add`)
    fn has_children(&self, _node: &Self::Node) -> bool {
        false
    }

    /// The node's child collection
    fn children(&self, _node: &Self::Node) -> Vec<Value<Self::Node>> {
        Vec::new()
    }

    /// Own enumerable members, in enumeration order
    fn members(&self, node: &Self::Node) -> Vec<(String, Value<Self::Node>)>;

    /// Plain member lookup; `None` when the node has no member `key`
    fn member(&self, node: &Self::Node, key: &str) -> Option<Value<Self::Node>> {
        self.members(node)
            .into_iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// User data stored on the node under `key`
    fn user_data(&self, _node: &Self::Node, _key: &str) -> Value<Self::Node> {
        Value::Undefined
    }

    /// Enabled state, if the node is a widget
    fn enabled_state(&self, _node: &Self::Node) -> Option<EnabledState> {
        None
    }

    /// Parent widget, if any
    fn parent(&self, _node: &Self::Node) -> Option<Self::Node> {
        None
    }

    /// String form of a node, as used when a member is matched as text
    fn display(&self, _node: &Self::Node) -> String {
        "[object Object]".to_string()
    }

    /// String form of any value
    fn stringify(&self, value: &Value<Self::Node>) -> String {
        match value {
            Value::Object(node) => self.display(node),
            other => other.scalar_string().unwrap_or_default(),
        }
    }
}

/// The host runtime's class registry and property system.
pub trait TypeRegistry<N> {
    /// Look up a registered class by its dotted name
    fn class_by_name(&self, name: &str) -> Option<ClassRef>;

    /// Whether `node` is an instance of `class` or of one of its subclasses
    fn is_instance_of(&self, node: &N, class: &ClassRef) -> bool;

    /// Whether the node's class declares property `key`
    fn has_property(&self, node: &N, key: &str) -> bool;

    /// Current value of declared property `key`
    fn property(&self, node: &N, key: &str) -> Value<N>;
}
