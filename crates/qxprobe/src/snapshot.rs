//! In-memory widget graph loaded from a JSON or YAML snapshot.
//!
//! A snapshot captures a widget tree together with the class registry, so
//! locators can be evaluated offline (the `qxprobe` CLI) and in tests.
//!
//! ```yaml
//! application: app
//! clientDocument: doc
//! classes:
//!   qx.ui.core.Widget: { properties: [enabled] }
//!   qx.ui.form.Button: { extends: qx.ui.core.Widget, properties: [label] }
//! nodes:
//!   app:  { members: { main: { $ref: doc } } }
//!   doc:  { class: qx.ui.core.Widget, children: [ { $ref: ok } ] }
//!   ok:
//!     class: qx.ui.form.Button
//!     element: okButton
//!     properties: { label: Ok }
//!     userData: { okButton: true }
//! ```
//!
//! Object references are written `{ "$ref": "<node id>" }`. Member order is
//! kept as written, since lookups are first-match.

use crate::graph::{ClassRef, EnabledState, TypeRegistry, Value, WidgetGraph};
use crate::host::HostWindow;
use crate::result::{QxError, QxResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

/// Handle to a node of a [`WidgetSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A class in the snapshot's registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDef {
    /// Superclass name
    #[serde(default)]
    pub extends: Option<String>,
    /// Declared properties
    #[serde(default)]
    pub properties: Vec<String>,
}

/// A node as written in the snapshot document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDef {
    /// Class name
    #[serde(default)]
    pub class: Option<String>,
    /// Item collection
    #[serde(default)]
    pub items: Option<Vec<serde_json::Value>>,
    /// Child collection
    #[serde(default)]
    pub children: Option<Vec<serde_json::Value>>,
    /// Plain members, in enumeration order
    #[serde(default)]
    pub members: serde_json::Map<String, serde_json::Value>,
    /// Declared property values
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    /// User data
    #[serde(default)]
    pub user_data: serde_json::Map<String, serde_json::Value>,
    /// DOM element id
    #[serde(default)]
    pub element: Option<String>,
    /// Enabled state
    #[serde(default)]
    pub enabled: Option<EnabledState>,
    /// Parent id; inferred from child collections when omitted
    #[serde(default)]
    pub parent: Option<String>,
    /// Whether the widget has an execute action
    #[serde(default)]
    pub executable: bool,
}

/// The snapshot document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDocument {
    /// Window location
    #[serde(default)]
    pub location: Option<String>,
    /// Whether the toolkit is loaded (defaults to true)
    #[serde(default)]
    pub toolkit: Option<bool>,
    /// Application object id
    #[serde(default)]
    pub application: Option<String>,
    /// Client document id
    #[serde(default)]
    pub client_document: Option<String>,
    /// Class registry; absent means the host exposes none
    #[serde(default)]
    pub classes: Option<BTreeMap<String, ClassDef>>,
    /// Nodes by id
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeDef>,
}

#[derive(Debug, Clone, Default)]
struct SnapshotNode {
    class: Option<String>,
    items: Option<Vec<Value<NodeId>>>,
    children: Option<Vec<Value<NodeId>>>,
    members: Vec<(String, Value<NodeId>)>,
    properties: HashMap<String, Value<NodeId>>,
    user_data: HashMap<String, Value<NodeId>>,
    element: Option<String>,
    enabled: Option<EnabledState>,
    parent: Option<NodeId>,
    executable: bool,
}

/// A loaded, validated widget snapshot.
#[derive(Debug, Clone)]
pub struct WidgetSnapshot {
    location: String,
    toolkit: bool,
    application: Option<NodeId>,
    client_document: Option<NodeId>,
    classes: Option<BTreeMap<String, ClassDef>>,
    ids: Vec<String>,
    index: HashMap<String, NodeId>,
    nodes: Vec<SnapshotNode>,
}

/// Element id reported for `dom=document`
pub const DOCUMENT_ELEMENT: &str = "document";

impl WidgetSnapshot {
    /// Build from a parsed document, resolving all references.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Snapshot`] for references to unknown nodes or
    /// values that cannot be represented (arrays, inline objects).
    pub fn from_document(doc: SnapshotDocument) -> QxResult<Self> {
        let ids: Vec<String> = doc.nodes.keys().cloned().collect();
        let index: HashMap<String, NodeId> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), NodeId(i)))
            .collect();
        let lookup = |id: &str, context: &str| {
            index.get(id).copied().ok_or_else(|| {
                QxError::snapshot(format!("{context}: unknown node id '{id}'"))
            })
        };

        let mut nodes = Vec::with_capacity(ids.len());
        for (id, def) in &doc.nodes {
            nodes.push(SnapshotNode {
                class: def.class.clone(),
                items: convert_list(def.items.as_ref(), &index, id)?,
                children: convert_list(def.children.as_ref(), &index, id)?,
                members: def
                    .members
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), convert_value(v, &index, id)?)))
                    .collect::<QxResult<_>>()?,
                properties: convert_map(&def.properties, &index, id)?,
                user_data: convert_map(&def.user_data, &index, id)?,
                element: def.element.clone(),
                enabled: def.enabled,
                parent: def
                    .parent
                    .as_deref()
                    .map(|p| lookup(p, id.as_str()))
                    .transpose()?,
                executable: def.executable,
            });
        }

        infer_parents(&mut nodes);

        Ok(Self {
            location: doc
                .location
                .unwrap_or_else(|| "about:snapshot".to_string()),
            toolkit: doc.toolkit.unwrap_or(true),
            application: doc
                .application
                .as_deref()
                .map(|id| lookup(id, "application"))
                .transpose()?,
            client_document: doc
                .client_document
                .as_deref()
                .map(|id| lookup(id, "clientDocument"))
                .transpose()?,
            classes: doc.classes,
            ids,
            index,
            nodes,
        })
    }

    /// Build from a JSON value
    pub fn from_json_value(value: serde_json::Value) -> QxResult<Self> {
        Self::from_document(serde_json::from_value(value)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(input: &str) -> QxResult<Self> {
        Self::from_document(serde_json::from_str(input)?)
    }

    /// Parse a YAML document
    pub fn from_yaml_str(input: &str) -> QxResult<Self> {
        Self::from_document(serde_yaml_ng::from_str(input)?)
    }

    /// Load a snapshot file; `.yaml`/`.yml` are read as YAML, anything else
    /// as JSON.
    pub fn load(path: impl AsRef<Path>) -> QxResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    /// Handle for the node with the given id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Id of a node handle
    #[must_use]
    pub fn id_of(&self, node: NodeId) -> &str {
        self.ids.get(node.0).map_or("", String::as_str)
    }

    /// Number of nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot has no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node rendered by the given element id
    #[must_use]
    pub fn node_for_element(&self, element: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.element.as_deref() == Some(element))
            .map(NodeId)
    }

    /// Whether the widget has an execute action
    #[must_use]
    pub fn is_executable(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|n| n.executable)
    }

    fn get(&self, node: NodeId) -> Option<&SnapshotNode> {
        self.nodes.get(node.0)
    }

    /// Class chain of a class name, most derived first
    fn class_chain<'s>(&'s self, class: &'s str) -> Vec<(&'s str, &'s ClassDef)> {
        let mut chain = Vec::new();
        let Some(classes) = &self.classes else {
            return chain;
        };
        let mut current = Some(class);
        while let Some(name) = current {
            if chain.iter().any(|(seen, _)| *seen == name) {
                break;
            }
            let Some(def) = classes.get(name) else {
                break;
            };
            chain.push((name, def));
            current = def.extends.as_deref();
        }
        chain
    }
}

fn convert_value(
    value: &serde_json::Value,
    index: &HashMap<String, NodeId>,
    owner: &str,
) -> QxResult<Value<NodeId>> {
    use serde_json::Value as Json;
    Ok(match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => Value::Str(s.clone()),
        Json::Object(map) => {
            let target = match (map.len(), map.get("$ref")) {
                (1, Some(Json::String(target))) => target,
                _ => {
                    return Err(QxError::snapshot(format!(
                        "{owner}: objects must be written as {{\"$ref\": \"<id>\"}}"
                    )))
                }
            };
            let id = index.get(target).copied().ok_or_else(|| {
                QxError::snapshot(format!("{owner}: unknown node id '{target}'"))
            })?;
            Value::Object(id)
        }
        Json::Array(_) => {
            return Err(QxError::snapshot(format!(
                "{owner}: arrays are only allowed for items and children"
            )))
        }
    })
}

fn convert_list(
    values: Option<&Vec<serde_json::Value>>,
    index: &HashMap<String, NodeId>,
    owner: &str,
) -> QxResult<Option<Vec<Value<NodeId>>>> {
    values
        .map(|list| {
            list.iter()
                .map(|v| convert_value(v, index, owner))
                .collect()
        })
        .transpose()
}

fn convert_map(
    values: &serde_json::Map<String, serde_json::Value>,
    index: &HashMap<String, NodeId>,
    owner: &str,
) -> QxResult<HashMap<String, Value<NodeId>>> {
    values
        .iter()
        .map(|(k, v)| Ok((k.clone(), convert_value(v, index, owner)?)))
        .collect()
}

/// Give every listed child without an explicit parent its first container.
fn infer_parents(nodes: &mut [SnapshotNode]) {
    let mut inferred: Vec<(usize, NodeId)> = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        for child in node.children.iter().flatten() {
            if let Value::Object(child) = child {
                inferred.push((child.0, NodeId(i)));
            }
        }
    }
    for (child, parent) in inferred {
        if let Some(node) = nodes.get_mut(child) {
            if node.parent.is_none() && child != parent.0 {
                node.parent = Some(parent);
            }
        }
    }
}

impl fmt::Display for WidgetSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snapshot {} ({} nodes)", self.location, self.nodes.len())
    }
}

impl WidgetGraph for WidgetSnapshot {
    type Node = NodeId;

    fn has_items(&self, node: &NodeId) -> bool {
        self.get(*node).is_some_and(|n| n.items.is_some())
    }

    fn items(&self, node: &NodeId) -> Vec<Value<NodeId>> {
        self.get(*node)
            .and_then(|n| n.items.clone())
            .unwrap_or_default()
    }

    fn has_children(&self, node: &NodeId) -> bool {
        self.get(*node).is_some_and(|n| n.children.is_some())
    }

    fn children(&self, node: &NodeId) -> Vec<Value<NodeId>> {
        self.get(*node)
            .and_then(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn members(&self, node: &NodeId) -> Vec<(String, Value<NodeId>)> {
        self.get(*node)
            .map(|n| n.members.clone())
            .unwrap_or_default()
    }

    fn user_data(&self, node: &NodeId, key: &str) -> Value<NodeId> {
        self.get(*node)
            .and_then(|n| n.user_data.get(key).cloned())
            .unwrap_or(Value::Undefined)
    }

    fn enabled_state(&self, node: &NodeId) -> Option<EnabledState> {
        self.get(*node).and_then(|n| n.enabled)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.get(*node).and_then(|n| n.parent)
    }

    fn display(&self, node: &NodeId) -> String {
        match self.get(*node).and_then(|n| n.class.as_deref()) {
            Some(class) => format!("{class}[{}]", self.id_of(*node)),
            None => "[object Object]".to_string(),
        }
    }
}

impl TypeRegistry<NodeId> for WidgetSnapshot {
    fn class_by_name(&self, name: &str) -> Option<ClassRef> {
        self.classes
            .as_ref()
            .filter(|classes| classes.contains_key(name))
            .map(|_| ClassRef::new(name))
    }

    fn is_instance_of(&self, node: &NodeId, class: &ClassRef) -> bool {
        self.get(*node)
            .and_then(|n| n.class.as_deref())
            .is_some_and(|own| {
                self.class_chain(own)
                    .iter()
                    .any(|(name, _)| *name == class.name())
            })
    }

    fn has_property(&self, node: &NodeId, key: &str) -> bool {
        self.get(*node)
            .and_then(|n| n.class.as_deref())
            .is_some_and(|own| {
                self.class_chain(own)
                    .iter()
                    .any(|(_, def)| def.properties.iter().any(|p| p == key))
            })
    }

    fn property(&self, node: &NodeId, key: &str) -> Value<NodeId> {
        self.get(*node)
            .and_then(|n| n.properties.get(key).cloned())
            .unwrap_or(Value::Null)
    }
}

impl HostWindow for WidgetSnapshot {
    type Element = String;

    fn location(&self) -> String {
        self.location.clone()
    }

    fn toolkit_present(&self) -> bool {
        self.toolkit
    }

    fn application(&self) -> Option<NodeId> {
        self.application
    }

    fn client_document(&self) -> Option<NodeId> {
        self.client_document
    }

    fn type_registry(&self) -> Option<&dyn TypeRegistry<NodeId>> {
        self.classes
            .as_ref()
            .map(|_| self as &dyn TypeRegistry<NodeId>)
    }

    fn element_of(&self, node: &NodeId) -> Option<String> {
        self.get(*node).and_then(|n| n.element.clone())
    }

    fn locate_xpath(&self, xpath: &str, _context: &String) -> QxResult<Option<String>> {
        Err(QxError::not_implemented(format!("XPath evaluation needs a live document: {xpath}")))
    }

    fn locate_native(&self, locator: &str) -> QxResult<Option<String>> {
        if locator == "dom=document" {
            return Ok(Some(DOCUMENT_ELEMENT.to_string()));
        }
        if let Some(id) = locator.strip_prefix("id=") {
            return Ok(self.node_for_element(id).map(|_| id.to_string()));
        }
        Err(QxError::not_implemented(format!(
            "locator strategy not available on a snapshot: {locator}"
        )))
    }
}
