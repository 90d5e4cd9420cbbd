//! Qxprobe: widget-aware locators and mouse commands for qooxdoo applications
//!
//! Browser test frameworks locate elements through the DOM. Applications built
//! with a widget toolkit generate that DOM, so tests written against it break
//! whenever the toolkit changes its markup. Qxprobe locates widgets through
//! the widget tree instead and fires the low-level mouse events the widgets
//! actually listen to.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    QXPROBE Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Locator    │    │ Hierarchy  │    │ Host       │            │
//! │   │ Dispatcher │───►│ Evaluator  │───►│ Window     │            │
//! │   │ qx/qxx/qxh │    │ + steps    │    │ (graph)    │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         │                                    ▲                   │
//! │         ▼                                    │                   │
//! │   ┌────────────┐    ┌────────────┐           │                   │
//! │   │ Commands   │───►│ Mouse      │───────────┘                   │
//! │   │ click/...  │    │ events     │                               │
//! │   └────────────┘    └────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use qxprobe::prelude::*;
//!
//! let snapshot = WidgetSnapshot::from_yaml_str(r#"
//! application: app
//! clientDocument: doc
//! classes:
//!   qx.ui.form.Button: { properties: [label] }
//! nodes:
//!   app: {}
//!   doc: { children: [ { $ref: ok } ] }
//!   ok: { class: qx.ui.form.Button, element: okButton, properties: { label: OK } }
//! "#).unwrap();
//!
//! let dispatcher = Dispatcher::new(&snapshot);
//! let element = dispatcher.find_element("qxh=qx.ui.form.Button").unwrap();
//! assert_eq!(element.as_deref(), Some("okButton"));
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod commands;
mod config;
mod descendants;
mod event;
mod graph;
mod hierarchy;
mod host;
mod locator;
mod path;
mod result;
mod snapshot;
mod user_data;
mod viewport;

/// Single-step resolvers of the hierarchy evaluator
pub mod steps;

/// Recording event host for tests and demos
pub mod mock;

pub use commands::{is_qx_enabled, QxCommands, StoredVars};
pub use config::{QxConfig, DEFAULT_XPATH_PREFIX};
pub use descendants::{descendants_of, detect_shape, NodeShape};
pub use event::{
    click_element, trigger_mouse_event, ClickListener, EventHost, EventModel, MouseEventInit,
    MouseEventParameters, CLICK_SEQUENCE,
};
pub use graph::{ClassRef, EnabledState, TypeRegistry, Value, WidgetGraph};
pub use hierarchy::{Resolution, ResolveContext, ResolveError, UnresolvedSuffix};
pub use host::HostWindow;
pub use locator::{Dispatcher, HierarchyRoot, Located, Locator, QxLocator};
pub use path::{AttributePredicate, AttributeStep, Path, PathStep, CLASS_NAMESPACE_PREFIX};
pub use result::{QxError, QxResult};
pub use snapshot::{
    ClassDef, NodeDef, NodeId, SnapshotDocument, WidgetSnapshot, DOCUMENT_ELEMENT,
};
pub use user_data::{resolve_tag_path, search_by_user_data};
pub use viewport::{ClickObservation, ViewportGeometry, VIEWPORT_VAR};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::commands::*;
    pub use super::config::*;
    pub use super::event::*;
    pub use super::graph::*;
    pub use super::hierarchy::*;
    pub use super::host::*;
    pub use super::locator::*;
    pub use super::path::*;
    pub use super::result::*;
    pub use super::snapshot::*;
}
