//! Mock event host over a [`WidgetSnapshot`].
//!
//! Records every synthetic event instead of delivering it to a browser, so
//! commands can be tested without one:
//!
//! ```rust
//! use qxprobe::mock::{MockEventHost, RecordedEvent};
//! use qxprobe::{QxCommands, WidgetSnapshot};
//!
//! let snapshot = WidgetSnapshot::from_yaml_str(r#"
//! application: app
//! clientDocument: app
//! nodes:
//!   app: { children: [ { $ref: ok } ] }
//!   ok: { element: okButton, userData: { ok: true } }
//! "#).unwrap();
//! let host = MockEventHost::new(snapshot);
//! QxCommands::new(&host).qx_click("qx=ok", "").unwrap();
//! assert!(matches!(host.events()[0], RecordedEvent::Focus { .. }));
//! ```

use crate::event::{ClickListener, EventHost, EventModel, MouseEventInit};
use crate::graph::{EnabledState, TypeRegistry, Value, WidgetGraph};
use crate::host::HostWindow;
use crate::result::{QxError, QxResult};
use crate::snapshot::{NodeId, WidgetSnapshot};
use crate::viewport::ClickObservation;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// An event delivered to the mock host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordedEvent {
    /// `focus`
    Focus {
        /// Target element
        element: String,
    },
    /// Standards-path mouse event
    Mouse {
        /// Target element
        element: String,
        /// Event fields
        init: MouseEventInit,
    },
    /// Legacy-path mouse event
    Legacy {
        /// Target element
        element: String,
        /// Handler name (`onclick`, ...)
        handler: String,
        /// Event fields
        init: MouseEventInit,
    },
    /// Widget execute action
    Execute {
        /// Target element
        element: String,
    },
}

/// Recording [`EventHost`] backed by a snapshot.
pub struct MockEventHost {
    snapshot: WidgetSnapshot,
    model: EventModel,
    window_size: (u32, u32),
    scroll: (i64, i64),
    client_positions: HashMap<String, (i64, i64)>,
    events: RefCell<Vec<RecordedEvent>>,
    listeners: RefCell<Vec<(String, ClickListener)>>,
}

impl fmt::Debug for MockEventHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockEventHost")
            .field("snapshot", &self.snapshot.to_string())
            .field("model", &self.model)
            .field("events", &self.events.borrow().len())
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

impl MockEventHost {
    /// Standard event model, 1024x768 window, no scrolling
    #[must_use]
    pub fn new(snapshot: WidgetSnapshot) -> Self {
        Self {
            snapshot,
            model: EventModel::Standard,
            window_size: (1024, 768),
            scroll: (0, 0),
            client_positions: HashMap::new(),
            events: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Set the event model
    #[must_use]
    pub const fn with_event_model(mut self, model: EventModel) -> Self {
        self.model = model;
        self
    }

    /// Set the window size
    #[must_use]
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Set the document scroll offsets
    #[must_use]
    pub const fn with_scroll(mut self, x: i64, y: i64) -> Self {
        self.scroll = (x, y);
        self
    }

    /// Place an element at the given client coordinates
    #[must_use]
    pub fn with_client_position(mut self, element: impl Into<String>, x: i64, y: i64) -> Self {
        self.client_positions.insert(element.into(), (x, y));
        self
    }

    /// The underlying snapshot
    #[must_use]
    pub const fn snapshot(&self) -> &WidgetSnapshot {
        &self.snapshot
    }

    /// Events recorded so far
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.borrow().clone()
    }

    /// Mouse event types recorded so far, either path
    #[must_use]
    pub fn mouse_event_types(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                RecordedEvent::Mouse { init, .. } | RecordedEvent::Legacy { init, .. } => {
                    Some(init.event_type.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Pending click listeners
    #[must_use]
    pub fn pending_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn require_element(&self, element: &str) -> QxResult<()> {
        if element == crate::snapshot::DOCUMENT_ELEMENT
            || self.snapshot.node_for_element(element).is_some()
        {
            Ok(())
        } else {
            Err(QxError::event_dispatch(format!("no such element: {element}")))
        }
    }

    fn record(&self, event: RecordedEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Run and drop the listeners registered on `element`
    fn notify_click(&self, element: &str, init: &MouseEventInit) {
        let fired: Vec<ClickListener> = {
            let mut listeners = self.listeners.borrow_mut();
            let (fired, kept) = listeners
                .drain(..)
                .partition::<Vec<_>, _>(|(target, _)| target == element);
            *listeners = kept;
            fired.into_iter().map(|(_, listener)| listener).collect()
        };
        let observation = ClickObservation {
            screen_x: init.screen_x,
            screen_y: init.screen_y,
            client_x: init.client_x,
            client_y: init.client_y,
            page_x: 0,
            page_y: 0,
            scroll_x: self.scroll.0,
            scroll_y: self.scroll.1,
            window_width: self.window_size.0,
            window_height: self.window_size.1,
        };
        for listener in fired {
            listener(&observation);
        }
    }
}

impl WidgetGraph for MockEventHost {
    type Node = NodeId;

    fn has_items(&self, node: &NodeId) -> bool {
        self.snapshot.has_items(node)
    }

    fn items(&self, node: &NodeId) -> Vec<Value<NodeId>> {
        self.snapshot.items(node)
    }

    fn has_children(&self, node: &NodeId) -> bool {
        self.snapshot.has_children(node)
    }

    fn children(&self, node: &NodeId) -> Vec<Value<NodeId>> {
        self.snapshot.children(node)
    }

    fn members(&self, node: &NodeId) -> Vec<(String, Value<NodeId>)> {
        self.snapshot.members(node)
    }

    fn user_data(&self, node: &NodeId, key: &str) -> Value<NodeId> {
        self.snapshot.user_data(node, key)
    }

    fn enabled_state(&self, node: &NodeId) -> Option<EnabledState> {
        self.snapshot.enabled_state(node)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.snapshot.parent(node)
    }

    fn display(&self, node: &NodeId) -> String {
        self.snapshot.display(node)
    }
}

impl HostWindow for MockEventHost {
    type Element = String;

    fn location(&self) -> String {
        self.snapshot.location()
    }

    fn toolkit_present(&self) -> bool {
        self.snapshot.toolkit_present()
    }

    fn application(&self) -> Option<NodeId> {
        self.snapshot.application()
    }

    fn client_document(&self) -> Option<NodeId> {
        self.snapshot.client_document()
    }

    fn type_registry(&self) -> Option<&dyn TypeRegistry<NodeId>> {
        self.snapshot.type_registry()
    }

    fn element_of(&self, node: &NodeId) -> Option<String> {
        self.snapshot.element_of(node)
    }

    fn locate_xpath(&self, xpath: &str, context: &String) -> QxResult<Option<String>> {
        self.snapshot.locate_xpath(xpath, context)
    }

    fn locate_native(&self, locator: &str) -> QxResult<Option<String>> {
        self.snapshot.locate_native(locator)
    }
}

impl EventHost for MockEventHost {
    fn event_model(&self) -> EventModel {
        self.model
    }

    fn dispatch_mouse_event(&self, element: &String, init: &MouseEventInit) -> QxResult<()> {
        self.require_element(element)?;
        self.record(RecordedEvent::Mouse {
            element: element.clone(),
            init: init.clone(),
        });
        if init.event_type == "click" {
            self.notify_click(element, init);
        }
        Ok(())
    }

    fn fire_legacy_event(
        &self,
        element: &String,
        handler: &str,
        init: &MouseEventInit,
    ) -> QxResult<()> {
        self.require_element(element)?;
        self.record(RecordedEvent::Legacy {
            element: element.clone(),
            handler: handler.to_string(),
            init: init.clone(),
        });
        if handler == "onclick" {
            self.notify_click(element, init);
        }
        Ok(())
    }

    fn focus(&self, element: &String) -> QxResult<()> {
        self.require_element(element)?;
        self.record(RecordedEvent::Focus {
            element: element.clone(),
        });
        Ok(())
    }

    fn client_xy(&self, element: &String) -> QxResult<(i64, i64)> {
        self.require_element(element)?;
        Ok(self
            .client_positions
            .get(element)
            .copied()
            .unwrap_or_default())
    }

    fn execute(&self, element: &String) -> QxResult<bool> {
        let executable = self
            .snapshot
            .node_for_element(element)
            .is_some_and(|node| self.snapshot.is_executable(node));
        if executable {
            self.record(RecordedEvent::Execute {
                element: element.clone(),
            });
        }
        Ok(executable)
    }

    fn add_click_listener(&self, element: &String, listener: ClickListener) -> QxResult<()> {
        self.require_element(element)?;
        self.listeners
            .borrow_mut()
            .push((element.clone(), listener));
        Ok(())
    }
}
