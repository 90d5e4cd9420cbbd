//! Synthetic mouse events.
//!
//! Widgets of the toolkit react to low-level mouse events (`mousedown`,
//! `mouseup`) rather than to a plain `click`, so commands fire the whole
//! sequence. Event parameters come from a `key=value, key=value` string.

use crate::host::HostWindow;
use crate::result::QxResult;
use crate::viewport::ClickObservation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Mouse events fired by a click, in order (after focusing the element)
pub const CLICK_SEQUENCE: [&str; 4] = ["mouseover", "mousedown", "mouseup", "click"];

/// How the host builds and delivers synthetic events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventModel {
    /// `createEvent` / `initMouseEvent` / `dispatchEvent`
    Standard,
    /// `createEventObject` / `fireEvent("on<type>")`
    Legacy,
}

impl EventModel {
    /// Numeric button code for a button name; unknown names map to 0.
    #[must_use]
    pub fn button_code(self, name: &str) -> u16 {
        match (self, name) {
            (Self::Legacy, "left") => 1,
            (_, "right") => 2,
            (Self::Legacy, "middle") => 4,
            (Self::Standard, "middle") => 1,
            _ => 0,
        }
    }
}

/// Custom parameters of a mouse event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MouseEventParameters {
    values: HashMap<String, String>,
}

impl MouseEventParameters {
    /// Parse `name=value` pairs separated by commas. Whitespace around names
    /// and values is ignored; a later pair overrides an earlier one.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut values = HashMap::new();
        for pair in input.split(',') {
            let mut fields = pair.split('=');
            let name = fields.next().unwrap_or_default().trim();
            let value = fields.next().unwrap_or_default().trim();
            if !name.is_empty() {
                values.insert(name.to_string(), value.to_string());
            }
        }
        Self { values }
    }

    /// Set (or override) one parameter
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    /// Raw value; empty values count as absent
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Boolean parameter: only the literal `true` is true
    #[must_use]
    pub fn flag(&self, name: &str, default: bool) -> bool {
        self.get(name).map_or(default, |value| value == "true")
    }

    /// Integer parameter, read like `parseInt` (leading digits; 0 if none)
    #[must_use]
    pub fn number(&self, name: &str, default: i64) -> i64 {
        self.get(name).map_or(default, leading_integer)
    }

    /// Button code under the given event model, `left` by default
    #[must_use]
    pub fn button(&self, model: EventModel) -> u16 {
        model.button_code(self.get("button").unwrap_or("left"))
    }
}

fn leading_integer(value: &str) -> i64 {
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |n| sign * n)
}

/// Fully resolved event fields, as passed to `initMouseEvent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MouseEventInit {
    /// Event type (`click`, `mousedown`, ...)
    pub event_type: String,
    /// Bubbles
    pub bubbles: bool,
    /// Cancelable
    pub cancelable: bool,
    /// Click count
    pub detail: i64,
    /// Screen X
    pub screen_x: i64,
    /// Screen Y
    pub screen_y: i64,
    /// Client X
    pub client_x: i64,
    /// Client Y
    pub client_y: i64,
    /// Control key held
    pub ctrl_key: bool,
    /// Alt key held
    pub alt_key: bool,
    /// Shift key held
    pub shift_key: bool,
    /// Meta key held
    pub meta_key: bool,
    /// Button code under the host event model
    pub button: u16,
}

impl MouseEventInit {
    /// Apply the parameter defaults for `event_type`
    #[must_use]
    pub fn new(event_type: &str, params: &MouseEventParameters, model: EventModel) -> Self {
        Self {
            event_type: event_type.to_string(),
            bubbles: params.flag("bubbles", true),
            cancelable: params.flag("cancelable", true),
            detail: params.number("detail", 1),
            screen_x: params.number("screenX", 0),
            screen_y: params.number("screenY", 0),
            client_x: params.number("clientX", 0),
            client_y: params.number("clientY", 0),
            ctrl_key: params.flag("ctrlKey", false),
            alt_key: params.flag("altKey", false),
            shift_key: params.flag("shiftKey", false),
            meta_key: params.flag("metaKey", false),
            button: params.button(model),
        }
    }
}

/// One-shot click listener
pub type ClickListener = Box<dyn FnOnce(&ClickObservation)>;

/// A host that can deliver synthetic input to elements.
pub trait EventHost: HostWindow {
    /// The event model of the browser
    fn event_model(&self) -> EventModel;

    /// Standards path: create, init and dispatch a mouse event
    fn dispatch_mouse_event(
        &self,
        element: &Self::Element,
        init: &MouseEventInit,
    ) -> QxResult<()>;

    /// Legacy path: fire the event through handler `on<type>`
    fn fire_legacy_event(
        &self,
        element: &Self::Element,
        handler: &str,
        init: &MouseEventInit,
    ) -> QxResult<()>;

    /// Fire a (non-bubbling) focus event
    fn focus(&self, element: &Self::Element) -> QxResult<()>;

    /// Client coordinates of the element
    fn client_xy(&self, element: &Self::Element) -> QxResult<(i64, i64)>;

    /// Invoke the execute action of the widget rendered by `element`.
    /// Returns false if the widget has none.
    fn execute(&self, element: &Self::Element) -> QxResult<bool>;

    /// Call `listener` on the next click on `element`, then forget it
    fn add_click_listener(
        &self,
        element: &Self::Element,
        listener: ClickListener,
    ) -> QxResult<()>;
}

/// Build one mouse event from `params` and deliver it the way the host's
/// event model requires.
///
/// # Errors
///
/// Returns the host's dispatch error.
pub fn trigger_mouse_event<H: EventHost + ?Sized>(
    host: &H,
    event_type: &str,
    element: &H::Element,
    params: &MouseEventParameters,
) -> QxResult<()> {
    let model = host.event_model();
    let init = MouseEventInit::new(event_type, params, model);
    match model {
        EventModel::Standard => {
            debug!(event_type, "trigger mouse event: standard path");
            host.dispatch_mouse_event(element, &init)
        }
        EventModel::Legacy => {
            debug!(event_type, "trigger mouse event: legacy path");
            host.fire_legacy_event(element, &format!("on{event_type}"), &init)
        }
    }
}

/// Focus `element`, then fire the full click sequence.
///
/// # Errors
///
/// Stops at the first event the host rejects.
pub fn click_element<H: EventHost + ?Sized>(
    host: &H,
    element: &H::Element,
    params: &MouseEventParameters,
) -> QxResult<()> {
    host.focus(element)?;
    for event_type in CLICK_SEQUENCE {
        trigger_mouse_event(host, event_type, element, params)?;
    }
    Ok(())
}
