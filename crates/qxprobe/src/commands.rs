//! Test commands: widget-aware clicks, execute, enabled-state query and
//! viewport check.

use crate::config::QxConfig;
use crate::event::{click_element, EventHost, MouseEventParameters};
use crate::graph::EnabledState;
use crate::host::HostWindow;
use crate::locator::{Dispatcher, Locator, QxLocator};
use crate::result::{QxError, QxResult};
use crate::viewport::{ClickObservation, ViewportGeometry, VIEWPORT_VAR};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Variables shared with the test script (`storedVars`)
pub type StoredVars = Rc<RefCell<BTreeMap<String, String>>>;

/// Command set bound to one host window.
pub struct QxCommands<'a, H: EventHost + ?Sized> {
    dispatcher: Dispatcher<'a, H>,
    stored_vars: StoredVars,
}

impl<H: EventHost + ?Sized> fmt::Debug for QxCommands<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QxCommands")
            .field("dispatcher", &self.dispatcher)
            .field("stored_vars", &self.stored_vars.borrow())
            .finish()
    }
}

impl<'a, H: EventHost + ?Sized> QxCommands<'a, H> {
    /// Commands with default configuration and fresh stored variables
    #[must_use]
    pub fn new(host: &'a H) -> Self {
        Self {
            dispatcher: Dispatcher::new(host),
            stored_vars: StoredVars::default(),
        }
    }

    /// Use the given configuration
    #[must_use]
    pub fn with_config(mut self, config: QxConfig) -> Self {
        self.dispatcher = self.dispatcher.with_config(config);
        self
    }

    /// Share stored variables with the caller
    #[must_use]
    pub fn with_stored_vars(mut self, vars: StoredVars) -> Self {
        self.stored_vars = vars;
        self
    }

    /// The locator dispatcher
    #[must_use]
    pub const fn dispatcher(&self) -> &Dispatcher<'a, H> {
        &self.dispatcher
    }

    /// Value of a stored variable
    #[must_use]
    pub fn stored_var(&self, name: &str) -> Option<String> {
        self.stored_vars.borrow().get(name).cloned()
    }

    /// Element for any locator.
    ///
    /// # Errors
    ///
    /// [`QxError::NotFound`] when the locator matches nothing, plus parse and
    /// lookup errors.
    pub fn find_element(&self, locator: &str) -> QxResult<H::Element> {
        self.dispatcher
            .find_element(locator)?
            .ok_or_else(|| QxError::not_found(format!("Element {locator} not found")))
    }

    /// Focus the element, then fire `mouseover`, `mousedown`, `mouseup` and
    /// `click` with the given parameters (`button=right, shiftKey=true`).
    pub fn qx_click(&self, locator: &str, params: &str) -> QxResult<()> {
        let element = self.find_element(locator)?;
        click_element(
            self.dispatcher.host(),
            &element,
            &MouseEventParameters::parse(params),
        )
    }

    /// Like [`qx_click`](Self::qx_click), with the client coordinates taken
    /// from the element's position.
    pub fn qx_click_at(&self, locator: &str, params: &str) -> QxResult<()> {
        let host = self.dispatcher.host();
        let element = self.find_element(locator)?;
        let (x, y) = host.client_xy(&element)?;
        debug!(x, y, "computed click coordinates");
        let params = MouseEventParameters::parse(params)
            .with("clientX", x)
            .with("clientY", y);
        click_element(host, &element, &params)
    }

    /// Run the widget's execute action, if it has one.
    pub fn qx_execute(&self, locator: &str) -> QxResult<()> {
        let element = self.find_element(locator)?;
        if !self.dispatcher.host().execute(&element)? {
            debug!(?element, "qxExecute: cannot invoke execute() on element");
        }
        Ok(())
    }

    /// Enabled state of a widget; see [`is_qx_enabled`].
    pub fn is_qx_enabled(&self, locator: &str) -> QxResult<bool> {
        is_qx_enabled(&self.dispatcher, locator)
    }

    /// Arm a one-shot click listener on the document that stores the page
    /// geometry (`WxH+X+Y`) in the `ViewportStr` variable.
    ///
    /// Unless the configuration leaves the click to the user, a click at
    /// client (0,0) is fired right away.
    pub fn get_viewport(&self) -> QxResult<()> {
        let host = self.dispatcher.host();
        let document = self.find_element("dom=document")?;
        self.stored_vars.borrow_mut().remove(VIEWPORT_VAR);

        let vars = Rc::clone(&self.stored_vars);
        host.add_click_listener(
            &document,
            Box::new(move |click: &ClickObservation| {
                let geometry = ViewportGeometry::from_click(click);
                vars.borrow_mut()
                    .insert(VIEWPORT_VAR.to_string(), geometry.to_string());
            }),
        )?;

        if self.dispatcher.config().viewport_by_hand {
            debug!("viewport: waiting for a click in the document");
            Ok(())
        } else {
            self.qx_click_at("dom=document", "clientX=0,clientY=0")
        }
    }
}

/// Enabled state of a widget, following `inherit` up the parent chain.
///
/// Only `qx=` locators are accepted; the widget is looked up as its `qxx=`
/// object. A widget that exposes no state counts as inheriting.
///
/// # Errors
///
/// [`QxError::Syntax`] for any other locator, [`QxError::NotImplemented`]
/// for `qxp=`, [`QxError::NotFound`] when there is no such widget or no
/// ancestor decides.
pub fn is_qx_enabled<H: HostWindow + ?Sized>(
    dispatcher: &Dispatcher<'_, H>,
    locator: &str,
) -> QxResult<bool> {
    let qx = match Locator::parse(locator)? {
        Locator::Qx(QxLocator::Tag(tag_path)) => QxLocator::TagObject(tag_path),
        Locator::Qx(QxLocator::TagXPath { .. }) => {
            return Err(QxError::not_implemented("isQxEnabled for qxp locators"));
        }
        Locator::Qx(_) => {
            return Err(QxError::syntax(format!(
                "Bad qooxdoo-Locator-Syntax for locator: {locator}"
            )));
        }
        Locator::Native(_) => {
            return Err(QxError::syntax(format!("No qooxdoo locator given: {locator}")));
        }
    };
    let mut node = dispatcher
        .locate_object(&qx)?
        .ok_or_else(|| QxError::not_found(format!("No such object: {locator}")))?;

    let host = dispatcher.host();
    let mut visited = vec![node.clone()];
    loop {
        match host.enabled_state(&node) {
            Some(EnabledState::Enabled) => return Ok(true),
            Some(EnabledState::Disabled) => return Ok(false),
            Some(EnabledState::Inherit) | None => {}
        }
        node = host
            .parent(&node)
            .filter(|parent| !visited.contains(parent))
            .ok_or_else(|| QxError::not_found(format!("No enabled state decides for {locator}")))?;
        visited.push(node.clone());
    }
}
