//! The application window as seen by locators and commands.
//!
//! A host is whatever sits between Qxprobe and the page: a browser bridge
//! talking to the test framework, or an in-memory
//! [`WidgetSnapshot`](crate::WidgetSnapshot). It owns the widget graph and
//! answers the questions locators need: is the toolkit loaded, where are the
//! roots, which DOM element renders a widget.

use crate::graph::{TypeRegistry, WidgetGraph};
use crate::result::QxResult;
use std::fmt;

/// Window of the application under test.
pub trait HostWindow: WidgetGraph {
    /// DOM element handle
    type Element: Clone + fmt::Debug;

    /// Window location, for log messages
    fn location(&self) -> String;

    /// Whether the widget toolkit is loaded in this window
    fn toolkit_present(&self) -> bool;

    /// The application object, once the application has been set
    fn application(&self) -> Option<Self::Node>;

    /// The client document (root of the widget tree)
    fn client_document(&self) -> Option<Self::Node>;

    /// The class registry and property system, if the host exposes one
    fn type_registry(&self) -> Option<&dyn TypeRegistry<Self::Node>>;

    /// DOM element rendering `node`
    fn element_of(&self, node: &Self::Node) -> Option<Self::Element>;

    /// Evaluate `xpath` relative to `context`
    fn locate_xpath(&self, xpath: &str, context: &Self::Element)
        -> QxResult<Option<Self::Element>>;

    /// Resolve a locator of another strategy (`id=`, `dom=`, ...) through the
    /// host framework
    fn locate_native(&self, locator: &str) -> QxResult<Option<Self::Element>>;

    /// The client document, but only once the application is set.
    ///
    /// Touching the client document earlier makes the toolkit flush its
    /// render queues against a missing application.
    fn client_document_root(&self) -> Option<Self::Node> {
        self.application()?;
        self.client_document()
    }
}
