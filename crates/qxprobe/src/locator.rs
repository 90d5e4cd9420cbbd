//! Widget locators and the dispatcher that evaluates them.
//!
//! Four strategies live in the `qx` family:
//!
//! | Locator | Resolves to |
//! |---|---|
//! | `qx=tag/tag` | element of the widget found by user-tag search |
//! | `qxx=tag/tag` | the widget itself |
//! | `qxp=tag/tag//xpath` | XPath result, relative to the tagged widget's element |
//! | `qxh=step/step`, `qxh=app:step/step` | element of the widget found by hierarchy path |
//!
//! Anything else is handed to the host unchanged (`id=`, `dom=`, ...).

use crate::config::QxConfig;
use crate::hierarchy::{ResolveContext, ResolveError};
use crate::host::HostWindow;
use crate::path::Path;
use crate::result::{QxError, QxResult};
use crate::user_data::resolve_tag_path;
use std::fmt;
use tracing::{debug, info};

/// Where a `qxh=` path starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyRoot {
    /// The client document (default)
    ClientDocument,
    /// The application object (`app:` prefix)
    Application,
}

/// A parsed `qx`-family locator.
#[derive(Debug, Clone, PartialEq)]
pub enum QxLocator {
    /// `qx=`
    Tag(String),
    /// `qxx=`
    TagObject(String),
    /// `qxp=`
    TagXPath {
        /// User-tag path to the context widget
        tag_path: String,
        /// XPath evaluated below the context widget's element
        xpath: String,
    },
    /// `qxh=`
    Hierarchy {
        /// Start of the path
        root: HierarchyRoot,
        /// The classified steps
        path: Path,
    },
}

/// Any locator string, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    /// Handled by Qxprobe
    Qx(QxLocator),
    /// Handed to the host framework
    Native(String),
}

impl Locator {
    /// Classify and parse a locator string.
    ///
    /// # Errors
    ///
    /// Returns [`QxError::Syntax`] for an unknown `qx`-prefixed strategy, a
    /// `qxp=` locator without exactly one non-empty tag and XPath part, or a
    /// malformed `qxh=` path.
    pub fn parse(locator: &str) -> QxResult<Self> {
        if !locator.starts_with("qx") {
            return Ok(Self::Native(locator.to_string()));
        }
        if let Some(rest) = locator.strip_prefix("qx=") {
            return Ok(Self::Qx(QxLocator::Tag(rest.to_string())));
        }
        if let Some(rest) = locator.strip_prefix("qxx=") {
            return Ok(Self::Qx(QxLocator::TagObject(rest.to_string())));
        }
        if let Some(rest) = locator.strip_prefix("qxp=") {
            return parse_tag_xpath(rest).map(Self::Qx);
        }
        if let Some(rest) = locator.strip_prefix("qxh=") {
            return parse_hierarchy(rest).map(Self::Qx);
        }
        Err(QxError::syntax(format!("Bad qooxdoo-Locator-Syntax for locator: {locator}")))
    }
}

fn parse_tag_xpath(rest: &str) -> QxResult<QxLocator> {
    let parts: Vec<&str> = rest.split("//").collect();
    let [tag_path, xpath] = parts.as_slice() else {
        return Err(QxError::syntax("wrong QXP locator syntax. need: qx1/qx2/.../qxn//xpath"));
    };
    if tag_path.is_empty() {
        return Err(QxError::syntax("wrong QXP locator syntax, qx-Part must not be empty"));
    }
    if xpath.is_empty() {
        return Err(QxError::syntax("wrong QXP locator syntax, xpath-Part must not be empty"));
    }
    Ok(QxLocator::TagXPath {
        tag_path: (*tag_path).to_string(),
        xpath: (*xpath).to_string(),
    })
}

fn parse_hierarchy(rest: &str) -> QxResult<QxLocator> {
    let root = if rest.starts_with("app:") {
        HierarchyRoot::Application
    } else {
        HierarchyRoot::ClientDocument
    };
    let path = Path::parse(strip_object_space(rest))?;
    Ok(QxLocator::Hierarchy { root, path })
}

/// Drop a leading `<letters>:` object-space prefix.
fn strip_object_space(path: &str) -> &str {
    match path.split_once(':') {
        Some((space, rest))
            if !space.is_empty() && space.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            rest
        }
        _ => path,
    }
}

impl fmt::Display for QxLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(path) => write!(f, "qx={path}"),
            Self::TagObject(path) => write!(f, "qxx={path}"),
            Self::TagXPath { tag_path, xpath } => write!(f, "qxp={tag_path}//{xpath}"),
            Self::Hierarchy {
                root: HierarchyRoot::Application,
                path,
            } => write!(f, "qxh=app:{path}"),
            Self::Hierarchy { path, .. } => write!(f, "qxh={path}"),
        }
    }
}

/// What a `qx` locator resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum Located<N, E> {
    /// A DOM element
    Element(E),
    /// A widget object (`qxx=`)
    Object(N),
}

/// Evaluates locators against a host window.
pub struct Dispatcher<'a, H: HostWindow + ?Sized> {
    host: &'a H,
    config: QxConfig,
}

impl<H: HostWindow + ?Sized> fmt::Debug for Dispatcher<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("location", &self.host.location())
            .field("config", &self.config)
            .finish()
    }
}

impl<'a, H: HostWindow + ?Sized> Dispatcher<'a, H> {
    /// Dispatcher with default configuration
    #[must_use]
    pub fn new(host: &'a H) -> Self {
        Self {
            host,
            config: QxConfig::default(),
        }
    }

    /// Use the given configuration
    #[must_use]
    pub fn with_config(mut self, config: QxConfig) -> Self {
        self.config = config;
        self
    }

    /// The host window
    #[must_use]
    pub const fn host(&self) -> &'a H {
        self.host
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &QxConfig {
        &self.config
    }

    /// Evaluate a `qx`-family locator.
    ///
    /// `Ok(None)` when nothing matched, and also when the toolkit or the
    /// application is not available yet in this window, so the caller may
    /// retry elsewhere.
    ///
    /// # Errors
    ///
    /// Fatal lookup errors (missing type registry, XPath failures).
    pub fn locate(&self, locator: &QxLocator) -> QxResult<Option<Located<H::Node, H::Element>>> {
        info!(%locator, location = %self.host.location(), "Locate qooxdoo widget");
        match locator {
            QxLocator::Tag(tag_path) => Ok(self
                .find_tagged(tag_path)
                .and_then(|node| self.host.element_of(&node))
                .map(Located::Element)),
            QxLocator::TagObject(tag_path) => {
                Ok(self.find_tagged(tag_path).map(Located::Object))
            }
            QxLocator::TagXPath { tag_path, xpath } => {
                let Some(context) = self
                    .find_tagged(tag_path)
                    .and_then(|node| self.host.element_of(&node))
                else {
                    return Ok(None);
                };
                let full = format!("{}{xpath}", self.config.xpath_prefix);
                debug!(xpath = %full, "qxp-locator: evaluating XPath");
                Ok(self
                    .host
                    .locate_xpath(&full, &context)?
                    .map(Located::Element))
            }
            QxLocator::Hierarchy { root, path } => Ok(self
                .find_in_hierarchy(*root, path)?
                .and_then(|node| self.host.element_of(&node))
                .map(Located::Element)),
        }
    }

    /// The widget object a locator designates, for locators that have one.
    ///
    /// # Errors
    ///
    /// [`QxError::NotImplemented`] for `qxp=`, whose result is an element.
    pub fn locate_object(&self, locator: &QxLocator) -> QxResult<Option<H::Node>> {
        match locator {
            QxLocator::Tag(tag_path) | QxLocator::TagObject(tag_path) => {
                Ok(self.find_tagged(tag_path))
            }
            QxLocator::Hierarchy { root, path } => self.find_in_hierarchy(*root, path),
            QxLocator::TagXPath { .. } => Err(QxError::not_implemented(format!(
                "no widget object for XPath locator {locator}"
            ))),
        }
    }

    /// Element for any locator string; `qx` locators are evaluated here, all
    /// others by the host.
    ///
    /// # Errors
    ///
    /// Syntax errors from parsing and fatal lookup errors.
    pub fn find_element(&self, locator: &str) -> QxResult<Option<H::Element>> {
        match Locator::parse(locator)? {
            Locator::Native(native) => self.host.locate_native(&native),
            Locator::Qx(qx) => Ok(match self.locate(&qx)? {
                Some(Located::Element(element)) => Some(element),
                Some(Located::Object(node)) => self.host.element_of(&node),
                None => None,
            }),
        }
    }

    fn find_tagged(&self, tag_path: &str) -> Option<H::Node> {
        if !self.host.toolkit_present() {
            debug!(
                location = %self.host.location(),
                "qx-locator: toolkit not present, object not found"
            );
            return None;
        }
        let Some(root) = self.host.client_document_root() else {
            debug!(
                location = %self.host.location(),
                "qx-locator: application not set yet, cannot search"
            );
            return None;
        };
        resolve_tag_path(self.host, &root, tag_path)
    }

    fn find_in_hierarchy(&self, root: HierarchyRoot, path: &Path) -> QxResult<Option<H::Node>> {
        if !self.host.toolkit_present() {
            debug!(
                location = %self.host.location(),
                "qxh-locator: toolkit not present, object not found"
            );
            return Ok(None);
        }
        let start = match root {
            HierarchyRoot::Application => self.host.application(),
            HierarchyRoot::ClientDocument => self.host.client_document_root(),
        };
        let Some(start) = start else {
            debug!(?root, "qxh-locator: root not available yet, cannot search");
            return Ok(None);
        };

        let context = ResolveContext::new(self.host)
            .with_registry(self.host.type_registry())
            .with_cycle_guard(self.config.cycle_guard);
        match context.resolve(&start, path) {
            Ok(found) => Ok(found),
            Err(ResolveError::Unresolved(suffix)) => {
                debug!(%suffix, "Qxh Locator: could not resolve last element");
                Ok(None)
            }
            Err(ResolveError::Fatal(err)) => Err(err),
        }
    }
}
