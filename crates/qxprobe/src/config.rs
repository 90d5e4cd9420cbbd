//! Runtime configuration for locators and commands.

use crate::result::QxResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default XPath prefix for `qxp=` locators
pub const DEFAULT_XPATH_PREFIX: &str = "descendant-or-self::node()/";

/// Qxprobe configuration.
///
/// ```yaml
/// viewport_by_hand: false
/// xpath_prefix: "descendant-or-self::node()/"
/// cycle_guard: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QxConfig {
    /// Leave the viewport-check click to the user instead of firing one at
    /// client (0,0) on the document
    pub viewport_by_hand: bool,
    /// Prepended to the XPath part of `qxp=` locators
    pub xpath_prefix: String,
    /// Skip descendants already on the current wildcard descent
    pub cycle_guard: bool,
}

impl Default for QxConfig {
    fn default() -> Self {
        Self {
            viewport_by_hand: true,
            xpath_prefix: DEFAULT_XPATH_PREFIX.to_string(),
            cycle_guard: false,
        }
    }
}

impl QxConfig {
    /// Create a default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the viewport click is left to the user
    #[must_use]
    pub const fn with_viewport_by_hand(mut self, by_hand: bool) -> Self {
        self.viewport_by_hand = by_hand;
        self
    }

    /// Set the `qxp=` XPath prefix
    #[must_use]
    pub fn with_xpath_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.xpath_prefix = prefix.into();
        self
    }

    /// Enable or disable the wildcard cycle guard
    #[must_use]
    pub const fn with_cycle_guard(mut self, enabled: bool) -> Self {
        self.cycle_guard = enabled;
        self
    }

    /// Load from a YAML (`.yaml`/`.yml`) or JSON file. Missing keys take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> QxResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yaml_ng::from_str(&content)?),
            _ => Ok(serde_json::from_str(&content)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QxConfig::default();
        assert!(config.viewport_by_hand);
        assert!(!config.cycle_guard);
        assert_eq!(config.xpath_prefix, DEFAULT_XPATH_PREFIX);
    }

    #[test]
    fn test_builder() {
        let config = QxConfig::new()
            .with_viewport_by_hand(false)
            .with_xpath_prefix("./")
            .with_cycle_guard(true);
        assert!(!config.viewport_by_hand);
        assert!(config.cycle_guard);
        assert_eq!(config.xpath_prefix, "./");
    }

    #[test]
    fn test_load_partial_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qxprobe.yaml");
        std::fs::write(&path, "cycle_guard: true\n").unwrap();
        let config = QxConfig::load(&path).unwrap();
        assert!(config.cycle_guard);
        assert!(config.viewport_by_hand);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qxprobe.json");
        std::fs::write(&path, r#"{"viewport_by_hand": false}"#).unwrap();
        assert!(!QxConfig::load(&path).unwrap().viewport_by_hand);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(QxConfig::load(dir.path().join("absent.yaml")).is_err());
    }
}
