//! Configuration Reader
//!
//! Operators configure the widget with data attributes on a single anchor
//! element:
//!
//! ```html
//! <div id="sasha-widget" data-brand="Acme" data-mode="admin"
//!      data-api="https://backend.example.com"></div>
//! ```
//!
//! Missing or empty attributes fall back to defaults. If the anchor itself is
//! missing it is created so the attributes can be set later.

use web_sys::{Document, Element};

use crate::error::{DomResultExt, WidgetError, WidgetResult};

/// Reserved id of the operator's configuration anchor
pub const HOST_ID: &str = "sasha-widget";

pub const ATTR_BRAND: &str = "data-brand";
pub const ATTR_MODE: &str = "data-mode";
pub const ATTR_API: &str = "data-api";

pub const DEFAULT_BRAND: &str = "Sasha";
pub const DEFAULT_MODE: &str = "customer";

/// Settings for one mount of the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Label shown in the panel header
    pub brand_label: String,
    /// Free-form mode shown as a badge
    pub mode: String,
    /// Backend base URL, empty when no backend is configured
    pub api_base_url: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            brand_label: DEFAULT_BRAND.to_string(),
            mode: DEFAULT_MODE.to_string(),
            api_base_url: String::new(),
        }
    }
}

impl WidgetConfig {
    /// Build a config from any attribute source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            brand_label: read(ATTR_BRAND, DEFAULT_BRAND),
            mode: read(ATTR_MODE, DEFAULT_MODE),
            api_base_url: read(ATTR_API, ""),
        }
    }

    /// Read the config from the anchor element, creating the anchor if needed
    pub fn read(document: &Document) -> WidgetResult<Self> {
        let anchor = host_element(document)?;
        Ok(Self::from_lookup(|name| anchor.get_attribute(name)))
    }

    /// Like [`WidgetConfig::read`], but a purged anchor is recreated with the
    /// settings of the mount being replaced instead of bare defaults
    pub fn read_or_restore(document: &Document, previous: Option<&WidgetConfig>) -> WidgetResult<Self> {
        if let (None, Some(previous)) = (document.get_element_by_id(HOST_ID), previous) {
            let anchor = host_element(document)?;
            previous.write_to(&anchor)?;
        }
        Self::read(document)
    }

    /// Whether a backend is available for the health probe
    pub fn has_backend(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    fn write_to(&self, anchor: &Element) -> WidgetResult<()> {
        anchor.set_attribute(ATTR_BRAND, &self.brand_label).dom("setAttribute")?;
        anchor.set_attribute(ATTR_MODE, &self.mode).dom("setAttribute")?;
        if self.has_backend() {
            anchor.set_attribute(ATTR_API, &self.api_base_url).dom("setAttribute")?;
        }
        Ok(())
    }
}

/// Find the anchor element or append a fresh one to `<body>`
pub fn host_element(document: &Document) -> WidgetResult<Element> {
    if let Some(existing) = document.get_element_by_id(HOST_ID) {
        return Ok(existing);
    }

    let body = document.body().ok_or(WidgetError::NoBody)?;
    let anchor = document.create_element("div").dom("createElement")?;
    anchor.set_id(HOST_ID);
    body.append_child(&anchor).dom("appendChild")?;
    Ok(anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let attrs: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| attrs.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = WidgetConfig::from_lookup(|_| None);
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.brand_label, "Sasha");
        assert_eq!(config.mode, "customer");
        assert_eq!(config.api_base_url, "");
        assert!(!config.has_backend());
    }

    #[test]
    fn test_reads_all_attributes() {
        let config = WidgetConfig::from_lookup(lookup_from(&[
            ("data-brand", "Acme"),
            ("data-mode", "admin"),
            ("data-api", "https://api.acme.test"),
        ]));
        assert_eq!(config.brand_label, "Acme");
        assert_eq!(config.mode, "admin");
        assert_eq!(config.api_base_url, "https://api.acme.test");
        assert!(config.has_backend());
    }

    #[test]
    fn test_empty_attributes_fall_back() {
        let config = WidgetConfig::from_lookup(lookup_from(&[
            ("data-brand", ""),
            ("data-mode", "vip"),
        ]));
        assert_eq!(config.brand_label, "Sasha");
        assert_eq!(config.mode, "vip");
        assert!(!config.has_backend());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::test_support::{clear_document, document};
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_missing_anchor_is_created_with_defaults() {
        clear_document();
        let doc = document();
        assert!(doc.get_element_by_id(HOST_ID).is_none());

        let config = WidgetConfig::read(&doc).unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert!(doc.get_element_by_id(HOST_ID).is_some());
    }

    #[wasm_bindgen_test]
    fn test_reads_attributes_from_anchor() {
        clear_document();
        let doc = document();
        let anchor = host_element(&doc).unwrap();
        anchor.set_attribute(ATTR_BRAND, "Acme").unwrap();
        anchor.set_attribute(ATTR_API, "https://api.acme.test/").unwrap();

        let config = WidgetConfig::read(&doc).unwrap();
        assert_eq!(config.brand_label, "Acme");
        assert_eq!(config.mode, DEFAULT_MODE);
        assert_eq!(config.api_base_url, "https://api.acme.test/");
    }

    #[wasm_bindgen_test]
    fn test_purged_anchor_is_restored_from_previous() {
        clear_document();
        let doc = document();
        let previous = WidgetConfig {
            brand_label: "Acme".to_string(),
            mode: "admin".to_string(),
            api_base_url: "https://api.acme.test".to_string(),
        };

        let restored = WidgetConfig::read_or_restore(&doc, Some(&previous)).unwrap();
        assert_eq!(restored, previous);
    }
}
