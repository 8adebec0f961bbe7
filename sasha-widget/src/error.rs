//! Widget Error Types
//!
//! Every fallible step inside the widget returns [`WidgetResult`]. Errors never
//! leave the crate: the [`crate::boundary`] combinators turn them into debug
//! channel diagnostics.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures the widget can run into inside a host page
#[derive(Error, Debug)]
pub enum WidgetError {
    /// No global `window` (worker or non-browser context)
    #[error("window is unavailable")]
    NoWindow,

    /// Window has no document attached
    #[error("document is unavailable")]
    NoDocument,

    /// Document has no body yet (or the host removed it)
    #[error("document body is unavailable")]
    NoBody,

    /// A DOM call threw or returned an unexpected type
    #[error("{op} failed: {detail}")]
    Dom { op: &'static str, detail: String },

    /// The host environment refused to attach a shadow root
    #[error("shadow root unavailable: {0}")]
    ShadowRootUnavailable(String),

    /// Network-level failure while probing the backend
    #[error("network error: {0}")]
    Network(String),
}

/// Result type used throughout the widget
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Attach the failing DOM operation's name to a raw `JsValue` error
pub trait DomResultExt<T> {
    fn dom(self, op: &'static str) -> WidgetResult<T>;
}

impl<T> DomResultExt<T> for Result<T, JsValue> {
    fn dom(self, op: &'static str) -> WidgetResult<T> {
        self.map_err(|e| WidgetError::Dom {
            op,
            detail: describe(&e),
        })
    }
}

/// Render a thrown JS value as text without touching `Debug` on foreign objects
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    match js_sys::Reflect::get(value, &JsValue::from_str("message")) {
        Ok(message) => message
            .as_string()
            .unwrap_or_else(|| "unknown error".to_string()),
        Err(_) => "unknown error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WidgetError::Dom {
            op: "attachShadow",
            detail: "NotSupportedError".to_string(),
        };
        assert_eq!(err.to_string(), "attachShadow failed: NotSupportedError");
        assert_eq!(WidgetError::NoBody.to_string(), "document body is unavailable");
    }
}
