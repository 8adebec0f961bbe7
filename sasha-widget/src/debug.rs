//! Debug Channel
//!
//! Operators opt in by setting `window.SASHA_WIDGET_DEBUG = true` before the
//! script loads. When the flag is absent nothing is written to the console.

/// Global flag consulted on every diagnostic
pub const DEBUG_FLAG: &str = "SASHA_WIDGET_DEBUG";

const PREFIX: &str = "[sasha-widget]";

/// Check whether the host page enabled diagnostics
#[cfg(target_arch = "wasm32")]
pub fn enabled() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    js_sys::Reflect::get(&window, &wasm_bindgen::JsValue::from_str(DEBUG_FLAG))
        .ok()
        .and_then(|flag| flag.as_bool())
        .unwrap_or(false)
}

/// Outside a browser there is no console to write to
#[cfg(not(target_arch = "wasm32"))]
pub fn enabled() -> bool {
    false
}

/// Write a diagnostic line when the debug flag is set
pub fn log(message: &str) {
    if enabled() {
        web_sys::console::debug_1(&format!("{} {}", PREFIX, message).into());
    }
}

/// Install the panic hook only for operators who asked for diagnostics
pub fn install_panic_hook() {
    if enabled() {
        console_error_panic_hook::set_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_silent_without_browser() {
        assert!(!enabled());
        log("mounted");
    }
}
