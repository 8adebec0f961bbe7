//! Sasha Widget
//!
//! Embeddable assistant widget for third-party storefront pages, compiled to
//! WebAssembly. Drop the bundle into any page:
//!
//! ```html
//! <div id="sasha-widget" data-brand="Acme" data-mode="customer"
//!      data-api="https://backend.example.com"></div>
//! <script type="module">
//!   import init from "/widget/sasha_widget.js";
//!   init();
//! </script>
//! ```
//!
//! # Architecture
//!
//! - [`config`]: reads operator settings from the anchor element
//! - [`mount`]: builds the shadow-isolated launcher and panel
//! - [`guardian`] / [`navigation`]: keep the widget present across DOM purges
//!   and client-side navigation
//! - [`probe`]: one-shot backend reachability check
//! - [`boundary`]: no error ever escapes into the host page
//!
//! Set `window.SASHA_WIDGET_DEBUG = true` before loading to get console
//! diagnostics.

use wasm_bindgen::prelude::*;

pub mod boundary;
pub mod config;
pub mod debug;
pub mod dev_socket;
pub mod dom;
pub mod error;
pub mod guardian;
pub mod mount;
pub mod navigation;
pub mod panel;
pub mod probe;
pub mod styles;

pub use config::WidgetConfig;
pub use error::{WidgetError, WidgetResult};
pub use panel::{PanelAction, PanelState};
pub use probe::ProbeResult;

/// Module entry point: boot once the DOM is ready
#[cfg_attr(not(test), wasm_bindgen(start))]
pub fn start() {
    debug::install_panic_hook();
    boundary::guard("start", when_ready);
}

fn when_ready() -> WidgetResult<()> {
    let document = dom::document()?;
    if document.ready_state() != "loading" {
        boot();
        return Ok(());
    }

    let on_ready = Closure::once_into_js(boot);
    document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        .map_err(|e| WidgetError::Dom {
            op: "addEventListener",
            detail: error::describe(&e),
        })
}

/// Install the guardian and the Escape listener, then mount
fn boot() {
    guardian::install();
    boundary::guard("escape listener", mount::install_escape_listener);
    boundary::guard("initial mount", || mount::ensure_mounted().map(|_| ()));
}

/// Mount the widget now if it is not already present
#[wasm_bindgen(js_name = mount)]
pub fn mount_widget() {
    boundary::guard("mount", || mount::ensure_mounted().map(|_| ()));
}

/// Run the health probe and resolve to the status line
#[wasm_bindgen(js_name = checkHealth)]
pub async fn check_health() -> String {
    match mount::check_health().await {
        Ok(message) => message,
        Err(e) => {
            debug::log(&format!("check health failed: {}", e));
            ProbeResult::Error.message()
        }
    }
}

/// Opt-in companion: neutralise the dev hot-reload socket on production hosts
#[wasm_bindgen(js_name = installDevSocketGuard)]
pub fn install_dev_socket_guard() {
    boundary::guard("dev socket guard", dev_socket::install);
}

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

#[cfg(all(test, target_arch = "wasm32"))]
pub(crate) mod test_support {
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, KeyboardEvent, KeyboardEventInit};

    use crate::config::HOST_ID;
    use crate::mount::{forget_current, MOUNT_ID};
    use crate::navigation::NAVIGATION_SETTLE_MS;

    pub fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    /// Remove every trace of earlier tests from the shared page
    pub fn clear_document() {
        let doc = document();
        for id in [MOUNT_ID, HOST_ID] {
            while let Some(el) = doc.get_element_by_id(id) {
                el.remove();
            }
        }
        forget_current();
    }

    /// Let pending microtasks (mutation observer callbacks) run
    pub async fn next_tick() {
        TimeoutFuture::new(0).await;
    }

    pub async fn settle_navigation() {
        TimeoutFuture::new(NAVIGATION_SETTLE_MS + 50).await;
    }

    /// Dispatch Escape on `<body>`; `true` when something cancelled it
    pub fn press_escape() -> bool {
        let init = KeyboardEventInit::new();
        init.set_key("Escape");
        init.set_bubbles(true);
        init.set_cancelable(true);
        let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
        let body = document().body().unwrap();
        let not_cancelled = body.dispatch_event(event.unchecked_ref()).unwrap();
        !not_cancelled
    }
}
