//! Dev socket guard
//!
//! Storefront builds sometimes ship with a hot-reload client still trying to
//! reach the development server's WebSocket on `localhost:8081`. On any
//! non-local host this guard swaps `window.WebSocket` for a `Proxy` whose
//! `construct` trap hands back an inert, already-closed socket for that
//! endpoint and builds a real socket for everything else.
//!
//! Host pages opt in by calling `install_dev_socket_guard()`; the widget boot
//! does not install it.

use std::cell::OnceCell;

use js_sys::{Array, Function, Object, Proxy, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::debug;
use crate::dom;
use crate::error::{DomResultExt, WidgetError, WidgetResult};

/// Endpoint of the development transport that must never be dialed in production
pub const BLOCKED_DEV_ENDPOINT: &str = "localhost:8081";

/// `WebSocket.CLOSED`
const CLOSED: u32 = 3;

type ConstructTrap = Closure<dyn FnMut(JsValue, Array, JsValue) -> Result<JsValue, JsValue>>;

struct SocketGuard {
    _proxy: Proxy,
    _construct: ConstructTrap,
    _noop: Closure<dyn FnMut()>,
}

thread_local! {
    static GUARD: OnceCell<SocketGuard> = const { OnceCell::new() };
}

pub fn is_local_host(hostname: &str) -> bool {
    matches!(hostname, "localhost" | "127.0.0.1")
}

/// Whether a socket to `url` should be replaced by an inert stub
pub fn should_block(hostname: &str, url: &str) -> bool {
    !is_local_host(hostname) && url.contains(BLOCKED_DEV_ENDPOINT)
}

/// Install the guard once. A no-op on local hosts.
pub fn install() -> WidgetResult<()> {
    if GUARD.with(|cell| cell.get().is_some()) {
        return Ok(());
    }

    let window = dom::window()?;
    let hostname = window.location().hostname().dom("location.hostname")?;
    if is_local_host(&hostname) {
        return Ok(());
    }

    let original: Function = Reflect::get(&window, &JsValue::from_str("WebSocket"))
        .dom("Reflect.get")?
        .dyn_into()
        .map_err(|_| WidgetError::Dom {
            op: "WebSocket",
            detail: "constructor unavailable".to_string(),
        })?;

    let noop = Closure::wrap(Box::new(|| {}) as Box<dyn FnMut()>);
    let noop_fn: JsValue = noop.as_ref().clone();

    let construct: ConstructTrap = Closure::wrap(Box::new(
        move |target: JsValue, args: Array, new_target: JsValue| -> Result<JsValue, JsValue> {
            let url = socket_url(&args.get(0));
            if should_block(&hostname, &url) {
                web_sys::console::warn_1(
                    &format!("[sasha-widget] Blocked dev WebSocket in production: {}", url).into(),
                );
                return inert_socket(&noop_fn);
            }
            let target: Function = target.unchecked_into();
            let new_target: Function = new_target.unchecked_into();
            Reflect::construct_with_new_target(&target, &args, &new_target).map(JsValue::from)
        },
    )
        as Box<dyn FnMut(JsValue, Array, JsValue) -> Result<JsValue, JsValue>>);

    let handler = Object::new();
    Reflect::set(&handler, &JsValue::from_str("construct"), construct.as_ref())
        .dom("Reflect.set")?;
    let proxy = Proxy::new(&original, &handler);
    Reflect::set(&window, &JsValue::from_str("WebSocket"), &proxy).dom("Reflect.set")?;

    GUARD.with(|cell| {
        let _ = cell.set(SocketGuard {
            _proxy: proxy,
            _construct: construct,
            _noop: noop,
        });
    });
    debug::log("dev socket guard installed");
    Ok(())
}

/// `String(url)` for strings and `URL` objects alike
fn socket_url(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    value
        .dyn_ref::<Object>()
        .map(|object| String::from(object.to_string()))
        .unwrap_or_default()
}

/// Object shaped like a closed `WebSocket` whose methods do nothing
fn inert_socket(noop: &JsValue) -> Result<JsValue, JsValue> {
    let socket = Object::new();
    Reflect::set(&socket, &"readyState".into(), &JsValue::from(CLOSED))?;
    for method in ["close", "send", "addEventListener", "removeEventListener"] {
        Reflect::set(&socket, &method.into(), noop)?;
    }
    for handler in ["onopen", "onmessage", "onerror", "onclose"] {
        Reflect::set(&socket, &handler.into(), &JsValue::NULL)?;
    }
    Ok(socket.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_hosts_never_block() {
        assert!(!should_block("localhost", "ws://localhost:8081/ws"));
        assert!(!should_block("127.0.0.1", "ws://localhost:8081/ws"));
    }

    #[test]
    fn test_production_blocks_dev_endpoint_only() {
        assert!(should_block("shop.example.com", "ws://localhost:8081/ws"));
        assert!(should_block("shop.example.com", "wss://localhost:8081"));
        assert!(!should_block("shop.example.com", "wss://realtime.example.com/socket"));
        assert!(!should_block("shop.example.com", "ws://localhost:3000/ws"));
    }
}
