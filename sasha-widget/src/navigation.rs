//! Navigation watch
//!
//! Single-page apps change routes through `history.pushState` and
//! `history.replaceState` and never fire a page load. Both methods are
//! replaced by wrappers that forward to the original and then schedule a
//! presence check once the app has had time to render its new view. The
//! browser's own back/forward (`popstate`) schedules the same check.
//!
//! The wrappers are installed once at load and never removed. Originals and
//! wrappers are held in thread-local state for the lifetime of the page.

use std::cell::OnceCell;

use gloo_timers::callback::Timeout;
use js_sys::{Function, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, History};

use crate::boundary;
use crate::debug;
use crate::dom;
use crate::error::{DomResultExt, WidgetError, WidgetResult};
use crate::mount;

/// Delay between a navigation and the presence check
pub const NAVIGATION_SETTLE_MS: u32 = 150;

const WRAPPED_METHODS: [&str; 2] = ["pushState", "replaceState"];

type HistoryWrapper = Closure<dyn FnMut(JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>;

/// One wrapped history method
struct HistoryPatch {
    _original: Function,
    _wrapper: HistoryWrapper,
}

struct NavigationHook {
    _patches: Vec<HistoryPatch>,
    _popstate: Closure<dyn FnMut(Event)>,
}

thread_local! {
    static HOOK: OnceCell<NavigationHook> = const { OnceCell::new() };
}

/// Whether the wrappers are in place
pub fn is_installed() -> bool {
    HOOK.with(|cell| cell.get().is_some())
}

/// Wrap the history methods and listen for `popstate`. Idempotent.
pub fn install() -> WidgetResult<()> {
    if is_installed() {
        return Ok(());
    }

    let window = dom::window()?;
    let history = window.history().dom("window.history")?;

    let mut patches = Vec::with_capacity(WRAPPED_METHODS.len());
    for method in WRAPPED_METHODS {
        match wrap_history_method(&history, method) {
            Ok(patch) => patches.push(patch),
            Err(e) => debug::log(&format!("could not wrap history.{}: {}", method, e)),
        }
    }

    let popstate = boundary::listener("popstate", |_event| {
        schedule_presence_check("popstate");
        Ok(())
    });
    window
        .add_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref())
        .dom("addEventListener")?;

    HOOK.with(|cell| {
        let _ = cell.set(NavigationHook {
            _patches: patches,
            _popstate: popstate,
        });
    });
    debug::log("navigation watch installed");
    Ok(())
}

/// Replace `history[method]` with a forwarding wrapper.
///
/// The wrapper calls the original with `history` as `this` and hands back its
/// return value. If the original throws, the exception is the host's own and
/// is re-raised unchanged; no check is scheduled in that case.
fn wrap_history_method(history: &History, method: &'static str) -> WidgetResult<HistoryPatch> {
    let original: Function = Reflect::get(history, &JsValue::from_str(method))
        .dom("Reflect.get")?
        .dyn_into()
        .map_err(|_| WidgetError::Dom {
            op: method,
            detail: "not a function".to_string(),
        })?;

    let target = history.clone();
    let forward = original.clone();
    let wrapper: HistoryWrapper = Closure::wrap(Box::new(
        move |state: JsValue, title: JsValue, url: JsValue| -> Result<JsValue, JsValue> {
            let result = forward.call3(&target, &state, &title, &url)?;
            schedule_presence_check(method);
            Ok(result)
        },
    )
        as Box<dyn FnMut(JsValue, JsValue, JsValue) -> Result<JsValue, JsValue>>);

    let replaced = Reflect::set(history, &JsValue::from_str(method), wrapper.as_ref())
        .dom("Reflect.set")?;
    if !replaced {
        return Err(WidgetError::Dom {
            op: method,
            detail: "history method is read-only".to_string(),
        });
    }

    Ok(HistoryPatch {
        _original: original,
        _wrapper: wrapper,
    })
}

/// Fire-and-forget; redundant checks are absorbed by idempotent mounting
fn schedule_presence_check(source: &'static str) {
    Timeout::new(NAVIGATION_SETTLE_MS, move || {
        boundary::guard(source, || {
            if mount::ensure_mounted()? {
                debug::log(&format!("remounted after {}", source));
            }
            Ok(())
        });
    })
    .forget();
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::mount::{current, ensure_mounted, MOUNT_ID};
    use crate::test_support::{clear_document, document, settle_navigation};
    use wasm_bindgen_test::*;

    /// Call `history[method]` the way host page JavaScript would
    fn host_call(method: &str, url: &str) -> Result<JsValue, JsValue> {
        let history = dom::window().unwrap().history().unwrap();
        let function: Function = Reflect::get(&history, &JsValue::from_str(method))
            .unwrap()
            .dyn_into()
            .unwrap();
        function.call3(&history, &JsValue::NULL, &JsValue::from_str(""), &JsValue::from_str(url))
    }

    fn remove_shell() {
        current().unwrap().shell().remove();
        assert!(document().get_element_by_id(MOUNT_ID).is_none());
    }

    #[wasm_bindgen_test]
    fn test_install_is_idempotent() {
        install().unwrap();
        let history = dom::window().unwrap().history().unwrap();
        let first = Reflect::get(&history, &JsValue::from_str("pushState")).unwrap();
        install().unwrap();
        let second = Reflect::get(&history, &JsValue::from_str("pushState")).unwrap();
        assert!(is_installed());
        assert_eq!(first, second);
    }

    #[wasm_bindgen_test]
    async fn test_push_state_remounts() {
        install().unwrap();
        clear_document();
        ensure_mounted().unwrap();
        remove_shell();

        host_call("pushState", "#/pushed").unwrap();
        assert!(document().get_element_by_id(MOUNT_ID).is_none());

        settle_navigation().await;
        assert!(document().get_element_by_id(MOUNT_ID).is_some());
    }

    #[wasm_bindgen_test]
    async fn test_replace_state_remounts() {
        install().unwrap();
        clear_document();
        ensure_mounted().unwrap();
        remove_shell();

        host_call("replaceState", "#/replaced").unwrap();

        settle_navigation().await;
        assert!(document().get_element_by_id(MOUNT_ID).is_some());
    }

    #[wasm_bindgen_test]
    fn test_wrapper_forwards_host_errors() {
        install().unwrap();
        assert!(host_call("pushState", "https://other-origin.invalid/").is_err());
    }
}
