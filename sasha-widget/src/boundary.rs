//! Failure Boundary
//!
//! Every entry point the host page can reach (module start, observer
//! callbacks, history wrappers, DOM listeners, probe completion) runs through
//! one of these combinators. Inside the boundary helpers propagate errors with
//! `?`; at the boundary the error is reported to the debug channel and dropped.

use std::future::Future;

use wasm_bindgen::closure::Closure;
use web_sys::Event;

use crate::debug;
use crate::error::WidgetResult;

/// Run a fallible step, swallowing its error
pub fn guard<F>(label: &str, f: F)
where
    F: FnOnce() -> WidgetResult<()>,
{
    if let Err(e) = f() {
        debug::log(&format!("{} failed: {}", label, e));
    }
}

/// Wrap an event handler so a failing reaction never throws into the host
pub fn listener<F>(label: &'static str, mut handler: F) -> Closure<dyn FnMut(Event)>
where
    F: FnMut(Event) -> WidgetResult<()> + 'static,
{
    Closure::wrap(Box::new(move |event: Event| {
        guard(label, || handler(event));
    }) as Box<dyn FnMut(Event)>)
}

/// Spawn an async task on the browser's microtask queue behind the boundary
pub fn spawn<F>(label: &'static str, task: F)
where
    F: Future<Output = WidgetResult<()>> + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = task.await {
            debug::log(&format!("{} failed: {}", label, e));
        }
    });
}
