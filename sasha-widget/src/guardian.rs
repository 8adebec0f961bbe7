//! Presence Guardian
//!
//! Host pages can delete the widget at any time: defensive scripts purge
//! unknown nodes, SPA frameworks swap whole subtrees without a reload. The
//! guardian subscribes to two sources and funnels both into the idempotent
//! [`mount::ensure_mounted`]:
//!
//! - structural mutations anywhere in the document ([`MutationWatch`])
//! - history navigation ([`crate::navigation`])

use std::cell::OnceCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, MutationObserver, MutationObserverInit};

use crate::boundary;
use crate::dom;
use crate::error::{DomResultExt, WidgetResult};
use crate::mount;
use crate::navigation;

thread_local! {
    static WATCH: OnceCell<MutationWatch> = const { OnceCell::new() };
}

type MutationCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

/// Observer over the whole document tree; disconnects on drop
pub struct MutationWatch {
    observer: MutationObserver,
    _callback: MutationCallback,
}

impl MutationWatch {
    /// Observe `childList` changes on `document` and its subtree
    pub fn start(document: &Document) -> WidgetResult<Self> {
        let callback: MutationCallback = Closure::wrap(Box::new(
            |_records: js_sys::Array, _observer: MutationObserver| {
                boundary::guard("mutation remount", || mount::ensure_mounted().map(|_| ()));
            },
        ) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

        let observer =
            MutationObserver::new(callback.as_ref().unchecked_ref()).dom("new MutationObserver")?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(document, &init)
            .dom("MutationObserver.observe")?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for MutationWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Install both watches for the lifetime of the page.
///
/// Each source is installed independently so one failing does not take the
/// other down. Calling this again is a no-op.
pub fn install() {
    boundary::guard("navigation watch", navigation::install);
    boundary::guard("mutation watch", || {
        if WATCH.with(|cell| cell.get().is_some()) {
            return Ok(());
        }
        let watch = MutationWatch::start(&dom::document()?)?;
        WATCH.with(|cell| {
            let _ = cell.set(watch);
        });
        Ok(())
    });
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::mount::{current, ensure_mounted, MOUNT_ID};
    use crate::panel::{PanelAction, PanelState};
    use crate::test_support::{clear_document, document, next_tick};
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    async fn test_removed_shell_is_recreated_closed() {
        clear_document();
        ensure_mounted().unwrap();
        let watch = MutationWatch::start(&document()).unwrap();

        let first = current().unwrap();
        first.panel().apply(PanelAction::Toggle).unwrap();
        assert_eq!(first.panel_state(), PanelState::Open);

        first.shell().remove();
        assert!(document().get_element_by_id(MOUNT_ID).is_none());

        next_tick().await;

        let second = current().unwrap();
        assert!(document().get_element_by_id(MOUNT_ID).is_some());
        assert!(!std::rc::Rc::ptr_eq(&first, &second));
        assert_eq!(second.panel_state(), PanelState::Closed);

        watch.disconnect();
    }

    #[wasm_bindgen_test]
    async fn test_body_purge_keeps_operator_config() {
        clear_document();
        let anchor = crate::config::host_element(&document()).unwrap();
        anchor.set_attribute(crate::config::ATTR_BRAND, "Acme").unwrap();
        ensure_mounted().unwrap();
        let watch = MutationWatch::start(&document()).unwrap();

        document().body().unwrap().set_inner_html("");
        next_tick().await;

        let mount = current().unwrap();
        assert!(mount.shell().is_connected());
        assert_eq!(mount.config().brand_label, "Acme");

        drop(watch);
    }
}
