//! Isolated Mount Builder
//!
//! Builds the widget's only top-level node, `div#sasha-widget-shell`, fixed in
//! the bottom-right corner. Everything else lives behind an open shadow root:
//!
//! ```text
//! #sasha-widget-shell
//!   └─ #shadow-root
//!        ├─ <style>
//!        ├─ .panel            (hidden until opened)
//!        │    ├─ header: title, mode badge, close button
//!        │    └─ .body: intro, "Check connection", status line
//!        └─ .launcher         (circular toggle)
//! ```
//!
//! [`ensure_mounted`] is idempotent: it only builds when no shell is present,
//! which lets the presence guardian call it on every DOM mutation.

use std::cell::{Cell, OnceCell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, KeyboardEvent, Node, ShadowRoot,
    ShadowRootInit, ShadowRootMode,
};

use crate::boundary;
use crate::config::WidgetConfig;
use crate::debug;
use crate::dom;
use crate::error::{describe, DomResultExt, WidgetError, WidgetResult};
use crate::panel::{PanelAction, PanelState};
use crate::probe::{self, ProbeResult};
use crate::styles::SHADOW_CSS;

/// Reserved id of the mount handle
pub const MOUNT_ID: &str = "sasha-widget-shell";

/// Highest z-index browsers honour
const MAX_Z_INDEX: &str = "2147483647";

const NO_BACKEND_STATUS: &str = "No backend set yet.";

thread_local! {
    static CURRENT: RefCell<Option<Rc<Mount>>> = const { RefCell::new(None) };
    static ESCAPE_LISTENER: OnceCell<Closure<dyn FnMut(Event)>> = const { OnceCell::new() };
}

/// Panel element plus its open/closed flag
#[derive(Clone)]
pub struct PanelView {
    panel: Element,
    launcher: Element,
    state: Rc<Cell<PanelState>>,
}

impl PanelView {
    pub fn state(&self) -> PanelState {
        self.state.get()
    }

    /// Move the state machine and sync the DOM
    pub fn apply(&self, action: PanelAction) -> WidgetResult<PanelState> {
        let next = self.state.get().apply(action);
        self.panel
            .class_list()
            .toggle_with_force("open", next.is_open())
            .dom("classList.toggle")?;
        self.launcher
            .set_attribute("aria-expanded", if next.is_open() { "true" } else { "false" })
            .dom("setAttribute")?;
        self.state.set(next);
        Ok(next)
    }
}

/// Listeners owned by one mount, detached when the mount is replaced
#[derive(Default)]
struct Listeners(Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>);

impl Listeners {
    fn add(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) -> WidgetResult<()> {
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .dom("addEventListener")?;
        self.0.push((target.clone(), event, closure));
        Ok(())
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for (target, event, closure) in self.0.drain(..) {
            let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

/// One live instance of the widget
pub struct Mount {
    shell: HtmlElement,
    shadow: ShadowRoot,
    status: Element,
    panel: PanelView,
    config: WidgetConfig,
    _listeners: Listeners,
}

impl Mount {
    /// Build a detached mount; the caller attaches `shell` to the document
    fn build(document: &Document, config: WidgetConfig) -> WidgetResult<Self> {
        let shell = dom::html_element(document.create_element("div").dom("createElement")?)?;
        shell.set_id(MOUNT_ID);
        let style = shell.style();
        style.set_property("position", "fixed").dom("style.position")?;
        style.set_property("inset", "auto 16px 16px auto").dom("style.inset")?;
        style.set_property("z-index", MAX_Z_INDEX).dom("style.zIndex")?;

        let shadow = shell
            .attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
            .map_err(|e| WidgetError::ShadowRootUnavailable(describe(&e)))?;

        let css = dom::element(document, "style", "", Some(SHADOW_CSS))?;
        shadow.append_child(&css).dom("appendChild")?;

        // Panel
        let panel = dom::element(document, "div", "panel", None)?;
        panel.set_attribute("role", "dialog").dom("setAttribute")?;
        panel
            .set_attribute("aria-label", &format!("{} Assistant", config.brand_label))
            .dom("setAttribute")?;

        let header = dom::element(document, "header", "", None)?;
        let title = dom::element(
            document,
            "span",
            "title",
            Some(&format!("{} Assistant", config.brand_label)),
        )?;
        let badge = dom::element(document, "span", "badge", Some(&config.mode))?;
        let close = dom::button(document, "close", "×", "Close")?;
        header.append_child(&title).dom("appendChild")?;
        header.append_child(&badge).dom("appendChild")?;
        header.append_child(&close).dom("appendChild")?;

        let body = dom::element(document, "div", "body", None)?;
        let intro = dom::element(
            document,
            "div",
            "",
            Some("I'm live on your store. Try a quick check:"),
        )?;
        let row = dom::element(document, "div", "row", None)?;
        let check = dom::button(document, "primary", "Check connection", "Check backend connection")?;
        row.append_child(&check).dom("appendChild")?;
        let initial_status = if config.has_backend() {
            format!("Backend: {}", config.api_base_url)
        } else {
            NO_BACKEND_STATUS.to_string()
        };
        let status = dom::element(document, "div", "status", Some(&initial_status))?;
        status.set_attribute("role", "status").dom("setAttribute")?;
        status.set_attribute("aria-live", "polite").dom("setAttribute")?;
        body.append_child(&intro).dom("appendChild")?;
        body.append_child(&row).dom("appendChild")?;
        body.append_child(&status).dom("appendChild")?;

        panel.append_child(&header).dom("appendChild")?;
        panel.append_child(&body).dom("appendChild")?;
        shadow.append_child(&panel).dom("appendChild")?;

        // Launcher
        let launcher = dom::button(
            document,
            "launcher",
            "✨",
            &format!("Open {} Assistant", config.brand_label),
        )?;
        launcher.set_attribute("aria-expanded", "false").dom("setAttribute")?;
        shadow.append_child(&launcher).dom("appendChild")?;

        let view = PanelView {
            panel: panel.clone(),
            launcher: launcher.clone(),
            state: Rc::new(Cell::new(PanelState::Closed)),
        };

        let mut listeners = Listeners::default();

        let toggle_view = view.clone();
        listeners.add(
            &launcher,
            "click",
            boundary::listener("toggle", move |event| {
                dom::swallow(&event);
                toggle_view.apply(PanelAction::Toggle).map(|_| ())
            }),
        )?;

        let close_view = view.clone();
        listeners.add(
            &close,
            "click",
            boundary::listener("close", move |event| {
                dom::swallow(&event);
                close_view.apply(PanelAction::Close).map(|_| ())
            }),
        )?;

        let probe_config = config.clone();
        let probe_status = status.clone();
        listeners.add(
            &check,
            "click",
            boundary::listener("check connection", move |event| {
                dom::swallow(&event);
                run_probe(probe_config.clone(), probe_status.clone());
                Ok(())
            }),
        )?;

        // Clicks and key presses inside the panel stay inside the panel
        listeners.add(
            &panel,
            "click",
            boundary::listener("panel click", |event| {
                event.stop_propagation();
                Ok(())
            }),
        )?;

        let key_view = view.clone();
        listeners.add(
            &panel,
            "keydown",
            boundary::listener("panel keydown", move |event| {
                event.stop_propagation();
                if is_escape(&event) {
                    event.prevent_default();
                    key_view.apply(PanelAction::Escape)?;
                }
                Ok(())
            }),
        )?;

        Ok(Self {
            shell,
            shadow,
            status,
            panel: view,
            config,
            _listeners: listeners,
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn panel(&self) -> &PanelView {
        &self.panel
    }

    pub fn panel_state(&self) -> PanelState {
        self.panel.state()
    }

    pub fn shell(&self) -> &HtmlElement {
        &self.shell
    }

    pub fn shadow_root(&self) -> &ShadowRoot {
        &self.shadow
    }

    /// Current text of the status line
    pub fn status_text(&self) -> String {
        self.status.text_content().unwrap_or_default()
    }

    fn set_status(&self, text: &str) {
        self.status.set_text_content(Some(text));
    }
}

/// The mount created most recently, if any
pub fn current() -> Option<Rc<Mount>> {
    CURRENT.with(|current| current.borrow().clone())
}

/// Mount the widget unless a shell is already present.
///
/// Returns `true` when a new mount was built. Extra shells carrying the
/// reserved id (for example an old shell re-inserted by the host) are removed.
pub fn ensure_mounted() -> WidgetResult<bool> {
    let document = dom::document()?;
    let shells = document
        .query_selector_all(&format!("#{}", MOUNT_ID))
        .dom("querySelectorAll")?;

    match shells.length() {
        0 => {}
        1 => return Ok(false),
        _ => {
            remove_duplicate_shells(&document)?;
            return Ok(false);
        }
    }

    let previous = current();
    let config = WidgetConfig::read_or_restore(&document, previous.as_ref().map(|m| m.config()))?;
    let mount = Mount::build(&document, config)?;

    let body = document.body().ok_or(WidgetError::NoBody)?;
    body.append_child(mount.shell()).dom("appendChild")?;

    debug::log(if previous.is_some() { "remounted" } else { "mounted" });
    CURRENT.with(|current| *current.borrow_mut() = Some(Rc::new(mount)));
    Ok(true)
}

/// Keep the current shell (or the first one found) and drop the rest
fn remove_duplicate_shells(document: &Document) -> WidgetResult<()> {
    let shells = document
        .query_selector_all(&format!("#{}", MOUNT_ID))
        .dom("querySelectorAll")?;
    let keep: Option<Node> = current().map(|mount| mount.shell().clone().into());
    let keep_index = (0..shells.length())
        .find(|&i| match (&keep, shells.get(i)) {
            (Some(keep), Some(node)) => node.is_same_node(Some(keep)),
            _ => false,
        })
        .unwrap_or(0);

    for i in 0..shells.length() {
        if i == keep_index {
            continue;
        }
        if let Some(node) = shells.get(i) {
            if let Some(parent) = node.parent_node() {
                parent.remove_child(&node).dom("removeChild")?;
            }
        }
    }
    debug::log("removed duplicate shells");
    Ok(())
}

/// Run one probe and write its outcome into `status`
fn run_probe(config: WidgetConfig, status: Element) {
    if let Some(url) = probe::health_url(&config.api_base_url) {
        status.set_text_content(Some(&probe::pending_message(&url)));
    }
    boundary::spawn("probe", async move {
        let result = probe::probe(&config).await;
        status.set_text_content(Some(&result.message()));
        Ok(())
    });
}

/// Probe the current mount's backend and return the status line
pub async fn check_health() -> WidgetResult<String> {
    let mount = match current() {
        Some(mount) => mount,
        None => {
            let config = WidgetConfig::read(&dom::document()?)?;
            return Ok(probe::probe(&config).await.message());
        }
    };

    if let Some(url) = probe::health_url(&mount.config().api_base_url) {
        mount.set_status(&probe::pending_message(&url));
    }
    let result: ProbeResult = probe::probe(mount.config()).await;
    let message = result.message();
    mount.set_status(&message);
    Ok(message)
}

/// Drop the current mount record so the next mount starts from scratch
#[cfg(test)]
pub(crate) fn forget_current() {
    CURRENT.with(|current| *current.borrow_mut() = None);
}

fn is_escape(event: &Event) -> bool {
    event
        .dyn_ref::<KeyboardEvent>()
        .map(|key| key.key() == "Escape")
        .unwrap_or(false)
}

/// Close the open panel on Escape pressed anywhere in the document.
///
/// Installed once per page. The event is left alone when the panel is
/// already closed so the host's own Escape handling keeps working.
pub fn install_escape_listener() -> WidgetResult<()> {
    if ESCAPE_LISTENER.with(|cell| cell.get().is_some()) {
        return Ok(());
    }

    let closure = boundary::listener("escape", |event| {
        if !is_escape(&event) {
            return Ok(());
        }
        let Some(mount) = current() else {
            return Ok(());
        };
        if mount.panel_state().is_open() {
            dom::swallow(&event);
            mount.panel().apply(PanelAction::Escape)?;
        }
        Ok(())
    });

    dom::document()?
        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        .dom("addEventListener")?;
    ESCAPE_LISTENER.with(|cell| {
        let _ = cell.set(closure);
    });
    Ok(())
}
