//! Small fallible wrappers over `web_sys` globals and element creation.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, Window};

use crate::error::{DomResultExt, WidgetError, WidgetResult};

pub fn window() -> WidgetResult<Window> {
    web_sys::window().ok_or(WidgetError::NoWindow)
}

pub fn document() -> WidgetResult<Document> {
    window()?.document().ok_or(WidgetError::NoDocument)
}

/// Create `<tag class="...">` with optional text content
pub fn element(document: &Document, tag: &str, class: &str, text: Option<&str>) -> WidgetResult<Element> {
    let el = document.create_element(tag).dom("createElement")?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if let Some(text) = text {
        el.set_text_content(Some(text));
    }
    Ok(el)
}

/// Create a `<button type="button">`
pub fn button(document: &Document, class: &str, text: &str, label: &str) -> WidgetResult<Element> {
    let el = element(document, "button", class, Some(text))?;
    el.set_attribute("type", "button").dom("setAttribute")?;
    el.set_attribute("aria-label", label).dom("setAttribute")?;
    Ok(el)
}

pub fn html_element(el: Element) -> WidgetResult<HtmlElement> {
    el.dyn_into::<HtmlElement>().map_err(|_| WidgetError::Dom {
        op: "dyn_into<HtmlElement>",
        detail: "element is not an HtmlElement".to_string(),
    })
}

/// Keep an event inside the widget
pub fn swallow(event: &Event) {
    event.stop_propagation();
    event.prevent_default();
}
