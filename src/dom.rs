//! Thin helpers over web-sys: lookups that report what is missing instead of
//! unwrapping, and an owned event listener that detaches itself on drop.

use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

#[derive(Debug, Error)]
pub enum DomError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("element not found: {0}")]
    Missing(String),
    #[error("element is not a {0}")]
    WrongType(&'static str),
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<DomError> for JsValue {
    fn from(err: DomError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub fn window() -> Result<Window, DomError> {
    web_sys::window().ok_or(DomError::NoWindow)
}

pub fn document() -> Result<Document, DomError> {
    window()?.document().ok_or(DomError::NoDocument)
}

pub fn body(document: &Document) -> Result<HtmlElement, DomError> {
    document.body().ok_or(DomError::NoBody)
}

/// First match for `selector`, `None` when nothing matches or the selector
/// does not parse.
pub fn query(root: &Document, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// Every `HtmlElement` matching `selector`, in document order.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, DomError> {
    let list = document.query_selector_all(selector)?;
    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) -> Result<(), DomError> {
    el.style().set_property(property, value)?;
    Ok(())
}

/// `"{n}ms"`, the form `animation-delay` takes.
pub fn ms(n: u32) -> String {
    format!("{}ms", n)
}

/// A registered DOM event listener. Dropping it removes the listener.
pub struct EventListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    pub fn new<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self, DomError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }

    pub fn event(&self) -> &'static str {
        self.event
    }

    /// Keeps the listener attached for the rest of the page's life.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_render_as_css_milliseconds() {
        assert_eq!(ms(0), "0ms");
        assert_eq!(ms(300), "300ms");
    }

    #[test]
    fn dom_errors_name_what_is_missing() {
        assert_eq!(DomError::Missing("#toast".into()).to_string(), "element not found: #toast");
        assert_eq!(DomError::WrongType("form").to_string(), "element is not a form");
    }
}
