use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent};

use crate::dom::{DomError, EventListener};

pub const INTERACTIVE: &str = "button, a, input, textarea, select";
pub const FOCUSED_CLASS: &str = "focused";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Escape. Reserved for closing overlays; the page has none yet.
    CloseOverlays,
    /// Enter on a focused `<button>`.
    ActivateButton,
    Ignore,
}

pub fn key_action(key: &str, target_tag: Option<&str>) -> KeyAction {
    match key {
        "Escape" => KeyAction::CloseOverlays,
        "Enter" if target_tag.map_or(false, |t| t.eq_ignore_ascii_case("button")) => {
            KeyAction::ActivateButton
        }
        _ => KeyAction::Ignore,
    }
}

fn event_element(event: &Event) -> Option<Element> {
    event.target().and_then(|t| t.dyn_into::<Element>().ok())
}

pub fn bind_keyboard(document: &Document) -> Result<EventListener, DomError> {
    EventListener::new(document, "keydown", |event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>().map(|k| k.key()) else {
            return;
        };
        let target = event_element(&event);
        match key_action(&key, target.as_ref().map(|t| t.tag_name()).as_deref()) {
            KeyAction::CloseOverlays => log::debug!("escape pressed, no overlay open"),
            KeyAction::ActivateButton => {
                if let Some(button) = target.and_then(|t| t.dyn_into::<HtmlElement>().ok()) {
                    button.click();
                }
            }
            KeyAction::Ignore => {}
        }
    })
}

fn set_focused(event: &Event, focused: bool) {
    if let Some(el) = event_element(event) {
        if el.matches(INTERACTIVE).unwrap_or(false) {
            let _ = el.class_list().toggle_with_force(FOCUSED_CLASS, focused);
        }
    }
}

/// `focusin` / `focusout` pair keeping `focused` on interactive elements.
pub fn bind_focus_tracking(document: &Document) -> Result<[EventListener; 2], DomError> {
    Ok([
        EventListener::new(document, "focusin", |event| set_focused(&event, true))?,
        EventListener::new(document, "focusout", |event| set_focused(&event, false))?,
    ])
}
