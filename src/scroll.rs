use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    Window,
};

use crate::config::PageConfig;
use crate::dom::{self, DomError, EventListener};

pub const ANCHOR_SELECTOR: &str = r##"a[href^="#"]"##;
pub const HERO_SECTION: &str = ".hero-section";
pub const HERO_BACKGROUND: &str = ".hero-background";

fn smooth_scroll_into_view(el: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    el.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Smooth-scrolls to the element with `id`. Returns whether one was found.
pub fn scroll_to_section(document: &Document, id: &str) -> bool {
    match document.get_element_by_id(id) {
        Some(el) => {
            smooth_scroll_into_view(&el);
            true
        }
        None => false,
    }
}

/// Smooth-scrolls to whatever an in-page `href` points at. An href that is
/// not a valid selector (a bare `#`, say) or matches nothing is ignored.
pub fn scroll_to_href(document: &Document, href: &str) -> bool {
    match dom::query(document, href) {
        Some(el) => {
            smooth_scroll_into_view(&el);
            true
        }
        None => false,
    }
}

/// One click listener per in-page anchor.
pub fn bind_anchor_links(document: &Document) -> Result<Vec<EventListener>, DomError> {
    let anchors = dom::query_all(document, ANCHOR_SELECTOR)?;
    let mut listeners = Vec::with_capacity(anchors.len());
    for anchor in anchors {
        let document = document.clone();
        let target = anchor.clone();
        listeners.push(EventListener::new(&anchor, "click", move |event| {
            event.prevent_default();
            if let Some(href) = target.get_attribute("href") {
                if !scroll_to_href(&document, &href) {
                    log::debug!("anchor target {} not found", href);
                }
            }
        })?);
    }
    Ok(listeners)
}

/// Background offset for a given scroll position, or `None` once the hero has
/// scrolled out of view and the last transform should be left alone.
pub fn parallax_offset(scroll_y: f64, viewport_height: f64, rate: f64) -> Option<f64> {
    if scroll_y < viewport_height {
        Some(scroll_y * rate)
    } else {
        None
    }
}

pub fn translate_y(offset: f64) -> String {
    // + 0.0 turns -0 into 0
    format!("translateY({}px)", offset + 0.0)
}

fn viewport_height(window: &Window) -> Option<f64> {
    window.inner_height().ok().and_then(|h| h.as_f64())
}

/// Unthrottled scroll listener moving `.hero-background`. Not installed when
/// the hero section or its background is absent.
pub fn bind_parallax(document: &Document, config: &PageConfig) -> Result<Option<EventListener>, DomError> {
    let hero = dom::query(document, HERO_SECTION);
    let background = dom::query(document, HERO_BACKGROUND)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    let background = match (hero, background) {
        (Some(_), Some(background)) => background,
        _ => return Ok(None),
    };

    let window = dom::window()?;
    let rate = config.parallax_rate;
    let win = window.clone();
    let listener = EventListener::new(&window, "scroll", move |_| {
        let scroll_y = win.scroll_y().unwrap_or(0.0);
        let Some(height) = viewport_height(&win) else {
            return;
        };
        if let Some(offset) = parallax_offset(scroll_y, height, rate) {
            let _ = dom::set_style(&background, "transform", &translate_y(offset));
        }
    })?;
    Ok(Some(listener))
}
