use wasm_bindgen::JsValue;
use web_sys::{Element, Window};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

/// True when `rect` lies entirely inside a `width` × `height` viewport.
pub fn fully_visible(rect: Rect, width: f64, height: f64) -> bool {
    rect.top >= 0.0 && rect.left >= 0.0 && rect.bottom <= height && rect.right <= width
}

fn positive(value: Result<JsValue, JsValue>) -> Option<f64> {
    value.ok().and_then(|v| v.as_f64()).filter(|n| *n > 0.0)
}

/// Viewport size, preferring `innerWidth/innerHeight` and falling back to the
/// document element's client size.
pub fn viewport_size(window: &Window) -> (f64, f64) {
    let client = window.document().and_then(|d| d.document_element());

    let width = positive(window.inner_width())
        .or_else(|| client.as_ref().map(|c| f64::from(c.client_width())))
        .unwrap_or(0.0);
    let height = positive(window.inner_height())
        .or_else(|| client.as_ref().map(|c| f64::from(c.client_height())))
        .unwrap_or(0.0);
    (width, height)
}

pub fn is_in_viewport(window: &Window, element: &Element) -> bool {
    let r = element.get_bounding_client_rect();
    let (width, height) = viewport_size(window);
    fully_visible(
        Rect {
            top: r.top(),
            left: r.left(),
            bottom: r.bottom(),
            right: r.right(),
        },
        width,
        height,
    )
}
