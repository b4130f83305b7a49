//! Interactivity for a static portfolio page, compiled to WebAssembly.
//!
//! On load the [`page::PageController`] attaches every effect to the
//! already-rendered document. The functions below are also exported to JS so
//! a host page can call them directly.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::js_sys::{Array, Function, Reflect};
use web_sys::{Element, Event, HtmlButtonElement};

pub mod a11y;
pub mod config;
pub mod dom;
pub mod form;
pub mod page;
pub mod rate_limit;
pub mod reveal;
pub mod scroll;
pub mod timer;
pub mod toast;
pub mod typewriter;
pub mod viewport;

use config::PageConfig;
use dom::EventListener;
use form::{ContactForm, LoadingState, Submission};
use page::{Mounted, Page, PageController};
use rate_limit::RateLimited;
use timer::BrowserScheduler;

thread_local! {
    static MOUNTED: RefCell<Option<Mounted>> = RefCell::new(None);
}

/// Attaches every effect to the current document. Whatever an earlier call
/// attached is detached first, so the page is never mounted twice.
#[wasm_bindgen(js_name = mountPage)]
pub fn mount_page() -> Result<(), JsValue> {
    drop(MOUNTED.with(|slot| slot.borrow_mut().take()));
    let page = Page::current()?;
    let mounted = PageController::default().mount(&page);
    MOUNTED.with(|slot| *slot.borrow_mut() = Some(mounted));
    Ok(())
}

fn mount_or_warn() {
    if let Err(e) = mount_page() {
        log::warn!("page not mounted: {:?}", e);
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    let document = match dom::document() {
        Ok(document) => document,
        Err(e) => {
            log::warn!("not running in a page: {}", e);
            return;
        }
    };

    let ready_state = Reflect::get(&document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|v| v.as_string());
    if ready_state.as_deref() == Some("loading") {
        match EventListener::new(&document, "DOMContentLoaded", |_| mount_or_warn()) {
            Ok(listener) => listener.forget(),
            Err(e) => log::warn!("cannot wait for DOMContentLoaded: {}", e),
        }
    } else {
        mount_or_warn();
    }
}

#[wasm_bindgen(js_name = scrollToSection)]
pub fn scroll_to_section(section_id: &str) -> Result<bool, JsValue> {
    Ok(scroll::scroll_to_section(&dom::document()?, section_id))
}

#[wasm_bindgen(js_name = showToast)]
pub fn show_toast(title: &str, description: &str) -> Result<(), JsValue> {
    let document = dom::document()?;
    let config = PageConfig::load(&document);
    toast::show_toast(&document, &config, title, description);
    Ok(())
}

/// Takes `{name, email, message}` and returns the list of error messages.
#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(data: JsValue) -> Result<JsValue, JsValue> {
    let data: ContactForm = serde_wasm_bindgen::from_value(data)?;
    let errors: Vec<String> = form::validate_form(&data).iter().map(|e| e.to_string()).collect();
    Ok(serde_wasm_bindgen::to_value(&errors)?)
}

/// Returns `true` when the submission passed validation.
#[wasm_bindgen(js_name = handleFormSubmit)]
pub fn handle_form_submit(event: &Event) -> Result<bool, JsValue> {
    let document = dom::document()?;
    let config = PageConfig::load(&document);
    let outcome = form::handle_form_submit(event, &document, &config)?;
    Ok(outcome == Submission::Accepted)
}

/// A JS function behind a trailing-edge rate limiter. Call it with an array
/// of arguments: `limited.call([a, b])`.
#[wasm_bindgen(js_name = RateLimited)]
pub struct JsRateLimited {
    inner: RateLimited<Array, BrowserScheduler>,
}

#[wasm_bindgen(js_class = RateLimited)]
impl JsRateLimited {
    pub fn call(&self, args: Array) {
        self.inner.call(args);
    }

    pub fn cancel(&self) {
        self.inner.cancel();
    }

    #[wasm_bindgen(getter)]
    pub fn pending(&self) -> bool {
        self.inner.is_pending()
    }
}

fn js_callback(func: Function) -> impl Fn(Array) + 'static {
    move |args: Array| {
        if let Err(e) = func.apply(&JsValue::NULL, &args) {
            log::warn!("rate-limited callback threw: {:?}", e);
        }
    }
}

#[wasm_bindgen]
pub fn throttle(func: Function, wait: u32) -> JsRateLimited {
    JsRateLimited {
        inner: rate_limit::throttle(js_callback(func), wait, BrowserScheduler),
    }
}

#[wasm_bindgen]
pub fn debounce(func: Function, wait: u32) -> JsRateLimited {
    JsRateLimited {
        inner: rate_limit::debounce(js_callback(func), wait, BrowserScheduler),
    }
}

#[wasm_bindgen(js_name = isInViewport)]
pub fn is_in_viewport(element: &Element) -> Result<bool, JsValue> {
    Ok(viewport::is_in_viewport(&dom::window()?, element))
}

#[wasm_bindgen(js_name = addLoadingState)]
pub fn add_loading_state(button: &HtmlButtonElement, loading_text: Option<String>) -> LoadingState {
    LoadingState::apply(button, loading_text.as_deref().unwrap_or(form::DEFAULT_LOADING_TEXT))
}

/// Returns `true` when the light theme is now on.
#[wasm_bindgen(js_name = toggleTheme)]
pub fn toggle_theme() -> Result<bool, JsValue> {
    Ok(page::toggle_theme(&dom::document()?)?)
}

#[wasm_bindgen(js_name = typeWriter)]
pub fn type_writer(element: Element, text: &str, speed: Option<u32>) {
    let speed = speed.unwrap_or(config::TYPEWRITER_SPEED_MS);
    let _typing = typewriter::type_writer(text, speed, BrowserScheduler, move |shown| {
        element.set_text_content(Some(shown));
    });
}
