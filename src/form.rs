use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, FormData, HtmlButtonElement, HtmlFormElement};

use crate::config::PageConfig;
use crate::dom::{DomError, EventListener};
use crate::toast::{self, ToastMessage};

pub const FORM_ID: &str = "contactForm";

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_MESSAGE_LEN: usize = 10;

pub const ERROR_TITLE: &str = "Validation Error";
pub const SENT_TITLE: &str = "Message Sent!";
pub const SENT_DESCRIPTION: &str = "Thank you for your message. I'll get back to you soon!";

// Coarse syntactic check, not RFC 5322. The part class excludes the same
// whitespace as `is_page_space`.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    let part = r"[^\s\x{FEFF}@--\x{85}]+";
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern compiles")
});

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name must be at least 2 characters long")]
    NameTooShort,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Message must be at least 10 characters long")]
    MessageTooShort,
}

/// Whitespace as the browser trims it: Unicode `White_Space` plus the BOM,
/// minus NEL.
fn is_page_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

/// Length in UTF-16 units, the unit browser string lengths use.
fn trimmed_len(value: &str) -> usize {
    value.trim_matches(is_page_space).encode_utf16().count()
}

fn trimmed_len_at_least(value: Option<&str>, min: usize) -> bool {
    value.map_or(false, |v| trimmed_len(v) >= min)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks every field and returns all violations in field order.
pub fn validate_form(data: &ContactForm) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !trimmed_len_at_least(data.name.as_deref(), MIN_NAME_LEN) {
        errors.push(ValidationError::NameTooShort);
    }
    if !data.email.as_deref().map_or(false, is_valid_email) {
        errors.push(ValidationError::InvalidEmail);
    }
    if !trimmed_len_at_least(data.message.as_deref(), MIN_MESSAGE_LEN) {
        errors.push(ValidationError::MessageTooShort);
    }

    errors
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Rejected(ValidationError),
    Accepted,
}

impl Submission {
    pub fn evaluate(data: &ContactForm) -> Self {
        match validate_form(data).first() {
            Some(first) => Submission::Rejected(*first),
            None => Submission::Accepted,
        }
    }

    /// The one toast a submission produces.
    pub fn toast(&self) -> ToastMessage {
        match self {
            Submission::Rejected(err) => ToastMessage::new(ERROR_TITLE, err.to_string()),
            Submission::Accepted => ToastMessage::new(SENT_TITLE, SENT_DESCRIPTION),
        }
    }
}

impl ContactForm {
    pub fn read(form: &HtmlFormElement) -> Result<Self, DomError> {
        let data = FormData::new_with_form(form)?;
        let field = |name: &str| data.get(name).as_string();
        Ok(Self {
            name: field("name"),
            email: field("email"),
            message: field("message"),
        })
    }
}

/// Submit handler for the contact form: validate, show one toast, and reset
/// the form when it passed. Nothing is sent anywhere.
pub fn handle_form_submit(
    event: &Event,
    document: &Document,
    config: &PageConfig,
) -> Result<Submission, DomError> {
    event.prevent_default();

    let form = event
        .target()
        .and_then(|t| t.dyn_into::<HtmlFormElement>().ok())
        .ok_or(DomError::WrongType("form"))?;
    let data = ContactForm::read(&form)?;
    let outcome = Submission::evaluate(&data);

    let message = outcome.toast();
    toast::show_toast(document, config, &message.title, &message.description);

    match &outcome {
        Submission::Accepted => {
            log::info!("contact form accepted");
            form.reset();
        }
        Submission::Rejected(err) => log::debug!("contact form rejected: {}", err),
    }
    Ok(outcome)
}

pub fn bind_contact_form(document: &Document, config: &PageConfig) -> Result<EventListener, DomError> {
    let form = document
        .get_element_by_id(FORM_ID)
        .ok_or_else(|| DomError::Missing(format!("#{}", FORM_ID)))?;

    let document = document.clone();
    let config = config.clone();
    EventListener::new(&form, "submit", move |event| {
        if let Err(e) = handle_form_submit(&event, &document, &config) {
            log::warn!("contact form submit failed: {}", e);
        }
    })
}

pub const DEFAULT_LOADING_TEXT: &str = "Loading...";

/// Swaps a button into a disabled "loading" state until `restore` is called.
#[wasm_bindgen]
pub struct LoadingState {
    button: HtmlButtonElement,
    original_text: Option<String>,
}

impl LoadingState {
    pub fn apply(button: &HtmlButtonElement, loading_text: &str) -> Self {
        let original_text = button.text_content();
        button.set_text_content(Some(loading_text));
        button.set_disabled(true);
        Self {
            button: button.clone(),
            original_text,
        }
    }
}

#[wasm_bindgen]
impl LoadingState {
    pub fn restore(self) {
        self.button.set_text_content(self.original_text.as_deref());
        self.button.set_disabled(false);
    }
}
