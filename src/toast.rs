use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, Element};

use crate::config::PageConfig;
use crate::timer::{BrowserScheduler, Scheduler};

pub const TOAST_ID: &str = "toast";
pub const SHOW_CLASS: &str = "show";
pub const HIDDEN_CLASS: &str = "hidden";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToastMessage {
    pub title: String,
    pub description: String,
}

impl ToastMessage {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Where a toast is drawn. The page implementation writes to `#toast`.
pub trait ToastSurface: 'static {
    fn set_content(&self, message: &ToastMessage);
    fn set_showing(&self, showing: bool);
    fn set_hidden(&self, hidden: bool);
}

/// A single notification widget with two-phase auto dismissal.
///
/// `show` puts the text up right away. After `display_ms` the `show` class is
/// removed so the CSS fade starts, and after a further `fade_ms` the widget
/// is marked `hidden`. Showing again cancels both phases of the earlier call.
pub struct Toast<V: ToastSurface, S: Scheduler> {
    surface: Rc<V>,
    scheduler: S,
    display_ms: u32,
    fade_ms: u32,
    display_timer: RefCell<Option<S::Handle>>,
    fade_timer: Rc<RefCell<Option<S::Handle>>>,
}

impl<V: ToastSurface, S: Scheduler> Toast<V, S> {
    pub fn new(surface: V, scheduler: S, display_ms: u32, fade_ms: u32) -> Self {
        Self {
            surface: Rc::new(surface),
            scheduler,
            display_ms,
            fade_ms,
            display_timer: RefCell::new(None),
            fade_timer: Rc::new(RefCell::new(None)),
        }
    }

    pub fn show(&self, message: &ToastMessage) {
        let stale_fade = self.fade_timer.borrow_mut().take();
        drop(stale_fade);

        self.surface.set_content(message);
        self.surface.set_hidden(false);
        self.surface.set_showing(true);

        let surface = self.surface.clone();
        let scheduler = self.scheduler.clone();
        let fade_timer = self.fade_timer.clone();
        let fade_ms = self.fade_ms;
        let handle = self.scheduler.schedule(
            self.display_ms,
            Box::new(move || {
                surface.set_showing(false);
                let hide = scheduler.schedule(fade_ms, Box::new(move || surface.set_hidden(true)));
                *fade_timer.borrow_mut() = Some(hide);
            }),
        );
        let stale_display = self.display_timer.borrow_mut().replace(handle);
        drop(stale_display);
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }
}

/// The `#toast` node with its title and description children.
pub struct DomToast {
    root: Element,
    title: Option<Element>,
    description: Option<Element>,
}

impl DomToast {
    /// `None` when the page has no `#toast`, so callers can skip quietly.
    pub fn find(document: &Document) -> Option<Self> {
        let root = document.get_element_by_id(TOAST_ID)?;
        let title = root.query_selector(".toast-title").ok().flatten();
        let description = root.query_selector(".toast-description").ok().flatten();
        if title.is_none() || description.is_none() {
            log::warn!("#toast is missing its title or description node");
        }
        Some(Self {
            root,
            title,
            description,
        })
    }

    fn toggle(&self, class: &str, on: bool) {
        let _ = self.root.class_list().toggle_with_force(class, on);
    }
}

impl ToastSurface for DomToast {
    fn set_content(&self, message: &ToastMessage) {
        if let Some(title) = &self.title {
            title.set_text_content(Some(&message.title));
        }
        if let Some(description) = &self.description {
            description.set_text_content(Some(&message.description));
        }
    }

    fn set_showing(&self, showing: bool) {
        self.toggle(SHOW_CLASS, showing);
    }

    fn set_hidden(&self, hidden: bool) {
        self.toggle(HIDDEN_CLASS, hidden);
        let _ = self
            .root
            .set_attribute("aria-hidden", if hidden { "true" } else { "false" });
    }
}

pub type PageToast = Toast<DomToast, BrowserScheduler>;

thread_local! {
    static PAGE_TOAST: RefCell<Option<Rc<PageToast>>> = RefCell::new(None);
}

/// The page's toast singleton, built on first use.
///
/// Kept for the page lifetime so its dismissal timers outlive the handler
/// that triggered them.
pub fn page_toast(document: &Document, config: &PageConfig) -> Option<Rc<PageToast>> {
    PAGE_TOAST.with(|cell| {
        if let Some(toast) = cell.borrow().as_ref() {
            return Some(toast.clone());
        }
        let surface = DomToast::find(document)?;
        let toast = Rc::new(Toast::new(
            surface,
            BrowserScheduler,
            config.toast_display_ms,
            config.toast_fade_ms,
        ));
        *cell.borrow_mut() = Some(toast.clone());
        Some(toast)
    })
}

pub fn show_toast(document: &Document, config: &PageConfig, title: &str, description: &str) {
    match page_toast(document, config) {
        Some(toast) => toast.show(&ToastMessage::new(title, description)),
        None => log::warn!("no #{} on the page, dropping toast: {}", TOAST_ID, title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::manual::ManualScheduler;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeSurface {
        content: RefCell<Option<ToastMessage>>,
        showing: Cell<bool>,
        hidden: Cell<bool>,
    }

    impl ToastSurface for FakeSurface {
        fn set_content(&self, message: &ToastMessage) {
            *self.content.borrow_mut() = Some(message.clone());
        }
        fn set_showing(&self, showing: bool) {
            self.showing.set(showing);
        }
        fn set_hidden(&self, hidden: bool) {
            self.hidden.set(hidden);
        }
    }

    fn toast() -> (Toast<FakeSurface, ManualScheduler>, ManualScheduler) {
        let clock = ManualScheduler::new();
        let surface = FakeSurface {
            hidden: Cell::new(true),
            ..Default::default()
        };
        (Toast::new(surface, clock.clone(), 3000, 300), clock)
    }

    #[test]
    fn shows_then_fades_then_hides() {
        let (toast, clock) = toast();
        toast.show(&ToastMessage::new("Hi", "there"));

        let s = toast.surface();
        assert!(s.showing.get());
        assert!(!s.hidden.get());
        assert_eq!(s.content.borrow().as_ref().unwrap().title, "Hi");

        clock.advance(3000);
        assert!(!s.showing.get());
        assert!(!s.hidden.get(), "still in layout while fading");

        clock.advance(299);
        assert!(!s.hidden.get());
        clock.advance(1);
        assert!(s.hidden.get());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn second_show_restarts_the_cycle() {
        let (toast, clock) = toast();
        toast.show(&ToastMessage::new("First", "one"));
        clock.advance(2000);
        toast.show(&ToastMessage::new("Second", "two"));

        let s = toast.surface();
        assert_eq!(s.content.borrow().as_ref().unwrap().title, "Second");

        // The first call's 3000ms mark passes without the fade starting.
        clock.advance(1500);
        assert!(s.showing.get());

        clock.advance(1500);
        assert!(!s.showing.get());
        clock.advance(299);
        assert!(!s.hidden.get());
        clock.advance(1);
        assert!(s.hidden.get());
    }

    #[test]
    fn show_during_fade_cancels_the_pending_hide() {
        let (toast, clock) = toast();
        toast.show(&ToastMessage::new("First", "one"));
        clock.advance(3100);
        toast.show(&ToastMessage::new("Second", "two"));

        clock.advance(250);
        let s = toast.surface();
        assert!(s.showing.get());
        assert!(!s.hidden.get());
        assert_eq!(clock.pending(), 1);
    }
}
