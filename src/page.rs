use web_sys::{Document, Window};

use crate::config::PageConfig;
use crate::dom::{self, DomError, EventListener};
use crate::rate_limit::{debounce, throttle};
use crate::reveal::{self, RevealObserver};
use crate::timer::BrowserScheduler;
use crate::{a11y, form, scroll, toast, viewport};

pub const LOADED_CLASS: &str = "loaded";
pub const LIGHT_THEME_CLASS: &str = "light-theme";

/// Everything an effect needs to hook itself into the page.
pub struct Page {
    pub window: Window,
    pub document: Document,
    pub config: PageConfig,
}

impl Page {
    pub fn current() -> Result<Self, DomError> {
        let window = dom::window()?;
        let document = window.document().ok_or(DomError::NoDocument)?;
        let config = PageConfig::load(&document);
        Ok(Self {
            window,
            document,
            config,
        })
    }
}

/// Listeners and observers the effects registered. They stay attached for as
/// long as this value lives and are detached when it is dropped.
#[derive(Default)]
pub struct Mounted {
    listeners: Vec<EventListener>,
    observers: Vec<RevealObserver>,
    active: Vec<&'static str>,
}

impl Mounted {
    pub fn listen(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    pub fn observe(&mut self, observer: RevealObserver) {
        self.observers.push(observer);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn active(&self) -> &[&'static str] {
        &self.active
    }
}

/// One independent piece of page behaviour, activated once at startup.
pub trait Effect {
    fn name(&self) -> &'static str;
    fn activate(&self, page: &Page, mounted: &mut Mounted) -> Result<(), DomError>;
}

pub struct ContactFormEffect;

impl Effect for ContactFormEffect {
    fn name(&self) -> &'static str {
        "contact-form"
    }

    fn activate(&self, page: &Page, mounted: &mut Mounted) -> Result<(), DomError> {
        mounted.listen(form::bind_contact_form(&page.document, &page.config)?);
        Ok(())
    }
}

pub struct ToastEffect;

impl Effect for ToastEffect {
    fn name(&self) -> &'static str {
        "toast"
    }

    fn activate(&self, page: &Page, _mounted: &mut Mounted) -> Result<(), DomError> {
        toast::page_toast(&page.document, &page.config)
            .map(|_| ())
            .ok_or_else(|| DomError::Missing(format!("#{}", toast::TOAST_ID)))
    }
}

pub struct StaggerEffect;

impl Effect for StaggerEffect {
    fn name(&self) -> &'static str {
        "stagger"
    }

    fn activate(&self, page: &Page, _mounted: &mut Mounted) -> Result<(), DomError> {
        reveal::apply_initial_stagger(&page.document, &page.config)
    }
}

pub struct RevealEffect;

impl Effect for RevealEffect {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn activate(&self, page: &Page, mounted: &mut Mounted) -> Result<(), DomError> {
        mounted.observe(RevealObserver::observe(&page.document, &page.config)?);
        Ok(())
    }
}

pub struct FloatingDotsEffect;

impl Effect for FloatingDotsEffect {
    fn name(&self) -> &'static str {
        "floating-dots"
    }

    fn activate(&self, page: &Page, _mounted: &mut Mounted) -> Result<(), DomError> {
        let n = reveal::randomize_float_dots(&page.document, &page.config)?;
        log::debug!("randomized {} floating dots", n);
        Ok(())
    }
}

pub struct ParallaxEffect;

impl Effect for ParallaxEffect {
    fn name(&self) -> &'static str {
        "parallax"
    }

    fn activate(&self, page: &Page, mounted: &mut Mounted) -> Result<(), DomError> {
        match scroll::bind_parallax(&page.document, &page.config)? {
            Some(listener) => mounted.listen(listener),
            None => log::debug!("no hero section, parallax off"),
        }
        Ok(())
    }
}

/// Throttled scroll hook. Separate from the parallax listener, which runs on
/// every scroll event.
pub struct ScrollHookEffect;

impl Effect for ScrollHookEffect {
    fn name(&self) -> &'static str {
        "scroll-hook"
    }

    fn activate(&self, page: &Page, mounted: &mut Mounted) -> Result<(), DomError> {
        let hook = throttle(|()| {}, page.config.scroll_throttle_ms, BrowserScheduler);
        mounted.listen(EventListener::new(&page.window, "scroll", move |_| hook.call(()))?);
        Ok(())
    }
}

pub struct ResizeEffect;

impl Effect for ResizeEffect {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn activate(&self, page: &Page, mounted: &mut Mounted) -> Result<(), DomError> {
        let window = page.window.clone();
        let on_resize = debounce(
            move |()| {
                let (width, height) = viewport::viewport_size(&window);
                log::debug!("viewport resized to {}x{}", width, height);
            },
            page.config.resize_debounce_ms,
            BrowserScheduler,
        );
        mounted.listen(EventListener::new(&page.window, "resize", move |_| on_resize.call(()))?);
        Ok(())
    }
}

pub struct AnchorScrollEffect;

impl Effect for AnchorScrollEffect {
    fn name(&self) -> &'static str {
        "anchor-scroll"
    }

    fn activate(&self, page: &Page, mounted: &mut Mounted) -> Result<(), DomError> {
        for listener in scroll::bind_anchor_links(&page.document)? {
            mounted.listen(listener);
        }
        Ok(())
    }
}

pub struct KeyboardEffect;

impl Effect for KeyboardEffect {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn activate(&self, page: &Page, mounted: &mut Mounted) -> Result<(), DomError> {
        mounted.listen(a11y::bind_keyboard(&page.document)?);
        Ok(())
    }
}

pub struct FocusEffect;

impl Effect for FocusEffect {
    fn name(&self) -> &'static str {
        "focus"
    }

    fn activate(&self, page: &Page, mounted: &mut Mounted) -> Result<(), DomError> {
        for listener in a11y::bind_focus_tracking(&page.document)? {
            mounted.listen(listener);
        }
        Ok(())
    }
}

pub struct PageController {
    effects: Vec<Box<dyn Effect>>,
}

impl Default for PageController {
    fn default() -> Self {
        Self::with_effects(vec![
            Box::new(ContactFormEffect),
            Box::new(ToastEffect),
            Box::new(StaggerEffect),
            Box::new(RevealEffect),
            Box::new(FloatingDotsEffect),
            Box::new(ParallaxEffect),
            Box::new(ScrollHookEffect),
            Box::new(ResizeEffect),
            Box::new(AnchorScrollEffect),
            Box::new(KeyboardEffect),
            Box::new(FocusEffect),
        ])
    }
}

impl PageController {
    pub fn with_effects(effects: Vec<Box<dyn Effect>>) -> Self {
        Self { effects }
    }

    pub fn effect_names(&self) -> Vec<&'static str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    /// Activates every effect in order. One failing effect is logged and
    /// skipped; the rest still run.
    pub fn mount(&self, page: &Page) -> Mounted {
        let mut mounted = Mounted::default();
        for effect in &self.effects {
            match effect.activate(page, &mut mounted) {
                Ok(()) => {
                    log::debug!("{} active", effect.name());
                    mounted.active.push(effect.name());
                }
                Err(e) => log::warn!("{} skipped: {}", effect.name(), e),
            }
        }

        match dom::body(&page.document) {
            Ok(body) => {
                if let Err(e) = body.class_list().add_1(LOADED_CLASS) {
                    log::warn!("cannot mark page loaded: {:?}", e);
                }
            }
            Err(e) => log::warn!("cannot mark page loaded: {}", e),
        }
        log::info!("Portfolio initialized ({} effects active)", mounted.active.len());
        mounted
    }
}

pub fn toggle_theme(document: &Document) -> Result<bool, DomError> {
    let body = dom::body(document)?;
    Ok(body.class_list().toggle(LIGHT_THEME_CLASS)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_run_in_startup_order() {
        assert_eq!(
            PageController::default().effect_names(),
            vec![
                "contact-form",
                "toast",
                "stagger",
                "reveal",
                "floating-dots",
                "parallax",
                "scroll-hook",
                "resize",
                "anchor-scroll",
                "keyboard",
                "focus",
            ]
        );
    }
}
