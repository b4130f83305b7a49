use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Math};
use web_sys::{Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::PageConfig;
use crate::dom::{self, DomError};

pub const SKILL_CARD: &str = ".skill-card";
pub const PROJECT_CARD: &str = ".project-card";
pub const REVEAL_TARGETS: &str = ".skill-card, .project-card";
pub const FLOAT_DOT: &str = ".float-dot";
pub const ANIMATE_CLASS: &str = "animate";

pub fn stagger_delay_ms(index: usize, step_ms: u32) -> u32 {
    (index as u32).saturating_mul(step_ms)
}

/// Which entries of an observer batch get revealed, and with what delay.
///
/// The delay follows the entry's position in the whole batch, so a card that
/// shares a batch with non-intersecting ones still keeps its slot.
pub fn plan_reveals(intersecting: &[bool], step_ms: u32) -> Vec<(usize, u32)> {
    intersecting
        .iter()
        .enumerate()
        .filter(|(_, hit)| **hit)
        .map(|(i, _)| (i, stagger_delay_ms(i, step_ms)))
        .collect()
}

/// `animation-delay` for a floating dot, `random` being in `[0, 1)`.
pub fn float_delay(random: f64, max_s: f64) -> String {
    format!("{}s", random * max_s)
}

/// Load-time stagger: `--i` on skill cards, an explicit delay on project cards.
pub fn apply_initial_stagger(document: &Document, config: &PageConfig) -> Result<(), DomError> {
    for (i, card) in dom::query_all(document, SKILL_CARD)?.iter().enumerate() {
        dom::set_style(card, "--i", &i.to_string())?;
    }
    for (i, card) in dom::query_all(document, PROJECT_CARD)?.iter().enumerate() {
        dom::set_style(card, "animation-delay", &dom::ms(stagger_delay_ms(i, config.stagger_step_ms)))?;
    }
    Ok(())
}

pub fn randomize_float_dots(document: &Document, config: &PageConfig) -> Result<usize, DomError> {
    let dots = dom::query_all(document, FLOAT_DOT)?;
    for dot in &dots {
        dom::set_style(dot, "animation-delay", &float_delay(Math::random(), config.float_delay_max_s))?;
    }
    Ok(dots.len())
}

/// One-shot reveal of cards as they scroll into view.
///
/// Each card gets `animate` and its stagger delay the first time it crosses
/// the threshold, then is no longer observed.
pub struct RevealObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl RevealObserver {
    pub fn observe(document: &Document, config: &PageConfig) -> Result<Self, DomError> {
        let step_ms = config.stagger_step_ms;
        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            let entries: Vec<IntersectionObserverEntry> = entries
                .iter()
                .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                .collect();
            let hits: Vec<bool> = entries.iter().map(|e| e.is_intersecting()).collect();

            for (i, delay) in plan_reveals(&hits, step_ms) {
                let target = entries[i].target();
                if let Some(card) = target.dyn_ref::<HtmlElement>() {
                    let _ = dom::set_style(card, "animation-delay", &dom::ms(delay));
                }
                let _ = target.class_list().add_1(ANIMATE_CLASS);
                observer.unobserve(&target);
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(config.reveal_threshold));
        init.set_root_margin(&config.reveal_root_margin);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        let cards = dom::query_all(document, REVEAL_TARGETS)?;
        for card in &cards {
            observer.observe(card);
        }
        log::debug!("observing {} cards for reveal", cards.len());

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for RevealObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
