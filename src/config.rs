use log::Level;
use serde::Deserialize;
use thiserror::Error;

pub const TOAST_DISPLAY_MS: u32 = 3000;
pub const TOAST_FADE_MS: u32 = 300; // matches the CSS transition on #toast
pub const SCROLL_THROTTLE_MS: u32 = 16; // ~60fps
pub const RESIZE_DEBOUNCE_MS: u32 = 250;
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const STAGGER_STEP_MS: u32 = 100;
pub const PARALLAX_RATE: f64 = -0.5;
pub const FLOAT_DELAY_MAX_S: f64 = 3.0;
pub const TYPEWRITER_SPEED_MS: u32 = 100;

/// Id of the optional `<script type="application/json">` block with overrides.
pub const CONFIG_ELEMENT_ID: &str = "page-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid page config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Timing and geometry knobs for the page effects.
///
/// Every field is optional in the embedded JSON; anything left out keeps the
/// default from the constants above.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub toast_display_ms: u32,
    pub toast_fade_ms: u32,
    pub scroll_throttle_ms: u32,
    pub resize_debounce_ms: u32,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub stagger_step_ms: u32,
    pub parallax_rate: f64,
    pub float_delay_max_s: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            toast_display_ms: TOAST_DISPLAY_MS,
            toast_fade_ms: TOAST_FADE_MS,
            scroll_throttle_ms: SCROLL_THROTTLE_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            reveal_threshold: REVEAL_THRESHOLD,
            reveal_root_margin: REVEAL_ROOT_MARGIN.to_string(),
            stagger_step_ms: STAGGER_STEP_MS,
            parallax_rate: PARALLAX_RATE,
            float_delay_max_s: FLOAT_DELAY_MAX_S,
        }
    }
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads `#page-config` from the document, falling back to defaults when
    /// the block is absent or malformed.
    pub fn load(document: &web_sys::Document) -> Self {
        let raw = match document.get_element_by_id(CONFIG_ELEMENT_ID) {
            Some(el) => el.text_content().unwrap_or_default(),
            None => return Self::default(),
        };
        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_gives_defaults() {
        assert_eq!(PageConfig::from_json("  \n").unwrap(), PageConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PageConfig::from_json(r#"{"toast_display_ms": 5000, "parallax_rate": -0.25}"#)
            .unwrap();
        assert_eq!(config.toast_display_ms, 5000);
        assert_eq!(config.parallax_rate, -0.25);
        assert_eq!(config.toast_fade_ms, TOAST_FADE_MS);
        assert_eq!(config.reveal_root_margin, REVEAL_ROOT_MARGIN);
    }

    #[test]
    fn malformed_block_is_an_error() {
        let err = PageConfig::from_json("{toast_display_ms: }").unwrap_err();
        assert!(err.to_string().starts_with("invalid page config"));
    }
}
