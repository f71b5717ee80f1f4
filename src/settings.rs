use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::dispatch::Destination;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Destination for a tap on an overlay target.
    #[serde(default = "default_tap_destination")]
    pub tap_destination: Destination,
    /// Destination for a long press on an overlay target. `Disabled` makes
    /// long presses fall through.
    #[serde(default = "default_long_press_destination")]
    pub long_press_destination: Destination,
    /// Destination used when routing the current clipboard contents.
    #[serde(default)]
    pub clipboard_destination: Destination,
    /// URL opened by the `url` destination; `{text}` is replaced with the
    /// percent-encoded text.
    #[serde(default = "default_url_format")]
    pub url_format: String,
    /// Title of the browser window driven by the lookup automation.
    #[serde(default = "default_browser_window_title")]
    pub browser_window_title: String,
    /// Identifier of the browser's address bar.
    #[serde(default = "default_address_field_id")]
    pub address_field_id: String,
    /// Identifier of the browser's suggestion results container.
    #[serde(default = "default_results_container_id")]
    pub results_container_id: String,
    /// The lookup page URL; the percent-encoded query is appended.
    #[serde(default = "default_lookup_url_prefix")]
    pub lookup_url_prefix: String,
    /// Scheduled automation ticks before a lookup is abandoned.
    #[serde(default = "default_lookup_max_retries")]
    pub lookup_max_retries: u32,
    /// Milliseconds between automation ticks.
    #[serde(default = "default_lookup_poll_interval_ms")]
    pub lookup_poll_interval_ms: u64,
    /// Pixels the precise text bounds are grown by, to make small targets
    /// easier to press.
    #[serde(default = "default_grow_padding_px")]
    pub grow_padding_px: i32,
    /// Text size assumed when a node reports none.
    #[serde(default = "default_text_size_px")]
    pub default_text_size_px: f32,
    /// Reported text sizes below this are treated as bad data.
    #[serde(default = "default_implausibly_small_text_size_px")]
    pub implausibly_small_text_size_px: f32,
    /// When enabled the logger is initialised at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional log file. If `None`, logs go to stderr only.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_tap_destination() -> Destination {
    Destination::Clipboard
}

fn default_long_press_destination() -> Destination {
    Destination::Url
}

fn default_url_format() -> String {
    "https://jisho.org/search/{text}".into()
}

fn default_browser_window_title() -> String {
    "Kiwi Browser".into()
}

fn default_address_field_id() -> String {
    "com.kiwibrowser.browser:id/url_bar".into()
}

fn default_results_container_id() -> String {
    "com.kiwibrowser.browser:id/omnibox_results_container".into()
}

fn default_lookup_url_prefix() -> String {
    "chrome-extension://ogmnaimimemjmbakcfefmnahgdfhfami/search.html?query=".into()
}

fn default_lookup_max_retries() -> u32 {
    crate::automation::DEFAULT_MAX_RETRIES
}

fn default_lookup_poll_interval_ms() -> u64 {
    crate::automation::DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_grow_padding_px() -> i32 {
    crate::snapshot::GROW_PADDING_PX
}

fn default_text_size_px() -> f32 {
    crate::snapshot::DEFAULT_TEXT_SIZE_PX
}

fn default_implausibly_small_text_size_px() -> f32 {
    crate::snapshot::IMPLAUSIBLY_SMALL_TEXT_SIZE_PX
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tap_destination: default_tap_destination(),
            long_press_destination: default_long_press_destination(),
            clipboard_destination: Destination::Disabled,
            url_format: default_url_format(),
            browser_window_title: default_browser_window_title(),
            address_field_id: default_address_field_id(),
            results_container_id: default_results_container_id(),
            lookup_url_prefix: default_lookup_url_prefix(),
            lookup_max_retries: default_lookup_max_retries(),
            lookup_poll_interval_ms: default_lookup_poll_interval_ms(),
            grow_padding_px: default_grow_padding_px(),
            default_text_size_px: default_text_size_px(),
            implausibly_small_text_size_px: default_implausibly_small_text_size_px(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing or empty file yields defaults so
    /// first runs and files from older versions keep working.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Default location of the settings file.
    pub fn default_path() -> PathBuf {
        dirs_next::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("textgrab")
            .join("settings.json")
    }
}
