use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Where extracted text is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Disabled,
    Clipboard,
    Url,
    Lookup,
}

impl Default for Destination {
    fn default() -> Self {
        Destination::Disabled
    }
}

/// What [`handle_text`] decided to do with the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Delivered to its destination, or dropped for `Disabled`.
    Delivered,
    /// The text needs an in-browser lookup, which has to run on the thread
    /// owning the introspection connection.
    NeedsLookup(String),
}

/// Substitute the percent-encoded `text` for `{text}` in `format`.
pub fn format_url(format: &str, text: &str) -> String {
    format.replace("{text}", &urlencoding::encode(text))
}

/// Place `text` on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

/// Open the configured URL with `text` substituted in, using the system
/// handler.
pub fn open_url(url_format: &str, text: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(&format_url(url_format, text))?;
    tracing::info!("opening {url}");
    open::that(url.as_str())?;
    Ok(())
}

/// Route `text` to `destination`.
///
/// Lookup is not performed here: it is handed back to the caller as
/// [`Routed::NeedsLookup`] so the service can start the automation on its
/// own queue.
pub fn handle_text(
    settings: &Settings,
    destination: Destination,
    text: &str,
) -> anyhow::Result<Routed> {
    match destination {
        Destination::Disabled => {}
        Destination::Clipboard => copy_to_clipboard(text)?,
        Destination::Url => open_url(&settings.url_format, text)?,
        Destination::Lookup => return Ok(Routed::NeedsLookup(text.to_string())),
    }
    Ok(Routed::Delivered)
}

/// Route the current clipboard contents to the configured clipboard
/// destination. An empty clipboard is a no-op.
pub fn route_clipboard(settings: &Settings) -> anyhow::Result<Routed> {
    let mut clipboard = arboard::Clipboard::new()?;
    let text = clipboard.get_text().unwrap_or_default();
    if text.is_empty() {
        return Ok(Routed::Delivered);
    }
    handle_text(settings, settings.clipboard_destination, &text)
}
