//! Thin wrappers over `window`: navigation, query string, dialogs, files.
//!
//! Every function is callable outside the browser and does nothing there, so
//! page logic that uses them still runs in native tests.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

use eventboard::moderation::Prompt;
use eventboard::nav::Page;
#[cfg(feature = "csr")]
use eventboard::submission::ImageFile;

/// Full-page navigation.
pub fn navigate(page: Page) {
    navigate_href(&page.href());
}

pub fn navigate_href(href: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            if window.location().set_href(href).is_err() {
                log::warn!("navigation to {href} failed");
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = href;
    }
}

/// The current `?query` string, or empty.
pub fn location_search() -> String {
    #[cfg(feature = "csr")]
    {
        web_sys::window().and_then(|w| w.location().search().ok()).unwrap_or_default()
    }
    #[cfg(not(feature = "csr"))]
    {
        String::new()
    }
}

/// Milliseconds since the epoch, for upload keys.
pub fn now_ms() -> i64 {
    #[cfg(feature = "csr")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let now = js_sys::Date::now() as i64;
        now
    }
    #[cfg(not(feature = "csr"))]
    {
        0
    }
}

pub fn set_document_title(title: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            document.set_title(title);
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = title;
    }
}

/// `window.confirm` / `window.alert`. Outside the browser every confirmation
/// is declined.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserPrompt;

impl Prompt for BrowserPrompt {
    fn confirm(&self, message: &str) -> bool {
        #[cfg(feature = "csr")]
        {
            web_sys::window().and_then(|w| w.confirm_with_message(message).ok()).unwrap_or(false)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = message;
            false
        }
    }

    fn notify(&self, message: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(message);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = message;
        }
    }
}

/// Run `callback` whenever the page is restored from the back/forward cache.
pub fn on_page_restored(callback: impl Fn() + 'static) {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast as _;
        use wasm_bindgen::prelude::Closure;

        let Some(window) = web_sys::window() else {
            return;
        };
        let listener = Closure::<dyn Fn(web_sys::PageTransitionEvent)>::new(move |ev: web_sys::PageTransitionEvent| {
            if ev.persisted() {
                callback();
            }
        });
        if window.add_event_listener_with_callback("pageshow", listener.as_ref().unchecked_ref()).is_err() {
            log::warn!("could not install pageshow listener");
        }
        // The listener lives as long as the page.
        listener.forget();
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = callback;
    }
}

/// Read the first file picked in `input`. `None` when nothing is selected.
#[cfg(feature = "csr")]
pub async fn read_picked_file(input: &web_sys::HtmlInputElement) -> Result<Option<ImageFile>, String> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("could not read {}: {e:?}", file.name()))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(Some(ImageFile { name: file.name(), content_type: file.type_(), bytes }))
}
