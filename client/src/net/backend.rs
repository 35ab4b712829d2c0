//! Shared backend handle and session-token persistence.
//!
//! The project URL and anon key are baked in at build time
//! (`EVENTBOARD_URL`, `EVENTBOARD_ANON_KEY`). The access token lives in
//! `localStorage` so a sign-in survives full-page navigation.
//!
//! TRADE-OFFS
//! ==========
//! Storage is best-effort: when `localStorage` is unavailable every page load
//! starts signed out rather than failing.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::rc::Rc;

use eventboard::Error;
use eventboard::backend::rest::RestBackend;
use eventboard::config::ClientConfig;

#[cfg(feature = "csr")]
const TOKEN_KEY: &str = "eventboard.access_token";

/// REST client plus the config it was built from.
#[derive(Clone)]
pub struct Handle {
    pub backend: Rc<RestBackend>,
    pub config: ClientConfig,
}

thread_local! {
    static HANDLE: Result<Handle, Error> = build();
}

/// The page's backend handle, built on first use.
///
/// # Errors
///
/// Returns [`Error::Config`] when the bundle was built without a backend URL
/// or key.
pub fn handle() -> Result<Handle, Error> {
    HANDLE.with(Clone::clone)
}

/// Config from build-time values. Missing values are a configuration error.
///
/// # Errors
///
/// Returns [`Error::Config`] naming the missing value.
pub fn browser_config(url: Option<&str>, key: Option<&str>, page_size: Option<&str>) -> Result<ClientConfig, Error> {
    let url = url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| Error::Config("EVENTBOARD_URL was not set at build time".to_owned()))?;
    let key = key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| Error::Config("EVENTBOARD_ANON_KEY was not set at build time".to_owned()))?;
    let mut config = ClientConfig::new(url, key);
    if let Some(size) = page_size.and_then(|s| s.trim().parse::<usize>().ok()) {
        config.page_size = size.max(1);
    }
    Ok(config)
}

fn build() -> Result<Handle, Error> {
    let config = browser_config(
        option_env!("EVENTBOARD_URL"),
        option_env!("EVENTBOARD_ANON_KEY"),
        option_env!("EVENTBOARD_PAGE_SIZE"),
    )?;
    let backend = RestBackend::new(&config)?.with_access_token(stored_token());
    Ok(Handle { backend: Rc::new(backend), config })
}

/// Token saved by the last sign-in on this browser.
pub fn stored_token() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        storage.get_item(TOKEN_KEY).ok().flatten()
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Persist the backend's current token, or clear it when signed out.
pub fn sync_token(backend: &RestBackend) {
    #[cfg(feature = "csr")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        let result = match backend.access_token() {
            Some(token) => storage.set_item(TOKEN_KEY, &token),
            None => storage.remove_item(TOKEN_KEY),
        };
        if result.is_err() {
            log::warn!("could not persist session token");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = backend;
    }
}
