//! Shared page-entry flow: build the backend, run the session guard, and
//! redirect on denial.

use eventboard::moderation::Prompt as _;
use eventboard::session::{Requirement, Session, guard};

use crate::net::backend::{Handle, handle, sync_token};
use crate::util::browser::{BrowserPrompt, navigate};

/// Enter a page under `requirement`. `None` means the page must not render
/// data: either configuration is broken or the visitor was redirected.
pub async fn enter(requirement: Requirement) -> Option<(Handle, Session)> {
    let handle = match handle() {
        Ok(handle) => handle,
        Err(e) => {
            #[cfg(feature = "csr")]
            log::error!("{e}");
            BrowserPrompt.notify(&e.to_string());
            return None;
        }
    };
    let outcome = guard(&*handle.backend, requirement).await;
    sync_token(&handle.backend);
    match outcome {
        Ok(session) => Some((handle, session)),
        Err(denied) => {
            if let Some(message) = denied.message {
                BrowserPrompt.notify(message);
            }
            navigate(denied.redirect);
            None
        }
    }
}
