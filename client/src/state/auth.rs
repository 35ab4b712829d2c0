//! Header login state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provided as an `RwSignal` by every page; the header renders from it and
//! re-resolves it on page load and on back/forward-cache restores.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use eventboard::header::{HeaderState, MenuItem};

/// Header state plus whether it is still being resolved.
#[derive(Clone, Debug)]
pub struct AuthState {
    pub header: HeaderState,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { header: HeaderState::LoggedOut, loading: true }
    }
}

impl AuthState {
    #[must_use]
    pub fn resolved(header: HeaderState) -> Self {
        Self { header, loading: false }
    }

    /// Menu entries; empty while loading so the header does not flash the
    /// logged-out buttons.
    #[must_use]
    pub fn menu(&self) -> Vec<MenuItem> {
        if self.loading { Vec::new() } else { self.header.menu_items() }
    }
}
