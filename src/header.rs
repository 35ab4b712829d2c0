//! Header widget state: login state, avatar initials and the account menu.
//!
//! The header is recomputed from scratch on every page load and whenever the
//! browser restores a page from its back/forward cache.

#[cfg(test)]
#[path = "header_test.rs"]
mod tests;

use crate::backend::Backend;
use crate::error::Error;
use crate::models::{AuthUser, Profile};
use crate::nav::Page;
use crate::session::fetch_profile;

const AVATAR_BASE_URL: &str = "https://placehold.co/40x40/6366f1/ffffff";

/// Up to two upper-cased initials: first and last word, or the only word.
/// Blank names give `?`.
#[must_use]
pub fn initials(full_name: &str) -> String {
    fn first_char(word: &str) -> String {
        word.chars().next().into_iter().flat_map(char::to_uppercase).collect()
    }

    let words: Vec<&str> = full_name.split_whitespace().collect();
    match words.as_slice() {
        [] => "?".to_owned(),
        [only] => first_char(only),
        [first, .., last] => first_char(first) + &first_char(last),
    }
}

/// Placeholder avatar image carrying the initials.
#[must_use]
pub fn avatar_url(initials: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new()).append_pair("text", initials).finish();
    format!("{AVATAR_BASE_URL}?{query}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderState {
    LoggedOut,
    /// Signed in, but the profile has no name yet.
    IncompleteProfile,
    Complete { display_name: String, initials: String, is_admin: bool },
}

/// Where a menu entry leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    Page(Page),
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub target: MenuTarget,
}

const fn item(label: &'static str, target: MenuTarget) -> MenuItem {
    MenuItem { label, target }
}

impl HeaderState {
    /// Classify a visitor. A missing profile counts as incomplete.
    #[must_use]
    pub fn from_parts(user: Option<&AuthUser>, profile: Option<&Profile>) -> Self {
        match (user, profile) {
            (None, _) => Self::LoggedOut,
            (Some(_), Some(profile)) if profile.is_complete() => {
                let display_name = profile.full_name.as_deref().unwrap_or_default().trim().to_owned();
                Self::Complete { initials: initials(&display_name), display_name, is_admin: profile.is_admin() }
            }
            (Some(_), _) => Self::IncompleteProfile,
        }
    }

    #[must_use]
    pub fn avatar_url(&self) -> Option<String> {
        match self {
            Self::Complete { initials, .. } => Some(avatar_url(initials)),
            Self::LoggedOut | Self::IncompleteProfile => None,
        }
    }

    #[must_use]
    pub fn menu_items(&self) -> Vec<MenuItem> {
        match self {
            Self::LoggedOut => vec![
                item("Login", MenuTarget::Page(Page::Login)),
                item("Sign Up", MenuTarget::Page(Page::Signup)),
            ],
            Self::IncompleteProfile => vec![
                item("Complete Profile", MenuTarget::Page(Page::CompleteProfile)),
                item("Logout", MenuTarget::Logout),
            ],
            Self::Complete { is_admin: true, .. } => vec![
                item("Dashboard", MenuTarget::Page(Page::Dashboard)),
                item("Admin Panel", MenuTarget::Page(Page::Admin)),
                item("Logout", MenuTarget::Logout),
            ],
            Self::Complete { is_admin: false, .. } => vec![
                item("Dashboard", MenuTarget::Page(Page::Dashboard)),
                item("Submit Event", MenuTarget::Page(Page::Submit)),
                item("Logout", MenuTarget::Logout),
            ],
        }
    }
}

/// Work out the header for the current visitor. Lookup failures degrade to
/// the nearest state instead of failing the page.
pub async fn resolve<B: Backend + ?Sized>(backend: &B) -> HeaderState {
    let user = match backend.current_user().await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "header session lookup failed");
            None
        }
    };
    let Some(user) = user else {
        return HeaderState::LoggedOut;
    };
    let profile = match fetch_profile(backend, user.id).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "header profile lookup failed");
            None
        }
    };
    HeaderState::from_parts(Some(&user), profile.as_ref())
}

/// Sign out and return the page to land on.
///
/// # Errors
///
/// Returns the sign-out error; the caller stays on the current page.
pub async fn logout<B: Backend + ?Sized>(backend: &B) -> Result<Page, Error> {
    backend.sign_out().await?;
    tracing::info!("signed out");
    Ok(Page::Index)
}
