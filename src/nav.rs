//! Page addresses and query-parameter parsing.
//!
//! Navigation is full-page: every screen is its own HTML document and moving
//! between them is a `location` assignment. The paths live here so guards,
//! menus and cards agree on where things are.

#[cfg(test)]
#[path = "nav_test.rs"]
mod tests;

use crate::models::EventId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Public landing page with search and pagination.
    Index,
    /// Signed-in home with the same listing.
    Home,
    EventDetail(EventId),
    Login,
    Signup,
    CompleteProfile,
    /// The signed-in user's own events.
    Dashboard,
    Submit,
    Edit(EventId),
    Admin,
}

impl Page {
    #[must_use]
    pub fn href(self) -> String {
        match self {
            Self::Index => "/index.html".to_owned(),
            Self::Home => "/main/home.html".to_owned(),
            Self::EventDetail(id) => format!("/main/event-detail.html?id={id}"),
            Self::Login => "/login/login.html".to_owned(),
            Self::Signup => "/signup/signup.html".to_owned(),
            Self::CompleteProfile => "/profile/complete-profile.html".to_owned(),
            Self::Dashboard => "/user/dashboard.html".to_owned(),
            Self::Submit => "/user/submit-event.html".to_owned(),
            Self::Edit(id) => format!("/user/submit-event.html?edit={id}"),
            Self::Admin => "/admin/admin.html".to_owned(),
        }
    }
}

/// Value of `name` in a `?a=1&b=2` query string, percent-decoded.
#[must_use]
pub fn query_param(search: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(search.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Event id from a query parameter; `None` when missing or not a number.
#[must_use]
pub fn event_id_param(search: &str, name: &str) -> Option<EventId> {
    query_param(search, name).and_then(|v| v.trim().parse().ok())
}
