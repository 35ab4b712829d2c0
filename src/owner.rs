//! The signed-in user's own dashboard.
//!
//! Shows a welcome header from the profile, per-status statistics over the
//! user's own events, and the events themselves newest first. Owners may
//! delete their own events through the same verified delete moderators use.

#[cfg(test)]
#[path = "owner_test.rs"]
mod tests;

use uuid::Uuid;

use crate::backend::{Backend, Select, decode_rows};
use crate::error::Error;
use crate::header::initials;
use crate::models::{EVENTS_TABLE, Event, EventId, Profile};
use crate::moderation::{Outcome, Prompt, StatusCounts, delete_verified};

pub const UNIVERSITY_FALLBACK: &str = "University not set";
pub const EMPTY_MESSAGE: &str = "You have not submitted any events yet.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardHeader {
    pub initials: String,
    pub welcome: String,
    pub university: String,
    /// Admins get a shortcut to the moderation panel.
    pub show_admin_shortcut: bool,
}

impl DashboardHeader {
    #[must_use]
    pub fn from_profile(profile: Option<&Profile>) -> Self {
        let name = profile.and_then(|p| p.full_name.as_deref()).map(str::trim).unwrap_or_default();
        let university = profile
            .and_then(|p| p.university.as_deref())
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(UNIVERSITY_FALLBACK);
        Self {
            initials: initials(name),
            welcome: if name.is_empty() { "Welcome".to_owned() } else { format!("Welcome, {name}") },
            university: university.to_owned(),
            show_admin_shortcut: profile.is_some_and(Profile::is_admin),
        }
    }
}

/// Per-status totals over an already-fetched list.
#[must_use]
pub fn stats(events: &[Event]) -> StatusCounts {
    events.iter().map(|e| e.status).collect()
}

/// Events owned by `user`, newest first.
///
/// # Errors
///
/// Returns the query error.
pub async fn fetch_own_events<B: Backend + ?Sized>(backend: &B, user: Uuid) -> Result<Vec<Event>, Error> {
    let query = Select::from(EVENTS_TABLE).eq("user_id", user).order("created_at", false);
    Ok(decode_rows(backend.select(&query).await?)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub header: DashboardHeader,
    pub events: Vec<Event>,
    pub stats: StatusCounts,
}

impl Dashboard {
    /// Load everything the dashboard shows.
    ///
    /// # Errors
    ///
    /// Returns the event query error; a missing profile only affects the
    /// header.
    pub async fn load<B: Backend + ?Sized>(backend: &B, user: Uuid, profile: Option<&Profile>) -> Result<Self, Error> {
        let events = fetch_own_events(backend, user).await?;
        tracing::debug!(user_id = %user, count = events.len(), "dashboard loaded");
        Ok(Self { header: DashboardHeader::from_profile(profile), stats: stats(&events), events })
    }

    #[must_use]
    pub fn empty_message(&self) -> Option<&'static str> {
        self.events.is_empty().then_some(EMPTY_MESSAGE)
    }
}

/// Confirm and delete one of the user's own events.
///
/// # Errors
///
/// Returns the delete error after showing it through `prompt`.
pub async fn delete_own<B, P>(backend: &B, prompt: &P, user: Uuid, id: EventId) -> Result<Outcome, Error>
where
    B: Backend + ?Sized,
    P: Prompt + ?Sized,
{
    if !prompt.confirm("Delete this event permanently?") {
        return Ok(Outcome::Cancelled);
    }
    match delete_verified(backend, id, Some(user)).await {
        Ok(()) => {
            prompt.notify("Event deleted.");
            Ok(Outcome::Applied)
        }
        Err(e) => {
            prompt.notify(&format!("Failed to delete event: {e}"));
            Err(e)
        }
    }
}
