//! Pure mapping from records to what a page displays.
//!
//! DESIGN
//! ======
//! Nothing here touches the backend or the DOM. Each page component turns a
//! view model into markup, and the CLI prints the same models as text, so
//! fallbacks and labels are decided once.

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;

use chrono::{DateTime, Utc};

use crate::models::{Event, EventId, EventStatus};
use crate::moderation::{Action, available_actions};
use crate::nav::Page;

pub const CATEGORY_FALLBACK: &str = "General";
pub const UNIVERSITY_FALLBACK: &str = "University";
pub const DESCRIPTION_FALLBACK: &str = "No description.";
pub const LOCATION_FALLBACK: &str = "Location not available.";
pub const DELETED_SUBMITTER: &str = "Deleted user";
pub const ORGANIZER_FALLBACK: &str = "Not specified";
pub const CONTACT_FALLBACK: &str = "Not available";

const ADMIN_PLACEHOLDER_IMAGE: &str = "https://placehold.co/800x600/e2e8f0/64748b?text=Event";
const THUMBNAIL_PLACEHOLDER_IMAGE: &str = "https://placehold.co/64x64/e2e8f0/64748b?text=Img";

// =============================================================================
// FORMATTING
// =============================================================================

/// Long date, e.g. `Saturday, 1 March 2025`.
#[must_use]
pub fn long_date(dt: &DateTime<Utc>) -> String {
    dt.format("%A, %-d %B %Y").to_string()
}

/// Short date, e.g. `01/03/2025`.
#[must_use]
pub fn short_date(dt: &DateTime<Utc>) -> String {
    dt.format("%d/%m/%Y").to_string()
}

#[must_use]
pub fn date_and_time(dt: &DateTime<Utc>) -> String {
    dt.format("%d/%m/%Y • %H:%M").to_string()
}

fn or_fallback(value: Option<&str>, fallback: &str) -> String {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(fallback).to_owned()
}

/// Badge text plus a CSS modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub class: &'static str,
}

/// Status badge as moderators see it.
#[must_use]
pub fn admin_badge(status: EventStatus) -> Badge {
    match status {
        EventStatus::Pending => Badge { label: "Pending", class: "badge-pending" },
        EventStatus::Approved => Badge { label: "Approved", class: "badge-approved" },
        EventStatus::Rejected => Badge { label: "Rejected", class: "badge-rejected" },
    }
}

/// Status badge as owners see it.
#[must_use]
pub fn owner_badge(status: EventStatus) -> Badge {
    match status {
        EventStatus::Pending => Badge { label: "Pending Review", class: "status-pending" },
        EventStatus::Approved => Badge { label: "Published", class: "status-approved" },
        EventStatus::Rejected => Badge { label: "Rejected", class: "status-rejected" },
    }
}

// =============================================================================
// PUBLIC CARD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCard {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: String,
    pub location: String,
    pub university: String,
    /// `None` renders the image placeholder.
    pub image: Option<String>,
    pub detail_href: String,
}

impl From<&Event> for EventCard {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            category: or_fallback(event.category.as_deref(), CATEGORY_FALLBACK),
            date: long_date(&event.event_date),
            location: event.location.clone().unwrap_or_default(),
            university: or_fallback(
                event.profile.as_ref().and_then(|p| p.university.as_deref()),
                UNIVERSITY_FALLBACK,
            ),
            image: event.image().map(str::to_owned),
            detail_href: Page::EventDetail(event.id).href(),
        }
    }
}

// =============================================================================
// ADMIN CARD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCard {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub when: String,
    pub location: String,
    /// `name • phone`, or a note that the submitter is gone.
    pub submitter: String,
    pub category: String,
    pub submitted: String,
    pub badge: Badge,
    pub actions: &'static [Action],
}

/// Submitter line for a moderator card.
#[must_use]
pub fn submitter_line(event: &Event) -> String {
    match &event.profile {
        Some(profile) => format!(
            "{} • {}",
            or_fallback(profile.full_name.as_deref(), "No name"),
            or_fallback(profile.phone_number.as_deref(), "No contact"),
        ),
        None => DELETED_SUBMITTER.to_owned(),
    }
}

impl From<&Event> for AdminCard {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            description: or_fallback(event.description.as_deref(), DESCRIPTION_FALLBACK),
            image: event.image().unwrap_or(ADMIN_PLACEHOLDER_IMAGE).to_owned(),
            when: date_and_time(&event.event_date),
            location: or_fallback(event.location.as_deref(), LOCATION_FALLBACK),
            submitter: submitter_line(event),
            category: or_fallback(event.category.as_deref(), CATEGORY_FALLBACK),
            submitted: format!("Submitted {}", date_and_time(&event.created_at)),
            badge: admin_badge(event.status),
            actions: available_actions(event.status),
        }
    }
}

// =============================================================================
// OWNER DASHBOARD ITEM
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardItem {
    pub id: EventId,
    pub title: String,
    pub image: String,
    pub badge: Badge,
    pub submitted: String,
    pub view_href: String,
    pub edit_href: String,
}

impl From<&Event> for DashboardItem {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            image: event.image().unwrap_or(THUMBNAIL_PLACEHOLDER_IMAGE).to_owned(),
            badge: owner_badge(event.status),
            submitted: format!("Submitted on {}", short_date(&event.created_at)),
            view_href: Page::EventDetail(event.id).href(),
            edit_href: Page::Edit(event.id).href(),
        }
    }
}

// =============================================================================
// DETAIL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetailView {
    pub page_title: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub date: String,
    pub location: String,
    pub organizer_name: String,
    /// Hidden until the visitor presses "register".
    pub organizer_contact: String,
    pub image: Option<String>,
}

impl From<&Event> for EventDetailView {
    fn from(event: &Event) -> Self {
        Self {
            page_title: format!("Event Detail - {}", event.title),
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            category: event.category.clone().filter(|c| !c.trim().is_empty()),
            date: long_date(&event.event_date),
            location: event.location.clone().unwrap_or_default(),
            organizer_name: or_fallback(event.organizer_name.as_deref(), ORGANIZER_FALLBACK),
            organizer_contact: or_fallback(event.organizer_contact.as_deref(), CONTACT_FALLBACK),
            image: event.image().map(str::to_owned),
        }
    }
}
