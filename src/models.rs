//! Records owned by the backend and consumed by this crate.
//!
//! DESIGN
//! ======
//! These types mirror the `events` and `profiles` tables as returned by the
//! REST layer. Optional columns stay `Option` so a half-filled row never fails
//! to decode; presentation fallbacks live in `view`.

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub type EventId = i64;

pub const EVENTS_TABLE: &str = "events";
pub const PROFILES_TABLE: &str = "profiles";

// =============================================================================
// STATUS AND ROLE
// =============================================================================

/// Moderation lifecycle flag on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
}

impl EventStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Profile role. Anything other than `"admin"` is a regular user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

// =============================================================================
// AUTH
// =============================================================================

/// The authenticated identity as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// A signed-in session: access token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

// =============================================================================
// PROFILE
// =============================================================================

/// Column list requested whenever a full profile row is read.
pub const PROFILE_COLUMNS: &str = "id,full_name,university,phone_number,role";

/// User metadata kept apart from the authentication identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl Profile {
    #[must_use]
    pub fn role(&self) -> Role {
        match self.role.as_deref() {
            Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    /// A profile counts as complete once it has a non-blank name.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.full_name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

/// Profile display fields embedded into event rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub university: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

// =============================================================================
// EVENT
// =============================================================================

/// An event row, optionally joined with its submitter's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_event_date")]
    pub event_date: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default)]
    pub organizer_contact: Option<String>,
    pub status: EventStatus,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    /// Joined submitter profile; `None` when not requested or the row is gone.
    #[serde(rename = "profiles", default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileSummary>,
}

impl Event {
    /// Image URL if present and not blank.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// Write payload for creating or editing an event.
///
/// Status is always `pending`: new events await review and an owner edit
/// sends the event back to review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_contact: Option<String>,
    pub user_id: Uuid,
    pub status: EventStatus,
}

// =============================================================================
// DATES
// =============================================================================

/// Parse an event date from RFC 3339 or the offset-less forms produced by
/// `datetime-local` inputs and `timestamp` columns. Offset-less values are
/// taken as UTC.
#[must_use]
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_event_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    let raw = String::deserialize(deserializer)?;
    parse_event_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid event_date: {raw}")))
}
