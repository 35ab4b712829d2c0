//! Event submission form: create and edit.
//!
//! SYSTEM CONTEXT
//! ==============
//! The owner fills in the form and optionally attaches a poster. The poster
//! is uploaded first; only once its public URL is known is the event row
//! written. A failed upload therefore never leaves a row pointing at a
//! missing image. Both create and edit write `status = pending`, so every
//! edit goes back through moderation.

#[cfg(test)]
#[path = "submission_test.rs"]
mod tests;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::{Backend, Select, Update, decode_rows};
use crate::error::Error;
use crate::models::{EVENTS_TABLE, Event, EventDraft, EventId, EventStatus, parse_event_date};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file picked in the form. Zero bytes means "no file".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Raw form fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    /// `datetime-local` value or RFC 3339.
    pub event_date: String,
    pub category: String,
    pub venue: String,
    pub address: String,
    pub organizer_name: String,
    pub organizer_contact: String,
    pub image: Option<ImageFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Create,
    /// Editing an owned event. `previous_image` is kept when no new file is
    /// attached.
    Edit { id: EventId, previous_image: Option<String> },
}

// =============================================================================
// FIELDS
// =============================================================================

/// Storage key for an uploaded poster: `{user}-{timestamp_ms}-{name}`, with
/// the name reduced to `[A-Za-z0-9._-]`.
#[must_use]
pub fn object_key(user: Uuid, timestamp_ms: i64, filename: &str) -> String {
    let name: String = filename
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let name = if name.is_empty() { "image".to_owned() } else { name };
    format!("{user}-{timestamp_ms}-{name}")
}

/// `"{venue}, {address}"`, skipping blank parts.
#[must_use]
pub fn compose_location(venue: &str, address: &str) -> Option<String> {
    let parts: Vec<&str> = [venue.trim(), address.trim()].into_iter().filter(|p| !p.is_empty()).collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Inverse of [`compose_location`] on the first `", "`.
#[must_use]
pub fn split_location(location: &str) -> (String, String) {
    match location.split_once(", ") {
        Some((venue, address)) => (venue.trim().to_owned(), address.trim().to_owned()),
        None => (location.trim().to_owned(), String::new()),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

impl EventForm {
    /// Check required fields before any request is made. Returns the parsed
    /// event date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<DateTime<Utc>, Error> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Event name is required.".to_owned()));
        }
        if self.event_date.trim().is_empty() {
            return Err(Error::Validation("Event date is required.".to_owned()));
        }
        parse_event_date(&self.event_date)
            .ok_or_else(|| Error::Validation(format!("Event date is not valid: {}", self.event_date.trim())))
    }

    /// Prefill from an existing event.
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        let (venue, address) = split_location(event.location.as_deref().unwrap_or_default());
        Self {
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            event_date: event.event_date.format("%Y-%m-%dT%H:%M").to_string(),
            category: event.category.clone().unwrap_or_default(),
            venue,
            address,
            organizer_name: event.organizer_name.clone().unwrap_or_default(),
            organizer_contact: event.organizer_contact.clone().unwrap_or_default(),
            image: None,
        }
    }

    fn attached_image(&self) -> Option<&ImageFile> {
        self.image.as_ref().filter(|f| !f.is_empty())
    }

    fn to_draft(&self, event_date: DateTime<Utc>, image_url: Option<String>, user: Uuid) -> EventDraft {
        EventDraft {
            title: self.title.trim().to_owned(),
            description: non_blank(&self.description),
            event_date,
            category: non_blank(&self.category),
            location: compose_location(&self.venue, &self.address),
            image_url,
            organizer_name: non_blank(&self.organizer_name),
            organizer_contact: non_blank(&self.organizer_contact),
            user_id: user,
            status: EventStatus::Pending,
        }
    }
}

// =============================================================================
// SUBMIT
// =============================================================================

/// Upload a poster and resolve its public URL.
///
/// # Errors
///
/// Returns [`Error::Upload`] when storage refuses the object.
pub async fn upload_image<B: Backend + ?Sized>(
    backend: &B,
    bucket: &str,
    user: Uuid,
    file: &ImageFile,
    timestamp_ms: i64,
) -> Result<String, Error> {
    let key = object_key(user, timestamp_ms, &file.name);
    let content_type = if file.content_type.trim().is_empty() { DEFAULT_CONTENT_TYPE } else { &file.content_type };
    let path = backend
        .upload(bucket, &key, file.bytes.clone(), content_type)
        .await
        .map_err(|e| Error::Upload(e.to_string()))?;
    tracing::info!(bucket, key = %path, size = file.bytes.len(), "poster uploaded");
    Ok(backend.public_url(bucket, &path))
}

/// Validate, upload, then insert or update.
///
/// # Errors
///
/// - [`Error::Validation`] before any request when a field is bad.
/// - [`Error::Upload`] when the poster upload fails; no row is written.
/// - [`Error::NoRowsAffected`] when an edit matches no owned row.
/// - The backend error when the write is refused.
pub async fn submit<B: Backend + ?Sized>(
    backend: &B,
    bucket: &str,
    user: Uuid,
    form: &EventForm,
    mode: &Mode,
    timestamp_ms: i64,
) -> Result<(), Error> {
    let event_date = form.validate()?;

    let uploaded = match form.attached_image() {
        Some(file) => Some(upload_image(backend, bucket, user, file, timestamp_ms).await?),
        None => None,
    };

    match mode {
        Mode::Create => {
            let draft = form.to_draft(event_date, uploaded, user);
            let rows = backend.insert(EVENTS_TABLE, serde_json::to_value(vec![draft])?).await?;
            let id = rows.first().and_then(|r| r.get("id")).and_then(serde_json::Value::as_i64);
            tracing::info!(event_id = ?id, user_id = %user, "event submitted");
        }
        Mode::Edit { id, previous_image } => {
            let image_url = uploaded.or_else(|| previous_image.clone());
            let draft = form.to_draft(event_date, image_url, user);
            let update = Update::table(EVENTS_TABLE, serde_json::to_value(&draft)?).eq("id", id).eq("user_id", user);
            if backend.update(&update).await?.is_empty() {
                tracing::warn!(event_id = id, user_id = %user, "event edit accepted but no rows changed");
                return Err(Error::NoRowsAffected);
            }
            tracing::info!(event_id = id, user_id = %user, "event edited and returned to review");
        }
    }
    Ok(())
}

/// Load an owned event for editing.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the event does not exist or belongs to
/// someone else, or the query error.
pub async fn load_for_edit<B: Backend + ?Sized>(backend: &B, id: EventId, user: Uuid) -> Result<(EventForm, Mode), Error> {
    let query = Select::from(EVENTS_TABLE).eq("id", id).eq("user_id", user).limit(1);
    let rows = backend.select(&query).await?;
    let event = decode_rows::<Event>(rows)?.into_iter().next().ok_or(Error::NotFound)?;
    let mode = Mode::Edit { id, previous_image: event.image().map(str::to_owned) };
    Ok((EventForm::from_event(&event), mode))
}

// =============================================================================
// FORM PHASE
// =============================================================================

/// Submit button state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Failed(String),
}

impl FormPhase {
    #[must_use]
    pub fn button_label(&self, mode: &Mode) -> &'static str {
        match (self, mode) {
            (Self::Submitting, _) => "Submitting...",
            (_, Mode::Create) => "Submit Event",
            (_, Mode::Edit { .. }) => "Save Changes",
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Idle | Self::Submitting => None,
        }
    }

    /// Phase after a submit attempt: back to a resubmittable form on failure.
    #[must_use]
    pub fn after(result: &Result<(), Error>) -> Self {
        match result {
            Ok(()) => Self::Idle,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}
