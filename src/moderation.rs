//! Admin moderation: status transitions, verified deletes and the admin
//! panel controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only `pending` events move, and only to `approved` or `rejected`. Any event
//! can be deleted. Every mutation is confirmed through a [`Prompt`] first and
//! followed by a full refresh of the counts and the current tab.
//!
//! DESIGN
//! ======
//! A row-level policy can make the backend accept a write and change nothing.
//! Both mutations check for that: status updates are scoped to
//! `status = pending` and must return the changed row, deletes are followed
//! by a read of the same id. Either check failing yields a policy error
//! rather than a network error.

#[cfg(test)]
#[path = "moderation_test.rs"]
mod tests;

use serde_json::{Value, json};
use uuid::Uuid;

use crate::backend::{Backend, Delete, Select, Update};
use crate::error::Error;
use crate::listing::{ListController, ListFilter, ListState, Ticket, fetch_events, submitter_embed};
use crate::models::{EVENTS_TABLE, Event, EventId, EventStatus};
use crate::nav::Page;

// =============================================================================
// ACTIONS AND TRANSITIONS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Approve,
    Reject,
    Delete,
}

impl Action {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::View => "Detail",
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::Delete => "Delete",
        }
    }

    /// Status this action moves an event to, for status-changing actions.
    #[must_use]
    pub fn target_status(self) -> Option<EventStatus> {
        match self {
            Self::Approve => Some(EventStatus::Approved),
            Self::Reject => Some(EventStatus::Rejected),
            Self::View | Self::Delete => None,
        }
    }

    fn confirm_message(self) -> Option<&'static str> {
        match self {
            Self::Approve => Some("Approve this event?"),
            Self::Reject => Some("Reject this event?"),
            Self::Delete => Some("Delete this event permanently? This cannot be undone."),
            Self::View => None,
        }
    }
}

/// Moderator actions offered for an event in `status`.
#[must_use]
pub fn available_actions(status: EventStatus) -> &'static [Action] {
    match status {
        EventStatus::Pending => &[Action::View, Action::Approve, Action::Reject, Action::Delete],
        EventStatus::Approved | EventStatus::Rejected => &[Action::View, Action::Delete],
    }
}

/// Check a status edge against the moderation lifecycle.
///
/// # Errors
///
/// Returns [`Error::InvalidTransition`] for anything other than
/// `pending → approved` or `pending → rejected`.
pub fn check_transition(from: EventStatus, to: EventStatus) -> Result<(), Error> {
    match (from, to) {
        (EventStatus::Pending, EventStatus::Approved | EventStatus::Rejected) => Ok(()),
        _ => Err(Error::InvalidTransition { from, to }),
    }
}

// =============================================================================
// COUNTS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }

    /// Count shown on an admin tab; `None` is the "all" tab.
    #[must_use]
    pub fn for_tab(&self, tab: Option<EventStatus>) -> usize {
        match tab {
            None => self.total(),
            Some(EventStatus::Pending) => self.pending,
            Some(EventStatus::Approved) => self.approved,
            Some(EventStatus::Rejected) => self.rejected,
        }
    }

    pub fn record(&mut self, status: EventStatus) {
        match status {
            EventStatus::Pending => self.pending += 1,
            EventStatus::Approved => self.approved += 1,
            EventStatus::Rejected => self.rejected += 1,
        }
    }
}

impl FromIterator<EventStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = EventStatus>>(iter: I) -> Self {
        let mut counts = Self::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}

/// Per-status totals in one round trip.
///
/// # Errors
///
/// Returns the query error.
pub async fn fetch_counts<B: Backend + ?Sized>(backend: &B) -> Result<StatusCounts, Error> {
    let rows = backend.select(&Select::from(EVENTS_TABLE).columns("status")).await?;
    Ok(rows
        .iter()
        .filter_map(|row| row.get("status")?.as_str()?.parse::<EventStatus>().ok())
        .collect())
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Current status of an event regardless of moderation state, or `None`
/// when the row is not visible.
///
/// # Errors
///
/// Returns the query error.
pub async fn fetch_status<B: Backend + ?Sized>(backend: &B, id: EventId) -> Result<Option<EventStatus>, Error> {
    let rows = backend.select(&Select::from(EVENTS_TABLE).columns("id,status").eq("id", id).limit(1)).await?;
    Ok(rows
        .first()
        .and_then(|row| row.get("status"))
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok()))
}

/// Load one event in any status, for moderators and owners.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when no row is visible, or the query error.
pub async fn fetch_event<B: Backend + ?Sized>(backend: &B, id: EventId) -> Result<Event, Error> {
    let query = Select::from(EVENTS_TABLE).embed(submitter_embed()).eq("id", id).limit(1);
    let rows = backend.select(&query).await?;
    crate::backend::decode_rows::<Event>(rows)?.into_iter().next().ok_or(Error::NotFound)
}

/// Move a pending event to `to`.
///
/// # Errors
///
/// - [`Error::InvalidTransition`] when `to` is not a moderation target, or the
///   event has already left `pending`.
/// - [`Error::NotFound`] when the event is gone.
/// - [`Error::NoRowsAffected`] when the event is still pending after an
///   accepted update.
/// - The backend error when the update is refused outright.
pub async fn set_status<B: Backend + ?Sized>(backend: &B, id: EventId, to: EventStatus) -> Result<(), Error> {
    check_transition(EventStatus::Pending, to)?;

    let update = Update::table(EVENTS_TABLE, json!({ "status": to }))
        .eq("id", id)
        .eq("status", EventStatus::Pending);
    let changed = backend.update(&update).await?;
    if !changed.is_empty() {
        tracing::info!(event_id = id, status = %to, "event status updated");
        return Ok(());
    }

    match fetch_status(backend, id).await? {
        None => Err(Error::NotFound),
        Some(from) if from != EventStatus::Pending => Err(Error::InvalidTransition { from, to }),
        Some(_) => {
            tracing::warn!(event_id = id, status = %to, "status update accepted but no rows changed");
            Err(Error::NoRowsAffected)
        }
    }
}

/// Delete an event and confirm it is gone. `owner` scopes the delete to that
/// user's rows.
///
/// # Errors
///
/// Returns [`Error::DeleteNotApplied`] when the event is still readable after
/// an accepted delete, or the backend error when the delete is refused.
pub async fn delete_verified<B: Backend + ?Sized>(backend: &B, id: EventId, owner: Option<Uuid>) -> Result<(), Error> {
    let mut delete = Delete::from(EVENTS_TABLE).eq("id", id);
    if let Some(owner) = owner {
        delete = delete.eq("user_id", owner);
    }
    backend.delete(&delete).await?;

    if fetch_status(backend, id).await?.is_some() {
        tracing::warn!(event_id = id, "delete accepted but event still present");
        return Err(Error::DeleteNotApplied { id });
    }
    tracing::info!(event_id = id, "event deleted");
    Ok(())
}

// =============================================================================
// PROMPTS
// =============================================================================

/// Confirmation and notice surface: browser dialogs, a terminal, or a script.
pub trait Prompt {
    fn confirm(&self, message: &str) -> bool;

    fn notify(&self, message: &str);
}

// =============================================================================
// ADMIN CONTROLLER
// =============================================================================

/// Result of [`AdminController::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The moderator declined the confirmation; nothing was sent.
    Cancelled,
    /// The mutation went through and the panel was refreshed.
    Applied,
    /// Navigate to this page.
    Open(Page),
}

/// State of the admin panel: the active tab, its listing and the counts.
#[derive(Debug, Clone)]
pub struct AdminController {
    tab: Option<EventStatus>,
    list: ListController,
    counts: Option<StatusCounts>,
}

impl Default for AdminController {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminController {
    /// Starts on the "all" tab.
    #[must_use]
    pub fn new() -> Self {
        Self { tab: None, list: ListController::new(ListFilter::default(), usize::MAX), counts: None }
    }

    #[must_use]
    pub fn tab(&self) -> Option<EventStatus> {
        self.tab
    }

    #[must_use]
    pub fn list(&self) -> &ListController {
        &self.list
    }

    #[must_use]
    pub fn counts(&self) -> Option<StatusCounts> {
        self.counts
    }

    /// Events on the current tab, newest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        self.list.visible()
    }

    /// Re-enter the loading state for the current tab. Fetch with
    /// [`fetch_tab`] and hand the result to [`AdminController::complete`].
    pub fn begin_refresh(&mut self) -> Ticket {
        self.list.begin(ListFilter::default().with_status(self.tab))
    }

    /// Switch to `tab` and enter its loading state.
    pub fn begin_tab(&mut self, tab: Option<EventStatus>) -> Ticket {
        self.tab = tab;
        self.begin_refresh()
    }

    /// Apply a tab fetch. Returns `false` when `ticket` has been superseded by
    /// a later tab switch or refresh.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<Vec<Event>, Error>) -> bool {
        self.list.complete(ticket, result)
    }

    pub fn record_counts(&mut self, counts: StatusCounts) {
        self.counts = Some(counts);
    }

    /// Reload counts and the current tab.
    ///
    /// # Errors
    ///
    /// Returns the first failing query. The list records its own failure.
    pub async fn refresh<B: Backend + ?Sized>(&mut self, backend: &B) -> Result<(), Error> {
        let ticket = self.begin_refresh();
        let counts = fetch_counts(backend).await;
        let listed = fetch_tab(backend, &ticket).await;
        let outcome = listed.as_ref().map(|_| ()).map_err(Clone::clone);
        self.complete(&ticket, listed);
        match counts {
            Ok(counts) => self.record_counts(counts),
            Err(e) => {
                tracing::warn!(error = %e, "status counts failed");
                return Err(e);
            }
        }
        outcome
    }

    /// Switch tabs and reload the list.
    ///
    /// # Errors
    ///
    /// Returns the list query error.
    pub async fn select_tab<B: Backend + ?Sized>(&mut self, backend: &B, tab: Option<EventStatus>) -> Result<(), Error> {
        let ticket = self.begin_tab(tab);
        let listed = fetch_tab(backend, &ticket).await;
        let outcome = listed.as_ref().map(|_| ()).map_err(Clone::clone);
        self.complete(&ticket, listed);
        outcome
    }

    fn status_of(&self, id: EventId) -> Option<EventStatus> {
        match self.list.state() {
            ListState::Loaded(events) => events.iter().find(|e| e.id == id).map(|e| e.status),
            ListState::Loading | ListState::Failed(_) => None,
        }
    }

    /// Confirm and run `action` on event `id` without touching the panel.
    /// Callers refresh after [`Outcome::Applied`].
    ///
    /// # Errors
    ///
    /// Returns the mutation error after showing it through `prompt`.
    pub async fn perform<B, P>(&self, backend: &B, prompt: &P, id: EventId, action: Action) -> Result<Outcome, Error>
    where
        B: Backend + ?Sized,
        P: Prompt + ?Sized,
    {
        if action == Action::View {
            return Ok(Outcome::Open(Page::EventDetail(id)));
        }
        if let (Some(from), Some(to)) = (self.status_of(id), action.target_status()) {
            if let Err(e) = check_transition(from, to) {
                prompt.notify(&e.to_string());
                return Err(e);
            }
        }
        if let Some(message) = action.confirm_message() {
            if !prompt.confirm(message) {
                return Ok(Outcome::Cancelled);
            }
        }

        let result = match action.target_status() {
            Some(to) => set_status(backend, id, to).await,
            None => delete_verified(backend, id, None).await,
        };
        if let Err(e) = result {
            tracing::warn!(event_id = id, action = action.label(), error = %e, "moderation action failed");
            prompt.notify(&format!("Action failed: {e}"));
            return Err(e);
        }

        prompt.notify(match action {
            Action::Delete => "Event deleted.",
            _ => "Event status updated.",
        });
        Ok(Outcome::Applied)
    }

    /// [`perform`](Self::perform), then refresh on success.
    ///
    /// # Errors
    ///
    /// Returns the mutation error after showing it through `prompt`. The
    /// panel state is left as it was.
    pub async fn apply<B, P>(&mut self, backend: &B, prompt: &P, id: EventId, action: Action) -> Result<Outcome, Error>
    where
        B: Backend + ?Sized,
        P: Prompt + ?Sized,
    {
        let outcome = self.perform(backend, prompt, id, action).await?;
        if outcome == Outcome::Applied {
            // A failed refresh is shown by the list itself.
            if let Err(e) = self.refresh(backend).await {
                tracing::warn!(error = %e, "refresh after moderation failed");
            }
        }
        Ok(outcome)
    }
}

/// Load the events for a ticket issued by [`AdminController::begin_tab`] or
/// [`AdminController::begin_refresh`], with submitter details embedded.
///
/// # Errors
///
/// Returns the query error.
pub async fn fetch_tab<B: Backend + ?Sized>(backend: &B, ticket: &Ticket) -> Result<Vec<Event>, Error> {
    fetch_events(backend, ticket.filter(), Some(submitter_embed())).await
}
