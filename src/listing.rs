//! Event listing: filters, fetch, and the paginated list controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! One listing serves the public index, the signed-in home page and the admin
//! panel. They differ only in the [`ListFilter`] they start from and the
//! profile columns they embed. Rendering is the caller's job; this module
//! decides what is visible.
//!
//! DESIGN
//! ======
//! The fetched result set is cached in [`ListController`]. "Load more" only
//! widens the visible window over that cache. Every fetch is issued under a
//! [`Ticket`]; a completion whose ticket is stale is dropped so a slow
//! earlier query can never overwrite a newer filter's results.

#[cfg(test)]
#[path = "listing_test.rs"]
mod tests;

use crate::backend::{Backend, Embed, Filter, Select, decode_rows};
use crate::config::{DEFAULT_FEATURED_COUNT, DEFAULT_PAGE_SIZE};
use crate::error::Error;
use crate::models::{EVENTS_TABLE, Event, EventId, EventStatus, PROFILES_TABLE, Profile};
use crate::moderation::fetch_event;
use crate::session::{Session, fetch_profile};

/// Columns searched by a free-text query.
pub const SEARCH_COLUMNS: [&str; 3] = ["title", "description", "location"];

/// Profile columns shown on public cards.
#[must_use]
pub fn university_embed() -> Embed {
    Embed::new(PROFILES_TABLE, &["university"], "user_id")
}

/// Profile columns shown to moderators.
#[must_use]
pub fn submitter_embed() -> Embed {
    Embed::new(PROFILES_TABLE, &["full_name", "phone_number"], "user_id")
}

// =============================================================================
// FILTER
// =============================================================================

/// Which events a listing shows. Blank values are normalized away, so two
/// filters compare equal exactly when they would issue the same query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<EventStatus>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ListFilter {
    /// The public listing: approved events only.
    #[must_use]
    pub fn approved() -> Self {
        Self { status: Some(EventStatus::Approved), ..Self::default() }
    }

    #[must_use]
    pub fn with_status(mut self, status: Option<EventStatus>) -> Self {
        self.status = status;
        self
    }

    /// Restrict to one category. `"all"` in any case, or a blank value,
    /// clears the restriction.
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        let category = category.trim();
        self.category =
            (!category.is_empty() && !category.eq_ignore_ascii_case("all")).then(|| category.to_owned());
        self
    }

    /// Free-text search; blank clears it.
    #[must_use]
    pub fn with_search(mut self, search: &str) -> Self {
        let search = search.trim();
        self.search = (!search.is_empty()).then(|| search.to_owned());
        self
    }

    /// True when neither a category nor a search narrows the listing.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.category.is_none() && self.search.is_none()
    }

    /// Build the query: newest first, optionally joined with profile fields.
    #[must_use]
    pub fn to_select(&self, embed: Option<Embed>) -> Select {
        let mut query = Select::from(EVENTS_TABLE).order("created_at", false);
        if let Some(embed) = embed {
            query = query.embed(embed);
        }
        if let Some(status) = self.status {
            query = query.eq("status", status);
        }
        if let Some(category) = &self.category {
            query = query.eq("category", category);
        }
        if let Some(search) = &self.search {
            query = query.filter(Filter::contains_any(&SEARCH_COLUMNS, search));
        }
        query
    }

    /// Message for an empty result under this filter.
    #[must_use]
    pub fn empty_message(&self) -> String {
        match (&self.search, &self.category) {
            (Some(search), _) => format!("No events found for \"{search}\"."),
            (None, Some(category)) => format!("No events in category \"{category}\" yet."),
            (None, None) => "No events available yet.".to_owned(),
        }
    }
}

/// Run a listing query.
///
/// # Errors
///
/// Returns an error when the query fails or a row cannot be decoded.
pub async fn fetch_events<B: Backend + ?Sized>(
    backend: &B,
    filter: &ListFilter,
    embed: Option<Embed>,
) -> Result<Vec<Event>, Error> {
    let rows = backend.select(&filter.to_select(embed)).await?;
    let events = decode_rows::<Event>(rows)?;
    tracing::debug!(count = events.len(), status = ?filter.status, category = ?filter.category, "events fetched");
    Ok(events)
}

/// Load one approved event for the detail page. A missing id is the same
/// "not found" as a missing row.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when `id` is `None` or no approved event has
/// that id, or the underlying query error.
pub async fn fetch_approved_detail<B: Backend + ?Sized>(backend: &B, id: Option<EventId>) -> Result<Event, Error> {
    let id = id.ok_or(Error::NotFound)?;
    let query = Select::from(EVENTS_TABLE).eq("id", id).eq("status", EventStatus::Approved).limit(1);
    let rows = backend.select(&query).await?;
    decode_rows::<Event>(rows)?.into_iter().next().ok_or(Error::NotFound)
}

/// Load the event behind a detail page for whoever is looking.
///
/// Anonymous visitors see approved events only. Admins see every status, and
/// a signed-in submitter also sees their own pending or rejected events. Any
/// other non-approved row is reported as not found.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when `id` is `None` or the event is not
/// visible to `session`, or the underlying query error.
pub async fn fetch_detail<B: Backend + ?Sized>(
    backend: &B,
    session: &Session,
    id: Option<EventId>,
) -> Result<Event, Error> {
    let id = id.ok_or(Error::NotFound)?;
    let Some(user) = &session.user else {
        return fetch_approved_detail(backend, Some(id)).await;
    };

    let event = fetch_event(backend, id).await?;
    if event.status == EventStatus::Approved || event.user_id == Some(user.id) {
        return Ok(event);
    }

    let is_admin = match &session.profile {
        Some(profile) => profile.is_admin(),
        None => match fetch_profile(backend, user.id).await {
            Ok(profile) => profile.as_ref().is_some_and(Profile::is_admin),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "role lookup failed; hiding unapproved event");
                false
            }
        },
    };
    if is_admin { Ok(event) } else { Err(Error::NotFound) }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Identifies one fetch. Only the newest ticket may complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    filter: ListFilter,
}

impl Ticket {
    #[must_use]
    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Loaded(Vec<Event>),
    Failed(String),
}

/// State of one paginated listing on a page.
#[derive(Debug, Clone)]
pub struct ListController {
    filter: ListFilter,
    generation: u64,
    page: usize,
    page_size: usize,
    featured_count: usize,
    state: ListState,
}

impl ListController {
    #[must_use]
    pub fn new(filter: ListFilter, page_size: usize) -> Self {
        Self {
            filter,
            generation: 0,
            page: 1,
            page_size: page_size.max(1),
            featured_count: DEFAULT_FEATURED_COUNT,
            state: ListState::Loading,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &ListFilter {
        &self.filter
    }

    #[must_use]
    pub fn state(&self) -> &ListState {
        &self.state
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Switch to `filter` and start a fetch. Resets to the first page.
    pub fn begin(&mut self, filter: ListFilter) -> Ticket {
        self.filter = filter;
        self.refresh()
    }

    /// Start a fetch under the current filter, e.g. after a mutation.
    pub fn refresh(&mut self) -> Ticket {
        self.generation += 1;
        self.page = 1;
        self.state = ListState::Loading;
        Ticket { generation: self.generation, filter: self.filter.clone() }
    }

    /// Apply a fetch result. Returns `false` and leaves state untouched when
    /// the ticket has been superseded.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<Vec<Event>, Error>) -> bool {
        if ticket.generation != self.generation || ticket.filter != self.filter {
            tracing::debug!(ticket = ticket.generation, current = self.generation, "stale listing result discarded");
            return false;
        }
        self.state = match result {
            Ok(events) => ListState::Loaded(events),
            Err(e) => {
                tracing::warn!(error = %e, "listing fetch failed");
                ListState::Failed(format!("Failed to load events: {e}"))
            }
        };
        true
    }

    /// Begin, fetch and complete in one step.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after recording it as [`ListState::Failed`].
    pub async fn load<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        filter: ListFilter,
        embed: Option<Embed>,
    ) -> Result<(), Error> {
        let ticket = self.begin(filter);
        let result = fetch_events(backend, ticket.filter(), embed).await;
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.complete(&ticket, result);
        outcome
    }

    fn events(&self) -> &[Event] {
        match &self.state {
            ListState::Loaded(events) => events,
            ListState::Loading | ListState::Failed(_) => &[],
        }
    }

    /// Records in the current window: the first `page_size × page`.
    #[must_use]
    pub fn visible(&self) -> &[Event] {
        let events = self.events();
        let end = self.page.saturating_mul(self.page_size).min(events.len());
        &events[..end]
    }

    /// Featured strip: the newest few, only when the listing is unfiltered.
    #[must_use]
    pub fn featured(&self) -> &[Event] {
        if !self.filter.is_unfiltered() {
            return &[];
        }
        let events = self.events();
        &events[..self.featured_count.min(events.len())]
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.visible().len() < self.events().len()
    }

    /// Widen the window by one page. Never re-queries.
    pub fn load_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }

    /// `(shown, total)` over the filtered result set.
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        (self.visible().len(), self.events().len())
    }

    /// Message for the list area, if it should show one instead of cards.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match &self.state {
            ListState::Loading => Some("Loading events...".to_owned()),
            ListState::Failed(message) => Some(message.clone()),
            ListState::Loaded(events) if events.is_empty() => Some(self.filter.empty_message()),
            ListState::Loaded(_) => None,
        }
    }
}

impl Default for ListController {
    fn default() -> Self {
        Self::new(ListFilter::approved(), DEFAULT_PAGE_SIZE)
    }
}
