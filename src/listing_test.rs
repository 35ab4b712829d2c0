use super::*;
use crate::backend::memory::{MemoryBackend, Policy};
use crate::models::AuthUser;
use serde_json::json;
use uuid::Uuid;

fn seed_event(backend: &MemoryBackend, title: &str, category: &str, status: &str) {
    backend.seed(
        EVENTS_TABLE,
        json!({
            "title": title,
            "description": format!("{title} description"),
            "event_date": "2025-03-01T19:00",
            "category": category,
            "location": "Main Hall, Campus",
            "status": status,
        }),
    );
}

fn loaded(titles: &[&str]) -> Vec<Event> {
    titles
        .iter()
        .enumerate()
        .map(|(idx, title)| {
            serde_json::from_value(json!({
                "id": idx + 1,
                "title": title,
                "event_date": "2025-03-01T19:00:00Z",
                "status": "approved",
                "created_at": "2025-01-01T00:00:00Z",
            }))
            .unwrap()
        })
        .collect()
}

// =============================================================================
// FILTER
// =============================================================================

#[test]
fn category_all_and_blank_mean_no_filter() {
    assert_eq!(ListFilter::approved().with_category("All").category, None);
    assert_eq!(ListFilter::approved().with_category("  ").category, None);
    assert_eq!(ListFilter::approved().with_category(" Music ").category.as_deref(), Some("Music"));
}

#[test]
fn blank_search_is_no_filter() {
    let filter = ListFilter::approved().with_search("   ");
    assert_eq!(filter, ListFilter::approved());
    assert!(filter.is_unfiltered());
}

#[test]
fn to_select_combines_category_and_search() {
    let pairs = ListFilter::approved()
        .with_category("Technology")
        .with_search("rust")
        .to_select(Some(university_embed()))
        .to_query_pairs();
    assert!(pairs.contains(&("select".into(), "*,profiles(university)".into())));
    assert!(pairs.contains(&("status".into(), "eq.approved".into())));
    assert!(pairs.contains(&("category".into(), "eq.Technology".into())));
    assert!(pairs.contains(&(
        "or".into(),
        "(title.ilike.*rust*,description.ilike.*rust*,location.ilike.*rust*)".into()
    )));
    assert!(pairs.contains(&("order".into(), "created_at.desc".into())));
}

#[test]
fn empty_messages_name_the_active_filter() {
    assert_eq!(ListFilter::approved().with_search("jazz").empty_message(), "No events found for \"jazz\".");
    assert_eq!(
        ListFilter::approved().with_category("Music").empty_message(),
        "No events in category \"Music\" yet."
    );
    assert_eq!(ListFilter::approved().empty_message(), "No events available yet.");
}

// =============================================================================
// FETCH
// =============================================================================

#[tokio::test]
async fn search_matches_title_description_or_location_case_insensitively() {
    let backend = MemoryBackend::new();
    seed_event(&backend, "Rust Meetup", "Technology", "approved");
    seed_event(&backend, "Jazz Night", "Music", "approved");
    backend.seed(
        EVENTS_TABLE,
        json!({ "title": "Quiet Talk", "event_date": "2025-03-01T19:00", "location": "RUSTIC barn", "status": "approved" }),
    );
    seed_event(&backend, "rust pending", "Technology", "pending");

    let events = fetch_events(&backend, &ListFilter::approved().with_search("rust"), None).await.unwrap();
    let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Quiet Talk", "Rust Meetup"]);
}

#[tokio::test]
async fn search_treats_wildcard_characters_literally() {
    let backend = MemoryBackend::new();
    seed_event(&backend, "Discount 50 people", "Arts", "approved");
    seed_event(&backend, "a_b literal", "Arts", "approved");
    seed_event(&backend, "axb other", "Arts", "approved");
    seed_event(&backend, "Save 50% today", "Arts", "approved");

    let titles = |events: Vec<Event>| events.into_iter().map(|e| e.title).collect::<Vec<_>>();
    let percent = fetch_events(&backend, &ListFilter::approved().with_search("50%"), None).await.unwrap();
    assert_eq!(titles(percent), vec!["Save 50% today"]);
    let none = fetch_events(&backend, &ListFilter::approved().with_search("50%p"), None).await.unwrap();
    assert!(none.is_empty());
    let underscore = fetch_events(&backend, &ListFilter::approved().with_search("a_b"), None).await.unwrap();
    assert_eq!(titles(underscore), vec!["a_b literal"]);
}

#[tokio::test]
async fn detail_requires_an_approved_row() {
    let backend = MemoryBackend::new();
    seed_event(&backend, "Approved", "Music", "approved");
    seed_event(&backend, "Pending", "Music", "pending");

    assert_eq!(fetch_approved_detail(&backend, Some(1)).await.unwrap().title, "Approved");
    assert_eq!(fetch_approved_detail(&backend, Some(2)).await.unwrap_err(), Error::NotFound);
    assert_eq!(fetch_approved_detail(&backend, None).await.unwrap_err(), Error::NotFound);
}

fn signed_in(backend: &MemoryBackend, role: &str) -> Session {
    let id = Uuid::new_v4();
    backend.seed(PROFILES_TABLE, json!({ "id": id, "full_name": "Grace Hopper", "role": role }));
    let user = AuthUser { id, email: Some("grace@example.com".into()) };
    backend.sign_in_as(user.clone());
    Session { user: Some(user), profile: None }
}

#[tokio::test]
async fn detail_for_visitors_hides_unapproved_events() {
    let backend = MemoryBackend::new();
    seed_event(&backend, "Pending", "Music", "pending");
    let anonymous = Session { user: None, profile: None };
    assert_eq!(fetch_detail(&backend, &anonymous, Some(1)).await.unwrap_err(), Error::NotFound);

    let stranger = signed_in(&backend, "user");
    assert_eq!(fetch_detail(&backend, &stranger, Some(1)).await.unwrap_err(), Error::NotFound);
    assert_eq!(fetch_detail(&backend, &stranger, None).await.unwrap_err(), Error::NotFound);
}

#[tokio::test]
async fn detail_for_admins_covers_every_status() {
    let backend = MemoryBackend::new();
    seed_event(&backend, "Pending", "Music", "pending");
    seed_event(&backend, "Rejected", "Music", "rejected");
    let admin = signed_in(&backend, "admin");
    assert_eq!(fetch_detail(&backend, &admin, Some(1)).await.unwrap().status, EventStatus::Pending);
    assert_eq!(fetch_detail(&backend, &admin, Some(2)).await.unwrap().status, EventStatus::Rejected);
}

#[tokio::test]
async fn detail_for_owners_covers_their_own_rejected_event() {
    let backend = MemoryBackend::new();
    let owner = signed_in(&backend, "user");
    let owner_id = owner.user.as_ref().unwrap().id;
    backend.seed(
        EVENTS_TABLE,
        json!({ "title": "Mine", "event_date": "2025-03-01T19:00", "status": "rejected", "user_id": owner_id }),
    );
    assert_eq!(fetch_detail(&backend, &owner, Some(1)).await.unwrap().title, "Mine");
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[test]
fn stale_completions_are_discarded() {
    let mut list = ListController::new(ListFilter::approved(), 12);
    let first = list.begin(ListFilter::approved().with_category("Music"));
    let second = list.begin(ListFilter::approved().with_category("Technology"));

    assert!(list.complete(&second, Ok(loaded(&["Tech"]))));
    assert!(!list.complete(&first, Ok(loaded(&["Jazz", "Blues"]))));
    assert_eq!(list.visible()[0].title, "Tech");
}

#[test]
fn refresh_supersedes_an_in_flight_fetch_with_the_same_filter() {
    let mut list = ListController::default();
    let before = list.refresh();
    let after = list.refresh();
    assert!(!list.complete(&before, Ok(loaded(&["Old"]))));
    assert!(list.complete(&after, Ok(loaded(&["New"]))));
}

#[test]
fn load_more_widens_the_window_until_exhausted() {
    let titles: Vec<String> = (0..5).map(|i| format!("E{i}")).collect();
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
    let mut list = ListController::new(ListFilter::approved(), 2);
    let ticket = list.refresh();
    list.complete(&ticket, Ok(loaded(&refs)));

    assert_eq!(list.counts(), (2, 5));
    assert!(list.load_more());
    assert!(list.load_more());
    assert_eq!(list.counts(), (5, 5));
    assert!(!list.has_more());
    assert!(!list.load_more());
    assert_eq!(list.page(), 3);
}

#[test]
fn featured_strip_only_when_unfiltered() {
    let mut list = ListController::default();
    let ticket = list.refresh();
    list.complete(&ticket, Ok(loaded(&["A", "B", "C", "D"])));
    assert_eq!(list.featured().len(), 3);

    let ticket = list.begin(ListFilter::approved().with_search("a"));
    list.complete(&ticket, Ok(loaded(&["A"])));
    assert!(list.featured().is_empty());
}

#[test]
fn messages_follow_state() {
    let mut list = ListController::new(ListFilter::approved().with_category("Music"), 12);
    assert_eq!(list.message().as_deref(), Some("Loading events..."));
    let ticket = list.refresh();
    list.complete(&ticket, Ok(Vec::new()));
    assert_eq!(list.message().as_deref(), Some("No events in category \"Music\" yet."));
    let ticket = list.refresh();
    list.complete(&ticket, Err(Error::Network("offline".into())));
    assert!(list.message().unwrap().starts_with("Failed to load events"));
    assert!(list.visible().is_empty());
}

#[tokio::test]
async fn load_more_never_requeries() {
    let backend = MemoryBackend::new();
    for i in 0..15 {
        seed_event(&backend, &format!("Event {i}"), "Music", "approved");
    }
    let mut list = ListController::new(ListFilter::approved(), 12);
    list.load(&backend, ListFilter::approved(), Some(university_embed())).await.unwrap();
    let reads = backend.select_count();

    assert_eq!(list.counts(), (12, 15));
    assert_eq!(list.visible()[0].title, "Event 14");
    list.load_more();
    assert_eq!(list.counts(), (15, 15));
    assert_eq!(backend.select_count(), reads);
}

#[tokio::test]
async fn load_records_failures() {
    let backend = MemoryBackend::new();
    backend.set_policy(Policy { fail_reads: true, ..Policy::default() });
    let mut list = ListController::default();
    assert!(list.load(&backend, ListFilter::approved(), None).await.is_err());
    assert!(matches!(list.state(), ListState::Failed(_)));
}
