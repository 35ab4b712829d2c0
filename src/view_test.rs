use super::*;
use crate::models::ProfileSummary;
use serde_json::json;

fn event(extra: serde_json::Value) -> Event {
    let mut row = json!({
        "id": 7,
        "title": "Jazz Night",
        "event_date": "2025-03-01T19:30:00Z",
        "status": "pending",
        "created_at": "2025-02-10T08:05:00Z",
    });
    if let (Some(row), Some(extra)) = (row.as_object_mut(), extra.as_object()) {
        row.extend(extra.clone());
    }
    serde_json::from_value(row).unwrap()
}

#[test]
fn dates_format_long_and_short() {
    let e = event(json!({}));
    assert_eq!(long_date(&e.event_date), "Saturday, 1 March 2025");
    assert_eq!(short_date(&e.event_date), "01/03/2025");
    assert_eq!(date_and_time(&e.event_date), "01/03/2025 • 19:30");
}

#[test]
fn public_card_falls_back_for_missing_fields() {
    let card = EventCard::from(&event(json!({ "image_url": "  " })));
    assert_eq!(card.category, CATEGORY_FALLBACK);
    assert_eq!(card.university, UNIVERSITY_FALLBACK);
    assert_eq!(card.image, None);
    assert_eq!(card.detail_href, "/main/event-detail.html?id=7");
}

#[test]
fn public_card_shows_submitter_university() {
    let card = EventCard::from(&event(json!({ "category": "Music", "profiles": { "university": "MIT" } })));
    assert_eq!(card.category, "Music");
    assert_eq!(card.university, "MIT");
}

#[test]
fn admin_card_names_submitter_or_deleted_user() {
    let mut e = event(json!({}));
    assert_eq!(AdminCard::from(&e).submitter, DELETED_SUBMITTER);

    e.profile = Some(ProfileSummary { full_name: Some("Ada".into()), university: None, phone_number: None });
    assert_eq!(AdminCard::from(&e).submitter, "Ada • No contact");

    let card = AdminCard::from(&e);
    assert_eq!(card.description, DESCRIPTION_FALLBACK);
    assert_eq!(card.location, LOCATION_FALLBACK);
    assert_eq!(card.submitted, "Submitted 10/02/2025 • 08:05");
    assert_eq!(card.badge.label, "Pending");
    assert!(card.actions.contains(&Action::Approve));
}

#[test]
fn admin_card_for_decided_event_offers_no_status_actions() {
    let card = AdminCard::from(&event(json!({ "status": "approved" })));
    assert_eq!(card.actions, &[Action::View, Action::Delete]);
    assert_eq!(card.badge.label, "Approved");
}

#[test]
fn dashboard_item_uses_owner_labels() {
    let item = DashboardItem::from(&event(json!({ "status": "approved" })));
    assert_eq!(item.badge.label, "Published");
    assert_eq!(item.submitted, "Submitted on 10/02/2025");
    assert_eq!(item.edit_href, "/user/submit-event.html?edit=7");
    assert!(item.image.contains("placehold.co"));
    assert_eq!(owner_badge(EventStatus::Pending).label, "Pending Review");
}

#[test]
fn detail_view_falls_back_for_organizer() {
    let view = EventDetailView::from(&event(json!({ "organizer_contact": "jazz@example.com" })));
    assert_eq!(view.page_title, "Event Detail - Jazz Night");
    assert_eq!(view.organizer_name, ORGANIZER_FALLBACK);
    assert_eq!(view.organizer_contact, "jazz@example.com");
    assert_eq!(view.category, None);
}
