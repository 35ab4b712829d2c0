use super::*;
use serde_json::json;

fn row() -> Value {
    json!({
        "id": 4,
        "title": "Jazz Night",
        "description": "Live quartet at the student center",
        "location": "Auditorium, Main Campus",
        "category": "Music",
        "status": "approved",
        "image_url": null
    })
}

// =============================================================
// Matching
// =============================================================

#[test]
fn eq_compares_numbers_as_text() {
    assert!(Filter::eq("id", 4).matches(&row()));
    assert!(!Filter::eq("id", 40).matches(&row()));
}

#[test]
fn eq_never_matches_null_or_missing() {
    assert!(!Filter::eq("image_url", "null").matches(&row()));
    assert!(!Filter::eq("nope", "x").matches(&row()));
}

#[test]
fn contains_is_case_insensitive() {
    assert!(Filter::contains("title", "JAZZ").matches(&row()));
    assert!(Filter::contains("description", "student").matches(&row()));
    assert!(!Filter::contains("title", "rock").matches(&row()));
}

#[test]
fn contains_any_matches_on_any_column() {
    let filter = Filter::contains_any(&["title", "description", "location"], "main campus");
    assert!(filter.matches(&row()));
    let miss = Filter::contains_any(&["title", "description"], "main campus");
    assert!(!miss.matches(&row()));
}

#[test]
fn ilike_anchors_without_wildcards() {
    assert!(ilike("Music", "music"));
    assert!(!ilike("Music Fest", "music"));
    assert!(ilike("Music Fest", "music%"));
    assert!(ilike("Big Music", "%music"));
    assert!(!ilike("x", "%x%x"));
}

#[test]
fn ilike_supports_single_character_and_escapes() {
    assert!(ilike("a_b", "a_b"));
    assert!(ilike("axb", "a_b"));
    assert!(!ilike("axb", "a\\_b"));
    assert!(ilike("50%", "50\\%"));
    assert!(!ilike("50 people", "50\\%%"));
    assert!(ilike("a\\b", "%\\\\%"));
}

#[test]
fn contains_escapes_wildcards_in_the_needle() {
    assert_eq!(
        Filter::contains("title", "50%_\\"),
        Filter::ILike { column: "title".to_owned(), pattern: "%50\\%\\_\\\\%".to_owned() }
    );
    let row = json!({ "title": "Discount 50 people" });
    assert!(!Filter::contains("title", "50%").matches(&row));
    assert!(!Filter::contains("title", "50%p").matches(&row));
    assert!(Filter::contains("title", "50").matches(&row));
    assert!(!Filter::contains("title", "a_b").matches(&json!({ "title": "axb other" })));
    assert!(Filter::contains("title", "a_b").matches(&json!({ "title": "a_b literal" })));
}

#[test]
fn select_requires_all_filters() {
    let q = Select::from("events").eq("status", "approved").eq("category", "Music");
    assert!(q.matches(&row()));
    let q = q.eq("id", 5);
    assert!(!q.matches(&row()));
}

// =============================================================
// Encoding
// =============================================================

#[test]
fn select_encodes_projection_filters_and_order() {
    let q = Select::from("events")
        .embed(Embed::new("profiles", &["full_name", "phone_number"], "user_id"))
        .eq("status", "pending")
        .order("created_at", false);
    assert_eq!(
        q.to_query_pairs(),
        vec![
            ("select".to_owned(), "*,profiles(full_name,phone_number)".to_owned()),
            ("status".to_owned(), "eq.pending".to_owned()),
            ("order".to_owned(), "created_at.desc".to_owned()),
        ]
    );
}

#[test]
fn or_group_uses_star_wildcards() {
    let q = Select::from("events").filter(Filter::contains_any(&["title", "location"], "rust"));
    let pairs = q.to_query_pairs();
    assert_eq!(pairs[1], ("or".to_owned(), "(title.ilike.*rust*,location.ilike.*rust*)".to_owned()));
}

#[test]
fn or_group_quotes_reserved_characters() {
    let q = Select::from("events").filter(Filter::contains_any(&["title"], "a,b (c)"));
    let pairs = q.to_query_pairs();
    assert_eq!(pairs[1].1, "(title.ilike.\"*a,b (c)*\")");
}

#[test]
fn escaped_wildcards_survive_star_encoding() {
    let q = Select::from("events").filter(Filter::contains("title", "50%"));
    assert_eq!(q.to_query_pairs()[1], ("title".to_owned(), "ilike.*50\\**".to_owned()));

    let q = Select::from("events").filter(Filter::contains_any(&["title"], "a_b*"));
    assert_eq!(q.to_query_pairs()[1].1, "(title.ilike.\"*a\\\\_b_*\")");
}

#[test]
fn limit_is_encoded_last() {
    let q = Select::from("events").columns("status").limit(3);
    let pairs = q.to_query_pairs();
    assert_eq!(pairs.first().unwrap().1, "status");
    assert_eq!(pairs.last().unwrap(), &("limit".to_owned(), "3".to_owned()));
}

#[test]
fn mutations_encode_scoping_filters() {
    let update = Update::table("events", json!({ "status": "approved" })).eq("id", 9).eq("status", "pending");
    assert_eq!(
        update.to_query_pairs(),
        vec![("id".to_owned(), "eq.9".to_owned()), ("status".to_owned(), "eq.pending".to_owned())]
    );
    let delete = Delete::from("events").eq("id", 9);
    assert_eq!(delete.to_query_pairs(), vec![("id".to_owned(), "eq.9".to_owned())]);
}

// =============================================================
// Ordering
// =============================================================

#[test]
fn compare_orders_descending_with_nulls_last() {
    let q = Select::from("events").order("created_at", false);
    let mut rows = vec![
        json!({ "created_at": "2025-01-01T00:00:00Z" }),
        json!({ "created_at": null }),
        json!({ "created_at": "2025-02-01T00:00:00Z" }),
    ];
    rows.sort_by(|a, b| q.compare(a, b));
    assert_eq!(rows[0]["created_at"], "2025-02-01T00:00:00Z");
    assert_eq!(rows[1]["created_at"], "2025-01-01T00:00:00Z");
}
