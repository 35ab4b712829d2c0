use super::*;

#[test]
fn detail_and_edit_pages_carry_the_id() {
    assert_eq!(Page::EventDetail(42).href(), "/main/event-detail.html?id=42");
    assert_eq!(Page::Edit(7).href(), "/user/submit-event.html?edit=7");
}

#[test]
fn query_param_finds_named_value() {
    assert_eq!(query_param("?id=42&x=1", "id").as_deref(), Some("42"));
    assert_eq!(query_param("x=1&id=42", "id").as_deref(), Some("42"));
    assert_eq!(query_param("?x=1", "id"), None);
    assert_eq!(query_param("", "id"), None);
}

#[test]
fn query_param_percent_decodes() {
    assert_eq!(query_param("?q=jazz%20night+live", "q").as_deref(), Some("jazz night live"));
    assert_eq!(query_param("?q=100%", "q").as_deref(), Some("100%"));
    assert_eq!(query_param("?q=caf%C3%A9&q=second", "q").as_deref(), Some("café"));
}

#[test]
fn flag_without_value_is_empty() {
    assert_eq!(query_param("?edit", "edit").as_deref(), Some(""));
}

#[test]
fn event_id_param_rejects_non_numeric() {
    assert_eq!(event_id_param("?id=12", "id"), Some(12));
    assert_eq!(event_id_param("?id=abc", "id"), None);
    assert_eq!(event_id_param("?edit=", "edit"), None);
}
