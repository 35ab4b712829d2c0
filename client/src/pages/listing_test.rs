use super::*;

#[test]
fn community_button_depends_on_session() {
    assert_eq!(community_target(true), Page::Dashboard);
    assert_eq!(community_target(false), Page::Login);
}

#[test]
fn all_category_is_labelled_and_clears_filter() {
    assert_eq!(category_label("all"), "All");
    assert_eq!(category_label("Music"), "Music");
    assert_eq!(ListFilter::approved().with_category(CATEGORIES[0]).category, None);
}

#[test]
fn counts_line_hidden_for_empty_results() {
    assert_eq!(counts_line((0, 0)), None);
    assert_eq!(counts_line((12, 30)).as_deref(), Some("Showing 12 of 30 events"));
}
