#![cfg(not(feature = "csr"))]

use super::*;

#[test]
fn prompts_decline_outside_the_browser() {
    assert!(!BrowserPrompt.confirm("Delete?"));
    BrowserPrompt.notify("ignored");
}

#[test]
fn location_is_empty_outside_the_browser() {
    assert_eq!(location_search(), "");
    assert_eq!(now_ms(), 0);
}

#[test]
fn navigation_helpers_are_noops_but_callable() {
    navigate(Page::Index);
    set_document_title("x");
    on_page_restored(|| {});
}
