use super::*;
use crate::backend::memory::{MemoryBackend, Policy};
use crate::models::PROFILES_TABLE;
use serde_json::json;
use uuid::Uuid;

fn signed_in(profile: Option<serde_json::Value>) -> MemoryBackend {
    let backend = MemoryBackend::new();
    let id = Uuid::new_v4();
    if let Some(mut profile) = profile {
        profile["id"] = json!(id);
        backend.seed(PROFILES_TABLE, profile);
    }
    backend.sign_in_as(AuthUser { id, email: None });
    backend
}

#[test]
fn initials_follow_word_rules() {
    assert_eq!(initials(""), "?");
    assert_eq!(initials("   "), "?");
    assert_eq!(initials("ada"), "A");
    assert_eq!(initials("Ada Lovelace"), "AL");
    assert_eq!(initials("  grace  brewster murray hopper "), "GH");
}

#[test]
fn avatar_carries_initials() {
    assert_eq!(avatar_url("AL"), "https://placehold.co/40x40/6366f1/ffffff?text=AL");
}

#[test]
fn avatar_encodes_non_ascii_and_reserved_initials() {
    assert_eq!(avatar_url(&initials("Émile Zola")), "https://placehold.co/40x40/6366f1/ffffff?text=%C3%89Z");
    assert_eq!(avatar_url(&initials("")), "https://placehold.co/40x40/6366f1/ffffff?text=%3F");
    assert_eq!(avatar_url("A&B"), "https://placehold.co/40x40/6366f1/ffffff?text=A%26B");
}

#[tokio::test]
async fn logged_out_visitors_get_login_and_signup() {
    let state = resolve(&MemoryBackend::new()).await;
    assert_eq!(state, HeaderState::LoggedOut);
    let labels: Vec<&str> = state.menu_items().iter().map(|m| m.label).collect();
    assert_eq!(labels, vec!["Login", "Sign Up"]);
    assert_eq!(state.avatar_url(), None);
}

#[tokio::test]
async fn blank_name_is_an_incomplete_profile() {
    let backend = signed_in(Some(json!({ "full_name": " ", "role": "user" })));
    let state = resolve(&backend).await;
    assert_eq!(state, HeaderState::IncompleteProfile);
    assert_eq!(state.menu_items()[0].target, MenuTarget::Page(Page::CompleteProfile));
}

#[tokio::test]
async fn missing_profile_row_is_an_incomplete_profile() {
    assert_eq!(resolve(&signed_in(None)).await, HeaderState::IncompleteProfile);
}

#[tokio::test]
async fn complete_profile_menu_depends_on_role() {
    let user = resolve(&signed_in(Some(json!({ "full_name": "Ada Lovelace", "role": "user" })))).await;
    assert_eq!(
        user,
        HeaderState::Complete { display_name: "Ada Lovelace".into(), initials: "AL".into(), is_admin: false }
    );
    assert!(user.menu_items().iter().any(|m| m.target == MenuTarget::Page(Page::Submit)));

    let admin = resolve(&signed_in(Some(json!({ "full_name": "Root", "role": "admin" })))).await;
    assert!(admin.menu_items().iter().any(|m| m.target == MenuTarget::Page(Page::Admin)));
    assert_eq!(admin.menu_items().last().unwrap().target, MenuTarget::Logout);
}

#[tokio::test]
async fn failed_profile_lookup_degrades_to_incomplete() {
    let backend = signed_in(Some(json!({ "full_name": "Ada", "role": "user" })));
    backend.set_policy(Policy { fail_reads: true, ..Policy::default() });
    assert_eq!(resolve(&backend).await, HeaderState::IncompleteProfile);
}

#[tokio::test]
async fn logout_clears_the_session_and_lands_on_index() {
    let backend = signed_in(None);
    assert_eq!(logout(&backend).await.unwrap(), Page::Index);
    assert_eq!(resolve(&backend).await, HeaderState::LoggedOut);
}
