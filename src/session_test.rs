use super::*;
use crate::backend::memory::{MemoryBackend, Policy};
use serde_json::json;

fn user(id: Uuid) -> AuthUser {
    AuthUser { id, email: Some("ada@example.com".into()) }
}

fn backend_with_profile(role: &str) -> (MemoryBackend, Uuid) {
    let backend = MemoryBackend::new();
    let id = Uuid::new_v4();
    backend.seed(PROFILES_TABLE, json!({ "id": id, "full_name": "Ada Lovelace", "role": role }));
    backend.sign_in_as(user(id));
    (backend, id)
}

#[tokio::test]
async fn public_pages_pass_without_a_user() {
    let backend = MemoryBackend::new();
    let session = guard(&backend, Requirement::Public).await.unwrap();
    assert_eq!(session.user, None);
    assert!(session.require_user().is_err());
}

#[tokio::test]
async fn authenticated_pages_redirect_anonymous_visitors_to_login() {
    let backend = MemoryBackend::new();
    let denied = guard(&backend, Requirement::Authenticated).await.unwrap_err();
    assert_eq!(denied.redirect, Page::Login);
    assert_eq!(denied.reason, Error::Unauthenticated);
}

#[tokio::test]
async fn authenticated_pages_load_the_profile_when_present() {
    let (backend, id) = backend_with_profile("user");
    let session = guard(&backend, Requirement::Authenticated).await.unwrap();
    assert_eq!(session.require_user().unwrap().id, id);
    assert_eq!(session.profile.unwrap().full_name.as_deref(), Some("Ada Lovelace"));
}

#[tokio::test]
async fn admin_page_accepts_admin_role() {
    let (backend, _) = backend_with_profile("admin");
    let session = guard(&backend, Requirement::Admin).await.unwrap();
    assert!(session.is_admin());
}

#[tokio::test]
async fn admin_page_sends_regular_users_to_dashboard() {
    let (backend, _) = backend_with_profile("user");
    let denied = guard(&backend, Requirement::Admin).await.unwrap_err();
    assert_eq!(denied.redirect, Page::Dashboard);
    assert_eq!(denied.message, Some(ADMIN_REQUIRED_MESSAGE));
    assert_eq!(denied.reason, Error::Forbidden);
}

#[tokio::test]
async fn admin_page_denies_when_profile_is_missing() {
    let backend = MemoryBackend::new();
    backend.sign_in_as(user(Uuid::new_v4()));
    let denied = guard(&backend, Requirement::Admin).await.unwrap_err();
    assert_eq!(denied.redirect, Page::Dashboard);
}

#[tokio::test]
async fn failed_role_lookup_is_not_authorized() {
    let (backend, _) = backend_with_profile("admin");
    backend.set_policy(Policy { fail_reads: true, ..Policy::default() });
    let denied = guard(&backend, Requirement::Admin).await.unwrap_err();
    assert_eq!(denied.reason, Error::Forbidden);
}
