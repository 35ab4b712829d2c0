use super::*;
use crate::backend::memory::MemoryBackend;
use crate::models::AuthUser;

fn signup() -> SignupForm {
    SignupForm {
        full_name: "Grace Hopper".into(),
        university: "Yale".into(),
        email: "grace@example.com".into(),
        password: "Navy1906".into(),
        confirmation: "Navy1906".into(),
    }
}

#[test]
fn password_rules() {
    assert!(PasswordChecks::of("Abcde1").all_met());
    assert!(!PasswordChecks::of("Abc1").long_enough);
    assert!(!PasswordChecks::of("abcdef1").has_uppercase);
    assert!(!PasswordChecks::of("Abcdefg").has_digit);
}

#[test]
fn confirmation_states() {
    assert_eq!(password_match("Abcde1", ""), PasswordMatch::Empty);
    assert_eq!(password_match("Abcde1", "Abcde1"), PasswordMatch::Matches);
    assert_eq!(password_match("Abcde1", "abcde1"), PasswordMatch::Mismatch);
}

#[test]
fn signup_validation_checks_match_before_rules() {
    let mismatch = SignupForm { confirmation: "other".into(), ..signup() };
    assert_eq!(mismatch.validate(), Err(Error::Validation("Passwords do not match.".into())));
    let weak = SignupForm { password: "weak".into(), confirmation: "weak".into(), ..signup() };
    assert!(matches!(weak.validate(), Err(Error::Validation(m)) if m.contains("uppercase")));
}

#[tokio::test]
async fn sign_up_then_sign_in_lands_home_for_complete_profiles() {
    let backend = MemoryBackend::new();
    assert_eq!(sign_up(&backend, &signup()).await.unwrap(), Page::Login);
    let (session, page) = sign_in(&backend, "grace@example.com", "Navy1906").await.unwrap();
    assert_eq!(page, Page::Home);
    assert_eq!(session.user.email.as_deref(), Some("grace@example.com"));
}

#[tokio::test]
async fn nameless_sign_up_lands_on_profile_completion() {
    let backend = MemoryBackend::new();
    sign_up(&backend, &SignupForm { full_name: String::new(), ..signup() }).await.unwrap();
    let (session, page) = sign_in(&backend, "grace@example.com", "Navy1906").await.unwrap();
    assert_eq!(page, Page::CompleteProfile);

    let form = ProfileForm { full_name: "Grace Hopper".into(), university: "Yale".into() };
    assert_eq!(complete_profile(&backend, session.user.id, &form).await.unwrap(), Page::Home);
    let (_, page) = sign_in(&backend, "grace@example.com", "Navy1906").await.unwrap();
    assert_eq!(page, Page::Home);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let backend = MemoryBackend::new();
    sign_up(&backend, &signup()).await.unwrap();
    assert!(matches!(sign_in(&backend, "grace@example.com", "nope").await, Err(Error::Rejected { status: 400, .. })));
}

#[tokio::test]
async fn completing_a_missing_profile_is_no_rows_affected() {
    let backend = MemoryBackend::new();
    let user = AuthUser { id: Uuid::new_v4(), email: None };
    backend.sign_in_as(user.clone());
    let form = ProfileForm { full_name: "Ada".into(), university: String::new() };
    assert_eq!(complete_profile(&backend, user.id, &form).await, Err(Error::NoRowsAffected));
    let blank = ProfileForm::default();
    assert!(matches!(complete_profile(&backend, user.id, &blank).await, Err(Error::Validation(_))));
}
