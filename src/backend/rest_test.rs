use super::*;
use crate::config::{ClientConfig, Timeouts};

fn config() -> ClientConfig {
    ClientConfig::new("https://demo.supabase.co", "anon-key")
}

#[test]
fn endpoints_hang_off_the_base_url() {
    let base = "https://demo.supabase.co";
    assert_eq!(auth_endpoint(base, "user"), "https://demo.supabase.co/auth/v1/user");
    assert_eq!(rest_endpoint(base, "events"), "https://demo.supabase.co/rest/v1/events");
    assert_eq!(
        storage_object_endpoint(base, "posters", "u-1-a.png"),
        "https://demo.supabase.co/storage/v1/object/posters/u-1-a.png"
    );
}

#[test]
fn public_url_uses_public_prefix() {
    let backend = RestBackend::new(&config()).unwrap();
    assert_eq!(
        backend.public_url("posters", "u-1-a.png"),
        "https://demo.supabase.co/storage/v1/object/public/posters/u-1-a.png"
    );
}

#[test]
fn error_message_prefers_known_fields() {
    assert_eq!(parse_error_message(r#"{"code":"42501","message":"permission denied"}"#), "permission denied");
    assert_eq!(parse_error_message(r#"{"error":"invalid_grant","error_description":"Bad login"}"#), "Bad login");
    assert_eq!(parse_error_message(r#"{"msg":"User already registered"}"#), "User already registered");
}

#[test]
fn error_message_falls_back_to_raw_body() {
    assert_eq!(parse_error_message("  upstream timeout \n"), "upstream timeout");
    assert_eq!(parse_error_message(r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
}

#[test]
fn access_token_round_trips() {
    let backend = RestBackend::new(&config()).unwrap().with_access_token(Some("jwt".into()));
    assert_eq!(backend.access_token().as_deref(), Some("jwt"));
    backend.set_access_token(None);
    assert!(backend.access_token().is_none());
}

#[tokio::test]
async fn current_user_without_token_skips_the_network() {
    let cfg = ClientConfig { timeouts: Timeouts { request_secs: 1, connect_secs: 1 }, ..config() };
    let backend = RestBackend::new(&cfg).unwrap();
    assert_eq!(backend.current_user().await, Ok(None));
}
