use super::*;

/// # Safety
/// Env mutation races with other tests touching the same keys; only this
/// module does.
unsafe fn clear_env() {
    unsafe {
        std::env::remove_var("EVENTBOARD_URL");
        std::env::remove_var("EVENTBOARD_ANON_KEY");
        std::env::remove_var("EVENTBOARD_BUCKET");
        std::env::remove_var("EVENTBOARD_PAGE_SIZE");
        std::env::remove_var("EVENTBOARD_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("EVENTBOARD_CONNECT_TIMEOUT_SECS");
    }
}

#[test]
fn new_trims_trailing_slash_and_applies_defaults() {
    let cfg = ClientConfig::new("https://demo.supabase.co/ ", " key ");
    assert_eq!(cfg.backend_url, "https://demo.supabase.co");
    assert_eq!(cfg.anon_key, "key");
    assert_eq!(cfg.bucket, DEFAULT_BUCKET);
    assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(
        cfg.timeouts,
        Timeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn from_env_reads_required_and_optional_values() {
    unsafe {
        clear_env();
        std::env::set_var("EVENTBOARD_URL", "https://x.test/");
        std::env::set_var("EVENTBOARD_ANON_KEY", "anon");
        std::env::set_var("EVENTBOARD_BUCKET", "flyers");
        std::env::set_var("EVENTBOARD_PAGE_SIZE", "6");
        std::env::set_var("EVENTBOARD_REQUEST_TIMEOUT_SECS", "5");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.backend_url, "https://x.test");
    assert_eq!(cfg.bucket, "flyers");
    assert_eq!(cfg.page_size, 6);
    assert_eq!(cfg.timeouts.request_secs, 5);
    assert_eq!(cfg.timeouts.connect_secs, DEFAULT_CONNECT_TIMEOUT_SECS);

    unsafe {
        std::env::set_var("EVENTBOARD_PAGE_SIZE", "0");
        std::env::set_var("EVENTBOARD_ANON_KEY", "   ");
    }
    assert!(matches!(ClientConfig::from_env(), Err(Error::Config(msg)) if msg.contains("EVENTBOARD_ANON_KEY")));

    unsafe {
        std::env::set_var("EVENTBOARD_ANON_KEY", "anon");
    }
    assert_eq!(ClientConfig::from_env().unwrap().page_size, 1);

    unsafe { clear_env() };
}
