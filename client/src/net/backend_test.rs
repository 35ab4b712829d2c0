use super::*;

#[test]
fn browser_config_requires_url_and_key() {
    assert!(matches!(browser_config(None, Some("k"), None), Err(Error::Config(_))));
    assert!(matches!(browser_config(Some("https://x.example"), Some(" "), None), Err(Error::Config(_))));
}

#[test]
fn browser_config_applies_page_size() {
    let config = browser_config(Some("https://x.example/"), Some("anon"), Some("6")).unwrap();
    assert_eq!(config.backend_url, "https://x.example");
    assert_eq!(config.page_size, 6);

    let zero = browser_config(Some("https://x.example"), Some("anon"), Some("0")).unwrap();
    assert_eq!(zero.page_size, 1);

    let garbage = browser_config(Some("https://x.example"), Some("anon"), Some("many")).unwrap();
    assert_eq!(garbage.page_size, eventboard::config::DEFAULT_PAGE_SIZE);
}

#[cfg(not(feature = "csr"))]
#[test]
fn stored_token_is_none_outside_the_browser() {
    assert_eq!(stored_token(), None);
}
