use super::*;

fn test_client(base_url: &str) -> WooClient {
    WooClient::new(base_url, "ck_test", "cs_secret", 30)
        .expect("client construction should not fail")
}

#[test]
fn listing_url_constructs_correct_query_string() {
    let client = test_client("https://shop.example.com");
    let url = client.listing_url(&client.products_url, 1, 50);
    assert_eq!(
        url.as_str(),
        "https://shop.example.com/wp-json/wc/v3/products\
         ?consumer_key=ck_test&consumer_secret=cs_secret&page=1&per_page=50"
    );
}

#[test]
fn listing_url_strips_trailing_slash_from_base() {
    let client = test_client("https://shop.example.com/");
    let url = client.listing_url(&client.categories_url, 2, 100);
    assert_eq!(
        url.as_str(),
        "https://shop.example.com/wp-json/wc/v3/products/categories\
         ?consumer_key=ck_test&consumer_secret=cs_secret&page=2&per_page=100"
    );
}

#[test]
fn listing_url_preserves_base_path() {
    let client = test_client("https://example.com/store");
    let url = client.listing_url(&client.products_url, 1, 50);
    assert!(
        url.as_str()
            .starts_with("https://example.com/store/wp-json/wc/v3/products?"),
        "base path should be preserved: {url}"
    );
}

#[test]
fn listing_url_encodes_credentials() {
    let client = WooClient::new("https://shop.example.com", "ck_a&b", "cs_c d", 30)
        .expect("client construction should not fail");
    let url = client.listing_url(&client.products_url, 1, 50);
    assert!(
        url.as_str().contains("consumer_key=ck_a%26b"),
        "key should be percent-encoded: {url}"
    );
}

#[test]
fn new_rejects_invalid_base_url() {
    let result = WooClient::new("not a url", "ck", "cs", 30);
    assert!(
        matches!(result, Err(WooError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}

#[test]
fn display_url_strips_credentials() {
    let client = test_client("https://shop.example.com");
    let url = client.listing_url(&client.products_url, 1, 50);
    let shown = display_url(&url);
    assert_eq!(shown, "https://shop.example.com/wp-json/wc/v3/products");
    assert!(!shown.contains("cs_secret"));
}

#[test]
fn truncate_body_short_body_is_unchanged() {
    assert_eq!(truncate_body("short"), "short");
}

#[test]
fn truncate_body_long_body_is_cut_with_marker() {
    let body = "x".repeat(2000);
    let cut = truncate_body(&body);
    assert!(cut.len() < body.len());
    assert!(cut.contains("2000 bytes total"), "got: {cut}");
}

#[test]
fn truncate_body_respects_char_boundaries() {
    let body = "é".repeat(MAX_ERROR_BODY_LEN);
    let cut = truncate_body(&body);
    assert!(cut.contains("bytes total"));
}
