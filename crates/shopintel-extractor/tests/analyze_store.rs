//! End-to-end tests for `StoreAnalyzer::analyze`.
//!
//! Each test stands up a `wiremock` server playing a Shopify storefront.
//! Unmatched paths return 404, which doubles as the "page does not exist"
//! case the parsers must degrade through.

use serde_json::json;
use shopintel_core::{AppConfig, Category, LinkCategory, PolicyKind, SocialPlatform};
use shopintel_extractor::{ExtractError, StoreAnalyzer};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_analyzer() -> StoreAnalyzer {
    let config = AppConfig {
        request_timeout_secs: 5,
        max_retries: 0,
        retry_backoff_base_ms: 0,
        ..AppConfig::default()
    };
    StoreAnalyzer::new(config).expect("failed to build test StoreAnalyzer")
}

fn catalog_body() -> serde_json::Value {
    json!({
        "products": [
            {
                "id": 123,
                "title": "Lippie Pencil",
                "handle": "lippie-pencil",
                "body_html": "<p>A long-wearing lip pencil.</p>",
                "vendor": "ColourPop",
                "product_type": "Lip Liner",
                "tags": ["lips"],
                "images": [{"src": "https://cdn.example.com/lippie.jpg"}],
                "variants": [{"price": "5.00", "compare_at_price": null, "available": true}]
            },
            {
                "id": 456,
                "title": "Lux Gloss",
                "handle": "lux-gloss",
                "body_html": null,
                "tags": [],
                "images": [],
                "variants": [{"price": "7.50", "available": false}]
            }
        ]
    })
}

fn homepage_html() -> String {
    r#"<!doctype html>
<html>
  <head>
    <title>ColourPop | Makeup &amp; Beauty</title>
    <meta property="og:description" content="Bold, cruelty-free makeup at prices that make sense.">
  </head>
  <body>
    <header>
      <nav>
        <a href="/pages/contact">Contact Us</a>
        <a href="/pages/track-order">Track Your Order</a>
        <a href="/blogs/news">Blog</a>
        <a href="/collections/all">Shop All</a>
      </nav>
      <a href="https://instagram.com/colourpopcosmetics">Instagram</a>
    </header>
    <section class="featured-collection">
      <a href="/products/lippie-pencil">Lippie Pencil</a>
      <a href="/products/mystery-item">Mystery Item</a>
    </section>
    <footer>
      <a href="https://www.instagram.com/colourpopcosmetics/">Instagram</a>
      <p>Questions? Email support@colourpop.com or call (555) 123-4567.</p>
    </footer>
  </body>
</html>"#
        .to_string()
}

fn faq_page_html() -> String {
    r#"<main>
  <details>
    <summary>Do you ship internationally?</summary>
    <p>Yes, we ship worldwide within 7-14 business days.</p>
  </details>
</main>"#
        .to_string()
}

fn privacy_page_html() -> String {
    format!(
        "<main><h1>Privacy Policy</h1><p>{}</p></main>",
        "We only collect what the order needs. ".repeat(10)
    )
}

/// Mounts the probe endpoint plus a two-page catalog (page 2 empty).
async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&catalog_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&catalog_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"products": []})))
        .mount(server)
        .await;
}

async fn mount_homepage(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(homepage_html())
                .insert_header("Content-Type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_full_store(server: &MockServer) {
    mount_catalog(server).await;
    mount_homepage(server).await;
    Mock::given(method("GET"))
        .and(path("/pages/faq"))
        .respond_with(ResponseTemplate::new(200).set_body_string(faq_page_html()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/policies/privacy-policy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(privacy_page_html()))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Full extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_extraction_builds_consistent_record() {
    let server = MockServer::start().await;
    mount_full_store(&server).await;

    let record = test_analyzer().analyze(&server.uri()).await.unwrap();

    assert!(record.extraction_success);
    assert_eq!(record.total_products, record.product_catalog.len());
    assert_eq!(record.total_products, 2);
    assert_eq!(record.currency.as_deref(), Some("USD"));
    assert_eq!(record.brand_name.as_deref(), Some("ColourPop"));
    assert_eq!(
        record.about_brand.as_deref(),
        Some("Bold, cruelty-free makeup at prices that make sense."),
        "about falls back to the homepage meta description"
    );
}

#[tokio::test]
async fn hero_link_to_cataloged_product_carries_full_fields() {
    let server = MockServer::start().await;
    mount_full_store(&server).await;

    let record = test_analyzer().analyze(&server.uri()).await.unwrap();

    assert_eq!(record.hero_products.len(), 2);
    let lippie = &record.hero_products[0];
    assert_eq!(lippie.id.as_deref(), Some("123"), "matched hero carries the catalog id");
    assert_eq!(lippie.title, "Lippie Pencil");
    assert_eq!(lippie.price.as_deref(), Some("5.00"));
    assert_eq!(lippie.images, vec!["https://cdn.example.com/lippie.jpg"]);

    let mystery = &record.hero_products[1];
    assert!(mystery.id.is_none(), "unmatched hero stays a stub");
    assert_eq!(mystery.title, "Mystery Item");
    assert!(mystery.price.is_none());
}

#[tokio::test]
async fn social_links_in_header_and_footer_dedupe_to_one() {
    let server = MockServer::start().await;
    mount_full_store(&server).await;

    let record = test_analyzer().analyze(&server.uri()).await.unwrap();

    let instagram: Vec<_> = record
        .social_handles
        .iter()
        .filter(|h| h.platform == SocialPlatform::Instagram)
        .collect();
    assert_eq!(instagram.len(), 1, "exactly one Instagram entry after dedup");
    assert_eq!(instagram[0].handle, "colourpopcosmetics");
}

#[tokio::test]
async fn contact_faq_policy_and_links_are_extracted() {
    let server = MockServer::start().await;
    mount_full_store(&server).await;

    let record = test_analyzer().analyze(&server.uri()).await.unwrap();

    assert!(record.contact_info.emails.contains("support@colourpop.com"));
    assert!(record.contact_info.phone_numbers.contains("5551234567"));

    assert_eq!(record.faqs.len(), 1);
    assert_eq!(record.faqs[0].question, "Do you ship internationally?");

    let privacy = record.policies.get(&PolicyKind::Privacy).expect("privacy policy");
    assert!(privacy.content.contains("We only collect what the order needs."));
    assert!(privacy.url.ends_with("/policies/privacy-policy"));
    assert!(
        !record.policies.contains_key(&PolicyKind::Shipping),
        "unpublished kinds have no entry"
    );

    let categories: Vec<LinkCategory> =
        record.important_links.iter().map(|l| l.category).collect();
    assert!(categories.contains(&LinkCategory::Contact));
    assert!(categories.contains(&LinkCategory::Tracking));
    assert!(categories.contains(&LinkCategory::Blog));
}

// ---------------------------------------------------------------------------
// Gate and request-level failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_shopify_site_is_a_named_failure() {
    let server = MockServer::start().await;
    mount_homepage(&server).await; // reachable site, but no products.json

    let result = test_analyzer().analyze(&server.uri()).await;

    assert!(
        matches!(result, Err(ExtractError::NotShopify { .. })),
        "expected NotShopify, got: {result:?}"
    );
}

#[tokio::test]
async fn html_at_products_json_fails_the_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not a shop</html>"))
        .mount(&server)
        .await;

    let result = test_analyzer().analyze(&server.uri()).await;
    assert!(matches!(result, Err(ExtractError::NotShopify { .. })));
}

#[tokio::test]
async fn catalog_failure_after_probe_is_a_request_failure() {
    let server = MockServer::start().await;
    mount_homepage(&server).await;
    // The probe sees a healthy listing once; the catalog fetch then 404s.
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&catalog_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let result = test_analyzer().analyze(&server.uri()).await;
    assert!(
        matches!(result, Err(ExtractError::CatalogUnavailable { .. })),
        "expected CatalogUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn invalid_url_fails_before_any_fetch() {
    let result = test_analyzer().analyze("http://").await;
    assert!(matches!(result, Err(ExtractError::InvalidUrl { .. })));
}

// ---------------------------------------------------------------------------
// Graceful degradation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_pages_degrade_to_notes_not_failure() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_homepage(&server).await;
    // No FAQ, policy, about, or contact pages: all candidate paths 404.

    let record = test_analyzer().analyze(&server.uri()).await.unwrap();

    assert!(record.extraction_success, "missing categories do not flip success");
    assert!(record.policies.is_empty());
    assert_eq!(
        record.category_notes.get(&Category::Policies).map(String::as_str),
        Some("no policy pages found")
    );
    assert_eq!(
        record.category_notes.get(&Category::Faqs).map(String::as_str),
        Some("no FAQ page found")
    );
}

#[tokio::test]
async fn empty_catalog_is_still_a_successful_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({"products": []})))
        .mount(&server)
        .await;
    mount_homepage(&server).await;

    let record = test_analyzer().analyze(&server.uri()).await.unwrap();

    assert!(record.extraction_success);
    assert_eq!(record.total_products, 0);
    assert!(record.product_catalog.is_empty());
    assert_eq!(record.currency.as_deref(), Some("USD"), "currency falls back to the default");
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_analysis_of_fixed_responses_is_identical() {
    let server = MockServer::start().await;
    mount_full_store(&server).await;

    let analyzer = test_analyzer();
    let first = analyzer.analyze(&server.uri()).await.unwrap();
    let second = analyzer.analyze(&server.uri()).await.unwrap();

    let mut first_json = serde_json::to_value(&first).unwrap();
    let mut second_json = serde_json::to_value(&second).unwrap();
    first_json.as_object_mut().unwrap().remove("analysis_timestamp");
    second_json.as_object_mut().unwrap().remove("analysis_timestamp");

    assert_eq!(first_json, second_json, "non-timestamp fields must be identical");
}
