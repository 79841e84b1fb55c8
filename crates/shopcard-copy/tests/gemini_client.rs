//! Integration tests for `GeminiClient` and `DescriptionService` using
//! wiremock HTTP mocks.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use shopcard_copy::{cache_key, CopyError, DescriptionService, DescriptionSource, GeminiClient};
use shopcard_core::{MemoryStore, Product, StorageBackend};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-test";
const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::with_base_url("test-key", MODEL, 5, base_url)
        .expect("client construction should not fail")
}

fn product() -> Product {
    Product {
        item_id: "4242".to_string(),
        product_name: "Smartwatch Pro".to_string(),
        price: Decimal::from_str("199.90").unwrap(),
        price_discount_rate: Some(Decimal::from(20)),
        sales: 1_500,
        rating_star: Some(Decimal::from_str("4.7").unwrap()),
        shop_name: None,
        image_url: "https://cdn.example.com/watch.jpg".to_string(),
        offer_link: None,
        free_shipping: Some(true),
    }
}

fn candidate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ], "role": "model" } }
        ]
    })
}

#[tokio::test]
async fn describe_returns_first_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(query_param("key", "test-key"))
        .and(body_string_contains("Smartwatch Pro"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("⌚ Time to upgrade!")))
        .mount(&server)
        .await;

    let text = test_client(&server.uri())
        .describe(&product(), "R$")
        .await
        .expect("should parse candidate");

    assert_eq!(text, "⌚ Time to upgrade!");
}

#[tokio::test]
async fn describe_maps_server_error_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .describe(&product(), "R$")
        .await
        .unwrap_err();

    assert!(
        matches!(err, CopyError::UnexpectedStatus { status: 500, .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn describe_rejects_candidates_without_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [ { "finishReason": "SAFETY" } ]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .describe(&product(), "R$")
        .await
        .unwrap_err();

    assert!(matches!(err, CopyError::EmptyResponse));
}

#[tokio::test]
async fn describe_reports_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .describe(&product(), "R$")
        .await
        .unwrap_err();

    assert!(matches!(err, CopyError::Deserialize { .. }));
}

#[tokio::test]
async fn service_caches_ai_text_and_serves_it_again() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("Fresh AI copy")))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let service = DescriptionService::new(Some(test_client(&server.uri())), store.clone(), 2);

    let first = service.describe(&product(), "R$").await;
    assert_eq!(first.source, DescriptionSource::Ai);
    assert_eq!(first.text, "Fresh AI copy");

    let second = service.describe(&product(), "R$").await;
    assert_eq!(second.source, DescriptionSource::Cache);
    assert_eq!(second.text, "Fresh AI copy");

    let stored = store.get(&cache_key(&product(), "R$")).unwrap();
    assert_eq!(stored.as_deref(), Some("Fresh AI copy".as_bytes()));
}

#[tokio::test]
async fn service_falls_back_when_ai_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let service = DescriptionService::new(Some(test_client(&server.uri())), store.clone(), 1);

    let description = service.describe(&product(), "R$").await;
    assert_eq!(description.source, DescriptionSource::Fallback);
    assert!(description.text.contains("Smartwatch Pro"));
    assert!(description.text.contains("R$ 199.90"));
    assert!(store.list("description:").unwrap().is_empty());
}

#[tokio::test]
async fn service_caches_each_currency_separately() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("Copy")))
        .expect(2)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let service = DescriptionService::new(Some(test_client(&server.uri())), store.clone(), 1);

    assert_eq!(service.describe(&product(), "R$").await.source, DescriptionSource::Ai);
    assert_eq!(service.describe(&product(), "US$").await.source, DescriptionSource::Ai);
    assert_eq!(store.list("description:").unwrap().len(), 2);
}
