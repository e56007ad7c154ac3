//! Tests for the authenticated request executor

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::auth::{CredentialState, TokenStore};
use crate::models::UserProfile;

const REFRESH_PATH: &str = "/api/users/token/refresh/";

fn store_with(access: Option<&str>, refresh: Option<&str>) -> Arc<TokenStore> {
    let store = TokenStore::in_memory();
    store.set_tokens(access.map(String::from), refresh.map(String::from));
    Arc::new(store)
}

fn client_for(server: &MockServer, store: Arc<TokenStore>) -> ApiClient {
    ApiClient::with_base_url(&server.uri(), store).expect("client builds")
}

fn tokens(store: &TokenStore) -> (Option<String>, Option<String>) {
    let state = store.state();
    (state.access_token, state.refresh_token)
}

async fn mount_refresh(server: &MockServer, refresh: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(json!({ "refresh": refresh })))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

// ============================================================================
// Success paths
// ============================================================================

#[tokio::test]
async fn test_happy_path_attaches_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.com"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", ResponseTemplate::new(200), 0).await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());
    let before = store.state();

    let body: Value = client
        .execute("/api/users/me/", &RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(body, json!({"email": "a@b.com"}));
    assert_eq!(store.state(), before);
}

#[tokio::test]
async fn test_typed_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"username": "ada", "email": "a@b.com"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, store_with(Some("T1"), None));
    let user = client.fetch_me().await.unwrap();
    assert_eq!(
        user,
        UserProfile {
            username: Some("ada".to_string()),
            email: Some("a@b.com".to_string()),
        }
    );
}

#[tokio::test]
async fn test_no_content_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/ads/listings/7/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, store_with(Some("T1"), Some("R1")));
    let options = RequestOptions::delete();

    client
        .execute::<()>("/api/ads/listings/7/", &options)
        .await
        .unwrap();

    let value: Value = client.execute("/api/ads/listings/7/", &options).await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn test_no_content_into_option() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/deactivate/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server, store_with(Some("T1"), None));
    let result: Option<Value> = client
        .execute("/api/users/deactivate/", &RequestOptions::post())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_success_body_that_does_not_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ads/listings/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, store_with(None, None));
    let err = client.fetch_listing(7).await.unwrap_err();
    match err {
        ApiError::Decode { path, .. } => assert_eq!(path, "/api/ads/listings/7/"),
        other => panic!("expected decode error, got {:?}", other),
    }
}

// ============================================================================
// Refresh and retry
// ============================================================================

#[tokio::test]
async fn test_refresh_success_retries_with_new_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"code": "token_not_valid"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.com"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());

    let body: Value = client
        .execute("/api/users/me/", &RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(body, json!({"email": "a@b.com"}));
    assert_eq!(tokens(&store), (Some("T2".to_string()), Some("R1".to_string())));
}

#[tokio::test]
async fn test_refresh_rotates_refresh_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/customer/customers/wishlist/"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/customer/customers/wishlist/"))
        .and(header("Authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2", "refresh": "R2"})),
        1,
    )
    .await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());

    let wishlist = client.fetch_wishlist().await.unwrap();
    assert!(wishlist.is_empty());
    assert_eq!(tokens(&store), (Some("T2".to_string()), Some("R2".to_string())));
}

#[tokio::test]
async fn test_refresh_failure_clears_store_and_surfaces_original_401() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Token is invalid or expired"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(400).set_body_json(json!({"detail": "bad refresh"})),
        1,
    )
    .await;

    let store = store_with(Some("T1"), Some("R1"));
    store.set_user(Some(UserProfile {
        username: None,
        email: Some("a@b.com".to_string()),
    }));
    let client = client_for(&server, store.clone());

    let err = client
        .execute::<Value>("/api/users/me/", &RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.data(), Some(&json!({"detail": "Token is invalid or expired"})));
    assert_eq!(store.state(), CredentialState::default());
}

#[tokio::test]
async fn test_second_unauthorized_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "first"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "second"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());

    let err = client
        .execute::<Value>("/api/users/me/", &RequestOptions::get())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.data(), Some(&json!({"detail": "second"})));
    // The refresh itself succeeded, so its tokens stay
    assert_eq!(tokens(&store), (Some("T2".to_string()), Some("R1".to_string())));
}

#[tokio::test]
async fn test_retry_failure_with_other_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ads/listings/7/toggle_favorite/"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ads/listings/7/toggle_favorite/"))
        .and(header("Authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let client = client_for(&server, store_with(Some("T1"), Some("R1")));
    let err = client.toggle_favorite(7).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.data(), Some(&json!({})));
}

#[tokio::test]
async fn test_missing_refresh_token_skips_refresh_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})))
        .expect(0)
        .mount(&server)
        .await;

    let store = store_with(Some("T1"), None);
    let client = client_for(&server, store.clone());

    let err = client.fetch_me().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(tokens(&store), (Some("T1".to_string()), None));
}

#[tokio::test]
async fn test_refresh_without_access_token_clears_store() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"detail": "ok"})),
        1,
    )
    .await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());

    let err = client.fetch_me().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(store.state(), CredentialState::default());
}

#[tokio::test]
async fn test_retry_resends_identical_json_body() {
    let server = MockServer::start().await;
    let payload = json!({"title": "Great", "comment": "Quiet street", "rating": 5});
    Mock::given(method("POST"))
        .and(path("/api/ads/listings/7/add_review/"))
        .and(header("Authorization", "Bearer T1"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ads/listings/7/add_review/"))
        .and(header("Authorization", "Bearer T2"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1, "user": "ada", "listing": 7, "title": "Great",
            "comment": "Quiet street", "rating": 5, "created": "2024-03-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let client = client_for(&server, store_with(Some("T1"), Some("R1")));
    let review = client
        .add_review(
            7,
            &crate::models::NewReview {
                title: "Great".to_string(),
                comment: "Quiet street".to_string(),
                rating: 5,
            },
        )
        .await
        .unwrap();
    assert_eq!(review.id, 1);
    assert_eq!(review.rating, 5);
}

#[tokio::test]
async fn test_concurrent_unauthorized_calls_refresh_independently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .and(header("Authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.com"})))
        .expect(2)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        2,
    )
    .await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());

    let (a, b) = tokio::join!(client.fetch_me(), client.fetch_me());
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(tokens(&store), (Some("T2".to_string()), Some("R1".to_string())));
}

#[tokio::test]
async fn test_retry_with_no_content_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/ads/listing-images/4/"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/ads/listing-images/4/"))
        .and(header("Authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());

    let value: Value = client
        .execute("/api/ads/listing-images/4/", &RequestOptions::delete())
        .await
        .unwrap();

    assert_eq!(value, Value::Null);
    assert_eq!(tokens(&store), (Some("T2".to_string()), Some("R1".to_string())));
}

#[tokio::test]
async fn test_refresh_transport_failure_keeps_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/me/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    // Answers only after the client has given up
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "T2"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let store = store_with(Some("T1"), Some("R1"));
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let client = ApiClient::with_client(http, &server.uri(), store.clone());

    let err = client.fetch_me().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    assert_eq!(err.status(), None);
    assert_eq!(tokens(&store), (Some("T1".to_string()), Some("R1".to_string())));
}

// ============================================================================
// Unauthenticated calls and errors
// ============================================================================

#[tokio::test]
async fn test_public_call_bypasses_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "No active account found with the given credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", ResponseTemplate::new(200), 0).await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());
    let before = store.state();

    let err = client
        .login(&crate::models::LoginRequest {
            email: "a@b.com".to_string(),
            password: "wrong".to_string(),
            remember_me: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(
        err.message(),
        "No active account found with the given credentials"
    );
    assert_eq!(store.state(), before);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_application_error_does_not_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/agent/vendors/3/dashboard/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Not your dashboard"})))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(&server, "R1", ResponseTemplate::new(200), 0).await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());

    let err = client.fetch_vendor_dashboard(3).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.message(), "Not your dashboard");
    assert_eq!(tokens(&store), (Some("T1".to_string()), Some("R1".to_string())));
}

#[tokio::test]
async fn test_undecodable_error_body_is_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ads/listings/9/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Server Error (500)</h1>"))
        .mount(&server)
        .await;

    let client = client_for(&server, store_with(None, None));
    let err = client.fetch_listing(9).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.data(), Some(&json!({})));
}

#[tokio::test]
async fn test_transport_failure_is_not_wrapped_as_status() {
    // Nothing listens on port 1
    let client = ApiClient::with_base_url("http://127.0.0.1:1", store_with(Some("T1"), Some("R1")))
        .unwrap();
    let err = client.fetch_me().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_rejects_non_relative_path() {
    let server = MockServer::start().await;
    let client = client_for(&server, store_with(None, None));

    for bad in ["api/users/me/", "https://evil.example/", "//evil.example/x"] {
        let err = client
            .execute::<Value>(bad, &RequestOptions::get())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)), "{bad} accepted");
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Headers and bodies
// ============================================================================

#[tokio::test]
async fn test_default_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ads/categories/"))
        .and(header("Content-Type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Flat", "slug": "flat"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, store_with(Some("T1"), None));
    let categories = client.fetch_categories().await.unwrap();
    assert_eq!(categories[0].slug, "flat");

    // Public lookups never carry the token
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_explicit_content_type_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/"))
        .and(header("Content-Type", "application/vnd.rockflint+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "hi"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, store_with(Some("T1"), None));
    let options = RequestOptions::post()
        .header("Content-Type", "application/vnd.rockflint+json")
        .unwrap()
        .json(&json!({"message": "hello"}))
        .unwrap();
    let reply: Value = client.execute("/api/chat/", &options).await.unwrap();
    assert_eq!(reply["reply"], "hi");
}

#[tokio::test]
async fn test_multipart_upload_retried_after_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ads/listing-images/"))
        .and(header("Authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ads/listing-images/"))
        .and(header("Authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 55, "image": "https://cdn.example.com/front.jpg", "caption": "Front",
            "is_primary": false, "order": 0
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access": "T2"})),
        1,
    )
    .await;

    let client = client_for(&server, store_with(Some("T1"), Some("R1")));
    let image = client
        .upload_listing_image(7, "front.jpg", Some("image/jpeg"), vec![0xff, 0xd8, 0xff], Some("Front"))
        .await
        .unwrap();
    assert_eq!(image.id, 55);

    let uploads: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/ads/listing-images/")
        .collect();
    assert_eq!(uploads.len(), 2);
    for request in &uploads {
        let content_type = request
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("multipart/form-data; boundary="), "{content_type}");
        assert!(!request.body.is_empty());
    }
}

#[tokio::test]
async fn test_listing_search_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ads/listings/"))
        .and(query_param("search", "lekki"))
        .and(query_param("bedrooms", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{"id": 7, "title": "Flat", "price": "900000.00"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, store_with(None, None));
    let filters = ListingFilters {
        search: Some("lekki".to_string()),
        bedrooms: Some(3),
        ..Default::default()
    };
    let page = client.fetch_listings(&filters).await.unwrap();
    assert_eq!(page.count, 1);
    assert!(!page.has_next());
    assert_eq!(page.results[0].price, 900_000.0);
}

#[tokio::test]
async fn test_lgas_filtered_by_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/ads/lgas/"))
        .and(query_param("state", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 400, "name": "Eti-Osa", "state": {"id": 25, "name": "Lagos"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, store_with(None, None));
    let lgas = client.fetch_lgas(Some(25)).await.unwrap();
    assert_eq!(lgas[0].state.name, "Lagos");
}

#[tokio::test]
async fn test_explicit_refresh_token_call() {
    let server = MockServer::start().await;
    mount_refresh(
        &server,
        "R1",
        ResponseTemplate::new(200).set_body_json(json!({"access": "T9"})),
        1,
    )
    .await;

    let store = store_with(Some("T1"), Some("R1"));
    let client = client_for(&server, store.clone());
    let pair = client.refresh_token("R1").await.unwrap();
    assert_eq!(pair.access, "T9");
    assert_eq!(pair.refresh, "R1");
    // Endpoint helpers never write to the store on their own
    assert_eq!(tokens(&store), (Some("T1".to_string()), Some("R1".to_string())));
}
