//! Bearer attachment and the 401 → refresh → retry cycle against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use smashfit_core::api::{ApiClient, PendingRequest};
use smashfit_core::session::{MemoryTokenStore, SessionState, TokenStore};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_with(server: &MockServer, store: &Arc<MemoryTokenStore>) -> ApiClient {
    let shared = Arc::clone(store);
    let shared: Arc<dyn TokenStore> = shared;
    ApiClient::builder(server.uri())
        .token_store(shared)
        .build()
        .unwrap()
}

fn tournaments_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "data": [{"id": "t1", "name": "City Open"}]
    }))
}

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({"success": false, "message": "jwt expired"}))
}

fn refreshed(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "accessToken": token}))
}

#[tokio::test]
async fn test_stored_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(tournaments_ok())
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("abc123"));
    let client = client_with(&server, &store);

    let tournaments = client.tournaments().list().await.unwrap();
    assert_eq!(tournaments.len(), 1);
    assert_eq!(tournaments[0].name, "City Open");
}

#[tokio::test]
async fn test_no_token_sends_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .respond_with(tournaments_ok())
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::default());
    let client = client_with(&server, &store);
    client.tournaments().list().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_401_refreshes_and_retries_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .and(header("authorization", "Bearer old"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refreshed("new"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .and(header("authorization", "Bearer new"))
        .respond_with(tournaments_ok())
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("old"));
    let client = client_with(&server, &store);

    let tournaments = client.tournaments().list().await.unwrap();
    assert_eq!(tournaments.len(), 1);
    assert_eq!(store.get().as_deref(), Some("new"));
    assert_eq!(client.session_state(), SessionState::SignedIn);
}

#[tokio::test]
async fn test_refresh_call_carries_no_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/matches"))
        .and(header("authorization", "Bearer old"))
        .respond_with(unauthorized())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refreshed("new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/matches"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("old"));
    let client = client_with(&server, &store);
    client.matches().list(&[]).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let refresh = requests
        .iter()
        .find(|r| r.url.path() == "/auth/refresh")
        .unwrap();
    assert!(!refresh.headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_failed_refresh_clears_store_and_requires_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "no refresh token"})))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("old"));
    let client = client_with(&server, &store);
    let mut events = client.subscribe();

    let err = client.tournaments().list().await.unwrap_err();

    // The caller sees the original 401, not the refresh failure.
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("jwt expired"));
    assert_eq!(store.get(), None);
    assert!(events.has_changed().unwrap());
    assert_eq!(*events.borrow_and_update(), SessionState::LoginRequired);
}

#[tokio::test]
async fn test_401_on_retry_is_not_refreshed_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tournaments/t1"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "still no"})))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refreshed("new"))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("old"));
    let client = client_with(&server, &store);

    let err = client.tournaments().get("t1").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.server_message(), Some("still no"));
    // The refreshed token stays; only a failed refresh clears the store.
    assert_eq!(store.get().as_deref(), Some("new"));
}

#[tokio::test]
async fn test_refresh_endpoint_401_does_not_nest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("old"));
    let client = client_with(&server, &store);

    let err = client
        .send_json(PendingRequest::post("/auth/refresh"))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_401_without_token_goes_straight_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refreshed("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::default());
    let client = client_with(&server, &store);

    let err = client.tournaments().list().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(client.session_state(), SessionState::LoginRequired);
}

#[tokio::test]
async fn test_concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .and(header("authorization", "Bearer old"))
        .respond_with(unauthorized())
        .expect(4)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refreshed("new").set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .and(header("authorization", "Bearer new"))
        .respond_with(tournaments_ok())
        .expect(4)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("old"));
    let client = client_with(&server, &store);

    let calls = (0..4).map(|_| {
        let client = client.clone();
        async move { client.tournaments().list().await }
    });
    let results = futures_util::future::join_all(calls).await;

    for result in results {
        assert_eq!(result.unwrap().len(), 1);
    }
    assert_eq!(store.get().as_deref(), Some("new"));
}

#[tokio::test]
async fn test_login_401_is_surfaced_without_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(refreshed("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("existing"));
    let client = client_with(&server, &store);

    let err = client.auth().login("a@b.c", "wrong").await.unwrap_err();
    assert_eq!(err.server_message(), Some("Invalid credentials"));
    assert_eq!(store.get().as_deref(), Some("existing"));
    assert_ne!(client.session_state(), SessionState::LoginRequired);
}

#[tokio::test]
async fn test_refresh_uses_cookie_from_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refreshToken=r1; HttpOnly; Path=/")
                .set_body_json(json!({"success": true, "token": "t1", "user": {"id": "u1"}})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer t1"))
        .respond_with(unauthorized())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("cookie", "refreshToken=r1"))
        .respond_with(refreshed("t2"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer t2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": {"id": "u1", "full_name": "Lee Chong Wei"}
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::default());
    let client = client_with(&server, &store);

    client.auth().login("lee@example.com", "pw").await.unwrap();
    let user = client.auth().profile().await.unwrap();
    assert_eq!(user.full_name, "Lee Chong Wei");
    assert_eq!(store.get().as_deref(), Some("t2"));
}
