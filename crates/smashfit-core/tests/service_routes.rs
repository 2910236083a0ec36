//! Method and path of each service family's operations against a mock backend.

use std::sync::Arc;

use serde_json::{Value, json};
use smashfit_core::api::ApiClient;
use smashfit_core::session::{MemoryTokenStore, TokenStore};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn signed_in(server: &MockServer) -> ApiClient {
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("tok"));
    ApiClient::builder(server.uri())
        .token_store(store)
        .build()
        .unwrap()
}

/// Mounts a mock that must be hit exactly once with `verb path`.
async fn expect_route(server: &MockServer, verb: &str, route: &str, data: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data})))
        .expect(1)
        .named(format!("{verb} {route}"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_user_routes() {
    let server = MockServer::start().await;
    expect_route(&server, "GET", "/users/me", json!({"id": "u1", "fullName": "Saina"})).await;
    expect_route(&server, "PUT", "/users/u1", json!({})).await;
    expect_route(&server, "GET", "/users/u1/activity", json!([])).await;
    expect_route(&server, "PUT", "/users/u1/settings", json!({})).await;
    Mock::given(method("POST"))
        .and(path("/users/u1/roles"))
        .and(body_json(json!({"roles": ["UMPIRE"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server);
    let users = client.users();
    assert_eq!(users.me().await.unwrap().full_name, "Saina");
    users.update_profile("u1", json!({"fullName": "Saina N"})).await.unwrap();
    users.activity("u1").await.unwrap();
    users.update_settings("u1", json!({"emails": false})).await.unwrap();
    users.assign_roles("u1", &["UMPIRE".to_string()]).await.unwrap();
}

#[tokio::test]
async fn test_organization_routes() {
    let server = MockServer::start().await;
    expect_route(&server, "POST", "/organizations/", json!({"id": "o1"})).await;
    expect_route(&server, "DELETE", "/organizations/o1", json!({})).await;
    expect_route(&server, "POST", "/organizations/o1/invite", json!({})).await;
    expect_route(&server, "POST", "/organizations/o1/accept-invite", json!({})).await;
    expect_route(&server, "POST", "/organizations/o1/vouchers", json!({})).await;
    expect_route(&server, "GET", "/organizations/o1/members", json!([])).await;

    let client = signed_in(&server);
    let orgs = client.organizations();
    orgs.create(json!({"name": "Shuttle Club"})).await.unwrap();
    orgs.delete("o1").await.unwrap();
    orgs.invite_member("o1", json!({"email": "a@b.c"})).await.unwrap();
    orgs.accept_invite("o1", json!({"token": "inv"})).await.unwrap();
    orgs.create_voucher("o1", json!({"code": "EARLY"})).await.unwrap();
    orgs.members("o1").await.unwrap();
}

#[tokio::test]
async fn test_team_and_venue_routes() {
    let server = MockServer::start().await;
    expect_route(&server, "POST", "/teams", json!({"id": "tm1"})).await;
    expect_route(&server, "POST", "/teams/tm1/members", json!({})).await;
    expect_route(&server, "POST", "/venues", json!({"id": "v1"})).await;
    expect_route(&server, "GET", "/venues/v1", json!({})).await;
    expect_route(&server, "POST", "/tournaments/t1/courts", json!({})).await;
    expect_route(&server, "GET", "/tournaments/t1/court-occupancy", json!([])).await;

    let client = signed_in(&server);
    client.teams().create(json!({"name": "Smashers"})).await.unwrap();
    client.teams().manage_roster("tm1", json!({"add": ["p1"]})).await.unwrap();
    let venues = client.venues();
    venues.add(json!({"name": "Siri Fort"})).await.unwrap();
    venues.get("v1").await.unwrap();
    venues.define_courts("t1", json!({"courts": 4})).await.unwrap();
    venues.court_occupancy("t1").await.unwrap();
}

#[tokio::test]
async fn test_bracket_routes() {
    let server = MockServer::start().await;
    expect_route(&server, "GET", "/tournaments/t1/brackets", json!({})).await;
    expect_route(&server, "POST", "/tournaments/t1/brackets/generate", json!({})).await;
    expect_route(&server, "POST", "/tournaments/t1/brackets/b1/advance", json!({})).await;
    expect_route(&server, "POST", "/tournaments/t1/seeding/auto", json!({})).await;
    expect_route(&server, "POST", "/tournaments/t1/seeding/manual", json!({})).await;
    expect_route(&server, "GET", "/tournaments/t1/seeding/status", json!({})).await;
    expect_route(&server, "POST", "/tournaments/t1/draws/shuffle", json!({})).await;

    let client = signed_in(&server);
    let brackets = client.brackets();
    brackets.visual_data("t1").await.unwrap();
    brackets.generate("t1", None).await.unwrap();
    brackets
        .advance_player("t1", "b1", json!({"player_id": "p1"}))
        .await
        .unwrap();
    brackets.auto_seed("t1").await.unwrap();
    brackets
        .apply_manual_seeds("t1", json!({"seeds": ["p1", "p2"]}))
        .await
        .unwrap();
    brackets.seeding_status("t1").await.unwrap();
    brackets.randomize_draw("t1").await.unwrap();
}

#[tokio::test]
async fn test_billing_and_schedule_routes() {
    let server = MockServer::start().await;
    expect_route(&server, "GET", "/billing/organization/o1", json!({})).await;
    expect_route(&server, "GET", "/billing/plans", json!([])).await;
    expect_route(&server, "POST", "/billing/subscriptions", json!({})).await;
    expect_route(&server, "POST", "/tournaments/t1/schedule/auto", json!({})).await;
    expect_route(&server, "GET", "/schedules/s1", json!({})).await;
    Mock::given(method("GET"))
        .and(path("/billing/payouts"))
        .and(query_param("status", "pending"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server);
    let billing = client.billing();
    billing.organization("o1").await.unwrap();
    billing.plans().await.unwrap();
    billing
        .manage_subscription(json!({"plan": "pro"}))
        .await
        .unwrap();
    billing.payouts(&[("status", "pending")]).await.unwrap();
    client.schedules().auto_assign("t1", None).await.unwrap();
    client.schedules().slot("s1").await.unwrap();
}

#[tokio::test]
async fn test_payment_routes() {
    let server = MockServer::start().await;
    expect_route(&server, "POST", "/payments/create-checkout", json!({"url": "https://pay"})).await;
    expect_route(&server, "POST", "/payments/refund", json!({})).await;
    expect_route(&server, "POST", "/payments/verify", json!({})).await;
    Mock::given(method("GET"))
        .and(path("/payments/history"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_in(&server);
    let payments = client.payments();
    let checkout = payments
        .create_checkout(json!({"entry_id": "e1"}))
        .await
        .unwrap();
    assert_eq!(checkout["url"], "https://pay");
    payments.refund(json!({"payment_id": "pay1"})).await.unwrap();
    payments.verify_manual(json!({"payment_id": "pay1"})).await.unwrap();
    payments.history(&[("page", "2")]).await.unwrap();
}
