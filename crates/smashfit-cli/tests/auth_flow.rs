//! End-to-end CLI runs against a mock backend: login, session reuse, expiry.


use fixtures::{can_bind_localhost, ok, seed_session, smashfit, stored_token, temp_home, unauthorized};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_persists_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "pv@example.com", "password": "s3cret"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refreshToken=r1; HttpOnly; Path=/")
                .set_body_json(json!({
                    "success": true,
                    "token": "token-from-login-0001",
                    "user": {"id": "u1", "fullName": "P. V. Sindhu"}
                })),
        )
        .expect(1)
        .mount(&server)
        .await;

    smashfit(home.path(), &server)
        .args(["login", "--email", "pv@example.com", "--password", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as P. V. Sindhu"))
        .stdout(predicate::str::contains("token-from-login-0001").not());

    assert_eq!(
        stored_token(home.path()).as_deref(),
        Some("token-from-login-0001")
    );
    assert!(home.path().join("cookies.json").exists());
}

#[tokio::test]
async fn test_login_rejected_keeps_no_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(unauthorized("Invalid credentials"))
        .mount(&server)
        .await;

    smashfit(home.path(), &server)
        .args(["login", "--email", "pv@example.com", "--password", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"))
        .stderr(predicate::str::contains("Session expired").not());

    assert_eq!(stored_token(home.path()), None);
}

#[tokio::test]
async fn test_stored_session_sends_bearer() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "tok");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ok(json!([
            {"id": "t1", "name": "Hyderabad Open", "location": "Gachibowli", "status": "REGISTRATION_OPEN"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    smashfit(home.path(), &server)
        .args(["tournaments", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hyderabad Open"))
        .stdout(predicate::str::contains("Registering"));
}

#[tokio::test]
async fn test_expired_session_asks_for_login() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "stale");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .respond_with(unauthorized("jwt expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(unauthorized("refresh token expired"))
        .expect(1)
        .mount(&server)
        .await;

    smashfit(home.path(), &server)
        .args(["tournaments", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired"));

    assert!(!home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_refreshed_token_is_persisted() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "stale");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .and(header("authorization", "Bearer stale"))
        .respond_with(unauthorized("jwt expired"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "accessToken": "fresh"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tournaments/"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    smashfit(home.path(), &server)
        .args(["tournaments", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tournaments found."));

    assert_eq!(stored_token(home.path()).as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_logout_removes_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "tok");
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    smashfit(home.path(), &server)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    assert!(!home.path().join("session.json").exists());
}

#[tokio::test]
async fn test_whoami_without_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    smashfit(home.path(), &server)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_whoami_shows_profile() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "tok");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": {"id": "u1", "full_name": "Kidambi Srikanth", "email": "ks@example.com", "role": "UMPIRE"}
        })))
        .mount(&server)
        .await;

    smashfit(home.path(), &server)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kidambi Srikanth"))
        .stdout(predicate::str::contains("UMPIRE"));
}

#[tokio::test]
async fn test_corrupt_session_file_does_not_block_login() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    std::fs::write(home.path().join("session.json"), "{\"accessTok").unwrap();
    std::fs::write(home.path().join("cookies.json"), "{\"127.0.0.1\": {").unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "token-after-corruption",
            "user": {"id": "u1", "fullName": "Ashwini Ponnappa"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    smashfit(home.path(), &server)
        .args(["login", "--email", "ap@example.com", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as Ashwini Ponnappa"));

    assert_eq!(
        stored_token(home.path()).as_deref(),
        Some("token-after-corruption")
    );
}

#[tokio::test]
async fn test_logout_with_corrupt_session_file() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    std::fs::write(home.path().join("session.json"), "{\"accessTok").unwrap();
    let server = MockServer::start().await;

    smashfit(home.path(), &server)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));

    assert!(!home.path().join("session.json").exists());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_reads_password_from_stdin() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"email": "pv@example.com", "password": "piped-secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "token-from-stdin-login",
            "user": {"id": "u1", "fullName": "P. V. Sindhu"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    smashfit(home.path(), &server)
        .args(["login", "--email", "pv@example.com"])
        .write_stdin("piped-secret\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as P. V. Sindhu"))
        .stdout(predicate::str::contains("piped-secret").not());
}
