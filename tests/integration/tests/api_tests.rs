//! API Integration Tests
//!
//! Each test spawns the full router on an ephemeral port, backed by the
//! in-memory token store and a scripted presence provider.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer, IDENTITY_HEADER,
};
use portal_core::ProviderError;
use portal_provider::MockIdentityProvider;
use reqwest::{header, StatusCode};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start_with_roster(roster(&["a", "b"]))
        .await
        .expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["roster_size"], 2);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/api/v1/presence/me").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Caller Identity Tests
// ============================================================================

#[tokio::test]
async fn test_missing_identity_is_bad_request() {
    let server = TestServer::start().await.expect("Failed to start server");

    for path in [
        "/api/v1/presence/me",
        "/api/v1/presence/team",
        "/api/v1/presence/users/a",
        "/api/v1/integration/status",
    ] {
        let response = server.get(path).await.unwrap();
        let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
        assert_eq!(code, "MISSING_IDENTITY", "{path}");
    }
}

#[tokio::test]
async fn test_identity_from_query_parameter() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.login("alice").await.unwrap();

    let response = server
        .get("/api/v1/integration/status?identity_id=alice")
        .await
        .unwrap();
    let status: IntegrationStatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(status.is_authenticated);
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_unauthenticated_presence_is_401() {
    let server = TestServer::start_with_roster(roster(&["a"]))
        .await
        .expect("Failed to start server");

    let response = server.get_as("/api/v1/presence/team", "alice").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "UNAUTHENTICATED");
    assert_eq!(server.provider.batch_calls().await, 0);
}

#[tokio::test]
async fn test_logout_then_unauthenticated() {
    let server = TestServer::start_with_roster(roster(&["a"]))
        .await
        .expect("Failed to start server");
    server.login("alice").await.unwrap();

    let response = server.get_as("/api/v1/presence/team", "alice").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .post_empty_as("/api/v1/auth/logout", "alice")
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get_as("/api/v1/presence/team", "alice").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let server = TestServer::start().await.expect("Failed to start server");

    for _ in 0..2 {
        let response = server
            .post_empty_as("/api/v1/auth/logout", "nobody")
            .await
            .unwrap();
        assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    }
}

#[tokio::test]
async fn test_tokens_are_per_identity() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.login("alice").await.unwrap();

    let response = server.get_as("/api/v1/presence/me", "bob").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_store_token_validation() {
    let server = TestServer::start().await.expect("Failed to start server");

    let body = serde_json::json!({ "access_token": "" });
    let response = server
        .post_as("/api/v1/auth/token", "alice", &body)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");

    let body = serde_json::json!({ "access_token": "t", "expires_in": i64::MAX });
    let response = server
        .post_as("/api/v1/auth/token", "alice", &body)
        .await
        .unwrap();
    let code = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(code, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_redirects_to_identity_provider() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/auth/login?identity_id=alice").await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.contains("state=alice"), "{location}");
}

#[tokio::test]
async fn test_login_unconfigured_provider() {
    let server = TestServer::start_with(Vec::new(), MockIdentityProvider::unconfigured())
        .await
        .expect("Failed to start server");

    let response = server.get("/api/v1/auth/login?identity_id=alice").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "AUTH_FAILED");
}

#[tokio::test]
async fn test_callback_stores_token_and_redirects() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get("/api/v1/auth/callback?code=abc&state=alice")
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.ends_with("auth=success"), "{location}");

    let response = server
        .get_as("/api/v1/integration/status", "alice")
        .await
        .unwrap();
    let status: IntegrationStatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(status.is_authenticated);
}

#[tokio::test]
async fn test_callback_failures() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/api/v1/auth/callback?state=alice").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .get("/api/v1/auth/callback?code=invalid&state=alice")
        .await
        .unwrap();
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.ends_with("auth=error"), "{location}");

    let response = server
        .get("/api/v1/auth/callback?error=access_denied&state=alice")
        .await
        .unwrap();
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.ends_with("auth=error"), "{location}");
}

// ============================================================================
// Presence Tests
// ============================================================================

#[tokio::test]
async fn test_team_partial_failure() {
    let server = TestServer::start_with_roster(roster(&["a", "b", "c"]))
        .await
        .expect("Failed to start server");
    server.provider.set_presence(available("a"));
    server.provider.set_presence(in_a_call("b"));
    server.login("caller").await.unwrap();

    let response = server.get_as("/api/v1/presence/team", "caller").await.unwrap();
    let view: RosterViewResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(view.total_count, 3);
    assert_eq!(view.online_count, 2);
    assert_eq!(view.statuses(), vec!["available", "busy", "offline"]);
    assert!(view.entries[2].raw_presence.is_none());
    assert_eq!(view.entries[0].email, "a@example.com");
    assert_eq!(view.status_counts["offline"], 1);
}

#[tokio::test]
async fn test_team_total_failure_is_all_offline() {
    let server = TestServer::start_with_roster(roster(&["a", "b", "c"]))
        .await
        .expect("Failed to start server");
    server.provider.set_presence(available("a"));
    server
        .provider
        .fail_batches(10, ProviderError::Timeout("no answer".to_string()))
        .await;
    server.login("caller").await.unwrap();

    let response = server.get_as("/api/v1/presence/team", "caller").await.unwrap();
    let view: RosterViewResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(view.total_count, 3);
    assert_eq!(view.online_count, 0);
    assert!(view.entries.iter().all(|e| !e.is_online));
    assert!(view.entries.iter().all(|e| e.raw_presence.is_none()));
}

#[tokio::test]
async fn test_empty_team() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.login("caller").await.unwrap();

    let response = server.get_as("/api/v1/presence/team", "caller").await.unwrap();
    let view: RosterViewResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(view.total_count, 0);
    assert!(!view.generated_at.is_empty());
    assert_eq!(server.provider.batch_calls().await, 0);
}

#[tokio::test]
async fn test_own_presence() {
    let server = TestServer::start().await.expect("Failed to start server");
    server
        .provider
        .set_presence(out_of_office("caller").with_status_message("back monday"));
    server.login("caller").await.unwrap();

    let response = server.get_as("/api/v1/presence/me", "caller").await.unwrap();
    let presence: PresenceResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(presence.identity_id, "caller");
    assert_eq!(presence.display_status, "out-of-office");
    assert!(presence.is_online);
    assert!(!presence.checked_at.is_empty());
    let raw = presence.raw_presence.unwrap();
    assert_eq!(raw["status_message"], "back monday");
}

#[tokio::test]
async fn test_user_presence_failure_is_offline() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.login("caller").await.unwrap();

    let response = server
        .get_as("/api/v1/presence/users/ghost", "caller")
        .await
        .unwrap();
    let presence: PresenceResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(presence.identity_id, "ghost");
    assert_eq!(presence.display_status, "offline");
    assert!(presence.raw_presence.is_none());
}

#[tokio::test]
async fn test_bulk_presence() {
    let server = TestServer::start_with_roster(roster(&["a"]))
        .await
        .expect("Failed to start server");
    server.provider.set_presence(available("a"));
    server.provider.set_presence(in_a_call("z"));
    server.login("caller").await.unwrap();

    let response = server
        .post_as(
            "/api/v1/presence/bulk",
            "caller",
            &BulkPresenceRequest::of(&["a", "z", "missing"]),
        )
        .await
        .unwrap();
    let view: RosterViewResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(view.total_count, 3);
    assert_eq!(view.online_count, 2);
    assert_eq!(view.entries[0].display_name, "Engineer a");
    assert_eq!(view.entries[1].display_name, "z");
    assert_eq!(view.statuses(), vec!["available", "busy", "offline"]);
}

#[tokio::test]
async fn test_bulk_without_list_is_bad_request() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.login("caller").await.unwrap();

    let missing = server
        .post_as("/api/v1/presence/bulk", "caller", &serde_json::json!({}))
        .await
        .unwrap();
    assert_eq!(
        assert_error(missing, StatusCode::BAD_REQUEST).await.unwrap(),
        "INVALID_BODY"
    );

    let not_a_list = server
        .post_as(
            "/api/v1/presence/bulk",
            "caller",
            &serde_json::json!({ "identity_ids": "a" }),
        )
        .await
        .unwrap();
    assert_status(not_a_list, StatusCode::BAD_REQUEST).await.unwrap();

    let empty = server
        .post_as("/api/v1/presence/bulk", "caller", &BulkPresenceRequest::of(&[]))
        .await
        .unwrap();
    assert_eq!(
        assert_error(empty, StatusCode::BAD_REQUEST).await.unwrap(),
        "VALIDATION_ERROR"
    );

    assert_eq!(server.provider.batch_calls().await, 0);
}

#[tokio::test]
async fn test_bulk_over_limit_is_bad_request() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.login("caller").await.unwrap();

    let ids: Vec<String> = (0..11).map(|i| format!("u{i}")).collect();
    let response = server
        .post_as(
            "/api/v1/presence/bulk",
            "caller",
            &serde_json::json!({ "identity_ids": ids }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Integration Status Tests
// ============================================================================

#[tokio::test]
async fn test_integration_status() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get_as("/api/v1/integration/status", "alice")
        .await
        .unwrap();
    let status: IntegrationStatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(status.is_configured);
    assert!(!status.is_authenticated);
    assert_eq!(status.supported_statuses.len(), 6);
    assert!(status.supported_statuses.contains(&"do-not-disturb".to_string()));
}

#[tokio::test]
async fn test_identity_header_allowed_by_cors() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/v1/presence/team", server.base_url()),
        )
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, IDENTITY_HEADER)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let allowed = response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .to_lowercase();
    assert!(allowed.contains(IDENTITY_HEADER), "{allowed}");
}
