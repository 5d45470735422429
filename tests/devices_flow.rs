//! Integration tests for the device endpoint family using wiremock.
//!
//! These tests mock the FleetCloud API to verify device listing, filtered
//! lookup, registration with a caller-supplied UUID, and deletion:
//!
//! - GET    /device                     — list_devices, get_device_by_*
//! - POST   /device                     — register_device
//! - DELETE /device?eq=..&filter=uuid   — delete_device

use fleetcloud::client::Session;
use fleetcloud::devices::*;
use fleetcloud::error::Error;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: creates a pre-authenticated session pointed at the mock server.
fn mock_session(server: &MockServer) -> Session {
    Session::with_token(&server.uri(), "mock-token")
}

// ── list_devices ───────────────────────────────────────────────────────

#[tokio::test]
async fn list_devices_unwraps_envelope() {
    let server = MockServer::start().await;
    let session = mock_session(&server);

    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "d": [
                {
                    "id": 11,
                    "name": "holy-sunset",
                    "uuid": "0123456789abcdef0123456789abcdef",
                    "is_online": true
                },
                {
                    "id": 12,
                    "name": "damp-meadow",
                    "uuid": "deadbeefdeadbeefdeadbeefdeadbeef",
                    "is_online": false
                }
            ]
        })))
        .mount(&server)
        .await;

    let devices = list_devices(&session).await.unwrap();

    assert_eq!(devices.len(), 2, "should return both devices");
    assert_eq!(devices[0].name, "holy-sunset");
    assert!(devices[0].is_online);
    assert_eq!(devices[1].uuid, "deadbeefdeadbeefdeadbeefdeadbeef");
    assert!(!devices[1].is_online);
}

// ── filtered lookups ───────────────────────────────────────────────────

#[tokio::test]
async fn get_device_by_uuid_sends_equality_filter() {
    let server = MockServer::start().await;
    let session = mock_session(&server);
    let uuid = "0123456789abcdef0123456789abcdef";

    Mock::given(method("GET"))
        .and(path("/device"))
        .and(query_param("filter", "uuid"))
        .and(query_param("eq", uuid))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "d": [{"id": 11, "name": "holy-sunset", "uuid": uuid}]
        })))
        .mount(&server)
        .await;

    let device = get_device_by_uuid(&session, uuid).await.unwrap();
    assert_eq!(device.uuid, uuid);
    assert_eq!(device.name, "holy-sunset");
}

#[tokio::test]
async fn get_device_by_name_sends_equality_filter() {
    let server = MockServer::start().await;
    let session = mock_session(&server);

    Mock::given(method("GET"))
        .and(path("/device"))
        .and(query_param("filter", "name"))
        .and(query_param("eq", "holy-sunset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "d": [{"id": 11, "name": "holy-sunset", "uuid": "0123456789abcdef0123456789abcdef"}]
        })))
        .mount(&server)
        .await;

    let device = get_device_by_name(&session, "holy-sunset").await.unwrap();
    assert_eq!(device.id, 11);
}

#[tokio::test]
async fn get_device_by_uuid_absent_returns_not_found() {
    let server = MockServer::start().await;
    let session = mock_session(&server);

    Mock::given(method("GET"))
        .and(path("/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"d": []})))
        .mount(&server)
        .await;

    let err = get_device_by_uuid(&session, "feedfacefeedfacefeedfacefeedface")
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::NotFound { .. }),
        "an empty match list must be NotFound, got: {err}"
    );
}

// ── register_device ────────────────────────────────────────────────────

#[tokio::test]
async fn register_device_sends_caller_supplied_uuid() {
    let server = MockServer::start().await;
    let session = mock_session(&server);
    let uuid = generate_uuid();

    // Registration first resolves the application by name...
    Mock::given(method("GET"))
        .and(path("/application"))
        .and(query_param("filter", "app_name"))
        .and(query_param("eq", "sensor-fleet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "d": [{"id": 99, "app_name": "sensor-fleet", "device_type": "raspberry-pi3"}]
        })))
        .mount(&server)
        .await;

    // ...then POSTs the registration carrying the caller's UUID — the
    // server never generates one. The mock matches on the UUID to prove
    // it went over the wire.
    Mock::given(method("POST"))
        .and(path("/device"))
        .and(body_partial_json(serde_json::json!({
            "application": 99,
            "uuid": uuid,
            "device_type": "raspberry-pi3"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 501,
            "name": "young-river",
            "uuid": uuid,
            "device_type": "raspberry-pi3"
        })))
        .mount(&server)
        .await;

    let device = register_device(&session, "sensor-fleet", &uuid).await.unwrap();

    assert_eq!(device.id, 501);
    assert_eq!(device.uuid, uuid, "device keeps the caller-supplied uuid");
}

#[tokio::test]
async fn register_device_under_unknown_app_is_not_found() {
    let server = MockServer::start().await;
    let session = mock_session(&server);

    Mock::given(method("GET"))
        .and(path("/application"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"d": []})))
        .mount(&server)
        .await;

    let err = register_device(&session, "ghost", &generate_uuid())
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::NotFound { .. }),
        "registration under a missing application must fail the lookup"
    );
}

// ── delete_device ──────────────────────────────────────────────────────

#[tokio::test]
async fn delete_device_returns_true_on_literal_ok_body() {
    let server = MockServer::start().await;
    let session = mock_session(&server);
    let uuid = "0123456789abcdef0123456789abcdef";

    Mock::given(method("DELETE"))
        .and(path("/device"))
        .and(query_param("filter", "uuid"))
        .and(query_param("eq", uuid))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    assert!(delete_device(&session, uuid).await.unwrap());
}

#[tokio::test]
async fn delete_device_nonexistent_surfaces_server_response() {
    let server = MockServer::start().await;
    let session = mock_session(&server);

    Mock::given(method("DELETE"))
        .and(path("/device"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such device"))
        .mount(&server)
        .await;

    let err = delete_device(&session, "feedfacefeedfacefeedfacefeedface")
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("404"), "must surface the server status: {msg}");
    assert!(
        msg.contains("no such device"),
        "must surface the server body: {msg}"
    );
}
