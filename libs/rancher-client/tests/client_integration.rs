#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests against a mock Rancher server.
//!
//! Wires up: `RancherClientConfig` pointing at an `httpmock` server →
//! `RancherClient` over the default hyper transport → verifies method, path,
//! query, headers and body of each request and the classification of the
//! response.

use httpmock::prelude::*;
use hyper::StatusCode;
use rancher_client::{
    ConfigError, RancherClient, RancherClientConfig, RancherError, RequestError, ValidationError,
};
use serde_json::json;

const ACCESS: &str = "8F1C2E0A9B7D6F5E4A3B";
const SECRET: &str = "kH3mZq9vXr2TnL5pWs8yBc4Dj7Fg1Ra6";

fn basic_auth() -> String {
    use base64::Engine as _;
    let token = base64::engine::general_purpose::STANDARD.encode(format!("{ACCESS}:{SECRET}"));
    format!("Basic {token}")
}

fn client_for(server: &MockServer) -> RancherClient {
    let config = RancherClientConfig::new(server.host(), server.port(), ACCESS, SECRET);
    RancherClient::new(config).unwrap()
}

#[tokio::test]
async fn get_host_sends_basic_auth_and_returns_payload() {
    let server = MockServer::start();
    let host_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2-beta/projects/1a5/hosts/abc")
            .header("authorization", basic_auth());
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"id": "abc", "type": "host", "state": "active"}));
    });

    let host = client_for(&server).get_host("abc").await.unwrap();

    assert_eq!(host, json!({"id": "abc", "type": "host", "state": "active"}));
    host_mock.assert_calls(1);
}

#[tokio::test]
async fn not_found_rejects_with_http_status_error() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/v2-beta/projects/1a5/container/missing");
        then.status(404)
            .header("content-type", "application/json")
            .header("x-rancher-request", "r-17")
            .body(r#"{"type":"error","status":404,"code":"NotFound"}"#);
    });

    let err = client_for(&server)
        .get_container("missing")
        .unwrap()
        .await
        .unwrap_err();

    match err {
        RequestError::HttpStatus { status, headers } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(headers["x-rancher-request"], "r-17");
        }
        other => panic!("Expected HttpStatus error, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_rejects_with_decode_error() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/v2-beta/projects/1a5/ports");
        then.status(200).body("{\"data\": [");
    });

    let err = client_for(&server).get_ports().await.unwrap_err();

    assert!(matches!(err, RequestError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn update_container_posts_to_container_id() {
    let server = MockServer::start();
    let update_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2-beta/projects/1a5/container/c1")
            .header("content-type", "application/json")
            .json_body(json!({"id": "c1", "name": "x"}));
        then.status(200).json_body(json!({"id": "c1", "name": "x", "state": "updating"}));
    });

    let updated = client_for(&server)
        .update_container(&json!({"id": "c1", "name": "x"}))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(updated["state"], "updating");
    update_mock.assert_calls(1);
}

#[tokio::test]
async fn update_container_accepts_numeric_id() {
    let server = MockServer::start();
    let update_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2-beta/projects/1a5/container/7")
            .json_body(json!({"id": 7, "name": "x"}));
        then.status(200).json_body(json!({"id": 7}));
    });

    client_for(&server)
        .update_container(&json!({"id": 7, "name": "x"}))
        .unwrap()
        .await
        .unwrap();

    update_mock.assert_calls(1);
}

#[tokio::test]
async fn stop_container_posts_action_with_params() {
    let server = MockServer::start();
    let stop_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2-beta/projects/1a5/container/c1/")
            .query_param("action", "stop")
            .json_body(json!({"timeout": 5}));
        then.status(202).json_body(json!({"id": "c1", "transitioning": "yes"}));
    });

    let result = client_for(&server)
        .stop_container("c1", &json!({"timeout": 5}))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(result["transitioning"], "yes");
    stop_mock.assert_calls(1);
}

#[tokio::test]
async fn remove_container_uses_delete_and_purge_uses_post_action() {
    let server = MockServer::start();
    let delete_mock = server.mock(|when, then| {
        when.method(DELETE).path("/v2-beta/projects/1a5/container/c2");
        then.status(200).json_body(json!({"id": "c2", "state": "removing"}));
    });
    let purge_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2-beta/projects/1a5/container/c2/")
            .query_param("action", "purge");
        then.status(200).json_body(json!({"id": "c2", "state": "purging"}));
    });

    let client = client_for(&server);
    client.remove_container("c2").unwrap().await.unwrap();
    client.purge_container("c2").unwrap().await.unwrap();

    delete_mock.assert_calls(1);
    purge_mock.assert_calls(1);
}

#[tokio::test]
async fn stack_and_service_lifecycle_paths() {
    let server = MockServer::start();
    let services_mock = server.mock(|when, then| {
        when.method(GET).path("/v2-beta/projects/1a5/stack/1st5/services");
        then.status(200).json_body(json!({"type": "collection", "data": []}));
    });
    let remove_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2-beta/projects/1a5/stack/1st5/")
            .query_param("action", "remove");
        then.status(200).json_body(json!({"id": "1st5"}));
    });
    let deactivate_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2-beta/projects/1a5/services/1s9/")
            .query_param("action", "deactivate");
        then.status(200).json_body(json!({"id": "1s9", "state": "deactivating"}));
    });
    let restart_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2-beta/projects/1a5/services/1s9/")
            .query_param("action", "restart")
            .json_body(json!({"rollingRestartStrategy": {"batchSize": 1}}));
        then.status(200).json_body(json!({"id": "1s9", "state": "restarting"}));
    });

    let client = client_for(&server);
    let services = client.get_stack_services("1st5").unwrap().await.unwrap();
    client.remove_stack("1st5").unwrap().await.unwrap();
    client.stop_service("1s9").unwrap().await.unwrap();
    client
        .restart_service("1s9", &json!({"rollingRestartStrategy": {"batchSize": 1}}))
        .unwrap()
        .await
        .unwrap();

    assert_eq!(services["type"], "collection");
    services_mock.assert_calls(1);
    remove_mock.assert_calls(1);
    deactivate_mock.assert_calls(1);
    restart_mock.assert_calls(1);
}

#[tokio::test]
async fn configured_environment_is_used_in_paths() {
    let server = MockServer::start();
    let hosts_mock = server.mock(|when, then| {
        when.method(GET).path("/v2-beta/projects/proj7/hosts");
        then.status(200).json_body(json!({"data": []}));
    });

    let config = RancherClientConfig::new(server.host(), server.port(), ACCESS, SECRET)
        .with_environment("proj7");
    RancherClient::new(config)
        .unwrap()
        .get_hosts()
        .await
        .unwrap();

    hosts_mock.assert_calls(1);
}

#[tokio::test]
async fn empty_identifier_never_reaches_the_server() {
    let server = MockServer::start();
    let any_mock = server.mock(|when, then| {
        when.path_includes("/");
        then.status(200).json_body(json!({}));
    });

    let client = client_for(&server);
    assert!(matches!(
        client.start_container("").err(),
        Some(ValidationError::MissingId { role: "container" })
    ));
    assert!(matches!(
        client.get_stack("").err(),
        Some(ValidationError::MissingId { role: "stack" })
    ));

    any_mock.assert_calls(0);
}

#[tokio::test]
async fn empty_success_body_resolves_to_null() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(POST)
            .path("/v2-beta/projects/1a5/container/c3/")
            .query_param("action", "logs");
        then.status(204);
    });

    let value = client_for(&server)
        .get_container_logs("c3")
        .unwrap()
        .await
        .unwrap();

    assert!(value.is_null());
}

#[tokio::test]
async fn unreachable_server_rejects_with_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client =
        RancherClient::new(RancherClientConfig::new("127.0.0.1", port, ACCESS, SECRET)).unwrap();

    let err = client.get_hosts().await.unwrap_err();

    assert!(matches!(err, RequestError::Transport(_)), "got {err:?}");
}

#[test]
fn missing_credentials_fail_construction() {
    let err = RancherClient::new(RancherClientConfig::new("rancher.local", 8080, "", "")).unwrap_err();
    let ConfigError::Invalid { violations } = err else {
        panic!("expected ConfigError::Invalid, got {err:?}");
    };
    assert_eq!(violations.len(), 2);
}

#[tokio::test]
async fn single_error_type_chains_every_stage() {
    async fn fetch_stack(server: &MockServer) -> Result<serde_json::Value, RancherError> {
        let config = RancherClientConfig::new(server.host(), server.port(), ACCESS, SECRET);
        let client = RancherClient::new(config)?;
        Ok(client.get_stack("1st2")?.await?)
    }

    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(GET).path("/v2-beta/projects/1a5/stack/1st2");
        then.status(500);
    });

    let err = fetch_stack(&server).await.unwrap_err();
    assert!(
        matches!(&err, RancherError::Request(e) if e.status() == Some(StatusCode::INTERNAL_SERVER_ERROR)),
        "got {err:?}"
    );
}
