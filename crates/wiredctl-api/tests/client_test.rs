#![allow(clippy::unwrap_used)]
// Integration tests for `CatalystClient` and `TaskPoller` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wiredctl_api::{
    CatalystClient, ConfigStage, Credentials, Error, PollConfig, TaskId, TaskPoller, TaskStatus,
    TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, CatalystClient) {
    let server = MockServer::start().await;
    let client = CatalystClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn device_path(suffix: &str) -> String {
    format!("/dna/intent/api/v1/networkDevices/dev-1/configFeatures/{suffix}")
}

fn task_response(task_id: &str) -> serde_json::Value {
    json!({ "response": { "taskId": task_id, "url": format!("/api/v1/tasks/{task_id}") }, "version": "1.0" })
}

fn fast_poll() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    }
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_injects_token_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dna/system/api/v1/auth/token"))
        .and(basic_auth("admin", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Token": "tok-123" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .and(header("X-Auth-Token", "tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let creds = Credentials::new("admin", "secret".to_string().into());
    let client = CatalystClient::login(&server.uri(), &creds, &TransportConfig::default())
        .await
        .unwrap();
    let devices = client.devices_by_hostname("edge-1").await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/dna/system/api/v1/auth/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let creds = Credentials::new("admin", "wrong".to_string().into());
    let result = CatalystClient::login(&server.uri(), &creds, &TransportConfig::default()).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error"
    );
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_devices_by_management_ip() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/network-device"))
        .and(query_param("managementIpAddress", "10.0.0.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [{
                "id": "dev-1",
                "hostname": "access-1",
                "managementIpAddress": "10.0.0.5",
                "reachabilityStatus": "Reachable",
                "collectionStatus": "Managed",
                "family": "Switches and Hubs"
            }],
            "version": "1.0"
        })))
        .mount(&server)
        .await;

    let devices = client.devices_by_management_ip("10.0.0.5").await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].id, "dev-1");
    assert_eq!(devices[0].collection_status.as_deref(), Some("Managed"));
}

// ── Layer-2 reads ───────────────────────────────────────────────────

#[tokio::test]
async fn test_read_feature_unwraps_container() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(device_path("deployed/layer2/vlanConfig")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "vlanConfig": {
                    "items": [{ "configType": "VLAN", "vlanId": 1, "name": "default", "isVlanEnabled": true }]
                }
            },
            "version": "1.0"
        })))
        .mount(&server)
        .await;

    let container = client
        .layer2_feature("dev-1", ConfigStage::Deployed, "vlanConfig", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(container["items"][0]["vlanId"], json!(1));
}

#[tokio::test]
async fn test_read_feature_null_response_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(device_path("intended/layer2/cdpGlobalConfig")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": null })))
        .mount(&server)
        .await;

    let container = client
        .layer2_feature("dev-1", ConfigStage::Intended, "cdpGlobalConfig", None)
        .await
        .unwrap();
    assert!(container.is_none());
}

#[tokio::test]
async fn test_read_feature_passes_pagination() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(device_path("deployed/layer2/vlanConfig")))
        .and(query_param("offset", "1"))
        .and(query_param("limit", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "vlanConfig": { "items": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .layer2_feature("dev-1", ConfigStage::Deployed, "vlanConfig", Some((1, 500)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_read_feature_404_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(device_path("intended/layer2/vtpGlobalConfig")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "response": { "errorCode": "NCND00001", "message": "Not found", "detail": "No intent" }
        })))
        .mount(&server)
        .await;

    let err = client
        .layer2_feature("dev-1", ConfigStage::Intended, "vtpGlobalConfig", None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.api_error_code(), Some("NCND00001"));
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_intent_nests_payload() {
    let (server, client) = setup().await;

    let container = json!({ "items": [{ "configType": "CDP_GLOBAL", "isCdpEnabled": true }] });

    Mock::given(method("POST"))
        .and(path(device_path("intended/layer2/cdpGlobalConfig")))
        .and(body_json(json!({ "cdpGlobalConfig": container.clone() })))
        .respond_with(ResponseTemplate::new(202).set_body_json(task_response("task-1")))
        .expect(1)
        .mount(&server)
        .await;

    let task = client
        .create_intent("dev-1", "cdpGlobalConfig", &container)
        .await
        .unwrap();
    assert_eq!(task, TaskId::from("task-1"));
}

#[tokio::test]
async fn test_deploy_without_task_id_errors() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(device_path("deploy")))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "response": {} })))
        .mount(&server)
        .await;

    let result = client.deploy("dev-1").await;
    assert!(matches!(result, Err(Error::MissingTaskId)));
}

// ── Task polling ────────────────────────────────────────────────────

#[tokio::test]
async fn test_poller_waits_for_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/tasks/task-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "id": "task-9", "status": "PENDING" }
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/tasks/task-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "id": "task-9", "status": "SUCCESS", "endTime": 1_700_000_000_000_i64 }
        })))
        .mount(&server)
        .await;

    let outcome = TaskPoller::new(&client, fast_poll())
        .wait(&TaskId::from("task-9"))
        .await
        .unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.failure_reason, None);
}

#[tokio::test]
async fn test_poller_reports_failure_reason() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/tasks/task-f"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "id": "task-f", "status": "FAILURE" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/tasks/task-f/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "failureReason": "VLAN 100 conflicts with reserved range" }
        })))
        .mount(&server)
        .await;

    let outcome = TaskPoller::new(&client, fast_poll())
        .wait(&TaskId::from("task-f"))
        .await
        .unwrap();
    assert_eq!(outcome.status, TaskStatus::Failure);
    assert_eq!(
        outcome.failure_reason.as_deref(),
        Some("VLAN 100 conflicts with reserved range")
    );
}

#[tokio::test]
async fn test_poller_times_out() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/dna/intent/api/v1/tasks/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "id": "slow", "status": "PENDING" }
        })))
        .mount(&server)
        .await;

    let config = PollConfig {
        interval: Duration::from_millis(10),
        timeout: Duration::from_millis(50),
    };
    let result = TaskPoller::new(&client, config)
        .wait(&TaskId::from("slow"))
        .await;
    assert!(matches!(result, Err(Error::TaskTimeout { .. })));
}
