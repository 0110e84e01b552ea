#![allow(clippy::unwrap_used)]
// End-to-end reconcile runs against a wiremock controller.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wiredctl_api::CatalystClient;
use wiredctl_core::{
    CoreError, DeletionStatus, DeviceTarget, PollConfig, ReconcileOptions, Reconciler, StateTag,
    validate,
};

// ── Helpers ─────────────────────────────────────────────────────────

const API: &str = "/dna/intent/api/v1";
const DEVICE_IP: &str = "10.0.0.1";

fn target() -> DeviceTarget {
    DeviceTarget::ManagementIp(DEVICE_IP.into())
}

fn options() -> ReconcileOptions {
    ReconcileOptions {
        controller_version: Some("2.3.7.9".into()),
        config_verification_wait_time: Duration::ZERO,
        poll: PollConfig {
            interval: Duration::from_millis(10),
            timeout: Duration::from_secs(5),
        },
        ..ReconcileOptions::default()
    }
}

async fn setup(opts: ReconcileOptions) -> (MockServer, Reconciler) {
    let server = MockServer::start().await;
    let client = CatalystClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();

    Mock::given(method("GET"))
        .and(path(format!("{API}/network-device")))
        .and(query_param("managementIpAddress", DEVICE_IP))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": [{
            "id": "dev-1",
            "hostname": "access-sw1",
            "managementIpAddress": DEVICE_IP,
            "reachabilityStatus": "Reachable",
            "collectionStatus": "Managed"
        }] })))
        .mount(&server)
        .await;

    (server, Reconciler::with_client(client, opts))
}

fn feature_path(stage: &str, feature: &str) -> String {
    format!("{API}/networkDevices/dev-1/configFeatures/{stage}/layer2/{feature}")
}

fn deploy_path() -> String {
    format!("{API}/networkDevices/dev-1/configFeatures/deploy")
}

async fn mount_state(server: &MockServer, stage: &str, feature: &str, container: Value) {
    Mock::given(method("GET"))
        .and(path(feature_path(stage, feature)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": { feature: container } })),
        )
        .mount(server)
        .await;
}

fn task_accepted(task_id: &str) -> ResponseTemplate {
    ResponseTemplate::new(202)
        .set_body_json(json!({ "response": { "taskId": task_id, "url": format!("/api/v1/tasks/{task_id}") } }))
}

async fn mount_task(server: &MockServer, task_id: &str, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{API}/tasks/{task_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "id": task_id, "status": status }
        })))
        .mount(server)
        .await;
}

async fn mount_deploy(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(deploy_path()))
        .respond_with(task_accepted("task-deploy"))
        .expect(expected_calls)
        .mount(server)
        .await;
    mount_task(server, "task-deploy", "SUCCESS").await;
}

/// Non-GET requests in arrival order as `(method, path)`.
async fn writes(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() != "GET")
        .map(|r| (r.method.to_string(), r.url.path().to_owned()))
        .collect()
}

// ── Merged state ────────────────────────────────────────────────────

#[tokio::test]
async fn vlan_create_keeps_existing_vlans_and_deploys() {
    let (server, reconciler) = setup(options()).await;
    mount_state(
        &server,
        "deployed",
        "vlanConfig",
        json!({ "items": [{ "configType": "VLAN", "vlanId": 1, "name": "default", "id": "v-1" }] }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(feature_path("intended", "vlanConfig")))
        .and(body_json(json!({ "vlanConfig": { "items": [
            { "configType": "VLAN", "vlanId": 1, "name": "default" },
            { "configType": "VLAN", "vlanId": 100, "name": "SALES", "isVlanEnabled": true }
        ] } })))
        .respond_with(task_accepted("task-vlan"))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(&server, "task-vlan", "SUCCESS").await;
    mount_deploy(&server, 1).await;

    let doc = validate(
        &json!({ "vlans": [{ "vlan_id": 100, "vlan_name": "SALES", "vlan_admin_status": true }] }),
        StateTag::Merged,
    )
    .unwrap();
    let summary = reconciler.apply(&target(), &doc, StateTag::Merged).await.unwrap();

    assert!(summary.changed);
    assert_eq!(summary.total_features_planned, 1);
    assert_eq!(summary.intent_successes, 1);
    assert!(summary.deploy_attempted);
    assert!(summary.deploy_succeeded);
    assert_eq!(summary.task_ids["vlanConfig"], "task-vlan");
    assert_eq!(summary.task_ids["deploy"], "task-deploy");
}

#[tokio::test]
async fn matching_state_makes_no_writes() {
    let (server, reconciler) = setup(options()).await;
    mount_state(
        &server,
        "deployed",
        "vlanConfig",
        json!({ "items": [
            { "configType": "VLAN", "vlanId": 100, "name": "SALES", "isVlanEnabled": true, "id": "v-100" }
        ] }),
    )
    .await;
    mount_deploy(&server, 0).await;

    let doc = validate(
        &json!({ "vlans": [{ "vlan_id": 100, "vlan_name": "SALES", "vlan_admin_status": true }] }),
        StateTag::Merged,
    )
    .unwrap();
    let summary = reconciler.apply(&target(), &doc, StateTag::Merged).await.unwrap();

    assert!(!summary.changed);
    assert!(!summary.deploy_attempted);
    assert_eq!(summary.total_features_planned, 0);
    assert!(writes(&server).await.is_empty());
}

#[tokio::test]
async fn stp_instances_overlay_in_update() {
    let (server, reconciler) = setup(options()).await;
    let current = json!({ "items": [{
        "configType": "STP_GLOBAL",
        "stpMode": "RSTP",
        "stpInstances": { "configType": "LIST", "items": [
            { "configType": "STP_VLAN", "vlanId": 10, "priority": 32768 }
        ] }
    }] });
    mount_state(&server, "deployed", "stpGlobalConfig", current.clone()).await;
    mount_state(&server, "intended", "stpGlobalConfig", current).await;

    Mock::given(method("PUT"))
        .and(path(feature_path("intended", "stpGlobalConfig")))
        .and(body_json(json!({ "stpGlobalConfig": { "items": [{
            "configType": "STP_GLOBAL",
            "stpMode": "RSTP",
            "stpInstances": { "configType": "LIST", "items": [
                { "configType": "STP_VLAN", "vlanId": 10, "priority": 4096 },
                { "configType": "STP_VLAN", "vlanId": 20, "priority": 8192 }
            ] }
        }] } })))
        .respond_with(task_accepted("task-stp"))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(&server, "task-stp", "SUCCESS").await;
    mount_deploy(&server, 1).await;

    let doc = validate(
        &json!({ "stp": { "stp_instances": [
            { "stp_instance_vlan_id": 10, "stp_instance_priority": 4096 },
            { "stp_instance_vlan_id": 20, "stp_instance_priority": 8192 }
        ] } }),
        StateTag::Merged,
    )
    .unwrap();
    let summary = reconciler.apply(&target(), &doc, StateTag::Merged).await.unwrap();
    assert!(summary.deploy_succeeded);
}

#[tokio::test]
async fn port_channel_member_is_added() {
    let (server, reconciler) = setup(options()).await;
    let current = json!({ "items": [{
        "configType": "PORTCHANNEL",
        "portchannels": { "configType": "LIST", "items": [{
            "configType": "LACP_PORTCHANNEL_CONFIG",
            "name": "Port-channel1",
            "memberPorts": { "configType": "SET", "items": [{
                "configType": "LACP_PORTCHANNEL_MEMBER_PORT_CONFIG",
                "interfaceName": "GigabitEthernet1/0/10",
                "mode": "ACTIVE"
            }] }
        }] }
    }] });
    mount_state(&server, "deployed", "portchannelConfig", current.clone()).await;
    mount_state(&server, "intended", "portchannelConfig", current).await;

    Mock::given(method("PUT"))
        .and(path(feature_path("intended", "portchannelConfig")))
        .and(body_json(json!({ "portchannelConfig": { "items": [{
            "configType": "PORTCHANNEL",
            "portchannels": { "configType": "LIST", "items": [{
                "configType": "LACP_PORTCHANNEL_CONFIG",
                "name": "Port-channel1",
                "memberPorts": { "configType": "SET", "items": [
                    {
                        "configType": "LACP_PORTCHANNEL_MEMBER_PORT_CONFIG",
                        "interfaceName": "GigabitEthernet1/0/10",
                        "mode": "ACTIVE"
                    },
                    {
                        "configType": "LACP_PORTCHANNEL_MEMBER_PORT_CONFIG",
                        "interfaceName": "GigabitEthernet1/0/11",
                        "mode": "ACTIVE"
                    }
                ] }
            }] }
        }] } })))
        .respond_with(task_accepted("task-pc"))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(&server, "task-pc", "SUCCESS").await;
    mount_deploy(&server, 1).await;

    let doc = validate(
        &json!({ "logical_ports": { "port_channels": [{
            "port_channel_name": "Port-channel1",
            "port_channel_protocol": "lacp",
            "port_channel_members": [
                { "port_channel_interface_name": "GigabitEthernet1/0/10", "port_channel_mode": "active" },
                { "port_channel_interface_name": "GigabitEthernet1/0/11", "port_channel_mode": "active" }
            ]
        }] } }),
        StateTag::Merged,
    )
    .unwrap();
    let summary = reconciler.apply(&target(), &doc, StateTag::Merged).await.unwrap();
    assert_eq!(summary.intent_successes, 1);
}

#[tokio::test]
async fn failed_intent_stops_further_writes_and_deploy() {
    let (server, reconciler) = setup(options()).await;

    Mock::given(method("POST"))
        .and(path(feature_path("intended", "vlanConfig")))
        .respond_with(task_accepted("task-vlan"))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(&server, "task-vlan", "SUCCESS").await;

    Mock::given(method("POST"))
        .and(path(feature_path("intended", "cdpGlobalConfig")))
        .respond_with(task_accepted("task-cdp"))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(&server, "task-cdp", "FAILURE").await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/tasks/task-cdp/detail")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "failureReason": "CDP timer rejected by device" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(feature_path("intended", "lldpGlobalConfig")))
        .respond_with(task_accepted("task-lldp"))
        .expect(0)
        .mount(&server)
        .await;
    mount_deploy(&server, 0).await;

    let doc = validate(
        &json!({
            "vlans": [{ "vlan_id": 100 }],
            "cdp": { "cdp_timer": 30 },
            "lldp": { "lldp_timer": 60 }
        }),
        StateTag::Merged,
    )
    .unwrap();
    let err = reconciler
        .apply(&target(), &doc, StateTag::Merged)
        .await
        .unwrap_err();

    match err {
        CoreError::IntentFailed {
            failures,
            succeeded,
        } => {
            assert_eq!(succeeded, 1);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].feature, "CDP");
            assert_eq!(failures[0].operation, "create");
            assert_eq!(failures[0].reason, "CDP timer rejected by device");
        }
        other => panic!("expected IntentFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_deploy_reports_intent_successes() {
    let (server, reconciler) = setup(options()).await;

    Mock::given(method("POST"))
        .and(path(feature_path("intended", "cdpGlobalConfig")))
        .respond_with(task_accepted("task-cdp"))
        .mount(&server)
        .await;
    mount_task(&server, "task-cdp", "SUCCESS").await;
    Mock::given(method("POST"))
        .and(path(deploy_path()))
        .respond_with(task_accepted("task-deploy"))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(&server, "task-deploy", "FAILURE").await;

    let doc = validate(&json!({ "cdp": { "cdp_timer": 30 } }), StateTag::Merged).unwrap();
    let err = reconciler
        .apply(&target(), &doc, StateTag::Merged)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::DeployFailed { succeeded: 1, .. }));
}

#[tokio::test]
async fn paginated_reads_follow_offsets() {
    let opts = ReconcileOptions {
        offset_limit: Some(2),
        ..options()
    };
    let (server, reconciler) = setup(opts).await;

    Mock::given(method("GET"))
        .and(path(feature_path("deployed", "vlanConfig")))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": { "vlanConfig": {
            "items": [
                { "configType": "VLAN", "vlanId": 1, "name": "default" },
                { "configType": "VLAN", "vlanId": 10, "name": "USERS" }
            ]
        } } })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(feature_path("deployed", "vlanConfig")))
        .and(query_param("offset", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": { "vlanConfig": {
            "items": [{ "configType": "VLAN", "vlanId": 100, "name": "SALES" }]
        } } })))
        .expect(1)
        .mount(&server)
        .await;

    let doc = validate(
        &json!({ "vlans": [{ "vlan_id": 100, "vlan_name": "SALES" }] }),
        StateTag::Merged,
    )
    .unwrap();
    let run = reconciler.plan(&target(), &doc).await.unwrap();
    assert!(!run.plan.has_changes());
    assert_eq!(
        run.state.deployed[&wiredctl_core::ApiFeature::VlanConfig]["items"]
            .as_array()
            .unwrap()
            .len(),
        3
    );
}

#[tokio::test]
async fn global_features_are_read_whole_when_paging() {
    let opts = ReconcileOptions {
        offset_limit: Some(1),
        ..options()
    };
    let (server, reconciler) = setup(opts).await;
    Mock::given(method("GET"))
        .and(path(feature_path("deployed", "cdpGlobalConfig")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": { "cdpGlobalConfig": {
            "items": [{ "configType": "CDP_GLOBAL", "isCdpEnabled": true }]
        } } })))
        .expect(1)
        .mount(&server)
        .await;

    let doc = validate(&json!({ "cdp": { "cdp_admin_status": true } }), StateTag::Merged).unwrap();
    let run = tokio::time::timeout(Duration::from_secs(5), reconciler.plan(&target(), &doc))
        .await
        .unwrap()
        .unwrap();
    assert!(!run.plan.has_changes());
}

#[tokio::test]
async fn paging_stops_when_offset_is_ignored() {
    let opts = ReconcileOptions {
        offset_limit: Some(2),
        ..options()
    };
    let (server, reconciler) = setup(opts).await;
    Mock::given(method("GET"))
        .and(path(feature_path("deployed", "vlanConfig")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": { "vlanConfig": {
            "items": [
                { "configType": "VLAN", "vlanId": 1, "name": "default" },
                { "configType": "VLAN", "vlanId": 10, "name": "USERS" }
            ]
        } } })))
        .expect(2)
        .mount(&server)
        .await;

    let doc = validate(&json!({ "vlans": [{ "vlan_id": 10, "vlan_name": "USERS" }] }), StateTag::Merged)
        .unwrap();
    let run = tokio::time::timeout(Duration::from_secs(5), reconciler.plan(&target(), &doc))
        .await
        .unwrap()
        .unwrap();
    assert!(!run.plan.has_changes());
    assert_eq!(
        run.state.deployed[&wiredctl_core::ApiFeature::VlanConfig]["items"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
}

// ── Verification ────────────────────────────────────────────────────

fn verifying() -> ReconcileOptions {
    ReconcileOptions {
        config_verify: true,
        ..options()
    }
}

async fn mount_vlan_create(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(feature_path("intended", "vlanConfig")))
        .respond_with(task_accepted("task-vlan"))
        .expect(1)
        .mount(server)
        .await;
    mount_task(server, "task-vlan", "SUCCESS").await;
    mount_deploy(server, 1).await;
}

fn sales_vlan() -> wiredctl_core::Layer2Document {
    validate(
        &json!({ "vlans": [{ "vlan_id": 100, "vlan_name": "SALES", "vlan_admin_status": true }] }),
        StateTag::Merged,
    )
    .unwrap()
}

#[tokio::test]
async fn verification_reads_new_vlan_back() {
    let (server, reconciler) = setup(verifying()).await;
    // First deployed read is the pre-change state; later reads see the deploy.
    Mock::given(method("GET"))
        .and(path(feature_path("deployed", "vlanConfig")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": { "vlanConfig": {
            "items": [{ "configType": "VLAN", "vlanId": 1, "name": "default", "id": "v-1" }]
        } } })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_state(
        &server,
        "deployed",
        "vlanConfig",
        json!({ "items": [
            { "configType": "VLAN", "vlanId": 1, "name": "default", "id": "v-1" },
            { "configType": "VLAN", "vlanId": 100, "name": "SALES", "isVlanEnabled": true, "id": "v-100" }
        ] }),
    )
    .await;
    mount_vlan_create(&server).await;

    let summary = reconciler
        .apply(&target(), &sales_vlan(), StateTag::Merged)
        .await
        .unwrap();
    assert!(summary.deploy_succeeded);
    let verification = summary.verification.unwrap();
    assert!(verification.is_verified());
    assert!(verification.features.contains_key(&wiredctl_core::ApiFeature::VlanConfig));
}

#[tokio::test]
async fn verification_mismatch_keeps_run_successful() {
    let (server, reconciler) = setup(verifying()).await;
    mount_state(
        &server,
        "deployed",
        "vlanConfig",
        json!({ "items": [{ "configType": "VLAN", "vlanId": 1, "name": "default" }] }),
    )
    .await;
    mount_vlan_create(&server).await;

    let summary = reconciler
        .apply(&target(), &sales_vlan(), StateTag::Merged)
        .await
        .unwrap();
    assert!(summary.deploy_succeeded);
    let verification = summary.verification.unwrap();
    assert_eq!(verification.mismatch_count(), 1);
    assert_eq!(
        verification.features[&wiredctl_core::ApiFeature::VlanConfig][0].path,
        "items[vlanId=100]"
    );
    assert!(summary.message.contains("1 mismatch"));
}

#[tokio::test]
async fn verification_reports_vlan_still_deployed_after_removal() {
    let (server, reconciler) = setup(verifying()).await;
    let current = json!({ "items": [
        { "configType": "VLAN", "vlanId": 1, "name": "default" },
        { "configType": "VLAN", "vlanId": 100, "name": "SALES" }
    ] });
    mount_state(&server, "deployed", "vlanConfig", current.clone()).await;
    mount_state(&server, "intended", "vlanConfig", current).await;
    Mock::given(method("PUT"))
        .and(path(feature_path("intended", "vlanConfig")))
        .respond_with(task_accepted("task-ok"))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(&server, "task-ok", "SUCCESS").await;
    mount_deploy(&server, 1).await;

    let doc = validate(&json!({ "vlans": [{ "vlan_id": 100 }] }), StateTag::Deleted).unwrap();
    let summary = reconciler.apply(&target(), &doc, StateTag::Deleted).await.unwrap();
    assert_eq!(summary.deletions[0].status, DeletionStatus::Deleted);
    let verification = summary.verification.unwrap();
    assert_eq!(verification.mismatch_count(), 1);
    assert_eq!(
        verification.features[&wiredctl_core::ApiFeature::VlanConfig][0].path,
        "items[vlanId=100]"
    );
}

// ── Pre-flight ──────────────────────────────────────────────────────

#[tokio::test]
async fn old_controller_is_refused_before_reads() {
    let opts = ReconcileOptions {
        controller_version: Some("2.3.5.3".into()),
        ..options()
    };
    let (server, reconciler) = setup(opts).await;
    let doc = validate(&json!({ "cdp": { "cdp_timer": 30 } }), StateTag::Merged).unwrap();

    let err = reconciler
        .apply(&target(), &doc, StateTag::Merged)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedVersion { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_device_is_refused() {
    let server = MockServer::start().await;
    let client = CatalystClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    Mock::given(method("GET"))
        .and(path(format!("{API}/network-device")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": [{
            "id": "dev-1",
            "reachabilityStatus": "Unreachable",
            "collectionStatus": "Managed"
        }] })))
        .mount(&server)
        .await;
    let reconciler = Reconciler::with_client(client, options());

    let err = reconciler.resolve_device(&target()).await.unwrap_err();
    assert!(matches!(err, CoreError::DeviceUnreachable { .. }));
}

// ── Deleted state ───────────────────────────────────────────────────

#[tokio::test]
async fn cdp_reset_adopts_deployed_then_deletes() {
    let (server, reconciler) = setup(options()).await;
    mount_state(
        &server,
        "deployed",
        "cdpGlobalConfig",
        json!({ "items": [{
            "configType": "CDP_GLOBAL", "isCdpEnabled": true, "timer": 60,
            "id": "cdp-1", "deviceId": "dev-1", "lastUpdated": 1_700_000_000
        }] }),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(feature_path("intended", "cdpGlobalConfig")))
        .and(body_json(json!({ "cdpGlobalConfig": { "items": [
            { "configType": "CDP_GLOBAL", "isCdpEnabled": true, "timer": 60 }
        ] } })))
        .respond_with(task_accepted("task-ok"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(feature_path("intended", "cdpGlobalConfig")))
        .respond_with(task_accepted("task-ok"))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(&server, "task-ok", "SUCCESS").await;
    mount_deploy(&server, 2).await;

    let doc = validate(&json!({ "cdp": null }), StateTag::Deleted).unwrap();
    let summary = reconciler.apply(&target(), &doc, StateTag::Deleted).await.unwrap();

    let cdp = format!("{API}/networkDevices/dev-1/configFeatures/intended/layer2/cdpGlobalConfig");
    assert_eq!(
        writes(&server).await,
        vec![
            ("POST".to_owned(), cdp.clone()),
            ("POST".to_owned(), deploy_path()),
            ("DELETE".to_owned(), cdp),
            ("POST".to_owned(), deploy_path()),
        ]
    );
    assert_eq!(summary.deletions[0].status, DeletionStatus::Deleted);
    assert_eq!(summary.intent_successes, 2);
}

#[tokio::test]
async fn vlan_removal_updates_intent_without_requested_ids() {
    let (server, reconciler) = setup(options()).await;
    let current = json!({ "items": [
        { "configType": "VLAN", "vlanId": 1, "name": "default" },
        { "configType": "VLAN", "vlanId": 100, "name": "SALES" }
    ] });
    mount_state(&server, "deployed", "vlanConfig", current.clone()).await;
    mount_state(&server, "intended", "vlanConfig", current).await;

    Mock::given(method("PUT"))
        .and(path(feature_path("intended", "vlanConfig")))
        .and(body_json(json!({ "vlanConfig": { "items": [
            { "configType": "VLAN", "vlanId": 1, "name": "default" }
        ] } })))
        .respond_with(task_accepted("task-ok"))
        .expect(1)
        .mount(&server)
        .await;
    mount_task(&server, "task-ok", "SUCCESS").await;
    mount_deploy(&server, 1).await;

    let doc = validate(
        &json!({ "vlans": [{ "vlan_id": 100 }, { "vlan_id": 300 }] }),
        StateTag::Deleted,
    )
    .unwrap();
    let summary = reconciler.apply(&target(), &doc, StateTag::Deleted).await.unwrap();
    assert_eq!(summary.deletions[0].status, DeletionStatus::Deleted);
    assert!(summary.deletions[0].message.contains("100"));
}

#[tokio::test]
async fn unsupported_deletions_make_no_writes() {
    let (server, reconciler) = setup(options()).await;
    mount_deploy(&server, 0).await;

    let doc = validate(
        &json!({
            "stp": { "stp_mode": "RSTP" },
            "igmp_snooping": { "enable_igmp_snooping": true },
            "mld_snooping": { "enable_mld_snooping": true },
            "logical_ports": { "port_channel_auto": false },
            "port_configuration": [{ "interface_name": "GigabitEthernet1/0/1" }]
        }),
        StateTag::Deleted,
    )
    .unwrap();
    let summary = reconciler.apply(&target(), &doc, StateTag::Deleted).await.unwrap();

    assert!(!summary.changed);
    assert_eq!(summary.deletions.len(), 5);
    assert!(
        summary
            .deletions
            .iter()
            .all(|d| d.status == DeletionStatus::NotSupported)
    );
    assert!(writes(&server).await.is_empty());
}
