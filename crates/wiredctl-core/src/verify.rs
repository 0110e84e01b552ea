// ── Post-deploy verification ──
//
// After a deploy the controller settles asynchronously. Wait, re-read the
// deployed containers and report every desired value the device does not
// carry. Mismatches are logged and reported; they never fail the run.

use std::collections::HashSet;
use std::time::Duration;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{info, warn};

use crate::diff::merge::subset_mismatches;
use crate::error::CoreError;
use crate::model::{ApiFeature, Mismatch, Plan, VerificationReport};
use crate::reader::{StateReader, items};

/// Compare the payloads of every changed record with a fresh deployed read.
pub async fn verify_plan(
    reader: &StateReader<'_>,
    plan: &Plan,
    wait: Duration,
) -> Result<VerificationReport, CoreError> {
    let features: Vec<ApiFeature> = plan.changes().map(|r| r.feature).collect();
    if features.is_empty() {
        return Ok(VerificationReport::default());
    }

    settle(wait).await;
    let deployed = reader.read_deployed(&features).await?;

    let expected = plan
        .changes()
        .map(|r| (r.feature, r.final_config.clone()))
        .collect();
    Ok(compare(&expected, &deployed))
}

/// Check that removed VLANs no longer appear in the deployed container.
pub async fn verify_vlans_removed(
    reader: &StateReader<'_>,
    removed: &HashSet<i64>,
    wait: Duration,
) -> Result<VerificationReport, CoreError> {
    let mut report = VerificationReport::default();
    if removed.is_empty() {
        return Ok(report);
    }

    settle(wait).await;
    let feature = ApiFeature::VlanConfig;
    let deployed = reader.read_deployed(&[feature]).await?;
    let mismatches: Vec<Mismatch> = deployed
        .get(&feature)
        .map(items)
        .unwrap_or_default()
        .iter()
        .filter_map(|item| {
            let id = item.get("vlanId").and_then(Value::as_i64)?;
            removed.contains(&id).then(|| Mismatch {
                path: format!("items[vlanId={id}]"),
                expected: Value::Null,
                actual: Some(item.clone()),
            })
        })
        .collect();
    log_feature(feature, &mismatches);
    report.features.insert(feature, mismatches);
    Ok(report)
}

/// Pure comparison of expected payloads against deployed containers.
pub fn compare(
    expected: &IndexMap<ApiFeature, Value>,
    deployed: &IndexMap<ApiFeature, Value>,
) -> VerificationReport {
    let mut report = VerificationReport::default();
    for (&feature, want) in expected {
        let mut mismatches = Vec::new();
        subset_mismatches(want, deployed.get(&feature), "", &mut mismatches);
        log_feature(feature, &mismatches);
        report.features.insert(feature, mismatches);
    }
    report
}

async fn settle(wait: Duration) {
    if !wait.is_zero() {
        info!(wait_secs = wait.as_secs(), "waiting before verification read");
        tokio::time::sleep(wait).await;
    }
}

fn log_feature(feature: ApiFeature, mismatches: &[Mismatch]) {
    if mismatches.is_empty() {
        info!(feature = %feature, "verified");
        return;
    }
    for m in mismatches {
        warn!(
            feature = %feature,
            path = %m.path,
            expected = %m.expected,
            actual = %m.actual.as_ref().map_or_else(|| "<missing>".to_owned(), ToString::to_string),
            "deployed value differs from desired"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn matching_state_is_verified() {
        let mut expected = IndexMap::new();
        expected.insert(
            ApiFeature::CdpGlobalConfig,
            json!({ "items": [{ "configType": "CDP_GLOBAL", "timer": 30 }] }),
        );
        let mut deployed = IndexMap::new();
        deployed.insert(
            ApiFeature::CdpGlobalConfig,
            json!({ "items": [{ "configType": "CDP_GLOBAL", "timer": 30, "holdTime": 180, "id": "x" }] }),
        );
        assert!(compare(&expected, &deployed).is_verified());
    }

    #[test]
    fn dropped_write_is_reported() {
        let mut expected = IndexMap::new();
        expected.insert(
            ApiFeature::VlanConfig,
            json!({ "items": [{ "configType": "VLAN", "vlanId": 100, "name": "SALES" }] }),
        );
        let mut deployed = IndexMap::new();
        deployed.insert(ApiFeature::VlanConfig, json!({ "items": [] }));

        let report = compare(&expected, &deployed);
        assert_eq!(report.mismatch_count(), 1);
        let mismatch = &report.features[&ApiFeature::VlanConfig][0];
        assert_eq!(mismatch.path, "items[vlanId=100]");
        assert_eq!(mismatch.actual, None);
    }
}
