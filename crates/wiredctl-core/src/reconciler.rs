// ── Reconciler ──
//
// Entry point for consumers. Owns an authenticated controller client and
// runs the full pipeline for one device: version gate, device resolution,
// read, plan, execute, deploy and optional verification.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};
use wiredctl_api::{CatalystClient, Credentials, NetworkDevice};

use crate::config::{ControllerConfig, DeviceTarget, ReconcileOptions};
use crate::deletion::Deleter;
use crate::diff;
use crate::error::CoreError;
use crate::executor::Executor;
use crate::mapping::{WireState, map_document};
use crate::model::{
    ApiFeature, ControllerVersion, DeletionOutcome, DeletionStatus, Feature, Layer2Document,
    MINIMUM_CONTROLLER_VERSION, Plan, ReconcileSummary, StateTag,
};
use crate::reader::{DeviceState, StateReader};
use crate::verify;

const REACHABLE: &str = "Reachable";
const COLLECTION_OK: &[&str] = &["Managed", "In Progress"];

/// A planned run: the resolved device and what would change.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    pub device: NetworkDevice,
    pub desired: WireState,
    pub state: DeviceState,
    pub plan: Plan,
}

/// Drives reconcile runs against one controller.
pub struct Reconciler {
    client: CatalystClient,
    options: ReconcileOptions,
}

impl Reconciler {
    /// Authenticate against the controller and build a reconciler.
    pub async fn connect(
        config: &ControllerConfig,
        options: ReconcileOptions,
    ) -> Result<Self, CoreError> {
        let credentials =
            Credentials::new(config.auth.username.clone(), config.auth.password.clone());
        let client =
            CatalystClient::login(config.url.as_str(), &credentials, &config.transport()).await?;
        info!(url = %config.url, "connected to controller");
        Ok(Self::with_client(client, options))
    }

    /// Wrap an already-authenticated client.
    pub fn with_client(client: CatalystClient, options: ReconcileOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn client(&self) -> &CatalystClient {
        &self.client
    }

    // ── Pre-flight ───────────────────────────────────────────────────

    /// Refuse controllers older than the minimum release.
    ///
    /// Returns the detected version, or `None` when the controller does not
    /// report one (the run continues with a warning).
    pub async fn check_version(&self) -> Result<Option<ControllerVersion>, CoreError> {
        let raw = match &self.options.controller_version {
            Some(v) => Some(v.clone()),
            None => match self.client.release().await {
                Ok(release) => release.and_then(|r| r.display_version.or(r.installed_version)),
                Err(e) if e.is_auth_expired() => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "could not read controller release");
                    None
                }
            },
        };

        let Some(version) = raw.as_deref().and_then(ControllerVersion::parse) else {
            warn!(raw = ?raw, "controller version unknown, skipping version check");
            return Ok(None);
        };
        if !version.is_supported() {
            return Err(CoreError::UnsupportedVersion {
                found: version.to_string(),
                minimum: MINIMUM_CONTROLLER_VERSION.to_owned(),
            });
        }
        debug!(%version, "controller version supported");
        Ok(Some(version))
    }

    /// Look the device up and check it can be configured.
    pub async fn resolve_device(&self, target: &DeviceTarget) -> Result<NetworkDevice, CoreError> {
        let devices = match target {
            DeviceTarget::ManagementIp(ip) => self.client.devices_by_management_ip(ip).await?,
            DeviceTarget::Hostname(name) => self.client.devices_by_hostname(name).await?,
        };
        let device = devices
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: target.to_string(),
            })?;

        let reachability = device.reachability_status.clone().unwrap_or_default();
        if reachability != REACHABLE {
            return Err(CoreError::DeviceUnreachable {
                identifier: target.to_string(),
                status: reachability,
            });
        }

        if self.options.device_collection_status_check {
            let collection = device.collection_status.clone().unwrap_or_default();
            if !COLLECTION_OK.contains(&collection.as_str()) {
                return Err(CoreError::DeviceNotManaged {
                    identifier: target.to_string(),
                    status: collection,
                });
            }
        }

        info!(device_id = %device.id, hostname = ?device.hostname, "resolved device");
        Ok(device)
    }

    fn reader<'r>(&'r self, device_id: &'r str) -> StateReader<'r> {
        StateReader::new(&self.client, device_id, self.options.offset_limit)
    }

    fn executor<'r>(&'r self, device_id: &'r str) -> Executor<'r> {
        Executor::new(&self.client, device_id, self.options.poll)
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Read current state and compute the plan without writing anything.
    pub async fn plan(
        &self,
        target: &DeviceTarget,
        doc: &Layer2Document,
    ) -> Result<PlannedRun, CoreError> {
        let desired = map_document(doc)?;
        self.check_version().await?;
        let device = self.resolve_device(target).await?;

        let features: Vec<ApiFeature> = desired.keys().copied().collect();
        let state = self.reader(&device.id).read(&features).await?;
        let plan = diff::plan(&desired, &state);
        Ok(PlannedRun {
            device,
            desired,
            state,
            plan,
        })
    }

    /// Reconcile the device towards `doc` in the given state.
    pub async fn apply(
        &self,
        target: &DeviceTarget,
        doc: &Layer2Document,
        state: StateTag,
    ) -> Result<ReconcileSummary, CoreError> {
        match state {
            StateTag::Merged => self.apply_merged(target, doc).await,
            StateTag::Deleted => self.apply_deleted(target, doc).await,
        }
    }

    async fn apply_merged(
        &self,
        target: &DeviceTarget,
        doc: &Layer2Document,
    ) -> Result<ReconcileSummary, CoreError> {
        let run = self.plan(target, doc).await?;
        let device_id = run.device.id.as_str();
        let mut summary = ReconcileSummary {
            device_id: device_id.to_owned(),
            state: StateTag::Merged,
            total_features_planned: run.plan.changes().count(),
            ..ReconcileSummary::default()
        };

        if !run.plan.has_changes() {
            summary.message = "No changes required; configuration already matches".into();
            info!(device_id, "{}", summary.message);
            return Ok(summary);
        }

        let report = self.executor(device_id).execute(&run.plan).await?;
        summary.changed = true;
        summary.intent_successes = report.intent_successes;
        summary.deploy_attempted = report.deploy_attempted;
        summary.deploy_succeeded = report.deploy_succeeded;
        summary.task_ids = report.task_ids;
        summary.message = format!(
            "Applied {} feature change(s) and deployed",
            summary.intent_successes
        );

        if self.options.config_verify && summary.deploy_succeeded {
            let verification = verify::verify_plan(
                &self.reader(device_id),
                &run.plan,
                self.options.config_verification_wait_time,
            )
            .await?;
            if !verification.is_verified() {
                summary.message.push_str(&format!(
                    "; verification found {} mismatch(es)",
                    verification.mismatch_count()
                ));
            }
            summary.verification = Some(verification);
        }
        info!(device_id, "{}", summary.message);
        Ok(summary)
    }

    async fn apply_deleted(
        &self,
        target: &DeviceTarget,
        doc: &Layer2Document,
    ) -> Result<ReconcileSummary, CoreError> {
        self.check_version().await?;
        let device = self.resolve_device(target).await?;
        let device_id = device.id.as_str();
        let reader = self.reader(device_id);
        let executor = self.executor(device_id);

        let deletions = Deleter::new(&reader, &executor).run(doc).await?;

        let mut summary = ReconcileSummary {
            device_id: device_id.to_owned(),
            state: StateTag::Deleted,
            total_features_planned: doc.len(),
            ..ReconcileSummary::default()
        };
        for outcome in &deletions {
            if outcome.status != DeletionStatus::Deleted {
                continue;
            }
            summary.changed = true;
            summary.deploy_attempted = true;
            summary.deploy_succeeded = true;
            summary.intent_successes += outcome.task_ids.len() / 2;
            for (step, task_id) in outcome.task_ids.iter().enumerate() {
                summary
                    .task_ids
                    .insert(format!("{}#{}", outcome.feature, step + 1), task_id.clone());
            }
        }

        let deleted = deletions
            .iter()
            .filter(|o| o.status == DeletionStatus::Deleted)
            .count();
        let skipped = deletions.len() - deleted;
        summary.message = format!("Deleted {deleted} feature(s), skipped {skipped}");

        if self.options.config_verify && summary.deploy_succeeded {
            let removed = removed_vlan_ids(doc, &deletions);
            let verification = verify::verify_vlans_removed(
                &reader,
                &removed,
                self.options.config_verification_wait_time,
            )
            .await?;
            summary.verification = Some(verification);
        }

        summary.deletions = deletions;
        info!(device_id, "{}", summary.message);
        Ok(summary)
    }

    /// Read deployed and intended containers for the named features.
    pub async fn show(
        &self,
        target: &DeviceTarget,
        features: &[Feature],
    ) -> Result<(NetworkDevice, DeviceState), CoreError> {
        let device = self.resolve_device(target).await?;
        let api_features: Vec<ApiFeature> = features
            .iter()
            .flat_map(|f| f.api_features().iter().copied())
            .collect();
        let state = self.reader(&device.id).read(&api_features).await?;
        Ok((device, state))
    }
}

fn removed_vlan_ids(
    doc: &Layer2Document,
    deletions: &[DeletionOutcome],
) -> HashSet<i64> {
    let vlans_deleted = deletions
        .iter()
        .any(|o| o.feature == Feature::Vlans && o.status == DeletionStatus::Deleted);
    if !vlans_deleted {
        return HashSet::new();
    }
    doc.get(Feature::Vlans)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("vlan_id").and_then(Value::as_i64))
                .collect()
        })
        .unwrap_or_default()
}
