// ── Deletion ──
//
// `deleted` state is routed per feature. Global features are reset by
// dropping their intent and deploying; VLANs are removed by rewriting the
// intent without them; everything else is reported as unsupported and
// never touched.

use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info};
use wiredctl_api::ConfigStage;

use crate::diff::strip_deployment_fields;
use crate::error::CoreError;
use crate::executor::{Executor, IntentWrite, intent_failed};
use crate::model::{
    ApiFeature, DeletionClass, DeletionOutcome, DeletionStatus, Feature, Layer2Document,
};
use crate::reader::{StateReader, has_items, items};

/// Runs the deletion steps for each feature of a document.
pub struct Deleter<'a> {
    reader: &'a StateReader<'a>,
    executor: &'a Executor<'a>,
    /// Writes completed so far in this run.
    succeeded: usize,
}

impl<'a> Deleter<'a> {
    pub fn new(reader: &'a StateReader<'a>, executor: &'a Executor<'a>) -> Self {
        Self {
            reader,
            executor,
            succeeded: 0,
        }
    }

    /// Process every feature in document order; stops at the first failure.
    pub async fn run(&mut self, doc: &Layer2Document) -> Result<Vec<DeletionOutcome>, CoreError> {
        let mut outcomes = Vec::with_capacity(doc.len());
        for (feature, body) in doc.iter() {
            let outcome = match feature.deletion_class() {
                DeletionClass::NotSupported => not_supported(feature),
                DeletionClass::ResetToDefault => self.reset_to_default(feature).await?,
                DeletionClass::ItemRemoval => self.remove_vlans(feature, body).await?,
            };
            info!(feature = %feature, status = %outcome.status, "deletion processed");
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn reset_to_default(&mut self, feature: Feature) -> Result<DeletionOutcome, CoreError> {
        let api = single_api_feature(feature)?;
        let deployed = self.reader.read_feature(api, ConfigStage::Deployed).await?;
        let intended = self.reader.read_feature(api, ConfigStage::Intended).await?;

        if !has_items(&deployed) && !has_items(&intended) {
            return Ok(outcome(
                feature,
                DeletionStatus::NothingToDelete,
                format!("{} has no configuration to reset", api.friendly_name()),
                Vec::new(),
            ));
        }

        let mut task_ids = Vec::new();
        if !has_items(&intended) {
            debug!(feature = %feature, "no intent yet, adopting deployed configuration");
            let mut adopted = deployed.clone();
            strip_deployment_fields(&mut adopted);
            task_ids.push(self.step(api, IntentWrite::Create(&adopted)).await?);
            task_ids.push(self.deploy().await?);
        }
        task_ids.push(self.step(api, IntentWrite::Delete).await?);
        task_ids.push(self.deploy().await?);

        Ok(outcome(
            feature,
            DeletionStatus::Deleted,
            format!("{} reset to controller defaults", api.friendly_name()),
            task_ids,
        ))
    }

    async fn remove_vlans(
        &mut self,
        feature: Feature,
        body: &Value,
    ) -> Result<DeletionOutcome, CoreError> {
        let api = single_api_feature(feature)?;
        let requested: HashSet<i64> = body
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|e| e.get("vlan_id").and_then(Value::as_i64))
                    .collect()
            })
            .unwrap_or_default();

        let deployed = self.reader.read_feature(api, ConfigStage::Deployed).await?;
        let intended = self.reader.read_feature(api, ConfigStage::Intended).await?;

        let is_requested = |item: &Value| {
            item.get("vlanId")
                .and_then(Value::as_i64)
                .is_some_and(|id| requested.contains(&id))
        };
        let present: Vec<i64> = items(&deployed)
            .iter()
            .filter(|item| is_requested(item))
            .filter_map(|item| item.get("vlanId").and_then(Value::as_i64))
            .collect();

        if present.is_empty() {
            return Ok(outcome(
                feature,
                DeletionStatus::NothingToDelete,
                "none of the requested VLANs are deployed".into(),
                Vec::new(),
            ));
        }

        let mut adopted = deployed.clone();
        strip_deployment_fields(&mut adopted);
        let mut remaining = adopted.clone();
        if let Some(list) = remaining.get_mut("items").and_then(Value::as_array_mut) {
            list.retain(|item| !is_requested(item));
        }

        let mut task_ids = Vec::new();
        if !has_items(&intended) {
            debug!(feature = %feature, "no intent yet, adopting deployed VLANs");
            task_ids.push(self.step(api, IntentWrite::Create(&adopted)).await?);
            task_ids.push(self.deploy().await?);
        }
        task_ids.push(self.step(api, IntentWrite::Update(&remaining)).await?);
        task_ids.push(self.deploy().await?);

        let ids = present
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Ok(outcome(
            feature,
            DeletionStatus::Deleted,
            format!("removed VLAN(s) {ids}"),
            task_ids,
        ))
    }

    async fn step(&mut self, api: ApiFeature, write: IntentWrite<'_>) -> Result<String, CoreError> {
        match self.executor.write(api, write).await {
            Ok(task_id) => {
                self.succeeded += 1;
                Ok(task_id.to_string())
            }
            Err(reason) => Err(intent_failed(api, write, reason, self.succeeded)),
        }
    }

    async fn deploy(&self) -> Result<String, CoreError> {
        self.executor
            .deploy()
            .await
            .map(|task_id| task_id.to_string())
            .map_err(|reason| CoreError::DeployFailed {
                succeeded: self.succeeded,
                reason,
            })
    }
}

fn single_api_feature(feature: Feature) -> Result<ApiFeature, CoreError> {
    feature
        .api_features()
        .first()
        .copied()
        .ok_or_else(|| CoreError::Internal(format!("{feature} has no API feature")))
}

fn outcome(
    feature: Feature,
    status: DeletionStatus,
    message: String,
    task_ids: Vec<String>,
) -> DeletionOutcome {
    DeletionOutcome {
        feature,
        status,
        message,
        task_ids,
    }
}

/// Outcome for features the controller cannot delete.
pub fn not_supported(feature: Feature) -> DeletionOutcome {
    outcome(
        feature,
        DeletionStatus::NotSupported,
        format!(
            "deleting '{feature}' is not supported: the controller's Layer-2 API for it is still in beta"
        ),
        Vec::new(),
    )
}
