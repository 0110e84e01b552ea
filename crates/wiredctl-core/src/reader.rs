// ── State reader ──
//
// Fetches deployed and intended containers for the API features a run
// touches. Missing or empty features read as an empty container so the
// planner never sees `None`.

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};
use wiredctl_api::{CatalystClient, ConfigStage};

use crate::diff::merge::natural_key;
use crate::error::CoreError;
use crate::mapping::output_structure;
use crate::model::{ApiFeature, DiffClass};

/// Upper bound on pages per feature read.
const MAX_PAGES: u32 = 1000;

/// Deployed and intended containers keyed by API feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    pub deployed: IndexMap<ApiFeature, Value>,
    pub intended: IndexMap<ApiFeature, Value>,
}

impl DeviceState {
    /// Deployed container, or an empty one when unread.
    pub fn deployed(&self, feature: ApiFeature) -> Value {
        self.deployed
            .get(&feature)
            .cloned()
            .unwrap_or_else(output_structure)
    }

    /// Intended container, or an empty one when unread.
    pub fn intended(&self, feature: ApiFeature) -> Value {
        self.intended
            .get(&feature)
            .cloned()
            .unwrap_or_else(output_structure)
    }
}

/// Items of a `{items: [...]}` container; empty for anything else.
pub fn items(container: &Value) -> &[Value] {
    container
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

pub fn has_items(container: &Value) -> bool {
    !items(container).is_empty()
}

/// Reads feature containers for one device.
pub struct StateReader<'a> {
    client: &'a CatalystClient,
    device_id: &'a str,
    page_size: Option<u32>,
}

impl<'a> StateReader<'a> {
    pub fn new(client: &'a CatalystClient, device_id: &'a str, page_size: Option<u32>) -> Self {
        Self {
            client,
            device_id,
            page_size: page_size.filter(|limit| *limit > 0),
        }
    }

    /// Read both stages for every feature, in the given order.
    pub async fn read(&self, features: &[ApiFeature]) -> Result<DeviceState, CoreError> {
        let mut state = DeviceState::default();
        for &feature in features {
            let deployed = self.read_feature(feature, ConfigStage::Deployed).await?;
            let intended = self.read_feature(feature, ConfigStage::Intended).await?;
            debug!(
                feature = %feature,
                deployed = items(&deployed).len(),
                intended = items(&intended).len(),
                "read feature state"
            );
            state.deployed.insert(feature, deployed);
            state.intended.insert(feature, intended);
        }
        Ok(state)
    }

    /// Read only the deployed stage (verification and `show`).
    pub async fn read_deployed(
        &self,
        features: &[ApiFeature],
    ) -> Result<IndexMap<ApiFeature, Value>, CoreError> {
        let mut deployed = IndexMap::new();
        for &feature in features {
            deployed.insert(feature, self.read_feature(feature, ConfigStage::Deployed).await?);
        }
        Ok(deployed)
    }

    /// One feature, one stage. List-shaped features are paginated when a
    /// page size is configured; global features always come back whole.
    pub async fn read_feature(
        &self,
        feature: ApiFeature,
        stage: ConfigStage,
    ) -> Result<Value, CoreError> {
        let limit = match (self.page_size, feature.diff_class()) {
            (Some(limit), DiffClass::Vlan | DiffClass::Interface) => limit,
            _ => return self.fetch(feature, stage, None).await,
        };

        let mut collected: Vec<Value> = Vec::new();
        let mut offset: u32 = 1;
        for _ in 0..MAX_PAGES {
            let page = self.fetch(feature, stage, Some((offset, limit))).await?;
            let page_items = items(&page);
            let count = page_items.len();
            let fresh: Vec<Value> = page_items
                .iter()
                .filter(|item| !collected.iter().any(|seen| same_item(seen, item)))
                .cloned()
                .collect();
            debug!(feature = %feature, %stage, offset, count, fresh = fresh.len(), "read page");

            let short = u32::try_from(count).map_or(true, |n| n < limit);
            let stalled = fresh.is_empty();
            collected.extend(fresh);
            if short || stalled {
                break;
            }
            let Some(next) = offset.checked_add(limit) else {
                break;
            };
            offset = next;
        }

        let mut container = output_structure();
        container["items"] = Value::Array(collected);
        Ok(container)
    }

    async fn fetch(
        &self,
        feature: ApiFeature,
        stage: ConfigStage,
        page: Option<(u32, u32)>,
    ) -> Result<Value, CoreError> {
        match self
            .client
            .layer2_feature(self.device_id, stage, feature.as_ref(), page)
            .await
        {
            Ok(Some(container)) if container.get("items").is_some_and(Value::is_array) => {
                Ok(container)
            }
            Ok(Some(other)) => {
                warn!(feature = %feature, %stage, body = %other, "unexpected feature shape, treating as empty");
                Ok(output_structure())
            }
            Ok(None) => Ok(output_structure()),
            Err(e) if e.is_not_found() || e.is_null_iteration() => {
                debug!(feature = %feature, %stage, "feature not configured");
                Ok(output_structure())
            }
            Err(e) => Err(CoreError::ReadFailed {
                feature: feature.to_string(),
                stage: stage.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Two list items describe the same element: equal natural keys, or equal
/// values when there is no key.
fn same_item(a: &Value, b: &Value) -> bool {
    match (natural_key(a), natural_key(b)) {
        (Some(ka), Some(kb)) => ka == kb,
        _ => a == b,
    }
}
