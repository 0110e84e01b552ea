// ── Desired-state documents ──
//
// A document names one device and the Layer-2 configuration it should
// carry. Raw documents are untyped `serde_json::Value` trees (YAML and
// JSON both deserialize into them); the validator turns the configuration
// part into a `Layer2Document` with coerced values and no unknown keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use super::feature::Feature;

/// Requested end state for the listed features.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StateTag {
    /// Merge the document into the device configuration.
    #[default]
    Merged,
    /// Remove the listed configuration from the device.
    Deleted,
}

/// Input file shape: device selector plus Layer-2 configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceDocument {
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub device_collection_status_check: Option<bool>,
    #[serde(default)]
    pub layer2_configuration: Value,
}

/// Validated Layer-2 configuration, keyed by feature in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer2Document {
    features: IndexMap<Feature, Value>,
}

impl Layer2Document {
    pub fn insert(&mut self, feature: Feature, body: Value) {
        self.features.insert(feature, body);
    }

    pub fn get(&self, feature: Feature) -> Option<&Value> {
        self.features.get(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, &Value)> {
        self.features.iter().map(|(f, v)| (*f, v))
    }

    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        self.features.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}
