// ── Deep merge ──
//
// Overlay a desired wire value onto an existing one. Lists of objects
// match by natural key when one is present; `configType` is structural
// and never overwritten or counted as a change.

use serde_json::{Map, Value};

use crate::model::Mismatch;

/// Fields that identify an element inside a wire list, in lookup order.
const NATURAL_KEYS: &[&str] = &["vlanId", "interfaceName", "name"];

/// Controller-assigned fields dropped before resubmitting deployed items.
const DEPLOYMENT_FIELDS: &[&str] = &[
    "id",
    "deviceId",
    "deviceName",
    "lastUpdated",
    "status",
    "deploymentId",
];

const CONFIG_TYPE: &str = "configType";

/// The natural key of a list element, if it has one.
pub fn natural_key(item: &Value) -> Option<(&'static str, &Value)> {
    let obj = item.as_object()?;
    NATURAL_KEYS
        .iter()
        .find_map(|key| obj.get(*key).map(|v| (*key, v)))
}

/// Merge `desired` over `existing`; returns the result and whether it
/// differs from `existing`.
pub fn deep_merge(existing: &Value, desired: &Value) -> (Value, bool) {
    match (existing, desired) {
        (Value::Object(have), Value::Object(want)) => {
            let (merged, changed) = merge_objects(have, want);
            (Value::Object(merged), changed)
        }
        (Value::Array(have), Value::Array(want)) if want.iter().all(Value::is_object) => {
            let (merged, changed) = merge_object_lists(have, want);
            (Value::Array(merged), changed)
        }
        _ if existing == desired => (existing.clone(), false),
        _ => (desired.clone(), true),
    }
}

fn merge_objects(
    have: &Map<String, Value>,
    want: &Map<String, Value>,
) -> (Map<String, Value>, bool) {
    let mut merged = have.clone();
    let mut changed = false;

    for (key, value) in want {
        if value.is_null() {
            continue;
        }
        if key == CONFIG_TYPE {
            merged.entry(key.clone()).or_insert_with(|| value.clone());
            continue;
        }
        match have.get(key) {
            Some(current) => {
                let (next, differs) = deep_merge(current, value);
                changed |= differs;
                merged.insert(key.clone(), next);
            }
            None => {
                changed |= !is_empty_container(value);
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    (merged, changed)
}

pub(crate) fn merge_object_lists(have: &[Value], want: &[Value]) -> (Vec<Value>, bool) {
    let mut merged = have.to_vec();
    let mut changed = false;

    for (index, item) in want.iter().enumerate() {
        let slot = match natural_key(item) {
            Some((field, key)) => merged
                .iter()
                .position(|m| m.get(field).is_some_and(|v| v == key)),
            None if index < merged.len() => Some(index),
            None => None,
        };
        match slot {
            Some(pos) => {
                let (next, differs) = deep_merge(&merged[pos], item);
                changed |= differs;
                merged[pos] = next;
            }
            None => {
                changed = true;
                merged.push(item.clone());
            }
        }
    }
    (merged, changed)
}

/// `{configType, items: []}` or `{}`; adding one is not a semantic change.
fn is_empty_container(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        obj.iter().all(|(k, v)| match k.as_str() {
            CONFIG_TYPE => true,
            "items" => v.as_array().is_some_and(Vec::is_empty),
            _ => false,
        })
    })
}

/// Remove controller-assigned fields at every depth.
pub fn strip_deployment_fields(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            for field in DEPLOYMENT_FIELDS {
                obj.remove(*field);
            }
            for child in obj.values_mut() {
                strip_deployment_fields(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_deployment_fields),
        _ => {}
    }
}

/// Paths under `desired` whose value `actual` does not carry.
///
/// `desired` is treated as a subset: extra fields in `actual` are fine.
pub fn subset_mismatches(
    desired: &Value,
    actual: Option<&Value>,
    path: &str,
    out: &mut Vec<Mismatch>,
) {
    match (desired, actual) {
        (Value::Object(want), Some(Value::Object(have))) => {
            for (key, value) in want {
                if key == CONFIG_TYPE || value.is_null() || is_empty_container(value) {
                    continue;
                }
                subset_mismatches(value, have.get(key), &join(path, key), out);
            }
        }
        (Value::Array(want), Some(Value::Array(have))) if want.iter().all(Value::is_object) => {
            for (index, item) in want.iter().enumerate() {
                let (label, found) = match natural_key(item) {
                    Some((field, key)) => (
                        format!("{field}={}", display_key(key)),
                        have.iter().find(|h| h.get(field).is_some_and(|v| v == key)),
                    ),
                    None => (index.to_string(), have.get(index)),
                };
                subset_mismatches(item, found, &format!("{path}[{label}]"), out);
            }
        }
        (want, Some(have)) if want == have => {}
        (want, have) => out.push(Mismatch {
            path: path.to_owned(),
            expected: want.clone(),
            actual: have.cloned(),
        }),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}

fn display_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn equal_values_are_not_a_change() {
        let have = json!({ "configType": "CDP_GLOBAL", "isCdpEnabled": true, "timer": 60 });
        let (merged, changed) = deep_merge(&have, &json!({ "isCdpEnabled": true }));
        assert!(!changed);
        assert_eq!(merged, have);
    }

    #[test]
    fn scalar_change_keeps_other_fields() {
        let have = json!({ "configType": "CDP_GLOBAL", "isCdpEnabled": true, "timer": 60 });
        let (merged, changed) = deep_merge(&have, &json!({ "timer": 90 }));
        assert!(changed);
        assert_eq!(merged, json!({ "configType": "CDP_GLOBAL", "isCdpEnabled": true, "timer": 90 }));
    }

    #[test]
    fn config_type_is_never_overwritten() {
        let have = json!({ "configType": "LACP_PORTCHANNEL_CONFIG", "name": "Port-channel1" });
        let (merged, changed) =
            deep_merge(&have, &json!({ "configType": "PAGP_PORTCHANNEL_CONFIG", "name": "Port-channel1" }));
        assert!(!changed);
        assert_eq!(merged["configType"], "LACP_PORTCHANNEL_CONFIG");
    }

    #[test]
    fn keyed_lists_match_regardless_of_order() {
        let have = json!([
            { "configType": "STP_VLAN", "vlanId": 10, "priority": 32768 },
            { "configType": "STP_VLAN", "vlanId": 20, "priority": 8192 }
        ]);
        let want = json!([
            { "configType": "STP_VLAN", "vlanId": 20, "priority": 8192 },
            { "configType": "STP_VLAN", "vlanId": 10, "priority": 32768 }
        ]);
        let (merged, changed) = deep_merge(&have, &want);
        assert!(!changed);
        assert_eq!(merged, have);
    }

    #[test]
    fn reordered_mrouter_ports_are_not_a_change() {
        let have = json!({ "configType": "IGMP_SNOOPING_GLOBAL",
            "igmpSnoopingVlanSettings": { "configType": "SET", "items": [{
                "configType": "IGMP_SNOOPING_VLAN", "vlanId": 10,
                "igmpSnoopingVlanMrouters": { "configType": "SET", "items": [
                    { "configType": "IGMP_SNOOPING_VLAN_MROUTER", "interfaceName": "Gi1/0/1" },
                    { "configType": "IGMP_SNOOPING_VLAN_MROUTER", "interfaceName": "Gi1/0/2" }
                ] }
            }] }
        });
        let want = json!({ "configType": "IGMP_SNOOPING_GLOBAL",
            "igmpSnoopingVlanSettings": { "configType": "SET", "items": [{
                "configType": "IGMP_SNOOPING_VLAN", "vlanId": 10,
                "igmpSnoopingVlanMrouters": { "configType": "SET", "items": [
                    { "configType": "IGMP_SNOOPING_VLAN_MROUTER", "interfaceName": "Gi1/0/2" },
                    { "configType": "IGMP_SNOOPING_VLAN_MROUTER", "interfaceName": "Gi1/0/1" }
                ] }
            }] }
        });
        let (merged, changed) = deep_merge(&have, &want);
        assert!(!changed);
        assert_eq!(merged, have);
    }

    #[test]
    fn new_keyed_items_are_appended() {
        let have = json!([{ "vlanId": 1, "name": "default" }]);
        let (merged, changed) = deep_merge(&have, &json!([{ "vlanId": 100, "name": "SALES" }]));
        assert!(changed);
        assert_eq!(merged, json!([{ "vlanId": 1, "name": "default" }, { "vlanId": 100, "name": "SALES" }]));
    }

    #[test]
    fn adding_an_empty_container_is_not_a_change() {
        let have = json!({ "vlanId": 10 });
        let want = json!({ "vlanId": 10, "igmpSnoopingVlanMrouters": { "configType": "SET", "items": [] } });
        let (merged, changed) = deep_merge(&have, &want);
        assert!(!changed);
        assert_eq!(merged["igmpSnoopingVlanMrouters"]["items"], json!([]));
    }

    #[test]
    fn strip_removes_nested_deployment_fields() {
        let mut value = json!({ "items": [{
            "id": "abc", "deviceId": "dev", "vlanId": 1,
            "nested": { "lastUpdated": 1, "keep": true }
        }] });
        strip_deployment_fields(&mut value);
        assert_eq!(value, json!({ "items": [{ "vlanId": 1, "nested": { "keep": true } }] }));
    }

    #[test]
    fn subset_mismatch_reports_keyed_path() {
        let want = json!({ "items": [{ "configType": "VLAN", "vlanId": 100, "name": "SALES" }] });
        let have = json!({ "items": [{ "configType": "VLAN", "vlanId": 100, "name": "VLAN0100", "id": "x" }] });
        let mut out = Vec::new();
        subset_mismatches(&want, Some(&have), "", &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path, "items[vlanId=100].name");
        assert_eq!(out[0].actual, Some(json!("VLAN0100")));
    }
}
