// ── Diff planner ──
//
// Compares mapped desired containers with what the controller reports and
// decides, per API feature, whether to create, update or leave the intent
// alone. Change detection runs against deployed state; the payload is
// built on intended state when it exists so pending intent is not lost.

pub mod merge;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::mapping::WireState;
use crate::model::{ApiFeature, DiffClass, IntentOperation, Plan, PlanRecord};
use crate::reader::{DeviceState, has_items, items};

pub use merge::{deep_merge, strip_deployment_fields};

use merge::merge_object_lists;

/// Build a plan for every desired feature, preserving its order.
pub fn plan(desired: &WireState, state: &DeviceState) -> Plan {
    let records = desired
        .iter()
        .map(|(&feature, want)| {
            let record = plan_feature(
                feature,
                want,
                &state.deployed(feature),
                &state.intended(feature),
            );
            if record.changes_detected {
                info!(feature = %feature, operation = %record.intent_operation, "change detected");
            } else {
                debug!(feature = %feature, "no change");
            }
            record
        })
        .collect();
    Plan { records }
}

/// Plan one API feature against its deployed and intended containers.
pub fn plan_feature(
    feature: ApiFeature,
    desired: &Value,
    deployed: &Value,
    intended: &Value,
) -> PlanRecord {
    let mut desired = desired.clone();
    normalize(feature, &mut desired);

    let (mut final_config, changed, operation) = match feature.diff_class() {
        DiffClass::Vlan => plan_keyed_list(&desired, deployed, intended),
        DiffClass::Interface => plan_interfaces(&desired, deployed, intended),
        DiffClass::GlobalSingleton | DiffClass::GlobalNested => {
            plan_singleton(&desired, deployed, intended)
        }
    };
    normalize(feature, &mut final_config);

    if !changed {
        return PlanRecord {
            feature,
            intent_operation: IntentOperation::NoOp,
            final_config: deployed.clone(),
            changes_detected: false,
        };
    }
    PlanRecord {
        feature,
        intent_operation: operation,
        final_config,
        changes_detected: true,
    }
}

// ── Per-class algorithms ─────────────────────────────────────────────

type Planned = (Value, bool, IntentOperation);

fn create_or_update(intended: &Value) -> IntentOperation {
    if has_items(intended) {
        IntentOperation::Update
    } else {
        IntentOperation::Create
    }
}

/// Intended container when it has items, otherwise deployed minus
/// controller-assigned fields.
fn payload_base(deployed: &Value, intended: &Value) -> Value {
    if has_items(intended) {
        return intended.clone();
    }
    let mut base = deployed.clone();
    strip_deployment_fields(&mut base);
    base
}

fn container(items: Vec<Value>) -> Value {
    let mut shell = Map::new();
    shell.insert("items".into(), Value::Array(items));
    Value::Object(shell)
}

/// Whole-list features: the payload carries every item, old and new.
fn plan_keyed_list(desired: &Value, deployed: &Value, intended: &Value) -> Planned {
    let want = items(desired);
    let (_, changed) = merge_object_lists(items(deployed), want);

    let base = payload_base(deployed, intended);
    let (merged, _) = merge_object_lists(items(&base), want);
    (container(merged), changed, create_or_update(intended))
}

/// Interface features: the payload carries only the desired interfaces,
/// each overlaid on what the controller already holds for it. An
/// interface's intended item wins over its deployed one.
fn plan_interfaces(desired: &Value, deployed: &Value, intended: &Value) -> Planned {
    let want = items(desired);
    let (_, changed) = merge_object_lists(items(deployed), want);

    let mut already_intended = false;
    let merged: Vec<Value> = want
        .iter()
        .map(|item| {
            let name = item.get("interfaceName");
            let by_name = |i: &&Value| i.get("interfaceName") == name;
            if let Some(pending) = items(intended).iter().find(by_name) {
                already_intended = true;
                return deep_merge(pending, item).0;
            }
            match items(deployed).iter().find(by_name) {
                Some(current) => {
                    let mut base = current.clone();
                    strip_deployment_fields(&mut base);
                    deep_merge(&base, item).0
                }
                None => item.clone(),
            }
        })
        .collect();

    let operation = if already_intended {
        IntentOperation::Update
    } else {
        IntentOperation::Create
    };
    (container(merged), changed, operation)
}

/// Single-item features, including those with nested collections.
fn plan_singleton(desired: &Value, deployed: &Value, intended: &Value) -> Planned {
    let empty = Value::Object(Map::new());
    let want = items(desired).first().unwrap_or(&empty);
    let have = items(deployed).first().unwrap_or(&empty);
    let (_, changed) = deep_merge(have, want);

    let base = payload_base(deployed, intended);
    let base_item = items(&base).first().unwrap_or(&empty);
    let (merged, _) = deep_merge(base_item, want);
    (container(vec![merged]), changed, create_or_update(intended))
}

// ── Feature quirks ───────────────────────────────────────────────────

fn normalize(feature: ApiFeature, container: &mut Value) {
    match feature {
        ApiFeature::IgmpSnoopingGlobalConfig => {
            ensure_mrouters(container, "igmpSnoopingVlanSettings", "igmpSnoopingVlanMrouters");
        }
        ApiFeature::MldSnoopingGlobalConfig => {
            ensure_mrouters(container, "mldSnoopingVlanSettings", "mldSnoopingVlanMrouters");
            strip_blank_querier(container);
        }
        _ => {}
    }
}

/// Every snooping VLAN carries a mrouter container, possibly empty.
fn ensure_mrouters(container: &mut Value, settings: &str, mrouters: &str) {
    let Some(globals) = container.get_mut("items").and_then(Value::as_array_mut) else {
        return;
    };
    for global in globals {
        let Some(vlans) = global
            .get_mut(settings)
            .and_then(|s| s.get_mut("items"))
            .and_then(Value::as_array_mut)
        else {
            continue;
        };
        for vlan in vlans.iter_mut().filter_map(Value::as_object_mut) {
            vlan.entry(mrouters.to_owned()).or_insert_with(|| {
                let mut shell = Map::new();
                shell.insert("configType".into(), Value::String("SET".into()));
                shell.insert("items".into(), Value::Array(Vec::new()));
                Value::Object(shell)
            });
        }
    }
}

/// The controller rejects an empty querier address while the querier is off.
fn strip_blank_querier(value: &mut Value) {
    match value {
        Value::Object(obj) => {
            let querier_off = obj.get("isQuerierEnabled") != Some(&Value::Bool(true));
            let blank = obj
                .get("querierAddress")
                .and_then(Value::as_str)
                .is_some_and(|a| a.trim().is_empty());
            if querier_off && blank {
                obj.remove("querierAddress");
            }
            obj.values_mut().for_each(strip_blank_querier);
        }
        Value::Array(list) => list.iter_mut().for_each(strip_blank_querier),
        _ => {}
    }
}
