// ── Parameter mapper ──
//
// Turns validated declared bodies into controller wire containers. One
// generic engine walks the `schema` tables; port configuration fans each
// interface out across the nine interface features.

pub mod schema;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{ApiFeature, Feature, Layer2Document};

use schema::{INTERFACE_BLOCKS, InputShape, ItemSchema, ListShape, MappingSchema, NestedList, Transform};

/// Wire containers keyed by API feature, in emission order.
pub type WireState = IndexMap<ApiFeature, Value>;

/// Empty top-level container.
pub fn output_structure() -> Value {
    container(Vec::new())
}

fn container(items: Vec<Value>) -> Value {
    let mut shell = Map::new();
    shell.insert("items".into(), Value::Array(items));
    Value::Object(shell)
}

fn nested_container(config_type: &str, items: Vec<Value>) -> Value {
    let mut shell = Map::new();
    shell.insert("configType".into(), Value::String(config_type.to_owned()));
    shell.insert("items".into(), Value::Array(items));
    Value::Object(shell)
}

/// Schema for every feature except port configuration.
pub fn schema_for(feature: Feature) -> Option<&'static MappingSchema> {
    Some(match feature {
        Feature::Vlans => &schema::VLAN,
        Feature::Cdp => &schema::CDP,
        Feature::Lldp => &schema::LLDP,
        Feature::Stp => &schema::STP,
        Feature::Vtp => &schema::VTP,
        Feature::DhcpSnooping => &schema::DHCP_SNOOPING,
        Feature::IgmpSnooping => &schema::IGMP_SNOOPING,
        Feature::MldSnooping => &schema::MLD_SNOOPING,
        Feature::Authentication => &schema::AUTHENTICATION,
        Feature::LogicalPorts => &schema::LOGICAL_PORTS,
        Feature::PortConfiguration => return None,
    })
}

/// Map every feature of a validated document.
pub fn map_document(doc: &Layer2Document) -> Result<WireState, CoreError> {
    let mut wire = WireState::new();
    for (feature, body) in doc.iter() {
        for (api_feature, container) in map_feature(feature, body)? {
            wire.insert(api_feature, container);
        }
    }
    Ok(wire)
}

/// Map one declared feature body to its wire container(s).
pub fn map_feature(feature: Feature, body: &Value) -> Result<WireState, CoreError> {
    let mut wire = WireState::new();
    let Some(schema) = schema_for(feature) else {
        return map_port_configuration(body);
    };

    let items = match schema.input {
        InputShape::List => body
            .as_array()
            .ok_or_else(|| mapping_error(feature, "expected a list body"))?
            .iter()
            .map(|entry| map_entry(feature, schema.item, entry))
            .collect::<Result<Vec<_>, _>>()?,
        InputShape::Scalar => vec![map_entry(feature, schema.item, body)?],
    };
    debug!(feature = %feature, api_feature = %schema.api_feature, items = items.len(), "mapped");
    wire.insert(schema.api_feature, container(items));
    Ok(wire)
}

fn mapping_error(feature: Feature, detail: impl Into<String>) -> CoreError {
    CoreError::Mapping {
        feature: feature.to_string(),
        detail: detail.into(),
    }
}

fn map_entry(feature: Feature, schema: &ItemSchema, entry: &Value) -> Result<Value, CoreError> {
    let input = entry
        .as_object()
        .ok_or_else(|| mapping_error(feature, format!("expected a mapping, got {entry}")))?;
    map_item(schema, input).map(Value::Object).map_err(|d| mapping_error(feature, d))
}

// ── Generic item engine ──────────────────────────────────────────────

/// Build one wire item from a declared mapping.
pub(crate) fn map_item(schema: &ItemSchema, input: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    let mut item = Map::new();
    item.insert("configType".into(), Value::String(schema.config_type.to_owned()));
    fill_item(schema, input, &mut item)?;
    Ok(item)
}

fn fill_item(
    schema: &ItemSchema,
    input: &Map<String, Value>,
    item: &mut Map<String, Value>,
) -> Result<(), String> {
    for param in schema.params {
        let Some(value) = input.get(param.from).filter(|v| !v.is_null()) else {
            continue;
        };
        let value = apply_transform(param.transform, value)
            .ok_or_else(|| format!("cannot transform '{}' value {value}", param.from))?;
        place(item, param.to, value, schema.objects);
    }

    for list in schema.lists {
        if let Some(nested) = map_nested_list(list, input)? {
            item.insert(list.to.to_owned(), nested);
        }
    }
    Ok(())
}

/// Insert `value` at a dotted path, creating tagged nested objects.
fn place(item: &mut Map<String, Value>, path: &str, value: Value, objects: &[(&str, &str)]) {
    match path.split_once('.') {
        None => {
            item.insert(path.to_owned(), value);
        }
        Some((head, rest)) => {
            let slot = item.entry(head.to_owned()).or_insert_with(|| {
                let mut obj = Map::new();
                if let Some((_, config_type)) = objects.iter().find(|(key, _)| *key == head) {
                    obj.insert("configType".into(), Value::String((*config_type).to_owned()));
                }
                Value::Object(obj)
            });
            if let Value::Object(obj) = slot {
                place(obj, rest, value, objects);
            }
        }
    }
}

fn apply_transform(transform: Transform, value: &Value) -> Option<Value> {
    let flag = |on: &str, off: &str| {
        value
            .as_bool()
            .map(|b| Value::String(if b { on } else { off }.to_owned()))
    };
    match transform {
        Transform::Pass => Some(value.clone()),
        Transform::UpDown => flag("UP", "DOWN"),
        Transform::EnableDisable => flag("ENABLE", "DISABLE"),
        Transform::VlanList => {
            let ids = value
                .as_array()?
                .iter()
                .map(|v| v.as_i64().map(|n| n.to_string()))
                .collect::<Option<Vec<_>>>()?;
            Some(Value::String(ids.join(",")))
        }
    }
}

fn map_nested_list(list: &NestedList, input: &Map<String, Value>) -> Result<Option<Value>, String> {
    let Some(entries) = input.get(list.from).and_then(Value::as_array) else {
        return Ok(list
            .always
            .then(|| nested_container(list.container, Vec::new())));
    };

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let item = match list.shape {
            ListShape::Strings { config_type, key } => {
                let name = entry
                    .as_str()
                    .ok_or_else(|| format!("'{}' entries must be strings", list.from))?;
                let mut item = Map::new();
                item.insert("configType".into(), Value::String(config_type.to_owned()));
                item.insert(key.to_owned(), Value::String(name.to_owned()));
                item
            }
            ListShape::Dicts(schema) => map_item(schema, as_map(list.from, entry)?)?,
            ListShape::Tagged {
                discriminator,
                variants,
            } => {
                let entry = as_map(list.from, entry)?;
                let tag = entry
                    .get(discriminator)
                    .and_then(Value::as_str)
                    .map(str::to_uppercase)
                    .ok_or_else(|| format!("'{}' entry lacks '{discriminator}'", list.from))?;
                let (_, schema) = variants
                    .iter()
                    .find(|(name, _)| *name == tag)
                    .ok_or_else(|| format!("unsupported {discriminator} '{tag}'"))?;
                map_item(schema, entry)?
            }
        };
        items.push(Value::Object(item));
    }
    Ok(Some(nested_container(list.container, items)))
}

fn as_map<'a>(field: &str, entry: &'a Value) -> Result<&'a Map<String, Value>, String> {
    entry
        .as_object()
        .ok_or_else(|| format!("'{field}' entries must be mappings"))
}

// ── Port configuration ───────────────────────────────────────────────

/// Fan each interface out into the interface feature containers.
///
/// Containers appear in the fixed interface-feature order and only when
/// at least one interface configures that aspect.
fn map_port_configuration(body: &Value) -> Result<WireState, CoreError> {
    let feature = Feature::PortConfiguration;
    let ports = body
        .as_array()
        .ok_or_else(|| mapping_error(feature, "expected a list body"))?;

    let mut per_feature: Vec<Vec<Value>> = vec![Vec::new(); INTERFACE_BLOCKS.len()];
    for port in ports {
        let port = port
            .as_object()
            .ok_or_else(|| mapping_error(feature, "interface entries must be mappings"))?;
        let name = port
            .get("interface_name")
            .and_then(Value::as_str)
            .ok_or_else(|| mapping_error(feature, "interface entry lacks interface_name"))?;

        for (slot, (block, _, schema)) in INTERFACE_BLOCKS.iter().enumerate() {
            let Some(input) = port.get(*block).and_then(Value::as_object) else {
                continue;
            };
            let mut item = Map::new();
            item.insert("configType".into(), Value::String(schema.config_type.to_owned()));
            item.insert("interfaceName".into(), Value::String(name.to_owned()));
            fill_item(schema, input, &mut item).map_err(|d| mapping_error(feature, d))?;
            per_feature[slot].push(Value::Object(item));
        }
    }

    let mut wire = WireState::new();
    for ((_, api_feature, _), items) in INTERFACE_BLOCKS.iter().zip(per_feature) {
        if !items.is_empty() {
            debug!(api_feature = %api_feature, interfaces = items.len(), "mapped interfaces");
            wire.insert(*api_feature, container(items));
        }
    }
    Ok(wire)
}
