// ── Schema validator ──
//
// Walks a raw desired-state document against the declared rule tables and
// returns a `Layer2Document` whose values are coerced to their declared
// kinds (numeric strings become integers, string enums are upper-cased).
// The first violation stops validation.

mod cross;
pub mod rules;

use std::str::FromStr;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Feature, Layer2Document, StateTag};

use rules::{FieldRule, Kind};

const ROOT_BLOCK: &str = "layer2_configuration";

/// Validate a `layer2_configuration` mapping.
pub fn validate(document: &Value, state: StateTag) -> Result<Layer2Document, CoreError> {
    let Some(map) = document.as_object() else {
        return Err(CoreError::validation(
            ROOT_BLOCK,
            ROOT_BLOCK,
            document,
            Kind::Dict,
            "expected a mapping of feature names to configuration",
        ));
    };
    if map.is_empty() {
        return Err(CoreError::validation(
            ROOT_BLOCK,
            ROOT_BLOCK,
            document,
            Kind::Dict,
            "at least one feature must be provided",
        ));
    }

    let mut validated = Layer2Document::default();
    for (key, body) in map {
        let feature = Feature::from_str(key).map_err(|_| {
            CoreError::validation(
                ROOT_BLOCK,
                key,
                body,
                "feature",
                format!("unknown feature; expected one of: {}", feature_names()),
            )
        })?;
        let body = validate_feature(feature, body)?;
        debug!(feature = %feature, "feature validated");
        validated.insert(feature, body);
    }

    cross::check(&validated, state)?;
    Ok(validated)
}

fn feature_names() -> String {
    use strum::IntoEnumIterator;
    Feature::iter()
        .map(|f| f.as_ref().to_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

fn feature_rules(feature: Feature) -> &'static [FieldRule] {
    match feature {
        Feature::Vlans => rules::VLAN,
        Feature::Cdp => rules::CDP,
        Feature::Lldp => rules::LLDP,
        Feature::Stp => rules::STP,
        Feature::Vtp => rules::VTP,
        Feature::DhcpSnooping => rules::DHCP_SNOOPING,
        Feature::IgmpSnooping => rules::IGMP_SNOOPING,
        Feature::MldSnooping => rules::MLD_SNOOPING,
        Feature::Authentication => rules::AUTHENTICATION,
        Feature::LogicalPorts => rules::LOGICAL_PORTS,
        Feature::PortConfiguration => rules::PORT_CONFIGURATION,
    }
}

fn validate_feature(feature: Feature, body: &Value) -> Result<Value, CoreError> {
    let block = feature.as_ref();
    let rules = feature_rules(feature);

    if feature.is_list() {
        let Some(entries) = body.as_array() else {
            return Err(CoreError::validation(
                block,
                block,
                body,
                Kind::List,
                "expected a list of entries",
            ));
        };
        let entries = entries
            .iter()
            .map(|entry| check_block(block, entry, rules).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Value::Array(entries));
    }

    // `cdp:` with no body is a valid request in `deleted` state.
    if body.is_null() {
        return Ok(Value::Object(Map::new()));
    }

    let mut map = check_block(block, body, rules)?;
    if feature == Feature::LogicalPorts {
        validate_port_channels(&mut map)?;
    }
    Ok(Value::Object(map))
}

// ── Block walking ────────────────────────────────────────────────────

/// Validate one mapping against a rule table.
pub(crate) fn check_block(
    block: &str,
    value: &Value,
    rules: &'static [FieldRule],
) -> Result<Map<String, Value>, CoreError> {
    let Some(input) = value.as_object() else {
        return Err(CoreError::validation(
            block,
            block,
            value,
            Kind::Dict,
            "expected a mapping",
        ));
    };

    if let Some((key, v)) = input
        .iter()
        .find(|(key, _)| !rules.iter().any(|r| r.name == key.as_str()))
    {
        let known: Vec<_> = rules.iter().map(|r| r.name).collect();
        return Err(CoreError::validation(
            block,
            key,
            v,
            "known parameter",
            format!("unknown parameter; expected one of: {}", known.join(", ")),
        ));
    }

    let mut out = Map::new();
    for rule in rules {
        match input.get(rule.name) {
            None | Some(Value::Null) => {
                if rule.required {
                    return Err(CoreError::validation(
                        block,
                        rule.name,
                        "null",
                        rule.kind,
                        "parameter is required",
                    ));
                }
            }
            Some(v) => {
                out.insert(rule.name.to_owned(), check_field(block, rule, v)?);
            }
        }
    }
    Ok(out)
}

fn check_field(block: &str, rule: &FieldRule, value: &Value) -> Result<Value, CoreError> {
    match rule.kind {
        Kind::Bool => coerce_scalar(block, rule.name, Kind::Bool, value),
        Kind::Int => {
            let v = coerce_scalar(block, rule.name, Kind::Int, value)?;
            check_int(block, rule.name, rule.range, rule.multiple_of, rule.int_choices, &v)?;
            Ok(v)
        }
        Kind::Str => {
            let v = coerce_scalar(block, rule.name, Kind::Str, value)?;
            check_str(block, rule.name, rule.length, rule.choices, v)
        }
        Kind::Dict => {
            let nested = rule.nested.unwrap_or(&[]);
            check_block(&format!("{block}.{}", rule.name), value, nested).map(Value::Object)
        }
        Kind::List => check_list(block, rule, value),
    }
}

fn check_list(block: &str, rule: &FieldRule, value: &Value) -> Result<Value, CoreError> {
    let Some(elems) = value.as_array() else {
        return Err(CoreError::validation(
            block,
            rule.name,
            value,
            Kind::List,
            "expected a list",
        ));
    };
    if let Some(max) = rule.max_items.filter(|max| elems.len() > *max) {
        return Err(CoreError::validation(
            block,
            rule.name,
            value,
            Kind::List,
            format!("at most {max} entries are allowed"),
        ));
    }

    let nested_block = format!("{block}.{}", rule.name);
    let mut out = Vec::with_capacity(elems.len());
    for elem in elems {
        let checked = match (rule.nested, rule.elem) {
            (Some(nested), _) => Value::Object(check_block(&nested_block, elem, nested)?),
            (None, Some(Kind::Dict)) => {
                if !elem.is_object() {
                    return Err(CoreError::validation(
                        &nested_block,
                        rule.name,
                        elem,
                        Kind::Dict,
                        "list entries must be mappings",
                    ));
                }
                elem.clone()
            }
            (None, Some(Kind::Int)) => {
                let v = coerce_scalar(block, rule.name, Kind::Int, elem)?;
                check_int(block, rule.name, rule.elem_range, None, &[], &v)?;
                v
            }
            (None, Some(Kind::Str)) => {
                let v = coerce_scalar(block, rule.name, Kind::Str, elem)?;
                check_str(block, rule.name, None, rule.choices, v)?
            }
            (None, Some(kind)) => coerce_scalar(block, rule.name, kind, elem)?,
            (None, None) => elem.clone(),
        };
        out.push(checked);
    }
    Ok(Value::Array(out))
}

// ── Scalars ──────────────────────────────────────────────────────────

/// Coerce a scalar to its declared kind.
///
/// Numeric strings are accepted as integers; booleans never are.
fn coerce_scalar(block: &str, field: &str, kind: Kind, value: &Value) -> Result<Value, CoreError> {
    let bad = |reason: &str| CoreError::validation(block, field, value, kind, reason);
    match (kind, value) {
        (Kind::Bool, Value::Bool(_))
        | (Kind::Str, Value::String(_))
        | (Kind::List, Value::Array(_))
        | (Kind::Dict, Value::Object(_)) => Ok(value.clone()),
        (Kind::Int, Value::Bool(_)) => Err(bad("a boolean is not an integer")),
        (Kind::Int, Value::Number(n)) => n
            .as_i64()
            .map(Value::from)
            .ok_or_else(|| bad("expected a whole number")),
        (Kind::Int, Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| bad("expected an integer")),
        (Kind::Str, Value::Number(n)) => Ok(Value::String(n.to_string())),
        _ => Err(bad(&format!("expected a {kind}"))),
    }
}

fn check_int(
    block: &str,
    field: &str,
    range: Option<(i64, i64)>,
    multiple_of: Option<i64>,
    choices: &[i64],
    value: &Value,
) -> Result<(), CoreError> {
    let Some(n) = value.as_i64() else {
        return Ok(());
    };
    let bad = |reason: String| CoreError::validation(block, field, n, Kind::Int, reason);
    if let Some((min, max)) = range.filter(|(min, max)| !(*min..=*max).contains(&n)) {
        return Err(bad(format!("must be between {min} and {max}")));
    }
    if let Some(step) = multiple_of.filter(|step| n % step != 0) {
        return Err(bad(format!("must be a multiple of {step}")));
    }
    if !choices.is_empty() && !choices.contains(&n) {
        let allowed: Vec<_> = choices.iter().map(ToString::to_string).collect();
        return Err(bad(format!("must be one of: {}", allowed.join(", "))));
    }
    Ok(())
}

/// Length and choice checks; enum values come back upper-cased.
fn check_str(
    block: &str,
    field: &str,
    length: Option<(usize, usize)>,
    choices: &[&str],
    value: Value,
) -> Result<Value, CoreError> {
    let Value::String(s) = value else {
        return Ok(value);
    };
    let bad = |reason: String| CoreError::validation(block, field, &s, Kind::Str, reason);

    if let Some((min, max)) = length {
        let len = s.chars().count();
        if len < min || len > max {
            return Err(bad(format!("length must be between {min} and {max}")));
        }
    }
    if choices.is_empty() {
        return Ok(Value::String(s));
    }
    let upper = s.to_uppercase();
    if choices.iter().any(|c| c.eq_ignore_ascii_case(&upper)) {
        Ok(Value::String(upper))
    } else {
        Err(bad(format!("must be one of: {}", choices.join(", "))))
    }
}

// ── Port-channel members ─────────────────────────────────────────────

fn member_rules(protocol: &str) -> (&'static [FieldRule], usize) {
    match protocol {
        "LACP" => (rules::LACP_MEMBER, rules::MAX_LACP_MEMBERS),
        "PAGP" => (rules::PAGP_MEMBER, rules::MAX_MEMBERS),
        _ => (rules::STATIC_MEMBER, rules::MAX_MEMBERS),
    }
}

/// Parse `Port-channel<N>` and return `N`.
pub(crate) fn port_channel_number(name: &str) -> Option<u32> {
    name.strip_prefix("Port-channel")?.parse().ok()
}

fn validate_port_channels(map: &mut Map<String, Value>) -> Result<(), CoreError> {
    const BLOCK: &str = "logical_ports.port_channels";

    let Some(Value::Array(channels)) = map.get_mut("port_channels") else {
        return Ok(());
    };
    for channel in channels.iter_mut().filter_map(Value::as_object_mut) {
        let name = channel
            .get("port_channel_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        if !port_channel_number(&name).is_some_and(|n| (1..=128).contains(&n)) {
            return Err(CoreError::validation(
                BLOCK,
                "port_channel_name",
                &name,
                Kind::Str,
                "must be of the form Port-channel<1-128>",
            ));
        }

        let protocol = channel
            .get("port_channel_protocol")
            .and_then(Value::as_str)
            .unwrap_or("NONE")
            .to_owned();
        let (member_table, max_members) = member_rules(&protocol);

        let Some(Value::Array(members)) = channel.get_mut("port_channel_members") else {
            continue;
        };
        if members.len() > max_members {
            return Err(CoreError::validation(
                BLOCK,
                "port_channel_members",
                members.len(),
                Kind::List,
                format!("{protocol} port-channels allow at most {max_members} members"),
            ));
        }
        let member_block = format!("{BLOCK}.{name}.port_channel_members");
        for member in members.iter_mut() {
            *member = Value::Object(check_block(&member_block, member, member_table)?);
        }
    }
    Ok(())
}
