// Cross-field and cross-collection checks, run after every block has
// passed its rule table.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::CoreError;
use crate::model::{Feature, Layer2Document, StateTag};

/// VLAN ids a VTP server or client cannot carry.
const EXTENDED_VLANS: std::ops::RangeInclusive<i64> = 1006..=4094;

pub(super) fn check(doc: &Layer2Document, state: StateTag) -> Result<(), CoreError> {
    unique_keys(doc)?;
    if state == StateTag::Deleted {
        return Ok(());
    }
    dhcp_proxy_bridge_subset(doc)?;
    vtp_extended_vlans(doc)?;
    snooping_queriers(doc, Feature::IgmpSnooping, "igmp")?;
    snooping_queriers(doc, Feature::MldSnooping, "mld")?;
    trunk_dtp_mode(doc)?;
    stp_interface_vlan_sets(doc)?;
    Ok(())
}

fn entries<'a>(body: &'a Value, field: &str) -> &'a [Value] {
    body.get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn int_list(body: &Value, field: &str) -> Vec<i64> {
    entries(body, field).iter().filter_map(Value::as_i64).collect()
}

/// First value seen twice, compared by its JSON text.
fn first_duplicate<'a>(values: impl Iterator<Item = &'a Value>) -> Option<&'a Value> {
    let mut seen = HashSet::new();
    values.into_iter().find(|v| !seen.insert(v.to_string()))
}

fn duplicate_error(block: &str, field: &str, value: &Value) -> CoreError {
    CoreError::validation(block, field, value, "unique key", "duplicate entry")
}

// ── Natural keys ─────────────────────────────────────────────────────

fn unique_keys(doc: &Layer2Document) -> Result<(), CoreError> {
    if let Some(vlans) = doc.get(Feature::Vlans).and_then(Value::as_array) {
        if let Some(dup) = first_duplicate(vlans.iter().filter_map(|v| v.get("vlan_id"))) {
            return Err(duplicate_error("vlans", "vlan_id", dup));
        }
    }

    if let Some(ports) = doc.get(Feature::PortConfiguration).and_then(Value::as_array) {
        if let Some(dup) = first_duplicate(ports.iter().filter_map(|p| p.get("interface_name"))) {
            return Err(duplicate_error("port_configuration", "interface_name", dup));
        }
    }

    if let Some(stp) = doc.get(Feature::Stp) {
        let ids = entries(stp, "stp_instances")
            .iter()
            .filter_map(|i| i.get("stp_instance_vlan_id"));
        if let Some(dup) = first_duplicate(ids) {
            return Err(duplicate_error("stp.stp_instances", "stp_instance_vlan_id", dup));
        }
    }

    for (feature, list, key) in [
        (Feature::IgmpSnooping, "igmp_snooping_vlans", "igmp_snooping_vlan_id"),
        (Feature::MldSnooping, "mld_snooping_vlans", "mld_snooping_vlan_id"),
    ] {
        if let Some(body) = doc.get(feature) {
            let ids = entries(body, list).iter().filter_map(|v| v.get(key));
            if let Some(dup) = first_duplicate(ids) {
                return Err(duplicate_error(&format!("{feature}.{list}"), key, dup));
            }
        }
    }

    if let Some(lp) = doc.get(Feature::LogicalPorts) {
        let channels = entries(lp, "port_channels");
        let names = channels.iter().filter_map(|c| c.get("port_channel_name"));
        if let Some(dup) = first_duplicate(names) {
            return Err(duplicate_error(
                "logical_ports.port_channels",
                "port_channel_name",
                dup,
            ));
        }
        // An interface can belong to one channel only.
        let members = channels
            .iter()
            .flat_map(|c| entries(c, "port_channel_members"))
            .filter_map(|m| m.get("port_channel_interface_name"));
        if let Some(dup) = first_duplicate(members) {
            return Err(duplicate_error(
                "logical_ports.port_channels.port_channel_members",
                "port_channel_interface_name",
                dup,
            ));
        }
    }
    Ok(())
}

// ── Feature relationships ────────────────────────────────────────────

fn dhcp_proxy_bridge_subset(doc: &Layer2Document) -> Result<(), CoreError> {
    let Some(dhcp) = doc.get(Feature::DhcpSnooping) else {
        return Ok(());
    };
    let snooping: HashSet<i64> = int_list(dhcp, "dhcp_snooping_vlans").into_iter().collect();
    let stray: Vec<String> = int_list(dhcp, "dhcp_snooping_proxy_bridge_vlans")
        .into_iter()
        .filter(|v| !snooping.contains(v))
        .map(|v| v.to_string())
        .collect();
    if stray.is_empty() {
        return Ok(());
    }
    Err(CoreError::validation(
        "dhcp_snooping",
        "dhcp_snooping_proxy_bridge_vlans",
        stray.join(","),
        "list",
        "proxy-bridge VLANs must also be listed in dhcp_snooping_vlans",
    ))
}

fn vtp_extended_vlans(doc: &Layer2Document) -> Result<(), CoreError> {
    let mode = doc
        .get(Feature::Vtp)
        .and_then(|v| v.get("vtp_mode"))
        .and_then(Value::as_str);
    if !matches!(mode, Some("SERVER" | "CLIENT")) {
        return Ok(());
    }
    let Some(vlans) = doc.get(Feature::Vlans).and_then(Value::as_array) else {
        return Ok(());
    };
    let extended = vlans
        .iter()
        .filter_map(|v| v.get("vlan_id").and_then(Value::as_i64))
        .find(|id| EXTENDED_VLANS.contains(id));
    match (extended, mode) {
        (Some(id), Some(mode)) => Err(CoreError::validation(
            "vlans",
            "vlan_id",
            id,
            "integer",
            format!("extended VLANs (1006-4094) cannot be configured while VTP mode is {mode}"),
        )),
        _ => Ok(()),
    }
}

/// A per-VLAN querier needs the global querier enabled.
fn snooping_queriers(doc: &Layer2Document, feature: Feature, prefix: &str) -> Result<(), CoreError> {
    let Some(body) = doc.get(feature) else {
        return Ok(());
    };
    let querier_field = format!("{prefix}_snooping_querier");
    let global = body.get(&querier_field).and_then(Value::as_bool);
    if global == Some(true) {
        return Ok(());
    }
    let list = format!("{prefix}_snooping_vlans");
    let id_field = format!("{prefix}_snooping_vlan_id");
    let offending = entries(body, &list).iter().find(|v| {
        v.get(&querier_field).and_then(Value::as_bool) == Some(true)
    });
    match offending {
        Some(vlan) => Err(CoreError::validation(
            format!("{feature}.{list}"),
            querier_field.clone(),
            vlan.get(&id_field).cloned().unwrap_or(Value::Null),
            "boolean",
            format!("a per-VLAN querier requires {querier_field} to be enabled globally"),
        )),
        None => Ok(()),
    }
}

fn trunk_dtp_mode(doc: &Layer2Document) -> Result<(), CoreError> {
    let Some(ports) = doc.get(Feature::PortConfiguration).and_then(Value::as_array) else {
        return Ok(());
    };
    for port in ports {
        let dtp = port
            .get("vlan_trunking_interface_config")
            .and_then(|t| t.get("enable_dtp_negotiation"));
        let Some(dtp) = dtp else { continue };
        let mode = port
            .get("switchport_interface_config")
            .and_then(|s| s.get("switchport_mode"))
            .and_then(Value::as_str);
        if mode != Some("TRUNK") {
            let name = port
                .get("interface_name")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Err(CoreError::validation(
                format!("port_configuration.{name}.vlan_trunking_interface_config"),
                "enable_dtp_negotiation",
                dtp,
                "boolean",
                "DTP negotiation requires switchport_mode TRUNK on the same interface",
            ));
        }
    }
    Ok(())
}

/// Per-VLAN cost/priority entries must name valid VLANs, each at most once.
fn stp_interface_vlan_sets(doc: &Layer2Document) -> Result<(), CoreError> {
    let Some(ports) = doc.get(Feature::PortConfiguration).and_then(Value::as_array) else {
        return Ok(());
    };
    for port in ports {
        let Some(stp) = port.get("stp_interface_config") else {
            continue;
        };
        let name = port
            .get("interface_name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        for list in ["stp_interface_per_vlan_cost", "stp_interface_per_vlan_priority"] {
            let block = format!("port_configuration.{name}.stp_interface_config.{list}");
            let mut seen = HashSet::new();
            for id in entries(stp, list)
                .iter()
                .flat_map(|e| int_list(e, "interface_per_vlan_ids"))
            {
                if !(1..=4094).contains(&id) {
                    return Err(CoreError::validation(
                        &block,
                        "interface_per_vlan_ids",
                        id,
                        "integer",
                        "VLAN ids must be between 1 and 4094",
                    ));
                }
                if !seen.insert(id) {
                    return Err(CoreError::validation(
                        &block,
                        "interface_per_vlan_ids",
                        id,
                        "integer",
                        "VLAN appears in more than one entry",
                    ));
                }
            }
        }
    }
    Ok(())
}
