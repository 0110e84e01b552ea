// ── Declared-schema rule tables ──
//
// One table per configuration block. Each entry names a declared field and
// the constraints its value must satisfy; `validate::check_block` walks a
// table against an input mapping.

use std::fmt;

/// Expected JSON kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int,
    Str,
    List,
    Dict,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Str => "string",
            Self::List => "list",
            Self::Dict => "dict",
        })
    }
}

/// Constraints for one declared field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
    pub range: Option<(i64, i64)>,
    pub multiple_of: Option<i64>,
    pub length: Option<(usize, usize)>,
    /// Allowed string values, compared upper-cased.
    pub choices: &'static [&'static str],
    pub int_choices: &'static [i64],
    pub elem: Option<Kind>,
    pub elem_range: Option<(i64, i64)>,
    pub max_items: Option<usize>,
    /// Rule table for dict values or list-of-dict elements.
    pub nested: Option<&'static [FieldRule]>,
}

impl FieldRule {
    const fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            required: false,
            range: None,
            multiple_of: None,
            length: None,
            choices: &[],
            int_choices: &[],
            elem: None,
            elem_range: None,
            max_items: None,
            nested: None,
        }
    }

    pub const fn bool(name: &'static str) -> Self {
        Self::new(name, Kind::Bool)
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, Kind::Int)
    }

    pub const fn str(name: &'static str) -> Self {
        Self::new(name, Kind::Str)
    }

    pub const fn list(name: &'static str) -> Self {
        Self::new(name, Kind::List)
    }

    pub const fn dict(name: &'static str, nested: &'static [FieldRule]) -> Self {
        let mut rule = Self::new(name, Kind::Dict);
        rule.nested = Some(nested);
        rule
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self
    }

    pub const fn multiple_of(mut self, n: i64) -> Self {
        self.multiple_of = Some(n);
        self
    }

    pub const fn length(mut self, min: usize, max: usize) -> Self {
        self.length = Some((min, max));
        self
    }

    pub const fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    pub const fn int_choices(mut self, choices: &'static [i64]) -> Self {
        self.int_choices = choices;
        self
    }

    pub const fn elems(mut self, kind: Kind) -> Self {
        self.elem = Some(kind);
        self
    }

    pub const fn elem_range(mut self, min: i64, max: i64) -> Self {
        self.elem = Some(Kind::Int);
        self.elem_range = Some((min, max));
        self
    }

    pub const fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub const fn of_dicts(mut self, nested: &'static [FieldRule]) -> Self {
        self.elem = Some(Kind::Dict);
        self.nested = Some(nested);
        self
    }
}

// ── Shared choice sets ───────────────────────────────────────────────

const QUERIER_VERSIONS: &[&str] = &["VERSION_1", "VERSION_2", "VERSION_3"];
const MLD_QUERIER_VERSIONS: &[&str] = &["VERSION_1", "VERSION_2"];

pub const MAX_LACP_MEMBERS: usize = 16;
pub const MAX_MEMBERS: usize = 8;

// ── VLANs ────────────────────────────────────────────────────────────

pub const VLAN: &[FieldRule] = &[
    FieldRule::int("vlan_id").required().range(1, 4094),
    FieldRule::str("vlan_name").length(1, 128),
    FieldRule::bool("vlan_admin_status"),
];

// ── CDP / LLDP ───────────────────────────────────────────────────────

pub const CDP: &[FieldRule] = &[
    FieldRule::bool("cdp_admin_status"),
    FieldRule::int("cdp_hold_time").range(10, 255),
    FieldRule::int("cdp_timer").range(5, 254),
    FieldRule::bool("cdp_advertise_v2"),
    FieldRule::bool("cdp_log_duplex_mismatch"),
];

pub const LLDP: &[FieldRule] = &[
    FieldRule::bool("lldp_admin_status"),
    FieldRule::int("lldp_hold_time").range(0, 32767),
    FieldRule::int("lldp_timer").range(5, 32767),
    FieldRule::int("lldp_reinitialization_delay").range(2, 5),
];

// ── STP ──────────────────────────────────────────────────────────────

pub const STP_INSTANCE: &[FieldRule] = &[
    FieldRule::int("stp_instance_vlan_id").required().range(1, 4094),
    FieldRule::int("stp_instance_priority").range(0, 61440).multiple_of(4096),
    FieldRule::bool("enable_stp"),
    FieldRule::int("stp_instance_max_age_timer").range(6, 40),
    FieldRule::int("stp_instance_hello_interval_timer").range(1, 10),
    FieldRule::int("stp_instance_forward_delay_timer").range(4, 30),
];

pub const STP: &[FieldRule] = &[
    FieldRule::str("stp_mode").choices(&["PVST", "RSTP", "MST"]),
    FieldRule::str("stp_portfast_mode").choices(&["ENABLE", "DISABLE", "EDGE", "NETWORK", "TRUNK"]),
    FieldRule::bool("stp_bpdu_guard"),
    FieldRule::bool("stp_bpdu_filter"),
    FieldRule::bool("stp_backbonefast"),
    FieldRule::bool("stp_extended_system_id"),
    FieldRule::bool("stp_logging"),
    FieldRule::bool("stp_loopguard"),
    FieldRule::int("stp_transmit_hold_count").range(1, 20),
    FieldRule::bool("stp_uplinkfast"),
    FieldRule::int("stp_uplinkfast_max_update_rate").range(0, 32000),
    FieldRule::bool("stp_etherchannel_guard"),
    FieldRule::list("stp_instances").of_dicts(STP_INSTANCE),
];

// ── VTP ──────────────────────────────────────────────────────────────

pub const VTP: &[FieldRule] = &[
    FieldRule::str("vtp_mode").choices(&["SERVER", "CLIENT", "TRANSPARENT", "OFF"]),
    FieldRule::str("vtp_version").choices(&["VERSION_1", "VERSION_2", "VERSION_3"]),
    FieldRule::str("vtp_domain_name").length(1, 32),
    FieldRule::str("vtp_configuration_file_name").length(1, 244),
    FieldRule::str("vtp_source_interface").length(1, 64),
    FieldRule::bool("vtp_pruning"),
];

// ── DHCP snooping ────────────────────────────────────────────────────

pub const DHCP_SNOOPING: &[FieldRule] = &[
    FieldRule::bool("dhcp_admin_status"),
    FieldRule::list("dhcp_snooping_vlans").elem_range(1, 4094),
    FieldRule::bool("dhcp_snooping_glean"),
    FieldRule::str("dhcp_snooping_database_agent_url").length(5, 227),
    FieldRule::int("dhcp_snooping_database_timeout").range(0, 86400),
    FieldRule::int("dhcp_snooping_database_write_delay").range(15, 86400),
    FieldRule::list("dhcp_snooping_proxy_bridge_vlans").elem_range(1, 4094),
];

// ── IGMP / MLD snooping ──────────────────────────────────────────────

pub const IGMP_SNOOPING_VLAN: &[FieldRule] = &[
    FieldRule::int("igmp_snooping_vlan_id").required().range(1, 4094),
    FieldRule::bool("enable_igmp_snooping_vlan"),
    FieldRule::bool("igmp_snooping_immediate_leave"),
    FieldRule::bool("igmp_snooping_querier"),
    FieldRule::str("igmp_snooping_querier_address"),
    FieldRule::str("igmp_snooping_querier_version").choices(QUERIER_VERSIONS),
    FieldRule::int("igmp_snooping_querier_query_interval").range(1, 18000),
    FieldRule::list("igmp_snooping_mrouter_port_list").elems(Kind::Str),
];

pub const IGMP_SNOOPING: &[FieldRule] = &[
    FieldRule::bool("enable_igmp_snooping"),
    FieldRule::bool("igmp_snooping_querier"),
    FieldRule::str("igmp_snooping_querier_address"),
    FieldRule::str("igmp_snooping_querier_version").choices(QUERIER_VERSIONS),
    FieldRule::int("igmp_snooping_querier_query_interval").range(1, 18000),
    FieldRule::list("igmp_snooping_vlans").of_dicts(IGMP_SNOOPING_VLAN),
];

pub const MLD_SNOOPING_VLAN: &[FieldRule] = &[
    FieldRule::int("mld_snooping_vlan_id").required().range(1, 4094),
    FieldRule::bool("enable_mld_snooping_vlan"),
    FieldRule::bool("mld_snooping_immediate_leave"),
    FieldRule::bool("mld_snooping_querier"),
    FieldRule::str("mld_snooping_querier_address"),
    FieldRule::str("mld_snooping_querier_version").choices(MLD_QUERIER_VERSIONS),
    FieldRule::int("mld_snooping_querier_query_interval").range(1, 18000),
    FieldRule::list("mld_snooping_mrouter_port_list").elems(Kind::Str),
];

pub const MLD_SNOOPING: &[FieldRule] = &[
    FieldRule::bool("enable_mld_snooping"),
    FieldRule::bool("mld_snooping_querier"),
    FieldRule::str("mld_snooping_querier_address"),
    FieldRule::str("mld_snooping_querier_version").choices(MLD_QUERIER_VERSIONS),
    FieldRule::int("mld_snooping_querier_query_interval").range(1, 18000),
    FieldRule::bool("mld_snooping_listener"),
    FieldRule::list("mld_snooping_vlans").of_dicts(MLD_SNOOPING_VLAN),
];

// ── Authentication ───────────────────────────────────────────────────

pub const AUTHENTICATION: &[FieldRule] = &[
    FieldRule::bool("enable_dot1x_authentication"),
    FieldRule::str("authentication_config_mode").choices(&["LEGACY", "NEW_STYLE"]),
];

// ── Logical ports ────────────────────────────────────────────────────

pub const LACP_MEMBER: &[FieldRule] = &[
    FieldRule::str("port_channel_interface_name").required().length(1, 64),
    FieldRule::str("port_channel_mode").choices(&["ACTIVE", "PASSIVE"]),
    FieldRule::int("port_channel_port_priority").range(0, 65535),
    FieldRule::int("port_channel_rate").int_choices(&[1, 30]),
];

pub const PAGP_MEMBER: &[FieldRule] = &[
    FieldRule::str("port_channel_interface_name").required().length(1, 64),
    FieldRule::str("port_channel_mode").choices(&[
        "AUTO",
        "AUTO_NON_SILENT",
        "DESIRABLE",
        "DESIRABLE_NON_SILENT",
    ]),
    FieldRule::int("port_channel_port_priority").range(0, 255),
    FieldRule::str("port_channel_learn_method").choices(&["AGGREGATION_PORT", "PHYSICAL_PORT"]),
];

pub const STATIC_MEMBER: &[FieldRule] = &[
    FieldRule::str("port_channel_interface_name").required().length(1, 64),
    FieldRule::str("port_channel_mode").choices(&["ON"]),
];

/// Members are validated after the protocol is known.
pub const PORT_CHANNEL: &[FieldRule] = &[
    FieldRule::str("port_channel_name").required().length(13, 15),
    FieldRule::str("port_channel_protocol").required().choices(&["LACP", "PAGP", "NONE"]),
    FieldRule::int("port_channel_min_links").range(1, 8),
    FieldRule::list("port_channel_members").elems(Kind::Dict),
];

pub const LOGICAL_PORTS: &[FieldRule] = &[
    FieldRule::bool("port_channel_auto"),
    FieldRule::int("port_channel_lacp_system_priority").range(0, 65535),
    FieldRule::str("port_channel_load_balancing_method").choices(&[
        "SRC_MAC",
        "DST_MAC",
        "SRC_DST_MAC",
        "SRC_IP",
        "DST_IP",
        "SRC_DST_IP",
        "SRC_PORT",
        "DST_PORT",
        "SRC_DST_PORT",
        "SRC_DST_MIXED_IP_PORT",
        "SRC_MIXED_IP_PORT",
        "DST_MIXED_IP_PORT",
        "VLAN_SRC_IP",
        "VLAN_DST_IP",
        "VLAN_SRC_DST_IP",
        "VLAN_SRC_MIXED_IP_PORT",
        "VLAN_DST_MIXED_IP_PORT",
        "VLAN_SRC_DST_MIXED_IP_PORT",
    ]),
    FieldRule::list("port_channels").of_dicts(PORT_CHANNEL),
];

// ── Port configuration ───────────────────────────────────────────────

pub const SWITCHPORT_INTERFACE: &[FieldRule] = &[
    FieldRule::str("switchport_description").length(1, 230),
    FieldRule::str("switchport_mode").choices(&[
        "ACCESS",
        "TRUNK",
        "DYNAMIC_AUTO",
        "DYNAMIC_DESIRABLE",
        "DOT1Q_TUNNEL",
    ]),
    FieldRule::int("access_vlan").range(1, 4094),
    FieldRule::int("voice_vlan").range(1, 4094),
    FieldRule::bool("admin_status"),
];

pub const TRUNK_INTERFACE: &[FieldRule] = &[
    FieldRule::bool("enable_dtp_negotiation"),
    FieldRule::bool("protected"),
    FieldRule::list("pruning_vlan_ids").elem_range(1, 4094),
    FieldRule::list("allowed_vlans").elem_range(1, 4094),
    FieldRule::int("native_vlan_id").range(1, 4094),
];

pub const DOT1X_INTERFACE: &[FieldRule] = &[
    FieldRule::list("dot1x_interface_authentication_order")
        .elems(Kind::Str)
        .choices(&["DOT1X", "MAB", "WEBAUTH"])
        .max_items(3),
    FieldRule::str("dot1x_interface_authentication_mode").choices(&["OPEN", "CLOSED"]),
    FieldRule::str("dot1x_interface_pae_type").choices(&["AUTHENTICATOR", "SUPPLICANT", "BOTH"]),
    FieldRule::str("dot1x_interface_control_direction").choices(&["BOTH", "IN"]),
    FieldRule::str("dot1x_interface_host_mode").choices(&[
        "MULTI_AUTHENTICATION",
        "MULTI_HOST",
        "SINGLE_HOST",
        "MULTI_DOMAIN",
    ]),
    FieldRule::bool("dot1x_interface_enable_inactivity_timer_from_server"),
    FieldRule::int("dot1x_interface_inactivity_timer").range(1, 65535),
    FieldRule::str("dot1x_interface_authentication_port_control").choices(&[
        "AUTO",
        "FORCE_AUTHORIZED",
        "FORCE_UNAUTHORIZED",
    ]),
    FieldRule::bool("dot1x_interface_enable_reauth"),
    FieldRule::int("dot1x_interface_max_reauth_requests").range(1, 10),
    FieldRule::bool("dot1x_interface_enable_reauth_timer_from_server"),
    FieldRule::int("dot1x_interface_reauth_timer").range(1, 1_073_741_823),
    FieldRule::int("dot1x_interface_tx_period").range(1, 65535),
];

pub const MAB_INTERFACE: &[FieldRule] = &[FieldRule::bool("mab_status")];

pub const STP_VLAN_COST: &[FieldRule] = &[
    FieldRule::int("interface_per_vlan_cost").required().range(1, 200_000_000),
    FieldRule::list("interface_per_vlan_ids").required().elems(Kind::Int),
];

pub const STP_VLAN_PRIORITY: &[FieldRule] = &[
    FieldRule::int("interface_per_vlan_priority").required().range(0, 240).multiple_of(16),
    FieldRule::list("interface_per_vlan_ids").required().elems(Kind::Int),
];

pub const STP_INTERFACE: &[FieldRule] = &[
    FieldRule::str("stp_interface_portfast_mode").choices(&[
        "NONE",
        "DISABLE",
        "EDGE",
        "EDGE_TRUNK",
        "NETWORK",
        "TRUNK",
    ]),
    FieldRule::bool("stp_interface_bpdu_filter"),
    FieldRule::bool("stp_interface_bpdu_guard"),
    FieldRule::int("stp_interface_cost").range(1, 200_000_000),
    FieldRule::str("stp_interface_guard").choices(&["LOOP", "ROOT", "NONE"]),
    FieldRule::int("stp_interface_priority").range(0, 240).multiple_of(16),
    FieldRule::list("stp_interface_per_vlan_cost").of_dicts(STP_VLAN_COST),
    FieldRule::list("stp_interface_per_vlan_priority").of_dicts(STP_VLAN_PRIORITY),
];

pub const DHCP_SNOOPING_INTERFACE: &[FieldRule] = &[
    FieldRule::int("dhcp_snooping_interface_rate").range(1, 2048),
    FieldRule::bool("dhcp_snooping_interface_trust"),
];

pub const CDP_INTERFACE: &[FieldRule] = &[
    FieldRule::bool("cdp_interface_admin_status"),
    FieldRule::bool("cdp_interface_log_duplex_mismatch"),
];

pub const LLDP_INTERFACE: &[FieldRule] = &[FieldRule::str("lldp_interface_receive_transmit")
    .choices(&["TRANSMIT_ONLY", "RECEIVE_ONLY", "TRANSMIT_AND_RECEIVE", "DISABLED"])];

pub const VTP_INTERFACE: &[FieldRule] = &[FieldRule::bool("vtp_interface_admin_status")];

pub const PORT_CONFIGURATION: &[FieldRule] = &[
    FieldRule::str("interface_name").required().length(1, 64),
    FieldRule::dict("switchport_interface_config", SWITCHPORT_INTERFACE),
    FieldRule::dict("vlan_trunking_interface_config", TRUNK_INTERFACE),
    FieldRule::dict("dot1x_interface_config", DOT1X_INTERFACE),
    FieldRule::dict("mab_interface_config", MAB_INTERFACE),
    FieldRule::dict("stp_interface_config", STP_INTERFACE),
    FieldRule::dict("dhcp_snooping_interface_config", DHCP_SNOOPING_INTERFACE),
    FieldRule::dict("cdp_interface_config", CDP_INTERFACE),
    FieldRule::dict("lldp_interface_config", LLDP_INTERFACE),
    FieldRule::dict("vtp_interface_config", VTP_INTERFACE),
];
