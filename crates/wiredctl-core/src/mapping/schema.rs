// ── Mapping schemas ──
//
// Declared-name → wire-name tables. The generic mapper in `mapping::mod`
// consumes these; adding a field is a table edit, not an engine change.

use crate::model::ApiFeature;

/// Value rewrite applied while copying a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Pass,
    /// `true`/`false` → `UP`/`DOWN`.
    UpDown,
    /// `true`/`false` → `ENABLE`/`DISABLE`.
    EnableDisable,
    /// `[10, 20]` → `"10,20"`.
    VlanList,
}

/// One declared field and where it lands on the wire.
///
/// `to` may be dotted (`databaseAgent.agentUrl`) to place the value inside
/// a nested object of the item.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub from: &'static str,
    pub to: &'static str,
    pub transform: Transform,
}

const fn p(from: &'static str, to: &'static str) -> Param {
    Param {
        from,
        to,
        transform: Transform::Pass,
    }
}

impl Param {
    const fn up_down(mut self) -> Self {
        self.transform = Transform::UpDown;
        self
    }

    const fn enable_disable(mut self) -> Self {
        self.transform = Transform::EnableDisable;
        self
    }

    const fn vlan_list(mut self) -> Self {
        self.transform = Transform::VlanList;
        self
    }
}

/// How the elements of a nested collection are produced.
#[derive(Debug, Clone, Copy)]
pub enum ListShape {
    /// Each element is a mapping mapped with the given item schema.
    Dicts(&'static ItemSchema),
    /// Each element is a string placed under `key` in a fresh item.
    Strings {
        config_type: &'static str,
        key: &'static str,
    },
    /// Item schema chosen by the upper-cased value of `discriminator`.
    Tagged {
        discriminator: &'static str,
        variants: &'static [(&'static str, &'static ItemSchema)],
    },
}

/// A declared list emitted as a `{configType, items}` container.
#[derive(Debug, Clone, Copy)]
pub struct NestedList {
    pub from: &'static str,
    pub to: &'static str,
    /// `LIST` or `SET`.
    pub container: &'static str,
    pub shape: ListShape,
    /// Emit an empty container when the declared list is absent.
    pub always: bool,
}

/// Shape of one wire item.
#[derive(Debug, Clone, Copy)]
pub struct ItemSchema {
    pub config_type: &'static str,
    pub params: &'static [Param],
    /// `configType` tags for nested objects created by dotted params.
    pub objects: &'static [(&'static str, &'static str)],
    pub lists: &'static [NestedList],
}

/// Whether the declared body is a list of items or a single mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    List,
    Scalar,
}

/// Top-level schema for one user feature.
#[derive(Debug, Clone, Copy)]
pub struct MappingSchema {
    pub api_feature: ApiFeature,
    pub input: InputShape,
    pub item: &'static ItemSchema,
}

/// Flat item: params only, no nested objects or lists.
macro_rules! item {
    ($config_type:expr, [$($param:expr),* $(,)?] $(,)?) => {
        ItemSchema {
            config_type: $config_type,
            params: &[$($param),*],
            objects: &[],
            lists: &[],
        }
    };
}

// ── VLANs ────────────────────────────────────────────────────────────

pub const VLAN: MappingSchema = MappingSchema {
    api_feature: ApiFeature::VlanConfig,
    input: InputShape::List,
    item: &item!(
        "VLAN",
        [
            p("vlan_id", "vlanId"),
            p("vlan_name", "name"),
            p("vlan_admin_status", "isVlanEnabled"),
        ],
    ),
};

// ── Global singletons ────────────────────────────────────────────────

pub const CDP: MappingSchema = MappingSchema {
    api_feature: ApiFeature::CdpGlobalConfig,
    input: InputShape::Scalar,
    item: &item!(
        "CDP_GLOBAL",
        [
            p("cdp_admin_status", "isCdpEnabled"),
            p("cdp_hold_time", "holdTime"),
            p("cdp_timer", "timer"),
            p("cdp_advertise_v2", "isAdvertiseV2Enabled"),
            p("cdp_log_duplex_mismatch", "isLogDuplexMismatchEnabled"),
        ],
    ),
};

pub const LLDP: MappingSchema = MappingSchema {
    api_feature: ApiFeature::LldpGlobalConfig,
    input: InputShape::Scalar,
    item: &item!(
        "LLDP_GLOBAL",
        [
            p("lldp_admin_status", "isLldpEnabled"),
            p("lldp_hold_time", "holdTime"),
            p("lldp_timer", "timer"),
            p("lldp_reinitialization_delay", "reinitializationDelay"),
        ],
    ),
};

pub const VTP: MappingSchema = MappingSchema {
    api_feature: ApiFeature::VtpGlobalConfig,
    input: InputShape::Scalar,
    item: &item!(
        "VTP_GLOBAL",
        [
            p("vtp_mode", "mode"),
            p("vtp_version", "version"),
            p("vtp_domain_name", "domainName"),
            p("vtp_configuration_file_name", "configurationFileName"),
            p("vtp_source_interface", "sourceInterface"),
            p("vtp_pruning", "isPruningEnabled"),
        ],
    ),
};

pub const DHCP_SNOOPING: MappingSchema = MappingSchema {
    api_feature: ApiFeature::DhcpSnoopingGlobalConfig,
    input: InputShape::Scalar,
    item: &ItemSchema {
        config_type: "DHCP_SNOOPING_GLOBAL",
        params: &[
            p("dhcp_admin_status", "isDhcpSnoopingEnabled"),
            p("dhcp_snooping_vlans", "dhcpSnoopingVlans").vlan_list(),
            p("dhcp_snooping_glean", "isGleaningEnabled"),
            p("dhcp_snooping_database_agent_url", "databaseAgent.agentUrl"),
            p("dhcp_snooping_database_timeout", "databaseAgent.timeout"),
            p("dhcp_snooping_database_write_delay", "databaseAgent.writeDelay"),
            p("dhcp_snooping_proxy_bridge_vlans", "proxyBridgeVlans").vlan_list(),
        ],
        objects: &[("databaseAgent", "DHCP_SNOOPING_DATABASE_AGENT")],
        lists: &[],
    },
};

pub const AUTHENTICATION: MappingSchema = MappingSchema {
    api_feature: ApiFeature::Dot1xGlobalConfig,
    input: InputShape::Scalar,
    item: &item!(
        "DOT1X_GLOBAL",
        [
            p("enable_dot1x_authentication", "isDot1xEnabled"),
            p("authentication_config_mode", "authenticationConfigMode"),
        ],
    ),
};

// ── STP ──────────────────────────────────────────────────────────────

const STP_INSTANCE: ItemSchema = ItemSchema {
    config_type: "STP_VLAN",
    params: &[
        p("stp_instance_vlan_id", "vlanId"),
        p("stp_instance_priority", "priority"),
        p("enable_stp", "isStpEnabled"),
        p("stp_instance_max_age_timer", "timers.maxAge"),
        p("stp_instance_hello_interval_timer", "timers.helloInterval"),
        p("stp_instance_forward_delay_timer", "timers.forwardDelay"),
    ],
    objects: &[("timers", "STP_TIMERS")],
    lists: &[],
};

pub const STP: MappingSchema = MappingSchema {
    api_feature: ApiFeature::StpGlobalConfig,
    input: InputShape::Scalar,
    item: &ItemSchema {
        config_type: "STP_GLOBAL",
        params: &[
            p("stp_mode", "stpMode"),
            p("stp_portfast_mode", "portFastMode"),
            p("stp_bpdu_guard", "isBpduGuardEnabled"),
            p("stp_bpdu_filter", "isBpduFilterEnabled"),
            p("stp_backbonefast", "isBackboneFastEnabled"),
            p("stp_extended_system_id", "isExtendedSystemIdEnabled"),
            p("stp_logging", "isLoggingEnabled"),
            p("stp_loopguard", "isLoopGuardEnabled"),
            p("stp_transmit_hold_count", "transmitHoldCount"),
            p("stp_uplinkfast", "isUplinkFastEnabled"),
            p("stp_uplinkfast_max_update_rate", "uplinkFastMaxUpdateRate"),
            p("stp_etherchannel_guard", "isEtherChannelGuardEnabled"),
        ],
        objects: &[],
        lists: &[NestedList {
            from: "stp_instances",
            to: "stpInstances",
            container: "LIST",
            shape: ListShape::Dicts(&STP_INSTANCE),
            always: false,
        }],
    },
};

// ── IGMP / MLD snooping ──────────────────────────────────────────────

const IGMP_SNOOPING_VLAN: ItemSchema = ItemSchema {
    config_type: "IGMP_SNOOPING_VLAN",
    params: &[
        p("igmp_snooping_vlan_id", "vlanId"),
        p("enable_igmp_snooping_vlan", "isIgmpSnoopingEnabled"),
        p("igmp_snooping_immediate_leave", "isImmediateLeaveEnabled"),
        p("igmp_snooping_querier", "isQuerierEnabled"),
        p("igmp_snooping_querier_address", "querierAddress"),
        p("igmp_snooping_querier_version", "querierVersion"),
        p("igmp_snooping_querier_query_interval", "querierQueryInterval"),
    ],
    objects: &[],
    lists: &[NestedList {
        from: "igmp_snooping_mrouter_port_list",
        to: "igmpSnoopingVlanMrouters",
        container: "SET",
        shape: ListShape::Strings {
            config_type: "IGMP_SNOOPING_VLAN_MROUTER",
            key: "interfaceName",
        },
        always: true,
    }],
};

pub const IGMP_SNOOPING: MappingSchema = MappingSchema {
    api_feature: ApiFeature::IgmpSnoopingGlobalConfig,
    input: InputShape::Scalar,
    item: &ItemSchema {
        config_type: "IGMP_SNOOPING_GLOBAL",
        params: &[
            p("enable_igmp_snooping", "isIgmpSnoopingEnabled"),
            p("igmp_snooping_querier", "isQuerierEnabled"),
            p("igmp_snooping_querier_address", "querierAddress"),
            p("igmp_snooping_querier_version", "querierVersion"),
            p("igmp_snooping_querier_query_interval", "querierQueryInterval"),
        ],
        objects: &[],
        lists: &[NestedList {
            from: "igmp_snooping_vlans",
            to: "igmpSnoopingVlanSettings",
            container: "SET",
            shape: ListShape::Dicts(&IGMP_SNOOPING_VLAN),
            always: false,
        }],
    },
};

const MLD_SNOOPING_VLAN: ItemSchema = ItemSchema {
    config_type: "MLD_SNOOPING_VLAN",
    params: &[
        p("mld_snooping_vlan_id", "vlanId"),
        p("enable_mld_snooping_vlan", "isMldSnoopingEnabled"),
        p("mld_snooping_immediate_leave", "isImmediateLeaveEnabled"),
        p("mld_snooping_querier", "isQuerierEnabled"),
        p("mld_snooping_querier_address", "querierAddress"),
        p("mld_snooping_querier_version", "querierVersion"),
        p("mld_snooping_querier_query_interval", "querierQueryInterval"),
    ],
    objects: &[],
    lists: &[NestedList {
        from: "mld_snooping_mrouter_port_list",
        to: "mldSnoopingVlanMrouters",
        container: "SET",
        shape: ListShape::Strings {
            config_type: "MLD_SNOOPING_VLAN_MROUTER",
            key: "interfaceName",
        },
        always: true,
    }],
};

pub const MLD_SNOOPING: MappingSchema = MappingSchema {
    api_feature: ApiFeature::MldSnoopingGlobalConfig,
    input: InputShape::Scalar,
    item: &ItemSchema {
        config_type: "MLD_SNOOPING_GLOBAL",
        params: &[
            p("enable_mld_snooping", "isMldSnoopingEnabled"),
            p("mld_snooping_querier", "isQuerierEnabled"),
            p("mld_snooping_querier_address", "querierAddress"),
            p("mld_snooping_querier_version", "querierVersion"),
            p("mld_snooping_querier_query_interval", "querierQueryInterval"),
            p("mld_snooping_listener", "isSuppressListenerMessagesEnabled"),
        ],
        objects: &[],
        lists: &[NestedList {
            from: "mld_snooping_vlans",
            to: "mldSnoopingVlanSettings",
            container: "SET",
            shape: ListShape::Dicts(&MLD_SNOOPING_VLAN),
            always: false,
        }],
    },
};

// ── Port channels ────────────────────────────────────────────────────

const LACP_MEMBER: ItemSchema = item!(
    "LACP_PORTCHANNEL_MEMBER_PORT_CONFIG",
    [
        p("port_channel_interface_name", "interfaceName"),
        p("port_channel_mode", "mode"),
        p("port_channel_port_priority", "portPriority"),
        p("port_channel_rate", "rate"),
    ],
);

const PAGP_MEMBER: ItemSchema = item!(
    "PAGP_PORTCHANNEL_MEMBER_PORT_CONFIG",
    [
        p("port_channel_interface_name", "interfaceName"),
        p("port_channel_mode", "mode"),
        p("port_channel_port_priority", "portPriority"),
        p("port_channel_learn_method", "learnMethod"),
    ],
);

const STATIC_MEMBER: ItemSchema = item!(
    "ETHERCHANNEL_MEMBER_PORT_CONFIG",
    [
        p("port_channel_interface_name", "interfaceName"),
        p("port_channel_mode", "mode"),
    ],
);

const CHANNEL_PARAMS: &[Param] = &[
    p("port_channel_name", "name"),
    p("port_channel_min_links", "minLinks"),
];

const fn member_ports(members: &'static ItemSchema) -> NestedList {
    NestedList {
        from: "port_channel_members",
        to: "memberPorts",
        container: "SET",
        shape: ListShape::Dicts(members),
        always: false,
    }
}

const LACP_CHANNEL: ItemSchema = ItemSchema {
    config_type: "LACP_PORTCHANNEL_CONFIG",
    params: CHANNEL_PARAMS,
    objects: &[],
    lists: &[member_ports(&LACP_MEMBER)],
};

const PAGP_CHANNEL: ItemSchema = ItemSchema {
    config_type: "PAGP_PORTCHANNEL_CONFIG",
    params: CHANNEL_PARAMS,
    objects: &[],
    lists: &[member_ports(&PAGP_MEMBER)],
};

const STATIC_CHANNEL: ItemSchema = ItemSchema {
    config_type: "ETHERCHANNEL_CONFIG",
    params: CHANNEL_PARAMS,
    objects: &[],
    lists: &[member_ports(&STATIC_MEMBER)],
};

pub const LOGICAL_PORTS: MappingSchema = MappingSchema {
    api_feature: ApiFeature::PortchannelConfig,
    input: InputShape::Scalar,
    item: &ItemSchema {
        config_type: "PORTCHANNEL",
        params: &[
            p("port_channel_auto", "isAutoEnabled"),
            p("port_channel_lacp_system_priority", "lacpSystemPriority"),
            p("port_channel_load_balancing_method", "loadBalancingMethod"),
        ],
        objects: &[],
        lists: &[NestedList {
            from: "port_channels",
            to: "portchannels",
            container: "LIST",
            shape: ListShape::Tagged {
                discriminator: "port_channel_protocol",
                variants: &[
                    ("LACP", &LACP_CHANNEL),
                    ("PAGP", &PAGP_CHANNEL),
                    ("NONE", &STATIC_CHANNEL),
                ],
            },
            always: false,
        }],
    },
};

// ── Interfaces ───────────────────────────────────────────────────────

const STP_VLAN_COST: ItemSchema = item!(
    "STP_INTERFACE_VLAN_COST",
    [
        p("interface_per_vlan_cost", "cost"),
        p("interface_per_vlan_ids", "vlans").vlan_list(),
    ],
);

const STP_VLAN_PRIORITY: ItemSchema = item!(
    "STP_INTERFACE_VLAN_PRIORITY",
    [
        p("interface_per_vlan_priority", "priority"),
        p("interface_per_vlan_ids", "vlans").vlan_list(),
    ],
);

/// Interface blocks in emission order, with the API feature each feeds.
pub const INTERFACE_BLOCKS: &[(&str, ApiFeature, ItemSchema)] = &[
    (
        "switchport_interface_config",
        ApiFeature::SwitchportInterfaceConfig,
        item!(
            "SWITCHPORT_INTERFACE",
            [
                p("switchport_description", "description"),
                p("switchport_mode", "mode"),
                p("access_vlan", "accessVlan"),
                p("voice_vlan", "voiceVlan"),
                p("admin_status", "adminStatus").up_down(),
            ],
        ),
    ),
    (
        "vlan_trunking_interface_config",
        ApiFeature::TrunkInterfaceConfig,
        item!(
            "TRUNK_INTERFACE",
            [
                p("enable_dtp_negotiation", "isDtpNegotiationEnabled"),
                p("protected", "isProtected"),
                p("pruning_vlan_ids", "pruneEligibleVlans").vlan_list(),
                p("allowed_vlans", "allowedVlans").vlan_list(),
                p("native_vlan_id", "nativeVlanId"),
            ],
        ),
    ),
    (
        "dot1x_interface_config",
        ApiFeature::Dot1xInterfaceConfig,
        item!(
            "DOT1X_INTERFACE",
            [
                p("dot1x_interface_authentication_order", "authenticationOrder"),
                p("dot1x_interface_authentication_mode", "authenticationMode"),
                p("dot1x_interface_pae_type", "paeType"),
                p("dot1x_interface_control_direction", "controlDirection"),
                p("dot1x_interface_host_mode", "hostMode"),
                p(
                    "dot1x_interface_enable_inactivity_timer_from_server",
                    "isInactivityTimerFromServerEnabled",
                ),
                p("dot1x_interface_inactivity_timer", "inactivityTimer"),
                p(
                    "dot1x_interface_authentication_port_control",
                    "authenticationPortControl",
                ),
                p("dot1x_interface_enable_reauth", "isReauthEnabled"),
                p("dot1x_interface_max_reauth_requests", "maxReauthRequests"),
                p(
                    "dot1x_interface_enable_reauth_timer_from_server",
                    "isReauthTimerFromServerEnabled",
                ),
                p("dot1x_interface_reauth_timer", "reauthTimer"),
                p("dot1x_interface_tx_period", "txPeriod"),
            ],
        ),
    ),
    (
        "mab_interface_config",
        ApiFeature::MabInterfaceConfig,
        item!("MAB_INTERFACE", [p("mab_status", "isMabEnabled")]),
    ),
    (
        "stp_interface_config",
        ApiFeature::StpInterfaceConfig,
        ItemSchema {
            config_type: "STP_INTERFACE",
            params: &[
                p("stp_interface_portfast_mode", "portFastMode"),
                p("stp_interface_bpdu_filter", "bpduFilter").enable_disable(),
                p("stp_interface_bpdu_guard", "bpduGuard").enable_disable(),
                p("stp_interface_cost", "pathCost"),
                p("stp_interface_guard", "guardMode"),
                p("stp_interface_priority", "priority"),
            ],
            objects: &[],
            lists: &[
                NestedList {
                    from: "stp_interface_per_vlan_cost",
                    to: "portVlanCostSettings",
                    container: "LIST",
                    shape: ListShape::Dicts(&STP_VLAN_COST),
                    always: false,
                },
                NestedList {
                    from: "stp_interface_per_vlan_priority",
                    to: "portVlanPrioritySettings",
                    container: "LIST",
                    shape: ListShape::Dicts(&STP_VLAN_PRIORITY),
                    always: false,
                },
            ],
        },
    ),
    (
        "dhcp_snooping_interface_config",
        ApiFeature::DhcpSnoopingInterfaceConfig,
        item!(
            "DHCP_SNOOPING_INTERFACE",
            [
                p("dhcp_snooping_interface_rate", "messageRateLimit"),
                p("dhcp_snooping_interface_trust", "isTrustedInterface"),
            ],
        ),
    ),
    (
        "cdp_interface_config",
        ApiFeature::CdpInterfaceConfig,
        item!(
            "CDP_INTERFACE",
            [
                p("cdp_interface_admin_status", "isCdpEnabled"),
                p("cdp_interface_log_duplex_mismatch", "isLogDuplexMismatchEnabled"),
            ],
        ),
    ),
    (
        "lldp_interface_config",
        ApiFeature::LldpInterfaceConfig,
        item!(
            "LLDP_INTERFACE",
            [p("lldp_interface_receive_transmit", "adminStatus")],
        ),
    ),
    (
        "vtp_interface_config",
        ApiFeature::VtpInterfaceConfig,
        item!("VTP_INTERFACE", [p("vtp_interface_admin_status", "isVtpEnabled")]),
    ),
];
