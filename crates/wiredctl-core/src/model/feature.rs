// ── Feature catalogue ──
//
// User-level features (the keys of a desired-state document) and the
// controller API features they expand into.

use serde::{Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// A top-level key of the desired-state document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
    Vlans,
    Cdp,
    Lldp,
    Stp,
    Vtp,
    DhcpSnooping,
    IgmpSnooping,
    MldSnooping,
    Authentication,
    LogicalPorts,
    PortConfiguration,
}

/// How a feature is removed when the caller asks for `deleted` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionClass {
    /// Delete the intent so the next deploy restores controller defaults.
    ResetToDefault,
    /// Rewrite the intent without the requested items.
    ItemRemoval,
    /// The controller offers no deletion path.
    NotSupported,
}

impl Feature {
    /// API features this user feature can emit, in emission order.
    pub fn api_features(self) -> &'static [ApiFeature] {
        match self {
            Self::Vlans => &[ApiFeature::VlanConfig],
            Self::Cdp => &[ApiFeature::CdpGlobalConfig],
            Self::Lldp => &[ApiFeature::LldpGlobalConfig],
            Self::Stp => &[ApiFeature::StpGlobalConfig],
            Self::Vtp => &[ApiFeature::VtpGlobalConfig],
            Self::DhcpSnooping => &[ApiFeature::DhcpSnoopingGlobalConfig],
            Self::IgmpSnooping => &[ApiFeature::IgmpSnoopingGlobalConfig],
            Self::MldSnooping => &[ApiFeature::MldSnoopingGlobalConfig],
            Self::Authentication => &[ApiFeature::Dot1xGlobalConfig],
            Self::LogicalPorts => &[ApiFeature::PortchannelConfig],
            Self::PortConfiguration => &ApiFeature::INTERFACE_FEATURES,
        }
    }

    pub fn deletion_class(self) -> DeletionClass {
        match self {
            Self::Cdp | Self::Lldp | Self::Vtp | Self::DhcpSnooping | Self::Authentication => {
                DeletionClass::ResetToDefault
            }
            Self::Vlans => DeletionClass::ItemRemoval,
            Self::Stp
            | Self::IgmpSnooping
            | Self::MldSnooping
            | Self::LogicalPorts
            | Self::PortConfiguration => DeletionClass::NotSupported,
        }
    }

    /// Whether the body is a list of entries rather than a scalar mapping.
    pub fn is_list(self) -> bool {
        matches!(self, Self::Vlans | Self::PortConfiguration)
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

/// Diff algorithm family for an API feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffClass {
    Vlan,
    GlobalSingleton,
    GlobalNested,
    Interface,
}

/// A controller-side Layer-2 feature name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
pub enum ApiFeature {
    #[strum(serialize = "vlanConfig")]
    VlanConfig,
    #[strum(serialize = "cdpGlobalConfig")]
    CdpGlobalConfig,
    #[strum(serialize = "lldpGlobalConfig")]
    LldpGlobalConfig,
    #[strum(serialize = "stpGlobalConfig")]
    StpGlobalConfig,
    #[strum(serialize = "vtpGlobalConfig")]
    VtpGlobalConfig,
    #[strum(serialize = "dhcpSnoopingGlobalConfig")]
    DhcpSnoopingGlobalConfig,
    #[strum(serialize = "igmpSnoopingGlobalConfig")]
    IgmpSnoopingGlobalConfig,
    #[strum(serialize = "mldSnoopingGlobalConfig")]
    MldSnoopingGlobalConfig,
    #[strum(serialize = "dot1xGlobalConfig")]
    Dot1xGlobalConfig,
    #[strum(serialize = "portchannelConfig")]
    PortchannelConfig,
    #[strum(serialize = "switchportInterfaceConfig")]
    SwitchportInterfaceConfig,
    #[strum(serialize = "trunkInterfaceConfig")]
    TrunkInterfaceConfig,
    #[strum(serialize = "dot1xInterfaceConfig")]
    Dot1xInterfaceConfig,
    #[strum(serialize = "mabInterfaceConfig")]
    MabInterfaceConfig,
    #[strum(serialize = "stpInterfaceConfig")]
    StpInterfaceConfig,
    #[strum(serialize = "dhcpSnoopingInterfaceConfig")]
    DhcpSnoopingInterfaceConfig,
    #[strum(serialize = "cdpInterfaceConfig")]
    CdpInterfaceConfig,
    #[strum(serialize = "lldpInterfaceConfig")]
    LldpInterfaceConfig,
    #[strum(serialize = "vtpInterfaceConfig")]
    VtpInterfaceConfig,
}

impl ApiFeature {
    /// Interface features in the order a port configuration emits them.
    pub const INTERFACE_FEATURES: [ApiFeature; 9] = [
        Self::SwitchportInterfaceConfig,
        Self::TrunkInterfaceConfig,
        Self::Dot1xInterfaceConfig,
        Self::MabInterfaceConfig,
        Self::StpInterfaceConfig,
        Self::DhcpSnoopingInterfaceConfig,
        Self::CdpInterfaceConfig,
        Self::LldpInterfaceConfig,
        Self::VtpInterfaceConfig,
    ];

    pub fn diff_class(self) -> DiffClass {
        match self {
            Self::VlanConfig => DiffClass::Vlan,
            Self::CdpGlobalConfig
            | Self::LldpGlobalConfig
            | Self::VtpGlobalConfig
            | Self::DhcpSnoopingGlobalConfig
            | Self::Dot1xGlobalConfig => DiffClass::GlobalSingleton,
            Self::StpGlobalConfig
            | Self::IgmpSnoopingGlobalConfig
            | Self::MldSnoopingGlobalConfig
            | Self::PortchannelConfig => DiffClass::GlobalNested,
            _ => DiffClass::Interface,
        }
    }

    /// Human-readable name used in summaries and failure messages.
    pub fn friendly_name(self) -> &'static str {
        match self {
            Self::VlanConfig => "VLANs",
            Self::CdpGlobalConfig => "CDP",
            Self::LldpGlobalConfig => "LLDP",
            Self::StpGlobalConfig => "Spanning Tree",
            Self::VtpGlobalConfig => "VTP",
            Self::DhcpSnoopingGlobalConfig => "DHCP Snooping",
            Self::IgmpSnoopingGlobalConfig => "IGMP Snooping",
            Self::MldSnoopingGlobalConfig => "MLD Snooping",
            Self::Dot1xGlobalConfig => "802.1X Authentication",
            Self::PortchannelConfig => "Port Channels",
            Self::SwitchportInterfaceConfig => "Switchport Interfaces",
            Self::TrunkInterfaceConfig => "VLAN Trunking Interfaces",
            Self::Dot1xInterfaceConfig => "802.1X Interfaces",
            Self::MabInterfaceConfig => "MAB Interfaces",
            Self::StpInterfaceConfig => "Spanning Tree Interfaces",
            Self::DhcpSnoopingInterfaceConfig => "DHCP Snooping Interfaces",
            Self::CdpInterfaceConfig => "CDP Interfaces",
            Self::LldpInterfaceConfig => "LLDP Interfaces",
            Self::VtpInterfaceConfig => "VTP Interfaces",
        }
    }
}

impl Serialize for ApiFeature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}
