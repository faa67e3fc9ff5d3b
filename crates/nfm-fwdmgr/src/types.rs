//! Type definitions for forwarding domain configuration

use std::str::FromStr;

use nfm_api::{DomainId, DomainMode, FrameType, LogIntfId, PhysPortId};
use nfm_tool_common::{ToolError, ToolResult};
use nfm_types::VlanTag;

/// L3 exception rate limit applied by the 4x1G netmod preset.
pub const B1G_L3EX_RATE_LIMIT: u32 = 20;

/// Physical port to logical interface mapping of the 4x1G netmod preset.
pub const B1G_PORT_MAP: [(u32, u32); 4] = [(11, 1), (10, 2), (9, 3), (8, 4)];

/// A logical interface to create: `<phy>:[<vlan>:]<lif>` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogIntfSpec {
    pub port: PhysPortId,
    pub vlan: VlanTag,
    pub lif: LogIntfId,
}

impl LogIntfSpec {
    pub fn untagged(port: u32, lif: u32) -> Self {
        Self {
            port: PhysPortId::new(port),
            vlan: VlanTag::Untagged,
            lif: LogIntfId::new(lif),
        }
    }
}

impl FromStr for LogIntfSpec {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').collect();
        let (port, vlan, lif) = match fields.as_slice() {
            [port, lif] => (port, VlanTag::Untagged, lif),
            [port, vlan, lif] => (port, vlan.parse::<VlanTag>()?, lif),
            _ => return Err(ToolError::invalid_format(s, "expected <phy>:[<vlan>:]<lif>")),
        };
        Ok(Self {
            port: port.parse()?,
            vlan,
            lif: lif.parse()?,
        })
    }
}

/// Everything one configuration run applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingPlan {
    pub domain: DomainId,
    pub mode: DomainMode,
    /// Remove existing interfaces, bridges and routers first.
    pub clear: bool,
    /// Interfaces in configuration order.
    pub interfaces: Vec<LogIntfSpec>,
    pub mtu: Option<u32>,
    pub frame_type: FrameType,
    /// Rate limit to set and verify on every interface after commit.
    pub l3ex_rate_limit: Option<u32>,
}

impl ForwardingPlan {
    /// Plan for `interfaces`, which must not be empty.
    pub fn new(domain: DomainId, mode: DomainMode, interfaces: Vec<LogIntfSpec>) -> ToolResult<Self> {
        if interfaces.is_empty() {
            return Err(ToolError::usage("No interfaces specified. Please use -b or -i."));
        }
        Ok(Self {
            domain,
            mode,
            clear: true,
            interfaces,
            mtu: None,
            frame_type: FrameType::ETHERNET_II,
            l3ex_rate_limit: None,
        })
    }

    /// The 4x1G netmod preset.
    pub fn b1g(domain: DomainId, mode: DomainMode) -> Self {
        Self {
            domain,
            mode,
            clear: true,
            interfaces: B1G_PORT_MAP
                .iter()
                .map(|&(port, lif)| LogIntfSpec::untagged(port, lif))
                .collect(),
            mtu: None,
            frame_type: FrameType::ETHERNET_II,
            l3ex_rate_limit: Some(B1G_L3EX_RATE_LIMIT),
        }
    }

    /// Sets the MTU to apply. Zero leaves the MTU unchanged.
    pub fn with_mtu(mut self, mtu: u32) -> Self {
        self.mtu = (mtu > 0).then_some(mtu);
        self
    }

    pub fn with_frame_type(mut self, frame_type: FrameType) -> Self {
        self.frame_type = frame_type;
        self
    }

    pub fn without_clear(mut self) -> Self {
        self.clear = false;
        self
    }

    /// True if anything is applied after the commit.
    pub fn has_tuning(&self) -> bool {
        self.mtu.is_some() || !self.frame_type.is_default() || self.l3ex_rate_limit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfm_types::VlanId;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_untagged_spec() {
        assert_eq!("11:1".parse::<LogIntfSpec>().unwrap(), LogIntfSpec::untagged(11, 1));
    }

    #[test]
    fn test_parse_tagged_spec() {
        let spec: LogIntfSpec = "9:100:3".parse().unwrap();
        assert_eq!(spec.vlan, VlanTag::CVlan(VlanId::new(100).unwrap()));
        assert_eq!(spec.lif, LogIntfId::new(3));

        assert_eq!("9:0:3".parse::<LogIntfSpec>().unwrap().vlan, VlanTag::Untagged);
    }

    #[test]
    fn test_invalid_vlan_rejected() {
        let err = "9:4095:3".parse::<LogIntfSpec>().unwrap_err();
        assert!(matches!(err, ToolError::OutOfRange { .. }));
    }

    #[test]
    fn test_malformed_spec() {
        for bad in ["11", "11:1:2:3", "eth0:1", "11:"] {
            let err = bad.parse::<LogIntfSpec>().unwrap_err();
            assert!(err.is_input_error(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_b1g_preset() {
        let plan = ForwardingPlan::b1g(DomainId::new(1), DomainMode::L2);
        let ports: Vec<(u32, u32)> = plan
            .interfaces
            .iter()
            .map(|spec| (spec.port.as_u32(), spec.lif.as_u32()))
            .collect();
        assert_eq!(ports, vec![(11, 1), (10, 2), (9, 3), (8, 4)]);
        assert_eq!(plan.l3ex_rate_limit, Some(20));
        assert!(plan.clear);
    }

    #[test]
    fn test_empty_plan_is_usage_error() {
        let err = ForwardingPlan::new(DomainId::new(1), DomainMode::L2, Vec::new()).unwrap_err();
        assert!(matches!(err, ToolError::Usage { .. }));
    }

    #[test]
    fn test_zero_mtu_means_unchanged() {
        let plan = ForwardingPlan::new(DomainId::new(1), DomainMode::L2, vec![LogIntfSpec::untagged(1, 1)])
            .unwrap()
            .with_mtu(0);
        assert_eq!(plan.mtu, None);
        assert!(!plan.has_tuning());
    }
}
