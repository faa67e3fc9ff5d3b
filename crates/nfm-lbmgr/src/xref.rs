//! RuleCrossReferencer - finds the interfaces feeding a host destination
//!
//! For each searched device the group holding the destination is looked up
//! in the load-balance table, then the rule table is scanned in priority
//! order for rules whose action feeds that group. The interface each such
//! rule matches on is reported, unless the rule wildcards it.

use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info, instrument, warn};

use nfm_api::api::{CursorOrder, LoadBalanceApi, RulesApi};
use nfm_api::InterfaceId;
use nfm_tool_common::{ToolError, ToolResult};
use nfm_types::{DeviceId, GroupId, HostDestId};

/// Result of searching one device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceXref {
    pub device: DeviceId,
    /// First group containing the destination, `None` if no group does.
    pub group: Option<GroupId>,
    /// Further groups that also contain the destination. They are not
    /// searched; a non-empty list means the group table is ambiguous.
    pub other_groups: Vec<GroupId>,
    /// Interfaces of matching rules that care about the interface.
    pub interfaces: BTreeSet<InterfaceId>,
    pub rules_scanned: usize,
}

/// Result of a cross-reference over all searched devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefReport {
    pub host_dest: HostDestId,
    pub devices: Vec<DeviceXref>,
}

impl XrefReport {
    /// Union of the interfaces found on every device, ascending.
    pub fn interfaces(&self) -> BTreeSet<InterfaceId> {
        self.devices
            .iter()
            .flat_map(|dev| dev.interfaces.iter().copied())
            .collect()
    }

    /// True if any device holds the destination in more than one group.
    pub fn is_ambiguous(&self) -> bool {
        self.devices.iter().any(|dev| !dev.other_groups.is_empty())
    }
}

impl fmt::Display for XrefReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Interface IDs feeding host dest {}:", self.host_dest)?;
        let ids: Vec<String> = self.interfaces().iter().map(ToString::to_string).collect();
        writeln!(f, "{}", ids.join(" "))
    }
}

/// Correlates the load-balance table with the rule table.
pub struct RuleCrossReferencer<'a, P> {
    platform: &'a P,
    queue_name: String,
}

impl<'a, P: LoadBalanceApi + RulesApi> RuleCrossReferencer<'a, P> {
    pub fn new(platform: &'a P, queue_name: impl Into<String>) -> Self {
        Self {
            platform,
            queue_name: queue_name.into(),
        }
    }

    /// Searches `devices` in order for interfaces feeding `host_dest`.
    ///
    /// A device with no group holding the destination contributes nothing.
    /// A device whose rule table cannot be opened aborts the whole search.
    pub fn interfaces_for(&self, host_dest: HostDestId, devices: &[DeviceId]) -> ToolResult<XrefReport> {
        let mut report = XrefReport {
            host_dest,
            devices: Vec::with_capacity(devices.len()),
        };
        for &device in devices {
            report.devices.push(self.search_device(host_dest, device)?);
        }
        info!(
            "Host dest {} is fed by {} interfaces",
            host_dest,
            report.interfaces().len()
        );
        Ok(report)
    }

    #[instrument(skip(self))]
    fn search_device(&self, host_dest: HostDestId, device: DeviceId) -> ToolResult<DeviceXref> {
        let groups = self.platform.get_group_masks(device).map_err(|e| {
            ToolError::device("retrieving load balance group destinations", device, e)
        })?;

        let mut holding = GroupId::all()
            .zip(groups.iter())
            .filter(|(_, dests)| dests.contains(host_dest))
            .map(|(group, _)| group);

        let mut result = DeviceXref {
            device,
            group: holding.next(),
            other_groups: holding.collect(),
            ..DeviceXref::default()
        };

        let Some(group) = result.group else {
            debug!("Host dest {} is in no load balance group on NFE {}", host_dest, device);
            return Ok(result);
        };
        if !result.other_groups.is_empty() {
            warn!(
                "Host dest {} is in several load balance groups on NFE {}; using group {}, ignoring {:?}",
                host_dest, device, group, result.other_groups
            );
        }

        let mut session = self.platform.rules_open(device, &self.queue_name).map_err(|e| {
            ToolError::setup(device, format!("opening rules queue {}", self.queue_name), e)
        })?;
        let mut cursor = session
            .open_cursor(CursorOrder::Priority)
            .map_err(|e| ToolError::setup(device, "opening rule cursor", e))?;

        while let Some(rule) = cursor
            .read()
            .map_err(|source| ToolError::RuleRead { device, source })?
        {
            result.rules_scanned += 1;
            if !rule.lgids().contains(group) {
                continue;
            }
            let binding = rule.addr_space_id();
            if binding.care {
                debug!("Rule {} feeds group {} from interface {}", rule.name, group, binding.id);
                result.interfaces.insert(binding.id);
            }
        }

        Ok(result)
    }
}
