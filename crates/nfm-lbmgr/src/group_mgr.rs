//! GroupConfigurator - applies load-balance actions to a device
//!
//! Actions run strictly in order against the currently selected device.
//! The first failure stops the run. Actions applied before it stay in
//! effect on the device: a run is not atomic and nothing is rolled back.

use std::fmt;
use std::io::Write;
use tracing::{debug, info, instrument, warn};

use nfm_api::api::{GroupTable, LoadBalanceApi};
use nfm_tool_common::{ToolError, ToolResult};
use nfm_types::{format_mask, DestSet, DeviceId, GroupId};

use crate::commands::LbCommand;

/// Printable snapshot of all groups of one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupListing {
    pub device: DeviceId,
    pub groups: GroupTable,
}

impl fmt::Display for GroupListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Load balance group destinations for NFE {}", self.device)?;
        for (group, dests) in GroupId::all().zip(self.groups.iter()) {
            writeln!(f, "Group {}: {}", group, format_mask(*dests))?;
        }
        writeln!(f)
    }
}

/// Sequential executor for [`LbCommand`] lists.
pub struct GroupConfigurator<P> {
    platform: P,
    current_device: DeviceId,
}

impl<P: LoadBalanceApi> GroupConfigurator<P> {
    /// Creates a configurator targeting device 0.
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            current_device: DeviceId::default(),
        }
    }

    pub fn current_device(&self) -> DeviceId {
        self.current_device
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    /// Writes the empty mask to all groups of `device`.
    #[instrument(skip(self))]
    pub fn clear_all(&mut self, device: DeviceId) -> ToolResult<()> {
        self.platform
            .clear_all_groups(device)
            .map_err(|e| ToolError::device("clearing load balance group destinations", device, e))?;
        info!("Cleared all load balance groups on NFE {}", device);
        Ok(())
    }

    /// Replaces the mask of one group. Other groups are untouched.
    #[instrument(skip(self))]
    pub fn set_group(&mut self, device: DeviceId, group: GroupId, dests: DestSet) -> ToolResult<()> {
        self.platform.set_group_mask(device, group, dests).map_err(|e| {
            ToolError::device(
                format!("setting load balance group {} to destinations {}", group, dests),
                device,
                e,
            )
        })?;
        info!("Set load balance group {} to {} on NFE {}", group, dests, device);
        Ok(())
    }

    /// Reads all group masks of `device`.
    pub fn print_groups(&self, device: DeviceId) -> ToolResult<GroupListing> {
        let groups = self.platform.get_group_masks(device).map_err(|e| {
            ToolError::device("retrieving load balance group destinations", device, e)
        })?;
        Ok(GroupListing { device, groups })
    }

    /// Applies a single action.
    pub fn apply(&mut self, command: &LbCommand, out: &mut dyn Write) -> ToolResult<()> {
        let device = self.current_device;
        match *command {
            LbCommand::SelectDevice(next) => {
                debug!("Selecting NFE {}", next);
                self.current_device = next;
            }
            LbCommand::Clear => self.clear_all(device)?,
            LbCommand::SetMask { group, dests } | LbCommand::SetList { group, dests } => {
                self.set_group(device, group, dests)?
            }
            LbCommand::Print => {
                let listing = self.print_groups(device)?;
                write!(out, "{}", listing)?;
            }
        }
        Ok(())
    }

    /// Applies `commands` left to right, stopping at the first failure.
    ///
    /// Returns the number of actions applied. On failure the error of the
    /// failing action is returned and every earlier action remains applied.
    pub fn run(&mut self, commands: &[LbCommand], out: &mut dyn Write) -> ToolResult<usize> {
        for (applied, command) in commands.iter().enumerate() {
            if let Err(e) = self.apply(command, out) {
                if commands[..applied].iter().any(LbCommand::is_write) {
                    warn!(
                        "Stopped at action {} of {} ({}); earlier changes remain in effect",
                        applied + 1,
                        commands.len(),
                        command
                    );
                }
                return Err(e);
            }
        }
        debug!("Applied {} actions", commands.len());
        Ok(commands.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfm_api::sim::{SimOp, SimPlatform};
    use nfm_api::{NfmError, NfmStatus};
    use pretty_assertions::assert_eq;

    fn dev(id: u32) -> DeviceId {
        DeviceId::new(id).unwrap()
    }

    fn group(id: u32) -> GroupId {
        GroupId::new(id).unwrap()
    }

    #[test]
    fn test_select_device_redirects_following_actions() {
        let sim = SimPlatform::new();
        let mut mgr = GroupConfigurator::new(sim.clone());
        let commands = [
            LbCommand::SetMask {
                group: group(0),
                dests: DestSet::from_bits(1),
            },
            LbCommand::SelectDevice(dev(2)),
            LbCommand::SetMask {
                group: group(0),
                dests: DestSet::from_bits(0xffff),
            },
        ];

        assert_eq!(mgr.run(&commands, &mut Vec::new()).unwrap(), 3);
        assert_eq!(mgr.current_device(), dev(2));
        assert_eq!(sim.group_masks(dev(0))[0].bits(), 1);
        assert_eq!(sim.group_masks(dev(2))[0].bits(), 0xffff);
    }

    #[test]
    fn test_print_format() {
        let sim = SimPlatform::new();
        let mut mgr = GroupConfigurator::new(sim);
        mgr.set_group(dev(0), group(1), DestSet::from_bits(0b101)).unwrap();

        let mut out = Vec::new();
        mgr.apply(&LbCommand::Print, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Load balance group destinations for NFE 0");
        assert_eq!(lines[1], "Group 0: No destinations defined");
        assert_eq!(lines[2], "Group 1: 0 2");
        assert_eq!(lines[24], "Group 23: No destinations defined");
        assert_eq!(lines.len(), 26);
        assert_eq!(lines[25], "");
    }

    #[test]
    fn test_absent_device_is_device_error() {
        let sim = SimPlatform::new();
        sim.set_present(dev(3), false);
        let mut mgr = GroupConfigurator::new(sim);

        let err = mgr.clear_all(dev(3)).unwrap_err();
        assert!(matches!(err, ToolError::Device { .. }));
        assert_eq!(err.nfm_error().map(NfmError::status), Some(NfmStatus::NoDevice));
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let sim = SimPlatform::new();
        sim.inject_fault(
            SimOp::SetGroupMask {
                device: dev(0),
                group: group(1),
            },
            NfmError::from_status(NfmStatus::PermissionDenied, 0),
        );
        let mut mgr = GroupConfigurator::new(sim.clone());
        let commands = [
            LbCommand::SetMask {
                group: group(1),
                dests: DestSet::from_bits(2),
            },
            LbCommand::Print,
        ];

        let mut out = Vec::new();
        assert!(mgr.run(&commands, &mut out).is_err());
        assert!(out.is_empty());
        assert!(!sim.calls().iter().any(|op| matches!(op, SimOp::GetGroupMasks { .. })));
    }
}
