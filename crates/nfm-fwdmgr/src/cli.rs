//! Command line definition for `nfm-configure-forwarding`.

use clap::Parser;
use std::path::PathBuf;

use nfm_api::{DomainId, DomainMode, FrameType};
use nfm_tool_common::ToolResult;
use nfm_types::parse_number;

use crate::types::{ForwardingPlan, LogIntfSpec};

const FORWARDING_AFTER_HELP: &str = "\
Example - configure domain 9 to L3 forward (route) between phy ports 9, 10 and 11:
  nfm-configure-forwarding -d9 -3 -i11:1 -i10:2 -i9:3";

/// Arguments of `nfm-configure-forwarding`.
#[derive(Debug, Parser)]
#[command(name = "nfm-configure-forwarding")]
#[command(about = "Configure a forwarding domain over physical ports", long_about = None)]
#[command(after_help = FORWARDING_AFTER_HELP)]
pub struct ForwardingArgs {
    /// Don't clear the configuration before making changes
    #[arg(short = 'C', long = "no_clear")]
    pub no_clear: bool,

    /// Configure L3 forwarding (default: L2 forwarding)
    #[arg(short = '3', long = "l3")]
    pub l3: bool,

    /// Map <phy>, optionally with <vlan>, to logical interface <lif>
    #[arg(short = 'i', long = "iface", value_name = "phy:[vlan:]lif", conflicts_with = "b1g")]
    pub ifaces: Vec<LogIntfSpec>,

    /// Create the domain with this ID
    #[arg(short = 'd', long = "domain", value_name = "dom", default_value = "1")]
    pub domain: DomainId,

    /// Use the default mappings for the slot B 4x1G netmod
    #[arg(short = 'b', long = "B1G")]
    pub b1g: bool,

    /// Set the MTU of the interfaces
    #[arg(short = 'm', long = "mtu", value_name = "n", value_parser = parse_number)]
    pub mtu: Option<u32>,

    /// Set the frame type of the interfaces
    #[arg(short = 'f', long = "frame-type", value_name = "n")]
    pub frame_type: Option<FrameType>,

    /// Log level, a name or 0-4
    #[arg(short = 'l', long = "loglevel", value_name = "n")]
    pub loglevel: Option<String>,

    /// Tool configuration file
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Platform state file
    #[arg(long, value_name = "path")]
    pub platform: Option<PathBuf>,
}

impl ForwardingArgs {
    /// Builds the plan the arguments describe.
    pub fn plan(&self) -> ToolResult<ForwardingPlan> {
        let mode = if self.l3 { DomainMode::L3 } else { DomainMode::L2 };
        let mut plan = if self.b1g {
            ForwardingPlan::b1g(self.domain, mode)
        } else {
            ForwardingPlan::new(self.domain, mode, self.ifaces.clone())?
        };
        if self.no_clear {
            plan = plan.without_clear();
        }
        if let Some(mtu) = self.mtu {
            plan = plan.with_mtu(mtu);
        }
        if let Some(frame_type) = self.frame_type {
            plan = plan.with_frame_type(frame_type);
        }
        Ok(plan)
    }
}
