//! Load-balance tool actions.
//!
//! The command line is turned into a list of [`LbCommand`]s before any
//! device is touched, so malformed input never leaves a half-applied
//! sequence behind.

use nfm_tool_common::{ToolError, ToolResult};
use nfm_types::{parse_bitmask, parse_list, parse_number, DestSet, DeviceId, GroupId};
use std::fmt;

/// One action of an `nfm-lb` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LbCommand {
    /// Direct the following actions at another device.
    SelectDevice(DeviceId),
    /// Empty all groups of the current device.
    Clear,
    /// Set a group from a bitmask (`-s G:MASK`).
    SetMask { group: GroupId, dests: DestSet },
    /// Set a group from an id list (`-S G:LIST`).
    SetList { group: GroupId, dests: DestSet },
    /// Print every group of the current device.
    Print,
}

impl LbCommand {
    /// Parses the device argument of `-d`.
    pub fn select_device(arg: &str) -> ToolResult<Self> {
        Ok(LbCommand::SelectDevice(DeviceId::new(parse_number(arg)?)?))
    }

    /// Parses a `-s` argument such as `3:0x3f`.
    pub fn set_mask(arg: &str) -> ToolResult<Self> {
        let (group, mask) = split_group_arg(arg, "group:bitmask")?;
        Ok(LbCommand::SetMask {
            group,
            dests: parse_bitmask(mask)?,
        })
    }

    /// Parses a `-S` argument such as `0:0,1,2`.
    pub fn set_list(arg: &str) -> ToolResult<Self> {
        let (group, list) = split_group_arg(arg, "group:list")?;
        Ok(LbCommand::SetList {
            group,
            dests: parse_list(list)?,
        })
    }

    /// True for actions that write to the device.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            LbCommand::Clear | LbCommand::SetMask { .. } | LbCommand::SetList { .. }
        )
    }
}

impl fmt::Display for LbCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LbCommand::SelectDevice(device) => write!(f, "select device {}", device),
            LbCommand::Clear => write!(f, "clear all groups"),
            LbCommand::SetMask { group, dests } | LbCommand::SetList { group, dests } => {
                write!(f, "set group {} to {}", group, dests)
            }
            LbCommand::Print => write!(f, "print groups"),
        }
    }
}

fn split_group_arg<'a>(arg: &'a str, expected: &str) -> ToolResult<(GroupId, &'a str)> {
    let (group, rest) = arg
        .split_once(':')
        .ok_or_else(|| ToolError::invalid_format(arg, format!("expected {}", expected)))?;
    let group = GroupId::new(parse_number(group)?)?;
    Ok((group, rest))
}
