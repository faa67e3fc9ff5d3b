//! Command line definitions for `nfm-lb` and `nfm-get-ports`.
//!
//! `nfm-lb` actions form a sequence executed left to right, so the order
//! they appear in matters. Clap groups values per argument, so the sequence
//! is rebuilt from each value's position on the command line.

use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use nfm_tool_common::{ToolError, ToolResult};
use nfm_types::{DeviceId, HostDestId};

use crate::commands::LbCommand;

const LB_AFTER_HELP: &str = "\
Numerical arguments may be hexadecimal if prefixed by '0x'.
Multiple options may be combined to form a sequence of actions executed
left to right. The program stops as soon as an error is encountered, but
all actions carried out up to that point remain in effect. The command
line sequence is therefore NOT an atomic operation.

Examples:
  Set load balance group 3 to send to destination IDs 0-5:
    nfm-lb -s 3:0x3f
  Clear destinations for group 0 and send group 1 to IDs 0 and 2 on device 0,
  print, then send group 0 on device 1 to IDs 0-15 and print:
    nfm-lb -d 0 -s 0:0 -s 1:5 -p -d 1 -s 0:0xffff -p
  Clear all groups, then send group 0 to IDs 0,1,2 and group 1 to 3,4,5:
    nfm-lb -c -S 0:0,1,2 -S 1:3,4,5";

/// Arguments of `nfm-lb`.
#[derive(Debug, Parser)]
#[command(name = "nfm-lb")]
#[command(about = "Configure load balance group destinations", long_about = None)]
#[command(after_help = LB_AFTER_HELP, arg_required_else_help = true)]
pub struct LbArgs {
    /// Select NFE device for the following actions (0-3)
    #[arg(short = 'd', long = "device", value_name = "n", action = ArgAction::Append)]
    pub device: Vec<String>,

    /// Print the load balance group destination IDs
    #[arg(short = 'p', long = "print", action = ArgAction::Append, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub print: Vec<String>,

    /// Set <group> (0-23) to use the destinations in <bitmask>
    #[arg(short = 's', long = "set", value_name = "group:bitmask", action = ArgAction::Append)]
    pub set: Vec<String>,

    /// Set <group> (0-23) to use the destinations in <list>
    #[arg(short = 'S', long = "list", value_name = "group:list", action = ArgAction::Append)]
    pub list: Vec<String>,

    /// Clear all 24 load balance groups
    #[arg(short = 'c', long = "clear", action = ArgAction::Append, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub clear: Vec<String>,

    /// Tool configuration file
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Platform state file
    #[arg(long, value_name = "path")]
    pub platform: Option<PathBuf>,
}

impl LbArgs {
    /// Parses `args`, keeping the matches for action ordering.
    pub fn try_parse_ordered<I, T>(args: I) -> Result<(Self, ArgMatches), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let parsed = Self::from_arg_matches(&matches)?;
        Ok((parsed, matches))
    }
}

/// Value clap records for each occurrence of `-p` and `-c`.
const FLAG_PRESENT: &str = "true";

const ACTION_ARGS: [&str; 5] = ["device", "set", "list", "print", "clear"];

/// Rebuilds the `nfm-lb` action sequence in command line order.
///
/// Every argument is validated here, before any device is touched. The
/// leftmost invalid argument is the one reported.
pub fn lb_commands(matches: &ArgMatches) -> ToolResult<Vec<LbCommand>> {
    let mut positioned: Vec<(usize, &str, &String)> = Vec::new();
    for id in ACTION_ARGS {
        let (Some(indices), Some(values)) = (matches.indices_of(id), matches.get_many::<String>(id))
        else {
            continue;
        };
        positioned.extend(indices.zip(values).map(|(index, value)| (index, id, value)));
    }

    if positioned.is_empty() {
        return Err(ToolError::usage("No actions specified"));
    }
    positioned.sort_by_key(|(index, _, _)| *index);

    positioned
        .into_iter()
        .map(|(_, id, value)| match id {
            "device" => LbCommand::select_device(value),
            "set" => LbCommand::set_mask(value),
            "list" => LbCommand::set_list(value),
            _ if value != FLAG_PRESENT => Err(ToolError::invalid_format(
                value.as_str(),
                format!("--{} takes no value", id),
            )),
            "print" => Ok(LbCommand::Print),
            _ => Ok(LbCommand::Clear),
        })
        .collect()
}

const GET_PORTS_LONG_ABOUT: &str = "\
Print the interfaces feeding a given host destination.

If a load balance group contains host dest IDs 1-6 and rules for interfaces
1 and 2 send to that group, then host dest IDs 1-6 all report 1 and 2.";

/// Arguments of `nfm-get-ports`.
#[derive(Debug, Parser)]
#[command(name = "nfm-get-ports")]
#[command(about = "Print the interfaces feeding a host destination")]
#[command(long_about = GET_PORTS_LONG_ABOUT)]
pub struct GetPortsArgs {
    /// Host destination to look up (0-31)
    #[arg(short = 'i', long = "host_dest", value_name = "n")]
    pub host_dest: HostDestId,

    /// Log level, a name or 0-4 (default info)
    #[arg(short = 'l', long = "loglevel", value_name = "n")]
    pub loglevel: Option<String>,

    /// Device to search, may be repeated (default from configuration)
    #[arg(short = 'D', long = "device", value_name = "n")]
    pub devices: Vec<DeviceId>,

    /// Tool configuration file
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Platform state file
    #[arg(long, value_name = "path")]
    pub platform: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfm_types::{DestSet, GroupId};
    use pretty_assertions::assert_eq;

    fn ordered(args: &[&str]) -> ToolResult<Vec<LbCommand>> {
        let argv = std::iter::once("nfm-lb").chain(args.iter().copied());
        let (_, matches) = LbArgs::try_parse_ordered(argv).unwrap();
        lb_commands(&matches)
    }

    fn set_mask(group: u32, bits: u32) -> LbCommand {
        LbCommand::SetMask {
            group: GroupId::new(group).unwrap(),
            dests: DestSet::from_bits(bits),
        }
    }

    #[test]
    fn test_actions_keep_command_line_order() {
        let commands = ordered(&["-d", "0", "-s", "0:0", "-s", "1:5", "-p", "-d", "1", "-s", "0:0xffff", "-p"]).unwrap();
        assert_eq!(
            commands,
            vec![
                LbCommand::SelectDevice(DeviceId::new(0).unwrap()),
                set_mask(0, 0),
                set_mask(1, 5),
                LbCommand::Print,
                LbCommand::SelectDevice(DeviceId::new(1).unwrap()),
                set_mask(0, 0xffff),
                LbCommand::Print,
            ]
        );
    }

    #[test]
    fn test_clear_then_lists() {
        let commands = ordered(&["-c", "-S", "0:0,1,2", "--list", "1:3,4,5"]).unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], LbCommand::Clear);
        assert_eq!(
            commands[2],
            LbCommand::SetList {
                group: GroupId::new(1).unwrap(),
                dests: DestSet::from_bits(0b111000),
            }
        );
    }

    #[test]
    fn test_invalid_argument_anywhere_rejects_all() {
        let err = ordered(&["-s", "0:1", "-S", "1:40"]).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_leftmost_error_reported() {
        let err = ordered(&["-S", "1:40", "-s", "99:1"]).unwrap_err();
        assert!(err.to_string().contains("destination ID (40)"));
    }

    #[test]
    fn test_options_only_is_usage_error() {
        let err = ordered(&["--platform", "state.json"]).unwrap_err();
        assert!(matches!(err, ToolError::Usage { .. }));
    }

    #[test]
    fn test_flag_with_value_rejected() {
        assert!(ordered(&["--print=yes"]).unwrap_err().is_input_error());
        assert_eq!(ordered(&["-p", "-p"]).unwrap(), vec![LbCommand::Print, LbCommand::Print]);
    }

    #[test]
    fn test_stray_positional_rejected() {
        assert!(LbArgs::try_parse_ordered(["nfm-lb", "-p", "extra"]).is_err());
    }

    #[test]
    fn test_get_ports_args() {
        let args = GetPortsArgs::try_parse_from(["nfm-get-ports", "-i", "0x3", "-D", "1", "-D", "2"]).unwrap();
        assert_eq!(args.host_dest, HostDestId::new(3).unwrap());
        assert_eq!(args.devices, vec![DeviceId::new(1).unwrap(), DeviceId::new(2).unwrap()]);

        assert!(GetPortsArgs::try_parse_from(["nfm-get-ports", "-i", "32"]).is_err());
        assert!(GetPortsArgs::try_parse_from(["nfm-get-ports"]).is_err());
    }

    #[test]
    fn test_lb_command_definition() {
        LbArgs::command().debug_assert();
        GetPortsArgs::command().debug_assert();
    }
}
