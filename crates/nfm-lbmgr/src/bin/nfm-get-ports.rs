//! nfm-get-ports - lists the interfaces feeding a host destination

use clap::Parser;
use std::process::ExitCode;
use tracing::debug;

use nfm_lbmgr::{GetPortsArgs, RuleCrossReferencer};
use nfm_tool_common::{logging, PlatformFile, ToolConfig};

fn run(args: GetPortsArgs) -> anyhow::Result<()> {
    let config = ToolConfig::resolve(args.config.as_deref())?;
    logging::init(args.loglevel.as_deref().unwrap_or(&config.log_level));

    let devices = if args.devices.is_empty() {
        config.search_devices.clone()
    } else {
        args.devices.clone()
    };
    debug!("Searching devices {:?} for host dest {}", devices, args.host_dest);

    let state_path = args.platform.clone().unwrap_or(config.platform_state);
    let state = PlatformFile::open(state_path)?;
    let platform = state.platform();

    let xref = RuleCrossReferencer::new(&platform, config.rules_queue.as_str());
    let report = xref.interfaces_for(args.host_dest, &devices)?;
    if report.is_ambiguous() {
        eprintln!("Warning: host dest {} is in more than one load balance group", args.host_dest);
    }
    print!("{}", report);
    Ok(())
}

fn main() -> ExitCode {
    match run(GetPortsArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
