//! nfm-lb - load balance group configuration tool

use std::io::{self, Write};
use std::process::ExitCode;
use tracing::info;

use nfm_lbmgr::{lb_commands, GroupConfigurator, LbArgs};
use nfm_tool_common::{logging, PlatformFile, ToolConfig};

fn run(args: &LbArgs, matches: &clap::ArgMatches) -> anyhow::Result<()> {
    let config = ToolConfig::resolve(args.config.as_deref())?;
    logging::init(&config.log_level);

    // Validate the whole command line before touching any device.
    let commands = lb_commands(matches)?;

    let state_path = args.platform.clone().unwrap_or(config.platform_state);
    let state = PlatformFile::open(state_path)?;
    let mut mgr = GroupConfigurator::new(state.platform());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = mgr.run(&commands, &mut out);
    out.flush()?;

    let applied = state.finish(outcome)?;
    info!("nfm-lb applied {} actions", applied);
    Ok(())
}

fn main() -> ExitCode {
    let (args, matches) = match LbArgs::try_parse_ordered(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(e) => e.exit(),
    };

    match run(&args, &matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
