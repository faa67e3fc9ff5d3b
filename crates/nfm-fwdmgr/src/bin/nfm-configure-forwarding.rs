//! nfm-configure-forwarding - forwarding domain configuration tool

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

use nfm_fwdmgr::{ForwardingArgs, ForwardingConfigurator};
use nfm_tool_common::{logging, PlatformFile, ToolConfig};

fn run(args: ForwardingArgs) -> anyhow::Result<()> {
    let config = ToolConfig::resolve(args.config.as_deref())?;
    logging::init(args.loglevel.as_deref().unwrap_or(&config.log_level));

    let plan = args.plan()?;

    let state_path = args.platform.clone().unwrap_or(config.platform_state);
    let state = PlatformFile::open(state_path)?;
    let mut mgr = ForwardingConfigurator::new(state.platform());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = mgr.apply(&plan, &mut out);
    out.flush()?;

    state.finish(outcome)?;
    Ok(())
}

fn main() -> ExitCode {
    match run(ForwardingArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
