//! nfm-fwdmgr - forwarding domain configuration
//!
//! Creates an L2 or L3 forwarding domain, maps physical ports (optionally
//! VLAN-classified) to logical interfaces attached to it, and commits the
//! result to every card in the platform.

mod cli;
mod fwd_mgr;
mod types;

pub use cli::ForwardingArgs;
pub use fwd_mgr::{ForwardingConfigurator, ForwardingReport, Stage};
pub use types::*;
