//! nfm-lbmgr - load-balance group tools
//!
//! Configures the load-balance groups of flow processor devices and cross
//! references them with the rule table to find which interfaces feed a
//! host destination.

mod cli;
mod commands;
mod group_mgr;
mod xref;

pub use cli::*;
pub use commands::LbCommand;
pub use group_mgr::{GroupConfigurator, GroupListing};
pub use xref::{DeviceXref, RuleCrossReferencer, XrefReport};
