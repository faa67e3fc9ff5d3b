//! Rules daemon access.
//!
//! A client opens a [`RuleSession`] against one device, then walks the rule
//! table with a [`RuleCursor`]. Sessions and cursors release their daemon
//! resources when dropped.

use crate::error::NfmResult;
use crate::types::InterfaceId;
use nfm_types::{DeviceId, LgidSet};
use serde::{Deserialize, Serialize};

/// Order in which a cursor visits the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorOrder {
    /// Ascending rule priority.
    #[default]
    Priority,
    /// The order rules were added in.
    Insertion,
}

/// The interface a rule's key matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddrSpaceBinding {
    /// Bound interface.
    pub id: InterfaceId,
    /// False when the key wildcards the interface.
    pub care: bool,
}

/// One forwarding rule as read back from the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub priority: u32,
    /// Load-balance groups the rule's action feeds.
    pub lgids: LgidSet,
    pub addr_space: AddrSpaceBinding,
}

impl Rule {
    pub fn new(name: impl Into<String>, priority: u32, lgids: LgidSet, addr_space: AddrSpaceBinding) -> Self {
        Self {
            name: name.into(),
            priority,
            lgids,
            addr_space,
        }
    }

    /// Groups referenced by the rule's action.
    pub fn lgids(&self) -> LgidSet {
        self.lgids
    }

    /// Interface binding of the rule's key.
    pub fn addr_space_id(&self) -> AddrSpaceBinding {
        self.addr_space
    }
}

/// Entry point to the rules daemon.
pub trait RulesApi {
    /// Opens a session on `device`, identified to the daemon by `queue_name`.
    fn rules_open(&self, device: DeviceId, queue_name: &str) -> NfmResult<Box<dyn RuleSession + '_>>;
}

/// An open connection to the rules daemon for one device.
pub trait RuleSession {
    fn device(&self) -> DeviceId;

    /// Opens a read cursor over the device's rule table.
    fn open_cursor(&mut self, order: CursorOrder) -> NfmResult<Box<dyn RuleCursor + '_>>;
}

/// Sequential reader over a rule table.
pub trait RuleCursor {
    /// Reads the next rule, `Ok(None)` at the end of the table.
    fn read(&mut self) -> NfmResult<Option<Rule>>;
}
