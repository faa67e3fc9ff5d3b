//! In-process simulation of a flow processor platform.
//!
//! [`SimPlatform`] implements every service trait in [`crate::api`] over
//! plain in-memory tables. It is cheap to clone; clones share state, so a
//! test can hand one clone to the code under test and inspect another.
//!
//! Every call is appended to a call log ([`SimOp`]) and can be made to fail
//! by registering a fault for that exact call with
//! [`SimPlatform::inject_fault`].

mod forwarding;
mod loadbalance;
mod persist;
mod rules;

pub use forwarding::{ForwardingState, ForwardingTables, LogIntfState, SimForwardingHandle};
pub use persist::StateFileError;

use crate::api::{GroupTable, Rule};
use crate::error::{NfmError, NfmResult};
use crate::types::{DomainId, LogIntfId};
use nfm_types::{DestSet, DeviceId, GroupId, MAX_DEVICES, NUM_LOAD_BALANCE_GROUPS};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// One call made against the simulated platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimOp {
    GetGroupMasks { device: DeviceId },
    SetGroupMask { device: DeviceId, group: GroupId },
    SetAllGroupMasks { device: DeviceId },
    RulesOpen { device: DeviceId },
    RulesOpenCursor { device: DeviceId },
    /// Read of the rule at `position` in cursor order.
    RuleRead { device: DeviceId, position: usize },
    RulesClose { device: DeviceId },
    FwdOpen,
    FwdClear,
    ConfigureDomain { domain: DomainId },
    ConfigureLogIntf { lif: LogIntfId },
    SetAddrSpace { lif: LogIntfId },
    AttachLogIntf { domain: DomainId, lif: LogIntfId },
    Commit,
    SetMtu { lif: LogIntfId },
    SetFrameType { lif: LogIntfId },
    SetL3exRateLimit { lif: LogIntfId },
    GetL3exRateLimit { lif: LogIntfId },
    FwdClose,
}

impl SimOp {
    /// True for calls made against the load-balance group store.
    pub fn is_load_balance(&self) -> bool {
        matches!(
            self,
            SimOp::GetGroupMasks { .. } | SimOp::SetGroupMask { .. } | SimOp::SetAllGroupMasks { .. }
        )
    }
}

/// State of one simulated device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Absent devices fail every call with `NS_NFM_NO_DEVICE`.
    pub present: bool,
    pub groups: GroupTable,
    /// Rule table in insertion order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            present: true,
            groups: [DestSet::EMPTY; NUM_LOAD_BALANCE_GROUPS],
            rules: Vec::new(),
        }
    }
}

/// Persistent state of the whole simulated platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformState {
    pub devices: Vec<DeviceState>,
    #[serde(default)]
    pub forwarding: ForwardingState,
}

impl Default for PlatformState {
    fn default() -> Self {
        Self {
            devices: vec![DeviceState::default(); MAX_DEVICES],
            forwarding: ForwardingState::default(),
        }
    }
}

#[derive(Debug, Default)]
struct SimState {
    platform: PlatformState,
    calls: Vec<SimOp>,
    faults: HashMap<SimOp, NfmError>,
}

impl SimState {
    /// Logs `op` and fails it if a fault is registered for it.
    fn begin(&mut self, op: SimOp) -> NfmResult<()> {
        debug!(?op, "sim call");
        let fault = self.faults.get(&op).cloned();
        self.calls.push(op);
        match fault {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn device(&self, device: DeviceId) -> NfmResult<&DeviceState> {
        match self.platform.devices.get(device.index()) {
            Some(dev) if dev.present => Ok(dev),
            _ => Err(NfmError::NoDevice { device }),
        }
    }

    fn device_mut(&mut self, device: DeviceId) -> NfmResult<&mut DeviceState> {
        match self.platform.devices.get_mut(device.index()) {
            Some(dev) if dev.present => Ok(dev),
            _ => Err(NfmError::NoDevice { device }),
        }
    }
}

/// Simulated flow processor platform.
#[derive(Debug, Clone, Default)]
pub struct SimPlatform {
    inner: Arc<Mutex<SimState>>,
}

impl SimPlatform {
    /// Creates a platform with four present, empty devices.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(platform: PlatformState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SimState {
                platform,
                ..SimState::default()
            })),
        }
    }

    /// Snapshot of the current platform state.
    pub fn state(&self) -> PlatformState {
        self.inner.lock().platform.clone()
    }

    /// Reads a device's group masks without logging a call.
    pub fn group_masks(&self, device: DeviceId) -> GroupTable {
        self.inner
            .lock()
            .platform
            .devices
            .get(device.index())
            .map(|dev| dev.groups)
            .unwrap_or([DestSet::EMPTY; NUM_LOAD_BALANCE_GROUPS])
    }

    /// Marks a device installed or absent.
    pub fn set_present(&self, device: DeviceId, present: bool) {
        let mut state = self.inner.lock();
        let devices = &mut state.platform.devices;
        if devices.len() <= device.index() {
            devices.resize_with(device.index() + 1, DeviceState::default);
        }
        devices[device.index()].present = present;
    }

    /// Appends a rule to a device's rule table.
    pub fn add_rule(&self, device: DeviceId, rule: Rule) {
        let mut state = self.inner.lock();
        let devices = &mut state.platform.devices;
        if devices.len() <= device.index() {
            devices.resize_with(device.index() + 1, DeviceState::default);
        }
        devices[device.index()].rules.push(rule);
    }

    /// Makes every future `op` call fail with `err`.
    pub fn inject_fault(&self, op: SimOp, err: NfmError) {
        self.inner.lock().faults.insert(op, err);
    }

    pub fn clear_faults(&self) {
        self.inner.lock().faults.clear();
    }

    /// Calls made so far, oldest first.
    pub fn calls(&self) -> Vec<SimOp> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Number of commits the forwarding subsystem has performed.
    pub fn commit_count(&self) -> u32 {
        self.inner.lock().platform.forwarding.commits
    }

    /// Active (committed) forwarding tables.
    pub fn forwarding(&self) -> ForwardingTables {
        self.inner.lock().platform.forwarding.active.clone()
    }
}
