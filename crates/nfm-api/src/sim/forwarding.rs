use super::{SimOp, SimPlatform};
use crate::api::{ForwardingHandle, ForwardingSubsystem};
use crate::error::{NfmError, NfmResult};
use crate::types::{DomainId, DomainMode, FrameType, IntfKind, LogIntfId, PhysPortId};
use nfm_types::VlanTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration of one logical interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogIntfState {
    pub port: PhysPortId,
    pub vlan: VlanTag,
    pub addr_space: Option<u32>,
    pub domain: Option<DomainId>,
    pub mtu: Option<u32>,
    #[serde(default)]
    pub frame_type: FrameType,
    pub l3ex_ratelim: Option<u32>,
}

impl LogIntfState {
    fn new(port: PhysPortId, vlan: VlanTag) -> Self {
        Self {
            port,
            vlan,
            addr_space: None,
            domain: None,
            mtu: None,
            frame_type: FrameType::ETHERNET_II,
            l3ex_ratelim: None,
        }
    }
}

/// Domains and logical interfaces, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingTables {
    pub domains: BTreeMap<u32, DomainMode>,
    pub lifs: BTreeMap<u32, LogIntfState>,
}

impl ForwardingTables {
    pub fn lif(&self, lif: LogIntfId) -> Option<&LogIntfState> {
        self.lifs.get(&lif.as_u32())
    }

    fn lif_mut(&mut self, lif: LogIntfId) -> NfmResult<&mut LogIntfState> {
        self.lifs
            .get_mut(&lif.as_u32())
            .ok_or_else(|| NfmError::not_found(format!("logical interface {}", lif)))
    }

    /// Logical interfaces attached to `domain`, in id order.
    pub fn members(&self, domain: DomainId) -> Vec<LogIntfId> {
        self.lifs
            .iter()
            .filter(|(_, state)| state.domain == Some(domain))
            .map(|(id, _)| LogIntfId::new(*id))
            .collect()
    }
}

/// Active forwarding configuration plus commit bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingState {
    pub active: ForwardingTables,
    pub commits: u32,
}

impl ForwardingSubsystem for SimPlatform {
    type Handle = SimForwardingHandle;

    fn open_platform(&self) -> NfmResult<SimForwardingHandle> {
        let mut state = self.inner.lock();
        state.begin(SimOp::FwdOpen)?;
        Ok(SimForwardingHandle {
            platform: self.clone(),
            staged: state.platform.forwarding.active.clone(),
        })
    }
}

/// Forwarding session on a [`SimPlatform`].
///
/// Structural changes are made to a private staged copy of the tables and
/// become visible on the platform only at commit.
#[derive(Debug)]
pub struct SimForwardingHandle {
    platform: SimPlatform,
    staged: ForwardingTables,
}

impl SimForwardingHandle {
    fn begin(&self, op: SimOp) -> NfmResult<()> {
        self.platform.inner.lock().begin(op)
    }

    fn check_logical(kind: IntfKind) -> NfmResult<()> {
        match kind {
            IntfKind::Logical => Ok(()),
            IntfKind::Physical => Err(NfmError::invalid_parameter(
                "physical interface settings are not supported",
            )),
        }
    }

    /// Applies `update` to a committed interface, in both the active and
    /// staged tables.
    fn tune_committed(
        &mut self,
        lif: LogIntfId,
        update: impl Fn(&mut LogIntfState),
    ) -> NfmResult<()> {
        let mut state = self.platform.inner.lock();
        let active = state
            .platform
            .forwarding
            .active
            .lifs
            .get_mut(&lif.as_u32())
            .ok_or_else(|| NfmError::not_found(format!("logical interface {} is not committed", lif)))?;
        update(active);
        if let Some(staged) = self.staged.lifs.get_mut(&lif.as_u32()) {
            update(staged);
        }
        Ok(())
    }
}

impl ForwardingHandle for SimForwardingHandle {
    fn clear(&mut self) -> NfmResult<()> {
        self.begin(SimOp::FwdClear)?;
        self.staged = ForwardingTables::default();
        Ok(())
    }

    fn configure_domain(&mut self, domain: DomainId, mode: DomainMode) -> NfmResult<()> {
        self.begin(SimOp::ConfigureDomain { domain })?;
        self.staged.domains.insert(domain.as_u32(), mode);
        Ok(())
    }

    fn configure_log_intf(&mut self, lif: LogIntfId, port: PhysPortId, vlan: VlanTag) -> NfmResult<()> {
        self.begin(SimOp::ConfigureLogIntf { lif })?;
        self.staged
            .lifs
            .insert(lif.as_u32(), LogIntfState::new(port, vlan));
        Ok(())
    }

    fn intf_set_addr_space(&mut self, kind: IntfKind, lif: LogIntfId, addr_space: u32) -> NfmResult<()> {
        self.begin(SimOp::SetAddrSpace { lif })?;
        Self::check_logical(kind)?;
        self.staged.lif_mut(lif)?.addr_space = Some(addr_space);
        Ok(())
    }

    fn attach_log_intf(&mut self, domain: DomainId, lif: LogIntfId) -> NfmResult<()> {
        self.begin(SimOp::AttachLogIntf { domain, lif })?;
        if !self.staged.domains.contains_key(&domain.as_u32()) {
            return Err(NfmError::not_found(format!("domain {}", domain)));
        }
        self.staged.lif_mut(lif)?.domain = Some(domain);
        Ok(())
    }

    fn commit(&mut self) -> NfmResult<()> {
        let mut state = self.platform.inner.lock();
        state.begin(SimOp::Commit)?;
        state.platform.forwarding.active = self.staged.clone();
        state.platform.forwarding.commits += 1;
        Ok(())
    }

    fn intf_set_mtu(&mut self, kind: IntfKind, lif: LogIntfId, mtu: u32) -> NfmResult<()> {
        self.begin(SimOp::SetMtu { lif })?;
        Self::check_logical(kind)?;
        if mtu == 0 {
            return Err(NfmError::invalid_parameter("MTU must be non-zero"));
        }
        self.tune_committed(lif, |state| state.mtu = Some(mtu))
    }

    fn intf_set_frame_type(&mut self, kind: IntfKind, lif: LogIntfId, frame_type: FrameType) -> NfmResult<()> {
        self.begin(SimOp::SetFrameType { lif })?;
        Self::check_logical(kind)?;
        self.tune_committed(lif, |state| state.frame_type = frame_type)
    }

    fn intf_set_l3ex_ratelim(&mut self, lif: LogIntfId, limit: u32) -> NfmResult<()> {
        self.begin(SimOp::SetL3exRateLimit { lif })?;
        self.tune_committed(lif, |state| state.l3ex_ratelim = Some(limit))
    }

    fn intf_get_l3ex_ratelim(&self, lif: LogIntfId) -> NfmResult<u32> {
        let mut state = self.platform.inner.lock();
        state.begin(SimOp::GetL3exRateLimit { lif })?;
        state
            .platform
            .forwarding
            .active
            .lif(lif)
            .ok_or_else(|| NfmError::not_found(format!("logical interface {} is not committed", lif)))
            .map(|lif| lif.l3ex_ratelim.unwrap_or(0))
    }

    fn close(self) -> NfmResult<()> {
        self.begin(SimOp::FwdClose)
    }
}
