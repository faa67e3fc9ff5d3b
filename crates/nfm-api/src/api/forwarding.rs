//! Forwarding configuration subsystem.
//!
//! Changes made through a [`ForwardingHandle`] are staged until
//! [`ForwardingHandle::commit`] pushes them to hardware. Per-interface
//! tuning (MTU, frame type, rate limits) applies to committed interfaces
//! only.

use crate::error::NfmResult;
use crate::types::{DomainId, DomainMode, FrameType, IntfKind, LogIntfId, PhysPortId};
use nfm_types::VlanTag;

/// A platform whose forwarding configuration can be opened.
pub trait ForwardingSubsystem {
    type Handle: ForwardingHandle;

    /// Opens the forwarding configuration of every card in the platform.
    fn open_platform(&self) -> NfmResult<Self::Handle>;
}

/// An open forwarding configuration session.
pub trait ForwardingHandle {
    /// Removes every logical interface, bridge and router.
    fn clear(&mut self) -> NfmResult<()>;

    /// Creates a domain with a caller-chosen id.
    fn configure_domain(&mut self, domain: DomainId, mode: DomainMode) -> NfmResult<()>;

    /// Binds a logical interface to a physical port and VLAN classification.
    fn configure_log_intf(&mut self, lif: LogIntfId, port: PhysPortId, vlan: VlanTag)
        -> NfmResult<()>;

    fn intf_set_addr_space(&mut self, kind: IntfKind, lif: LogIntfId, addr_space: u32)
        -> NfmResult<()>;

    /// Attaches a logical interface to a domain, detaching it from any other.
    fn attach_log_intf(&mut self, domain: DomainId, lif: LogIntfId) -> NfmResult<()>;

    /// Pushes the staged configuration to hardware.
    fn commit(&mut self) -> NfmResult<()>;

    fn intf_set_mtu(&mut self, kind: IntfKind, lif: LogIntfId, mtu: u32) -> NfmResult<()>;

    fn intf_set_frame_type(&mut self, kind: IntfKind, lif: LogIntfId, frame_type: FrameType)
        -> NfmResult<()>;

    /// Sets the L3 exception path rate limit of a logical interface.
    fn intf_set_l3ex_ratelim(&mut self, lif: LogIntfId, limit: u32) -> NfmResult<()>;

    fn intf_get_l3ex_ratelim(&self, lif: LogIntfId) -> NfmResult<u32>;

    /// Releases the handle. Uncommitted changes are discarded.
    fn close(self) -> NfmResult<()>
    where
        Self: Sized;
}
