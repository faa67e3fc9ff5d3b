//! Safe Rust interfaces to the NFM flow processor services.
//!
//! The flow processor SDK exposes three services the tools drive:
//!
//! - the load-balance group store ([`api::LoadBalanceApi`]), 24 destination
//!   masks per device;
//! - the rules daemon ([`api::RulesApi`]), an ordered table of forwarding
//!   rules read through a cursor;
//! - the forwarding configuration subsystem ([`api::ForwardingSubsystem`]),
//!   which stages domains and logical interfaces and commits them to
//!   hardware.
//!
//! Every call returns an [`NfmResult`]; vendor status codes are carried in
//! [`NfmError`] so a diagnostic can show the code, subcode and message.
//!
//! [`sim::SimPlatform`] implements all three services in-process. It backs
//! the command line tools when no hardware is present and is the fixture
//! used by the tests.
//!
//! # Example
//!
//! ```
//! use nfm_api::api::LoadBalanceApi;
//! use nfm_api::sim::SimPlatform;
//! use nfm_types::{DestSet, DeviceId, GroupId};
//!
//! let mut platform = SimPlatform::new();
//! let dev = DeviceId::new(0).unwrap();
//! platform
//!     .set_group_mask(dev, GroupId::new(3).unwrap(), DestSet::from_bits(0x3f))
//!     .unwrap();
//! assert_eq!(platform.get_group_masks(dev).unwrap()[3].bits(), 0x3f);
//! ```

pub mod api;
pub mod error;
pub mod sim;
pub mod types;

pub use error::{NfmError, NfmResult, NfmStatus};
pub use types::{DomainId, DomainMode, FrameType, InterfaceId, IntfKind, LogIntfId, PhysPortId};
