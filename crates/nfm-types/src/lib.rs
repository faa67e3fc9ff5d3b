//! Common types for the NFM load-balance and forwarding tools.
//!
//! This crate provides type-safe representations of the small integer
//! identifiers and bitmasks the network flow processor works with:
//!
//! - [`DeviceId`]: one of up to four flow processor cards (0-3)
//! - [`GroupId`]: a load-balance group index (0-23)
//! - [`HostDestId`]: a host-side receive destination (0-31)
//! - [`DestSet`] / [`LgidSet`]: fixed-width bit-sets over those ids
//! - [`VlanId`] / [`VlanTag`]: IEEE 802.1Q classification of a logical interface
//!
//! The [`codec`] module converts between the textual forms accepted on the
//! command line and the canonical 32-bit destination mask.

mod bitset;
pub mod codec;
mod ids;
mod vlan;

pub use bitset::{BitSet32, DestSet, LgidSet, SetMember};
pub use codec::{format_mask, parse_bitmask, parse_list, parse_number, MaskListing};
pub use ids::{DeviceId, GroupId, HostDestId};
pub use vlan::{VlanId, VlanTag};

/// Number of load-balance groups held by every device.
pub const NUM_LOAD_BALANCE_GROUPS: usize = 24;

/// Number of host destinations addressable by a destination mask.
pub const NUM_HOST_DESTS: usize = 32;

/// Maximum number of flow processor devices in one platform.
pub const MAX_DEVICES: usize = 4;

/// Result type for parsing and validation.
pub type ParseResult<T> = Result<T, ParseError>;

/// Common error type for parsing failures.
///
/// Both variants are caller input errors: they are detected locally,
/// before any device is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid format '{input}': {reason}")]
    InvalidFormat { input: String, reason: &'static str },

    #[error("invalid {what} ({value}) specified, valid values are 0-{max}")]
    OutOfRange {
        what: &'static str,
        value: String,
        max: u64,
    },
}

impl ParseError {
    pub(crate) fn invalid_format(input: impl Into<String>, reason: &'static str) -> Self {
        ParseError::InvalidFormat {
            input: input.into(),
            reason,
        }
    }

    pub(crate) fn out_of_range(what: &'static str, value: impl ToString, max: u64) -> Self {
        ParseError::OutOfRange {
            what,
            value: value.to_string(),
            max,
        }
    }
}
