//! Bounded identifiers.
//!
//! Every identifier the tools handle is a small integer with a hard upper
//! bound imposed by the hardware. Wrapping them in distinct types keeps a
//! group index from being passed where a destination id is expected.

use crate::{codec, ParseError, ParseResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_bounded_id {
    ($(#[$meta:meta])* $name:ident, $count:expr, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "u32", into = "u32")]
        pub struct $name(u8);

        impl $name {
            /// Number of valid ids; valid values are `0..COUNT`.
            pub const COUNT: u32 = $count;

            /// Creates an id, rejecting values outside `0..COUNT`.
            pub fn new(id: u32) -> ParseResult<Self> {
                match u8::try_from(id) {
                    Ok(raw) if id < Self::COUNT => Ok(Self(raw)),
                    _ => Err(ParseError::out_of_range($what, id, u64::from(Self::COUNT - 1))),
                }
            }

            /// Returns the id as a table index.
            pub const fn index(&self) -> usize {
                self.0 as usize
            }

            /// Returns the raw id.
            pub const fn as_u32(&self) -> u32 {
                self.0 as u32
            }

            /// Iterates over every valid id in ascending order.
            pub fn all() -> impl Iterator<Item = Self> {
                (0..Self::COUNT).filter_map(|id| Self::new(id).ok())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            /// Accepts decimal or `0x`-prefixed hexadecimal.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(codec::parse_number(s)?)
            }
        }

        impl TryFrom<u32> for $name {
            type Error = ParseError;

            fn try_from(id: u32) -> Result<Self, Self::Error> {
                Self::new(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> u32 {
                id.as_u32()
            }
        }
    };
}

define_bounded_id!(
    /// One flow processor card in the platform (0-3).
    DeviceId,
    crate::MAX_DEVICES as u32,
    "device"
);

define_bounded_id!(
    /// Load-balance group index (0-23), also called an LGID.
    GroupId,
    crate::NUM_LOAD_BALANCE_GROUPS as u32,
    "group ID"
);

define_bounded_id!(
    /// Host-side receive destination (queue or core), 0-31.
    HostDestId,
    crate::NUM_HOST_DESTS as u32,
    "destination ID"
);

impl Default for DeviceId {
    fn default() -> Self {
        DeviceId(0)
    }
}
