//! Forwarding and rule object identifiers.
//!
//! Domain, logical interface and physical port ids are chosen by the caller
//! and only meaningful to the forwarding subsystem. Each gets its own type so
//! the configurator cannot attach a port number where a logical interface is
//! expected.

use nfm_types::{codec, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_object_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            pub const fn as_u32(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                codec::parse_number(s).map(Self)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

define_object_id!(
    /// Forwarding domain (bridge or router) id.
    DomainId
);
define_object_id!(
    /// Logical interface id.
    LogIntfId
);
define_object_id!(
    /// Physical port number as reported by the platform.
    PhysPortId
);
define_object_id!(
    /// Interface a forwarding rule is bound to (its address-space id).
    InterfaceId
);

/// Forwarding mode of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainMode {
    /// Layer 2 bridging.
    #[default]
    L2,
    /// Layer 3 routing.
    L3,
}

impl fmt::Display for DomainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainMode::L2 => write!(f, "L2"),
            DomainMode::L3 => write!(f, "L3"),
        }
    }
}

/// Kind of interface addressed by per-interface settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntfKind {
    Logical,
    Physical,
}

/// Frame type of an interface, as a platform code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameType(u32);

impl FrameType {
    /// Ethernet II framing, the platform default.
    pub const ETHERNET_II: FrameType = FrameType(0);

    pub const fn new(code: u32) -> Self {
        FrameType(code)
    }

    pub const fn code(&self) -> u32 {
        self.0
    }

    pub fn is_default(&self) -> bool {
        *self == Self::ETHERNET_II
    }
}

impl Default for FrameType {
    fn default() -> Self {
        Self::ETHERNET_II
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FrameType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::parse_number(s).map(FrameType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_parse() {
        assert_eq!("9".parse::<DomainId>().unwrap(), DomainId::new(9));
        assert_eq!("0xb".parse::<PhysPortId>().unwrap().as_u32(), 11);
        assert!("lif1".parse::<LogIntfId>().is_err());
    }

    #[test]
    fn test_frame_type_default() {
        assert!(FrameType::default().is_default());
        assert!(!"2".parse::<FrameType>().unwrap().is_default());
    }

    #[test]
    fn test_domain_mode_display() {
        assert_eq!(DomainMode::L2.to_string(), "L2");
        assert_eq!(DomainMode::L3.to_string(), "L3");
    }
}
