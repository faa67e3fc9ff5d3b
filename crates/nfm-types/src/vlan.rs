//! VLAN classification of logical interfaces.

use crate::{codec, ParseError, ParseResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// IEEE 802.1Q VLAN identifier (1-4094).
///
/// VLAN 0 means "untagged" on the command line and 4095 is reserved, so
/// neither is a valid [`VlanId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    /// Minimum valid VLAN ID.
    pub const MIN: u16 = 1;

    /// Maximum valid VLAN ID.
    pub const MAX: u16 = 4094;

    /// Creates a new VLAN ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the VLAN ID is not in the valid range (1-4094).
    pub fn new(id: u16) -> ParseResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&id) {
            Ok(VlanId(id))
        } else {
            Err(ParseError::out_of_range("VLAN ID", id, u64::from(Self::MAX)))
        }
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = ParseError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        VlanId::new(id)
    }
}

impl From<VlanId> for u16 {
    fn from(vlan: VlanId) -> u16 {
        vlan.0
    }
}

/// How a logical interface classifies frames arriving on its physical port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VlanTag {
    /// Untagged frames only.
    #[default]
    Untagged,
    /// Frames carrying this customer VLAN tag.
    CVlan(VlanId),
}

impl VlanTag {
    /// Builds a tag from a raw id where 0 means untagged.
    pub fn from_raw(id: u16) -> ParseResult<Self> {
        if id == 0 {
            Ok(VlanTag::Untagged)
        } else {
            VlanId::new(id).map(VlanTag::CVlan)
        }
    }

    /// Returns the VLAN id, or 0 when untagged.
    pub const fn raw(&self) -> u16 {
        match self {
            VlanTag::Untagged => 0,
            VlanTag::CVlan(vlan) => vlan.as_u16(),
        }
    }

    pub const fn is_tagged(&self) -> bool {
        matches!(self, VlanTag::CVlan(_))
    }
}

impl fmt::Display for VlanTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VlanTag::Untagged => write!(f, "untagged"),
            VlanTag::CVlan(vlan) => write!(f, "vlan {}", vlan),
        }
    }
}

impl FromStr for VlanTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = codec::parse_number(s)?;
        let id = u16::try_from(raw)
            .map_err(|_| ParseError::out_of_range("VLAN ID", raw, u64::from(VlanId::MAX)))?;
        VlanTag::from_raw(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_vlan_ids() {
        assert!(VlanId::new(1).is_ok());
        assert!(VlanId::new(4094).is_ok());
        assert!(VlanId::new(0).is_err());
        assert!(VlanId::new(4095).is_err());
    }

    #[test]
    fn test_tag_from_raw() {
        assert_eq!(VlanTag::from_raw(0).unwrap(), VlanTag::Untagged);
        assert_eq!(
            VlanTag::from_raw(100).unwrap(),
            VlanTag::CVlan(VlanId::new(100).unwrap())
        );
        assert!(VlanTag::from_raw(4095).is_err());
    }

    #[test]
    fn test_tag_parse() {
        assert_eq!("0".parse::<VlanTag>().unwrap(), VlanTag::Untagged);
        assert_eq!("0x64".parse::<VlanTag>().unwrap().raw(), 100);
        assert!("70000".parse::<VlanTag>().is_err());
        assert!("vlan".parse::<VlanTag>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(VlanTag::Untagged.to_string(), "untagged");
        assert_eq!(VlanTag::from_raw(7).unwrap().to_string(), "vlan 7");
    }
}
