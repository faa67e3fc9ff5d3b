//! Fixed-width bit-sets over bounded ids.
//!
//! The device stores load-balance group membership, and a rule stores the
//! groups it feeds, as raw 32-bit masks. [`BitSet32`] wraps such a mask and
//! gives it named operations so callers never shift bits by hand.

use crate::ids::{GroupId, HostDestId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::ops::BitOr;

/// An id that can be a member of a [`BitSet32`].
pub trait SetMember: Copy + 'static {
    /// Converts the id to its bit position.
    fn bit(self) -> u32;

    /// Converts a bit position back into an id, if it is in range.
    fn from_bit(bit: u32) -> Option<Self>;
}

impl SetMember for HostDestId {
    fn bit(self) -> u32 {
        self.as_u32()
    }

    fn from_bit(bit: u32) -> Option<Self> {
        HostDestId::new(bit).ok()
    }
}

impl SetMember for GroupId {
    fn bit(self) -> u32 {
        self.as_u32()
    }

    fn from_bit(bit: u32) -> Option<Self> {
        GroupId::new(bit).ok()
    }
}

/// A set of ids backed by a single `u32` mask.
///
/// Bit *i* set means id *i* is a member. The raw mask is kept verbatim, so a
/// mask read from the device round-trips even if it carries bits above the
/// id range; such bits are never yielded by [`BitSet32::iter_members`].
#[derive(Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BitSet32<T: SetMember> {
    bits: u32,
    _marker: PhantomData<T>,
}

/// Destinations of one load-balance group.
pub type DestSet = BitSet32<HostDestId>;

/// Load-balance groups referenced by a forwarding rule.
pub type LgidSet = BitSet32<GroupId>;

impl<T: SetMember> BitSet32<T> {
    /// The empty set.
    pub const EMPTY: Self = Self {
        bits: 0,
        _marker: PhantomData,
    };

    /// Wraps a raw mask.
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            _marker: PhantomData,
        }
    }

    /// Returns the raw mask.
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.iter_members().count()
    }

    pub fn contains(&self, id: T) -> bool {
        self.bits & (1 << id.bit()) != 0
    }

    pub fn insert(&mut self, id: T) {
        self.bits |= 1 << id.bit();
    }

    pub fn remove(&mut self, id: T) {
        self.bits &= !(1 << id.bit());
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self::from_bits(self.bits | other.bits)
    }

    /// Members in ascending order.
    pub fn iter_members(&self) -> impl Iterator<Item = T> + '_ {
        (0..u32::BITS)
            .filter(move |bit| self.bits & (1 << bit) != 0)
            .filter_map(T::from_bit)
    }
}

impl<T: SetMember> Clone for BitSet32<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: SetMember> Copy for BitSet32<T> {}

impl<T: SetMember> PartialEq for BitSet32<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<T: SetMember> Eq for BitSet32<T> {}

impl<T: SetMember> Default for BitSet32<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T: SetMember> fmt::Debug for BitSet32<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitSet32(0x{:08x})", self.bits)
    }
}

impl<T: SetMember> fmt::Display for BitSet32<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.bits)
    }
}

impl<T: SetMember> From<u32> for BitSet32<T> {
    fn from(bits: u32) -> Self {
        Self::from_bits(bits)
    }
}

impl<T: SetMember> From<BitSet32<T>> for u32 {
    fn from(set: BitSet32<T>) -> u32 {
        set.bits
    }
}

impl<T: SetMember> BitOr for BitSet32<T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl<T: SetMember> FromIterator<T> for BitSet32<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for id in iter {
            set.insert(id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dest(id: u32) -> HostDestId {
        HostDestId::new(id).unwrap()
    }

    #[test]
    fn test_insert_contains_remove() {
        let mut set = DestSet::EMPTY;
        assert!(set.is_empty());
        set.insert(dest(0));
        set.insert(dest(31));
        assert!(set.contains(dest(0)));
        assert!(set.contains(dest(31)));
        assert!(!set.contains(dest(5)));
        assert_eq!(set.bits(), 0x8000_0001);
        set.remove(dest(0));
        assert_eq!(set.bits(), 0x8000_0000);
    }

    #[test]
    fn test_iter_members_ascending() {
        let set = DestSet::from_bits(0b1010_0110);
        let members: Vec<u32> = set.iter_members().map(|d| d.as_u32()).collect();
        assert_eq!(members, vec![1, 2, 5, 7]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_lgid_set_ignores_bits_above_range() {
        let set = LgidSet::from_bits(0xff00_0001);
        let members: Vec<u32> = set.iter_members().map(|g| g.as_u32()).collect();
        assert_eq!(members, vec![0]);
        assert_eq!(set.bits(), 0xff00_0001);
    }

    #[test]
    fn test_union_and_collect() {
        let a: DestSet = [dest(0), dest(1)].into_iter().collect();
        let b: DestSet = [dest(1), dest(4)].into_iter().collect();
        assert_eq!((a | b).bits(), 0b1_0011);
        assert_eq!(a.union(b), a | b);
    }

    #[test]
    fn test_serde_as_raw_mask() {
        let set = DestSet::from_bits(0x3f);
        assert_eq!(serde_json::to_string(&set).unwrap(), "63");
        let back: DestSet = serde_json::from_str("63").unwrap();
        assert_eq!(back, set);
    }
}
