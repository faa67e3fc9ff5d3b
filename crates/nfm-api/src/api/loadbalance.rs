//! Load-balance group store.
//!
//! Each device holds [`NUM_LOAD_BALANCE_GROUPS`] groups; a group is a
//! destination mask. Writes replace a group's mask wholesale. There is no
//! per-bit update, so incremental changes are read-modify-write.

use crate::error::NfmResult;
use nfm_types::{DestSet, DeviceId, GroupId, NUM_LOAD_BALANCE_GROUPS};

/// All group masks of one device, indexed by [`GroupId::index`].
pub type GroupTable = [DestSet; NUM_LOAD_BALANCE_GROUPS];

/// Access to the per-device load-balance group masks.
pub trait LoadBalanceApi {
    /// Reads every group mask of `device`.
    fn get_group_masks(&self, device: DeviceId) -> NfmResult<GroupTable>;

    /// Replaces a single group's mask.
    fn set_group_mask(&mut self, device: DeviceId, group: GroupId, dests: DestSet)
        -> NfmResult<()>;

    /// Replaces every group mask of `device` in one call.
    fn set_all_group_masks(&mut self, device: DeviceId, table: &GroupTable) -> NfmResult<()>;

    /// Writes the empty mask to every group of `device`.
    fn clear_all_groups(&mut self, device: DeviceId) -> NfmResult<()> {
        self.set_all_group_masks(device, &[DestSet::EMPTY; NUM_LOAD_BALANCE_GROUPS])
    }
}
