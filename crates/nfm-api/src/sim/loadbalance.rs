use super::{SimOp, SimPlatform};
use crate::api::{GroupTable, LoadBalanceApi};
use crate::error::NfmResult;
use nfm_types::{DestSet, DeviceId, GroupId};

impl LoadBalanceApi for SimPlatform {
    fn get_group_masks(&self, device: DeviceId) -> NfmResult<GroupTable> {
        let mut state = self.inner.lock();
        state.begin(SimOp::GetGroupMasks { device })?;
        Ok(state.device(device)?.groups)
    }

    fn set_group_mask(&mut self, device: DeviceId, group: GroupId, dests: DestSet) -> NfmResult<()> {
        let mut state = self.inner.lock();
        state.begin(SimOp::SetGroupMask { device, group })?;
        state.device_mut(device)?.groups[group.index()] = dests;
        Ok(())
    }

    fn set_all_group_masks(&mut self, device: DeviceId, table: &GroupTable) -> NfmResult<()> {
        let mut state = self.inner.lock();
        state.begin(SimOp::SetAllGroupMasks { device })?;
        state.device_mut(device)?.groups = *table;
        Ok(())
    }
}
