//! Group configurator scenarios against the simulated platform.

use nfm_api::api::LoadBalanceApi;
use nfm_api::sim::{SimOp, SimPlatform};
use nfm_api::{NfmError, NfmStatus};
use nfm_lbmgr::{lb_commands, GroupConfigurator, LbArgs, LbCommand};
use nfm_tool_common::{PlatformFile, ToolError};
use nfm_types::{DestSet, DeviceId, GroupId};
use pretty_assertions::assert_eq;

fn dev(id: u32) -> DeviceId {
    DeviceId::new(id).unwrap()
}

fn group(id: u32) -> GroupId {
    GroupId::new(id).unwrap()
}

fn commands(args: &[&str]) -> Vec<LbCommand> {
    let argv = std::iter::once("nfm-lb").chain(args.iter().copied());
    let (_, matches) = LbArgs::try_parse_ordered(argv).unwrap();
    lb_commands(&matches).unwrap()
}

#[test]
fn test_clear_then_set_lists() {
    let mut sim = SimPlatform::new();
    sim.set_group_mask(dev(0), group(7), DestSet::from_bits(0xff00)).unwrap();

    let mut mgr = GroupConfigurator::new(sim.clone());
    mgr.run(&commands(&["-c", "-S", "0:0,1,2", "-S", "1:3,4,5"]), &mut Vec::new())
        .unwrap();

    let masks = sim.group_masks(dev(0));
    assert_eq!(masks[0].bits(), 0b111);
    assert_eq!(masks[1].bits(), 0b111000);
    assert!(masks[2..].iter().all(DestSet::is_empty));
}

#[test]
fn test_set_leaves_other_groups_alone() {
    let mut sim = SimPlatform::new();
    sim.set_group_mask(dev(0), group(0), DestSet::from_bits(0x1)).unwrap();
    sim.set_group_mask(dev(0), group(3), DestSet::from_bits(0x80)).unwrap();

    let mut mgr = GroupConfigurator::new(sim.clone());
    mgr.run(&commands(&["-s", "3:0x3f"]), &mut Vec::new()).unwrap();

    let masks = sim.group_masks(dev(0));
    assert_eq!(masks[3].bits(), 0x3f);
    assert_eq!(masks[0].bits(), 0x1);
}

#[test]
fn test_failed_sequence_keeps_earlier_changes() {
    let sim = SimPlatform::new();
    sim.inject_fault(
        SimOp::SetGroupMask {
            device: dev(0),
            group: group(1),
        },
        NfmError::from_status(NfmStatus::HardwareFault, 4),
    );

    let mut mgr = GroupConfigurator::new(sim.clone());
    let err = mgr
        .run(&commands(&["-s", "0:0x3f", "-s", "1:0x7", "-s", "2:0x1"]), &mut Vec::new())
        .unwrap_err();

    match &err {
        ToolError::Device { device, source, .. } => {
            assert_eq!(*device, dev(0));
            assert_eq!(source.subcode(), 4);
        }
        other => panic!("unexpected error: {other}"),
    }
    let masks = sim.group_masks(dev(0));
    assert_eq!(masks[0].bits(), 0x3f);
    assert!(masks[1].is_empty());
    assert!(masks[2].is_empty());
}

#[test]
fn test_device_selection_mid_sequence() {
    let sim = SimPlatform::new();
    let mut mgr = GroupConfigurator::new(sim.clone());
    let mut out = Vec::new();
    mgr.run(
        &commands(&["-d", "0", "-s", "0:0", "-s", "1:5", "-p", "-d", "1", "-s", "0:0xffff", "-p"]),
        &mut out,
    )
    .unwrap();

    assert_eq!(sim.group_masks(dev(0))[1].bits(), 5);
    assert_eq!(sim.group_masks(dev(1))[0].bits(), 0xffff);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Load balance group destinations for NFE 0\nGroup 0: No destinations defined\nGroup 1: 0 2\n"));
    assert!(text.contains("Load balance group destinations for NFE 1\nGroup 0: 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15\n"));
}

#[test]
fn test_absent_device_stops_run() {
    let sim = SimPlatform::new();
    sim.set_present(dev(2), false);

    let mut mgr = GroupConfigurator::new(sim.clone());
    let err = mgr
        .run(&commands(&["-s", "0:1", "-d", "2", "-c"]), &mut Vec::new())
        .unwrap_err();

    assert_eq!(err.nfm_error().map(NfmError::status), Some(NfmStatus::NoDevice));
    assert_eq!(sim.group_masks(dev(0))[0].bits(), 1);
}

#[test]
fn test_partial_changes_persist_to_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("platform.json");

    let state = PlatformFile::open(&path).unwrap();
    let sim = state.platform();
    sim.inject_fault(
        SimOp::SetGroupMask {
            device: dev(0),
            group: group(1),
        },
        NfmError::from_status(NfmStatus::Timeout, 0),
    );
    let mut mgr = GroupConfigurator::new(sim);
    let outcome = mgr.run(&commands(&["-s", "0:0x3f", "-s", "1:1"]), &mut Vec::new());
    assert!(state.finish(outcome).is_err());

    let reloaded = PlatformFile::open(&path).unwrap().platform();
    assert_eq!(reloaded.group_masks(dev(0))[0].bits(), 0x3f);
    assert!(reloaded.group_masks(dev(0))[1].is_empty());
}
