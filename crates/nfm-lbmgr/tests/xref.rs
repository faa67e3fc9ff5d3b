//! Rule cross-reference scenarios against the simulated platform.

use nfm_api::api::{AddrSpaceBinding, LoadBalanceApi, Rule};
use nfm_api::sim::{SimOp, SimPlatform};
use nfm_api::{InterfaceId, NfmError, NfmStatus};
use nfm_lbmgr::RuleCrossReferencer;
use nfm_tool_common::ToolError;
use nfm_types::{DestSet, DeviceId, GroupId, HostDestId, LgidSet};
use pretty_assertions::assert_eq;

const QUEUE: &str = "/sample_external_ports";

fn dev(id: u32) -> DeviceId {
    DeviceId::new(id).unwrap()
}

fn rule(name: &str, priority: u32, group: u32, intf: u32, care: bool) -> Rule {
    Rule::new(
        name,
        priority,
        LgidSet::from_bits(1 << group),
        AddrSpaceBinding {
            id: InterfaceId::new(intf),
            care,
        },
    )
}

/// Group 5 holds host dest 3; two caring rules and one wildcard rule feed it.
fn group5_platform() -> SimPlatform {
    let mut sim = SimPlatform::new();
    sim.set_group_mask(dev(0), GroupId::new(5).unwrap(), DestSet::from_bits(0b1000))
        .unwrap();
    sim.add_rule(dev(0), rule("port1", 10, 5, 1, true));
    sim.add_rule(dev(0), rule("port2", 20, 5, 2, true));
    sim.add_rule(dev(0), rule("any-port", 30, 5, 7, false));
    sim.add_rule(dev(0), rule("other-group", 40, 6, 9, true));
    sim
}

fn ids(report: &nfm_lbmgr::XrefReport) -> Vec<u32> {
    report.interfaces().iter().map(InterfaceId::as_u32).collect()
}

#[test]
fn test_interfaces_feeding_host_dest() {
    let sim = group5_platform();
    let report = RuleCrossReferencer::new(&sim, QUEUE)
        .interfaces_for(HostDestId::new(3).unwrap(), &[dev(0), dev(1)])
        .unwrap();

    assert_eq!(ids(&report), vec![1, 2]);
    assert_eq!(report.devices[0].group, GroupId::new(5).ok());
    assert_eq!(report.devices[0].rules_scanned, 4);
    assert_eq!(report.devices[1].group, None);
    assert_eq!(
        report.to_string(),
        "Interface IDs feeding host dest 3:\n1 2\n"
    );
}

#[test]
fn test_union_across_devices() {
    let mut sim = group5_platform();
    sim.set_group_mask(dev(1), GroupId::new(0).unwrap(), DestSet::from_bits(0b1000))
        .unwrap();
    sim.add_rule(dev(1), rule("dev1-port4", 1, 0, 4, true));
    sim.add_rule(dev(1), rule("dev1-port1", 2, 0, 1, true));

    let report = RuleCrossReferencer::new(&sim, QUEUE)
        .interfaces_for(HostDestId::new(3).unwrap(), &[dev(0), dev(1)])
        .unwrap();
    assert_eq!(ids(&report), vec![1, 2, 4]);
}

#[test]
fn test_rules_closed_after_scan() {
    let sim = group5_platform();
    RuleCrossReferencer::new(&sim, QUEUE)
        .interfaces_for(HostDestId::new(3).unwrap(), &[dev(0)])
        .unwrap();

    let calls = sim.calls();
    assert_eq!(calls.last(), Some(&SimOp::RulesClose { device: dev(0) }));
    // Four rules plus the read that hits the end of the table.
    let reads = calls
        .iter()
        .filter(|op| matches!(op, SimOp::RuleRead { .. }))
        .count();
    assert_eq!(reads, 5);
}

#[test]
fn test_rule_read_failure_surfaces_subcode() {
    let sim = group5_platform();
    sim.inject_fault(
        SimOp::RuleRead {
            device: dev(0),
            position: 2,
        },
        NfmError::from_status(NfmStatus::Timeout, 0x2a),
    );

    let err = RuleCrossReferencer::new(&sim, QUEUE)
        .interfaces_for(HostDestId::new(3).unwrap(), &[dev(0)])
        .unwrap_err();
    match err {
        ToolError::RuleRead { device, source } => {
            assert_eq!(device, dev(0));
            assert_eq!(source.subcode(), 0x2a);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(sim.calls().contains(&SimOp::RulesClose { device: dev(0) }));
}

#[test]
fn test_setup_failure_aborts_search() {
    let mut sim = group5_platform();
    sim.set_group_mask(dev(1), GroupId::new(0).unwrap(), DestSet::from_bits(0b1000))
        .unwrap();
    sim.inject_fault(
        SimOp::RulesOpen { device: dev(0) },
        NfmError::from_status(NfmStatus::RetryLater, 0),
    );

    let err = RuleCrossReferencer::new(&sim, QUEUE)
        .interfaces_for(HostDestId::new(3).unwrap(), &[dev(0), dev(1)])
        .unwrap_err();
    assert!(matches!(err, ToolError::Setup { .. }));
    assert!(!sim
        .calls()
        .iter()
        .any(|op| matches!(op, SimOp::GetGroupMasks { device } if *device == dev(1))));
}

#[test]
fn test_absent_device_is_device_error() {
    let sim = group5_platform();
    sim.set_present(dev(1), false);

    let err = RuleCrossReferencer::new(&sim, QUEUE)
        .interfaces_for(HostDestId::new(3).unwrap(), &[dev(0), dev(1)])
        .unwrap_err();
    assert!(matches!(err, ToolError::Device { .. }));
}
