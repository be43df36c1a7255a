//! Integration test: an authority broadcasts after local commands, a replica
//! receives the records in arbitrary order.

use ballast_controls::{ActuatorState, Command, ControlSignalRouter};
use ballast_net::{MergeOutcome, NetworkSync, PumpSnapshot};
use proptest::prelude::*;

/// Drive the authority through a fixed command script, collecting one record per
/// command that requested a broadcast.
fn broadcast_script() -> (ActuatorState, Vec<(f64, Vec<u8>)>) {
    let router = ControlSignalRouter::new();
    let sync = NetworkSync::new();
    let mut authority = ActuatorState::default();
    let mut sent = Vec::new();

    let script = [
        Command::SetActive { active: true },
        Command::SetSpeed { value: 35.0 },
        Command::NudgeIn,
        Command::NudgeIn,
        Command::RemoteToggle,
        Command::SetSpeed { value: -62.0 },
        Command::ManualOverrideToggle,
    ];

    for (i, cmd) in script.into_iter().enumerate() {
        router.apply(&mut authority, cmd);
        if authority.take_sync_request() {
            sent.push((i as f64, sync.encode(&authority)));
        }
    }
    (authority, sent)
}

#[test]
fn in_order_delivery_mirrors_authority() {
    let (authority, sent) = broadcast_script();
    assert_eq!(sent.len(), 7);

    let sync = NetworkSync::new();
    let mut replica = ActuatorState::default();
    for (t, bytes) in &sent {
        assert!(sync.merge(&mut replica, bytes, *t).is_applied());
    }

    let expected = PumpSnapshot::from_state(&authority);
    assert_eq!(replica.flow_setpoint(), expected.flow_setpoint());
    assert_eq!(replica.is_active(), authority.is_active());
}

proptest! {
    #[test]
    fn any_delivery_order_converges_to_newest(
        order in Just((0..7).collect::<Vec<usize>>()).prop_shuffle()
    ) {
        let (authority, sent) = broadcast_script();
        let sync = NetworkSync::new();
        let mut replica = ActuatorState::default();

        let mut newest_seen = f64::NEG_INFINITY;
        for i in order {
            let (t, bytes) = &sent[i];
            let out = sync.merge(&mut replica, bytes, *t);
            if *t >= newest_seen {
                prop_assert!(out.is_applied());
                newest_seen = *t;
            } else {
                let is_stale = matches!(out, MergeOutcome::Stale { .. });
                prop_assert!(is_stale);
            }
        }

        let expected = PumpSnapshot::from_state(&authority);
        prop_assert_eq!(replica.flow_setpoint(), expected.flow_setpoint());
        prop_assert_eq!(replica.is_active(), authority.is_active());
        prop_assert_eq!(replica.last_sync(), 6.0);
    }
}
