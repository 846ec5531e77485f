// Property-based tests across crates

use proptest::prelude::*;
use rover_core::protocol::{RobotCommand, Telemetry};
use rover_relay::{ConnectionRegistry, Relay};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
enum Op {
    Attach,
    Detach(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Attach), (0usize..16).prop_map(Op::Detach)]
}

proptest! {
    #[test]
    fn prop_registry_size_tracks_attach_and_detach(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let registry = ConnectionRegistry::new();
        let mut ids = Vec::new();
        let mut receivers = Vec::new();
        let mut attached = 0usize;
        let mut detached = 0usize;

        for op in ops {
            match op {
                Op::Attach => {
                    let (tx, rx) = mpsc::channel(4);
                    ids.push(registry.attach(tx));
                    receivers.push(rx);
                    attached += 1;
                }
                Op::Detach(i) if !ids.is_empty() => {
                    let id = ids[i % ids.len()].clone();
                    if registry.detach(&id) {
                        detached += 1;
                    }
                }
                Op::Detach(_) => {}
            }
            prop_assert_eq!(registry.len(), attached - detached);
        }
    }

    #[test]
    fn prop_broadcast_after_detach_all_is_inert(count in 0usize..8) {
        let relay = Relay::default();
        let mut ids = Vec::new();
        let mut receivers = Vec::new();
        for _ in 0..count {
            let (tx, rx) = mpsc::channel(4);
            ids.push(relay.attach(tx));
            receivers.push(rx);
        }
        for id in &ids {
            relay.detach(id);
        }

        let before = relay.snapshot();
        prop_assert!(!relay.broadcast(&RobotCommand::CaptureImage));
        prop_assert_eq!(relay.snapshot(), before);
        for rx in receivers.iter_mut() {
            prop_assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn prop_telemetry_parse_never_panics(text in ".{0,200}") {
        let _ = Telemetry::parse(&text);
    }

    #[test]
    fn prop_collision_reports_all_counted(n in 0usize..50) {
        let relay = Relay::default();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            for _ in 0..n {
                relay.ingest_telemetry(r#"{"type": "collision", "collision": true}"#).await;
            }
        });
        prop_assert_eq!(relay.query_collisions(), n as u64);
    }
}
