//! Encoding of local state and merging of remote snapshots.

use crate::codec::{self, PumpSnapshot};
use crate::error::WireError;
use ballast_controls::ActuatorState;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What a merge did with an incoming record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// The snapshot was applied to the local state.
    Applied { snapshot: PumpSnapshot },
    /// Sent before the last accepted record; dropped.
    Stale { sent_at: f64, last_sync: f64 },
    /// The record could not be decoded; dropped.
    Malformed { error: WireError },
}

impl MergeOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Network synchronisation of one pump.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkSync;

impl NetworkSync {
    pub fn new() -> Self {
        Self
    }

    /// Serialise the networked part of `state`. Always succeeds.
    pub fn encode(&self, state: &ActuatorState) -> Vec<u8> {
        codec::encode(&PumpSnapshot::from_state(state))
    }

    /// Merge a record sent at `sent_at` into `state`.
    ///
    /// Records older than the last accepted one are stale; a `NaN` timestamp
    /// never compares as newer and is treated the same way. Malformed records are
    /// reported in debug builds. Neither changes `state`.
    pub fn merge(&self, state: &mut ActuatorState, buffer: &[u8], sent_at: f64) -> MergeOutcome {
        if !state.accepts_sync(sent_at) {
            debug!(sent_at, last_sync = state.last_sync(), "dropping stale record");
            return MergeOutcome::Stale {
                sent_at,
                last_sync: state.last_sync(),
            };
        }

        let snapshot = match codec::decode(buffer) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                if cfg!(debug_assertions) {
                    warn!(%error, len = buffer.len(), "invalid network record");
                }
                return MergeOutcome::Malformed { error };
            }
        };

        state.set_flow_setpoint(snapshot.flow_setpoint());
        state.set_active(snapshot.active);
        state.enforce_idle_draw();
        state.set_last_sync(sent_at);
        MergeOutcome::Applied { snapshot }
    }
}
