//! The "pendingEvents" mailbox: a thin channel from core to host (spec §6,
//! §9 "pendingEvents queue").

use pwr_core::{CompId, FlowNodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A burst record crossed its threshold for the first time.
    Burst {
        node: FlowNodeId,
        component_label: String,
        time_s: f64,
    },
    /// The reactor was scrammed, with the host- or solver-supplied reason.
    Scram { reason: String, time_s: f64 },
    /// A rate or constraint operator rejected a step for the given reason;
    /// surfaced for diagnostics, not as a hard error (spec §7
    /// StepRejection is "normal, expected").
    StepRejected { reason: String, time_s: f64 },
    /// The solver hit `maxStepsPerFrame` or `maxWallTimeMs` within an
    /// `advance` call (spec §7 FrameBudgetExceeded).
    FrameBudgetExceeded { time_s: f64 },
    /// A pump's shaft is reporting backflow blocked by the impeller.
    PumpBackflowBlocked { pump: CompId, time_s: f64 },
}

/// Mailbox owned by `SimulationState`, drained by the host after each
/// `advance` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventMailbox {
    pending: Vec<SimEvent>,
}

impl EventMailbox {
    pub fn push(&mut self, event: SimEvent) {
        self.pending.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_mailbox() {
        let mut mailbox = EventMailbox::default();
        mailbox.push(SimEvent::Scram {
            reason: "manual".into(),
            time_s: 1.0,
        });
        assert_eq!(mailbox.len(), 1);
        let drained = mailbox.drain();
        assert_eq!(drained.len(), 1);
        assert!(mailbox.is_empty());
    }
}
