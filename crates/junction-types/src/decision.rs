//! The outcome of one arbitration cycle.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::lane::{LaneId, LaneResult, LaneTable};

/// Which lane gets the green light, for how long, and what every lane scored.
///
/// A fresh decision is created by every arbitration call; nothing carries
/// over between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct IntersectionDecision {
    /// The lane granted right-of-way.
    pub winner: LaneId,
    /// Green time granted to the winner, in seconds.
    pub green_duration: f64,
    /// Every lane's controller output, including the winner's.
    pub results: LaneTable<LaneResult>,
}

impl IntersectionDecision {
    /// The winning lane's full result.
    pub const fn winner_result(&self) -> &LaneResult {
        self.results.get(self.winner)
    }

    /// Whether any lane reported an emergency vehicle this cycle.
    pub fn emergency_active(&self) -> bool {
        self.results.iter().any(|(_, result)| result.state.emergency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::LaneState;

    fn result(priority: f64, emergency: bool) -> LaneResult {
        LaneResult {
            priority,
            green_duration: 30.0,
            state: LaneState::new(20.0, 10.0, emergency),
        }
    }

    #[test]
    fn winner_result_follows_winner_field() {
        let decision = IntersectionDecision {
            winner: LaneId::East,
            green_duration: 30.0,
            results: LaneTable::new(
                result(10.0, false),
                result(20.0, false),
                result(70.0, false),
                result(40.0, false),
            ),
        };
        assert!((decision.winner_result().priority - 70.0).abs() < f64::EPSILON);
        assert!(!decision.emergency_active());
    }

    #[test]
    fn emergency_active_detects_any_lane() {
        let decision = IntersectionDecision {
            winner: LaneId::North,
            green_duration: 30.0,
            results: LaneTable::new(
                result(10.0, false),
                result(20.0, false),
                result(70.0, false),
                result(93.0, true),
            ),
        };
        assert!(decision.emergency_active());
    }
}
