//! Cross-lane arbitration: pick one winner from four scored lanes.
//!
//! Lanes are visited in the fixed order North, South, East, West. The
//! running winner is replaced when a lane's priority beats it by more than
//! the tie tolerance, or when the priorities are within the tolerance and
//! the lane has waited strictly longer. A full tie keeps the lane visited
//! first.
//!
//! Emergencies need no special case here: an emergency lane's priority
//! sits in the very-high band, above anything a non-emergency lane can
//! reach, so it wins on priority alone. Two emergency lanes fall through
//! to the wait tie-break and then to lane order.
//!
//! Scoring is abstracted behind [`LaneEvaluator`] so arbitration can be
//! exercised with fixed priorities.

use std::collections::BTreeMap;
use std::sync::Arc;

use junction_types::{IntersectionDecision, LaneId, LaneResult, LaneState, LaneTable};
use tracing::{debug, info};

use crate::config::ArbitrationConfig;
use crate::controller::TrafficController;
use crate::error::ControllerError;

/// Priorities closer than this are treated as equal.
///
/// Centroid outputs are continuous, so two lanes with "the same" traffic
/// rarely produce bit-identical priorities. Within this band the lane that
/// has waited longer wins.
pub const TIE_EPSILON: f64 = 0.01;

/// Something that can score a single lane.
pub trait LaneEvaluator {
    /// Produce the priority and green duration for one lane.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] if the lane cannot be scored.
    fn evaluate(&self, state: &LaneState) -> Result<LaneResult, ControllerError>;
}

impl LaneEvaluator for TrafficController {
    fn evaluate(&self, state: &LaneState) -> Result<LaneResult, ControllerError> {
        Self::evaluate(self, state)
    }
}

/// Chooses the winning lane from a table of scored lanes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneArbiter {
    tie_epsilon: f64,
}

impl Default for LaneArbiter {
    fn default() -> Self {
        Self::new(TIE_EPSILON)
    }
}

impl LaneArbiter {
    /// Create an arbiter with the given tie tolerance.
    pub const fn new(tie_epsilon: f64) -> Self {
        Self { tie_epsilon }
    }

    /// Create an arbiter from configuration.
    pub const fn from_config(config: ArbitrationConfig) -> Self {
        Self::new(config.tie_epsilon)
    }

    /// The tie tolerance in use.
    pub const fn tie_epsilon(self) -> f64 {
        self.tie_epsilon
    }

    /// Score every lane with `evaluator`, then select the winner.
    ///
    /// Lanes are scored in the fixed order; the first lane that fails to
    /// score aborts the cycle.
    ///
    /// # Errors
    ///
    /// Propagates the evaluator's error, e.g.
    /// [`ControllerError::InputRange`].
    pub fn decide<E: LaneEvaluator + ?Sized>(
        self,
        evaluator: &E,
        lanes: &LaneTable<LaneState>,
    ) -> Result<IntersectionDecision, ControllerError> {
        let results = lanes.try_map(|lane, state| {
            let result = evaluator.evaluate(state)?;
            debug!(
                %lane,
                priority = result.priority,
                green_duration = result.green_duration,
                "Lane scored"
            );
            Ok::<_, ControllerError>(result)
        })?;
        Ok(self.select(results))
    }

    /// Select the winner from already scored lanes.
    pub fn select(self, results: LaneTable<LaneResult>) -> IntersectionDecision {
        let mut best: Option<(LaneId, &LaneResult)> = None;

        for (lane, result) in results.iter() {
            let replace = match best {
                None => true,
                Some((_, current)) => self.beats(result, current),
            };
            if replace {
                best = Some((lane, result));
            }
        }

        let (winner, green_duration) =
            best.map_or((LaneId::North, results.north.green_duration), |(lane, r)| {
                (lane, r.green_duration)
            });

        info!(%winner, green_duration, "Intersection decided");

        IntersectionDecision {
            winner,
            green_duration,
            results,
        }
    }

    fn beats(self, challenger: &LaneResult, current: &LaneResult) -> bool {
        if challenger.priority > current.priority + self.tie_epsilon {
            return true;
        }
        (challenger.priority - current.priority).abs() <= self.tie_epsilon
            && challenger.state.wait > current.state.wait
    }
}

/// Score four lanes with `controller` and select the winner using the
/// default tie tolerance.
///
/// # Errors
///
/// Returns [`ControllerError::InputRange`] if any lane input is out of
/// range.
pub fn evaluate_intersection(
    controller: &TrafficController,
    lanes: &LaneTable<LaneState>,
) -> Result<IntersectionDecision, ControllerError> {
    LaneArbiter::default().decide(controller, lanes)
}

/// Build a lane table from a keyed map.
///
/// # Errors
///
/// Returns [`ControllerError::EmptyLaneSet`] for an empty map, or
/// [`ControllerError::MissingLane`] naming the first absent lane in the
/// fixed order.
pub fn lanes_from_map(
    lanes: &BTreeMap<LaneId, LaneState>,
) -> Result<LaneTable<LaneState>, ControllerError> {
    if lanes.is_empty() {
        return Err(ControllerError::EmptyLaneSet);
    }
    LaneTable::from_fn(|lane| lanes.get(&lane).copied())
        .try_map(|lane, state| state.ok_or(ControllerError::MissingLane(lane)))
}

/// Score the four lanes in parallel on the blocking pool, then select the
/// winner exactly as [`LaneArbiter::decide`] would.
///
/// Results are collected in the fixed lane order, so the decision is
/// identical to the sequential path.
///
/// # Errors
///
/// Propagates the evaluator's error (the first failing lane in the fixed
/// order), or [`ControllerError::TaskJoin`] if a task panicked.
pub async fn evaluate_intersection_concurrent<E>(
    evaluator: Arc<E>,
    lanes: LaneTable<LaneState>,
    arbiter: LaneArbiter,
) -> Result<IntersectionDecision, ControllerError>
where
    E: LaneEvaluator + Send + Sync + 'static,
{
    let handles = lanes.map(|_, &state| {
        let evaluator = Arc::clone(&evaluator);
        tokio::task::spawn_blocking(move || evaluator.evaluate(&state))
    });

    let LaneTable {
        north,
        south,
        east,
        west,
    } = handles;
    let results = LaneTable::new(north.await??, south.await??, east.await??, west.await??);

    Ok(arbiter.select(results))
}
