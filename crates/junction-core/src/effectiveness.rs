//! Reporting metrics: effectiveness, system penalty, and the comparison
//! against a fixed-cycle baseline.
//!
//! These are two separate numbers and neither feeds back into arbitration.
//!
//! - **Effectiveness** (queue clearance efficiency) scores only the lane
//!   given the green: vehicles it can clear times the delay relieved, with a
//!   large bonus when an emergency vehicle is released. Higher is better.
//! - **System penalty** sums, over all four lanes, the vehicle-seconds still
//!   waiting after the green phase. Lower is better.

use junction_types::{
    ComparisonReport, ComparisonRow, IntersectionDecision, LaneId, LaneResult, LaneTable,
    SystemKind,
};
use tracing::debug;

use crate::config::ControllerConfig;

/// Wait-equivalent bonus for relieving a lane with an emergency vehicle.
pub const EMERGENCY_WEIGHT: f64 = 1000.0;

/// Effectiveness of giving `lane` a green of `granted_seconds`, with the
/// default emergency weight.
///
/// `min(density, granted) * (wait + 1000 if emergency)`.
pub fn compute_effectiveness(
    results: &LaneTable<LaneResult>,
    lane: LaneId,
    granted_seconds: f64,
) -> f64 {
    compute_effectiveness_weighted(results, lane, granted_seconds, EMERGENCY_WEIGHT)
}

/// [`compute_effectiveness`] with an explicit emergency weight.
pub fn compute_effectiveness_weighted(
    results: &LaneTable<LaneResult>,
    lane: LaneId,
    granted_seconds: f64,
    emergency_weight: f64,
) -> f64 {
    let state = &results.get(lane).state;
    let cleared = state.density.min(granted_seconds);
    let relieved = if state.emergency {
        state.wait + emergency_weight
    } else {
        state.wait
    };
    cleared * relieved
}

/// Vehicle-seconds of wait left across the junction after `winner` gets
/// `green_seconds`.
///
/// The green lane keeps whatever density the green could not clear; every
/// other lane keeps all of it. Each remaining unit is charged its wait so
/// far plus the length of the green phase.
pub fn compute_system_penalty(
    results: &LaneTable<LaneResult>,
    winner: LaneId,
    green_seconds: f64,
) -> f64 {
    results
        .iter()
        .map(|(lane, result)| {
            let state = &result.state;
            let remaining = if lane == winner {
                (state.density - green_seconds).max(0.0)
            } else {
                state.density
            };
            remaining * (state.wait + green_seconds)
        })
        .sum()
}

/// Compare the fuzzy decision with the configured fixed-cycle signal.
///
/// Both rows are scored against the same lane results. The baseline always
/// serves `config.baseline.lane` for `config.baseline.green_seconds`.
pub fn compare_with_baseline(
    decision: &IntersectionDecision,
    config: &ControllerConfig,
) -> ComparisonReport {
    let weight = config.scoring.emergency_weight;
    let row = |system: SystemKind, winner: LaneId, green_seconds: f64| ComparisonRow {
        system,
        winner,
        green_seconds,
        effectiveness: compute_effectiveness_weighted(
            &decision.results,
            winner,
            green_seconds,
            weight,
        ),
        system_penalty: compute_system_penalty(&decision.results, winner, green_seconds),
    };

    let report = ComparisonReport {
        baseline: row(
            SystemKind::StaticBaseline,
            config.baseline.lane,
            config.baseline.green_seconds,
        ),
        fuzzy: row(
            SystemKind::FuzzyLogic,
            decision.winner,
            decision.green_duration,
        ),
    };

    debug!(
        baseline_effectiveness = report.baseline.effectiveness,
        fuzzy_effectiveness = report.fuzzy.effectiveness,
        baseline_penalty = report.baseline.system_penalty,
        fuzzy_penalty = report.fuzzy.system_penalty,
        "Comparison computed"
    );

    report
}
