//! The JSON document the engine prints.

use junction_types::{ClearanceFrame, ScenarioReport, SurfaceSample};
use serde::Serialize;

/// One evaluated scenario plus the winner's green-phase countdown.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRun {
    /// Decision and baseline comparison.
    #[serde(flatten)]
    pub report: ScenarioReport,
    /// Per-second drain of the winning lane.
    pub countdown: Vec<ClearanceFrame>,
}

/// Everything produced by one engine run.
#[derive(Debug, Clone, Serialize)]
pub struct EngineReport {
    /// Scenario outcomes, in run order.
    pub scenarios: Vec<ScenarioRun>,
    /// Non-emergency green duration over the density x wait grid.
    pub surface: Vec<SurfaceSample>,
}
