//! Named traffic scenarios and their evaluated reports.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::decision::IntersectionDecision;
use crate::lane::{LaneState, LaneTable};
use crate::report::ComparisonReport;

/// A named snapshot of all four lanes, used for batch runs and demos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Scenario {
    /// Display name, e.g. `"Case 1: North Heavy Traffic"`.
    pub name: String,
    /// Sensor readings per lane.
    pub lanes: LaneTable<LaneState>,
}

impl Scenario {
    /// Create a scenario from a name and its lane readings.
    pub fn new(name: impl Into<String>, lanes: LaneTable<LaneState>) -> Self {
        Self {
            name: name.into(),
            lanes,
        }
    }

    /// The part of the name before the first `':'`, e.g. `"Case 1"`.
    pub fn short_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(head, _)| head.trim())
    }
}

/// Everything the dashboard needs for one evaluated scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScenarioReport {
    /// The scenario that was evaluated.
    pub scenario: Scenario,
    /// Arbitration outcome.
    pub decision: IntersectionDecision,
    /// Static-versus-fuzzy comparison for this outcome.
    pub comparison: ComparisonReport,
}
