//! Report payloads handed to the presentation layer.
//!
//! Covers the static-versus-fuzzy comparison table, the per-second
//! clearance countdown, and control-surface samples.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::lane::LaneId;

// ---------------------------------------------------------------------------
// Comparison table
// ---------------------------------------------------------------------------

/// Which signalling strategy a comparison row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SystemKind {
    /// Fixed-lane, fixed-duration signal cycle.
    StaticBaseline,
    /// The fuzzy controller's arbitration result.
    FuzzyLogic,
}

impl SystemKind {
    /// Display label for tables.
    pub const fn label(self) -> &'static str {
        match self {
            Self::StaticBaseline => "Static Signal",
            Self::FuzzyLogic => "Fuzzy Logic",
        }
    }
}

/// One row of the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ComparisonRow {
    /// The strategy this row describes.
    pub system: SystemKind,
    /// Lane given the green light.
    pub winner: LaneId,
    /// Green time granted, in seconds.
    pub green_seconds: f64,
    /// Queue clearance efficiency. Higher is better.
    pub effectiveness: f64,
    /// Remaining vehicle-seconds of wait across all lanes. Lower is better.
    pub system_penalty: f64,
}

/// The two-row {static baseline, fuzzy result} comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ComparisonReport {
    /// Fixed-cycle reference row.
    pub baseline: ComparisonRow,
    /// Fuzzy controller row.
    pub fuzzy: ComparisonRow,
}

impl ComparisonReport {
    /// Both rows in table order (baseline first).
    pub const fn rows(&self) -> [&ComparisonRow; 2] {
        [&self.baseline, &self.fuzzy]
    }

    /// Fuzzy effectiveness minus baseline effectiveness.
    pub fn effectiveness_gain(&self) -> f64 {
        self.fuzzy.effectiveness - self.baseline.effectiveness
    }

    /// Baseline penalty minus fuzzy penalty (positive when fuzzy is better).
    pub fn penalty_reduction(&self) -> f64 {
        self.baseline.system_penalty - self.fuzzy.system_penalty
    }
}

// ---------------------------------------------------------------------------
// Countdown and surface samples
// ---------------------------------------------------------------------------

/// One second of the green-phase countdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClearanceFrame {
    /// Whole seconds of green left.
    pub seconds_remaining: u32,
    /// Queue density still waiting in the green lane.
    pub remaining_density: f64,
}

/// One point of the density x wait -> green-duration control surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SurfaceSample {
    /// Density input.
    pub density: f64,
    /// Wait input in seconds.
    pub wait: f64,
    /// Green duration the controller assigns, in seconds.
    pub green_duration: f64,
}
