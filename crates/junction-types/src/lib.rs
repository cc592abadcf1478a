//! Shared type definitions for the fuzzy junction controller.
//!
//! This crate is the single source of truth for the value types that cross
//! crate boundaries and reach the dashboard. Types defined here flow
//! downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`lane`] -- Lane identifiers, per-lane state and result, and the fixed
//!   four-lane [`LaneTable`].
//! - [`decision`] -- [`IntersectionDecision`], the outcome of one
//!   arbitration cycle.
//! - [`report`] -- Comparison table rows, countdown frames, and control
//!   surface samples.
//! - [`scenario`] -- Named four-lane scenarios and their reports.

pub mod decision;
pub mod lane;
pub mod report;
pub mod scenario;

// Re-export all public types at crate root for convenience.
pub use decision::IntersectionDecision;
pub use lane::{LaneId, LaneResult, LaneState, LaneTable};
pub use report::{ClearanceFrame, ComparisonReport, ComparisonRow, SurfaceSample, SystemKind};
pub use scenario::{Scenario, ScenarioReport};
