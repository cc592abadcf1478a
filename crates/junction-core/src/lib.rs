//! Traffic rule base, lane arbitration, and reporting for the fuzzy
//! junction controller.
//!
//! One evaluation cycle takes four [`LaneState`] readings, scores each lane
//! with the [`TrafficController`], and lets the [`LaneArbiter`] pick a
//! single winner. Reporting helpers score that outcome against a
//! fixed-cycle baseline.
//!
//! # Modules
//!
//! - [`controller`] -- [`TrafficController`]: membership tables, the rule
//!   base, and per-lane evaluation with input range checks.
//! - [`arbiter`] -- [`LaneEvaluator`] trait, [`LaneArbiter`], and the
//!   sequential and concurrent intersection entry points.
//! - [`effectiveness`] -- Effectiveness, system penalty, and the baseline
//!   comparison.
//! - [`clearance`] -- Per-second queue drain for countdown displays.
//! - [`surface`] -- Density x wait control surface sampling.
//! - [`scenario`] -- Built-in scenarios and the batch runner.
//! - [`config`] -- Configuration loading from `junction-config.yaml`.
//! - [`error`] -- [`ControllerError`].
//!
//! [`LaneState`]: junction_types::LaneState

pub mod arbiter;
pub mod clearance;
pub mod config;
pub mod controller;
pub mod effectiveness;
pub mod error;
pub mod scenario;
pub mod surface;

pub use arbiter::{
    LaneArbiter, LaneEvaluator, TIE_EPSILON, evaluate_intersection,
    evaluate_intersection_concurrent, lanes_from_map,
};
pub use clearance::clearance_countdown;
pub use config::{ConfigError, ControllerConfig};
pub use controller::TrafficController;
pub use effectiveness::{
    EMERGENCY_WEIGHT, compare_with_baseline, compute_effectiveness, compute_system_penalty,
};
pub use error::ControllerError;
pub use scenario::{
    builtin_scenarios, configured_scenarios, run_scenario, run_scenario_concurrent, run_scenarios,
    run_scenarios_concurrent,
};
pub use surface::control_surface;
