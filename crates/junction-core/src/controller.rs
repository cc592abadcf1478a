//! The traffic rule base and per-lane evaluation.
//!
//! [`TrafficController`] owns one compiled [`InferenceEngine`] over three
//! inputs (density, waiting time, emergency) and two outputs (priority,
//! green duration). The membership tables and the ten rules are fixed data
//! built in [`TrafficController::new`]; there is no way to change them
//! after construction, and evaluation never mutates the controller.
//!
//! # Membership tables
//!
//! | Variable         | Universe | Terms |
//! |------------------|----------|-------|
//! | `density`        | 0--100   | low `[0,0,15,30]`, medium `[20,35,55,70]`, high `[60,75,100,100]` |
//! | `waiting_time`   | 0--120   | short `[0,0,20,40]`, moderate `[30,45,65,80]`, long `[70,85,120,120]` |
//! | `emergency`      | 0--1     | no `tri[0,0,0.5]`, yes `tri[0.5,1,1]` |
//! | `priority`       | 0--100   | low `[0,0,20,40]`, medium `[30,45,55,70]`, high `[60,75,85,90]`, very high `[85,90,100,100]` |
//! | `green_duration` | 10--90   | short `[10,10,20,30]`, medium `[25,35,45,60]`, long `[50,65,90,90]` |
//!
//! All universes are sampled every whole unit.

use std::ops::RangeInclusive;

use junction_fuzzy::{
    Inference, InferenceEngine, LinguisticVariable, MembershipFunction, Rule, Universe, is,
};
use junction_types::{LaneResult, LaneState};
use tracing::debug;

use crate::error::ControllerError;

/// Accepted density inputs.
pub const DENSITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;

/// Accepted waiting-time inputs, in seconds.
pub const WAIT_RANGE: RangeInclusive<f64> = 0.0..=120.0;

/// Input variable: queue density.
pub const DENSITY: &str = "density";
/// Input variable: seconds waited at red.
pub const WAITING_TIME: &str = "waiting_time";
/// Input variable: emergency vehicle present (0 or 1).
pub const EMERGENCY: &str = "emergency";
/// Output variable: lane priority.
pub const PRIORITY: &str = "priority";
/// Output variable: green-light duration in seconds.
pub const GREEN_DURATION: &str = "green_duration";

/// Fuzzy controller that scores one lane at a time.
///
/// Cheap to share: wrap in an `Arc` to evaluate lanes from several threads.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficController {
    engine: InferenceEngine,
}

impl TrafficController {
    /// Build the controller with the fixed membership tables and rule base.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Fuzzy`] if the tables fail validation.
    pub fn new() -> Result<Self, ControllerError> {
        let engine = InferenceEngine::new(input_variables()?, output_variables()?, rule_base())?;
        Ok(Self { engine })
    }

    /// The compiled fuzzy system.
    pub const fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    /// Score one lane from its raw inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InputRange`] if `density` is outside
    /// 0--100 or `wait` is outside 0--120 (including NaN and infinities).
    pub fn evaluate_lane(
        &self,
        density: f64,
        wait: f64,
        emergency: bool,
    ) -> Result<LaneResult, ControllerError> {
        self.evaluate(&LaneState::new(density, wait, emergency))
    }

    /// Score one lane.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate_lane`](Self::evaluate_lane).
    pub fn evaluate(&self, state: &LaneState) -> Result<LaneResult, ControllerError> {
        let inference = self.explain(state)?;
        let priority = inference
            .value(PRIORITY)
            .ok_or(ControllerError::MissingOutput(PRIORITY))?;
        let green_duration = inference
            .value(GREEN_DURATION)
            .ok_or(ControllerError::MissingOutput(GREEN_DURATION))?;

        debug!(
            density = state.density,
            wait = state.wait,
            emergency = state.emergency,
            priority,
            green_duration,
            "Lane evaluated"
        );

        Ok(LaneResult {
            priority,
            green_duration,
            state: *state,
        })
    }

    /// Run inference for one lane and return the full trace, including
    /// every rule's firing strength.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate_lane`](Self::evaluate_lane).
    pub fn explain(&self, state: &LaneState) -> Result<Inference, ControllerError> {
        let density = check_range("density", state.density, &DENSITY_RANGE)?;
        let wait = check_range("wait", state.wait, &WAIT_RANGE)?;
        let emergency = if state.emergency { 1.0 } else { 0.0 };

        let inference = self.engine.infer(&[
            (DENSITY, density),
            (WAITING_TIME, wait),
            (EMERGENCY, emergency),
        ])?;
        Ok(inference)
    }

    /// Names of rules that fired with non-zero strength for `state`,
    /// paired with their strengths.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate_lane`](Self::evaluate_lane).
    pub fn fired_rules(&self, state: &LaneState) -> Result<Vec<(String, f64)>, ControllerError> {
        let inference = self.explain(state)?;
        Ok(self
            .engine
            .rules()
            .iter()
            .zip(inference.rule_strengths())
            .enumerate()
            .filter(|(_, (_, strength))| **strength > 0.0)
            .map(|(index, (rule, strength))| (rule.display_name(index), *strength))
            .collect())
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<f64, ControllerError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ControllerError::InputRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn trap(a: f64, b: f64, c: f64, d: f64) -> Result<MembershipFunction, ControllerError> {
    Ok(MembershipFunction::trapezoid(a, b, c, d)?)
}

fn tri(a: f64, b: f64, c: f64) -> Result<MembershipFunction, ControllerError> {
    Ok(MembershipFunction::triangle(a, b, c)?)
}

fn input_variables() -> Result<Vec<LinguisticVariable>, ControllerError> {
    let density = LinguisticVariable::new(DENSITY, Universe::integers(0.0, 100.0)?)
        .with_term("low", trap(0.0, 0.0, 15.0, 30.0)?)?
        .with_term("medium", trap(20.0, 35.0, 55.0, 70.0)?)?
        .with_term("high", trap(60.0, 75.0, 100.0, 100.0)?)?;

    let waiting_time = LinguisticVariable::new(WAITING_TIME, Universe::integers(0.0, 120.0)?)
        .with_term("short", trap(0.0, 0.0, 20.0, 40.0)?)?
        .with_term("moderate", trap(30.0, 45.0, 65.0, 80.0)?)?
        .with_term("long", trap(70.0, 85.0, 120.0, 120.0)?)?;

    let emergency = LinguisticVariable::new(EMERGENCY, Universe::integers(0.0, 1.0)?)
        .with_term("no", tri(0.0, 0.0, 0.5)?)?
        .with_term("yes", tri(0.5, 1.0, 1.0)?)?;

    Ok(vec![density, waiting_time, emergency])
}

fn output_variables() -> Result<Vec<LinguisticVariable>, ControllerError> {
    let priority = LinguisticVariable::new(PRIORITY, Universe::integers(0.0, 100.0)?)
        .with_term("low", trap(0.0, 0.0, 20.0, 40.0)?)?
        .with_term("medium", trap(30.0, 45.0, 55.0, 70.0)?)?
        .with_term("high", trap(60.0, 75.0, 85.0, 90.0)?)?
        .with_term("very_high", trap(85.0, 90.0, 100.0, 100.0)?)?;

    let green_duration = LinguisticVariable::new(GREEN_DURATION, Universe::integers(10.0, 90.0)?)
        .with_term("short", trap(10.0, 10.0, 20.0, 30.0)?)?
        .with_term("medium", trap(25.0, 35.0, 45.0, 60.0)?)?
        .with_term("long", trap(50.0, 65.0, 90.0, 90.0)?)?;

    Ok(vec![priority, green_duration])
}

/// Emergency override first, then the density x wait grid gated on "no
/// emergency".
fn rule_base() -> Vec<Rule> {
    // (density, waiting_time) -> (priority, green_duration)
    const GRID: [(&str, &str, &str, &str); 9] = [
        ("high", "long", "high", "long"),
        ("high", "moderate", "high", "medium"),
        ("high", "short", "medium", "medium"),
        ("medium", "long", "medium", "long"),
        ("medium", "moderate", "medium", "medium"),
        ("medium", "short", "low", "short"),
        ("low", "long", "medium", "medium"),
        ("low", "moderate", "low", "medium"),
        ("low", "short", "low", "short"),
    ];

    let emergency = Rule::when(is(EMERGENCY, "yes"))
        .then(is(PRIORITY, "very_high"))
        .then(is(GREEN_DURATION, "long"))
        .named("emergency_override");

    std::iter::once(emergency)
        .chain(GRID.iter().map(|&(density, wait, priority, green)| {
            Rule::when(is(DENSITY, density))
                .and(is(WAITING_TIME, wait))
                .and(is(EMERGENCY, "no"))
                .then(is(PRIORITY, priority))
                .then(is(GREEN_DURATION, green))
                .named(format!("{density}_density_{wait}_wait"))
        }))
        .collect()
}
