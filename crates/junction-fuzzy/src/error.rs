//! Error types for the `junction-fuzzy` crate.
//!
//! Construction of membership functions, variables, and engines validates
//! eagerly, so once an [`InferenceEngine`](crate::InferenceEngine) exists
//! the only runtime failures are caller input problems.

/// Errors that can occur while building or running a fuzzy system.
#[derive(Debug, thiserror::Error)]
pub enum FuzzyError {
    /// Control points are not finite or not non-decreasing.
    #[error("invalid membership shape {points:?}: {reason}")]
    InvalidShape {
        /// The offending control points.
        points: Vec<f64>,
        /// What is wrong with them.
        reason: &'static str,
    },

    /// Universe bounds or step are unusable.
    #[error("invalid universe [{min}, {max}] step {step}: {reason}")]
    InvalidUniverse {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Sampling step.
        step: f64,
        /// What is wrong with them.
        reason: &'static str,
    },

    /// A label was registered twice on the same variable.
    #[error("variable {variable} already has a term labelled {label}")]
    DuplicateLabel {
        /// Variable name.
        variable: String,
        /// Repeated label.
        label: String,
    },

    /// Two variables in one engine share a name.
    #[error("duplicate variable name: {0}")]
    DuplicateVariable(String),

    /// A rule references a variable the engine does not know, or uses an
    /// output variable as a condition (or vice versa).
    #[error("rule {rule} references unknown {role} variable {variable}")]
    UnknownVariable {
        /// Index of the rule in the rule base.
        rule: usize,
        /// `"input"` or `"output"`.
        role: &'static str,
        /// Variable name as written in the rule.
        variable: String,
    },

    /// A rule references a label the variable does not define.
    #[error("rule {rule} references unknown label {label} on variable {variable}")]
    UnknownLabel {
        /// Index of the rule in the rule base.
        rule: usize,
        /// Variable name.
        variable: String,
        /// Label as written in the rule.
        label: String,
    },

    /// A rule has no antecedent or no consequent clauses.
    #[error("rule {rule} must have at least one condition and one conclusion")]
    EmptyRule {
        /// Index of the rule in the rule base.
        rule: usize,
    },

    /// A rule weight is outside 0.0--1.0 or not finite.
    #[error("rule {rule} has weight {weight}, expected 0.0..=1.0")]
    InvalidWeight {
        /// Index of the rule in the rule base.
        rule: usize,
        /// The rejected weight.
        weight: f64,
    },

    /// No crisp value was supplied for an input variable.
    #[error("missing crisp input for variable {0}")]
    MissingInput(String),

    /// A crisp input is NaN or infinite.
    #[error("crisp input for variable {variable} is not finite: {value}")]
    NonFiniteInput {
        /// Variable name.
        variable: String,
        /// The rejected value.
        value: f64,
    },

    /// The aggregated output shape has zero area, so the centroid is
    /// undefined. The engine recovers by using the universe midpoint.
    #[error("aggregated membership for {variable} is zero everywhere")]
    DegenerateAggregate {
        /// Output variable name.
        variable: String,
    },
}
