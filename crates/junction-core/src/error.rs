//! Error types for the `junction-core` crate.

use junction_fuzzy::FuzzyError;
use junction_types::LaneId;

/// Errors raised while evaluating lanes or arbitrating a junction.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// A lane input is outside its accepted range or is not finite.
    ///
    /// Inputs are rejected rather than clamped.
    #[error("{field} = {value} is outside {min}..={max}")]
    InputRange {
        /// Which input, e.g. `"density"`.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// Arbitration was asked to choose among zero lanes.
    #[error("cannot arbitrate an empty lane set")]
    EmptyLaneSet,

    /// A lane map supplied some lanes but not this one.
    #[error("no state supplied for lane {0}")]
    MissingLane(LaneId),

    /// The fuzzy system could not be built or evaluated.
    #[error("fuzzy inference failed: {0}")]
    Fuzzy(#[from] FuzzyError),

    /// The inference engine produced no value for an expected output.
    #[error("inference produced no value for output {0}")]
    MissingOutput(&'static str),

    /// A blocking evaluation task panicked or was cancelled.
    #[error("lane evaluation task failed: {source}")]
    TaskJoin {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
