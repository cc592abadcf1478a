//! Mamdani fuzzy inference for the fuzzy junction controller.
//!
//! The machinery is generic: nothing here knows about lanes or traffic.
//! Callers declare [`LinguisticVariable`]s with labelled
//! [`MembershipFunction`]s, write [`Rule`]s over them, and compile the lot
//! into an immutable [`InferenceEngine`].
//!
//! # Modules
//!
//! - [`membership`] -- Triangle and trapezoid membership functions.
//! - [`variable`] -- Sampled universes and linguistic variables.
//! - [`rule`] -- Rules as plain data, with a small builder.
//! - [`engine`] -- Validation, rule firing, aggregation, and centroid
//!   defuzzification.
//! - [`error`] -- [`FuzzyError`].

pub mod engine;
pub mod error;
pub mod membership;
pub mod rule;
pub mod variable;

pub use engine::{CrispOutput, Inference, InferenceEngine, defuzzify_centroid};
pub use error::FuzzyError;
pub use membership::MembershipFunction;
pub use rule::{Clause, Rule, is};
pub use variable::{LinguisticVariable, Term, Universe};
