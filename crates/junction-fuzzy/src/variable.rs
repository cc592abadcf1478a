//! Linguistic variables and their sampled universes of discourse.

use std::collections::BTreeMap;

use crate::error::FuzzyError;
use crate::membership::MembershipFunction;

/// Upper bound on universe sample count. Keeps inference time bounded.
const MAX_SAMPLES: usize = 100_000;

/// Slack added before flooring the sample count so that `(max - min) / step`
/// landing a hair under an integer still includes `max`.
const SAMPLE_COUNT_SLACK: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// An evenly spaced, ordered sampling of the closed interval `[min, max]`.
///
/// Samples are `min, min + step, min + 2*step, ...` up to and including the
/// last point not beyond `max`. The samples are the integration grid for
/// centroid defuzzification.
#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
    samples: Vec<f64>,
}

impl Universe {
    /// Sample `[min, max]` every `step`.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::InvalidUniverse`] if any argument is not
    /// finite, `min > max`, `step <= 0`, or the interval would need more
    /// than 100 000 samples.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, FuzzyError> {
        let invalid = |reason| FuzzyError::InvalidUniverse {
            min,
            max,
            step,
            reason,
        };
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(invalid("bounds and step must be finite"));
        }
        if min > max {
            return Err(invalid("min must not exceed max"));
        }
        if step <= 0.0 {
            return Err(invalid("step must be positive"));
        }

        let intervals = ((max - min) / step + SAMPLE_COUNT_SLACK).floor();
        #[allow(clippy::cast_precision_loss)]
        let limit = MAX_SAMPLES as f64;
        if intervals >= limit {
            return Err(invalid("too many samples"));
        }
        // intervals is a non-negative whole number below MAX_SAMPLES.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = (intervals as usize).saturating_add(1);

        let samples = (0..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let offset = i as f64;
                step.mul_add(offset, min).min(max)
            })
            .collect();

        Ok(Self {
            min,
            max,
            step,
            samples,
        })
    }

    /// Integer sampling of `[min, max]` (step 1).
    ///
    /// # Errors
    ///
    /// Same as [`Universe::new`].
    pub fn integers(min: f64, max: f64) -> Result<Self, FuzzyError> {
        Self::new(min, max, 1.0)
    }

    /// Lower bound.
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Sampling step.
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// The ordered sample points.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Centre of the interval; the defuzzification fallback value.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Whether `x` lies within `[min, max]`.
    pub fn contains(&self, x: f64) -> bool {
        (self.min..=self.max).contains(&x)
    }
}

// ---------------------------------------------------------------------------
// Linguistic variable
// ---------------------------------------------------------------------------

/// A labelled membership function belonging to a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// Linguistic label, e.g. `"high"`.
    pub label: String,
    /// Shape of the labelled region.
    pub function: MembershipFunction,
}

/// A named quantity with a sampled universe and uniquely labelled terms.
///
/// Terms keep their registration order; [`fuzzify`](Self::fuzzify) returns
/// them keyed by label.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    name: String,
    universe: Universe,
    terms: Vec<Term>,
}

impl LinguisticVariable {
    /// Create a variable with no terms.
    pub fn new(name: impl Into<String>, universe: Universe) -> Self {
        Self {
            name: name.into(),
            universe,
            terms: Vec::new(),
        }
    }

    /// Builder form of [`add_term`](Self::add_term).
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::DuplicateLabel`] if the label already exists.
    pub fn with_term(
        mut self,
        label: impl Into<String>,
        function: MembershipFunction,
    ) -> Result<Self, FuzzyError> {
        self.add_term(label, function)?;
        Ok(self)
    }

    /// Register a labelled membership function.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::DuplicateLabel`] if the label already exists.
    pub fn add_term(
        &mut self,
        label: impl Into<String>,
        function: MembershipFunction,
    ) -> Result<(), FuzzyError> {
        let label = label.into();
        if self.term_index(&label).is_some() {
            return Err(FuzzyError::DuplicateLabel {
                variable: self.name.clone(),
                label,
            });
        }
        self.terms.push(Term { label, function });
        Ok(())
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sampled universe of discourse.
    pub const fn universe(&self) -> &Universe {
        &self.universe
    }

    /// All terms in registration order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Position of `label` among the terms.
    pub fn term_index(&self, label: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.label == label)
    }

    /// The membership function registered under `label`.
    pub fn term(&self, label: &str) -> Option<&MembershipFunction> {
        self.terms
            .iter()
            .find(|t| t.label == label)
            .map(|t| &t.function)
    }

    /// Degree of `x` in the region labelled `label`.
    pub fn degree(&self, label: &str, x: f64) -> Option<f64> {
        self.term(label).map(|mf| mf.degree(x))
    }

    /// Degree of `x` in every labelled region.
    pub fn fuzzify(&self, x: f64) -> BTreeMap<&str, f64> {
        self.terms
            .iter()
            .map(|t| (t.label.as_str(), t.function.degree(x)))
            .collect()
    }

    /// Degrees of `x` in term registration order.
    pub(crate) fn degrees(&self, x: f64) -> Vec<f64> {
        self.terms.iter().map(|t| t.function.degree(x)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn density() -> LinguisticVariable {
        LinguisticVariable::new("density", Universe::integers(0.0, 100.0).unwrap())
            .with_term("low", MembershipFunction::trapezoid(0.0, 0.0, 15.0, 30.0).unwrap())
            .unwrap()
            .with_term("medium", MembershipFunction::trapezoid(20.0, 35.0, 55.0, 70.0).unwrap())
            .unwrap()
            .with_term("high", MembershipFunction::trapezoid(60.0, 75.0, 100.0, 100.0).unwrap())
            .unwrap()
    }

    #[test]
    fn integer_universe_includes_both_ends() {
        let u = Universe::integers(10.0, 90.0).unwrap();
        assert_eq!(u.samples().len(), 81);
        assert!((u.samples().first().copied().unwrap() - 10.0).abs() < f64::EPSILON);
        assert!((u.samples().last().copied().unwrap() - 90.0).abs() < f64::EPSILON);
        assert!((u.midpoint() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn boolean_universe_has_two_samples() {
        let u = Universe::integers(0.0, 1.0).unwrap();
        assert_eq!(u.samples().len(), 2);
    }

    #[test]
    fn fractional_step_reaches_max() {
        let u = Universe::new(0.0, 1.0, 0.1).unwrap();
        assert_eq!(u.samples().len(), 11);
        assert!((u.samples().last().copied().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_universe() {
        let u = Universe::integers(5.0, 5.0).unwrap();
        assert_eq!(u.samples().len(), 1);
        assert!((u.midpoint() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_universes_are_rejected() {
        assert!(matches!(
            Universe::new(10.0, 0.0, 1.0),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
        assert!(matches!(
            Universe::new(0.0, 10.0, 0.0),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
        assert!(matches!(
            Universe::new(0.0, f64::NAN, 1.0),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
        assert!(matches!(
            Universe::new(0.0, 1.0e9, 1.0),
            Err(FuzzyError::InvalidUniverse { .. })
        ));
    }

    #[test]
    fn fuzzify_zero_density() {
        let var = density();
        let degrees = var.fuzzify(0.0);
        assert_eq!(degrees.len(), 3);
        assert!((degrees.get("low").copied().unwrap() - 1.0).abs() < f64::EPSILON);
        assert!(degrees.get("medium").copied().unwrap().abs() < f64::EPSILON);
        assert!(degrees.get("high").copied().unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn fuzzify_full_density() {
        let var = density();
        let degrees = var.fuzzify(100.0);
        assert!((degrees.get("high").copied().unwrap() - 1.0).abs() < f64::EPSILON);
        assert!(degrees.get("low").copied().unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn overlapping_terms_both_fire() {
        let var = density();
        let low = var.degree("low", 25.0).unwrap();
        let medium = var.degree("medium", 25.0).unwrap();
        assert!((low - 1.0 / 3.0).abs() < 1e-12);
        assert!((medium - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let result = density().with_term("low", MembershipFunction::triangle(0.0, 1.0, 2.0).unwrap());
        assert!(matches!(result, Err(FuzzyError::DuplicateLabel { .. })));
    }

    #[test]
    fn unknown_label_has_no_degree() {
        assert!(density().degree("jammed", 50.0).is_none());
        assert_eq!(density().term_index("high"), Some(2));
    }
}
