//! Mamdani inference: fuzzify, fire, clip, aggregate, defuzzify.
//!
//! An [`InferenceEngine`] is built once from input variables, output
//! variables, and a rule base. Construction resolves every rule clause to
//! variable and term indices and pre-samples each output term over its
//! universe, so evaluation never looks anything up by name.
//!
//! [`InferenceEngine::infer`] takes `&self` and allocates all working state
//! per call. One engine can be shared across threads and evaluated
//! concurrently.
//!
//! # Pipeline
//!
//! 1. Fuzzify every crisp input against its variable's terms.
//! 2. Rule strength = min of its condition degrees, times the rule weight.
//! 3. Clip each conclusion's sampled shape at the rule strength.
//! 4. Aggregate per output by pointwise maximum over all rules.
//! 5. Defuzzify with the discrete centroid `sum(x * mu) / sum(mu)`. A zero
//!    aggregate falls back to the universe midpoint.

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::error::FuzzyError;
use crate::rule::{Clause, Rule};
use crate::variable::LinguisticVariable;

/// `(variable index, term index)` of a resolved clause.
type TermRef = (usize, usize);

#[derive(Debug, Clone, PartialEq)]
struct CompiledRule {
    conditions: Vec<TermRef>,
    conclusions: Vec<TermRef>,
    weight: f64,
}

impl CompiledRule {
    fn strength(&self, fuzzified: &[Vec<f64>]) -> f64 {
        let min_degree = self
            .conditions
            .iter()
            .map(|&(var, term)| {
                fuzzified
                    .get(var)
                    .and_then(|degrees| degrees.get(term))
                    .copied()
                    .unwrap_or(0.0)
            })
            .fold(1.0, f64::min);
        min_degree * self.weight
    }
}

/// An output variable plus each term sampled over the variable's universe.
#[derive(Debug, Clone, PartialEq)]
struct OutputTable {
    variable: LinguisticVariable,
    /// `curves[term][sample]`.
    curves: Vec<Vec<f64>>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One defuzzified output.
#[derive(Debug, Clone, PartialEq)]
pub struct CrispOutput {
    /// Output variable name.
    pub variable: String,
    /// Crisp value.
    pub value: f64,
    /// `true` when no rule contributed and `value` is the universe midpoint.
    pub degenerate: bool,
    /// The aggregated membership, one entry per universe sample.
    pub aggregate: Vec<f64>,
}

/// Everything produced by one [`InferenceEngine::infer`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    outputs: Vec<CrispOutput>,
    rule_strengths: Vec<f64>,
}

impl Inference {
    /// Crisp value of the named output.
    pub fn value(&self, variable: &str) -> Option<f64> {
        self.output(variable).map(|o| o.value)
    }

    /// Full result for the named output.
    pub fn output(&self, variable: &str) -> Option<&CrispOutput> {
        self.outputs.iter().find(|o| o.variable == variable)
    }

    /// All outputs, in the order the engine declares them.
    pub fn outputs(&self) -> &[CrispOutput] {
        &self.outputs
    }

    /// Firing strength of every rule, in rule-base order.
    pub fn rule_strengths(&self) -> &[f64] {
        &self.rule_strengths
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// An immutable, validated Mamdani fuzzy system.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceEngine {
    inputs: Vec<LinguisticVariable>,
    outputs: Vec<OutputTable>,
    rules: Vec<Rule>,
    compiled: Vec<CompiledRule>,
}

impl InferenceEngine {
    /// Validate and compile a fuzzy system.
    ///
    /// # Errors
    ///
    /// - [`FuzzyError::DuplicateVariable`] if two variables share a name.
    /// - [`FuzzyError::EmptyRule`] if a rule lacks conditions or conclusions.
    /// - [`FuzzyError::InvalidWeight`] if a weight is outside 0.0--1.0.
    /// - [`FuzzyError::UnknownVariable`] / [`FuzzyError::UnknownLabel`] if a
    ///   condition does not name an input term or a conclusion does not name
    ///   an output term.
    pub fn new(
        inputs: Vec<LinguisticVariable>,
        outputs: Vec<LinguisticVariable>,
        rules: Vec<Rule>,
    ) -> Result<Self, FuzzyError> {
        {
            let mut seen = BTreeSet::new();
            for name in inputs.iter().chain(&outputs).map(LinguisticVariable::name) {
                if !seen.insert(name) {
                    return Err(FuzzyError::DuplicateVariable(name.to_owned()));
                }
            }
        }

        let compiled = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| compile_rule(index, rule, &inputs, &outputs))
            .collect::<Result<Vec<_>, _>>()?;

        let outputs: Vec<OutputTable> = outputs
            .into_iter()
            .map(|variable| {
                let curves = variable
                    .terms()
                    .iter()
                    .map(|t| t.function.sample(variable.universe().samples()))
                    .collect();
                OutputTable { variable, curves }
            })
            .collect();

        debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            rules = rules.len(),
            "Inference engine built"
        );

        Ok(Self {
            inputs,
            outputs,
            rules,
            compiled,
        })
    }

    /// Input variables in declaration order.
    pub fn inputs(&self) -> &[LinguisticVariable] {
        &self.inputs
    }

    /// The named input variable.
    pub fn input(&self, name: &str) -> Option<&LinguisticVariable> {
        self.inputs.iter().find(|v| v.name() == name)
    }

    /// The named output variable.
    pub fn output(&self, name: &str) -> Option<&LinguisticVariable> {
        self.outputs
            .iter()
            .map(|t| &t.variable)
            .find(|v| v.name() == name)
    }

    /// The rule base, in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run the full Mamdani pipeline for one set of crisp inputs.
    ///
    /// `crisp` pairs input variable names with values; every input variable
    /// must appear. Extra names are ignored. Values outside a variable's
    /// universe are accepted here and simply fuzzify to zero where no term
    /// covers them; range policy belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`FuzzyError::MissingInput`] if an input variable has no
    /// value, or [`FuzzyError::NonFiniteInput`] for NaN or infinite values.
    pub fn infer(&self, crisp: &[(&str, f64)]) -> Result<Inference, FuzzyError> {
        let fuzzified = self
            .inputs
            .iter()
            .map(|variable| {
                let name = variable.name();
                let value = crisp
                    .iter()
                    .find(|(n, _)| *n == name)
                    .map(|&(_, v)| v)
                    .ok_or_else(|| FuzzyError::MissingInput(name.to_owned()))?;
                if !value.is_finite() {
                    return Err(FuzzyError::NonFiniteInput {
                        variable: name.to_owned(),
                        value,
                    });
                }
                Ok(variable.degrees(value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rule_strengths: Vec<f64> = self
            .compiled
            .iter()
            .map(|rule| rule.strength(&fuzzified))
            .collect();

        for (index, strength) in rule_strengths.iter().enumerate() {
            if *strength > 0.0 {
                trace!(rule = index, strength, "Rule fired");
            }
        }

        let outputs = self
            .outputs
            .iter()
            .enumerate()
            .map(|(index, table)| self.defuzzify_output(index, table, &rule_strengths))
            .collect();

        Ok(Inference {
            outputs,
            rule_strengths,
        })
    }

    fn defuzzify_output(
        &self,
        output_index: usize,
        table: &OutputTable,
        rule_strengths: &[f64],
    ) -> CrispOutput {
        let aggregate = aggregate(output_index, table, &self.compiled, rule_strengths);
        let variable = &table.variable;

        let (value, degenerate) = match defuzzify_centroid(variable, &aggregate) {
            Ok(value) => (value, false),
            Err(err) => {
                let fallback = variable.universe().midpoint();
                warn!(
                    variable = variable.name(),
                    fallback,
                    %err,
                    "No rule contributed to output, using universe midpoint"
                );
                (fallback, true)
            }
        };

        CrispOutput {
            variable: variable.name().to_owned(),
            value,
            degenerate,
            aggregate,
        }
    }
}

/// Clip every conclusion on `output_index` at its rule's strength and take
/// the pointwise maximum.
fn aggregate(
    output_index: usize,
    table: &OutputTable,
    rules: &[CompiledRule],
    rule_strengths: &[f64],
) -> Vec<f64> {
    let mut aggregate = vec![0.0_f64; table.variable.universe().samples().len()];

    for (rule, &strength) in rules.iter().zip(rule_strengths) {
        if strength <= 0.0 {
            continue;
        }
        for &(var, term) in &rule.conclusions {
            if var != output_index {
                continue;
            }
            let Some(curve) = table.curves.get(term) else {
                continue;
            };
            for (slot, &mu) in aggregate.iter_mut().zip(curve) {
                *slot = slot.max(strength.min(mu));
            }
        }
    }

    aggregate
}

/// Discrete centroid of `aggregate` over `variable`'s universe samples.
///
/// # Errors
///
/// Returns [`FuzzyError::DegenerateAggregate`] when the aggregate sums to
/// zero and the centroid is undefined.
pub fn defuzzify_centroid(
    variable: &LinguisticVariable,
    aggregate: &[f64],
) -> Result<f64, FuzzyError> {
    let (weighted, total) = variable
        .universe()
        .samples()
        .iter()
        .zip(aggregate)
        .fold((0.0_f64, 0.0_f64), |(weighted, total), (&x, &mu)| {
            (x.mul_add(mu, weighted), total + mu)
        });

    if total > 0.0 {
        let centroid = weighted / total;
        trace!(variable = variable.name(), weighted, total, centroid, "Centroid computed");
        Ok(centroid)
    } else {
        Err(FuzzyError::DegenerateAggregate {
            variable: variable.name().to_owned(),
        })
    }
}

fn compile_rule(
    index: usize,
    rule: &Rule,
    inputs: &[LinguisticVariable],
    outputs: &[LinguisticVariable],
) -> Result<CompiledRule, FuzzyError> {
    if rule.antecedent.is_empty() || rule.consequent.is_empty() {
        return Err(FuzzyError::EmptyRule { rule: index });
    }
    if !(0.0..=1.0).contains(&rule.weight) {
        return Err(FuzzyError::InvalidWeight {
            rule: index,
            weight: rule.weight,
        });
    }

    let conditions = rule
        .antecedent
        .iter()
        .map(|clause| resolve(index, clause, inputs, "input"))
        .collect::<Result<Vec<_>, _>>()?;
    let conclusions = rule
        .consequent
        .iter()
        .map(|clause| resolve(index, clause, outputs, "output"))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledRule {
        conditions,
        conclusions,
        weight: rule.weight,
    })
}

fn resolve(
    rule: usize,
    clause: &Clause,
    variables: &[LinguisticVariable],
    role: &'static str,
) -> Result<TermRef, FuzzyError> {
    let var = variables
        .iter()
        .position(|v| v.name() == clause.variable)
        .ok_or_else(|| FuzzyError::UnknownVariable {
            rule,
            role,
            variable: clause.variable.clone(),
        })?;
    let term = variables
        .get(var)
        .and_then(|v| v.term_index(&clause.label))
        .ok_or_else(|| FuzzyError::UnknownLabel {
            rule,
            variable: clause.variable.clone(),
            label: clause.label.clone(),
        })?;
    Ok((var, term))
}
