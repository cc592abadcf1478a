//! Fuzzy rules as plain data.
//!
//! A rule reads "IF v1 is l1 AND v2 is l2 ... THEN o1 is m1, o2 is m2". The
//! conditions are combined with the minimum t-norm; the rule's strength is
//! that minimum scaled by the rule weight.

/// A `(variable, label)` pair: "`variable` is `label`".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Clause {
    /// Variable name.
    pub variable: String,
    /// Term label on that variable.
    pub label: String,
}

impl Clause {
    /// Build a clause.
    pub fn new(variable: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            label: label.into(),
        }
    }
}

/// Shorthand for [`Clause::new`], reads as `is("density", "high")`.
pub fn is(variable: impl Into<String>, label: impl Into<String>) -> Clause {
    Clause::new(variable, label)
}

/// A conjunction of input clauses mapped to one or more output clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Optional name used in logs and traces.
    pub name: Option<String>,
    /// Conditions, combined with fuzzy AND (minimum).
    pub antecedent: Vec<Clause>,
    /// Conclusions, each clipped at the rule's firing strength.
    pub consequent: Vec<Clause>,
    /// Scales the firing strength; 1.0 unless set otherwise.
    pub weight: f64,
}

impl Rule {
    /// Start a rule with its first condition.
    pub fn when(clause: Clause) -> Self {
        Self {
            name: None,
            antecedent: vec![clause],
            consequent: Vec::new(),
            weight: 1.0,
        }
    }

    /// Add a condition (fuzzy AND).
    #[must_use]
    pub fn and(mut self, clause: Clause) -> Self {
        self.antecedent.push(clause);
        self
    }

    /// Add a conclusion.
    #[must_use]
    pub fn then(mut self, clause: Clause) -> Self {
        self.consequent.push(clause);
        self
    }

    /// Set the rule weight. Validated when the engine is built.
    #[must_use]
    pub const fn weighted(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Attach a name for logs.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name for logs: the explicit name, or `rule#<index>`.
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("rule#{index}"))
    }
}
