//! Solver-neutral linear model.
//!
//! Boolean decision variables, linear restrictions over sums of them and
//! a linear cost. Rule families only ever add to the model; nothing is
//! removed once added.

use std::collections::HashSet;

use super::constraints::ConstraintFamily;
use super::variables::VariableSpace;

/// Handle of a decision variable (dense index into the variable space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Comparison of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `Σ coef·x ≤ rhs`
    LessEq,
    /// `Σ coef·x = rhs`
    Equal,
}

/// `Σ coef·x (≤ | =) rhs`, tagged with the rule family that added it.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub family: ConstraintFamily,
    pub terms: Vec<(VarId, i32)>,
    pub relation: Relation,
    pub rhs: i32,
}

impl LinearConstraint {
    /// Evaluates the constraint against a full assignment.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        let lhs: i64 = self
            .terms
            .iter()
            .filter(|(v, _)| values.get(v.0).copied().unwrap_or(false))
            .map(|&(_, c)| i64::from(c))
            .sum();
        match self.relation {
            Relation::LessEq => lhs <= i64::from(self.rhs),
            Relation::Equal => lhs == i64::from(self.rhs),
        }
    }

    /// The variable this constraint pins to false, if it is a single-variable `x = 0`.
    pub fn forced_false(&self) -> Option<VarId> {
        match (self.relation, self.rhs, self.terms.as_slice()) {
            (Relation::Equal, 0, [(v, c)]) if *c != 0 => Some(*v),
            _ => None,
        }
    }
}

/// Decision variables, constraints and objective of one request.
#[derive(Debug, Clone)]
pub struct TimetableModel {
    space: VariableSpace,
    constraints: Vec<LinearConstraint>,
    objective: Option<Vec<(VarId, f64)>>,
}

impl TimetableModel {
    /// Wraps a variable space with no constraints and no objective.
    pub fn new(space: VariableSpace) -> Self {
        Self {
            space,
            constraints: Vec::new(),
            objective: None,
        }
    }

    pub fn space(&self) -> &VariableSpace {
        &self.space
    }

    pub fn variable_count(&self) -> usize {
        self.space.len()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Constraints contributed by one family.
    pub fn count_for(&self, family: ConstraintFamily) -> usize {
        self.constraints.iter().filter(|c| c.family == family).count()
    }

    /// Forces `var` to false.
    pub fn forbid(&mut self, family: ConstraintFamily, var: VarId) {
        self.constraints.push(LinearConstraint {
            family,
            terms: vec![(var, 1)],
            relation: Relation::Equal,
            rhs: 0,
        });
    }

    /// `Σ vars ≤ bound`.
    pub fn add_at_most(&mut self, family: ConstraintFamily, vars: &[VarId], bound: u32) {
        self.constraints.push(LinearConstraint {
            family,
            terms: vars.iter().map(|&v| (v, 1)).collect(),
            relation: Relation::LessEq,
            rhs: saturating_rhs(bound),
        });
    }

    /// `Σ vars = value`.
    pub fn add_exactly(&mut self, family: ConstraintFamily, vars: &[VarId], value: u32) {
        self.constraints.push(LinearConstraint {
            family,
            terms: vars.iter().map(|&v| (v, 1)).collect(),
            relation: Relation::Equal,
            rhs: saturating_rhs(value),
        });
    }

    /// `a = b`.
    pub fn add_equal(&mut self, family: ConstraintFamily, a: VarId, b: VarId) {
        self.constraints.push(LinearConstraint {
            family,
            terms: vec![(a, 1), (b, -1)],
            relation: Relation::Equal,
            rhs: 0,
        });
    }

    /// Sets the cost vector to minimize.
    pub fn set_objective(&mut self, costs: Vec<(VarId, f64)>) {
        self.objective = Some(costs);
    }

    pub fn objective(&self) -> Option<&[(VarId, f64)]> {
        self.objective.as_deref()
    }

    /// Objective value of an assignment (0 without an objective).
    pub fn objective_value(&self, values: &[bool]) -> f64 {
        self.objective()
            .map(|costs| {
                costs
                    .iter()
                    .filter(|(v, _)| values.get(v.0).copied().unwrap_or(false))
                    .map(|(_, c)| c)
                    .sum()
            })
            .unwrap_or(0.0)
    }

    /// Variables pinned to false by some single-variable constraint.
    pub fn forced_false(&self) -> HashSet<VarId> {
        self.constraints
            .iter()
            .filter_map(LinearConstraint::forced_false)
            .collect()
    }

    /// Constraints an assignment breaks.
    pub fn violated_by(&self, values: &[bool]) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied_by(values))
            .collect()
    }

    /// Whether an assignment satisfies every constraint.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied_by(values))
    }
}

fn saturating_rhs(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
