//! Early-period objective.
//!
//! Every true variable costs `period²`, so the solver prefers morning
//! classes without forbidding later ones. This is the only soft rule.

use super::model::TimetableModel;

/// Cost of holding a class in `period`.
#[inline]
pub fn period_cost(period: u32) -> f64 {
    let p = f64::from(period);
    p * p
}

/// Sets the `Σ period²·x` objective. Returns `false` (and sets nothing)
/// when the model has no variables.
pub fn apply_objective(model: &mut TimetableModel) -> bool {
    if model.variable_count() == 0 {
        return false;
    }
    let costs = model
        .space()
        .iter()
        .map(|(id, key)| (id, period_cost(key.period)))
        .collect();
    model.set_objective(costs);
    true
}
