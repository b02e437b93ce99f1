//! Exhaustive search for the meal triple closest to the macro goals.
//!
//! Every unordered triple is scored, so cost grows with the cube of the
//! candidate count. The candidate cap in [`crate::normalizer`] keeps this at
//! about 34k triples; raising the cap needs a pruning strategy here.

use crate::types::{DetailedMeal, MacroGoals, MacroTotals};

/// Weight applied to the protein deviation.
pub const PROTEIN_WEIGHT: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Combination {
    pub meals: [DetailedMeal; 3],
    /// Unrounded sums over the three meals.
    pub totals: MacroTotals,
    pub penalty: f64,
}

/// Weighted L1 distance between `totals` and `goals`.
pub fn penalty(totals: &MacroTotals, goals: &MacroGoals) -> f64 {
    (totals.calories - goals.calorie_goal).abs()
        + (totals.protein - goals.protein_goal).abs() * PROTEIN_WEIGHT
        + (totals.carbs - goals.carb_goal).abs()
        + (totals.fat - goals.fat_goal).abs()
}

/// Find the triple with the lowest [`penalty`].
///
/// Meals are first ordered by descending protein (stable), then triples are
/// visited in `i < j < k` order. Only a strictly lower penalty replaces the
/// current best, so ties go to the first triple visited. Returns `None` when
/// fewer than three meals are given.
pub fn optimize(meals: &[DetailedMeal], goals: &MacroGoals) -> Option<Combination> {
    if meals.len() < 3 {
        return None;
    }

    let mut ordered: Vec<&DetailedMeal> = meals.iter().collect();
    ordered.sort_by(|a, b| b.nutrition.protein.total_cmp(&a.nutrition.protein));

    let n = ordered.len();
    let mut best: Option<([usize; 3], MacroTotals, f64)> = None;
    let mut evaluated = 0u64;

    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                let totals = MacroTotals::of([ordered[i], ordered[j], ordered[k]]);
                let p = penalty(&totals, goals);
                evaluated += 1;
                if best.as_ref().is_none_or(|(_, _, lowest)| p < *lowest) {
                    best = Some(([i, j, k], totals, p));
                }
            }
        }
    }

    metrics::histogram!("optimizer_combinations_evaluated").record(evaluated as f64);

    best.map(|([i, j, k], totals, penalty)| {
        tracing::debug!(evaluated, penalty, "selected meal combination");
        Combination {
            meals: [ordered[i].clone(), ordered[j].clone(), ordered[k].clone()],
            totals,
            penalty,
        }
    })
}
