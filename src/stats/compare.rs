use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Before/after grams-equivalent of one nutrient, e.g. across a food swap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientChange {
    pub nutrient: String,
    pub before: f64,
    pub after: f64,
}

impl NutrientChange {
    pub fn delta(&self) -> f64 {
        self.after - self.before
    }

    /// Relative change in percent; `None` when there was nothing before.
    pub fn percent_change(&self) -> Option<f64> {
        if self.before == 0.0 {
            None
        } else {
            Some(100.0 * self.delta() / self.before)
        }
    }
}

/// Lines up two totals maps nutrient by nutrient.
///
/// Nutrients named in `priority` come first, in the given order (matched
/// case-insensitively); the rest follow by largest absolute change, then name.
/// A nutrient missing from one side counts as zero there.
pub fn compare_totals(
    before: &BTreeMap<String, f64>,
    after: &BTreeMap<String, f64>,
    priority: &[&str],
) -> Vec<NutrientChange> {
    let names: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
    let mut changes: Vec<NutrientChange> = names
        .into_iter()
        .map(|name| NutrientChange {
            nutrient: name.clone(),
            before: before.get(name).copied().unwrap_or(0.0),
            after: after.get(name).copied().unwrap_or(0.0),
        })
        .collect();

    let rank = |change: &NutrientChange| {
        priority
            .iter()
            .position(|p| p.eq_ignore_ascii_case(&change.nutrient))
            .unwrap_or(usize::MAX)
    };
    changes.sort_by(|a, b| {
        rank(a)
            .cmp(&rank(b))
            .then_with(|| b.delta().abs().partial_cmp(&a.delta().abs()).unwrap_or(Ordering::Equal))
            .then_with(|| a.nutrient.cmp(&b.nutrient))
    });
    changes
}
