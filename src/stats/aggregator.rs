use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{Meal, MealItem};
use crate::stats::bulk_filter::BulkNutrientFilter;
use crate::stats::excluded::is_bioactive_compound;
use crate::stats::units::{is_recognized_unit, to_grams};

/// Sums grams-equivalent nutrient amounts over every item of every meal.
///
/// Per nutrient: missing or non-positive base amounts are skipped, bulk
/// nutrients and bioactive compounds are skipped, the rest are scaled by
/// `base × conversion × quantity` and normalized with [`to_grams`]. Results are
/// keyed by nutrient display name, so distinct nutrients sharing a name merge
/// additively.
///
/// Bioactive compounds are reported by [`ExcludedCompounds`] instead, so they
/// stay out even when a custom filter omits them.
///
/// [`ExcludedCompounds`]: crate::stats::ExcludedCompounds
pub fn aggregate_nutrients(
    meals: &[Meal],
    filter: &BulkNutrientFilter,
) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for meal in meals {
        for item in &meal.items {
            accumulate_item(item, filter, &mut totals);
        }
    }
    debug!(meals = meals.len(), nutrients = totals.len(), "aggregated nutrient totals");
    totals
}

fn accumulate_item(
    item: &MealItem,
    filter: &BulkNutrientFilter,
    totals: &mut BTreeMap<String, f64>,
) {
    if item.measure.conversion_value.is_none() {
        debug!(
            item_id = item.id,
            measure = %item.measure.name,
            "measure has no conversion factor, item contributes nothing"
        );
        return;
    }

    for (nutrient, base_amount) in &item.food.nutrient_amounts {
        let Some(base_amount) = *base_amount else {
            continue;
        };
        if base_amount <= 0.0 || filter.is_bulk(&nutrient.name) {
            continue;
        }
        if is_bioactive_compound(nutrient) {
            continue;
        }
        let Some(scaled) = item.scale(base_amount) else {
            continue;
        };
        // Negative quantities or factors would break the non-negative totals invariant.
        if !scaled.is_finite() || scaled < 0.0 {
            continue;
        }
        if !is_recognized_unit(nutrient.unit()) {
            debug!(
                nutrient = %nutrient.name,
                unit = ?nutrient.unit,
                "unit not normalized, passing value through"
            );
        }
        let grams = to_grams(scaled, nutrient.unit());
        *totals.entry(nutrient.name.clone()).or_insert(0.0) += grams;
    }
}
