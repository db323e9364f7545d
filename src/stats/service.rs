use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::models::{Food, Meal};
use crate::stats::aggregator::aggregate_nutrients;
use crate::stats::bulk_filter::BulkNutrientFilter;
use crate::stats::compare::{compare_totals, NutrientChange};
use crate::stats::excluded::{is_bioactive_compound, ExcludedCompounds};
use crate::stats::reduce::{reduce_to_top_k_with_others, to_daily_averages, to_percentages};
use crate::stats::units::to_grams;
use crate::swaps::{Goal, Swap};

/// Number of nutrients shown individually before the rest are bucketed.
pub const DEFAULT_TOP_K: usize = 7;

/// Visualization-ready nutrient breakdown for a set of meals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutrientSummary {
    /// Grams-equivalent per nutrient, reduced to the top entries plus "Other nutrients".
    pub nutrient_totals: BTreeMap<String, f64>,
    pub nutrient_percentages: BTreeMap<String, f64>,
    pub meal_count: usize,
    pub total_weight: f64,
}

impl NutrientSummary {
    pub fn is_empty(&self) -> bool {
        self.nutrient_totals.is_empty()
    }

    /// Same summary with totals expressed per day. Percentages are unaffected.
    pub fn daily_average(&self, days: f64) -> Self {
        let nutrient_totals = to_daily_averages(&self.nutrient_totals, days);
        let total_weight = if days > 0.0 { self.total_weight / days } else { self.total_weight };
        NutrientSummary {
            nutrient_totals,
            nutrient_percentages: self.nutrient_percentages.clone(),
            meal_count: self.meal_count,
            total_weight,
        }
    }
}

/// Nutrient statistics over caller-supplied meals.
///
/// Holds only configuration; every method is a pure function of its inputs,
/// so one instance can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct StatisticsService {
    filter: BulkNutrientFilter,
    top_k: usize,
}

impl Default for StatisticsService {
    fn default() -> Self {
        StatisticsService::new(BulkNutrientFilter::default(), DEFAULT_TOP_K)
    }
}

impl StatisticsService {
    pub fn new(filter: BulkNutrientFilter, top_k: usize) -> Self {
        StatisticsService { filter, top_k }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        StatisticsService::new(config.bulk_filter(), config.top_k)
    }

    pub fn filter(&self) -> &BulkNutrientFilter {
        &self.filter
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Raw grams-equivalent totals, one entry per nutrient name.
    pub fn aggregate(&self, meals: &[Meal]) -> BTreeMap<String, f64> {
        aggregate_nutrients(meals, &self.filter)
    }

    /// Aggregated totals reduced to the configured top-k plus "Other nutrients".
    pub fn nutrient_totals(&self, meals: &[Meal]) -> BTreeMap<String, f64> {
        reduce_to_top_k_with_others(&self.aggregate(meals), self.top_k)
    }

    /// Aggregate, reduce, and convert to percentage shares.
    pub fn calculate_nutrient_breakdown(&self, meals: &[Meal]) -> NutrientSummary {
        let nutrient_totals = self.nutrient_totals(meals);
        let nutrient_percentages = to_percentages(&nutrient_totals);
        let total_weight: f64 = nutrient_totals.values().sum();
        info!(
            meals = meals.len(),
            nutrients = nutrient_totals.len(),
            total_weight,
            "nutrient breakdown complete"
        );
        NutrientSummary {
            nutrient_totals,
            nutrient_percentages,
            meal_count: meals.len(),
            total_weight,
        }
    }

    pub fn excluded_compounds(&self, meals: &[Meal]) -> ExcludedCompounds {
        ExcludedCompounds::from_meals(meals)
    }

    /// Grams-equivalent per base unit of one food, filtered the same way as
    /// [`aggregate`](Self::aggregate). Useful for side-by-side food comparisons.
    pub fn food_nutrient_totals(&self, food: &Food) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for (nutrient, amount) in &food.nutrient_amounts {
            let Some(amount) = amount.filter(|a| a.is_finite() && *a > 0.0) else {
                continue;
            };
            if self.filter.is_bulk(&nutrient.name) || is_bioactive_compound(nutrient) {
                continue;
            }
            let grams = to_grams(amount, nutrient.unit());
            *totals.entry(nutrient.name.clone()).or_insert(0.0) += grams;
        }
        totals
    }

    /// Nutrient-by-nutrient comparison of two meal lists (e.g. before and after a swap).
    pub fn compare_meals(
        &self,
        before: &[Meal],
        after: &[Meal],
        priority: &[&str],
    ) -> Vec<NutrientChange> {
        compare_totals(&self.aggregate(before), &self.aggregate(after), priority)
    }

    /// Effect of applying `swap` to `meals`, with the goal nutrients listed first.
    pub fn compare_swap(&self, meals: &[Meal], swap: &Swap, goals: &[Goal]) -> Vec<NutrientChange> {
        let priority: Vec<&str> = goals.iter().map(|goal| goal.nutrient.name.as_str()).collect();
        self.compare_meals(meals, &swap.apply(meals), &priority)
    }
}
