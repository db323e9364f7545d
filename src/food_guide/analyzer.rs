use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::food_guide::category::CfgCategory;
use crate::food_guide::mapper::{Classification, FoodGuideCategoryMapper};
use crate::models::{Food, Meal};
use crate::stats::reduce::to_percentages;

const MISSING_GROUP_LABEL: &str = "no food group";

/// How a set of meals compares to the Canada Food Guide plate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CfgAnalysisResult {
    /// Share of classified mass per category. Empty when nothing was eaten.
    pub actual_percentages: BTreeMap<CfgCategory, f64>,
    pub target_percentages: BTreeMap<CfgCategory, f64>,
    /// Classified mass per category; always holds all four categories.
    pub actual_grams: BTreeMap<CfgCategory, f64>,
    pub total_grams: f64,
    /// Foods that could not be placed with confidence, as "description (group)".
    pub unclassified_foods: Vec<String>,
}

impl CfgAnalysisResult {
    /// Actual minus target share, in percentage points. A missing actual share counts as zero.
    pub fn deviation(&self, category: CfgCategory) -> f64 {
        let actual = self.actual_percentages.get(&category).copied().unwrap_or(0.0);
        actual - category.target_percentage()
    }
}

fn target_percentages() -> BTreeMap<CfgCategory, f64> {
    CfgCategory::ALL
        .iter()
        .map(|category| (*category, category.target_percentage()))
        .collect()
}

fn unclassified_label(food: &Food) -> String {
    format!("{} ({})", food.description, food.group_name().unwrap_or(MISSING_GROUP_LABEL))
}

/// Splits consumed mass across food-guide categories.
#[derive(Debug, Clone, Default)]
pub struct FoodGuideAnalyzer {
    mapper: FoodGuideCategoryMapper,
}

impl FoodGuideAnalyzer {
    pub fn new(mapper: FoodGuideCategoryMapper) -> Self {
        FoodGuideAnalyzer { mapper }
    }

    pub fn mapper(&self) -> &FoodGuideCategoryMapper {
        &self.mapper
    }

    pub fn analyze(&self, meals: &[Meal]) -> CfgAnalysisResult {
        let mut actual_grams: BTreeMap<CfgCategory, f64> =
            CfgCategory::ALL.iter().map(|category| (*category, 0.0)).collect();
        let mut unclassified_foods: Vec<String> = Vec::new();

        for item in meals.iter().flat_map(|meal| meal.items.iter()) {
            let classification: Classification = self.mapper.classify(&item.food);

            if classification.needs_review() {
                let label = unclassified_label(&item.food);
                if !unclassified_foods.contains(&label) {
                    debug!(
                        food = %label,
                        rule = classification.rule,
                        "food not classified with confidence"
                    );
                    unclassified_foods.push(label);
                }
            }

            if item.food.food_group.is_none() {
                continue;
            }
            let Some(mass) = item.serving_mass().filter(|m| m.is_finite() && *m >= 0.0) else {
                debug!(
                    item = item.id,
                    measure = %item.measure.name,
                    "skipping item without usable serving mass"
                );
                continue;
            };

            debug!(
                food = %item.food.description,
                category = %classification.category,
                rule = classification.rule,
                mass,
                "mapped meal item"
            );
            *actual_grams.entry(classification.category).or_insert(0.0) += mass;
        }

        let total_grams: f64 = actual_grams.values().sum();
        let actual_percentages = to_percentages(&actual_grams);
        info!(
            meals = meals.len(),
            total_grams,
            unclassified = unclassified_foods.len(),
            "food guide analysis complete"
        );

        CfgAnalysisResult {
            actual_percentages,
            target_percentages: target_percentages(),
            actual_grams,
            total_grams,
            unclassified_foods,
        }
    }
}
