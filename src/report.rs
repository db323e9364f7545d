//! Rendering of analysis results as text, JSON or CSV.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::GoalError;
use crate::food_guide::{CfgAnalysisResult, CfgCategory, FoodGuideAnalyzer};
use crate::models::{Food, Meal};
use crate::stats::{
    ExcludedCompounds, NutrientChange, NutrientSummary, StatisticsService, OTHER_NUTRIENTS,
};
use crate::swaps::{Goal, SwapGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Which analyses to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Nutrients,
    FoodGuide,
    Swaps,
    All,
}

impl ReportKind {
    fn includes_nutrients(self) -> bool {
        matches!(self, ReportKind::Nutrients | ReportKind::All)
    }

    fn includes_food_guide(self) -> bool {
        matches!(self, ReportKind::FoodGuide | ReportKind::All)
    }

    /// `All` only suggests swaps when goals were given; `Swaps` always tries
    /// and fails without goals.
    pub fn includes_swaps(self, has_goals: bool) -> bool {
        match self {
            ReportKind::Swaps => true,
            ReportKind::All => has_goals,
            ReportKind::Nutrients | ReportKind::FoodGuide => false,
        }
    }
}

/// One suggested replacement and what it changes for the goal nutrients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapSuggestion {
    pub meal_id: u32,
    pub item_id: u32,
    pub meal_time: NaiveDateTime,
    pub replace: String,
    pub with: String,
    pub measure: String,
    pub quantity: f64,
    pub score: f64,
    /// Whole-period totals before and after the swap, goal nutrients only.
    pub changes: Vec<NutrientChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapReport {
    pub goals: Vec<String>,
    pub suggestions: Vec<SwapSuggestion>,
}

impl SwapReport {
    pub fn build(
        meals: &[Meal],
        candidate_foods: &[Arc<Food>],
        goals: &[Goal],
        statistics: &StatisticsService,
        generator: &SwapGenerator,
    ) -> Result<Self, GoalError> {
        let swaps = generator.generate_swaps(meals, candidate_foods, goals)?;
        let suggestions = swaps
            .iter()
            .map(|swap| {
                let changes = statistics
                    .compare_swap(meals, swap, goals)
                    .into_iter()
                    .filter(|change| {
                        goals.iter().any(|g| g.nutrient.name.eq_ignore_ascii_case(&change.nutrient))
                    })
                    .collect();
                SwapSuggestion {
                    meal_id: swap.meal_id,
                    item_id: swap.item_id,
                    meal_time: swap.meal_time,
                    replace: swap.old_food.description.clone(),
                    with: swap.new_food.description.clone(),
                    measure: swap.new_measure.name.clone(),
                    quantity: swap.new_quantity,
                    score: swap.score,
                    changes,
                }
            })
            .collect();
        Ok(SwapReport { goals: goals.iter().map(Goal::to_string).collect(), suggestions })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
    pub meal_count: usize,
    /// Nutrient totals and excluded compounds are per-day averages.
    pub daily: bool,
    pub nutrients: Option<NutrientSummary>,
    pub food_guide: Option<CfgAnalysisResult>,
    pub swaps: Option<SwapReport>,
    pub excluded: ExcludedCompounds,
    pub excluded_summary: String,
}

impl AnalysisReport {
    pub fn build(
        meals: &[Meal],
        (start, end): (NaiveDate, NaiveDate),
        kind: ReportKind,
        daily: bool,
        statistics: &StatisticsService,
        analyzer: &FoodGuideAnalyzer,
    ) -> Self {
        let days = (end - start).num_days() + 1;
        let divisor = if daily { days as f64 } else { 1.0 };

        let nutrients = kind.includes_nutrients().then(|| {
            let summary = statistics.calculate_nutrient_breakdown(meals);
            if daily {
                summary.daily_average(divisor)
            } else {
                summary
            }
        });
        let food_guide = kind.includes_food_guide().then(|| analyzer.analyze(meals));
        let excluded_totals = statistics.excluded_compounds(meals);

        AnalysisReport {
            start,
            end,
            days,
            meal_count: meals.len(),
            daily,
            nutrients,
            food_guide,
            swaps: None,
            excluded: excluded_totals.per_day(divisor),
            excluded_summary: excluded_totals.describe(divisor),
        }
    }

    pub fn with_swaps(mut self, swaps: SwapReport) -> Self {
        self.swaps = Some(swaps);
        self
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize report as JSON")
            }
            OutputFormat::Csv => self.to_csv(),
        }
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// One row per figure: `section,name,grams,percent,target`.
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());

        if let Some(summary) = &self.nutrients {
            for (name, grams) in ranked_nutrients(summary) {
                wtr.serialize(CsvRow {
                    section: "nutrients",
                    name,
                    grams: Some(grams),
                    percent: summary.nutrient_percentages.get(name).copied(),
                    target: None,
                })?;
            }
        }

        if let Some(result) = &self.food_guide {
            for category in CfgCategory::ALL {
                wtr.serialize(CsvRow {
                    section: "food_guide",
                    name: category.display_name(),
                    grams: result.actual_grams.get(&category).copied(),
                    percent: result.actual_percentages.get(&category).copied(),
                    target: Some(category.target_percentage()),
                })?;
            }
            for food in &result.unclassified_foods {
                wtr.serialize(CsvRow::named("unclassified", food, None))?;
            }
        }

        if let Some(swaps) = &self.swaps {
            for suggestion in &swaps.suggestions {
                for change in &suggestion.changes {
                    let swap = format!("{} -> {}", suggestion.replace, suggestion.with);
                    let name = format!("{}: {}", swap, change.nutrient);
                    wtr.serialize(CsvRow {
                        section: "swap_change",
                        name: &name,
                        grams: Some(change.delta()),
                        percent: change.percent_change(),
                        target: None,
                    })?;
                }
            }
        }

        for (name, value) in [
            ("alcohol", self.excluded.alcohol_g),
            ("caffeine", self.excluded.caffeine_g),
            ("theobromine", self.excluded.theobromine_g),
        ] {
            wtr.serialize(CsvRow::named("excluded", name, Some(value)))?;
        }
        wtr.serialize(CsvRow::named("energy_kcal", "energy", Some(self.excluded.energy_kcal)))?;

        let bytes = wtr
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
        String::from_utf8(bytes).context("CSV output was not valid UTF-8")
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Meal statistics {} to {} ({} day{}, {} meal{})",
            self.start,
            self.end,
            self.days,
            if self.days == 1 { "" } else { "s" },
            self.meal_count,
            if self.meal_count == 1 { "" } else { "s" },
        )?;
        if self.daily {
            writeln!(f, "Values are daily averages.")?;
        }

        if let Some(summary) = &self.nutrients {
            writeln!(f, "\nNutrient breakdown")?;
            if summary.is_empty() {
                writeln!(f, "  No nutrient data for this period.")?;
            }
            for (name, grams) in ranked_nutrients(summary) {
                let percent = summary.nutrient_percentages.get(name).copied().unwrap_or(0.0);
                writeln!(f, "  {:<32} {:>12.3} g {:>6.1}%", name, grams, percent)?;
            }
            if !summary.is_empty() {
                writeln!(f, "  {:<32} {:>12.3} g", "Total", summary.total_weight)?;
            }
        }

        if let Some(result) = &self.food_guide {
            writeln!(f, "\nCanada Food Guide plate ({:.1} g classified)", result.total_grams)?;
            for category in CfgCategory::ALL {
                let grams = result.actual_grams.get(&category).copied().unwrap_or(0.0);
                let actual = result.actual_percentages.get(&category).copied().unwrap_or(0.0);
                writeln!(
                    f,
                    "  {:<20} {:>10.1} g {:>6.1}%  target {:>4.0}%  ({:+.1})",
                    category.display_name(),
                    grams,
                    actual,
                    category.target_percentage(),
                    result.deviation(category),
                )?;
            }
            if !result.unclassified_foods.is_empty() {
                writeln!(f, "  Not classified with confidence:")?;
                for food in &result.unclassified_foods {
                    writeln!(f, "    - {}", food)?;
                }
            }
        }

        if let Some(swaps) = &self.swaps {
            writeln!(f, "\nSuggested swaps for: {}", swaps.goals.join("; "))?;
            if swaps.suggestions.is_empty() {
                writeln!(f, "  No beneficial swaps found.")?;
            }
            for (rank, suggestion) in swaps.suggestions.iter().enumerate() {
                writeln!(
                    f,
                    "  {}. {} -> {} ({:.2} x {}) at {}, score {:.1}",
                    rank + 1,
                    suggestion.replace,
                    suggestion.with,
                    suggestion.quantity,
                    suggestion.measure,
                    suggestion.meal_time.format("%Y-%m-%d %H:%M"),
                    suggestion.score,
                )?;
                for change in &suggestion.changes {
                    write!(
                        f,
                        "       {:<28} {:>10.3} g -> {:>10.3} g",
                        change.nutrient, change.before, change.after
                    )?;
                    match change.percent_change() {
                        Some(percent) => writeln!(f, " ({:+.1}%)", percent)?,
                        None => writeln!(f)?,
                    }
                }
            }
        }

        writeln!(f, "\n{}", self.excluded_summary)
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    section: &'a str,
    name: &'a str,
    grams: Option<f64>,
    percent: Option<f64>,
    target: Option<f64>,
}

impl<'a> CsvRow<'a> {
    fn named(section: &'a str, name: &'a str, grams: Option<f64>) -> Self {
        CsvRow { section, name, grams, percent: None, target: None }
    }
}

/// Largest first, ties by name, with the "Other nutrients" bucket last.
fn ranked_nutrients(summary: &NutrientSummary) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = summary
        .nutrient_totals
        .iter()
        .map(|(name, grams)| (name.as_str(), *grams))
        .collect();
    ranked.sort_by(|a, b| {
        (a.0 == OTHER_NUTRIENTS)
            .cmp(&(b.0 == OTHER_NUTRIENTS))
            .then_with(|| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
            .then_with(|| a.0.cmp(b.0))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Food, FoodGroup, Measure, MealItem, MealType, Nutrient};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn meals() -> Vec<Meal> {
        let mut amounts = BTreeMap::new();
        amounts.insert(Nutrient::new(203, "PROT", "g", "PROTEIN"), Some(3.0));
        amounts.insert(Nutrient::new(205, "CARB", "g", "CARBOHYDRATE"), Some(7.0));
        amounts.insert(Nutrient::new(208, "KCAL", "kcal", "ENERGY (KILOCALORIES)"), Some(34.0));
        let broccoli = Arc::new(Food::new(
            1,
            "Broccoli, raw",
            Some(Arc::new(FoodGroup::new(11, "Vegetables and Vegetable Products"))),
            amounts,
            vec![Measure::new(1, "100g", 1.0)],
        ));
        let at = day(1).and_hms_opt(12, 0, 0).unwrap();
        let item = MealItem::new(1, broccoli, Measure::new(1, "100g", 1.0), 2.0);
        vec![Meal::new(1, MealType::Lunch, at, 1, vec![item])]
    }

    fn cauliflower() -> Arc<Food> {
        let mut amounts = BTreeMap::new();
        amounts.insert(Nutrient::new(203, "PROT", "g", "PROTEIN"), Some(2.0));
        amounts.insert(Nutrient::new(205, "CARB", "g", "CARBOHYDRATE"), Some(5.0));
        Arc::new(Food::new(
            2,
            "Cauliflower, raw",
            Some(Arc::new(FoodGroup::new(11, "Vegetables and Vegetable Products"))),
            amounts,
            vec![Measure::new(4, "100g", 1.0)],
        ))
    }

    fn carb_goal() -> Goal {
        use crate::swaps::{GoalDirection, GoalIntensity};
        let carbs = Nutrient::new(205, "CARB", "g", "CARBOHYDRATE");
        Goal::imprecise(carbs, GoalDirection::Decrease, GoalIntensity::Low)
    }

    fn swap_report(goals: &[Goal]) -> Result<SwapReport, GoalError> {
        SwapReport::build(
            &meals(),
            &[cauliflower()],
            goals,
            &StatisticsService::default(),
            &SwapGenerator::default(),
        )
    }

    fn report(kind: ReportKind, daily: bool) -> AnalysisReport {
        AnalysisReport::build(
            &meals(),
            (day(1), day(2)),
            kind,
            daily,
            &StatisticsService::default(),
            &FoodGuideAnalyzer::default(),
        )
    }

    #[test]
    fn test_build_all_sections() {
        let report = report(ReportKind::All, false);
        assert_eq!(report.days, 2);
        assert_eq!(report.meal_count, 1);
        let nutrients = report.nutrients.as_ref().unwrap();
        assert_eq!(nutrients.nutrient_totals["CARBOHYDRATE"], 14.0);
        let plate = report.food_guide.as_ref().unwrap();
        assert_eq!(plate.total_grams, 2.0);
        assert_eq!(report.excluded.energy_kcal, 68.0);
        assert!(report.excluded_summary.starts_with("You consumed 68.00 kcal,"));
    }

    #[test]
    fn test_daily_report() {
        let report = report(ReportKind::Nutrients, true);
        assert!(report.food_guide.is_none());
        assert_eq!(report.nutrients.as_ref().unwrap().nutrient_totals["CARBOHYDRATE"], 7.0);
        assert_eq!(report.excluded.energy_kcal, 34.0);
        assert!(report.excluded_summary.contains("34.00 kcal/day"));
    }

    #[test]
    fn test_text_output() {
        let text = report(ReportKind::All, false).to_text();
        assert!(text.starts_with("Meal statistics 2025-04-01 to 2025-04-02 (2 days, 1 meal)"));
        let carb = text.find("CARBOHYDRATE").unwrap();
        let protein = text.find("PROTEIN").unwrap();
        assert!(carb < protein);
        assert!(text.contains("Vegetables & Fruits"));
        assert!(text.contains("You consumed"));
        assert!(!text.contains("Suggested swaps"));
        assert_eq!(text, report(ReportKind::All, false).to_string());
    }

    #[test]
    fn test_swap_report() -> Result<()> {
        let swaps = swap_report(&[carb_goal()])?;
        assert_eq!(swaps.goals, vec!["Decrease CARBOHYDRATE (A little)"]);
        assert_eq!(swaps.suggestions.len(), 1);

        let suggestion = &swaps.suggestions[0];
        assert_eq!(suggestion.replace, "Broccoli, raw");
        assert_eq!(suggestion.with, "Cauliflower, raw");
        assert_eq!(suggestion.quantity, 2.0);
        assert_eq!(suggestion.score, 3.0);
        // Protein also changes but is not a goal.
        assert_eq!(suggestion.changes.len(), 1);
        assert_eq!(suggestion.changes[0].nutrient, "CARBOHYDRATE");
        assert_eq!(suggestion.changes[0].before, 14.0);
        assert_eq!(suggestion.changes[0].after, 10.0);

        assert_eq!(swap_report(&[]).unwrap_err(), GoalError::NoGoals);
        Ok(())
    }

    #[test]
    fn test_swaps_in_text_and_csv() -> Result<()> {
        let report = report(ReportKind::Swaps, false).with_swaps(swap_report(&[carb_goal()])?);
        assert!(report.nutrients.is_none());
        assert!(report.food_guide.is_none());

        let text = report.to_text();
        assert!(text.contains("Suggested swaps for: Decrease CARBOHYDRATE (A little)"));
        let line = "1. Broccoli, raw -> Cauliflower, raw (2.00 x 100g) at 2025-04-01 12:00";
        assert!(text.contains(line));
        assert!(text.contains("(-28.6%)"));

        let csv = report.render(OutputFormat::Csv)?;
        // Names holding commas are quoted by the CSV writer.
        let row = "swap_change,\"Broccoli, raw -> Cauliflower, raw: CARBOHYDRATE\",-4.0,";
        assert!(csv.contains(row));
        Ok(())
    }

    #[test]
    fn test_swaps_only_with_goals() {
        assert!(ReportKind::Swaps.includes_swaps(false));
        assert!(ReportKind::All.includes_swaps(true));
        assert!(!ReportKind::All.includes_swaps(false));
        assert!(!ReportKind::Nutrients.includes_swaps(true));
    }

    #[test]
    fn test_json_output() -> Result<()> {
        let json = report(ReportKind::FoodGuide, false).render(OutputFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&json)?;
        assert!(value["nutrients"].is_null());
        assert_eq!(value["food_guide"]["actual_percentages"]["VEGETABLES_AND_FRUITS"], 100.0);
        assert_eq!(value["food_guide"]["target_percentages"]["WHOLE_GRAINS"], 25.0);
        Ok(())
    }

    #[test]
    fn test_csv_output() -> Result<()> {
        let csv = report(ReportKind::All, false).render(OutputFormat::Csv)?;
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("section,name,grams,percent,target"));
        assert!(lines.next().unwrap().starts_with("nutrients,CARBOHYDRATE,14.0,"));
        assert!(csv.contains("food_guide,Vegetables & Fruits,2.0,100.0,50.0"));
        assert!(csv.contains("energy_kcal,energy,68.0,,"));
        Ok(())
    }

    #[test]
    fn test_ranked_nutrients_puts_other_last() {
        let mut summary = NutrientSummary::default();
        summary.nutrient_totals.insert("A".to_string(), 1.0);
        summary.nutrient_totals.insert(OTHER_NUTRIENTS.to_string(), 50.0);
        summary.nutrient_totals.insert("B".to_string(), 2.0);
        let names: Vec<&str> = ranked_nutrients(&summary).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["B", "A", OTHER_NUTRIENTS]);
    }
}
