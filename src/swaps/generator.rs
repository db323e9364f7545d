use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::GoalError;
use crate::models::{Food, Meal, MealItem, Measure};
use crate::swaps::goal::{validate_goals, Goal};

/// Suggestions returned when no explicit limit is configured.
pub const DEFAULT_MAX_SWAPS: usize = 10;

/// Per-base-unit change of a goal's nutrient when `old` is replaced by `new`.
/// A nutrient a food does not report counts as zero.
fn goal_difference(old: &Food, new: &Food, goal: &Goal) -> f64 {
    let before = old.nutrient_amount(&goal.nutrient).unwrap_or(0.0);
    let after = new.nutrient_amount(&goal.nutrient).unwrap_or(0.0);
    after - before
}

/// A swap is worth suggesting when it moves more goals the right way than the
/// wrong way, and at least one the right way.
pub fn is_swap_beneficial(old: &Food, new: &Food, goals: &[Goal]) -> bool {
    let mut improved = 0usize;
    let mut worsened = 0usize;
    for goal in goals {
        let progress = goal.direction.signed(goal_difference(old, new, goal));
        if progress > 0.0 {
            improved += 1;
        } else if progress < 0.0 {
            worsened += 1;
        }
    }
    improved > worsened && improved > 0
}

/// Sum over goals of the progress made in the goal's direction, weighted by
/// the goal's target. Moves in the wrong direction score zero, not negative.
pub fn swap_score(old: &Food, new: &Food, goals: &[Goal]) -> f64 {
    goals
        .iter()
        .map(|goal| {
            let progress = goal.direction.signed(goal_difference(old, new, goal));
            progress.max(0.0) * goal.target_weight()
        })
        .sum()
}

/// A suggested replacement of one logged meal item.
#[derive(Debug, Clone)]
pub struct Swap {
    pub meal_id: u32,
    pub item_id: u32,
    pub meal_time: NaiveDateTime,
    pub old_food: Arc<Food>,
    pub new_food: Arc<Food>,
    /// Measure and quantity of `new_food` giving the same serving mass.
    pub new_measure: Measure,
    pub new_quantity: f64,
    pub score: f64,
}

impl Swap {
    /// The replacement as a meal item, keeping the original item id.
    pub fn replacement_item(&self) -> MealItem {
        MealItem::new(
            self.item_id,
            Arc::clone(&self.new_food),
            self.new_measure.clone(),
            self.new_quantity,
        )
    }

    /// Copy of `meals` with this swap applied; other items are untouched.
    pub fn apply(&self, meals: &[Meal]) -> Vec<Meal> {
        meals
            .iter()
            .map(|meal| {
                let mut meal = meal.clone();
                if meal.id == self.meal_id {
                    for item in meal.items.iter_mut().filter(|item| item.id == self.item_id) {
                        *item = self.replacement_item();
                    }
                }
                meal
            })
            .collect()
    }
}

/// Picks the candidate measure with the same name as the logged one, else the
/// first one with a usable conversion factor.
fn replacement_measure(candidate: &Food, logged: &Measure) -> Option<Measure> {
    let usable = |m: &&Measure| m.conversion_value.is_some_and(|c| c.is_finite() && c > 0.0);
    candidate
        .possible_measures
        .iter()
        .filter(usable)
        .find(|m| m.name.eq_ignore_ascii_case(&logged.name))
        .or_else(|| candidate.possible_measures.iter().find(usable))
        .cloned()
}

/// Suggests food swaps for logged meals that move nutrient goals forward.
#[derive(Debug, Clone)]
pub struct SwapGenerator {
    max_swaps: usize,
}

impl Default for SwapGenerator {
    fn default() -> Self {
        SwapGenerator::new(DEFAULT_MAX_SWAPS)
    }
}

impl SwapGenerator {
    pub fn new(max_swaps: usize) -> Self {
        SwapGenerator { max_swaps }
    }

    pub fn max_swaps(&self) -> usize {
        self.max_swaps
    }

    /// Every logged item is matched against every candidate food. Each
    /// (logged food, candidate) pair is suggested once, at its first logged
    /// occurrence. Results are ordered by score, highest first, ties by food ids.
    pub fn generate_swaps(
        &self,
        meals: &[Meal],
        candidate_foods: &[Arc<Food>],
        goals: &[Goal],
    ) -> Result<Vec<Swap>, GoalError> {
        validate_goals(goals)?;

        let mut seen: BTreeSet<(u32, u32)> = BTreeSet::new();
        let mut swaps = Vec::new();

        for meal in meals {
            for item in &meal.items {
                let Some(mass) = item.serving_mass().filter(|m| m.is_finite() && *m > 0.0) else {
                    continue;
                };
                for candidate in candidate_foods {
                    let pair = (item.food.id, candidate.id);
                    if candidate.id == item.food.id || seen.contains(&pair) {
                        continue;
                    }
                    if !is_swap_beneficial(&item.food, candidate, goals) {
                        continue;
                    }
                    let Some(measure) = replacement_measure(candidate, &item.measure) else {
                        debug!(food = %candidate.description, "candidate has no usable measure");
                        continue;
                    };
                    let conversion = measure.conversion_value.unwrap_or(1.0);
                    seen.insert(pair);
                    swaps.push(Swap {
                        meal_id: meal.id,
                        item_id: item.id,
                        meal_time: meal.created_at,
                        old_food: Arc::clone(&item.food),
                        new_food: Arc::clone(candidate),
                        new_quantity: mass / conversion,
                        new_measure: measure,
                        score: swap_score(&item.food, candidate, goals),
                    });
                }
            }
        }

        swaps.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.old_food.id.cmp(&b.old_food.id))
                .then_with(|| a.new_food.id.cmp(&b.new_food.id))
        });
        let found = swaps.len();
        swaps.truncate(self.max_swaps);
        info!(goals = goals.len(), found, kept = swaps.len(), "swap generation complete");
        Ok(swaps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodGroup, MealType, Nutrient};
    use crate::swaps::goal::{GoalDirection, GoalIntensity};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn protein() -> Nutrient {
        Nutrient::new(203, "PROT", "g", "PROTEIN")
    }

    fn fat() -> Nutrient {
        Nutrient::new(204, "FAT", "g", "FAT (TOTAL LIPIDS)")
    }

    fn sodium() -> Nutrient {
        Nutrient::new(307, "NA", "mg", "SODIUM")
    }

    fn food(
        id: u32,
        description: &str,
        amounts: &[(Nutrient, f64)],
        measures: Vec<Measure>,
    ) -> Arc<Food> {
        let amounts: BTreeMap<Nutrient, Option<f64>> =
            amounts.iter().map(|(n, a)| (n.clone(), Some(*a))).collect();
        Arc::new(Food::new(
            id,
            description,
            Some(Arc::new(FoodGroup::new(1, "Dairy and Egg Products"))),
            amounts,
            measures,
        ))
    }

    fn grams() -> Vec<Measure> {
        vec![Measure::new(1, "100g", 1.0)]
    }

    fn meal_of(food: &Arc<Food>, quantity: f64) -> Meal {
        let at = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let item = MealItem::new(11, Arc::clone(food), food.possible_measures[0].clone(), quantity);
        Meal::new(5, MealType::Breakfast, at, 1, vec![item])
    }

    fn up(nutrient: Nutrient) -> Goal {
        Goal::imprecise(nutrient, GoalDirection::Increase, GoalIntensity::Medium)
    }

    fn down(nutrient: Nutrient) -> Goal {
        Goal::imprecise(nutrient, GoalDirection::Decrease, GoalIntensity::Medium)
    }

    #[test]
    fn test_beneficial_needs_more_improvements_than_worsenings() {
        let old = food(1, "Cheddar", &[(protein(), 25.0), (fat(), 33.0)], grams());
        let leaner = food(2, "Cottage cheese", &[(protein(), 11.0), (fat(), 4.0)], grams());
        let same = food(3, "Cheddar, copy", &[(protein(), 25.0), (fat(), 33.0)], grams());

        // One goal improved, one worsened: a wash, rejected.
        let tie = [up(protein()), down(fat())];
        assert!(!is_swap_beneficial(&old, &leaner, &tie));

        assert!(is_swap_beneficial(&old, &leaner, &[down(fat())]));
        assert!(is_swap_beneficial(&old, &leaner, &[down(fat()), down(sodium())]));
        assert!(!is_swap_beneficial(&old, &same, &[down(fat())]));
        assert!(!is_swap_beneficial(&old, &leaner, &[up(protein())]));
    }

    #[test]
    fn test_score_weights_progress_by_target() {
        let old = food(1, "Cheddar", &[(protein(), 25.0), (fat(), 33.0)], grams());
        let new = food(2, "Cottage cheese", &[(protein(), 11.0), (fat(), 4.0)], grams());

        let exact = [Goal::precise(fat(), GoalDirection::Decrease, 0.5)];
        assert_eq!(swap_score(&old, &new, &exact), 14.5);

        // The worsened protein goal contributes nothing rather than a penalty.
        let mixed = [
            Goal::imprecise(fat(), GoalDirection::Decrease, GoalIntensity::High),
            up(protein()),
        ];
        assert_eq!(swap_score(&old, &new, &mixed), 87.0);
    }

    #[test]
    fn test_generate_orders_by_score() {
        let bacon = food(1, "Bacon", &[(fat(), 40.0), (sodium(), 1700.0)], grams());
        let ham = food(2, "Ham, lean", &[(fat(), 5.0), (sodium(), 1200.0)], grams());
        let turkey = food(3, "Turkey breast", &[(fat(), 1.0), (sodium(), 60.0)], grams());
        let lard = food(4, "Lard", &[(fat(), 100.0)], grams());
        let candidates = vec![Arc::clone(&bacon), ham, turkey, lard];

        let meals = vec![meal_of(&bacon, 0.5)];
        let goals = [down(fat())];
        let swaps = SwapGenerator::default().generate_swaps(&meals, &candidates, &goals).unwrap();

        let names: Vec<&str> = swaps.iter().map(|s| s.new_food.description.as_str()).collect();
        assert_eq!(names, vec!["Turkey breast", "Ham, lean"]);
        assert!(swaps[0].score > swaps[1].score);
        assert_eq!(swaps[0].meal_id, 5);
        assert_eq!(swaps[0].item_id, 11);
        assert_eq!(swaps[0].new_quantity, 0.5);
    }

    #[test]
    fn test_generate_rejects_invalid_goals() {
        let bacon = food(1, "Bacon", &[(fat(), 40.0)], grams());
        let meals = vec![meal_of(&bacon, 1.0)];
        let generator = SwapGenerator::default();

        assert_eq!(generator.generate_swaps(&meals, &[], &[]).unwrap_err(), GoalError::NoGoals);
        let conflicting = [up(fat()), down(fat())];
        assert!(matches!(
            generator.generate_swaps(&meals, &[], &conflicting),
            Err(GoalError::Conflicting { .. })
        ));
    }

    #[test]
    fn test_generate_dedupes_and_limits() {
        let bacon = food(1, "Bacon", &[(fat(), 40.0)], grams());
        let candidates: Vec<Arc<Food>> = (10..25)
            .map(|id| food(id, &format!("Lean {}", id), &[(fat(), 1.0)], grams()))
            .collect();
        let meals = vec![meal_of(&bacon, 1.0), meal_of(&bacon, 2.0)];
        let goals = [down(fat())];

        let all = SwapGenerator::new(100).generate_swaps(&meals, &candidates, &goals).unwrap();
        assert_eq!(all.len(), 15);
        assert!(all.iter().all(|s| s.new_quantity == 1.0));

        let limited = SwapGenerator::default().generate_swaps(&meals, &candidates, &goals).unwrap();
        assert_eq!(limited.len(), DEFAULT_MAX_SWAPS);
        assert_eq!(limited[0].new_food.id, 10);
    }

    #[test]
    fn test_replacement_keeps_serving_mass() {
        let milk = food(1, "Milk, whole", &[(fat(), 3.3)], vec![Measure::new(1, "1 cup", 2.58)]);
        let skim = food(
            2,
            "Milk, skim",
            &[(fat(), 0.1)],
            vec![Measure::new(7, "100ml", 1.03), Measure::new(8, "1 cup", 2.47)],
        );
        let carton = food(3, "Milk, carton", &[(fat(), 0.2)], vec![Measure::new(9, "1 L", 10.3)]);
        let broken = food(4, "Milk, powder", &[(fat(), 0.0)], vec![]);

        let meals = vec![meal_of(&milk, 2.0)];
        let candidates = vec![skim, carton, broken];
        let goals = [down(fat())];
        let swaps = SwapGenerator::default().generate_swaps(&meals, &candidates, &goals).unwrap();
        assert_eq!(swaps.len(), 2);

        let to_skim = swaps.iter().find(|s| s.new_food.id == 2).unwrap();
        assert_eq!(to_skim.new_measure.name, "1 cup");
        assert!((to_skim.new_quantity * 2.47 - 2.0 * 2.58).abs() < 1e-9);

        let to_carton = swaps.iter().find(|s| s.new_food.id == 3).unwrap();
        assert!((to_carton.new_quantity * 10.3 - 2.0 * 2.58).abs() < 1e-9);

        let applied = to_skim.apply(&meals);
        assert_eq!(applied[0].items[0].food.id, 2);
        assert_eq!(applied[0].items[0].id, 11);
        assert_eq!(meals[0].items[0].food.id, 1);
    }
}
