use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use super::MealStore;
use crate::error::StoreError;
use crate::models::{Food, FoodGroup, Meal, Nutrient};

/// Meal store held entirely in memory, typically built from a snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMealStore {
    nutrients: BTreeMap<u32, Nutrient>,
    food_groups: BTreeMap<u32, Arc<FoodGroup>>,
    foods: BTreeMap<u32, Arc<Food>>,
    meals: Vec<Meal>,
}

impl InMemoryMealStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_nutrient(&mut self, nutrient: Nutrient) -> Result<(), StoreError> {
        if self.nutrients.contains_key(&nutrient.id) {
            return Err(StoreError::DuplicateId { kind: "nutrient", id: nutrient.id });
        }
        self.nutrients.insert(nutrient.id, nutrient);
        Ok(())
    }

    pub fn add_food_group(&mut self, group: FoodGroup) -> Result<Arc<FoodGroup>, StoreError> {
        if self.food_groups.contains_key(&group.id) {
            return Err(StoreError::DuplicateId { kind: "food group", id: group.id });
        }
        let group = Arc::new(group);
        self.food_groups.insert(group.id, Arc::clone(&group));
        Ok(group)
    }

    pub fn add_food(&mut self, food: Food) -> Result<Arc<Food>, StoreError> {
        if self.foods.contains_key(&food.id) {
            return Err(StoreError::DuplicateId { kind: "food", id: food.id });
        }
        let food = Arc::new(food);
        self.foods.insert(food.id, Arc::clone(&food));
        Ok(food)
    }

    /// Adds a meal after checking that every item's measure belongs to its food.
    pub fn add_meal(&mut self, meal: Meal) -> Result<(), StoreError> {
        if self.meals.iter().any(|m| m.id == meal.id) {
            return Err(StoreError::DuplicateId { kind: "meal", id: meal.id });
        }
        for item in &meal.items {
            if item.food.measure(item.measure.id).is_none() {
                return Err(StoreError::MeasureNotOffered {
                    item_id: item.id,
                    food_id: item.food.id,
                    measure_id: item.measure.id,
                });
            }
        }
        let position = self.meals.partition_point(|m| m.created_at <= meal.created_at);
        self.meals.insert(position, meal);
        Ok(())
    }

    pub fn meal_count(&self) -> usize {
        self.meals.len()
    }

    /// First and last dates with a logged meal.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.meals.first()?.created_at.date();
        let last = self.meals.last()?.created_at.date();
        Some((first, last))
    }
}

impl MealStore for InMemoryMealStore {
    fn meals_in_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Meal>, StoreError> {
        if start > end {
            return Err(StoreError::InvalidDateRange { start, end });
        }
        let meals: Vec<Meal> = self
            .meals
            .iter()
            .filter(|meal| {
                let date = meal.created_at.date();
                start <= date && date <= end
            })
            .cloned()
            .collect();
        debug!(%start, %end, found = meals.len(), "queried meals by date");
        Ok(meals)
    }

    fn food(&self, id: u32) -> Option<Arc<Food>> {
        self.foods.get(&id).cloned()
    }

    fn nutrient(&self, id: u32) -> Option<Nutrient> {
        self.nutrients.get(&id).cloned()
    }

    fn food_group(&self, id: u32) -> Option<Arc<FoodGroup>> {
        self.food_groups.get(&id).cloned()
    }

    fn foods(&self) -> Vec<Arc<Food>> {
        self.foods.values().cloned().collect()
    }

    fn nutrients(&self) -> Vec<Nutrient> {
        self.nutrients.values().cloned().collect()
    }
}
