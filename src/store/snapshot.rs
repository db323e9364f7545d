//! JSON snapshot of the food database and a user's meal log.
//!
//! Records refer to each other by id; [`Snapshot::into_store`] resolves those
//! references into the shared `Arc` graph the analytics code works on and
//! rejects anything dangling.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use super::memory::InMemoryMealStore;
use super::MealStore;
use crate::error::StoreError;
use crate::models::{Food, FoodGroup, Meal, MealItem, MealType, Measure, Nutrient};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
    #[serde(default)]
    pub food_groups: Vec<FoodGroup>,
    #[serde(default)]
    pub foods: Vec<FoodRecord>,
    #[serde(default)]
    pub meals: Vec<MealRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodRecord {
    pub id: u32,
    pub description: String,
    #[serde(default)]
    pub food_group_id: Option<u32>,
    #[serde(default)]
    pub nutrient_amounts: Vec<NutrientAmountRecord>,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutrientAmountRecord {
    pub nutrient_id: u32,
    /// `null` when the database has no value for this nutrient.
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: u32,
    pub meal_type: MealType,
    pub created_at: NaiveDateTime,
    pub user_id: u32,
    #[serde(default)]
    pub items: Vec<MealItemRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealItemRecord {
    pub id: u32,
    pub food_id: u32,
    pub measure_id: u32,
    pub quantity: f64,
}

impl Snapshot {
    pub fn into_store(self) -> Result<InMemoryMealStore, StoreError> {
        let mut store = InMemoryMealStore::new();

        for nutrient in self.nutrients {
            store.add_nutrient(nutrient)?;
        }
        for group in self.food_groups {
            store.add_food_group(group)?;
        }

        for record in self.foods {
            let food_group = match record.food_group_id {
                Some(group_id) => {
                    let group = store
                        .food_group(group_id)
                        .ok_or(StoreError::UnknownFoodGroup { food_id: record.id, group_id })?;
                    Some(group)
                }
                None => None,
            };
            let mut nutrient_amounts = BTreeMap::new();
            for amount in record.nutrient_amounts {
                let nutrient =
                    store.nutrient(amount.nutrient_id).ok_or(StoreError::UnknownNutrient {
                        food_id: record.id,
                        nutrient_id: amount.nutrient_id,
                    })?;
                nutrient_amounts.insert(nutrient, amount.amount);
            }
            store.add_food(Food::new(
                record.id,
                &record.description,
                food_group,
                nutrient_amounts,
                record.measures,
            ))?;
        }

        for record in self.meals {
            let mut items = Vec::with_capacity(record.items.len());
            for item in record.items {
                let food = store.food(item.food_id).ok_or(StoreError::UnknownFood {
                    item_id: item.id,
                    food_id: item.food_id,
                })?;
                let measure =
                    food.measure(item.measure_id).cloned().ok_or(StoreError::MeasureNotOffered {
                        item_id: item.id,
                        food_id: item.food_id,
                        measure_id: item.measure_id,
                    })?;
                items.push(MealItem::new(item.id, food, measure, item.quantity));
            }
            store.add_meal(Meal::new(
                record.id,
                record.meal_type,
                record.created_at,
                record.user_id,
                items,
            ))?;
        }

        info!(meals = store.meal_count(), "snapshot loaded");
        Ok(store)
    }
}

pub fn load_snapshot_str(json: &str) -> Result<InMemoryMealStore, StoreError> {
    let snapshot: Snapshot = serde_json::from_str(json)?;
    snapshot.into_store()
}

pub fn load_snapshot(path: &Path) -> Result<InMemoryMealStore, StoreError> {
    let json = std::fs::read_to_string(path)?;
    load_snapshot_str(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "nutrients": [
            {"id": 203, "symbol": "PROT", "unit": "g", "name": "PROTEIN"},
            {"id": 255, "symbol": "MOIST", "unit": "g", "name": "MOISTURE"}
        ],
        "food_groups": [{"id": 11, "name": "Vegetables and Vegetable Products"}],
        "foods": [
            {
                "id": 1,
                "description": "Broccoli, raw",
                "food_group_id": 11,
                "nutrient_amounts": [
                    {"nutrient_id": 203, "amount": 2.8},
                    {"nutrient_id": 255, "amount": null}
                ],
                "measures": [{"id": 1, "name": "100g", "conversion_value": 1.0}]
            },
            {"id": 2, "description": "Mystery bar"}
        ],
        "meals": [
            {
                "id": 1,
                "meal_type": "dinner",
                "created_at": "2025-02-01T18:30:00",
                "user_id": 1,
                "items": [{"id": 1, "food_id": 1, "measure_id": 1, "quantity": 1.5}]
            }
        ]
    }"#;

    #[test]
    fn test_load_snapshot_str() {
        let store = load_snapshot_str(SNAPSHOT).unwrap();
        let broccoli = store.food(1).unwrap();
        assert_eq!(broccoli.group_name(), Some("Vegetables and Vegetable Products"));
        assert_eq!(broccoli.nutrient_amount(&store.nutrient(203).unwrap()), Some(2.8));
        assert_eq!(broccoli.nutrient_amount(&store.nutrient(255).unwrap()), None);
        assert!(store.food(2).unwrap().food_group.is_none());

        let day = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let meals = store.meals_in_date_range(day, day).unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].meal_type, MealType::Dinner);
        assert_eq!(meals[0].items[0].quantity, 1.5);
        assert!(Arc::ptr_eq(&meals[0].items[0].food, &broccoli));
    }

    #[test]
    fn test_load_snapshot_from_file() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "{}", SNAPSHOT)?;
        file.flush()?;

        let store = load_snapshot(file.path())?;
        assert_eq!(store.meal_count(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = load_snapshot(Path::new("no_such_snapshot.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn test_dangling_references() {
        let bad_group = SNAPSHOT.replace("\"food_group_id\": 11", "\"food_group_id\": 12");
        assert!(matches!(
            load_snapshot_str(&bad_group).unwrap_err(),
            StoreError::UnknownFoodGroup { food_id: 1, group_id: 12 }
        ));

        let bad_nutrient = SNAPSHOT.replace("{\"nutrient_id\": 255", "{\"nutrient_id\": 256");
        assert!(matches!(
            load_snapshot_str(&bad_nutrient).unwrap_err(),
            StoreError::UnknownNutrient { nutrient_id: 256, .. }
        ));

        let bad_food = SNAPSHOT.replace("\"food_id\": 1,", "\"food_id\": 3,");
        assert!(matches!(
            load_snapshot_str(&bad_food).unwrap_err(),
            StoreError::UnknownFood { food_id: 3, .. }
        ));

        let bad_measure = SNAPSHOT.replace("\"measure_id\": 1", "\"measure_id\": 4");
        assert!(matches!(
            load_snapshot_str(&bad_measure).unwrap_err(),
            StoreError::MeasureNotOffered { measure_id: 4, .. }
        ));
    }

    #[test]
    fn test_invalid_json_and_meal_type() {
        assert!(matches!(load_snapshot_str("{").unwrap_err(), StoreError::InvalidJson(_)));
        let bad_type = SNAPSHOT.replace("\"dinner\"", "\"brunch\"");
        let err = load_snapshot_str(&bad_type).unwrap_err();
        assert!(err.to_string().contains("brunch"));
    }
}
