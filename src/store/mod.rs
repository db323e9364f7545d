//! Read-side access to logged meals and the food database behind them.

pub mod memory;
pub mod snapshot;

use chrono::NaiveDate;
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::{Food, FoodGroup, Meal, Nutrient};

pub use memory::InMemoryMealStore;
pub use snapshot::{load_snapshot, load_snapshot_str, Snapshot};

/// Source of meals for the analytics services.
///
/// Meals handed out must already reference fully resolved foods, and each
/// item's measure must be one of its food's possible measures.
pub trait MealStore {
    /// Meals whose timestamp falls on a date in `start..=end`, ordered by time.
    fn meals_in_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Meal>, StoreError>;

    fn food(&self, id: u32) -> Option<Arc<Food>>;

    fn nutrient(&self, id: u32) -> Option<Nutrient>;

    fn food_group(&self, id: u32) -> Option<Arc<FoodGroup>>;

    /// Every known food, ordered by id. Swap candidates are drawn from here.
    fn foods(&self) -> Vec<Arc<Food>>;

    /// Every known nutrient, ordered by id.
    fn nutrients(&self) -> Vec<Nutrient>;
}
