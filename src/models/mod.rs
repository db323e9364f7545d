pub mod food;
pub mod meal;

pub use food::{Food, FoodGroup, Measure, Nutrient};
pub use meal::{Meal, MealItem, MealType};
