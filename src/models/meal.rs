use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::food::{Food, Measure};
use crate::error::ParseMealTypeError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MealType {
    type Err = ParseMealTypeError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(ParseMealTypeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for MealType {
    type Error = ParseMealTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MealType> for String {
    fn from(value: MealType) -> Self {
        value.label().to_string()
    }
}

/// One food eaten as part of a meal.
///
/// `measure` is expected to be one of `food.possible_measures`; the store
/// upholds that, the analytics code does not re-check it.
#[derive(Debug, Clone)]
pub struct MealItem {
    pub id: u32,
    pub food: Arc<Food>,
    pub measure: Measure,
    /// Number of `measure` units consumed.
    pub quantity: f64,
}

impl MealItem {
    pub fn new(id: u32, food: Arc<Food>, measure: Measure, quantity: f64) -> Self {
        MealItem { id, food, measure, quantity }
    }

    /// Applies the serving chain `base × conversion × quantity`.
    /// `None` when the measure has no conversion factor.
    pub fn scale(&self, base_amount: f64) -> Option<f64> {
        self.measure
            .conversion_value
            .map(|conversion| base_amount * conversion * self.quantity)
    }

    /// Serving mass in base units (quantity × conversion factor).
    pub fn serving_mass(&self) -> Option<f64> {
        self.scale(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct Meal {
    pub id: u32,
    pub meal_type: MealType,
    pub created_at: NaiveDateTime,
    pub user_id: u32,
    pub items: Vec<MealItem>,
}

impl Meal {
    pub fn new(
        id: u32,
        meal_type: MealType,
        created_at: NaiveDateTime,
        user_id: u32,
        items: Vec<MealItem>,
    ) -> Self {
        Meal { id, meal_type, created_at, user_id, items }
    }
}
