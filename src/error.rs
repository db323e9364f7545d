use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown meal type: '{0}'")]
pub struct ParseMealTypeError(pub String);

/// Errors raised while building or querying a meal store.
///
/// The analytics engine itself never fails; these only come from the data
/// layer that feeds it.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Food {food_id} references unknown food group {group_id}")]
    UnknownFoodGroup { food_id: u32, group_id: u32 },

    #[error("Food {food_id} references unknown nutrient {nutrient_id}")]
    UnknownNutrient { food_id: u32, nutrient_id: u32 },

    #[error("Meal item {item_id} references unknown food {food_id}")]
    UnknownFood { item_id: u32, food_id: u32 },

    #[error("Meal item {item_id}: measure {measure_id} is not offered by food {food_id}")]
    MeasureNotOffered { item_id: u32, food_id: u32, measure_id: u32 },

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: chrono::NaiveDate, end: chrono::NaiveDate },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue { key: &'static str, value: String, reason: String },
}

/// Rejected nutrient goals; no swaps are generated from an invalid goal list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoalError {
    #[error("At least one goal must be specified")]
    NoGoals,

    #[error("Invalid goal '{goal}': {reason}")]
    InvalidGoal { goal: String, reason: String },

    #[error(
        "Conflicting goals for {nutrient}: cannot both increase and decrease \
         the same nutrient"
    )]
    Conflicting { nutrient: String },

    #[error("Unknown nutrient '{0}' in goal")]
    UnknownNutrient(String),

    #[error(
        "Cannot parse goal '{0}', expected <increase|decrease>:<nutrient>:<amount|low|medium|high>"
    )]
    Unparseable(String),
}
