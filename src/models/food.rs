use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A nutrient tracked by the food database (e.g. "PROTEIN", "CALCIUM", "VITAMIN C").
///
/// Two nutrients are the same nutrient when their ids match; the remaining
/// fields are descriptive only.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Nutrient {
    pub id: u32,
    pub symbol: String,
    /// Unit label as stored upstream ("g", "mg", "µg", "IU", "kcal", ...).
    pub unit: Option<String>,
    pub name: String,
}

impl Nutrient {
    pub fn new(id: u32, symbol: &str, unit: &str, name: &str) -> Self {
        Nutrient {
            id,
            symbol: symbol.to_string(),
            unit: Some(unit.to_string()),
            name: name.to_string(),
        }
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// "PROTEIN (g)" style label, falling back gracefully on missing parts.
    pub fn display_name_with_unit(&self) -> String {
        let name = if self.name.is_empty() { "Unknown Nutrient" } else { &self.name };
        match &self.unit {
            Some(unit) => format!("{} ({})", name, unit),
            None => name.to_string(),
        }
    }
}

impl PartialEq for Nutrient {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Nutrient {}

impl Hash for Nutrient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Nutrient {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Nutrient {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

/// Classification label supplied by the food database, e.g. "Dairy and Egg Products".
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct FoodGroup {
    pub id: u32,
    pub name: String,
}

impl FoodGroup {
    pub fn new(id: u32, name: &str) -> Self {
        FoodGroup { id, name: name.to_string() }
    }
}

/// A serving unit ("100ml", "1 cup", "10 chips") and how many base units of
/// the food one of it represents.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Measure {
    pub id: u32,
    pub name: String,
    /// `None` when the upstream record carries no conversion factor; such a
    /// measure contributes nothing to any total.
    pub conversion_value: Option<f64>,
}

impl Measure {
    pub fn new(id: u32, name: &str, conversion_value: f64) -> Self {
        Measure {
            id,
            name: name.to_string(),
            conversion_value: Some(conversion_value),
        }
    }
}

/// A food with its nutrient profile per one canonical base unit.
///
/// Foods are built once by the store and shared read-only through `Arc`.
#[derive(Debug, Clone)]
pub struct Food {
    pub id: u32,
    pub description: String,
    pub food_group: Option<Arc<FoodGroup>>,
    /// Base amount per nutrient; `None` marks a missing upstream value.
    pub nutrient_amounts: BTreeMap<Nutrient, Option<f64>>,
    pub possible_measures: Vec<Measure>,
}

impl Food {
    pub fn new(
        id: u32,
        description: &str,
        food_group: Option<Arc<FoodGroup>>,
        nutrient_amounts: BTreeMap<Nutrient, Option<f64>>,
        possible_measures: Vec<Measure>,
    ) -> Self {
        Food {
            id,
            description: description.to_string(),
            food_group,
            nutrient_amounts,
            possible_measures,
        }
    }

    pub fn group_name(&self) -> Option<&str> {
        self.food_group.as_deref().map(|group| group.name.as_str())
    }

    pub fn nutrient_amount(&self, nutrient: &Nutrient) -> Option<f64> {
        self.nutrient_amounts.get(nutrient).copied().flatten()
    }

    pub fn measure(&self, measure_id: u32) -> Option<&Measure> {
        self.possible_measures.iter().find(|m| m.id == measure_id)
    }
}

impl PartialEq for Food {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Food {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nutrient_identity_is_by_id() {
        let a = Nutrient::new(1, "PROT", "g", "PROTEIN");
        let b = Nutrient::new(1, "P", "mg", "Protein (renamed)");
        let c = Nutrient::new(2, "PROT", "g", "PROTEIN");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }

    #[test]
    fn test_display_name_with_unit() {
        let protein = Nutrient::new(1, "PROT", "g", "PROTEIN");
        assert_eq!(protein.display_name_with_unit(), "PROTEIN (g)");

        let unitless = Nutrient { unit: None, ..protein };
        assert_eq!(unitless.display_name_with_unit(), "PROTEIN");
    }

    #[test]
    fn test_food_lookups() {
        let protein = Nutrient::new(1, "PROT", "g", "PROTEIN");
        let fat = Nutrient::new(2, "FAT", "g", "FAT (TOTAL LIPIDS)");
        let mut amounts = BTreeMap::new();
        amounts.insert(protein.clone(), Some(3.4));
        amounts.insert(fat.clone(), None);

        let group = Arc::new(FoodGroup::new(1, "Dairy and Egg Products"));
        let food = Food::new(
            61,
            "Milk, fluid, partly skimmed, 2% M.F.",
            Some(group),
            amounts,
            vec![Measure::new(341, "250ml", 2.58), Measure::new(1455, "100ml", 1.03)],
        );

        assert_eq!(food.group_name(), Some("Dairy and Egg Products"));
        assert_eq!(food.nutrient_amount(&protein), Some(3.4));
        assert_eq!(food.nutrient_amount(&fat), None);
        assert_eq!(food.measure(1455).map(|m| m.name.as_str()), Some("100ml"));
        assert!(food.measure(9999).is_none());
    }
}
