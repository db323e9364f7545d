use chrono::NaiveDate;
use meal_stats::food_guide::{CfgCategory, FoodGuideAnalyzer, FoodGuideCategoryMapper, MatchBasis};
use meal_stats::models::{Food, FoodGroup, Meal, MealItem, MealType, Measure};
use std::collections::BTreeMap;
use std::sync::Arc;

fn food(description: &str, group: &str) -> Food {
    Food::new(
        1,
        description,
        Some(Arc::new(FoodGroup::new(1, group))),
        BTreeMap::new(),
        vec![Measure::new(1, "100g", 100.0)],
    )
}

#[test]
fn test_group_mapping_fixtures() {
    let mapper = FoodGuideCategoryMapper::new();
    let cases = [
        ("Broccoli, raw", "Vegetables and Vegetable Products", CfgCategory::VegetablesAndFruits),
        ("Milk, partly skimmed, 2% M.F.", "Dairy and Egg Products", CfgCategory::ProteinFoods),
        ("Oat bran, cooked", "Breakfast cereals", CfgCategory::WholeGrains),
        ("Beef stew, with vegetables, canned", "Mixed Dishes", CfgCategory::ProteinFoods),
        ("Juice, tomato and vegetable", "Mixed Dishes", CfgCategory::VegetablesAndFruits),
        ("Popcorn, air-popped", "Snacks", CfgCategory::Other),
    ];
    for (description, group, expected) in cases {
        let actual = mapper.map_food(&food(description, group));
        assert_eq!(actual, expected, "{} / {}", description, group);
    }
}

#[test]
fn test_beverage_descriptions() {
    let mapper = FoodGuideCategoryMapper::new();
    assert_eq!(
        mapper.map_food(&food("Juice, tomato and vegetable", "Beverages")),
        CfgCategory::VegetablesAndFruits
    );
    assert_eq!(
        mapper.map_food(&food("Milk, chocolate, 1%", "Beverages")),
        CfgCategory::ProteinFoods
    );

    let tea = mapper.classify(&food("Tea, green, brewed", "Beverages"));
    assert_eq!(tea.category, CfgCategory::Other);
    assert_eq!(tea.basis, MatchBasis::Description);

    let steamed = mapper.classify(&food("Vegetable juice, steamed blend", "Beverages"));
    assert_eq!(steamed.category, CfgCategory::VegetablesAndFruits);
}

#[test]
fn test_rules_are_exposed_in_priority_order() {
    let rules = FoodGuideCategoryMapper::new().rules();
    let position = |name: &str| rules.iter().position(|r| r.name == name).unwrap();
    assert!(position("produce-group-drink") < position("produce-group"));
    assert!(position("mixed-dish-vegetable") < position("protein-group"));
    assert!(position("beverage-juice") < position("beverage-other"));
    assert_eq!(rules.last().unwrap().basis, MatchBasis::NonGuidelineGroup);
}

#[test]
fn test_plate_of_broccoli_milk_and_oats() {
    let broccoli = Arc::new(food("Broccoli, raw", "Vegetables and Vegetable Products"));
    let milk = Arc::new(food("Milk, 2%", "Dairy and Egg Products"));
    let oats = Arc::new(food("Oats", "Breakfast cereals"));
    let serving = Measure::new(1, "100g", 100.0);
    let at = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap().and_hms_opt(7, 30, 0).unwrap();
    let meal = Meal::new(
        1,
        MealType::Breakfast,
        at,
        1,
        vec![
            MealItem::new(1, broccoli, serving.clone(), 1.0),
            MealItem::new(2, milk, serving.clone(), 0.5),
            MealItem::new(3, oats, serving, 0.5),
        ],
    );

    let result = FoodGuideAnalyzer::default().analyze(&[meal]);
    assert_eq!(result.total_grams, 200.0);
    assert_eq!(result.actual_percentages[&CfgCategory::VegetablesAndFruits], 50.0);
    assert_eq!(result.actual_percentages[&CfgCategory::ProteinFoods], 25.0);
    assert_eq!(result.actual_percentages[&CfgCategory::WholeGrains], 25.0);
    assert_eq!(result.actual_percentages[&CfgCategory::Other], 0.0);
    assert!(result.unclassified_foods.is_empty());
}

#[test]
fn test_empty_analysis() {
    let result = FoodGuideAnalyzer::default().analyze(&[]);
    assert_eq!(result.total_grams, 0.0);
    assert!(result.unclassified_foods.is_empty());
    assert!(result.actual_percentages.is_empty());
    assert_eq!(result.target_percentages.values().sum::<f64>(), 100.0);
}
