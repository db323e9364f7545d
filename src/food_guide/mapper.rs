//! Food → Canada Food Guide category heuristics.
//!
//! Classification is an ordered table of named rules evaluated top to bottom;
//! the first rule whose predicate holds decides the category. Food-group names
//! are the primary signal. Description text only refines mixed dishes,
//! beverages, and produce-group drinks. Anything the table cannot place is
//! `Other`, and the returned [`Classification`] says whether that was a
//! deliberate call or a guess the caller should review.
//!
//! Matching is done on whole lower-cased words, accepting simple plurals, so
//! "Vegetables" matches `vegetable` and "tea" does not match "steamed".

use serde::Serialize;

use crate::food_guide::category::CfgCategory;
use crate::models::Food;

const PRODUCE_GROUP: &[&str] = &["vegetable", "fruit"];
const GRAIN_GROUP: &[&str] = &["cereal", "grain", "bread", "pasta", "baked", "breakfast"];
const PROTEIN_GROUP: &[&str] = &[
    "dairy", "egg", "meat", "poultry", "beef", "pork", "lamb", "veal", "fish", "finfish",
    "shellfish", "legume", "nut", "sausage", "mixed",
];
const MIXED_GROUP: &[&str] = &["mixed"];
const BEVERAGE_GROUP: &[&str] = &["beverage"];
const NON_GUIDELINE_GROUP: &[&str] = &[
    "fat", "oil", "snack", "sweet", "spice", "herb", "condiment", "confectionery", "other",
    "miscellaneous",
];

const NON_GUIDELINE_DRINKS: &[&str] = &["coffee", "tea", "espresso", "cola", "soda", "drink"];
const VEGETABLE_WORDS: &[&str] =
    &["vegetable", "potato", "pea", "corn", "tomato", "carrot", "salad", "juice"];
const PROTEIN_WORDS: &[&str] = &[
    "chicken", "beef", "pork", "turkey", "ham", "fish", "tuna", "salmon", "shrimp", "egg", "meat",
    "sausage", "lamb", "tofu",
];
const MILK_WORDS: &[&str] = &["milk", "dairy", "yogurt", "yoghurt"];
const JUICE_WORDS: &[&str] = &["juice", "nectar", "vegetable"];

/// Why a food landed in its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    /// The food-group name alone decided it.
    GroupName,
    /// Description text decided it.
    Description,
    /// The group is known to sit outside the guide (fats, sweets, ...).
    NonGuidelineGroup,
    /// No rule applied.
    Unmatched,
    /// The food carries no food group.
    MissingGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: CfgCategory,
    pub basis: MatchBasis,
    pub rule: &'static str,
}

impl Classification {
    /// `Other` that came from text heuristics or no match at all, as opposed
    /// to a food group that legitimately sits outside the guide.
    pub fn needs_review(&self) -> bool {
        self.category == CfgCategory::Other
            && matches!(
                self.basis,
                MatchBasis::Description | MatchBasis::Unmatched | MatchBasis::MissingGroup
            )
    }
}

/// Lower-cased word lists of a food's group name and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodText {
    group: Vec<String>,
    description: Vec<String>,
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn word_matches(word: &str, term: &str) -> bool {
    word == term || word.strip_suffix('s') == Some(term) || word.strip_suffix("es") == Some(term)
}

fn any_word(words: &[String], terms: &[&str]) -> bool {
    words.iter().any(|w| terms.iter().any(|t| word_matches(w, t)))
}

impl FoodText {
    /// `None` when the food has no group, which no rule can handle.
    pub fn from_food(food: &Food) -> Option<Self> {
        let group = food.group_name()?;
        Some(FoodText {
            group: words(group),
            description: words(&food.description),
        })
    }

    fn group_has(&self, terms: &[&str]) -> bool {
        any_word(&self.group, terms)
    }

    fn description_has(&self, terms: &[&str]) -> bool {
        any_word(&self.description, terms)
    }
}

/// One entry of the priority table.
#[derive(Clone, Copy)]
pub struct CategoryRule {
    pub name: &'static str,
    pub category: CfgCategory,
    pub basis: MatchBasis,
    predicate: fn(&FoodText) -> bool,
}

impl CategoryRule {
    pub fn applies(&self, text: &FoodText) -> bool {
        (self.predicate)(text)
    }

    /// Whether this rule, taken on its own, would fire for `food`.
    pub fn matches(&self, food: &Food) -> bool {
        FoodText::from_food(food).is_some_and(|text| self.applies(&text))
    }

    fn classification(&self) -> Classification {
        Classification {
            category: self.category,
            basis: self.basis,
            rule: self.name,
        }
    }
}

impl std::fmt::Debug for CategoryRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryRule")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("basis", &self.basis)
            .finish()
    }
}

static RULES: [CategoryRule; 9] = [
    CategoryRule {
        name: "produce-group-drink",
        category: CfgCategory::Other,
        basis: MatchBasis::Description,
        predicate: |t| t.group_has(PRODUCE_GROUP) && t.description_has(NON_GUIDELINE_DRINKS),
    },
    CategoryRule {
        name: "produce-group",
        category: CfgCategory::VegetablesAndFruits,
        basis: MatchBasis::GroupName,
        predicate: |t| t.group_has(PRODUCE_GROUP),
    },
    CategoryRule {
        name: "grain-group",
        category: CfgCategory::WholeGrains,
        basis: MatchBasis::GroupName,
        predicate: |t| t.group_has(GRAIN_GROUP),
    },
    CategoryRule {
        name: "mixed-dish-vegetable",
        category: CfgCategory::VegetablesAndFruits,
        basis: MatchBasis::Description,
        predicate: |t| {
            t.group_has(MIXED_GROUP)
                && t.description_has(VEGETABLE_WORDS)
                && !t.description_has(PROTEIN_WORDS)
        },
    },
    CategoryRule {
        name: "protein-group",
        category: CfgCategory::ProteinFoods,
        basis: MatchBasis::GroupName,
        predicate: |t| t.group_has(PROTEIN_GROUP),
    },
    CategoryRule {
        name: "beverage-milk",
        category: CfgCategory::ProteinFoods,
        basis: MatchBasis::Description,
        predicate: |t| {
            t.group_has(BEVERAGE_GROUP)
                && t.description_has(MILK_WORDS)
                && !t.description_has(NON_GUIDELINE_DRINKS)
        },
    },
    CategoryRule {
        name: "beverage-juice",
        category: CfgCategory::VegetablesAndFruits,
        basis: MatchBasis::Description,
        predicate: |t| {
            t.group_has(BEVERAGE_GROUP)
                && t.description_has(JUICE_WORDS)
                && !t.description_has(NON_GUIDELINE_DRINKS)
        },
    },
    CategoryRule {
        name: "beverage-other",
        category: CfgCategory::Other,
        basis: MatchBasis::Description,
        predicate: |t| t.group_has(BEVERAGE_GROUP),
    },
    CategoryRule {
        name: "non-guideline-group",
        category: CfgCategory::Other,
        basis: MatchBasis::NonGuidelineGroup,
        predicate: |t| t.group_has(NON_GUIDELINE_GROUP),
    },
];

const UNMATCHED: Classification = Classification {
    category: CfgCategory::Other,
    basis: MatchBasis::Unmatched,
    rule: "unmatched",
};

const MISSING_GROUP: Classification = Classification {
    category: CfgCategory::Other,
    basis: MatchBasis::MissingGroup,
    rule: "missing-group",
};

/// Stateless classifier over the static rule table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FoodGuideCategoryMapper;

impl FoodGuideCategoryMapper {
    pub fn new() -> Self {
        FoodGuideCategoryMapper
    }

    /// The rules in priority order.
    pub fn rules(&self) -> &'static [CategoryRule] {
        &RULES
    }

    pub fn map_food(&self, food: &Food) -> CfgCategory {
        self.classify(food).category
    }

    pub fn classify(&self, food: &Food) -> Classification {
        let Some(text) = FoodText::from_food(food) else {
            return MISSING_GROUP;
        };
        RULES
            .iter()
            .find(|rule| rule.applies(&text))
            .map(CategoryRule::classification)
            .unwrap_or(UNMATCHED)
    }
}
