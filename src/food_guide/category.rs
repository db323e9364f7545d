use serde::Serialize;
use std::fmt;

/// Canada Food Guide (2019) plate categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CfgCategory {
    VegetablesAndFruits,
    WholeGrains,
    ProteinFoods,
    /// Intake outside the guide's plate; its target share is zero.
    Other,
}

impl CfgCategory {
    pub const ALL: [CfgCategory; 4] = [
        CfgCategory::VegetablesAndFruits,
        CfgCategory::WholeGrains,
        CfgCategory::ProteinFoods,
        CfgCategory::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CfgCategory::VegetablesAndFruits => "Vegetables & Fruits",
            CfgCategory::WholeGrains => "Whole Grains",
            CfgCategory::ProteinFoods => "Protein Foods",
            CfgCategory::Other => "Other",
        }
    }

    /// Recommended share of the plate, in percent.
    pub fn target_percentage(&self) -> f64 {
        match self {
            CfgCategory::VegetablesAndFruits => 50.0,
            CfgCategory::WholeGrains => 25.0,
            CfgCategory::ProteinFoods => 25.0,
            CfgCategory::Other => 0.0,
        }
    }
}

impl fmt::Display for CfgCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
