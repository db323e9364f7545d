pub mod analyzer;
pub mod category;
pub mod mapper;

pub use analyzer::{CfgAnalysisResult, FoodGuideAnalyzer};
pub use category::CfgCategory;
pub use mapper::{CategoryRule, Classification, FoodGuideCategoryMapper, FoodText, MatchBasis};
