pub mod aggregator;
pub mod bulk_filter;
pub mod compare;
pub mod excluded;
pub mod reduce;
pub mod service;
pub mod units;

pub use aggregator::aggregate_nutrients;
pub use bulk_filter::{BulkNutrientFilter, DEFAULT_BULK_TERMS};
pub use compare::{compare_totals, NutrientChange};
pub use excluded::ExcludedCompounds;
pub use reduce::{reduce_to_top_k_with_others, to_daily_averages, to_percentages, OTHER_NUTRIENTS};
pub use service::{NutrientSummary, StatisticsService, DEFAULT_TOP_K};
pub use units::to_grams;
