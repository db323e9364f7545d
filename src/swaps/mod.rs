//! Food swap suggestions driven by nutrient goals.

pub mod generator;
pub mod goal;

pub use generator::{is_swap_beneficial, swap_score, Swap, SwapGenerator, DEFAULT_MAX_SWAPS};
pub use goal::{validate_goals, Goal, GoalDirection, GoalIntensity, GoalSpec, GoalTarget};
