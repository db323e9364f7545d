pub mod cli;
pub mod config;
pub mod error;
pub mod food_guide;
pub mod models;
pub mod report;
pub mod stats;
pub mod store;
pub mod swaps;
