//! Analysis settings read from the environment (and `.env`, loaded by the binary).

use crate::error::ConfigError;
use crate::stats::bulk_filter::{BulkNutrientFilter, DEFAULT_BULK_TERMS};
use crate::stats::service::DEFAULT_TOP_K;

pub const TOP_K_ENV_VAR: &str = "MEAL_STATS_TOP_K";
pub const BULK_TERMS_ENV_VAR: &str = "MEAL_STATS_BULK_TERMS";
pub const LOG_LEVEL_ENV_VAR: &str = "MEAL_STATS_LOG";

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Nutrients shown individually in a breakdown.
    pub top_k: usize,
    /// Lower-cased name fragments marking bulk nutrients.
    pub bulk_terms: Vec<String>,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            top_k: DEFAULT_TOP_K,
            bulk_terms: DEFAULT_BULK_TERMS.iter().map(|t| t.to_string()).collect(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_top_k(None)
    }

    /// Like [`from_env`](Self::from_env), but an explicit `top_k` wins and the
    /// environment value is then neither read nor validated.
    pub fn from_env_with_top_k(top_k: Option<usize>) -> Result<Self, ConfigError> {
        Self::from_lookup_with_top_k(|key| std::env::var(key).ok(), top_k)
    }

    /// Builds the config from an arbitrary key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with_top_k(lookup, None)
    }

    pub fn from_lookup_with_top_k<F>(lookup: F, top_k: Option<usize>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AnalysisConfig::default();

        match top_k {
            Some(top_k) => config.top_k = top_k,
            None => {
                if let Some(raw) = lookup(TOP_K_ENV_VAR) {
                    config.top_k =
                        raw.trim().parse::<usize>().map_err(|e| ConfigError::InvalidValue {
                            key: TOP_K_ENV_VAR,
                            value: raw.clone(),
                            reason: e.to_string(),
                        })?;
                }
            }
        }

        if let Some(raw) = lookup(BULK_TERMS_ENV_VAR) {
            let terms: Vec<String> = raw
                .split(',')
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            if terms.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: BULK_TERMS_ENV_VAR,
                    value: raw,
                    reason: "expected a comma-separated list of terms".to_string(),
                });
            }
            config.bulk_terms = terms;
        }

        if let Some(raw) = lookup(LOG_LEVEL_ENV_VAR) {
            if !raw.trim().is_empty() {
                config.log_level = raw.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn bulk_filter(&self) -> BulkNutrientFilter {
        BulkNutrientFilter::with_terms(&self.bulk_terms)
    }
}
