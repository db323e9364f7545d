/// Name fragments of nutrients that are water, bulk or bioactive content
/// rather than dietary composition.
pub const DEFAULT_BULK_TERMS: [&str; 5] = ["moisture", "ash", "alcohol", "caffeine", "theobromine"];

/// Excludes nutrients whose mass would swamp a composition chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkNutrientFilter {
    terms: Vec<String>,
}

impl Default for BulkNutrientFilter {
    fn default() -> Self {
        Self::with_terms(DEFAULT_BULK_TERMS)
    }
}

impl BulkNutrientFilter {
    /// Builds a filter from custom terms. Terms are lower-cased; blanks are dropped.
    pub fn with_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        BulkNutrientFilter { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Case-insensitive substring match against the term set.
    pub fn is_bulk(&self, nutrient_name: &str) -> bool {
        let name = nutrient_name.to_lowercase();
        self.terms.iter().any(|term| name.contains(term.as_str()))
    }
}
