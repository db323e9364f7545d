use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Key of the aggregate bucket produced by [`reduce_to_top_k_with_others`].
pub const OTHER_NUTRIENTS: &str = "Other nutrients";

/// Keeps the `k` largest entries and folds the rest into [`OTHER_NUTRIENTS`].
///
/// Entries are ranked by value, descending; equal values rank by name,
/// ascending. The remainder bucket is omitted when nothing is left over or the
/// leftovers sum to exactly zero. The output always sums to the input total.
pub fn reduce_to_top_k_with_others(
    totals: &BTreeMap<String, f64>,
    k: usize,
) -> BTreeMap<String, f64> {
    let mut ranked: Vec<(&String, f64)> =
        totals.iter().map(|(name, value)| (name, *value)).collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let mut reduced: BTreeMap<String, f64> = ranked
        .iter()
        .take(k)
        .map(|(name, value)| ((*name).clone(), *value))
        .collect();

    let remainder: f64 = ranked.iter().skip(k).map(|(_, value)| value).sum();
    if ranked.len() > k && remainder != 0.0 {
        *reduced.entry(OTHER_NUTRIENTS.to_string()).or_insert(0.0) += remainder;
    }
    reduced
}

/// Converts totals into shares of 100. A zero (or empty) total yields an empty map.
pub fn to_percentages<K: Ord + Clone>(totals: &BTreeMap<K, f64>) -> BTreeMap<K, f64> {
    let sum: f64 = totals.values().sum();
    if sum == 0.0 || !sum.is_finite() {
        return BTreeMap::new();
    }
    totals
        .iter()
        .map(|(key, value)| (key.clone(), 100.0 * value / sum))
        .collect()
}

/// Divides each total by `days`. Non-positive day counts return the totals unchanged.
pub fn to_daily_averages<K: Ord + Clone>(totals: &BTreeMap<K, f64>, days: f64) -> BTreeMap<K, f64> {
    if days <= 0.0 {
        return totals.clone();
    }
    totals
        .iter()
        .map(|(key, value)| (key.clone(), value / days))
        .collect()
}
