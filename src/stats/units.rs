//! Grams-equivalent normalization for nutrient amounts.
//!
//! Mass units convert exactly. Potency and energy units (IU, RE, DFE, NFE, TE,
//! NE, kcal, kJ) are divided by fixed factors purely so that they land on a
//! scale comparable with the mass nutrients in a chart. Those figures are not
//! nutritionally meaningful grams.

const MILLI: f64 = 1_000.0;
const MICRO: f64 = 1_000_000.0;
const KJ_PER_GRAM_EQUIVALENT: f64 = 4_184.0;

/// Divisor for a unit label, or `None` when the label is not in the table.
fn divisor_for(unit: &str) -> Option<f64> {
    let divisor = match unit.trim().to_lowercase().as_str() {
        "g" => 1.0,
        "mg" => MILLI,
        "µg" | "μg" | "ug" | "mcg" => MICRO,
        // Visual-comparability heuristics, see module docs.
        "iu" | "re" | "dfe" | "nfe" | "te" | "ne" | "kcal" => MILLI,
        "kj" => KJ_PER_GRAM_EQUIVALENT,
        _ => return None,
    };
    Some(divisor)
}

/// Converts `value` expressed in `unit` into grams-equivalent.
///
/// Unknown or missing units pass the value through unchanged.
pub fn to_grams(value: f64, unit: Option<&str>) -> f64 {
    match unit.and_then(divisor_for) {
        Some(divisor) => value / divisor,
        None => value,
    }
}

pub fn is_recognized_unit(unit: Option<&str>) -> bool {
    unit.and_then(divisor_for).is_some()
}
