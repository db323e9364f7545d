//! Totals for compounds that are kept out of the composition chart but are
//! still worth reporting: alcohol, caffeine, theobromine and food energy.

use serde::Serialize;

use crate::models::{Meal, Nutrient};
use crate::stats::units::to_grams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compound {
    Alcohol,
    Caffeine,
    Theobromine,
    EnergyKcal,
}

fn compound_of(nutrient: &Nutrient) -> Option<Compound> {
    let name = nutrient.name.to_lowercase();
    let unit = nutrient.unit().map(|u| u.trim().to_lowercase()).unwrap_or_default();

    if name.contains("alcohol") {
        Some(Compound::Alcohol)
    } else if name.contains("caffeine") {
        Some(Compound::Caffeine)
    } else if name.contains("theobromine") {
        Some(Compound::Theobromine)
    } else if unit != "kj"
        && (unit == "kcal" || name.contains("kilocalories") || name.contains("kcal"))
        && (name.contains("energy") || name.contains("kcal") || name.contains("kilocalories"))
    {
        // Kilojoule rows describe the same energy and would double count.
        Some(Compound::EnergyKcal)
    } else {
        None
    }
}

/// Alcohol, caffeine and theobromine. These never reach a nutrient total,
/// whatever bulk terms are configured, so they are only reported here.
pub fn is_bioactive_compound(nutrient: &Nutrient) -> bool {
    matches!(
        compound_of(nutrient),
        Some(Compound::Alcohol | Compound::Caffeine | Compound::Theobromine)
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExcludedCompounds {
    pub alcohol_g: f64,
    pub caffeine_g: f64,
    pub theobromine_g: f64,
    /// Scaled kilocalories, not converted to grams.
    pub energy_kcal: f64,
}

impl ExcludedCompounds {
    pub fn from_meals(meals: &[Meal]) -> Self {
        let mut totals = ExcludedCompounds::default();
        for item in meals.iter().flat_map(|meal| meal.items.iter()) {
            for (nutrient, base_amount) in &item.food.nutrient_amounts {
                let Some(base_amount) = base_amount.filter(|amount| *amount > 0.0) else {
                    continue;
                };
                let Some(compound) = compound_of(nutrient) else {
                    continue;
                };
                let scaled = item.scale(base_amount).filter(|s| s.is_finite() && *s >= 0.0);
                let Some(scaled) = scaled else {
                    continue;
                };
                let grams = to_grams(scaled, nutrient.unit());
                match compound {
                    Compound::Alcohol => totals.alcohol_g += grams,
                    Compound::Caffeine => totals.caffeine_g += grams,
                    Compound::Theobromine => totals.theobromine_g += grams,
                    Compound::EnergyKcal => totals.energy_kcal += scaled,
                }
            }
        }
        totals
    }

    /// Per-day figures; non-positive day counts leave the totals unchanged.
    pub fn per_day(&self, days: f64) -> Self {
        if days <= 0.0 {
            return *self;
        }
        ExcludedCompounds {
            alcohol_g: self.alcohol_g / days,
            caffeine_g: self.caffeine_g / days,
            theobromine_g: self.theobromine_g / days,
            energy_kcal: self.energy_kcal / days,
        }
    }

    /// One-sentence summary. With `days > 1` the figures are averaged per day.
    pub fn describe(&self, days: f64) -> String {
        let (figures, suffix) =
            if days > 1.0 { (self.per_day(days), "/day") } else { (*self, "") };
        format!(
            "You consumed {:.2} kcal{suffix}, {:.3}g{suffix} alcohol, {:.3}g{suffix} caffeine, \
             and {:.3}g{suffix} theobromine. Bioactive compounds are excluded from the \
             nutrient breakdown, as are moisture and ash.",
            figures.energy_kcal,
            figures.alcohol_g,
            figures.caffeine_g,
            figures.theobromine_g,
            suffix = suffix,
        )
    }
}
