//! Nutrient goals that drive swap suggestions.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GoalError;
use crate::models::Nutrient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalDirection {
    Increase,
    Decrease,
}

impl GoalDirection {
    pub fn label(&self) -> &'static str {
        match self {
            GoalDirection::Increase => "Increase",
            GoalDirection::Decrease => "Decrease",
        }
    }

    /// Turns a raw difference into progress toward the goal: positive is better.
    pub fn signed(&self, difference: f64) -> f64 {
        match self {
            GoalDirection::Increase => difference,
            GoalDirection::Decrease => -difference,
        }
    }
}

impl FromStr for GoalDirection {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "increase" | "inc" | "up" => Ok(GoalDirection::Increase),
            "decrease" | "dec" | "down" => Ok(GoalDirection::Decrease),
            _ => Err(GoalError::Unparseable(s.to_string())),
        }
    }
}

/// How strongly an imprecise goal should pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalIntensity {
    Low,
    Medium,
    High,
}

impl GoalIntensity {
    pub fn label(&self) -> &'static str {
        match self {
            GoalIntensity::Low => "A little",
            GoalIntensity::Medium => "A moderate amount",
            GoalIntensity::High => "A lot",
        }
    }

    /// Score multiplier used in place of a precise amount.
    pub fn weight(&self) -> f64 {
        match self {
            GoalIntensity::Low => 1.5,
            GoalIntensity::Medium => 2.0,
            GoalIntensity::High => 3.0,
        }
    }
}

impl FromStr for GoalIntensity {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(GoalIntensity::Low),
            "medium" => Ok(GoalIntensity::Medium),
            "high" => Ok(GoalIntensity::High),
            _ => Err(GoalError::Unparseable(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTarget {
    /// An exact amount in the nutrient's own unit.
    Precise(f64),
    Imprecise(GoalIntensity),
}

impl FromStr for GoalTarget {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(intensity) = s.parse::<GoalIntensity>() {
            return Ok(GoalTarget::Imprecise(intensity));
        }
        s.trim()
            .parse::<f64>()
            .map(GoalTarget::Precise)
            .map_err(|_| GoalError::Unparseable(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    pub nutrient: Nutrient,
    pub direction: GoalDirection,
    pub target: GoalTarget,
}

impl Goal {
    pub fn precise(nutrient: Nutrient, direction: GoalDirection, amount: f64) -> Self {
        Goal { nutrient, direction, target: GoalTarget::Precise(amount) }
    }

    pub fn imprecise(
        nutrient: Nutrient,
        direction: GoalDirection,
        intensity: GoalIntensity,
    ) -> Self {
        Goal { nutrient, direction, target: GoalTarget::Imprecise(intensity) }
    }

    pub fn is_valid(&self) -> bool {
        match self.target {
            GoalTarget::Precise(amount) => amount.is_finite() && amount > 0.0,
            GoalTarget::Imprecise(_) => true,
        }
    }

    /// Weight applied to this goal's improvement when scoring a swap.
    pub fn target_weight(&self) -> f64 {
        match self.target {
            GoalTarget::Precise(amount) => amount,
            GoalTarget::Imprecise(intensity) => intensity.weight(),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            GoalTarget::Precise(amount) => write!(
                f,
                "{} {} by {:.1} {}",
                self.direction.label(),
                self.nutrient.name,
                amount,
                self.nutrient.unit().unwrap_or_default()
            ),
            GoalTarget::Imprecise(intensity) => write!(
                f,
                "{} {} ({})",
                self.direction.label(),
                self.nutrient.name,
                intensity.label()
            ),
        }
    }
}

/// Rejects an empty goal list, malformed goals, and a nutrient that is both
/// increased and decreased.
pub fn validate_goals(goals: &[Goal]) -> Result<(), GoalError> {
    if goals.is_empty() {
        return Err(GoalError::NoGoals);
    }

    if let Some(goal) = goals.iter().find(|goal| !goal.is_valid()) {
        return Err(GoalError::InvalidGoal {
            goal: goal.to_string(),
            reason: "precise amount must be a positive number".to_string(),
        });
    }

    let mut directions: BTreeMap<&Nutrient, (bool, bool)> = BTreeMap::new();
    for goal in goals {
        let seen = directions.entry(&goal.nutrient).or_insert((false, false));
        match goal.direction {
            GoalDirection::Increase => seen.0 = true,
            GoalDirection::Decrease => seen.1 = true,
        }
        if seen.0 && seen.1 {
            return Err(GoalError::Conflicting { nutrient: goal.nutrient.name.clone() });
        }
    }
    Ok(())
}

/// A goal as typed on the command line, before its nutrient is resolved:
/// `<direction>:<nutrient name or id>:<amount|low|medium|high>`.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalSpec {
    pub direction: GoalDirection,
    pub nutrient: String,
    pub target: GoalTarget,
}

impl FromStr for GoalSpec {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || GoalError::Unparseable(s.to_string());
        let (direction, rest) = s.split_once(':').ok_or_else(unparseable)?;
        let (nutrient, target) = rest.rsplit_once(':').ok_or_else(unparseable)?;
        let nutrient = nutrient.trim();
        if nutrient.is_empty() {
            return Err(unparseable());
        }
        Ok(GoalSpec {
            direction: direction.parse().map_err(|_| unparseable())?,
            nutrient: nutrient.to_string(),
            target: target.parse().map_err(|_| unparseable())?,
        })
    }
}

impl GoalSpec {
    /// Looks the nutrient up by id or by case-insensitive name.
    pub fn resolve<'a, I>(&self, nutrients: I) -> Result<Goal, GoalError>
    where
        I: IntoIterator<Item = &'a Nutrient>,
    {
        let id = self.nutrient.parse::<u32>().ok();
        let nutrient = nutrients
            .into_iter()
            .find(|n| Some(n.id) == id || n.name.eq_ignore_ascii_case(&self.nutrient))
            .ok_or_else(|| GoalError::UnknownNutrient(self.nutrient.clone()))?;
        Ok(Goal { nutrient: nutrient.clone(), direction: self.direction, target: self.target })
    }
}
