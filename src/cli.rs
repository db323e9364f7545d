use chrono::NaiveDate;
use clap::Parser;

use crate::report::{OutputFormat, ReportKind};
use crate::swaps::GoalSpec;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Nutrient and Canada Food Guide statistics over logged meals",
    long_about = None
)]
pub struct Cli {
    /// Path to the JSON meal snapshot
    #[arg(short, long)]
    pub snapshot: String,

    /// First day of the period (YYYY-MM-DD); defaults to the first logged meal
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD); defaults to the last logged meal
    #[arg(long)]
    pub to: Option<NaiveDate>,

    #[arg(short, long, value_enum, default_value_t = ReportKind::All)]
    pub report: ReportKind,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Report per-day averages instead of period totals
    #[arg(long)]
    pub daily: bool,

    /// Nutrients shown individually (overrides MEAL_STATS_TOP_K)
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Swap goal as <increase|decrease>:<nutrient name or id>:<amount|low|medium|high>;
    /// repeatable
    #[arg(long = "goal", value_name = "GOAL")]
    pub goals: Vec<GoalSpec>,
}

impl Cli {
    /// Fills missing bounds from the store's logged span. `None` when neither
    /// the flags nor the store give a date to work with.
    ///
    /// A single given bound never ends up on the wrong side of the filled-in
    /// one: `--from` past the last meal yields a one-day range, as does `--to`
    /// before the first. Two explicit bounds are returned as given.
    pub fn date_range(
        &self,
        logged_span: Option<(NaiveDate, NaiveDate)>,
    ) -> Option<(NaiveDate, NaiveDate)> {
        match (self.from, self.to, logged_span) {
            (Some(from), Some(to), _) => Some((from, to)),
            (Some(from), None, Some((_, last))) => Some((from, last.max(from))),
            (Some(from), None, None) => Some((from, from)),
            (None, Some(to), Some((first, _))) => Some((first.min(to), to)),
            (None, Some(to), None) => Some((to, to)),
            (None, None, span) => span,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
