use anyhow::{Context, Result};
use meal_stats::cli::parse_args;
use meal_stats::config::AnalysisConfig;
use meal_stats::food_guide::FoodGuideAnalyzer;
use meal_stats::report::{AnalysisReport, SwapReport};
use meal_stats::stats::StatisticsService;
use meal_stats::store::{load_snapshot_str, MealStore};
use meal_stats::swaps::{Goal, SwapGenerator};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli_args = parse_args();
    let config = AnalysisConfig::from_env_with_top_k(cli_args.top_k)
        .context("Invalid analysis configuration")?;
    init_tracing(&config.log_level);

    info!(snapshot = %cli_args.snapshot, "reading meal snapshot");
    let snapshot = fs::read_to_string(&cli_args.snapshot)
        .await
        .with_context(|| format!("Failed to read snapshot file '{}'", cli_args.snapshot))?;
    let store = load_snapshot_str(&snapshot)
        .with_context(|| format!("Failed to load snapshot '{}'", cli_args.snapshot))?;

    let Some((start, end)) = cli_args.date_range(store.date_span()) else {
        warn!("snapshot contains no meals and no date range was given");
        println!("No meals to analyze.");
        return Ok(());
    };
    let meals = store
        .meals_in_date_range(start, end)
        .with_context(|| format!("Failed to query meals from {} to {}", start, end))?;

    let statistics = StatisticsService::from_config(&config);
    let analyzer = FoodGuideAnalyzer::default();
    let mut report = AnalysisReport::build(
        &meals,
        (start, end),
        cli_args.report,
        cli_args.daily,
        &statistics,
        &analyzer,
    );

    if cli_args.report.includes_swaps(!cli_args.goals.is_empty()) {
        let nutrients = store.nutrients();
        let goals = cli_args
            .goals
            .iter()
            .map(|spec| spec.resolve(&nutrients))
            .collect::<Result<Vec<Goal>, _>>()
            .context("Invalid swap goal")?;
        let swaps = SwapReport::build(
            &meals,
            &store.foods(),
            &goals,
            &statistics,
            &SwapGenerator::default(),
        )
        .context("Failed to generate swap suggestions")?;
        report = report.with_swaps(swaps);
    }

    let output = report.render(cli_args.format)?;
    println!("{}", output);
    Ok(())
}
