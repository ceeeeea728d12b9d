use analytics::{AnalyticsConfig, AnalyticsEngine, MetricsReport};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use core_types::Trade;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Meridian analytics application.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report(args) => handle_report(args),
    }
}

/// Statistical performance analytics over closed trade histories.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full metrics report for a trade history.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ReportArgs {
    /// Path to a JSON array of closed trade records.
    #[arg(long)]
    input: PathBuf,

    /// Starting account balance the equity curve is seeded with.
    #[arg(long, default_value_t = 10_000.0)]
    initial_balance: f64,

    /// Annualized risk-free rate in percent.
    #[arg(long, default_value_t = 2.0)]
    risk_free_rate: f64,

    /// Number of Monte Carlo simulation runs.
    #[arg(long, default_value_t = 100)]
    simulations: usize,

    /// Number of resampled steps per simulation run.
    #[arg(long, default_value_t = 252)]
    periods: usize,

    /// Seed for the Monte Carlo random source, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Emit the full report as JSON instead of a summary table.
    #[arg(long)]
    json: bool,
}

/// Loads the trade history, runs the engine, and renders the report.
fn handle_report(args: ReportArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read trade history from {}", args.input.display()))?;
    let trades: Vec<Trade> =
        serde_json::from_str(&raw).context("Trade history is not a valid JSON array of trades")?;

    info!(trades = trades.len(), input = %args.input.display(), "Loaded trade history");

    let config = AnalyticsConfig {
        initial_balance: args.initial_balance,
        risk_free_rate: args.risk_free_rate,
        simulations: args.simulations,
        periods: args.periods,
        seed: args.seed,
    };
    let engine = AnalyticsEngine::new(config)?;
    let report = engine.calculate(&trades)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

/// Renders the headline metrics as a terminal table.
fn print_summary(report: &MetricsReport) {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);

    table.add_row(vec!["Total trades".to_string(), report.total_trades.to_string()]);
    table.add_row(vec![
        "Win rate".to_string(),
        format!("{:.2}%", report.win_rate_pct),
    ]);
    table.add_row(vec![
        "Total net profit".to_string(),
        format!("{:.2}", report.total_net_profit),
    ]);
    table.add_row(vec![
        "Total return".to_string(),
        format!("{:.2}%", report.total_return_pct),
    ]);
    table.add_row(vec![
        "Profit factor".to_string(),
        format!("{:.2}", report.profit_factor),
    ]);
    table.add_row(vec![
        "Expectancy".to_string(),
        format!("{:.2}", report.expectancy),
    ]);
    table.add_row(vec![
        "Max drawdown".to_string(),
        format!("{:.2}%", report.drawdown.max_drawdown),
    ]);
    table.add_row(vec![
        "Ulcer index".to_string(),
        format!("{:.2}", report.drawdown.ulcer_index),
    ]);
    table.add_row(vec![
        "Recovery factor".to_string(),
        format!("{:.2}", report.drawdown.recovery_factor),
    ]);
    table.add_row(vec![
        "VaR 95 / 99".to_string(),
        format!("{:.2}% / {:.2}%", report.risk.var_95, report.risk.var_99),
    ]);
    table.add_row(vec![
        "Omega ratio".to_string(),
        format!("{:.2}", report.risk.omega_ratio),
    ]);
    table.add_row(vec![
        "Calmar ratio".to_string(),
        format!("{:.2}", report.ratios.calmar_ratio),
    ]);
    table.add_row(vec![
        "Trend strength".to_string(),
        format!("{:.2}", report.ratios.trend_strength),
    ]);
    table.add_row(vec![
        "Max consecutive wins".to_string(),
        report.streaks.max_consecutive_wins.to_string(),
    ]);
    table.add_row(vec![
        "Max consecutive losses".to_string(),
        report.streaks.max_consecutive_losses.to_string(),
    ]);
    table.add_row(vec![
        "Best / worst hour".to_string(),
        format!(
            "{} / {}",
            label_or_dash(report.streaks.best_hour.map(|h| h.to_string())),
            label_or_dash(report.streaks.worst_hour.map(|h| h.to_string())),
        ),
    ]);
    table.add_row(vec![
        "Best / worst month".to_string(),
        format!(
            "{} / {}",
            label_or_dash(report.streaks.best_month.clone()),
            label_or_dash(report.streaks.worst_month.clone()),
        ),
    ]);
    table.add_row(vec![
        "Monte Carlo p5..p95".to_string(),
        format!(
            "{:.2} / {:.2} / {:.2} / {:.2} / {:.2}",
            report.simulation.percentiles.p5,
            report.simulation.percentiles.p25,
            report.simulation.percentiles.p50,
            report.simulation.percentiles.p75,
            report.simulation.percentiles.p95,
        ),
    ]);

    println!("{table}");
}

fn label_or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}
