use crate::drawdown::DrawdownMetrics;
use crate::monte_carlo::SimulationResult;
use crate::ratios::RatioMetrics;
use crate::risk::RiskMetrics;
use crate::streaks::StreakMetrics;
use serde::{Deserialize, Serialize};

/// The aggregate output of a full analytics run.
///
/// Produced fresh and fully populated on every call; degenerate inputs show
/// up as the documented zero/sentinel values of each field, never as a
/// partially-filled report. Percentages are whole numbers (12.5 = 12.5%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    // I. Trade-level profitability
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub break_even_trades: usize,
    pub win_rate_pct: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    /// Gross profit over gross loss; `+inf` with profits but no losses.
    pub profit_factor: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    /// Mean total P&L per trade.
    pub expectancy: f64,
    pub total_net_profit: f64,
    pub total_return_pct: f64,
    /// Span from first to last effective trade timestamp, in years.
    pub years_elapsed: f64,

    // II. Series handed on to chart consumers
    pub returns: Vec<f64>,
    pub equity_curve: Vec<f64>,

    // III. Per-stage metric groups
    pub risk: RiskMetrics,
    pub drawdown: DrawdownMetrics,
    pub ratios: RatioMetrics,
    pub streaks: StreakMetrics,
    pub simulation: SimulationResult,
}

impl MetricsReport {
    /// Creates a zeroed-out report, the starting point before calculations.
    pub fn new() -> Self {
        Self::default()
    }
}
