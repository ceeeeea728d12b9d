use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::report::MetricsReport;
use crate::{drawdown, equity, monte_carlo, ratios, risk, streaks};
use core_types::Trade;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

/// A stateless calculator deriving the full metrics battery from a closed
/// trade history.
///
/// Construction validates the configuration once; `calculate` can then be
/// invoked any number of times, concurrently, over independent trade lists.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    /// Builds an engine around a validated configuration.
    pub fn new(config: AnalyticsConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// The main entry point: transforms a finite list of closed trades into
    /// a fully-populated `MetricsReport`.
    ///
    /// The only failure mode is a malformed trade record (non-finite
    /// numbers); every degenerate data shape resolves to the documented
    /// default of the affected metric instead.
    pub fn calculate(&self, trades: &[Trade]) -> Result<MetricsReport, AnalyticsError> {
        for trade in trades {
            trade.validate()?;
        }

        info!(trades = trades.len(), "Calculating performance metrics");

        let mut report = MetricsReport::new();
        self.calculate_profitability(trades, &mut report);

        let (returns, equity_curve) = equity::build(trades, self.config.initial_balance);

        report.total_return_pct = if self.config.initial_balance == 0.0 {
            0.0
        } else {
            (equity_curve[equity_curve.len() - 1] - self.config.initial_balance)
                / self.config.initial_balance
                * 100.0
        };
        report.years_elapsed = years_elapsed(trades);

        let drawdown_metrics = drawdown::analyze(&equity_curve);
        report.risk = risk::compute(&returns);
        report.ratios = ratios::compute(
            report.total_return_pct,
            report.years_elapsed,
            self.config.risk_free_rate,
            &returns,
            &equity_curve,
            &drawdown_metrics,
        );
        report.drawdown = drawdown_metrics;
        report.streaks = streaks::analyze(trades);

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        report.simulation = monte_carlo::simulate(
            &mut rng,
            &returns,
            self.config.initial_balance,
            self.config.periods,
            self.config.simulations,
        );

        report.returns = returns;
        report.equity_curve = equity_curve;

        debug!(
            total_return_pct = report.total_return_pct,
            max_drawdown = report.drawdown.max_drawdown,
            "Metrics report complete"
        );

        Ok(report)
    }

    /// Trade-level profitability: counts, win rate, gross figures, averages
    /// and extremes. Loss figures are magnitudes.
    fn calculate_profitability(&self, trades: &[Trade], report: &mut MetricsReport) {
        report.total_trades = trades.len();

        for trade in trades {
            let pnl = trade.total_pnl();
            report.total_net_profit += pnl;

            if pnl > 0.0 {
                report.winning_trades += 1;
                report.gross_profit += pnl;
                report.largest_win = report.largest_win.max(pnl);
            } else if pnl < 0.0 {
                report.losing_trades += 1;
                report.gross_loss += pnl.abs();
                report.largest_loss = report.largest_loss.max(pnl.abs());
            } else {
                report.break_even_trades += 1;
            }
        }

        if report.total_trades > 0 {
            report.win_rate_pct =
                report.winning_trades as f64 / report.total_trades as f64 * 100.0;
            report.expectancy = report.total_net_profit / report.total_trades as f64;
        }
        if report.winning_trades > 0 {
            report.average_win = report.gross_profit / report.winning_trades as f64;
        }
        if report.losing_trades > 0 {
            report.average_loss = report.gross_loss / report.losing_trades as f64;
        }

        report.profit_factor = if report.gross_loss > 0.0 {
            report.gross_profit / report.gross_loss
        } else if report.gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
    }
}

/// Elapsed span between the first and last effective trade timestamps, in
/// years. Zero for fewer than two trades.
fn years_elapsed(trades: &[Trade]) -> f64 {
    let ordered = equity::chronological(trades);
    match (ordered.first(), ordered.last()) {
        (Some(first), Some(last)) if ordered.len() > 1 => {
            let seconds = (last.effective_time() - first.effective_time()).num_seconds();
            seconds as f64 / SECONDS_PER_YEAR
        }
        _ => 0.0,
    }
}
