use crate::drawdown::DrawdownMetrics;
use serde::{Deserialize, Serialize};

/// Sterling-ratio convention: the drawdown denominator is widened by a flat
/// 10 percentage points. A named convention, not a tunable.
const STERLING_ADJUSTMENT: f64 = 10.0;

/// Composite return-to-risk ratios.
///
/// `beta` is fixed at 1: no benchmark return series is part of the input
/// contract, so Treynor and Jensen's alpha collapse to the excess annual
/// return over the risk-free rate. That simplification is the documented
/// behavior, not a defect to be silently improved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RatioMetrics {
    /// Total return scaled to a yearly figure; 0 when no time has elapsed.
    pub annual_return_pct: f64,
    pub calmar_ratio: f64,
    pub sterling_ratio: f64,
    pub burke_ratio: f64,
    pub martin_ratio: f64,
    pub pain_ratio: f64,
    pub treynor_ratio: f64,
    pub jensen_alpha: f64,
    pub beta: f64,
    pub efficiency_ratio: f64,
    pub information_ratio: f64,
    /// OLS `R²` of the equity curve against its index, signed by slope.
    pub trend_strength: f64,
    /// `1 - |avg win - avg |loss|| / (avg win + avg |loss|)`; balance of the
    /// two sides of the return distribution.
    pub risk_parity_score: f64,
}

/// Derives the composite ratios from the upstream stages' outputs plus the
/// elapsed time.
pub fn compute(
    total_return_pct: f64,
    years_elapsed: f64,
    risk_free_rate: f64,
    returns: &[f64],
    equity_curve: &[f64],
    drawdown: &DrawdownMetrics,
) -> RatioMetrics {
    let annual_return = if years_elapsed > 0.0 {
        total_return_pct / years_elapsed
    } else {
        0.0
    };

    let max_dd = drawdown.max_drawdown;
    let calmar_ratio = if max_dd == 0.0 {
        0.0
    } else {
        (annual_return / max_dd).abs()
    };
    let sterling_ratio = annual_return / (max_dd.abs() + STERLING_ADJUSTMENT);
    let burke_ratio = total_return_pct / floor_at_one(drawdown.drawdown_deviation);
    let martin_ratio = annual_return / floor_at_one(drawdown.ulcer_index);
    let pain_ratio = total_return_pct / floor_at_one(drawdown.avg_drawdown.abs());

    // Simplified market model: beta pinned to 1 in the absence of a
    // benchmark series.
    let beta = 1.0;
    let treynor_ratio = annual_return - risk_free_rate;
    let jensen_alpha = annual_return - risk_free_rate;

    let stddev = floor_at_one(population_stddev(returns));
    let efficiency_ratio = total_return_pct.abs() / stddev;
    let information_ratio = annual_return / stddev;

    RatioMetrics {
        annual_return_pct: annual_return,
        calmar_ratio,
        sterling_ratio,
        burke_ratio,
        martin_ratio,
        pain_ratio,
        treynor_ratio,
        jensen_alpha,
        beta,
        efficiency_ratio,
        information_ratio,
        trend_strength: trend_strength(equity_curve),
        risk_parity_score: risk_parity_score(returns),
    }
}

/// Shared boundary-safety policy for the ratio denominators: a zero risk
/// figure is replaced by 1 instead of producing a division by zero.
fn floor_at_one(value: f64) -> f64 {
    if value == 0.0 { 1.0 } else { value }
}

fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Least-squares fit of the equity curve against its index: `R²` signed by
/// the slope. Positive for sustained uptrends, negative for downtrends,
/// magnitude reflecting how linear the path is. Fewer than 2 points → 0.
pub fn trend_strength(equity_curve: &[f64]) -> f64 {
    let n = equity_curve.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean_x = (nf - 1.0) / 2.0;
    let mean_y = equity_curve.iter().sum::<f64>() / nf;

    let mut cov_xy = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (i, &y) in equity_curve.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        cov_xy += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // A perfectly flat curve has no trend to measure.
    if var_y == 0.0 {
        return 0.0;
    }

    let r_squared = (cov_xy * cov_xy) / (var_x * var_y);
    let slope = cov_xy / var_x;
    let sign = if slope > 0.0 {
        1.0
    } else if slope < 0.0 {
        -1.0
    } else {
        0.0
    };
    r_squared * sign
}

/// Balance score between the average winning and average losing return.
/// 1 means perfectly symmetric risk; 0 when either side is empty.
pub fn risk_parity_score(returns: &[f64]) -> f64 {
    let wins: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
    let losses: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if wins.is_empty() || losses.is_empty() {
        return 0.0;
    }
    let avg_win = wins.iter().sum::<f64>() / wins.len() as f64;
    let avg_loss = losses.iter().map(|r| r.abs()).sum::<f64>() / losses.len() as f64;
    1.0 - (avg_win - avg_loss).abs() / (avg_win + avg_loss)
}
