use serde::{Deserialize, Serialize};

/// Drawdown path statistics derived from the equity curve.
///
/// Drawdowns are percentages off the running peak. `max_drawdown` and
/// `avg_drawdown` are reported as negative numbers; durations are in trade
/// counts (curve indices), since the curve has one point per closed trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownMetrics {
    /// Deepest decline from a peak, as a negative percentage.
    pub max_drawdown: f64,
    /// Length of the longest drawdown episode.
    pub max_drawdown_duration: usize,
    /// Mean episode length.
    pub avg_drawdown_duration: f64,
    /// Mean of all strictly-positive drawdown depths, negated.
    pub avg_drawdown: f64,
    /// Population standard deviation of the positive drawdown depths.
    pub drawdown_deviation: f64,
    /// Root-mean-square drawdown over the whole curve.
    pub ulcer_index: f64,
    /// `|total return % / max drawdown %|`, denominator floored at 1.
    pub recovery_factor: f64,
}

/// Percentage drawdown at every point of the equity curve.
///
/// `drawdown_i = (peak_i - equity_i) / peak_i * 100`, zero at a fresh peak.
/// A non-positive running peak has no meaningful percentage decline and
/// contributes zero.
pub fn drawdown_series(equity_curve: &[f64]) -> Vec<f64> {
    let mut series = Vec::with_capacity(equity_curve.len());
    let mut peak = f64::NEG_INFINITY;
    for &equity in equity_curve {
        peak = peak.max(equity);
        let drawdown = if peak > 0.0 {
            (peak - equity) / peak * 100.0
        } else {
            0.0
        };
        series.push(drawdown);
    }
    series
}

/// Analyzes the equity curve's drawdown path in a single pass.
pub fn analyze(equity_curve: &[f64]) -> DrawdownMetrics {
    if equity_curve.len() <= 1 {
        return DrawdownMetrics::default();
    }

    let drawdowns = drawdown_series(equity_curve);

    let max_depth = drawdowns.iter().copied().fold(0.0_f64, f64::max);
    let max_drawdown = -max_depth;

    // Episode detection: maximal contiguous runs of positive drawdown. A run
    // still open at the final index counts as complete at the series end.
    let mut episode_lengths: Vec<usize> = Vec::new();
    let mut current_run = 0usize;
    for &depth in &drawdowns {
        if depth > 0.0 {
            current_run += 1;
        } else if current_run > 0 {
            episode_lengths.push(current_run);
            current_run = 0;
        }
    }
    if current_run > 0 {
        episode_lengths.push(current_run);
    }

    let max_drawdown_duration = episode_lengths.iter().copied().max().unwrap_or(0);
    let avg_drawdown_duration = if episode_lengths.is_empty() {
        0.0
    } else {
        episode_lengths.iter().sum::<usize>() as f64 / episode_lengths.len() as f64
    };

    let positive: Vec<f64> = drawdowns.iter().copied().filter(|d| *d > 0.0).collect();
    let avg_drawdown = if positive.is_empty() {
        0.0
    } else {
        -(positive.iter().sum::<f64>() / positive.len() as f64)
    };

    let drawdown_deviation = if positive.is_empty() {
        0.0
    } else {
        let mean = positive.iter().sum::<f64>() / positive.len() as f64;
        let variance =
            positive.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / positive.len() as f64;
        variance.sqrt()
    };

    let ulcer_index =
        (drawdowns.iter().map(|d| d * d).sum::<f64>() / drawdowns.len() as f64).sqrt();

    let total_return_pct = if equity_curve[0] == 0.0 {
        0.0
    } else {
        (equity_curve[equity_curve.len() - 1] - equity_curve[0]) / equity_curve[0] * 100.0
    };
    let denominator = if max_drawdown == 0.0 { 1.0 } else { max_drawdown };
    let recovery_factor = (total_return_pct / denominator).abs();

    DrawdownMetrics {
        max_drawdown,
        max_drawdown_duration,
        avg_drawdown_duration,
        avg_drawdown,
        drawdown_deviation,
        ulcer_index,
        recovery_factor,
    }
}
