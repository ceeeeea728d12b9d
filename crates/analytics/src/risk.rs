use serde::{Deserialize, Serialize};

/// Threshold separating gains from losses for Omega and the deviation
/// metrics. Returns are relative to account balance, so the natural target
/// is break-even.
const RETURN_THRESHOLD: f64 = 0.0;

/// Distribution and tail-risk statistics over the per-trade return series.
///
/// All fields are percentages (or dimensionless ratios) and default to zero
/// when the series is empty or too short for the required order of moment.
/// `omega_ratio` and `gain_loss_ratio` use `+inf` as a documented sentinel
/// when there are gains but no losses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Value at Risk at 95% confidence. Negative values denote a loss.
    pub var_95: f64,
    /// Value at Risk at 99% confidence.
    pub var_99: f64,
    /// Expected shortfall beyond `var_95`.
    pub cvar_95: f64,
    /// Expected shortfall beyond `var_99`.
    pub cvar_99: f64,
    /// Third standardized moment (population). Requires at least 3 returns.
    pub skewness: f64,
    /// Excess kurtosis (population). Requires at least 4 returns.
    pub kurtosis: f64,
    /// Root-mean-square of returns strictly below the threshold.
    pub downside_deviation: f64,
    /// Root-mean-square of returns strictly above the threshold.
    pub upside_deviation: f64,
    pub omega_ratio: f64,
    /// Mean winning return over the absolute mean losing return.
    pub gain_loss_ratio: f64,
}

/// Computes the full set of distribution and risk metrics for a return
/// series.
pub fn compute(returns: &[f64]) -> RiskMetrics {
    if returns.is_empty() {
        return RiskMetrics::default();
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("returns are finite"));

    let var_95 = value_at_risk(&sorted, 0.95);
    let var_99 = value_at_risk(&sorted, 0.99);

    RiskMetrics {
        var_95,
        var_99,
        cvar_95: expected_shortfall(&sorted, var_95),
        cvar_99: expected_shortfall(&sorted, var_99),
        skewness: skewness(returns),
        kurtosis: kurtosis(returns),
        downside_deviation: rms_below(returns, RETURN_THRESHOLD),
        upside_deviation: rms_above(returns, RETURN_THRESHOLD),
        omega_ratio: omega_ratio(returns, RETURN_THRESHOLD),
        gain_loss_ratio: gain_loss_ratio(returns),
    }
}

/// Historical VaR at the given confidence: the return sitting at index
/// `floor((1 - c) * n)` of the ascending sort.
pub fn value_at_risk(sorted_returns: &[f64], confidence: f64) -> f64 {
    if sorted_returns.is_empty() {
        return 0.0;
    }
    let index = ((1.0 - confidence) * sorted_returns.len() as f64).floor() as usize;
    sorted_returns[index.min(sorted_returns.len() - 1)]
}

/// Mean of all returns at or below the VaR threshold. Falls back to the VaR
/// itself when the subset is empty.
pub fn expected_shortfall(sorted_returns: &[f64], var: f64) -> f64 {
    let tail: Vec<f64> = sorted_returns.iter().copied().filter(|r| *r <= var).collect();
    if tail.is_empty() {
        var
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    }
}

fn central_moment(returns: &[f64], order: i32) -> f64 {
    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    returns.iter().map(|r| (r - mean).powi(order)).sum::<f64>() / n
}

/// Population skewness, `m3 / m2^1.5`. Zero for fewer than 3 returns or a
/// degenerate (zero-variance) series.
pub fn skewness(returns: &[f64]) -> f64 {
    if returns.len() < 3 {
        return 0.0;
    }
    let m2 = central_moment(returns, 2);
    if m2 == 0.0 {
        return 0.0;
    }
    central_moment(returns, 3) / m2.powf(1.5)
}

/// Population excess kurtosis, `m4 / m2^2 - 3`. Zero for fewer than 4
/// returns or a zero-variance series.
pub fn kurtosis(returns: &[f64]) -> f64 {
    if returns.len() < 4 {
        return 0.0;
    }
    let m2 = central_moment(returns, 2);
    if m2 == 0.0 {
        return 0.0;
    }
    central_moment(returns, 4) / (m2 * m2) - 3.0
}

fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

fn rms_below(returns: &[f64], threshold: f64) -> f64 {
    let below: Vec<f64> = returns.iter().copied().filter(|r| *r < threshold).collect();
    rms(&below)
}

fn rms_above(returns: &[f64], threshold: f64) -> f64 {
    let above: Vec<f64> = returns.iter().copied().filter(|r| *r > threshold).collect();
    rms(&above)
}

/// Omega ratio against the threshold: `1 + gains / losses`, where gains and
/// losses are the probability-weighted mass above and below the target.
///
/// When there is no loss mass the ratio is `+inf` given any gains, and
/// exactly `1` when there are no gains either.
pub fn omega_ratio(returns: &[f64], threshold: f64) -> f64 {
    let gains: f64 = returns
        .iter()
        .filter(|r| **r > threshold)
        .map(|r| r - threshold)
        .sum();
    let losses: f64 = returns
        .iter()
        .filter(|r| **r < threshold)
        .map(|r| threshold - r)
        .sum();

    if losses == 0.0 {
        if gains > 0.0 { f64::INFINITY } else { 1.0 }
    } else {
        1.0 + gains / losses
    }
}

/// Mean winning return divided by the absolute mean losing return. `+inf`
/// with winners but no losers, `0` with neither.
pub fn gain_loss_ratio(returns: &[f64]) -> f64 {
    let wins: Vec<f64> = returns.iter().copied().filter(|r| *r > 0.0).collect();
    let losses: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();

    if losses.is_empty() {
        return if wins.is_empty() { 0.0 } else { f64::INFINITY };
    }
    if wins.is_empty() {
        return 0.0;
    }

    let avg_win = wins.iter().sum::<f64>() / wins.len() as f64;
    let avg_loss = losses.iter().sum::<f64>() / losses.len() as f64;
    avg_win / avg_loss.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_is_all_zeros() {
        let metrics = compute(&[]);
        assert_eq!(metrics, RiskMetrics::default());
    }

    #[test]
    fn var_99_is_at_least_as_extreme_as_var_95() {
        let returns = vec![-5.0, -3.0, -1.0, 0.5, 1.0, 2.0, 2.5, 3.0, -0.2, 0.8];
        let metrics = compute(&returns);
        assert!(metrics.var_99 <= metrics.var_95);
    }

    #[test]
    fn var_picks_the_sorted_tail_index() {
        // n = 10, floor(0.05 * 10) = 0 -> the worst return.
        let mut returns: Vec<f64> = (0..10).map(|i| i as f64 - 4.0).collect();
        let metrics = compute(&returns);
        returns.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(metrics.var_95, returns[0]);
        assert_eq!(metrics.var_99, returns[0]);
    }

    #[test]
    fn cvar_is_the_mean_of_the_tail() {
        let sorted = vec![-4.0, -2.0, 1.0, 3.0];
        let cvar = expected_shortfall(&sorted, -2.0);
        assert!((cvar - (-3.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_variance_moments_are_zero() {
        let returns = vec![1.5, 1.5, 1.5, 1.5, 1.5];
        let metrics = compute(&returns);
        assert_eq!(metrics.skewness, 0.0);
        assert_eq!(metrics.kurtosis, 0.0);
    }

    #[test]
    fn short_series_skip_higher_moments() {
        assert_eq!(skewness(&[1.0, 2.0]), 0.0);
        assert_eq!(kurtosis(&[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn skewness_sign_follows_the_long_tail() {
        let right_tailed = vec![-1.0, -0.5, 0.0, 0.5, 10.0];
        assert!(skewness(&right_tailed) > 0.0);
        let left_tailed = vec![1.0, 0.5, 0.0, -0.5, -10.0];
        assert!(skewness(&left_tailed) < 0.0);
    }

    #[test]
    fn omega_boundary_policy() {
        // Gains but no losses: the ratio saturates.
        assert_eq!(omega_ratio(&[1.0, 2.0], 0.0), f64::INFINITY);
        // Neither gains nor losses: exactly 1.
        assert_eq!(omega_ratio(&[0.0, 0.0], 0.0), 1.0);
        assert_eq!(omega_ratio(&[], 0.0), 1.0);
        // Balanced mass: 1 + 3/3 = 2.
        assert!((omega_ratio(&[3.0, -3.0], 0.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn gain_loss_boundary_policy() {
        assert_eq!(gain_loss_ratio(&[1.0, 2.0]), f64::INFINITY);
        assert_eq!(gain_loss_ratio(&[0.0]), 0.0);
        assert_eq!(gain_loss_ratio(&[]), 0.0);
        // avg win 2, avg loss -1 -> ratio 2.
        assert!((gain_loss_ratio(&[2.0, -1.0]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn downside_and_upside_deviation_are_rms() {
        let returns = vec![-3.0, -4.0, 5.0, 0.0];
        let metrics = compute(&returns);
        let expected_down = ((9.0 + 16.0) / 2.0_f64).sqrt();
        assert!((metrics.downside_deviation - expected_down).abs() < 1e-9);
        assert!((metrics.upside_deviation - 5.0).abs() < 1e-9);
    }

    #[test]
    fn all_positive_series_has_zero_downside() {
        let metrics = compute(&[0.5, 1.0, 2.0]);
        assert_eq!(metrics.downside_deviation, 0.0);
        assert!(metrics.upside_deviation > 0.0);
    }
}
