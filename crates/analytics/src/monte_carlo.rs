use rand::Rng;
use serde::{Deserialize, Serialize};

/// How many full balance trajectories are retained for visualization. The
/// subset is always the first runs, so it never influences the percentile
/// statistics.
const SAMPLE_PATHS: usize = 5;

/// Percentile bands of the terminal-balance distribution, nearest-rank
/// method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PercentileBands {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Outcome of the historical-bootstrap forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub simulations: usize,
    pub periods: usize,
    /// Terminal balance of every run, ascending.
    pub terminal_balances: Vec<f64>,
    pub percentiles: PercentileBands,
    /// Full trajectories of the first few runs, for charting only.
    pub sample_paths: Vec<Vec<f64>>,
}

/// Resamples the historical per-trade returns with replacement to project
/// `simulations` synthetic equity paths over `periods` steps.
///
/// Each step draws one return uniformly at random and compounds it:
/// `balance *= 1 + r / 100`. Draws are independent across steps and runs;
/// this is a deliberate historical bootstrap, not a parametric fit. An empty
/// return history draws zeros (the balance stays flat), and zero
/// `simulations` or `periods` yields an empty terminal set whose percentile
/// bands all sit at `initial_balance`.
pub fn simulate<R: Rng>(
    rng: &mut R,
    historical_returns: &[f64],
    initial_balance: f64,
    periods: usize,
    simulations: usize,
) -> SimulationResult {
    if simulations == 0 || periods == 0 {
        return SimulationResult {
            simulations,
            periods,
            terminal_balances: Vec::new(),
            percentiles: PercentileBands {
                p5: initial_balance,
                p25: initial_balance,
                p50: initial_balance,
                p75: initial_balance,
                p95: initial_balance,
            },
            sample_paths: Vec::new(),
        };
    }

    let mut terminal_balances = Vec::with_capacity(simulations);
    let mut sample_paths: Vec<Vec<f64>> = Vec::with_capacity(SAMPLE_PATHS.min(simulations));

    for run in 0..simulations {
        let keep_path = run < SAMPLE_PATHS;
        let mut path = if keep_path {
            Vec::with_capacity(periods + 1)
        } else {
            Vec::new()
        };
        let mut balance = initial_balance;
        if keep_path {
            path.push(balance);
        }

        for _ in 0..periods {
            let draw = if historical_returns.is_empty() {
                0.0
            } else {
                historical_returns[rng.gen_range(0..historical_returns.len())]
            };
            balance *= 1.0 + draw / 100.0;
            if keep_path {
                path.push(balance);
            }
        }

        terminal_balances.push(balance);
        if keep_path {
            sample_paths.push(path);
        }
    }

    terminal_balances.sort_by(f64::total_cmp);

    let percentiles = PercentileBands {
        p5: nearest_rank(&terminal_balances, 0.05),
        p25: nearest_rank(&terminal_balances, 0.25),
        p50: nearest_rank(&terminal_balances, 0.50),
        p75: nearest_rank(&terminal_balances, 0.75),
        p95: nearest_rank(&terminal_balances, 0.95),
    };

    SimulationResult {
        simulations,
        periods,
        terminal_balances,
        percentiles,
        sample_paths,
    }
}

/// Nearest-rank percentile on an ascending-sorted slice: the value at rank
/// `ceil(p * n)`.
fn nearest_rank(sorted: &[f64], p: f64) -> f64 {
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn percentiles_are_ordered() {
        let returns = vec![2.0, -1.5, 3.0, -0.5, 1.0, -2.0, 0.8];
        let result = simulate(&mut rng(42), &returns, 10_000.0, 252, 200);
        let p = result.percentiles;
        assert!(p.p5 <= p.p25);
        assert!(p.p25 <= p.p50);
        assert!(p.p50 <= p.p75);
        assert!(p.p75 <= p.p95);
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let returns = vec![1.0, -0.5, 2.0, -1.0];
        let a = simulate(&mut rng(7), &returns, 10_000.0, 100, 50);
        let b = simulate(&mut rng(7), &returns, 10_000.0, 100, 50);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let returns = vec![1.0, -0.5, 2.0, -1.0];
        let a = simulate(&mut rng(1), &returns, 10_000.0, 100, 50);
        let b = simulate(&mut rng(2), &returns, 10_000.0, 100, 50);
        assert_ne!(a.terminal_balances, b.terminal_balances);
    }

    #[test]
    fn empty_history_stays_flat() {
        let result = simulate(&mut rng(3), &[], 5_000.0, 252, 20);
        assert_eq!(result.terminal_balances, vec![5_000.0; 20]);
        assert_eq!(result.percentiles.p5, 5_000.0);
        assert_eq!(result.percentiles.p95, 5_000.0);
    }

    #[test]
    fn zero_runs_or_periods_yield_the_initial_balance_bands() {
        for (periods, simulations) in [(0usize, 100usize), (252, 0)] {
            let result = simulate(&mut rng(4), &[1.0], 7_500.0, periods, simulations);
            assert!(result.terminal_balances.is_empty());
            assert!(result.sample_paths.is_empty());
            assert_eq!(result.percentiles.p50, 7_500.0);
        }
    }

    #[test]
    fn keeps_the_first_five_trajectories() {
        let returns = vec![0.5, -0.5];
        let result = simulate(&mut rng(5), &returns, 1_000.0, 30, 50);
        assert_eq!(result.sample_paths.len(), 5);
        for path in &result.sample_paths {
            assert_eq!(path.len(), 31);
            assert_eq!(path[0], 1_000.0);
        }

        let small = simulate(&mut rng(5), &returns, 1_000.0, 30, 3);
        assert_eq!(small.sample_paths.len(), 3);
    }

    #[test]
    fn all_positive_returns_only_compound_upward() {
        let returns = vec![0.5, 1.0, 2.0];
        let result = simulate(&mut rng(6), &returns, 1_000.0, 100, 40);
        assert!(result.terminal_balances.iter().all(|b| *b > 1_000.0));
        assert!(result.percentiles.p5 > 1_000.0);
    }

    #[test]
    fn nearest_rank_on_a_known_distribution() {
        let sorted: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(nearest_rank(&sorted, 0.05), 5.0);
        assert_eq!(nearest_rank(&sorted, 0.50), 50.0);
        assert_eq!(nearest_rank(&sorted, 0.95), 95.0);
    }
}
