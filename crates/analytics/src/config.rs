use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};

/// Explicit parameter object for a full analytics run.
///
/// The engine has no module-level defaults or hidden state; every tunable is
/// carried here and validated once, at construction of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Starting account balance the equity curve is seeded with.
    ///
    /// The engine does not reject zero or negative values; returns are simply
    /// degenerate (a zero running balance yields a per-trade return of 0).
    pub initial_balance: f64,
    /// Annualized risk-free rate as a whole-number percentage (2.0 = 2%).
    pub risk_free_rate: f64,
    /// Number of Monte Carlo runs.
    pub simulations: usize,
    /// Number of resampled steps per Monte Carlo run.
    pub periods: usize,
    /// Seed for the Monte Carlo random source. `None` seeds from entropy;
    /// supplying a value makes the simulation fully reproducible.
    pub seed: Option<u64>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            initial_balance: 10_000.0,
            risk_free_rate: 2.0,
            simulations: 100,
            periods: 252,
            seed: None,
        }
    }
}

impl AnalyticsConfig {
    /// Checks the scalar parameters the numeric core cannot tolerate.
    ///
    /// Everything else degrades gracefully to documented defaults; a
    /// non-finite balance or rate would poison every downstream metric, so it
    /// is the one unrecoverable condition.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if !self.initial_balance.is_finite() {
            return Err(AnalyticsError::Configuration(
                "initial_balance must be a finite number".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::Configuration(
                "risk_free_rate must be a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulations, 100);
        assert_eq!(config.periods, 252);
    }

    #[test]
    fn non_finite_balance_is_rejected() {
        let config = AnalyticsConfig {
            initial_balance: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalyticsError::Configuration(_))
        ));
    }

    #[test]
    fn non_finite_rate_is_rejected() {
        let config = AnalyticsConfig {
            risk_free_rate: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
