//! # Meridian Analytics Engine
//!
//! This crate derives a full battery of risk, performance, drawdown, streak,
//! time-bucket, and Monte Carlo forecast metrics from a finite history of
//! closed trades. It acts as the "unbiased judge" of the system.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems and performs no I/O. It depends only on `core-types`
//!   (Layer 0).
//! - **Stateless Calculation:** Every stage is a pure function over an
//!   immutable trade list, return series, or equity curve. Identical inputs
//!   produce identical outputs (Monte Carlo included, given a seed), which
//!   makes the whole pipeline trivially parallel across strategies.
//! - **Values, not exceptions:** Degenerate inputs (empty history, zero
//!   variance, zero drawdown) resolve to documented defaults or sentinels.
//!   Only malformed trade records and non-finite configuration are errors.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the orchestrator that runs all stages.
//! - `AnalyticsConfig`: explicit parameters (initial balance, risk-free rate,
//!   simulation counts, RNG seed) with documented defaults.
//! - `MetricsReport`: the aggregate output structure.
//! - `AnalyticsError`: the specific error types this crate can return.

pub mod config;
pub mod drawdown;
pub mod engine;
pub mod equity;
pub mod error;
pub mod monte_carlo;
pub mod ratios;
pub mod report;
pub mod risk;
pub mod streaks;

// Re-export the key components to create a clean, public-facing API.
pub use config::AnalyticsConfig;
pub use drawdown::DrawdownMetrics;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use monte_carlo::{PercentileBands, SimulationResult};
pub use ratios::RatioMetrics;
pub use report::MetricsReport;
pub use risk::RiskMetrics;
pub use streaks::StreakMetrics;
