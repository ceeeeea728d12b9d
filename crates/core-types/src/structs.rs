use crate::enums::OrderSide;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single closed position, as delivered by the upstream trade store or a
/// parsed broker report.
///
/// Trades are immutable once constructed; the analytics engine only ever
/// reads them. All money fields are in the account's quote currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier assigned by the upstream collaborator.
    pub id: Uuid,
    /// The instrument symbol (e.g., "EURUSD", "BTCUSDT").
    pub symbol: String,
    pub side: OrderSide,
    /// Position size. Always positive; direction is carried by `side`.
    pub size: f64,
    pub open_time: DateTime<Utc>,
    /// Close timestamp. Broker exports occasionally omit it, in which case
    /// `open_time` stands in as the effective time for ordering and bucketing.
    pub close_time: Option<DateTime<Utc>>,
    pub open_price: f64,
    pub close_price: f64,
    /// Signed raw profit, excluding commission and swap.
    pub profit: f64,
    /// Signed commission, typically negative or zero.
    pub commission: f64,
    /// Signed swap/rollover charge.
    pub swap: f64,
    /// Holding duration in seconds, when the report provides it.
    pub duration_secs: Option<i64>,
}

impl Trade {
    /// The trade's total P&L: raw profit plus commission plus swap.
    pub fn total_pnl(&self) -> f64 {
        self.profit + self.commission + self.swap
    }

    /// The timestamp used for chronological ordering and time bucketing:
    /// the close time when present, the open time otherwise.
    pub fn effective_time(&self) -> DateTime<Utc> {
        self.close_time.unwrap_or(self.open_time)
    }

    /// Checks that every numeric field the engine consumes is finite.
    ///
    /// Non-finite values are a contract violation by the upstream
    /// collaborator; rejecting them here keeps NaN out of every downstream
    /// metric.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("profit", self.profit),
            ("commission", self.commission),
            ("swap", self.swap),
            ("size", self.size),
        ] {
            if !value.is_finite() {
                return Err(CoreError::InvalidTradeRecord { id: self.id, field });
            }
        }
        Ok(())
    }
}
