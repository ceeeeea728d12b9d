use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    InvalidTradeRecord(#[from] CoreError),
}
