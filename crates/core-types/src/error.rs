use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid trade record {id}: field '{field}' is not a finite number")]
    InvalidTradeRecord { id: Uuid, field: &'static str },
}
