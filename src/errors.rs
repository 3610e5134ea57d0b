use thiserror::Error;

/// Errors surfaced by the simulation engine.
///
/// The reference behavior trusts its inputs; we reject the two cases that
/// would otherwise corrupt the book invariants instead of accepting them
/// silently.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("order quantity must be positive")]
    InvalidQuantity,

    #[error("limit order price must be finite and non-negative, got {0}")]
    InvalidPrice(f64),

    #[error("no resting order with id `{0}`")]
    UnknownOrder(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
