//! Rating error types.
//!
//! Every failure mode has a named variant. Only `InvalidWeight` is fatal
//! for a shipment row; zone fallbacks and missing rate cells are
//! tabulated as report diagnostics rather than raised.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RateError {
    #[error("Invalid weight {0}: must be a positive, finite number")]
    InvalidWeight(f64),

    #[error("Rate grid for sub-network '{0}' is empty")]
    EmptyGrid(String),

    #[error("Non-positive price {price} at {cell} in sub-network '{network}'")]
    InvalidPrice {
        network: String,
        cell: String,
        price: f64,
    },
}

/// Result type alias for rating operations.
pub type RateResult<T> = Result<T, RateError>;
