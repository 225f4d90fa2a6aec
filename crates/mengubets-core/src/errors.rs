//! Shared error types

use thiserror::Error;

/// Core errors shared between the CLI and the browser client
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown bet type: {0}")]
    UnknownBetType(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("malformed result: {0}")]
    MalformedResult(String),

    #[error("server multiplier must not be negative or infinite, got {0}")]
    InvalidMultiplier(f64),
}

/// Reasons a raw prediction value is rejected.
///
/// The display text is the message shown to the user next to the bet form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    InvalidFormat(&'static str),

    #[error("{0}")]
    InvalidEnum(&'static str),

    #[error("El minuto debe ser un número entre {min} y {max}")]
    OutOfRange { min: u8, max: u8 },

    #[error("{0}")]
    Required(&'static str),
}

impl ValidationError {
    /// Stable name of the violated rule
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::InvalidFormat(_) => "invalid_format",
            ValidationError::InvalidEnum(_) => "invalid_enum",
            ValidationError::OutOfRange { .. } => "out_of_range",
            ValidationError::Required(_) => "required",
        }
    }
}
