//! Validation error types

use std::fmt;

/// Validation error for incoming evaluation payloads
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Field has the wrong JSON shape
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Numeric field outside its allowed range
    OutOfRange { field: &'static str, min: i64, max: i64, value: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::OutOfRange {
                field,
                min,
                max,
                value,
            } => {
                write!(f, "{} must be between {} and {}, got {}", field, min, max, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
