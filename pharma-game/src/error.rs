//! Dispatch-boundary and content errors.
use thiserror::Error;

/// Raised when an action payload is malformed. Reducers log and drop these
/// actions instead of applying them.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    #[error("{field} must be a finite number (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value:.2})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be at least {min} (got {value})")]
    TooSmall {
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfBounds {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("{field} must not be empty")]
    EmptyId { field: &'static str },
    #[error("action payload could not be decoded: {0}")]
    Decode(String),
}

impl ActionError {
    pub(crate) fn check_amount(field: &'static str, value: f64) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::NonFinite { field, value });
        }
        if value < 0.0 {
            return Err(Self::Negative { field, value });
        }
        Ok(())
    }

    pub(crate) fn check_finite(field: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::NonFinite { field, value })
        }
    }

    pub(crate) fn check_range(
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    ) -> Result<(), Self> {
        Self::check_finite(field, value)?;
        if value < min || value > max {
            return Err(Self::OutOfRange {
                field,
                min,
                max,
                value,
            });
        }
        Ok(())
    }

    pub(crate) fn check_bounds(
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    ) -> Result<(), Self> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(Self::OutOfBounds {
                field,
                min,
                max,
                value,
            })
        }
    }

    pub(crate) fn check_id(field: &'static str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            Err(Self::EmptyId { field })
        } else {
            Ok(())
        }
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Raised when embedded content tables fail to parse or validate.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse {table}: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{table} entry {id} is invalid: {reason}")]
    Invalid {
        table: &'static str,
        id: String,
        reason: String,
    },
}
