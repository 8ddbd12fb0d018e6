//! Structured error types for the timedial library.
//!
//! Uses `thiserror` for better API surface and error composition.
//! Parse failures are deliberately not errors: the picker treats
//! unparseable text as "no value" and clears the selection instead.

use thiserror::Error;

/// Main error type for timedial operations
#[derive(Error, Debug)]
pub enum TimedialError {
    /// A selector increment was configured as zero. Option lists cannot
    /// be enumerated from it, and silently defaulting would hide a caller
    /// misconfiguration.
    #[error("{unit} increment cannot be less than 1")]
    Increment { unit: String },
}

/// Result type alias for timedial operations
pub type Result<T> = std::result::Result<T, TimedialError>;

impl TimedialError {
    /// Create an increment configuration error
    pub fn increment(unit: impl Into<String>) -> Self {
        Self::Increment { unit: unit.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TimedialError::increment("hour");
        assert_eq!(err.to_string(), "hour increment cannot be less than 1");

        let err = TimedialError::increment("second");
        assert!(err.to_string().contains("second increment"));
    }
}
