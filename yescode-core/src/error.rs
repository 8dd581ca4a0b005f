//! Core error types for `YesCode`.

use thiserror::Error;

/// Core error type for `YesCode` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A calculator was invoked on a profile without the data it needs.
    ///
    /// Mode fallback happens in the dispatcher, so reaching this means the
    /// backend sent a partial record (e.g. a team without a membership).
    #[error("{0} data is missing")]
    MissingData(&'static str),

    /// Invalid data from API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CoreError::MissingData("Team").to_string(),
            "Team data is missing"
        );
        assert_eq!(
            CoreError::InvalidData("unknown display mode: x".to_string()).to_string(),
            "Invalid data: unknown display mode: x"
        );
    }
}
