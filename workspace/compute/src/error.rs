use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// A period label that does not satisfy the `YYYY-MM` contract.
    #[error("Invalid period '{0}': expected YYYY-MM")]
    InvalidPeriod(String),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
