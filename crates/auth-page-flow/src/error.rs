//! Page flow error types.

use thiserror::Error;

/// Error raised when a navigation request is not valid from the current page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The machine has no transition for this input in the current state
    #[error("Invalid page transition: cannot apply {input} on {page}")]
    InvalidTransition { page: String, input: String },

    /// Verification was requested without an email address
    #[error("An email address is required to verify an account")]
    MissingEmail,
}

/// Result type alias using FlowError.
pub type FlowResult<T> = Result<T, FlowError>;
