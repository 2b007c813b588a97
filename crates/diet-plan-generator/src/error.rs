//! Error types for diet plan generation.

use thiserror::Error;

/// Errors that can occur while generating a diet plan.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error response
    #[error("Gemini API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Missing API key
    #[error("Missing Gemini API key")]
    MissingApiKey,

    /// The API answered without any generated text
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type alias using GenerationError.
pub type GenerationResult<T> = Result<T, GenerationError>;
