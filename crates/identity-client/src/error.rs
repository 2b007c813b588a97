//! Identity provider error types.

use serde::Deserialize;
use thiserror::Error;

/// HTTP status the provider uses for throttled requests.
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Structured codes GoTrue sends with throttled requests.
const RATE_LIMIT_CODES: [&str; 3] = [
    "over_email_send_rate_limit",
    "over_request_rate_limit",
    "over_sms_send_rate_limit",
];

/// Structured code for a sign-in against an unconfirmed address.
const EMAIL_NOT_CONFIRMED_CODE: &str = "email_not_confirmed";

/// Message fragment used when no structured code is available.
const EMAIL_NOT_CONFIRMED_TEXT: &str = "email not confirmed";

/// Identity provider error type.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The provider answered with a non-success status
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// The operation needs a signed-in session
    #[error("Auth session missing!")]
    NotLoggedIn,

    /// The session was signed out or replaced while a refresh was in flight
    #[error("Session changed during refresh")]
    SessionChanged,

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The provider answered 2xx with an unexpected body
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// GoTrue error bodies come in two generations:
/// `{"code":400,"error_code":"...","msg":"..."}` and
/// `{"error":"invalid_grant","error_description":"..."}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl IdentityError {
    /// Build an [`IdentityError::Api`] from a failed response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let string_code = parsed.code.as_ref().and_then(|c| c.as_str()).map(str::to_string);
        let code = non_empty(parsed.error_code)
            .or_else(|| non_empty(string_code))
            .or_else(|| non_empty(parsed.error.clone()));

        let message = non_empty(parsed.msg)
            .or_else(|| non_empty(parsed.message))
            .or_else(|| non_empty(parsed.error_description))
            .or_else(|| non_empty(parsed.error))
            .unwrap_or_default();

        IdentityError::Api {
            status,
            code,
            message,
        }
    }

    /// HTTP status of the failed call, if the provider answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            IdentityError::Api { status, .. } => Some(*status),
            IdentityError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Structured error code, if the provider sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            IdentityError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the provider throttled the request.
    pub fn is_rate_limited(&self) -> bool {
        if self.status() == Some(STATUS_TOO_MANY_REQUESTS) {
            return true;
        }
        self.code()
            .map(|code| RATE_LIMIT_CODES.contains(&code))
            .unwrap_or(false)
    }

    /// Returns true if a sign-in was refused because the email is unconfirmed.
    ///
    /// Prefers the structured `email_not_confirmed` code and falls back to a
    /// case-insensitive match on the message.
    pub fn is_email_not_confirmed(&self) -> bool {
        match self {
            IdentityError::Api { code, message, .. } => {
                if code.as_deref() == Some(EMAIL_NOT_CONFIRMED_CODE) {
                    return true;
                }
                message.to_lowercase().contains(EMAIL_NOT_CONFIRMED_TEXT)
            }
            _ => false,
        }
    }

    /// Returns true if the failure is worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            IdentityError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                e.status().map(|s| s.is_server_error()).unwrap_or(false)
            }
            IdentityError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Message suitable for showing to the user, if there is one.
    pub fn provider_message(&self) -> Option<String> {
        let message = match self {
            IdentityError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        let message = message.trim().to_string();
        (!message.is_empty()).then_some(message)
    }
}

/// Result type alias using IdentityError.
pub type IdentityResult<T> = Result<T, IdentityError>;
