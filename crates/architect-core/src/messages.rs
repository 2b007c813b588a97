//! Inline messages shown by the auth screens.

use identity_client::IdentityError;

pub const REQUIRED_FIELD: &str = "Please fill out this field.";
pub const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again.";
pub const MISSING_PENDING_EMAIL: &str =
    "No email address is waiting for verification. Please log in again.";

pub const LOGIN_RATE_LIMITED: &str =
    "You are trying too frequently. Please wait a moment before trying again.";

pub const SIGNUP_RATE_LIMITED: &str =
    "Too many requests. Please wait a moment before trying to sign up again.";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";

pub const RESET_CODE_SENT: &str = "A 6-digit code has been sent to your email.";
pub const RESET_RATE_LIMITED: &str =
    "You are trying too frequently. Please wait a moment before trying again.";
pub const RESET_FAILED: &str =
    "Could not send reset code due to a server issue. Please try again later.";

pub const RESEND_SENT: &str = "A new verification code has been sent to your email.";
pub const RESEND_RATE_LIMITED: &str =
    "Error: You are trying too frequently. Please wait a moment before resending.";
pub const RESEND_FAILED: &str = "Error: Could not send verification code. Please try again later.";

pub const MIN_PASSWORD_LEN: usize = 6;
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters long.";
pub const PASSWORD_UPDATED: &str =
    "Your password has been updated successfully! Redirecting to login...";

/// Rate-limit text when throttled, else the provider's message, else
/// `fallback`.
pub fn failure_message(err: &IdentityError, rate_limited: &str, fallback: &str) -> String {
    if err.is_rate_limited() {
        return rate_limited.to_string();
    }
    provider_message_or(err, fallback)
}

pub fn provider_message_or(err: &IdentityError, fallback: &str) -> String {
    err.provider_message()
        .unwrap_or_else(|| fallback.to_string())
}
