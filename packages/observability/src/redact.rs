//! Field-name based redaction of credentials.

/// Placeholder written instead of a sensitive value.
pub const REDACTED: &str = "[redacted]";

const DENYLIST_KEYS: [&str; 8] = [
    "password",
    "token",
    "authorization",
    "apikey",
    "api_key",
    "anon_key",
    "secret",
    "cookie",
];

/// Returns true if a field with this name must not be logged verbatim.
///
/// Matching is a case-insensitive substring test, so `refresh_token` and
/// `confirmPassword` are both covered.
pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    DENYLIST_KEYS.iter().any(|entry| lower.contains(entry))
}
