//! Identity provider client for Diet Architect.
//!
//! This crate provides:
//! - The [`IdentityProvider`] trait consumed by the UI layer
//! - A Supabase GoTrue implementation (email/password, OTP, password reset)
//! - In-memory session state with an auth-change broadcast
//! - Optional background token refresh

mod error;
mod events;
mod provider;
mod refresh;
mod session;
mod supabase;

pub use error::{IdentityError, IdentityResult};
pub use events::{AuthChange, AuthEvent, AuthEventBus, AuthSubscription};
pub use provider::{IdentityProvider, OtpType, SignUpOutcome};
pub use refresh::RefreshPolicy;
pub use session::{Session, User};
pub use supabase::SupabaseAuthClient;
