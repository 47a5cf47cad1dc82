//! Authentication module
//!
//! Supports: Basic (API key as username, empty password)

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;
