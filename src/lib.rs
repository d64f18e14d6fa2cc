//! Minimal OAuth2 client helpers.
//!
//! This crate covers the client side of the authorization-code flow against a
//! single configured provider: it builds the authorization-redirect URL,
//! performs the token exchange and the optional active-user lookup, and
//! normalizes provider responses (JSON or form-encoded) into one key/value
//! structure.

mod client;
mod error;
pub mod providers;
mod types;

pub use client::{OAuth2Client, ProviderConfig};
pub use error::OAuthError;
pub use providers::ProviderEndpoints;
pub use types::ProviderResponse;
