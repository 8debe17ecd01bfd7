//! Signed token issuance and verification.
//!
//! - [`config`] -- issuer, secret, and time-to-live loaded from the environment.
//! - [`jwt`] -- HS512 token issuance and claim extraction.

pub mod config;
pub mod error;
pub mod jwt;

pub use config::TokenConfig;
pub use error::AuthError;
pub use jwt::{Claims, TokenService};
