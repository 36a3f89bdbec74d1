// Common types shared with the rest of the workspace
pub mod common;

// Client library (public API for the fivey binary and fivey-api)
mod client;
mod error;

pub use client::{authenticate, AuthClient, Session, Settings, TokenStore};
pub use common::Credentials;
pub use error::{AuthError, LoginFlowError};
