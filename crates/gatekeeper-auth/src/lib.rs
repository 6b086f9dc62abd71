//! Gatekeeper Session Authentication
//!
//! This crate provides the client-side session store for the admin
//! console: it holds the session token and user profile, performs the
//! login, profile and logout calls, and only admits users carrying the
//! admin role.

pub mod config;
pub mod error;
pub mod listeners;
pub mod models;
pub mod store;

pub use config::{AuthConfig, DEFAULT_REQUIRED_ROLE, DEFAULT_TOKEN_KEY};
pub use error::AuthError;
pub use listeners::ListenerId;
pub use models::{AuthSnapshot, Credentials, Role, UserProfile};
pub use store::AuthStore;
