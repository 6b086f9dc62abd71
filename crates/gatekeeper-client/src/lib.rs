//! Gatekeeper API Client
//!
//! This crate provides the HTTP collaborator used by the session store to
//! talk to the console backend: the `ApiClient` seam, a reqwest-backed
//! implementation, and helpers for the `{ "data": ... }` response envelope.

pub mod api;
pub mod client;
pub mod envelope;
pub mod error;

pub use api::ApiClient;
pub use client::{HttpClient, HttpClientConfig};
pub use envelope::{Envelope, decode_data};
pub use error::ApiError;
