//! Gatekeeper Token Storage
//!
//! This crate provides the persisted key-value slot that holds the
//! session token, with in-memory and local file backends.

pub mod backend;
pub mod error;
pub mod file;
pub mod memory;

pub use backend::{TokenStorage, validate_key};
pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;
