//! Response envelope handling
//!
//! The console backend wraps every payload as `{ "data": ... }`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// `{ "data": T }` response wrapper
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
}

/// Unwrap the `data` field of a response body and decode it as `T`
pub fn decode_data<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_value(body)
        .map_err(|e| ApiError::InvalidResponse(format!("Malformed response payload: {}", e)))?;
    Ok(envelope.data)
}
