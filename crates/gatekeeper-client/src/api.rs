//! API client trait

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;

/// HTTP collaborator used by the session store
///
/// Every call receives the current session token explicitly. When `token`
/// is `Some`, implementations must attach it to the outgoing request (the
/// reqwest client sends it as a bearer `Authorization` header).
///
/// Successful calls return the decoded JSON body (`Value::Null` for an
/// empty body). Non-2xx responses must surface as errors.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// POST a form-encoded body
    async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<Value, ApiError>;

    /// GET a resource
    async fn get(&self, path: &str, token: Option<&str>) -> Result<Value, ApiError>;

    /// DELETE a resource
    async fn delete(&self, path: &str, token: Option<&str>) -> Result<Value, ApiError>;
}
