//! Session data models

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Login credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Email address or phone number
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A role attached to a user profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Role {
    pub name: String,
    /// Any other fields the server sends, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

/// Profile of the signed-in user, as returned by the profile endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub roles: Vec<Role>,
    /// Remaining profile fields (`id`, `name`, `email`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Whether the profile carries a role with exactly this name
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role.name == name)
    }

    /// Look up a top-level string field such as `email` or `name`
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// Treat `"roles": null` like a missing list
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Role>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Immutable copy of the store state
#[derive(Clone, Default, PartialEq)]
pub struct AuthSnapshot {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl AuthSnapshot {
    /// A token and a profile are both present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

impl fmt::Debug for AuthSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSnapshot")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("is_authenticated", &self.is_authenticated())
            .finish()
    }
}
