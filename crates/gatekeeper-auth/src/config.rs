//! Session store configuration

use serde::{Deserialize, Serialize};

/// Role a profile must carry to be admitted
pub const DEFAULT_REQUIRED_ROLE: &str = "System Admin";

/// Storage key holding the session token
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Endpoints, storage key and role used by an `AuthStore`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_profile_path")]
    pub profile_path: String,
    #[serde(default = "default_logout_path")]
    pub logout_path: String,
    #[serde(default = "default_token_key")]
    pub token_key: String,
    #[serde(default = "default_required_role")]
    pub required_role: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            profile_path: default_profile_path(),
            logout_path: default_logout_path(),
            token_key: default_token_key(),
            required_role: default_required_role(),
        }
    }
}

fn default_login_path() -> String {
    "/api/login".to_string()
}

fn default_profile_path() -> String {
    "/api/me".to_string()
}

fn default_logout_path() -> String {
    "/api/logout".to_string()
}

fn default_token_key() -> String {
    DEFAULT_TOKEN_KEY.to_string()
}

fn default_required_role() -> String {
    DEFAULT_REQUIRED_ROLE.to_string()
}
