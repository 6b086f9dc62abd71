//! Subcommand handlers

use anyhow::{Context, Result, bail};
use gatekeeper_auth::{AuthSnapshot, AuthStore, Credentials, UserProfile};

pub async fn login(store: &AuthStore, credentials: &Credentials) -> Result<()> {
    store
        .login(credentials)
        .await
        .with_context(|| format!("Login failed for {}", credentials.email))?;

    println!("Logged in as {}", credentials.email);
    Ok(())
}

pub async fn whoami(store: &AuthStore) -> Result<()> {
    if !store.restore().await.context("Failed to restore session")? {
        bail!("Not logged in");
    }

    let Some(user) = store.user() else {
        bail!("Not logged in");
    };

    println!("{}", render_profile(&user)?);
    Ok(())
}

pub fn status(store: &AuthStore) -> Result<()> {
    println!("{}", render_status(&store.snapshot()));
    Ok(())
}

pub async fn logout(store: &AuthStore) -> Result<()> {
    store
        .logout()
        .await
        .context("Server logout failed; local session was cleared")?;

    println!("Logged out");
    Ok(())
}

pub fn clear(store: &AuthStore) {
    store.clear_auth();
    println!("Local session cleared");
}

fn render_profile(user: &UserProfile) -> Result<String> {
    serde_json::to_string_pretty(user).context("Failed to serialize profile")
}

/// One line per field, without the token value itself
fn render_status(snapshot: &AuthSnapshot) -> String {
    let token = if snapshot.token.is_some() {
        "stored"
    } else {
        "none"
    };

    let roles = snapshot
        .user
        .as_ref()
        .map(|user| {
            user.roles
                .iter()
                .map(|role| role.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_else(|| "-".to_string());

    format!(
        "token: {}\nauthenticated: {}\nroles: {}",
        token,
        snapshot.is_authenticated(),
        roles
    )
}
