pub mod auth;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;

use anyhow::{Context, Result};
use tracing::info;

use crate::{model::admin::Admin, store::Store};

/// Creates the configured admin account on first start. An existing account is left untouched.
pub async fn seed_admin(store: &dyn Store, username: &str, password: &str) -> Result<()> {
    let admin = Admin {
        username: username.to_string(),
        password_hash: password::hash_password(password)
            .map_err(|e| anyhow::anyhow!("failed to hash admin password: {e}"))?,
    };

    let created = store
        .insert_admin_if_missing(&admin)
        .await
        .context("failed to seed admin account")?;
    if created {
        info!(username, "Default admin created");
    }
    Ok(())
}
