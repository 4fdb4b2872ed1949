//! User provisioning shared by the binary and the admin routes.

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use conforma_auth::hash_password;
use conforma_core::records::User;
use conforma_store::{Filter, Guard, Store, WriteBatch};

use crate::config::ServerConfig;
use crate::state::{collections, AppState};

/// Create a user; the email uniqueness guard and the insert commit
/// atomically.
pub async fn create_user(
    state: &AppState,
    email: &str,
    name: &str,
    password: &str,
    super_admin: bool,
) -> Result<User> {
    let user = User {
        id: Uuid::new_v4(),
        email: email.trim().to_lowercase(),
        name: name.trim().to_string(),
        password_hash: hash_password(password)?,
        super_admin,
        created_at: Utc::now(),
    };

    let batch = WriteBatch::new()
        .guard(Guard::unique(
            collections::USERS,
            "email",
            user.email.clone(),
        ))
        .insert(
            collections::USERS,
            user.id.to_string(),
            serde_json::to_value(&user)?,
        );
    state.store.commit(batch).await?;

    Ok(user)
}

/// Create the initial super-admin from config, if requested and not
/// already present.
pub async fn ensure_admin(state: &AppState, config: &ServerConfig) -> Result<()> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    let existing = state
        .store
        .find(
            collections::USERS,
            &Filter::new().eq("email", email.trim().to_lowercase()),
        )
        .await?;
    if !existing.is_empty() {
        return Ok(());
    }

    let user = create_user(state, email, "Administrator", password, true).await?;
    tracing::info!(user_id = %user.id, "created initial super-admin");
    Ok(())
}
