use sqlx::SqlitePool;
use tracing::warn;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{Session, User};

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";

/// Durable token + user pair, read once at startup.
#[derive(Clone)]
pub struct SessionStore {
    db: SqlitePool,
}

impl SessionStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Returns `None` unless both entries exist and the user parses.
    /// A broken or half-written pair is removed rather than reported.
    pub async fn load(&self) -> Result<Option<Session>, AppError> {
        let token = repository::get_item(&self.db, TOKEN_KEY).await?;
        let user = repository::get_item(&self.db, USER_KEY).await?;

        match (token, user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<User>(&raw_user) {
                Ok(user) if !token.is_empty() => Ok(Some(Session { token, user })),
                Ok(_) => {
                    warn!("stored session has an empty token; clearing");
                    self.clear().await?;
                    Ok(None)
                }
                Err(e) => {
                    warn!("stored user data is corrupt ({}); clearing session", e);
                    self.clear().await?;
                    Ok(None)
                }
            },
            (None, None) => Ok(None),
            _ => {
                warn!("stored session is incomplete; clearing");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    pub async fn save(&self, session: &Session) -> Result<(), AppError> {
        let user = serde_json::to_string(&session.user)?;
        repository::set_items(
            &self.db,
            &[(TOKEN_KEY, session.token.as_str()), (USER_KEY, user.as_str())],
        )
        .await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        repository::remove_items(&self.db, &[TOKEN_KEY, USER_KEY]).await?;
        Ok(())
    }
}
