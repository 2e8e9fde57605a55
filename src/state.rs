use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::models::{Course, Session, User};
use crate::remote::StudyFlowApi;
use crate::store::{FallbackStore, SessionStore};

/// Everything a screen reads: the backend handle, the durable stores and the
/// in-memory copies of the session and enrolled courses.
pub struct AppState {
    pub db: SqlitePool,
    pub api: Arc<dyn StudyFlowApi>,
    pub sessions: SessionStore,
    pub fallback: FallbackStore,
    pub session: Option<Session>,
    pub enrolled: Vec<Course>,
}

impl AppState {
    pub fn new(api: Arc<dyn StudyFlowApi>, db: SqlitePool) -> Self {
        Self {
            api,
            sessions: SessionStore::new(db.clone()),
            fallback: FallbackStore::new(db.clone()),
            db,
            session: None,
            enrolled: Vec::new(),
        }
    }

    /// Reads the persisted session once at startup, arms the api token and
    /// seeds the enrolled list from the mirror.
    pub async fn restore_session(&mut self) -> Result<Option<&Session>, AppError> {
        let session = self.sessions.load().await?;
        self.api.set_token(session.as_ref().map(|s| s.token.clone()));
        match &session {
            Some(s) => {
                self.enrolled = self.fallback.read().await?;
                info!(
                    "Restored session for {} ({} stored courses)",
                    s.user.email,
                    self.enrolled.len()
                );
            }
            None => info!("No stored session"),
        }
        self.session = session;
        Ok(self.session.as_ref())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub async fn sign_in(&mut self, session: Session) -> Result<(), AppError> {
        self.sessions.save(&session).await?;
        self.api.set_token(Some(session.token.clone()));
        info!("Signed in as {}", session.user.email);
        self.session = Some(session);
        Ok(())
    }

    /// Drops the session, the enrolled-course mirror and the api token.
    pub async fn sign_out(&mut self) -> Result<(), AppError> {
        self.api.set_token(None);
        self.session = None;
        self.enrolled.clear();
        self.sessions.clear().await?;
        self.fallback.clear().await?;
        Ok(())
    }

    /// Passes `result` through, signing out first when the backend rejected
    /// the token. The original error is returned even if signing out fails.
    pub async fn settle<T>(&mut self, result: Result<T, AppError>) -> Result<T, AppError> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                warn!("Token rejected by backend; signing out");
                if let Err(clear_err) = self.sign_out().await {
                    error!("Failed to clear stored session: {}", clear_err);
                }
            }
        }
        result
    }
}
