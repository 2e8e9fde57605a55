use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{LoginForm, RegisterForm, RegisterRequest, Session, User};
use crate::state::AppState;
use crate::validation;

pub struct AuthService<'a> {
    state: &'a mut AppState,
}

impl<'a> AuthService<'a> {
    pub fn new(state: &'a mut AppState) -> Self {
        Self { state }
    }

    /// Validates locally, then signs in. Nothing is sent when a field fails.
    pub async fn login(&mut self, form: &LoginForm) -> Result<&User, AppError> {
        validation::validate_login(form).map_err(AppError::Validation)?;

        let res = self.state.api.login(form).await?;
        self.state.sign_in(Session::from(res)).await?;
        self.signed_in_user()
    }

    pub async fn register(&mut self, form: &RegisterForm) -> Result<&User, AppError> {
        validation::validate_registration(form).map_err(AppError::Validation)?;

        let res = self.state.api.register(&RegisterRequest::from(form)).await?;
        info!("Registered {}", res.user.email);
        self.state.sign_in(Session::from(res)).await?;
        self.signed_in_user()
    }

    /// Local state is always cleared, even when the backend call fails.
    pub async fn logout(&mut self) -> Result<(), AppError> {
        if self.state.is_authenticated() {
            if let Err(e) = self.state.api.logout().await {
                warn!("Remote logout failed: {}", e);
            }
        }
        self.state.sign_out().await?;
        info!("Signed out");
        Ok(())
    }

    /// Re-reads the signed-in user from `/auth/me` and persists it.
    pub async fn refresh_user(&mut self) -> Result<&User, AppError> {
        let Some(token) = self.state.session.as_ref().map(|s| s.token.clone()) else {
            return Err(AppError::NotAuthenticated);
        };

        let result = self.state.api.current_user().await;
        let user = self.state.settle(result).await?;
        self.state.sign_in(Session { token, user }).await?;
        self.signed_in_user()
    }

    fn signed_in_user(&self) -> Result<&User, AppError> {
        self.state.current_user().ok_or(AppError::NotAuthenticated)
    }
}
