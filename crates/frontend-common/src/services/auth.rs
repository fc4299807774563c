//! Credential flows that establish a session

use crate::auth::{AuthSession, User};
use subtuber_core::StorageStatus;
use subtuber_http::ApiError;
use subtuber_http::types::{LoginRequest, TokenResponse};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}: response did not include a token")]
    MissingToken(&'static str),
}

/// Result of a successful sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct SignedIn {
    pub user: User,
    /// Persisting the token
    pub token: StorageStatus,
    /// Persisting the user record
    pub user_record: StorageStatus,
}

/// Authentication API service
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthService;

impl AuthService {
    pub fn new() -> Self {
        Self
    }

    /// Username/password login
    pub async fn login(
        &self,
        session: &mut AuthSession,
        username: &str,
        password: &str,
    ) -> Result<SignedIn, AuthFlowError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = session.client().login(&request).await?;
        let fallback = User::new().with("username", username);
        establish(session, "login", response, fallback)
    }

    /// Ask the backend to email a one-time code
    pub async fn send_code(&self, session: &AuthSession, email: &str) -> Result<(), AuthFlowError> {
        session.client().send_code(email).await?;
        Ok(())
    }

    /// Exchange an emailed code for a session
    pub async fn verify_code(
        &self,
        session: &mut AuthSession,
        email: &str,
        code: &str,
    ) -> Result<SignedIn, AuthFlowError> {
        let response = session.client().verify_code(email, code).await?;
        let fallback = User::new().with("email", email);
        establish(session, "verify", response, fallback)
    }
}

/// Store the token, then the user; the backend's user wins over `fallback`
fn establish(
    session: &mut AuthSession,
    flow: &'static str,
    response: TokenResponse,
    fallback: User,
) -> Result<SignedIn, AuthFlowError> {
    let token = response
        .token
        .filter(|token| !token.is_empty())
        .ok_or(AuthFlowError::MissingToken(flow))?;

    let token_status = session.tokens().set(Some(&token));
    let user = response.user.map(User::from).unwrap_or(fallback);
    let user_record = session.set_user(Some(user.clone()));

    info!(flow, user = user.display_name().unwrap_or_default(), "Signed in");
    Ok(SignedIn {
        user,
        token: token_status,
        user_record,
    })
}
