use std::sync::Arc;
use tokio::sync::watch;

use super::auth_manager::AuthApi;
use super::error::{AuthFailure, SessionError};
use super::models::Session;
use super::request_config::RequestConfig;
use super::session_storage::{TokenStore, JWT_KEY};
use super::token::{decode_claims, fingerprint, TokenClaims};
use crate::api::models::{ApiResult, User};

/// What the startup restore found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    NoToken,
    Restored { user_id: i64 },
    /// A stored token could not be decoded and the session was cleared.
    Discarded,
    StorageUnavailable,
}

/// Owns the session and the persisted token behind it.
///
/// Built once with its collaborators and shared by reference. Calls are not
/// serialized against each other: if two logins overlap, the last one to
/// finish wins.
pub struct SessionManager {
    auth_api: Arc<dyn AuthApi>,
    store: Arc<dyn TokenStore>,
    request_config: RequestConfig,
    state: watch::Sender<Session>,
}

impl SessionManager {
    pub fn new(
        auth_api: Arc<dyn AuthApi>,
        store: Arc<dyn TokenStore>,
        request_config: RequestConfig,
    ) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            auth_api,
            store,
            request_config,
            state,
        }
    }

    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn request_config(&self) -> &RequestConfig {
        &self.request_config
    }

    /// Resolves once `restore` has completed.
    pub async fn wait_initialized(&self) {
        let mut receiver = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = receiver.wait_for(|session| session.initialized).await;
    }

    /// Loads the persisted token, if any. Run once at startup.
    pub async fn restore(&self) -> RestoreOutcome {
        let outcome = match self.store.get(JWT_KEY).await {
            Ok(Some(token)) => {
                log::info!("Found stored token {}", fingerprint(&token));
                match self.process_token(&token).await {
                    Ok(claims) => RestoreOutcome::Restored { user_id: claims.id },
                    Err(_) => RestoreOutcome::Discarded,
                }
            }
            Ok(None) => {
                log::info!("No stored session");
                RestoreOutcome::NoToken
            }
            Err(e) => {
                log::warn!("{}", SessionError::StorageUnavailable(e.to_string()));
                RestoreOutcome::StorageUnavailable
            }
        };

        self.state.send_modify(|session| session.initialized = true);
        outcome
    }

    /// Adopts `token` as the current session, or logs out if it cannot be decoded.
    pub async fn process_token(&self, token: &str) -> Result<TokenClaims, SessionError> {
        match decode_claims(token) {
            Ok(claims) => {
                self.state.send_modify(|session| {
                    session.raw_token = Some(token.to_string());
                    session.user_id = Some(claims.id);
                });
                self.request_config.set_bearer(token).await;
                log::debug!("Session active for user {}", claims.id);
                Ok(claims)
            }
            Err(e) => {
                log::warn!("Discarding token {}: {}", fingerprint(token), e);
                self.logout().await;
                Err(e.into())
            }
        }
    }

    /// On success returns the API result carrying the token. A token that
    /// fails to decode still returns success here but leaves no session and
    /// is never persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<ApiResult<String>, AuthFailure> {
        let result = self.auth_api.login(email, password).await;

        let token = match (&result.error, &result.data) {
            (Some(message), _) => {
                log::info!("Login rejected for {}: {}", email, message);
                return Err(SessionError::CredentialsRejected(message.clone()).into());
            }
            (None, Some(token)) => token.clone(),
            (None, None) => return Err(AuthFailure::new("Login response did not contain a token")),
        };

        if self.process_token(&token).await.is_ok() {
            if let Err(e) = self.store.set(JWT_KEY, &token).await {
                log::warn!("{}", SessionError::StorageUnavailable(e.to_string()));
            }
        }

        Ok(result)
    }

    /// Creates an account. The caller still has to log in afterwards.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<ApiResult<User>, AuthFailure> {
        let result = self.auth_api.register(email, password, name).await;

        if let Some(message) = &result.error {
            log::info!("Registration rejected for {}: {}", email, message);
            return Err(AuthFailure::new(message.clone()));
        }

        Ok(result)
    }

    pub async fn logout(&self) {
        if let Err(e) = self.store.delete(JWT_KEY).await {
            log::warn!("{}", SessionError::StorageUnavailable(e.to_string()));
        }

        self.state.send_modify(|session| {
            session.raw_token = None;
            session.user_id = None;
        });
        self.request_config.clear_authorization().await;
        log::info!("Logged out");
    }
}
