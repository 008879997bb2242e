//! Observable authentication state derived from the stored bearer token

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::auth::{user_from_token, AuthUser, TokenStorage};

/// A token together with the user it decodes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Never serialized, so printed state does not leak the credential
    #[serde(skip_serializing)]
    pub token: String,
    pub user: AuthUser,
}

/// Coarse lifecycle of the auth state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// `init` has not run yet
    Uninitialized,
    Anonymous,
    Authenticated,
}

/// Snapshot of the authentication state.
///
/// The token and the user only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthState {
    session: Option<Session>,
    is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().map_or(false, |u| u.is_admin)
    }

    pub fn status(&self) -> AuthStatus {
        match (&self.session, self.is_loading) {
            (Some(_), _) => AuthStatus::Authenticated,
            (None, true) => AuthStatus::Uninitialized,
            (None, false) => AuthStatus::Anonymous,
        }
    }
}

/// Auth state container.
///
/// Starts uninitialized (`is_loading = true`). All transitions go through
/// [`init`](Self::init), [`set_token`](Self::set_token) and
/// [`logout`](Self::logout), which keep the token storage in step with the
/// state. Invalid or expired tokens are never reported as errors: they
/// simply leave the store anonymous. Clones share the same state.
#[derive(Debug, Clone)]
pub struct AuthStore {
    storage: Arc<dyn TokenStorage>,
    state: Arc<watch::Sender<AuthState>>,
}

impl AuthStore {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            storage,
            state: Arc::new(state),
        }
    }

    /// Current state
    pub fn get(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    /// Restore the session from storage.
    ///
    /// A stored token that no longer decodes or has expired is removed.
    pub fn init(&self) {
        let session = match self.storage.get() {
            None => None,
            Some(token) => {
                let session = self.session_for(&token);
                if session.is_none() {
                    log::warn!("discarding stored token: invalid or expired");
                    self.storage.clear();
                }
                session
            }
        };

        self.state.send_modify(|state| {
            state.session = session;
            state.is_loading = false;
        });
    }

    /// Adopt a new token, or sign out with `None`.
    ///
    /// A token that does not decode or has expired is treated like `None`.
    pub fn set_token(&self, token: Option<&str>) {
        let session = token.and_then(|t| self.session_for(t));

        match &session {
            Some(session) => {
                log::info!("signed in as {}", session.user.login);
                self.storage.set(&session.token);
            }
            None => {
                if token.is_some() {
                    log::warn!("rejecting invalid or expired token");
                }
                self.storage.clear();
            }
        }

        self.state.send_modify(|state| state.session = session);
    }

    /// Toggle the loading flag without touching the session
    pub fn set_loading(&self, is_loading: bool) {
        self.state.send_modify(|state| state.is_loading = is_loading);
    }

    /// Forget the session and the stored token
    pub fn logout(&self) {
        self.storage.clear();
        self.state.send_replace(AuthState {
            session: None,
            is_loading: false,
        });
        log::info!("signed out");
    }

    fn session_for(&self, token: &str) -> Option<Session> {
        user_from_token(token).map(|user| Session {
            token: token.to_string(),
            user,
        })
    }
}
