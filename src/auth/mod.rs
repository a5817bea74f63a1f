pub mod api;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::domain::user::{Session, SessionUser, UserRecord};
use crate::errors::{AuthError, StoreResult};
use crate::storage::{load_snapshot, save_snapshot, StorageBackend};

pub use api::ApiClient;

pub const SESSION_NAMESPACE: &str = "session";
pub const USERS_NAMESPACE: &str = "users";

const MIN_PASSWORD_LEN: usize = 6;

/// Simulated local authentication over a plaintext user directory.
///
/// User records keep plaintext passwords in their own namespace — a
/// development-only simplification. The persisted session carries the user
/// and an authenticated flag, never credentials.
pub struct AuthStore {
    backend: Arc<dyn StorageBackend>,
    users: Vec<UserRecord>,
    session: Option<Session>,
    latency: Duration,
}

impl AuthStore {
    /// Rehydrates users and any persisted session. `latency` is the
    /// artificial delay applied to signup and login; tests pass
    /// `Duration::ZERO`.
    pub fn load(backend: Arc<dyn StorageBackend>, latency: Duration) -> StoreResult<Self> {
        let users = load_snapshot(backend.as_ref(), USERS_NAMESPACE)?.unwrap_or_default();
        let session = load_snapshot(backend.as_ref(), SESSION_NAMESPACE)?;
        Ok(Self {
            backend,
            users,
            session,
            latency,
        })
    }

    /// Registers a user in the local directory and signs them in.
    pub fn signup(
        &mut self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, AuthError> {
        self.simulate_latency();
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword(MIN_PASSWORD_LEN));
        }
        let normalized = email.trim().to_lowercase();
        if self
            .users
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(&normalized))
        {
            return Err(AuthError::DuplicateEmail(normalized));
        }

        let record = UserRecord::new(full_name.trim(), normalized, password, Utc::now());
        let session_user = record.session_user();
        self.users.push(record);
        save_snapshot(self.backend.as_ref(), USERS_NAMESPACE, &self.users)?;
        self.store_session(session_user.clone())?;
        info!(email = %session_user.email, "user signed up");
        Ok(session_user)
    }

    /// Signs a user in against the local directory.
    pub fn login(&mut self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        self.simulate_latency();
        let session_user = self
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email.trim()) && user.password == password)
            .map(|user| user.session_user())
            .ok_or(AuthError::InvalidCredentials)?;
        self.store_session(session_user.clone())?;
        Ok(session_user)
    }

    /// Clears the persisted session.
    pub fn logout(&mut self) -> StoreResult<()> {
        self.session = None;
        self.backend.remove(SESSION_NAMESPACE)
    }

    /// Drops every user record along with the session.
    pub fn clear(&mut self) -> StoreResult<()> {
        self.users.clear();
        self.backend.remove(USERS_NAMESPACE)?;
        self.logout()
    }

    pub fn set_latency(&mut self, latency: Duration) {
        self.latency = latency;
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.session
            .as_ref()
            .filter(|session| session.authenticated)
            .map(|session| &session.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .map(|session| session.authenticated)
            .unwrap_or(false)
    }

    fn store_session(&mut self, user: SessionUser) -> StoreResult<()> {
        let session = Session {
            user,
            authenticated: true,
        };
        save_snapshot(self.backend.as_ref(), SESSION_NAMESPACE, &session)?;
        self.session = Some(session);
        Ok(())
    }

    fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
    }
}
