//! Blocking client for the institution's token-based HTTP API.

use std::sync::Arc;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::errors::AuthError;
use crate::storage::{load_snapshot, save_snapshot, StorageBackend};

pub const API_TOKEN_NAMESPACE: &str = "api_token";

/// Token issued by `POST /auth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Profile returned by `GET /auth/users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

/// HTTP client that exchanges credentials for a bearer token and keeps the
/// token in its own storage namespace so it survives restarts.
pub struct ApiClient {
    backend: Arc<dyn StorageBackend>,
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        base_url: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let http = Client::builder().build()?;
        Ok(Self {
            backend,
            http,
            base_url: base_url.into(),
        })
    }

    /// Exchanges form-encoded credentials for a bearer token and persists it.
    pub fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let path = "/auth/token";
        let response = self
            .http
            .post(self.url(path))
            .form(&[("username", username), ("password", password)])
            .send()?;
        if !response.status().is_success() {
            return Err(AuthError::RequestFailed {
                path: path.into(),
                status: response.status().as_u16(),
            });
        }
        let token: TokenResponse = response.json()?;
        save_snapshot(self.backend.as_ref(), API_TOKEN_NAMESPACE, &token.access_token)?;
        debug!("api token stored");
        Ok(token)
    }

    /// Fetches the authenticated user's profile.
    pub fn current_user(&self) -> Result<ApiUser, AuthError> {
        let response = self.authorized_get("/auth/users/me")?;
        Ok(response.json()?)
    }

    /// Fetches the dashboard payload as opaque JSON.
    pub fn fetch_dashboard(&self) -> Result<serde_json::Value, AuthError> {
        let response = self.authorized_get("/api/alm/dashboard")?;
        Ok(response.json()?)
    }

    /// Stored bearer token, if any.
    pub fn token(&self) -> Result<Option<String>, AuthError> {
        Ok(load_snapshot(self.backend.as_ref(), API_TOKEN_NAMESPACE)?)
    }

    /// Drops the stored bearer token.
    pub fn clear_token(&self) -> Result<(), AuthError> {
        self.backend.remove(API_TOKEN_NAMESPACE)?;
        Ok(())
    }

    /// Issues an authenticated GET. A 401 clears the stored token so the
    /// caller has to log in again.
    fn authorized_get(&self, path: &str) -> Result<Response, AuthError> {
        let token = self.token()?.ok_or(AuthError::MissingToken)?;
        let response = self.http.get(self.url(path)).bearer_auth(token).send()?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.clear_token()?;
            return Err(AuthError::TokenExpired);
        }
        if !response.status().is_success() {
            return Err(AuthError::RequestFailed {
                path: path.into(),
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
