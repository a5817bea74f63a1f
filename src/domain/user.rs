use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Identifiable;

/// A registered user as stored in the local user directory.
///
/// Passwords are kept in plain text; the directory only backs the local
/// demo sign-in flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
            created_at,
        }
    }

    /// Credential-free view safe to expose and persist in the session.
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

impl Identifiable for UserRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// The identity exposed to callers once a user is signed in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

/// Persisted session state; never carries credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user: SessionUser,
    pub authenticated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_user_drops_password() {
        let record = UserRecord::new("Dana Reyes", "dana@example.com", "hunter22", Utc::now());
        let session = record.session_user();
        assert_eq!(session.email, "dana@example.com");
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("hunter22"));
    }
}
