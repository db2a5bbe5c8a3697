//! Staff sign-in and the per-tab session.
//!
//! An [`AuthContext`] owns one tab's [`AuthState`] and mirrors it into a
//! [`SessionStore`] under two well-known keys. Other tabs attached to the same
//! store observe those keys and follow sign-in and sign-out. While signed in,
//! a refresh timer extends the session; a failed refresh signs the tab out.

mod context;
mod password;
mod store;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

pub use context::{AuthContext, TaskGuard};
pub use password::{DEFAULT_PBKDF2_ITERATIONS, PasswordHash, hash_password, verify_password};
pub use store::{AUTH_TOKEN_KEY, MemorySessionStore, SessionStore, StorageEvent, USER_DATA_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            other => anyhow::bail!("Unknown role: {}", other),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
}

impl AuthState {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User, token: String) -> Self {
        Self {
            is_authenticated: true,
            user: Some(user),
            token: Some(token),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// Checks staff credentials. `Ok(None)` means the credentials were wrong.
pub trait Authenticator {
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = anyhow::Result<Option<User>>>;
}
