//! Account storage and credential handling.

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod memory;
pub mod password;
pub mod service;
pub mod sqlite;

pub use password::{hash_password, verify_password};
pub use service::Authenticator;

/// Access level attached to an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Analyst,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Analyst => "analyst",
        }
    }

    /// Parse a free-form role, falling back to [`Role::User`] when the input
    /// is empty or not a known role.
    pub fn parse_or_default(input: Option<&str>) -> Self {
        input
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "analyst" => Ok(Role::Analyst),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A stored username / password hash / role triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: impl Into<String>, password_hash: String, role: Role) -> Self {
        Self {
            username: username.into(),
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }
}

/// Backing medium for accounts.
///
/// Accounts are insert-only: there is no update or delete.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Whether an account with exactly this username exists.
    async fn exists(&self, username: &str) -> Result<bool, StoreError>;

    /// Insert a new account. Fails with [`StoreError::Conflict`] when the
    /// username is already taken.
    async fn insert(&self, account: &Account) -> Result<(), StoreError>;

    /// Look up an account by exact (case-sensitive) username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
}

pub type DynAccountStore = Arc<dyn AccountStore>;

/// Create an account store from a connection URI.
///
/// `memory:` selects the in-process store; `sqlite:` URIs open a database.
pub async fn open(uri: &str) -> Result<DynAccountStore, StoreError> {
    if uri == "memory:" {
        Ok(Arc::new(memory::MemoryAccountStore::new()))
    } else if uri.starts_with("sqlite:") {
        Ok(Arc::new(sqlite::SqliteAccountStore::new(uri).await?))
    } else {
        Err(StoreError::Unavailable(
            format!("unknown account store backend: {uri}").into(),
        ))
    }
}
