use super::{Account, AccountStore, Role, async_trait};
use crate::error::StoreError;
use chrono::{TimeZone, Utc};
use sqlx::{
    Row, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use std::str::FromStr;

// SQL schema for SQLite account storage
const USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user',
        created_at INTEGER NOT NULL
    )";

#[derive(Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    /// Create a new `SQLite` account store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| {
                StoreError::Unavailable(
                    format!(
                        "Invalid SQLite account database URI '{path}': {e}

Please ensure the URI is in the correct format:
- File database: sqlite:///path/to/platform.db
- In-memory database: sqlite::memory:
- Relative path: sqlite://relative/path.db"
                    )
                    .into(),
                )
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(crate::storage::sqlite::max_connections(path))
            .connect_with(options)
            .await
            .map_err(|e| {
                StoreError::Unavailable(
                    format!(
                        "Failed to connect to SQLite account database '{path}': {e}

Possible causes:
- Parent directory does not exist
- Permission denied accessing the database file or directory
- Database file is corrupted or not a valid SQLite database
- Database is locked by another process"
                    )
                    .into(),
                )
            })?;

        Self::with_pool(pool).await
    }

    /// Use an existing pool, creating the `users` table if needed.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(USERS_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }

    fn account_from_row(row: &SqliteRow) -> Result<Account, StoreError> {
        let role: Option<String> = row.try_get("role")?;
        let created: i64 = row.try_get("created_at")?;
        Ok(Account {
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            role: Role::parse_or_default(role.as_deref()),
            created_at: Utc
                .timestamp_opt(created, 0)
                .single()
                .unwrap_or_else(Utc::now),
        })
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    #[tracing::instrument(skip_all)]
    async fn exists(&self, username: &str) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    #[tracing::instrument(skip_all)]
    async fn insert(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(account.created_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, format!("account {}", account.username)))?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(
            "SELECT username, password_hash, role, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::account_from_row).transpose()
    }
}
