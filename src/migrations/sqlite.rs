use super::{Migration, Migrator};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

const CREATE_VERSION_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
)";

const INCIDENTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS cyber_incidents (
        incident_id INTEGER PRIMARY KEY,
        timestamp TEXT NOT NULL,
        severity TEXT NOT NULL,
        category TEXT NOT NULL,
        status TEXT NOT NULL,
        description TEXT
    )";

const TICKETS_TABLE: &str = "CREATE TABLE IF NOT EXISTS it_tickets (
        ticket_id INTEGER PRIMARY KEY,
        priority TEXT NOT NULL,
        description TEXT NOT NULL,
        status TEXT NOT NULL,
        assigned_to TEXT NOT NULL,
        created_at TEXT NOT NULL,
        resolution_time_hours REAL
    )";

const DATASETS_TABLE: &str = "CREATE TABLE IF NOT EXISTS datasets_metadata (
        dataset_id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        rows INTEGER NOT NULL CHECK (rows >= 0),
        columns INTEGER NOT NULL CHECK (columns >= 0),
        uploaded_by TEXT NOT NULL,
        upload_date TEXT NOT NULL
    )";

/// Version 1: the three record tables.
pub struct SqliteStorageMigration001 {
    pool: SqlitePool,
}

impl SqliteStorageMigration001 {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Migration for SqliteStorageMigration001 {
    fn target_version(&self) -> u32 {
        1
    }

    fn description(&self) -> &str {
        "Create cyber_incidents, it_tickets and datasets_metadata tables"
    }

    async fn apply(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(INCIDENTS_TABLE).execute(&mut *tx).await?;
        sqlx::query(TICKETS_TABLE).execute(&mut *tx).await?;
        sqlx::query(DATASETS_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

/// Version 2: indexes backing the dashboard summaries.
pub struct SqliteStorageMigration002 {
    pool: SqlitePool,
}

impl SqliteStorageMigration002 {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Migration for SqliteStorageMigration002 {
    fn target_version(&self) -> u32 {
        2
    }

    fn description(&self) -> &str {
        "Index incident and ticket status columns"
    }

    async fn apply(&self) -> Result<()> {
        tracing::debug!("Creating status indexes");
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_incidents_status ON cyber_incidents(status)",
        )
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_incidents_severity ON cyber_incidents(severity)",
        )
        .execute(&mut *tx)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tickets_status ON it_tickets(status)")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

pub struct SqliteStorageMigrator {
    pool: SqlitePool,
}

impl SqliteStorageMigrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Migrator for SqliteStorageMigrator {
    async fn get_current_version(&self) -> Result<u32> {
        sqlx::query(CREATE_VERSION_TABLE)
            .execute(&self.pool)
            .await?;

        let row = sqlx::query("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let version: i64 = row.try_get("version")?;
                Ok(u32::try_from(version)?)
            }
            None => Ok(0),
        }
    }

    async fn set_version(&self, version: u32) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM schema_version")
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(i64::from(version))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    fn get_migrations(&self) -> Vec<Box<dyn Migration>> {
        vec![
            Box::new(SqliteStorageMigration001::new(self.pool.clone())),
            Box::new(SqliteStorageMigration002::new(self.pool.clone())),
        ]
    }
}
