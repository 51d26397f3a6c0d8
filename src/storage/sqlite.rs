use super::{Dataset, Incident, Storage, Ticket};
use crate::error::StoreError;
use crate::migrations::{Migrator, sqlite::SqliteStorageMigrator};
use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;

/// Pool size for a database URI.
///
/// Each connection to `:memory:` opens its own empty database, so in-memory
/// pools are kept to a single connection.
pub(crate) fn max_connections(uri: &str) -> u32 {
    if uri.contains(":memory:") { 1 } else { 5 }
}

#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Create a new SQLite storage backend and bring its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or a migration fails.
    #[tracing::instrument(skip_all)]
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| {
                StoreError::Unavailable(
                    format!(
                        "Invalid SQLite database URI '{path}': {e}

Please ensure the URI is in the correct format:
- File database: sqlite:///path/to/intelligence_platform.db
- In-memory database: sqlite::memory:
- Relative path: sqlite://relative/path.db"
                    )
                    .into(),
                )
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections(path))
            .connect_with(options)
            .await
            .map_err(|e| {
                StoreError::Unavailable(
                    format!(
                        "Failed to connect to SQLite database '{path}': {e}

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

    /// Use an existing pool, running pending migrations first.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        SqliteStorageMigrator::new(pool.clone())
            .migrate_to_latest()
            .await
            .map_err(|e| StoreError::Unavailable(e.into()))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    #[tracing::instrument(skip_all)]
    async fn insert_incident(&self, incident: &Incident) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO cyber_incidents (incident_id, timestamp, severity, category, status, description) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(incident.incident_id)
        .bind(&incident.timestamp)
        .bind(&incident.severity)
        .bind(&incident.category)
        .bind(&incident.status)
        .bind(&incident.description)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, format!("Incident {}", incident.incident_id)))?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn list_incidents(&self) -> Result<Vec<Incident>, StoreError> {
        let rows = sqlx::query_as::<_, Incident>(
            "SELECT incident_id, timestamp, severity, category, status, description \
             FROM cyber_incidents ORDER BY incident_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip_all)]
    async fn get_incident(&self, id: i64) -> Result<Option<Incident>, StoreError> {
        let row = sqlx::query_as::<_, Incident>(
            "SELECT incident_id, timestamp, severity, category, status, description \
             FROM cyber_incidents WHERE incident_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip_all)]
    async fn update_incident_status(&self, id: i64, status: &str) -> Result<bool, StoreError> {
        let res = sqlx::query("UPDATE cyber_incidents SET status = ? WHERE incident_id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all)]
    async fn delete_incident(&self, id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM cyber_incidents WHERE incident_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all)]
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO it_tickets \
             (ticket_id, priority, description, status, assigned_to, created_at, resolution_time_hours) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(ticket.ticket_id)
        .bind(&ticket.priority)
        .bind(&ticket.description)
        .bind(&ticket.status)
        .bind(&ticket.assigned_to)
        .bind(&ticket.created_at)
        .bind(ticket.resolution_time_hours)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, format!("Ticket {}", ticket.ticket_id)))?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError> {
        let rows = sqlx::query_as::<_, Ticket>(
            "SELECT ticket_id, priority, description, status, assigned_to, created_at, resolution_time_hours \
             FROM it_tickets ORDER BY ticket_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip_all)]
    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, StoreError> {
        let row = sqlx::query_as::<_, Ticket>(
            "SELECT ticket_id, priority, description, status, assigned_to, created_at, resolution_time_hours \
             FROM it_tickets WHERE ticket_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip_all)]
    async fn update_ticket_status(
        &self,
        id: i64,
        status: &str,
        resolution_time_hours: Option<f64>,
    ) -> Result<bool, StoreError> {
        let res = sqlx::query(
            "UPDATE it_tickets SET status = ?, resolution_time_hours = ? WHERE ticket_id = ?",
        )
        .bind(status)
        .bind(resolution_time_hours)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all)]
    async fn delete_ticket(&self, id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM it_tickets WHERE ticket_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all)]
    async fn insert_dataset(&self, dataset: &Dataset) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO datasets_metadata (dataset_id, name, rows, columns, uploaded_by, upload_date) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(dataset.dataset_id)
        .bind(&dataset.name)
        .bind(dataset.rows)
        .bind(dataset.columns)
        .bind(&dataset.uploaded_by)
        .bind(&dataset.upload_date)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_insert(e, format!("Dataset {}", dataset.dataset_id)))?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn list_datasets(&self) -> Result<Vec<Dataset>, StoreError> {
        let rows = sqlx::query_as::<_, Dataset>(
            "SELECT dataset_id, name, rows, columns, uploaded_by, upload_date \
             FROM datasets_metadata ORDER BY dataset_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[tracing::instrument(skip_all)]
    async fn get_dataset(&self, id: i64) -> Result<Option<Dataset>, StoreError> {
        let row = sqlx::query_as::<_, Dataset>(
            "SELECT dataset_id, name, rows, columns, uploaded_by, upload_date \
             FROM datasets_metadata WHERE dataset_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    #[tracing::instrument(skip_all)]
    async fn update_dataset_name(&self, id: i64, name: &str) -> Result<bool, StoreError> {
        let res = sqlx::query("UPDATE datasets_metadata SET name = ? WHERE dataset_id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    #[tracing::instrument(skip_all)]
    async fn delete_dataset(&self, id: i64) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM datasets_metadata WHERE dataset_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
