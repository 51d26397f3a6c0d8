use crate::error::StoreError;
use async_trait::async_trait;
use std::sync::Arc;

pub mod models;
pub mod sqlite;
pub mod summary;

pub use models::{Dataset, Incident, Ticket};

/// Record store for incidents, tickets and dataset metadata.
///
/// Every operation is a single statement. Updates and deletes report whether
/// a row was affected instead of failing on a missing id.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert an incident. A taken `incident_id` is a [`StoreError::Conflict`].
    async fn insert_incident(&self, incident: &Incident) -> Result<(), StoreError>;

    /// All incidents ordered by id.
    async fn list_incidents(&self) -> Result<Vec<Incident>, StoreError>;

    async fn get_incident(&self, id: i64) -> Result<Option<Incident>, StoreError>;

    async fn update_incident_status(&self, id: i64, status: &str) -> Result<bool, StoreError>;

    async fn delete_incident(&self, id: i64) -> Result<bool, StoreError>;

    /// Insert a ticket. A taken `ticket_id` is a [`StoreError::Conflict`].
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// All tickets ordered by id.
    async fn list_tickets(&self) -> Result<Vec<Ticket>, StoreError>;

    async fn get_ticket(&self, id: i64) -> Result<Option<Ticket>, StoreError>;

    /// Set the status and resolution time of a ticket.
    async fn update_ticket_status(
        &self,
        id: i64,
        status: &str,
        resolution_time_hours: Option<f64>,
    ) -> Result<bool, StoreError>;

    async fn delete_ticket(&self, id: i64) -> Result<bool, StoreError>;

    /// Insert dataset metadata. A taken `dataset_id` is a [`StoreError::Conflict`].
    async fn insert_dataset(&self, dataset: &Dataset) -> Result<(), StoreError>;

    /// All dataset metadata ordered by id.
    async fn list_datasets(&self) -> Result<Vec<Dataset>, StoreError>;

    async fn get_dataset(&self, id: i64) -> Result<Option<Dataset>, StoreError>;

    async fn update_dataset_name(&self, id: i64, name: &str) -> Result<bool, StoreError>;

    async fn delete_dataset(&self, id: i64) -> Result<bool, StoreError>;
}

pub type DynStorage = Arc<dyn Storage>;

/// Create a storage backend from a connection URI.
pub async fn open(uri: &str) -> Result<DynStorage, StoreError> {
    if uri.starts_with("sqlite:") {
        Ok(Arc::new(sqlite::SqliteStorage::new(uri).await?))
    } else {
        Err(StoreError::Unavailable(
            format!("unknown storage backend: {uri}").into(),
        ))
    }
}
