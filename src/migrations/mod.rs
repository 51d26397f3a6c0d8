use anyhow::Result;
use async_trait::async_trait;

/// Represents a single database migration step.
///
/// Each migration transforms the database from one version to the next.
/// Migrations should be idempotent and safe to run multiple times.
#[async_trait]
pub trait Migration: Send + Sync {
    /// The target version this migration upgrades to.
    fn target_version(&self) -> u32;

    /// A human-readable description of what this migration does.
    fn description(&self) -> &str;

    /// Apply this migration to the database.
    async fn apply(&self) -> Result<()>;
}

/// Manages database schema versions and applies migrations.
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Get the current schema version stored in the backend.
    ///
    /// Returns 0 if no version is stored (fresh install).
    async fn get_current_version(&self) -> Result<u32>;

    /// Set the schema version in the backend.
    async fn set_version(&self, version: u32) -> Result<()>;

    /// Get all available migrations for this backend, ordered by target version.
    fn get_migrations(&self) -> Vec<Box<dyn Migration>>;

    /// Apply all necessary migrations to reach the latest version.
    ///
    /// Fails if any migration fails or if the stored version is higher than
    /// the latest available version.
    async fn migrate_to_latest(&self) -> Result<()> {
        let current_version = self.get_current_version().await?;
        let migrations = self.get_migrations();

        if migrations.is_empty() {
            tracing::info!("No migrations available");
            return Ok(());
        }

        let latest_version = migrations
            .iter()
            .map(|m| m.target_version())
            .max()
            .unwrap_or(0);

        if current_version > latest_version {
            anyhow::bail!(
                "Stored schema version {} is higher than latest available version {}. \
                This usually means an older build is running against a newer database.",
                current_version,
                latest_version
            );
        }

        if current_version == latest_version {
            tracing::info!(
                "Database schema is up to date at version {}",
                current_version
            );
            return Ok(());
        }

        tracing::info!(
            "Migrating database schema from version {} to version {}",
            current_version,
            latest_version
        );

        for migration in migrations {
            let target = migration.target_version();

            if target <= current_version {
                continue;
            }

            tracing::info!(
                "Applying migration to version {}: {}",
                target,
                migration.description()
            );

            migration.apply().await.map_err(|e| {
                anyhow::anyhow!("Failed to apply migration to version {}: {}", target, e)
            })?;

            self.set_version(target).await.map_err(|e| {
                anyhow::anyhow!("Failed to update schema version to {}: {}", target, e)
            })?;

            tracing::info!("Successfully migrated to version {}", target);
        }

        tracing::info!("Database migration completed successfully");
        Ok(())
    }
}

pub mod sqlite;
