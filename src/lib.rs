//! Incident, ticket and dataset tracking with credential management and
//! AI-assisted analysis.

pub mod assistant;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod migrations;
pub mod prelude;
pub mod session;
pub mod storage;
pub mod validation;

use crate::assistant::GeminiClient;
use crate::auth::Authenticator;
use crate::config::Config;
use crate::dashboard::Dashboard;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

/// Create the directory holding a file-backed SQLite database.
fn ensure_parent_dir(uri: &str) -> std::io::Result<()> {
    let Some(rest) = uri.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let file = rest.trim_start_matches("//");
    let file = file.split('?').next().unwrap_or(file);
    if file.is_empty() || file.contains(":memory:") {
        return Ok(());
    }
    match Path::new(file).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// Open the account and record stores named by `cfg` and wire up the
/// assistant when one is configured.
///
/// # Errors
///
/// Returns an error if either database cannot be opened or migrated, or the
/// HTTP client cannot be built.
pub async fn open_dashboard(cfg: &Config) -> anyhow::Result<Dashboard> {
    for uri in [cfg.db_path.as_str(), cfg.auth_db_path()] {
        ensure_parent_dir(uri).with_context(|| format!("creating directory for {uri}"))?;
    }
    let accounts = auth::open(cfg.auth_db_path())
        .await
        .with_context(|| format!("opening account store {}", cfg.auth_db_path()))?;
    let storage = storage::open(&cfg.db_path)
        .await
        .with_context(|| format!("opening record store {}", cfg.db_path))?;

    let mut dashboard = Dashboard::new(Authenticator::new(accounts), storage);
    match &cfg.assistant {
        Some(assistant) => {
            let client = GeminiClient::new(assistant.clone())
                .context("building completion client")?;
            tracing::info!(model = %assistant.model, "Assistant enabled");
            dashboard = dashboard.with_assistant(Arc::new(client));
        }
        None => tracing::info!("No [assistant] section; AI analysis disabled"),
    }
    Ok(dashboard)
}
