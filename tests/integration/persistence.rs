use crate::common::{incident_form, registration};
use intelplat::prelude::*;
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> Config {
    Config {
        db_path: format!("sqlite://{}/DATA/intelligence_platform.db", dir.path().display()),
        auth_db_path: Some(format!("sqlite://{}/DATA/users.db", dir.path().display())),
        assistant: None,
    }
}

#[tokio::test]
async fn records_and_accounts_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = file_config(&dir);

    {
        let dashboard = intelplat::open_dashboard(&cfg).await.unwrap();
        dashboard
            .register(&registration("alice", "Secure123", Some("analyst")))
            .await
            .unwrap();
        let mut session = Session::new();
        dashboard
            .login(&mut session, "alice", "Secure123")
            .await
            .unwrap();
        dashboard
            .add_incident(&session, &incident_form("1000", "Critical", "Open"))
            .await
            .unwrap();
    }

    let dashboard = intelplat::open_dashboard(&cfg).await.unwrap();
    let mut session = Session::new();
    dashboard
        .login(&mut session, "alice", "Secure123")
        .await
        .unwrap();
    let incidents = dashboard.incidents(&session).await.unwrap();
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].severity, "Critical");

    assert!(dir.path().join("DATA/users.db").exists());
}

#[tokio::test]
async fn config_file_drives_database_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!("db_path = \"sqlite://{}/records.db\"\n", dir.path().display()),
    )
    .unwrap();

    let cfg = Config::from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(cfg.auth_db_path(), cfg.db_path);
    intelplat::open_dashboard(&cfg).await.unwrap();
    assert!(dir.path().join("records.db").exists());
}
