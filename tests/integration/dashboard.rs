use crate::common::{
    dataset_form, incident_form, logged_in, memory_dashboard, registration, ticket_form,
};
use intelplat::auth::Role;
use intelplat::error::{AuthError, PlatformError, StoreError, ValidationError};
use intelplat::prelude::*;

#[tokio::test]
async fn registration_role_defaults_to_user() {
    let dashboard = memory_dashboard().await;
    let account = dashboard
        .register(&registration("carol", "Secure123", Some("wizard")))
        .await
        .unwrap();
    assert_eq!(account.role, Role::User);

    let account = dashboard
        .register(&registration("dave", "Secure123", Some("Admin")))
        .await
        .unwrap();
    assert_eq!(account.role, Role::Admin);
}

#[tokio::test]
async fn logout_closes_the_dashboard() {
    let dashboard = memory_dashboard().await;
    let mut session = logged_in(&dashboard, "alice").await;
    assert!(dashboard.tickets(&session).await.is_ok());

    dashboard.logout(&mut session);
    let err = dashboard.tickets(&session).await.unwrap_err();
    assert!(matches!(err, PlatformError::Auth(AuthError::Required)));
    assert_eq!(
        err.client_message(),
        "You must be logged in to view the dashboard."
    );
}

#[tokio::test]
async fn failed_login_leaves_session_anonymous() {
    let dashboard = memory_dashboard().await;
    dashboard
        .register(&registration("alice", "Secure123", None))
        .await
        .unwrap();
    let mut session = Session::new();
    assert!(dashboard.login(&mut session, "alice", "nope").await.is_err());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn incident_summary_counts() {
    let dashboard = memory_dashboard().await;
    let session = logged_in(&dashboard, "alice").await;

    for (id, severity, status) in [
        ("1", "High", "Open"),
        ("2", "High", "Closed"),
        ("3", "Critical", "In Progress"),
        ("4", "Low", "Open"),
    ] {
        dashboard
            .add_incident(&session, &incident_form(id, severity, status))
            .await
            .unwrap();
    }

    let summary = dashboard.incident_summary(&session).await.unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.open, 2);
    assert_eq!(summary.closed, 2);
    assert_eq!(summary.by_category, vec![("Phishing".to_string(), 4)]);
    assert_eq!(
        summary.by_severity,
        vec![
            ("Low".to_string(), 1),
            ("Medium".to_string(), 0),
            ("High".to_string(), 2),
            ("Critical".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn duplicate_incident_id_is_reported() {
    let dashboard = memory_dashboard().await;
    let session = logged_in(&dashboard, "alice").await;
    dashboard
        .add_incident(&session, &incident_form("5", "Low", "Open"))
        .await
        .unwrap();
    let err = dashboard
        .add_incident(&session, &incident_form("5", "High", "Open"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Store(StoreError::Conflict(_))));
    assert_eq!(err.client_message(), "Incident 5 already exists.");
}

#[tokio::test]
async fn ticket_update_requires_hours() {
    let dashboard = memory_dashboard().await;
    let session = logged_in(&dashboard, "alice").await;
    dashboard
        .add_ticket(&session, &ticket_form("2001", "High", "Open", "2024-03-01"))
        .await
        .unwrap();

    let err = dashboard
        .update_ticket(&session, "2001", "Resolved", "")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Validation(ValidationError::MissingField("Resolution Time"))
    ));

    dashboard
        .update_ticket(&session, "2001", "resolved", "2.5")
        .await
        .unwrap();
    let tickets = dashboard.tickets(&session).await.unwrap();
    assert_eq!(tickets[0].status, "Resolved");
    assert_eq!(tickets[0].resolution_time_hours, Some(2.5));

    let err = dashboard
        .update_ticket(&session, "2001", "Escalated", "1")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Validation(ValidationError::InvalidChoice { field: "Status", .. })
    ));
}

#[tokio::test]
async fn ticket_summary_priority_table() {
    let dashboard = memory_dashboard().await;
    let session = logged_in(&dashboard, "alice").await;
    for (id, priority, status) in [
        ("1", "Low", "Open"),
        ("2", "Critical", "Resolved"),
        ("3", "Critical", "Open"),
        ("4", "Medium", "Closed"),
    ] {
        dashboard
            .add_ticket(&session, &ticket_form(id, priority, status, "2024-03-01"))
            .await
            .unwrap();
    }

    let summary = dashboard.ticket_summary(&session).await.unwrap();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.open, 2);
    assert_eq!(summary.daily_volume.len(), 1);
    assert_eq!(summary.daily_volume[0].1, 4);

    let table = &summary.priority_status;
    assert_eq!(table.statuses, ["Closed", "Open", "Resolved"]);
    let priorities: Vec<&str> = table.rows.iter().map(|r| r.priority.as_str()).collect();
    assert_eq!(priorities, ["Critical", "Medium", "Low"]);
    assert_eq!(table.rows[0].percentages, vec![0.0, 50.0, 50.0]);
}

#[tokio::test]
async fn dataset_uploader_defaults_to_session_user() {
    let dashboard = memory_dashboard().await;
    let session = logged_in(&dashboard, "alice").await;
    dashboard
        .add_dataset(&session, &dataset_form("1", "auth_logs", "1200"))
        .await
        .unwrap();
    dashboard
        .add_dataset(&session, &dataset_form("2", "vpn_logs", "300"))
        .await
        .unwrap();

    dashboard.rename_dataset(&session, "2", "vpn_sessions").await.unwrap();
    let err = dashboard
        .rename_dataset(&session, "3", "ghost")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Store(StoreError::NotFound { kind: "Dataset", id: 3 })
    ));

    let summary = dashboard.dataset_summary(&session).await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.total_rows, 1500);
    assert_eq!(summary.by_uploader, vec![("alice".to_string(), 2)]);
}

#[tokio::test]
async fn bad_form_input_leaves_tables_empty() {
    let dashboard = memory_dashboard().await;
    let session = logged_in(&dashboard, "alice").await;

    let err = dashboard
        .add_dataset(&session, &dataset_form("x1", "logs", "10"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Validation(ValidationError::InvalidNumber { field: "Dataset ID", .. })
    ));
    let err = dashboard
        .add_ticket(&session, &ticket_form("1", "Urgent", "Open", "2024-03-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Validation(_)));

    assert!(dashboard.datasets(&session).await.unwrap().is_empty());
    assert!(dashboard.tickets(&session).await.unwrap().is_empty());
}

#[tokio::test]
async fn padded_username_registers_and_logs_in() {
    let dashboard = memory_dashboard().await;
    let account = dashboard
        .register(&registration("alice ", "Secure123", None))
        .await
        .unwrap();
    assert_eq!(account.username, "alice");

    let mut session = Session::new();
    dashboard
        .login(&mut session, " alice", "Secure123")
        .await
        .unwrap();
    assert_eq!(session.username(), Some("alice"));
}

#[tokio::test]
async fn huge_row_counts_do_not_overflow_summary() {
    let dashboard = memory_dashboard().await;
    let session = logged_in(&dashboard, "alice").await;
    dashboard
        .add_dataset(&session, &dataset_form("1", "huge", &i64::MAX.to_string()))
        .await
        .unwrap();
    dashboard
        .add_dataset(&session, &dataset_form("2", "tiny", "1"))
        .await
        .unwrap();

    let summary = dashboard.dataset_summary(&session).await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.total_rows, i64::MAX);
}
