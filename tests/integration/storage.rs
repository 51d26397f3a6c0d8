use crate::common::memory_storage;
use intelplat::error::StoreError;
use intelplat::storage::{Dataset, Incident, Storage, Ticket};

fn ticket(id: i64, status: &str) -> Ticket {
    Ticket {
        ticket_id: id,
        priority: "High".into(),
        description: "Printer offline".into(),
        status: status.into(),
        assigned_to: "IT_Support_C".into(),
        created_at: "2024-03-01".into(),
        resolution_time_hours: None,
    }
}

#[tokio::test]
async fn incidents_round_trip_in_id_order() {
    let storage = memory_storage().await;
    for id in [3, 1, 2] {
        storage
            .insert_incident(&Incident {
                incident_id: id,
                timestamp: format!("2024-01-0{id} 12:00:00"),
                severity: "Low".into(),
                category: "Malware".into(),
                status: "Open".into(),
                description: Some(format!("incident {id}")),
            })
            .await
            .unwrap();
    }
    let ids: Vec<i64> = storage
        .list_incidents()
        .await
        .unwrap()
        .iter()
        .map(|i| i.incident_id)
        .collect();
    assert_eq!(ids, [1, 2, 3]);

    let two = storage.get_incident(2).await.unwrap().unwrap();
    assert_eq!(two.description.as_deref(), Some("incident 2"));
    assert!(storage.get_incident(4).await.unwrap().is_none());
}

#[tokio::test]
async fn ticket_update_sets_status_and_hours() {
    let storage = memory_storage().await;
    storage.insert_ticket(&ticket(2001, "Open")).await.unwrap();

    assert!(
        storage
            .update_ticket_status(2001, "Resolved", Some(1.5))
            .await
            .unwrap()
    );
    let stored = storage.get_ticket(2001).await.unwrap().unwrap();
    assert_eq!(stored.status, "Resolved");
    assert_eq!(stored.resolution_time_hours, Some(1.5));

    assert!(!storage.update_ticket_status(9, "Closed", None).await.unwrap());
}

#[tokio::test]
async fn duplicate_ticket_id_is_a_conflict() {
    let storage = memory_storage().await;
    storage.insert_ticket(&ticket(1, "Open")).await.unwrap();
    let err = storage.insert_ticket(&ticket(1, "Closed")).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
    assert_eq!(storage.get_ticket(1).await.unwrap().unwrap().status, "Open");
}

#[tokio::test]
async fn deletes_report_whether_a_row_went_away() {
    let storage = memory_storage().await;
    storage.insert_ticket(&ticket(1, "Open")).await.unwrap();
    assert!(storage.delete_ticket(1).await.unwrap());
    assert!(!storage.delete_ticket(1).await.unwrap());
    assert!(!storage.delete_incident(1).await.unwrap());
    assert!(!storage.delete_dataset(1).await.unwrap());
}

#[tokio::test]
async fn dataset_rename() {
    let storage = memory_storage().await;
    storage
        .insert_dataset(&Dataset {
            dataset_id: 10,
            name: "raw".into(),
            rows: 0,
            columns: 0,
            uploaded_by: "alice".into(),
            upload_date: "2024-05-01".into(),
        })
        .await
        .unwrap();
    assert!(storage.update_dataset_name(10, "cleaned").await.unwrap());
    assert!(!storage.update_dataset_name(11, "cleaned").await.unwrap());
    assert_eq!(storage.get_dataset(10).await.unwrap().unwrap().name, "cleaned");
}

#[tokio::test]
async fn unknown_backend_is_rejected() {
    let Err(err) = intelplat::storage::open("postgres://localhost/db").await else {
        panic!("expected an error");
    };
    assert!(matches!(err, StoreError::Unavailable(_)));
}
