use crate::common::{
    RecordingCompletion, dataset_form, incident_form, logged_in, memory_dashboard, ticket_form,
};
use intelplat::assistant::{ChatRole, Conversation, Persona, prompts};
use intelplat::error::{AuthError, CompletionError, PlatformError};
use intelplat::prelude::*;

#[tokio::test]
async fn ticket_analysis_sends_percentage_csv() {
    let service = RecordingCompletion::new("## 1. Key Operational Insights");
    let dashboard = memory_dashboard().await.with_assistant(service.clone());
    let session = logged_in(&dashboard, "alice").await;
    dashboard
        .add_ticket(&session, &ticket_form("1", "High", "Open", "2024-03-01"))
        .await
        .unwrap();

    let text = dashboard.analyze_tickets(&session).await.unwrap();
    assert_eq!(text, "## 1. Key Operational Insights");

    let requests = service.requests();
    assert_eq!(requests.len(), 1);
    let (system, history) = &requests[0];
    assert_eq!(system, prompts::TICKET_ANALYST);
    assert!(
        history[0]
            .text
            .contains("START DATA\npriority,Open\nHigh,100.0\nEND DATA")
    );
}

#[tokio::test]
async fn dataset_analysis_sends_metadata_csv() {
    let service = RecordingCompletion::new("ok");
    let dashboard = memory_dashboard().await.with_assistant(service.clone());
    let session = logged_in(&dashboard, "alice").await;
    dashboard
        .add_dataset(&session, &dataset_form("1", "auth_logs", "1200"))
        .await
        .unwrap();

    dashboard.analyze_datasets(&session).await.unwrap();
    let requests = service.requests();
    let (system, history) = &requests[0];
    assert_eq!(system, prompts::DATASET_ANALYST);
    assert!(history[0].text.contains("1,auth_logs,1200,6,alice,2024-05-01"));
}

#[tokio::test]
async fn analysis_requires_login() {
    let service = RecordingCompletion::new("ok");
    let dashboard = memory_dashboard().await.with_assistant(service.clone());
    let session = logged_in(&dashboard, "alice").await;
    dashboard
        .add_incident(&session, &incident_form("1", "High", "Open"))
        .await
        .unwrap();

    let err = dashboard
        .analyze_incident(&Session::new(), "1")
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Auth(AuthError::Required)));
    assert!(service.requests().is_empty());
}

#[tokio::test]
async fn chat_without_assistant_is_not_configured() {
    let dashboard = memory_dashboard().await;
    let session = logged_in(&dashboard, "alice").await;
    let mut conversation = Conversation::new(Persona::ItOperations);
    let err = dashboard
        .chat(&session, &mut conversation, "Why is the VPN slow?")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlatformError::Completion(CompletionError::NotConfigured)
    ));
    assert!(conversation.history().is_empty());
}

#[tokio::test]
async fn chat_sends_persona_and_full_history() {
    let service = RecordingCompletion::new("Check the MTU.");
    let dashboard = memory_dashboard().await.with_assistant(service.clone());
    let session = logged_in(&dashboard, "alice").await;
    let mut conversation = Conversation::new(Persona::ItOperations);

    dashboard
        .chat(&session, &mut conversation, "Why is the VPN slow?")
        .await
        .unwrap();
    dashboard
        .chat(&session, &mut conversation, "Still slow.")
        .await
        .unwrap();

    let requests = service.requests();
    assert_eq!(requests[1].0, Persona::ItOperations.system_instruction());
    let roles: Vec<ChatRole> = requests[1].1.iter().map(|m| m.role).collect();
    assert_eq!(roles, [ChatRole::User, ChatRole::Model, ChatRole::User]);
    assert_eq!(conversation.history().len(), 4);
}

#[tokio::test]
async fn cleared_conversation_starts_fresh() {
    let service = RecordingCompletion::new("Rotate the keys.");
    let dashboard = memory_dashboard().await.with_assistant(service.clone());
    let session = logged_in(&dashboard, "alice").await;
    let mut conversation = Conversation::new(Persona::Cybersecurity);

    dashboard
        .chat(&session, &mut conversation, "A key leaked.")
        .await
        .unwrap();
    conversation.clear();
    assert!(conversation.history().is_empty());
    assert_eq!(conversation.persona(), Persona::Cybersecurity);

    dashboard
        .chat(&session, &mut conversation, "New question.")
        .await
        .unwrap();
    let requests = service.requests();
    assert_eq!(requests[1].1.len(), 1);
    assert_eq!(requests[1].1[0].text, "New question.");
}
