#![allow(dead_code)]

use async_trait::async_trait;
use intelplat::assistant::{ChatMessage, CompletionService};
use intelplat::auth::{self, Authenticator};
use intelplat::error::CompletionError;
use intelplat::prelude::*;
use intelplat::storage::{self, DynStorage};
use std::sync::{Arc, Mutex};

pub async fn memory_storage() -> DynStorage {
    storage::open("sqlite::memory:").await.unwrap()
}

pub async fn memory_dashboard() -> Dashboard {
    let accounts = auth::open("sqlite::memory:").await.unwrap();
    Dashboard::new(Authenticator::new(accounts), memory_storage().await)
}

pub fn registration(username: &str, password: &str, role: Option<&str>) -> RegistrationForm {
    RegistrationForm {
        username: username.into(),
        password: password.into(),
        confirm_password: password.into(),
        role: role.map(str::to_string),
    }
}

/// Register `username` with a valid password and return a logged-in session.
pub async fn logged_in(dashboard: &Dashboard, username: &str) -> Session {
    dashboard
        .register(&registration(username, "Secure123", None))
        .await
        .unwrap();
    let mut session = Session::new();
    dashboard
        .login(&mut session, username, "Secure123")
        .await
        .unwrap();
    session
}

pub fn incident_form(id: &str, severity: &str, status: &str) -> IncidentForm {
    IncidentForm {
        incident_id: id.into(),
        timestamp: Some("2024-11-05 09:30:00".into()),
        severity: severity.into(),
        category: "Phishing".into(),
        status: status.into(),
        description: "Credential harvesting email".into(),
    }
}

pub fn ticket_form(id: &str, priority: &str, status: &str, created_at: &str) -> TicketForm {
    TicketForm {
        ticket_id: id.into(),
        priority: priority.into(),
        description: "User cannot log in to the main application.".into(),
        status: status.into(),
        assigned_to: "IT_Support_A".into(),
        created_at: Some(created_at.into()),
        resolution_time_hours: String::new(),
    }
}

pub fn dataset_form(id: &str, name: &str, rows: &str) -> DatasetForm {
    DatasetForm {
        dataset_id: id.into(),
        name: name.into(),
        rows: rows.into(),
        columns: "6".into(),
        uploaded_by: None,
        upload_date: Some("2024-05-01".into()),
    }
}

/// Completion service that echoes a canned reply and records requests.
#[derive(Default)]
pub struct RecordingCompletion {
    pub reply: String,
    pub requests: Mutex<Vec<(String, Vec<ChatMessage>)>>,
}

impl RecordingCompletion {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            requests: Mutex::default(),
        })
    }

    pub fn requests(&self) -> Vec<(String, Vec<ChatMessage>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for RecordingCompletion {
    async fn complete(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        self.requests
            .lock()
            .unwrap()
            .push((system_instruction.to_string(), history.to_vec()));
        Ok(self.reply.clone())
    }
}
