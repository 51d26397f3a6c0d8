//! Dashboard operations: the pages' buttons, minus the rendering.
//!
//! Each operation takes the caller's [`Session`] and the raw form text, and
//! performs at most one store call after validation.

use crate::assistant::{CompletionService, Conversation, DynCompletion, prompts};
use crate::auth::{Account, Authenticator, Role};
use crate::error::{CompletionError, PlatformError, StoreError, ValidationError};
use crate::session::Session;
use crate::storage::models::{INCIDENT_STATUSES, TICKET_STATUSES};
use crate::storage::summary::{
    DatasetSummary, IncidentSummary, PriorityStatusTable, TicketSummary, datasets_csv,
};
use crate::storage::{Dataset, DynStorage, Incident, Ticket};
use chrono::{Local, NaiveDate};

pub mod forms;

pub use forms::{DatasetForm, IncidentForm, RegistrationForm, TicketForm};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Clone)]
pub struct Dashboard {
    auth: Authenticator,
    storage: DynStorage,
    assistant: Option<DynCompletion>,
}

impl Dashboard {
    pub fn new(auth: Authenticator, storage: DynStorage) -> Self {
        Self {
            auth,
            storage,
            assistant: None,
        }
    }

    #[must_use]
    pub fn with_assistant(mut self, assistant: DynCompletion) -> Self {
        self.assistant = Some(assistant);
        self
    }

    pub fn storage(&self) -> &DynStorage {
        &self.storage
    }

    fn assistant(&self) -> Result<&dyn CompletionService, CompletionError> {
        self.assistant
            .as_deref()
            .ok_or(CompletionError::NotConfigured)
    }

    // Accounts

    #[tracing::instrument(skip_all, fields(username = %form.username))]
    pub async fn register(&self, form: &RegistrationForm) -> Result<Account, PlatformError> {
        // Surrounding blanks are dropped; inner spaces still fail validation.
        let username = form.username.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingField("Username").into());
        }
        if form.password.is_empty() {
            return Err(ValidationError::MissingField("Password").into());
        }
        if form.password != form.confirm_password {
            return Err(ValidationError::PasswordMismatch.into());
        }
        let role = Role::parse_or_default(form.role.as_deref());
        self.auth.register(username, &form.password, role).await
    }

    pub async fn login(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<(), PlatformError> {
        let account = self.auth.login(username.trim(), password).await?;
        session.authenticate(&account);
        Ok(())
    }

    pub fn logout(&self, session: &mut Session) {
        if let Some(user) = session.username() {
            tracing::info!(user, "Logged out");
        }
        session.logout();
    }

    // Incidents

    pub async fn incidents(&self, session: &Session) -> Result<Vec<Incident>, PlatformError> {
        session.require_login()?;
        Ok(self.storage.list_incidents().await?)
    }

    pub async fn add_incident(
        &self,
        session: &Session,
        form: &IncidentForm,
    ) -> Result<Incident, PlatformError> {
        let user = session.require_login()?;
        let incident = form.parse()?;
        self.storage.insert_incident(&incident).await?;
        tracing::info!(user, id = incident.incident_id, "Incident added");
        Ok(incident)
    }

    pub async fn update_incident_status(
        &self,
        session: &Session,
        id: &str,
        status: &str,
    ) -> Result<(), PlatformError> {
        let user = session.require_login()?;
        let id = forms::parse_id("Incident ID", id)?;
        let status = forms::choice("Status", status, &INCIDENT_STATUSES)?;
        if !self.storage.update_incident_status(id, &status).await? {
            return Err(StoreError::NotFound { kind: "Incident", id }.into());
        }
        tracing::info!(user, id, status = %status, "Incident status updated");
        Ok(())
    }

    pub async fn delete_incident(&self, session: &Session, id: &str) -> Result<(), PlatformError> {
        let user = session.require_login()?;
        let id = forms::parse_id("Incident ID", id)?;
        if !self.storage.delete_incident(id).await? {
            return Err(StoreError::NotFound { kind: "Incident", id }.into());
        }
        tracing::info!(user, id, "Incident deleted");
        Ok(())
    }

    pub async fn incident_summary(&self, session: &Session) -> Result<IncidentSummary, PlatformError> {
        let incidents = self.incidents(session).await?;
        Ok(IncidentSummary::from_records(&incidents))
    }

    // Tickets

    pub async fn tickets(&self, session: &Session) -> Result<Vec<Ticket>, PlatformError> {
        session.require_login()?;
        Ok(self.storage.list_tickets().await?)
    }

    pub async fn add_ticket(
        &self,
        session: &Session,
        form: &TicketForm,
    ) -> Result<Ticket, PlatformError> {
        let user = session.require_login()?;
        let ticket = form.parse()?;
        self.storage.insert_ticket(&ticket).await?;
        tracing::info!(user, id = ticket.ticket_id, "Ticket added");
        Ok(ticket)
    }

    /// Set a ticket's status and resolution time. Both are required.
    pub async fn update_ticket(
        &self,
        session: &Session,
        id: &str,
        status: &str,
        resolution_time_hours: &str,
    ) -> Result<(), PlatformError> {
        let user = session.require_login()?;
        let id = forms::parse_id("Ticket ID", id)?;
        let status = forms::choice("Status", status, &TICKET_STATUSES)?;
        let hours = forms::parse_hours(resolution_time_hours)?
            .ok_or(ValidationError::MissingField("Resolution Time"))?;
        if !self
            .storage
            .update_ticket_status(id, &status, Some(hours))
            .await?
        {
            return Err(StoreError::NotFound { kind: "Ticket", id }.into());
        }
        tracing::info!(user, id, status = %status, "Ticket updated");
        Ok(())
    }

    pub async fn delete_ticket(&self, session: &Session, id: &str) -> Result<(), PlatformError> {
        let user = session.require_login()?;
        let id = forms::parse_id("Ticket ID", id)?;
        if !self.storage.delete_ticket(id).await? {
            return Err(StoreError::NotFound { kind: "Ticket", id }.into());
        }
        tracing::info!(user, id, "Ticket deleted");
        Ok(())
    }

    pub async fn ticket_summary(&self, session: &Session) -> Result<TicketSummary, PlatformError> {
        let tickets = self.tickets(session).await?;
        Ok(TicketSummary::from_records(&tickets, today()))
    }

    // Datasets

    pub async fn datasets(&self, session: &Session) -> Result<Vec<Dataset>, PlatformError> {
        session.require_login()?;
        Ok(self.storage.list_datasets().await?)
    }

    pub async fn add_dataset(
        &self,
        session: &Session,
        form: &DatasetForm,
    ) -> Result<Dataset, PlatformError> {
        let user = session.require_login()?;
        let dataset = form.parse(user)?;
        self.storage.insert_dataset(&dataset).await?;
        tracing::info!(user, id = dataset.dataset_id, "Dataset added");
        Ok(dataset)
    }

    pub async fn rename_dataset(
        &self,
        session: &Session,
        id: &str,
        name: &str,
    ) -> Result<(), PlatformError> {
        let user = session.require_login()?;
        let id = forms::parse_id("Dataset ID", id)?;
        let name = forms::required("Dataset Name", name)?;
        if !self.storage.update_dataset_name(id, &name).await? {
            return Err(StoreError::NotFound { kind: "Dataset", id }.into());
        }
        tracing::info!(user, id, "Dataset renamed");
        Ok(())
    }

    pub async fn delete_dataset(&self, session: &Session, id: &str) -> Result<(), PlatformError> {
        let user = session.require_login()?;
        let id = forms::parse_id("Dataset ID", id)?;
        if !self.storage.delete_dataset(id).await? {
            return Err(StoreError::NotFound { kind: "Dataset", id }.into());
        }
        tracing::info!(user, id, "Dataset deleted");
        Ok(())
    }

    pub async fn dataset_summary(&self, session: &Session) -> Result<DatasetSummary, PlatformError> {
        let datasets = self.datasets(session).await?;
        Ok(DatasetSummary::from_records(&datasets, today()))
    }

    // Assistant

    async fn run_analysis(&self, analysis: prompts::AnalysisPrompt) -> Result<String, PlatformError> {
        let assistant = self.assistant()?;
        let history = [crate::assistant::ChatMessage::user(analysis.prompt)];
        Ok(assistant
            .complete(analysis.system_instruction, &history)
            .await?)
    }

    #[tracing::instrument(skip(self, session))]
    pub async fn analyze_incident(&self, session: &Session, id: &str) -> Result<String, PlatformError> {
        session.require_login()?;
        let id = forms::parse_id("Incident ID", id)?;
        self.assistant()?;
        let incident = self
            .storage
            .get_incident(id)
            .await?
            .ok_or(StoreError::NotFound { kind: "Incident", id })?;
        self.run_analysis(prompts::incident_analysis(&incident)).await
    }

    #[tracing::instrument(skip_all)]
    pub async fn analyze_tickets(&self, session: &Session) -> Result<String, PlatformError> {
        session.require_login()?;
        self.assistant()?;
        let tickets = self.storage.list_tickets().await?;
        if tickets.is_empty() {
            return Err(ValidationError::NoData("tickets").into());
        }
        let table = PriorityStatusTable::from_records(&tickets);
        self.run_analysis(prompts::ticket_correlation_analysis(&table))
            .await
    }

    #[tracing::instrument(skip_all)]
    pub async fn analyze_datasets(&self, session: &Session) -> Result<String, PlatformError> {
        session.require_login()?;
        self.assistant()?;
        let datasets = self.storage.list_datasets().await?;
        if datasets.is_empty() {
            return Err(ValidationError::NoData("datasets").into());
        }
        self.run_analysis(prompts::dataset_analysis(&datasets_csv(&datasets)))
            .await
    }

    /// One chat turn for a logged-in user.
    pub async fn chat(
        &self,
        session: &Session,
        conversation: &mut Conversation,
        prompt: &str,
    ) -> Result<String, PlatformError> {
        session.require_login()?;
        let prompt = forms::required("Message", prompt)?;
        let assistant = self.assistant()?;
        Ok(conversation.ask(assistant, &prompt).await?)
    }
}
