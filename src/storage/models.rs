//! Record types for the three domain tables and the choices offered by the
//! dashboard forms.

use serde::{Deserialize, Serialize};

pub const SEVERITIES: [&str; 4] = ["Low", "Medium", "High", "Critical"];

pub const INCIDENT_CATEGORIES: [&str; 7] = [
    "Malware",
    "Phishing",
    "Denial of Service",
    "Insider Threat",
    "Data Breach",
    "Vulnerability Scan",
    "Other",
];

pub const INCIDENT_STATUSES: [&str; 4] = ["Open", "In Progress", "Closed", "Pending Review"];

pub const PRIORITIES: [&str; 4] = ["Low", "Medium", "High", "Critical"];

pub const TICKET_STATUSES: [&str; 4] = ["Open", "In Progress", "Resolved", "Closed"];

/// Default assignees offered by the ticket form.
pub const ASSIGNEES: [&str; 3] = ["IT_Support_A", "IT_Support_B", "IT_Support_C"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Incident {
    pub incident_id: i64,
    pub timestamp: String,
    pub severity: String,
    pub category: String,
    pub status: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    pub ticket_id: i64,
    pub priority: String,
    pub description: String,
    pub status: String,
    pub assigned_to: String,
    pub created_at: String,
    pub resolution_time_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dataset {
    pub dataset_id: i64,
    pub name: String,
    pub rows: i64,
    pub columns: i64,
    pub uploaded_by: String,
    pub upload_date: String,
}

/// Status check used by the summaries; case is ignored.
pub(crate) fn is_open(status: &str) -> bool {
    status.eq_ignore_ascii_case("open")
}
