//! Raw form input and its conversion into records.
//!
//! Every field arrives as the text the user typed. Parsing is strict: ids and
//! counts must be whole numbers, choices must come from the option lists and
//! dates must be ISO formatted. Choices match case-insensitively and are
//! stored in their canonical spelling.

use crate::error::ValidationError;
use crate::storage::models::{
    INCIDENT_CATEGORIES, INCIDENT_STATUSES, PRIORITIES, SEVERITIES, TICKET_STATUSES,
};
use crate::storage::{Dataset, Incident, Ticket};
use chrono::{Local, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    /// Empty or unknown roles register as `user`.
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IncidentForm {
    pub incident_id: String,
    /// Defaults to the current local time.
    pub timestamp: Option<String>,
    pub severity: String,
    pub category: String,
    pub status: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct TicketForm {
    pub ticket_id: String,
    pub priority: String,
    pub description: String,
    pub status: String,
    pub assigned_to: String,
    /// Defaults to today.
    pub created_at: Option<String>,
    /// Fractional hours; blank leaves it unset.
    pub resolution_time_hours: String,
}

#[derive(Debug, Clone, Default)]
pub struct DatasetForm {
    pub dataset_id: String,
    pub name: String,
    pub rows: String,
    pub columns: String,
    /// Defaults to the logged-in user.
    pub uploaded_by: Option<String>,
    /// Defaults to today.
    pub upload_date: Option<String>,
}

pub(crate) fn required(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}

pub(crate) fn parse_id(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    let value = required(field, raw)?;
    value
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber { field, value })
}

fn parse_count(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    let value = required(field, raw)?;
    match value.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(ValidationError::InvalidNumber { field, value }),
    }
}

/// Blank input is `None`; anything else must be a finite, non-negative number.
pub(crate) fn parse_hours(raw: &str) -> Result<Option<f64>, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(h) if h.is_finite() && h >= 0.0 => Ok(Some(h)),
        _ => Err(ValidationError::InvalidHours {
            field: "Resolution Time",
            value: value.to_string(),
        }),
    }
}

pub(crate) fn choice(
    field: &'static str,
    raw: &str,
    options: &[&str],
) -> Result<String, ValidationError> {
    let value = required(field, raw)?;
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(&value))
        .map(|o| o.to_string())
        .ok_or(ValidationError::InvalidChoice { field, value })
}

fn date_or_today(field: &'static str, raw: Option<&str>) -> Result<String, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Local::now().date_naive().format("%Y-%m-%d").to_string()),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|d| d.format("%Y-%m-%d").to_string())
            .map_err(|_| ValidationError::InvalidDate {
                field,
                value: value.to_string(),
            }),
    }
}

fn timestamp_or_now(raw: Option<&str>) -> Result<String, ValidationError> {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    let Some(value) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Local::now().naive_local().format(FORMAT).to_string());
    };
    NaiveDateTime::parse_from_str(value, FORMAT)
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|ts| ts.format(FORMAT).to_string())
        .ok_or_else(|| ValidationError::InvalidDate {
            field: "Timestamp",
            value: value.to_string(),
        })
}

impl IncidentForm {
    pub fn parse(&self) -> Result<Incident, ValidationError> {
        let description = self.description.trim();
        Ok(Incident {
            incident_id: parse_id("Incident ID", &self.incident_id)?,
            timestamp: timestamp_or_now(self.timestamp.as_deref())?,
            severity: choice("Severity", &self.severity, &SEVERITIES)?,
            category: choice("Category", &self.category, &INCIDENT_CATEGORIES)?,
            status: choice("Status", &self.status, &INCIDENT_STATUSES)?,
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

impl TicketForm {
    pub fn parse(&self) -> Result<Ticket, ValidationError> {
        Ok(Ticket {
            ticket_id: parse_id("Ticket ID", &self.ticket_id)?,
            priority: choice("Priority", &self.priority, &PRIORITIES)?,
            description: required("Description", &self.description)?,
            status: choice("Status", &self.status, &TICKET_STATUSES)?,
            assigned_to: required("Assigned To", &self.assigned_to)?,
            created_at: date_or_today("Creation Date", self.created_at.as_deref())?,
            resolution_time_hours: parse_hours(&self.resolution_time_hours)?,
        })
    }
}

impl DatasetForm {
    /// `uploader` fills in a blank `uploaded_by`.
    pub fn parse(&self, uploader: &str) -> Result<Dataset, ValidationError> {
        let uploaded_by = match self.uploaded_by.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => required("Uploaded By", uploader)?,
        };
        Ok(Dataset {
            dataset_id: parse_id("Dataset ID", &self.dataset_id)?,
            name: required("Dataset Name", &self.name)?,
            rows: parse_count("Rows", &self.rows)?,
            columns: parse_count("Columns", &self.columns)?,
            uploaded_by,
            upload_date: date_or_today("Upload Date", self.upload_date.as_deref())?,
        })
    }
}
