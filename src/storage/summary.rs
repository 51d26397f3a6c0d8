//! Dashboard metrics computed from the record tables, and CSV snapshots used
//! as analysis prompt input.

use super::models::{PRIORITIES, SEVERITIES, is_open};
use super::{Dataset, Incident, Ticket};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Row order of the priority/status table.
pub const PRIORITY_ORDER: [&str; 4] = ["Critical", "High", "Medium", "Low"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentSummary {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    /// Most frequent first.
    pub by_category: Vec<(String, usize)>,
    /// One entry per known severity, in severity order.
    pub by_severity: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketSummary {
    pub total: usize,
    pub open: usize,
    pub total_resolution_hours: f64,
    pub created_today: usize,
    pub by_status: Vec<(String, usize)>,
    pub by_priority: Vec<(String, usize)>,
    /// Tickets per creation day, oldest first.
    pub daily_volume: Vec<(NaiveDate, usize)>,
    pub priority_status: PriorityStatusTable,
}

/// Percentage of each priority's tickets sitting in each status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityStatusTable {
    pub statuses: Vec<String>,
    pub rows: Vec<PriorityStatusRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityStatusRow {
    pub priority: String,
    /// Aligned with [`PriorityStatusTable::statuses`].
    pub percentages: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total: usize,
    pub total_rows: i64,
    pub uploaded_today: usize,
    pub by_uploader: Vec<(String, usize)>,
}

/// Leading `YYYY-MM-DD` of a stored date or timestamp.
fn parse_day(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Count values, most frequent first; ties keep first-seen order.
fn value_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert_with(|| {
            order.push(value);
            0
        });
        *count += 1;
    }
    let mut out: Vec<(String, usize)> = order
        .into_iter()
        .map(|v| (v.to_string(), counts[v]))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Counts for a fixed list of labels, zero-filled.
fn counts_in_order<'a>(
    labels: &[&str],
    values: impl Iterator<Item = &'a str>,
) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    labels
        .iter()
        .map(|l| (l.to_string(), counts.get(l).copied().unwrap_or(0)))
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl IncidentSummary {
    pub fn from_records(incidents: &[Incident]) -> Self {
        let total = incidents.len();
        let open = incidents.iter().filter(|i| is_open(&i.status)).count();
        Self {
            total,
            open,
            closed: total - open,
            by_category: value_counts(incidents.iter().map(|i| i.category.as_str())),
            by_severity: counts_in_order(&SEVERITIES, incidents.iter().map(|i| i.severity.as_str())),
        }
    }
}

impl PriorityStatusTable {
    pub fn from_records(tickets: &[Ticket]) -> Self {
        let statuses: BTreeSet<&str> = tickets.iter().map(|t| t.status.as_str()).collect();
        let statuses: Vec<String> = statuses.into_iter().map(str::to_string).collect();

        let mut per_priority: BTreeMap<&str, HashMap<&str, usize>> = BTreeMap::new();
        for ticket in tickets {
            *per_priority
                .entry(ticket.priority.as_str())
                .or_default()
                .entry(ticket.status.as_str())
                .or_default() += 1;
        }

        // Known priorities in urgency order, anything else alphabetically after.
        let mut priorities: Vec<&str> = PRIORITY_ORDER
            .iter()
            .copied()
            .filter(|p| per_priority.contains_key(p))
            .collect();
        priorities.extend(
            per_priority
                .keys()
                .copied()
                .filter(|p| !PRIORITY_ORDER.contains(p)),
        );

        let rows = priorities
            .into_iter()
            .map(|priority| {
                let counts = &per_priority[priority];
                let row_total: usize = counts.values().sum();
                let percentages = statuses
                    .iter()
                    .map(|s| {
                        let n = counts.get(s.as_str()).copied().unwrap_or(0);
                        round1(n as f64 * 100.0 / row_total as f64)
                    })
                    .collect();
                PriorityStatusRow {
                    priority: priority.to_string(),
                    percentages,
                }
            })
            .collect();

        Self { statuses, rows }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from("priority");
        for status in &self.statuses {
            out.push(',');
            out.push_str(&csv_field(status));
        }
        out.push('\n');
        for row in &self.rows {
            out.push_str(&csv_field(&row.priority));
            for pct in &row.percentages {
                out.push(',');
                out.push_str(&format!("{pct:.1}"));
            }
            out.push('\n');
        }
        out
    }
}

impl TicketSummary {
    pub fn from_records(tickets: &[Ticket], today: NaiveDate) -> Self {
        let mut daily: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for day in tickets.iter().filter_map(|t| parse_day(&t.created_at)) {
            *daily.entry(day).or_default() += 1;
        }

        Self {
            total: tickets.len(),
            open: tickets.iter().filter(|t| is_open(&t.status)).count(),
            total_resolution_hours: tickets.iter().filter_map(|t| t.resolution_time_hours).sum(),
            created_today: daily.get(&today).copied().unwrap_or(0),
            by_status: value_counts(tickets.iter().map(|t| t.status.as_str())),
            by_priority: counts_in_order(&PRIORITIES, tickets.iter().map(|t| t.priority.as_str())),
            daily_volume: daily.into_iter().collect(),
            priority_status: PriorityStatusTable::from_records(tickets),
        }
    }
}

impl DatasetSummary {
    pub fn from_records(datasets: &[Dataset], today: NaiveDate) -> Self {
        Self {
            total: datasets.len(),
            total_rows: datasets
                .iter()
                .fold(0i64, |acc, d| acc.saturating_add(d.rows)),
            uploaded_today: datasets
                .iter()
                .filter(|d| parse_day(&d.upload_date) == Some(today))
                .count(),
            by_uploader: value_counts(datasets.iter().map(|d| d.uploaded_by.as_str())),
        }
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render dataset metadata as CSV with a header row.
pub fn datasets_csv(datasets: &[Dataset]) -> String {
    let mut out = String::from("dataset_id,name,rows,columns,uploaded_by,upload_date\n");
    for d in datasets {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            d.dataset_id,
            csv_field(&d.name),
            d.rows,
            d.columns,
            csv_field(&d.uploaded_by),
            csv_field(&d.upload_date),
        ));
    }
    out
}
