//! Water report model and related payloads

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

text_enum! {
    /// Kind of water issue being reported
    IssueType: "issue_type" {
        Leakage => "LEAKAGE",
        WaterQualityProblem => "WATER_QUALITY_PROBLEM",
        Other => "OTHER",
    }
}

text_enum! {
    /// How urgent the reported issue is
    Severity: "severity" {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Critical => "CRITICAL",
    }
}

text_enum! {
    /// Report lifecycle stage
    ReportStatus: "status" {
        Pending => "PENDING",
        InProgress => "IN_PROGRESS",
        Resolved => "RESOLVED",
    }
}

/// Owner details joined onto every report read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportOwner {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

/// Water report entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user: ReportOwner,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub description: String,
    pub location_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_base64_data: Vec<String>,
    pub status: ReportStatus,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored update and the status the report had before it
#[derive(Debug, Clone, PartialEq)]
pub struct ReportUpdate {
    pub report: Report,
    pub previous_status: ReportStatus,
}

/// Validated report creation payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub user_id: Uuid,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub description: String,
    pub location_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_base64_data: Vec<String>,
}

/// Mutable fields of a report. `assigned_to: Some(None)` clears the assignee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportChanges {
    pub status: Option<ReportStatus>,
    pub assigned_to: Option<Option<String>>,
}

impl ReportChanges {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assigned_to.is_none()
    }
}

/// Which reports a listing may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    All,
    OwnedBy(Uuid),
}

impl ReportScope {
    pub fn includes(&self, report: &Report) -> bool {
        match self {
            ReportScope::All => true,
            ReportScope::OwnedBy(user_id) => report.user_id == *user_id,
        }
    }
}

/// Aggregate view for the admin dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_reports: i64,
    pub status_counts: BTreeMap<String, i64>,
    pub severity_counts: BTreeMap<String, i64>,
    pub issue_type_counts: BTreeMap<String, i64>,
    pub recent_reports: Vec<Report>,
}

/// Builds a count table holding every variant, zero when absent from `rows`.
pub fn tally<T: std::fmt::Display>(
    variants: &[T],
    rows: impl IntoIterator<Item = (String, i64)>,
) -> BTreeMap<String, i64> {
    let mut counts: BTreeMap<String, i64> =
        variants.iter().map(|v| (v.to_string(), 0)).collect();
    for (key, count) in rows {
        *counts.entry(key).or_insert(0) += count;
    }
    counts
}

/// Request for report creation
#[derive(Debug, Default, Deserialize)]
pub struct CreateReportRequest {
    pub issue_type: Option<String>,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub location_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_base64_data: Option<Vec<String>>,
}

/// Request for report update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReportRequest {
    pub status: Option<String>,
    /// Absent leaves the assignee alone, `null` clears it
    #[serde(default, deserialize_with = "present")]
    pub assigned_to: Option<Option<String>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
