//! Investigation cases and their detail projections.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::time::Timestamp;

/// Lifecycle status of a case.
///
/// Unknown codes are preserved in [`CaseStatus::Other`] so new backend
/// states still render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CaseStatus {
    #[default]
    New,
    Assigned,
    InProgress,
    PendingReview,
    PendingInfo,
    Escalated,
    Reopened,
    ClosedCleared,
    ClosedSarFiled,
    ClosedBlocked,
    ClosedRejected,
    Other(String),
}

impl CaseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::PendingReview => "PENDING_REVIEW",
            Self::PendingInfo => "PENDING_INFO",
            Self::Escalated => "ESCALATED",
            Self::Reopened => "REOPENED",
            Self::ClosedCleared => "CLOSED_CLEARED",
            Self::ClosedSarFiled => "CLOSED_SAR_FILED",
            Self::ClosedBlocked => "CLOSED_BLOCKED",
            Self::ClosedRejected => "CLOSED_REJECTED",
            Self::Other(raw) => raw,
        }
    }

    /// Any terminal `CLOSED_*` status.
    pub fn is_closed(&self) -> bool {
        match self {
            Self::ClosedCleared
            | Self::ClosedSarFiled
            | Self::ClosedBlocked
            | Self::ClosedRejected => true,
            Self::Other(raw) => raw.to_ascii_uppercase().starts_with("CLOSED"),
            _ => false,
        }
    }

    /// Counted as open on the stats widget.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::New | Self::Assigned | Self::InProgress)
    }
}

impl From<String> for CaseStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "NEW" => Self::New,
            "ASSIGNED" => Self::Assigned,
            "IN_PROGRESS" => Self::InProgress,
            "PENDING_REVIEW" => Self::PendingReview,
            "PENDING_INFO" => Self::PendingInfo,
            "ESCALATED" => Self::Escalated,
            "REOPENED" => Self::Reopened,
            "CLOSED_CLEARED" => Self::ClosedCleared,
            "CLOSED_SAR_FILED" => Self::ClosedSarFiled,
            "CLOSED_BLOCKED" => Self::ClosedBlocked,
            "CLOSED_REJECTED" => Self::ClosedRejected,
            _ => Self::Other(raw),
        }
    }
}

impl From<CaseStatus> for String {
    fn from(status: CaseStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A compliance case as returned by `compliance/cases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: i64,
    #[serde(default)]
    pub case_reference: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub sla_deadline: Option<Timestamp>,
    #[serde(default)]
    pub days_open: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub escalated: bool,
}

impl Case {
    /// `caseReference`, or `CASE-{id}` when the backend has none.
    pub fn reference(&self) -> String {
        self.case_reference
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| format!("CASE-{}", self.id))
    }

    pub fn priority_or_default(&self) -> &str {
        self.priority.as_deref().unwrap_or("MEDIUM")
    }

    pub fn assignee(&self) -> Option<&str> {
        self.assigned_to.as_ref().and_then(|u| u.username.as_deref())
    }

    pub fn is_overdue(&self, now: Timestamp) -> bool {
        self.sla_deadline
            .is_some_and(|deadline| is_overdue(deadline, self.status.is_closed(), now))
    }
}

/// `deadline` is strictly in the past and the item is still open.
///
/// A deadline equal to `now` is not overdue.
pub fn is_overdue(deadline: Timestamp, closed: bool, now: Timestamp) -> bool {
    deadline < now && !closed
}

/// Counts shown on the case stats widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaseStats {
    pub open: usize,
    pub overdue: usize,
    pub escalated: usize,
    pub unassigned: usize,
}

impl CaseStats {
    pub fn compute(cases: &[Case], now: Timestamp) -> Self {
        let mut stats = Self::default();
        for case in cases {
            if case.status.is_open() {
                stats.open += 1;
            }
            if case.is_overdue(now) {
                stats.overdue += 1;
            }
            if case.escalated || case.status == CaseStatus::Escalated {
                stats.escalated += 1;
            }
            if case.assigned_to.is_none() {
                stats.unassigned += 1;
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseTimeline {
    #[serde(default)]
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<Timestamp>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Events keyed by calendar day (newest day first), newest event first
/// within each day. Events without a timestamp are dropped.
pub fn group_events_by_day(events: &[TimelineEvent]) -> Vec<(NaiveDate, Vec<&TimelineEvent>)> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&TimelineEvent>> = BTreeMap::new();
    for event in events {
        if let Some(ts) = event.timestamp {
            grouped.entry(ts.date()).or_default().push(event);
        }
    }
    grouped
        .into_iter()
        .rev()
        .map(|(day, mut events)| {
            events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            (day, events)
        })
        .collect()
}

/// One page of `cases/{id}/activities`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPage {
    #[serde(default)]
    pub content: Vec<CaseActivity>,
    #[serde(default)]
    pub total_elements: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseActivity {
    #[serde(default)]
    pub activity_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub performed_by: Option<UserRef>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub performed_at: Option<Timestamp>,
}

impl CaseActivity {
    pub fn actor(&self) -> &str {
        self.performed_by
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .unwrap_or("System")
    }

    pub fn summary(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.activity_type)
    }
}

/// Entity network around a case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkGraph {
    #[serde(default)]
    pub nodes: Vec<NetworkNode>,
    #[serde(default)]
    pub edges: Vec<NetworkEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    #[serde(deserialize_with = "lenient::string", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    #[serde(deserialize_with = "lenient::string", default)]
    pub from: Option<String>,
    #[serde(deserialize_with = "lenient::string", default)]
    pub to: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub edge_type: String,
}

impl NetworkGraph {
    /// Node counts per type, sorted by type name.
    pub fn node_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(type_key(&node.node_type)).or_default() += 1;
        }
        counts
    }

    pub fn edge_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for edge in &self.edges {
            *counts.entry(type_key(&edge.edge_type)).or_default() += 1;
        }
        counts
    }
}

fn type_key(kind: &str) -> &str {
    if kind.is_empty() { "UNKNOWN" } else { kind }
}
