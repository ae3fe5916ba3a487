//! Fixed classification tables mapping backend codes to badges and labels.
//!
//! Every lookup is case-insensitive and unknown codes fall back to
//! [`Badge::Secondary`] with the raw string as the label.

use serde::Serialize;

/// Visual emphasis of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Success,
    Warning,
    Danger,
    Info,
    Primary,
    Secondary,
}

impl Badge {
    /// CSS suffix, as in `badge-{suffix}`.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Info => "info",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.css_class())
    }
}

fn upper(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// LOW, MEDIUM, HIGH and CRITICAL risk levels (also used for case priority).
pub fn risk_level_badge(level: &str) -> Badge {
    match upper(level).as_str() {
        "LOW" => Badge::Success,
        "MEDIUM" => Badge::Warning,
        "HIGH" | "CRITICAL" => Badge::Danger,
        _ => Badge::Secondary,
    }
}

/// Transaction decision.
pub fn decision_badge(decision: &str) -> Badge {
    match upper(decision).as_str() {
        "APPROVED" => Badge::Success,
        "MANUAL_REVIEW" => Badge::Warning,
        "DECLINED" => Badge::Danger,
        _ => Badge::Secondary,
    }
}

/// Display label for a transaction decision; unknown codes come back raw.
pub fn decision_label(decision: &str) -> String {
    match upper(decision).as_str() {
        "APPROVED" => "APPROVED".to_owned(),
        "MANUAL_REVIEW" => "MANUAL REVIEW".to_owned(),
        "DECLINED" => "DECLINED".to_owned(),
        _ => decision.to_owned(),
    }
}

pub fn case_status_badge(status: &str) -> Badge {
    let status = upper(status);
    match status.as_str() {
        "NEW" => Badge::Info,
        "ASSIGNED" => Badge::Primary,
        "IN_PROGRESS" | "PENDING_REVIEW" | "PENDING_INFO" | "REOPENED" => Badge::Warning,
        "ESCALATED" => Badge::Danger,
        s if s.starts_with("CLOSED") => Badge::Success,
        _ => Badge::Secondary,
    }
}

pub fn sar_priority_badge(priority: &str) -> Badge {
    match upper(priority).as_str() {
        "URGENT" => Badge::Danger,
        "HIGH" => Badge::Warning,
        "MEDIUM" => Badge::Success,
        _ => Badge::Secondary,
    }
}

pub fn sar_status_badge(status: &str) -> Badge {
    match upper(status).as_str() {
        "SUBMITTED" => Badge::Primary,
        "ACKNOWLEDGED" => Badge::Success,
        _ => Badge::Secondary,
    }
}

/// ACTIVE/INACTIVE limit and rule status.
pub fn limit_status_badge(status: &str) -> Badge {
    if upper(status) == "ACTIVE" {
        Badge::Success
    } else {
        Badge::Secondary
    }
}

/// Underscores become spaces: `PENDING_REVIEW` → `PENDING REVIEW`.
pub fn status_label(status: &str) -> String {
    status.replace('_', " ")
}

/// Recent-activity entries are typed by the decision they record.
pub fn activity_badge(kind: &str) -> Badge {
    match kind.trim().to_ascii_lowercase().as_str() {
        "blocked" | "declined" => Badge::Danger,
        "review" | "manual_review" => Badge::Warning,
        "approved" => Badge::Success,
        _ => Badge::Info,
    }
}

pub fn activity_title(kind: &str) -> &'static str {
    match kind.trim().to_ascii_lowercase().as_str() {
        "blocked" | "declined" => "Transaction Blocked",
        "review" | "manual_review" => "Manual Review Required",
        "approved" => "Transaction Approved",
        _ => "Activity",
    }
}
