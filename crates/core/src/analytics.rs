//! Risk analytics: heatmaps, case trends and false-positive rate.

use std::collections::BTreeMap;

use chrono::{DateTime, Months, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::risk::RiskLevel;

/// Which population a heatmap aggregates over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapKind {
    #[default]
    Customer,
    Merchant,
}

impl HeatmapKind {
    /// Path segment under `analytics/risk/heatmap/`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Merchant => "merchant",
        }
    }

    /// CSV header for the id column.
    pub fn id_label(self) -> &'static str {
        match self {
            Self::Customer => "customerId",
            Self::Merchant => "merchantId",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Customer => "Customer Risk Heatmap",
            Self::Merchant => "Merchant Risk Heatmap",
        }
    }

    pub fn column_label(self) -> &'static str {
        match self {
            Self::Customer => "Customer ID",
            Self::Merchant => "Merchant ID",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "customer" => Some(Self::Customer),
            "merchant" => Some(Self::Merchant),
            _ => None,
        }
    }
}

impl std::fmt::Display for HeatmapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapEntry {
    #[serde(default)]
    pub case_count: u64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub average_risk_score: Option<f64>,
}

impl HeatmapEntry {
    /// Average score, non-finite or absent as zero.
    pub fn score(&self) -> f64 {
        self.average_risk_score
            .filter(|s| s.is_finite())
            .unwrap_or(0.0)
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score())
    }
}

/// A heatmap response tagged with the population it was requested for.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskHeatmap {
    pub kind: HeatmapKind,
    pub entries: BTreeMap<String, HeatmapEntry>,
}

impl RiskHeatmap {
    pub fn new(kind: HeatmapKind, entries: BTreeMap<String, HeatmapEntry>) -> Self {
        Self { kind, entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskTrends {
    #[serde(default)]
    pub weekly_trends: BTreeMap<String, f64>,
    #[serde(default)]
    pub trend_direction: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FalsePositiveRate {
    #[serde(default, deserialize_with = "lenient::number")]
    pub false_positive_rate: Option<f64>,
}

impl FalsePositiveRate {
    /// Two decimals and a percent sign, `N/A` when absent.
    pub fn display(&self) -> String {
        self.false_positive_rate
            .map_or_else(|| "N/A".to_owned(), |r| format!("{r:.2}%"))
    }
}

/// Inclusive reporting window sent as `startDate`/`endDate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Longest analytics window accepted, in days.
pub const MAX_PERIOD_DAYS: u32 = 3650;

impl DateRange {
    /// The `days` ending at `now`, or `None` when the start falls outside
    /// the representable date range.
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Option<Self> {
        let start = TimeDelta::try_days(i64::from(days)).and_then(|d| now.checked_sub_signed(d))?;
        Some(Self { start, end: now })
    }

    /// Same day-of-month one calendar month back (clamped at month end).
    pub fn last_month(now: DateTime<Utc>) -> Self {
        Self {
            start: now.checked_sub_months(Months::new(1)).unwrap_or(now),
            end: now,
        }
    }

    /// ISO-8601 with milliseconds and `Z`.
    pub fn query(&self) -> Vec<(String, String)> {
        vec![
            (
                "startDate".to_owned(),
                self.start.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            (
                "endDate".to_owned(),
                self.end.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn heatmap_entries_from_object() {
        let entries: BTreeMap<String, HeatmapEntry> = serde_json::from_str(
            r#"{"123":{"caseCount":5,"averageRiskScore":0.82},"77":{"caseCount":1,"averageRiskScore":"0.4"}}"#,
        )
        .unwrap();
        assert_eq!(entries["123"].risk_level(), RiskLevel::High);
        assert_eq!(entries["77"].risk_level(), RiskLevel::Low);
    }

    #[test]
    fn missing_score_is_low() {
        let entry: HeatmapEntry = serde_json::from_str(r#"{"caseCount":2}"#).unwrap();
        assert!(entry.score().abs() < f64::EPSILON);
        assert_eq!(entry.risk_level(), RiskLevel::Low);
    }

    #[test]
    fn date_range_query_is_iso() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let q = DateRange::last_days(30, now).unwrap().query();
        assert_eq!(q[0], ("startDate".into(), "2024-03-01T12:00:00.000Z".into()));
        assert_eq!(q[1], ("endDate".into(), "2024-03-31T12:00:00.000Z".into()));
        let month = DateRange::last_month(now);
        assert_eq!(month.start, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
    }

    #[test]
    fn window_past_the_calendar_is_none() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert!(DateRange::last_days(u32::MAX, now).is_none());
        assert!(DateRange::last_days(MAX_PERIOD_DAYS, now).is_some());
        assert!(DateRange::last_days(1, DateTime::<Utc>::MIN_UTC).is_none());
    }

    #[test]
    fn kinds() {
        assert_eq!(HeatmapKind::from_name("Merchant"), Some(HeatmapKind::Merchant));
        assert_eq!(HeatmapKind::from_name("tenant"), None);
        assert_eq!(HeatmapKind::Customer.id_label(), "customerId");
    }

    #[test]
    fn false_positive_display() {
        let fpr: FalsePositiveRate = serde_json::from_str(r#"{"falsePositiveRate":12.346}"#).unwrap();
        assert_eq!(fpr.display(), "12.35%");
        assert_eq!(FalsePositiveRate::default().display(), "N/A");
    }
}
