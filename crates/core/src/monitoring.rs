//! Transaction monitoring feed, analytics widgets, SARs and reports.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lenient;
use crate::risk::RiskLevel;
use crate::time::Timestamp;

/// Filters for `monitoring/transactions`, read at call time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub risk_level: Option<String>,
    pub decision: Option<String>,
    pub limit: u32,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            risk_level: None,
            decision: None,
            limit: 100,
        }
    }
}

impl TransactionFilter {
    /// Query pairs; an unset filter is sent as `All`.
    pub fn query(&self) -> Vec<(String, String)> {
        let or_all = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("All")
                .to_owned()
        };
        vec![
            ("riskLevel".to_owned(), or_all(&self.risk_level)),
            ("decision".to_owned(), or_all(&self.decision)),
            ("limit".to_owned(), self.limit.to_string()),
        ]
    }
}

/// A transaction as shown on the live feed.
///
/// The feed mixes scored monitoring records and raw transactions, so ids,
/// amounts and timestamps are read from whichever field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoredTransaction {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub txn_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount_cents: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub merchant_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub device_risk: Option<f64>,
    #[serde(default)]
    pub vpn_detected: Option<bool>,
    #[serde(default)]
    pub sanctions_status: Option<String>,
    #[serde(default)]
    pub risk_indicators: Vec<String>,
    #[serde(default)]
    pub terminal_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub txn_ts: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<Timestamp>,
}

impl MonitoredTransaction {
    pub fn display_id(&self) -> &str {
        self.id
            .as_deref()
            .or(self.txn_id.as_deref())
            .or(self.transaction_id.as_deref())
            .unwrap_or("N/A")
    }

    /// `amount`, else `amountCents / 100`, else zero.
    pub fn amount_value(&self) -> f64 {
        self.amount
            .or_else(|| self.amount_cents.map(|c| c / 100.0))
            .unwrap_or(0.0)
    }

    pub fn currency_or_default(&self) -> &str {
        self.currency.as_deref().unwrap_or("USD")
    }

    pub fn occurred_at(&self) -> Option<Timestamp> {
        self.timestamp.or(self.txn_ts).or(self.created_at)
    }

    /// The backend's level, or one derived from the 0-100 score.
    pub fn risk_level_label(&self) -> String {
        match self.risk_level.as_deref() {
            Some(level) if !level.is_empty() => level.to_owned(),
            _ => RiskLevel::from_score_100(self.risk_score.unwrap_or(0.0))
                .as_str()
                .to_owned(),
        }
    }

    pub fn decision_code(&self) -> &str {
        self.decision
            .as_deref()
            .or(self.action.as_deref())
            .unwrap_or("PROCESSED")
    }

    pub fn sanctions_flagged(&self) -> bool {
        self.sanctions_status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("FLAGGED"))
    }
}

/// Newest first; undated transactions sink to the end.
pub fn sort_newest_first(transactions: &mut [MonitoredTransaction]) {
    transactions.sort_by(|a, b| b.occurred_at().cmp(&a.occurred_at()));
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStats {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_monitored: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub flagged: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub flag_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub high_risk: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub blocked: Option<f64>,
}

/// Transaction counts per score band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub critical: u64,
}

/// One bar of the distribution chart, width relative to the largest band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBar {
    pub label: &'static str,
    pub class: &'static str,
    pub count: u64,
    pub width_percent: f64,
}

impl RiskDistribution {
    pub fn total(&self) -> u64 {
        self.low + self.medium + self.high + self.critical
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn bars(&self) -> Vec<RiskBar> {
        let max = self.low.max(self.medium).max(self.high).max(self.critical);
        let width = |count: u64| {
            if max == 0 {
                0.0
            } else {
                count as f64 / max as f64 * 100.0
            }
        };
        [
            ("Low (0-25)", "risk-bar-low", self.low),
            ("Medium (26-50)", "risk-bar-medium", self.medium),
            ("High (51-75)", "risk-bar-high", self.high),
            ("Critical (76-100)", "risk-bar-critical", self.critical),
        ]
        .into_iter()
        .map(|(label, class, count)| RiskBar {
            label,
            class,
            count,
            width_percent: width(count),
        })
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIndicator {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    #[serde(rename = "type", default)]
    pub activity_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub timestamp: Option<Timestamp>,
}

/// Suspicious activity report card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SarSummary {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default)]
    pub submitted: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub sar_id: Option<String>,
    #[serde(default)]
    pub sar_reference: Option<String>,
    #[serde(default)]
    pub sar_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub related_transaction_count: u64,
}

impl SarSummary {
    /// `sarReference`, else `SAR-{id}`.
    pub fn reference(&self) -> String {
        self.sar_reference.clone().unwrap_or_else(|| {
            let id = self.id.as_deref().or(self.sar_id.as_deref()).unwrap_or("N/A");
            format!("SAR-{id}")
        })
    }

    pub fn priority_or_default(&self) -> &str {
        self.priority.as_deref().unwrap_or("MEDIUM")
    }

    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or("DRAFT")
    }

    pub fn heading(&self) -> &str {
        self.sar_type
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("Suspicious Activity Report")
    }

    pub fn summary(&self) -> &str {
        self.description
            .as_deref()
            .or(self.reason.as_deref())
            .unwrap_or("No description available")
    }

    pub fn transactions(&self) -> u64 {
        if self.transaction_count > 0 {
            self.transaction_count
        } else {
            self.related_transaction_count
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclineReport {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_declines: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringSummary {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_monitored: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub flagged: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub high_risk: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub blocked: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
