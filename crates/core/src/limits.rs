//! Transaction limits, risk thresholds, velocity rules and country rules.

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::time::Timestamp;

/// Whether a limit or rule is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LimitStatus {
    #[default]
    Active,
    Inactive,
}

impl LimitStatus {
    pub fn from_active(active: bool) -> Self {
        if active { Self::Active } else { Self::Inactive }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "INACTIVE" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for LimitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline figures on the limits page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsDashboardStats {
    #[serde(default, deserialize_with = "lenient::number")]
    pub daily_transaction_limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub monthly_volume_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub high_risk_threshold: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub active_rules_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub active_merchants: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_daily_usage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub risk_alerts: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub avg_success_rate: Option<f64>,
}

impl LimitsDashboardStats {
    /// Daily usage as a percentage of the daily limit; `None` when there is
    /// no positive limit to divide by.
    pub fn usage_percent(&self) -> Option<f64> {
        let limit = self.daily_transaction_limit.filter(|l| *l > 0.0)?;
        Some(self.total_daily_usage.unwrap_or(0.0) / limit * 100.0)
    }

    pub fn usage_display(&self) -> String {
        self.usage_percent()
            .map_or_else(|| "N/A".to_owned(), |p| format!("{p:.1}% of limit"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRef {
    #[serde(default, deserialize_with = "lenient::string")]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub trading_name: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
}

impl MerchantRef {
    pub fn display_name(&self) -> &str {
        self.legal_name
            .as_deref()
            .or(self.trading_name.as_deref())
            .unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantLimit {
    #[serde(default)]
    pub merchant: MerchantRef,
    #[serde(default, deserialize_with = "lenient::number")]
    pub daily_limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub weekly_limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub monthly_limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub per_transaction_limit: Option<f64>,
    #[serde(default)]
    pub status: String,
}

/// A platform-wide limit. Also backs the transaction-limits table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLimit {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub limit_type: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub limit_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub current_usage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub usage_percentage: Option<f64>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub status: String,
}

impl GlobalLimit {
    /// Editable fields of this limit, for pre-filling an update.
    pub fn to_request(&self) -> GlobalLimitRequest {
        GlobalLimitRequest {
            name: self.name.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            limit_type: self.limit_type.clone(),
            limit_value: self.limit_value,
            period: self.period.clone().unwrap_or_default(),
            status: LimitStatus::parse(&self.status).unwrap_or_default(),
        }
    }
}

/// Body of `POST limits/global` and `PUT limits/global/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLimitRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub limit_type: String,
    pub limit_value: Option<f64>,
    pub period: String,
    #[serde(default)]
    pub status: LimitStatus,
}

impl Default for GlobalLimitRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            limit_type: "VOLUME".to_owned(),
            limit_value: None,
            period: "DAY".to_owned(),
            status: LimitStatus::Active,
        }
    }
}

impl GlobalLimitRequest {
    /// Names of required fields that are blank or not a number.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.limit_type.trim().is_empty() {
            missing.push("limitType");
        }
        if !self.limit_value.is_some_and(f64::is_finite) {
            missing.push("limitValue");
        }
        if self.period.trim().is_empty() {
            missing.push("period");
        }
        missing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskThreshold {
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub daily_limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub per_transaction_limit: Option<f64>,
    #[serde(default)]
    pub velocity_limit: Option<u64>,
    #[serde(default)]
    pub merchant_count: Option<u64>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityRule {
    pub id: i64,
    #[serde(default)]
    pub rule_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub max_transactions: Option<u64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_amount: Option<f64>,
    #[serde(default)]
    pub time_window_minutes: Option<u64>,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub trigger_count: u64,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_triggered_at: Option<Timestamp>,
    #[serde(default)]
    pub status: String,
}

impl VelocityRule {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("ACTIVE")
    }
}

/// Body of `PATCH limits/velocity-rules/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: LimitStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryCompliance {
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub compliance_requirements: Option<String>,
    #[serde(default)]
    pub transaction_restrictions: Option<String>,
    #[serde(default)]
    pub required_documentation: Option<String>,
    #[serde(default)]
    pub status: String,
}
