//! Regulatory threshold reports (CTR, LCTR, IFTR).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format::{format_datetime, format_money};
use crate::lenient;
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegulatoryReportKind {
    /// Currency transaction report.
    Ctr,
    /// Large cash transaction report.
    Lctr,
    /// International funds transfer report.
    Iftr,
}

impl RegulatoryReportKind {
    pub const ALL: [Self; 3] = [Self::Ctr, Self::Lctr, Self::Iftr];

    /// Path segment under `reporting/regulatory/`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Ctr => "ctr",
            Self::Lctr => "lctr",
            Self::Iftr => "iftr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ctr => "CTR",
            Self::Lctr => "LCTR",
            Self::Iftr => "IFTR",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ctr" => Some(Self::Ctr),
            "lctr" => Some(Self::Lctr),
            "iftr" => Some(Self::Iftr),
            _ => None,
        }
    }

    /// Detail table (and CSV) columns for enriched rows.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Ctr => &[
                "Transaction ID",
                "Date & Time",
                "Amount",
                "Currency",
                "Transaction Type",
                "Merchant Name",
                "Merchant Country",
                "Merchant Registration",
                "Financial Institution",
                "Terminal ID",
                "IP Address",
            ],
            Self::Lctr => &[
                "Transaction ID",
                "Date & Time",
                "Amount",
                "Currency",
                "Transaction Type",
                "Merchant Name",
                "Merchant Address",
                "Merchant Country",
                "Financial Institution",
                "Terminal ID",
            ],
            Self::Iftr => &[
                "Transaction ID",
                "Date & Time",
                "Amount",
                "Currency",
                "Transfer Type",
                "Origin Country",
                "Destination Country",
                "Financial Institution",
                "Merchant Name",
                "Merchant Address",
            ],
        }
    }

    /// Cell values for one row, aligned with [`Self::columns`].
    pub fn cells(self, tx: &ReportTransaction, report_currency: &str) -> Vec<String> {
        let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_owned());
        let currency = tx.currency_or(report_currency).to_owned();
        let mut cells = vec![
            tx.id().unwrap_or("N/A").to_owned(),
            tx.occurred_at()
                .map_or_else(|| "N/A".to_owned(), |t| format_datetime(t.inner())),
            format_money(tx.amount_value(), &currency),
            currency,
        ];
        match self {
            Self::Ctr => cells.extend([
                tx.transaction_type.clone().unwrap_or_else(|| "UNKNOWN".to_owned()),
                na(&tx.merchant_name),
                na(&tx.merchant_country),
                na(&tx.merchant_registration_number),
                na(&tx.financial_institution_name),
                na(&tx.terminal_id),
                na(&tx.ip_address),
            ]),
            Self::Lctr => cells.extend([
                tx.transaction_type.clone().unwrap_or_else(|| "UNKNOWN".to_owned()),
                na(&tx.merchant_name),
                na(&tx.merchant_address),
                na(&tx.merchant_country),
                na(&tx.financial_institution_name),
                na(&tx.terminal_id),
            ]),
            Self::Iftr => cells.extend([
                na(&tx.transfer_type),
                na(&tx.origin_country),
                na(&tx.destination_country),
                na(&tx.financial_institution_name),
                na(&tx.merchant_name),
                na(&tx.merchant_address),
            ]),
        }
        cells
    }
}

impl std::fmt::Display for RegulatoryReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A generated regulatory report.
///
/// `transactionDetails` carries enriched rows when the backend has them;
/// otherwise `transactions` holds the bare entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulatoryReport {
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub start_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub end_date: Option<Timestamp>,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub total_amount_by_currency: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub transaction_details: Vec<ReportTransaction>,
    #[serde(default)]
    pub transactions: Vec<ReportTransaction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegulatoryReport {
    pub fn has_details(&self) -> bool {
        !self.transaction_details.is_empty()
    }

    /// Detail rows if present, else the basic rows.
    pub fn rows(&self) -> &[ReportTransaction] {
        if self.has_details() {
            &self.transaction_details
        } else {
            &self.transactions
        }
    }

    /// Report-level currency, else the single currency all rows share,
    /// else USD.
    pub fn report_currency(&self) -> String {
        if let Some(c) = self.currency.as_deref().filter(|c| !c.trim().is_empty()) {
            return c.trim().to_ascii_uppercase();
        }
        let mut seen: Vec<String> = self
            .rows()
            .iter()
            .filter_map(|tx| tx.currency.as_deref())
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        seen.sort();
        seen.dedup();
        match seen.as_slice() {
            [only] => only.clone(),
            _ => "USD".to_owned(),
        }
    }

    /// Totals per currency, preferring the backend's own breakdown.
    pub fn totals_by_currency(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        if let Some(backend) = &self.total_amount_by_currency {
            for (currency, value) in backend {
                let key = normalize_currency(Some(currency));
                *totals.entry(key).or_insert(0.0) += lenient::as_number(value).unwrap_or(0.0);
            }
            return totals;
        }
        for tx in self.rows() {
            let key = normalize_currency(tx.currency.as_deref());
            *totals.entry(key).or_insert(0.0) += tx.amount_value().unwrap_or(0.0);
        }
        totals
    }

    /// One formatted line per currency, or the bare total when there are no
    /// rows to break down.
    pub fn total_lines(&self) -> Vec<String> {
        let totals = self.totals_by_currency();
        if totals.is_empty() {
            return vec![format_money(self.total_amount, &self.report_currency())];
        }
        totals
            .iter()
            .map(|(currency, amount)| format_money(Some(*amount), currency))
            .collect()
    }
}

fn normalize_currency(raw: Option<&str>) -> String {
    raw.map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "USD".to_owned())
}

/// A transaction row; enriched rows fill the merchant and institution fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTransaction {
    #[serde(default, deserialize_with = "lenient::string")]
    pub transaction_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub txn_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub transaction_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub txn_ts: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub amount_cents: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub transfer_type: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default)]
    pub destination_country: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub merchant_trading_name: Option<String>,
    #[serde(default)]
    pub merchant_address: Option<String>,
    #[serde(default)]
    pub merchant_country: Option<String>,
    #[serde(default)]
    pub merchant_registration_number: Option<String>,
    #[serde(default)]
    pub financial_institution_name: Option<String>,
    #[serde(default)]
    pub financial_institution_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub terminal_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
}

impl ReportTransaction {
    pub fn id(&self) -> Option<&str> {
        self.transaction_id.as_deref().or(self.txn_id.as_deref())
    }

    pub fn occurred_at(&self) -> Option<Timestamp> {
        self.transaction_date.or(self.txn_ts)
    }

    /// `amount`, else `amountCents / 100`.
    pub fn amount_value(&self) -> Option<f64> {
        self.amount.or_else(|| self.amount_cents.map(|c| c / 100.0))
    }

    pub fn currency_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(json: &str) -> RegulatoryReport {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn prefers_detail_rows() {
        let r = report(
            r#"{"transactionCount":2,
                "transactionDetails":[{"transactionId":"T1","amount":12000,"currency":"cad"}],
                "transactions":[{"txnId":1},{"txnId":2}]}"#,
        );
        assert!(r.has_details());
        assert_eq!(r.rows().len(), 1);
        assert_eq!(r.report_currency(), "CAD");
    }

    #[test]
    fn mixed_currencies_default_to_usd() {
        let r = report(
            r#"{"transactions":[{"txnId":1,"amountCents":1000000,"currency":"USD"},
                                {"txnId":2,"amount":"500","currency":"EUR"},
                                {"txnId":3,"amount":250}]}"#,
        );
        assert_eq!(r.report_currency(), "USD");
        let totals = r.totals_by_currency();
        assert!((totals["USD"] - 10_250.0).abs() < f64::EPSILON);
        assert!((totals["EUR"] - 500.0).abs() < f64::EPSILON);
        assert_eq!(r.total_lines(), ["EUR 500.00", "$10,250.00"]);
    }

    #[test]
    fn backend_totals_win() {
        let r = report(
            r#"{"totalAmountByCurrency":{"usd":"15000.50"},"transactions":[{"amount":1,"currency":"USD"}]}"#,
        );
        assert!((r.totals_by_currency()["USD"] - 15_000.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_report_shows_total_amount() {
        let r = report(r#"{"totalAmount":0}"#);
        assert_eq!(r.total_lines(), ["$0.00"]);
    }

    #[test]
    fn cells_align_with_columns() {
        let tx = ReportTransaction {
            transaction_id: Some("T9".into()),
            amount: Some(15_000.0),
            ..ReportTransaction::default()
        };
        for kind in RegulatoryReportKind::ALL {
            let cells = kind.cells(&tx, "USD");
            assert_eq!(cells.len(), kind.columns().len(), "{kind}");
            assert_eq!(cells[0], "T9");
            assert_eq!(cells[2], "$15,000.00");
        }
    }
}
