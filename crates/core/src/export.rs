//! Client-side exports built from already-fetched data.

use chrono::{NaiveDate, SecondsFormat};
use serde::Serialize;

use crate::analytics::RiskHeatmap;
use crate::queue::CaseQueue;
use crate::reporting::{RegulatoryReport, RegulatoryReportKind};

pub const CSV: &str = "text/csv;charset=utf-8";
pub const JSON: &str = "application/json";

/// A file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Download {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

/// Quote a CSV field only when it contains a delimiter, quote or newline.
pub fn csv_escape(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_owned()
    }
}

/// Header line plus one line per row, each terminated by `\n`.
pub fn csv_document<I>(header: &[&str], rows: I) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut out = header
        .iter()
        .map(|h| csv_escape(h))
        .collect::<Vec<_>>()
        .join(",");
    out.push('\n');
    for row in rows {
        out.push_str(
            &row.iter()
                .map(|f| csv_escape(f))
                .collect::<Vec<_>>()
                .join(","),
        );
        out.push('\n');
    }
    out
}

/// `risk_heatmap_{kind}_{date}.csv`; `None` when there are no rows.
pub fn heatmap_csv(heatmap: &RiskHeatmap, date: NaiveDate) -> Option<Download> {
    if heatmap.is_empty() {
        return None;
    }
    let header = [
        heatmap.kind.id_label(),
        "caseCount",
        "averageRiskScore",
        "riskLevel",
    ];
    let rows = heatmap.entries.iter().map(|(id, entry)| {
        vec![
            id.clone(),
            entry.case_count.to_string(),
            entry.score().to_string(),
            entry.risk_level().as_str().to_owned(),
        ]
    });
    Some(Download {
        filename: format!("risk_heatmap_{}_{}.csv", heatmap.kind, date.format("%Y-%m-%d")),
        content_type: CSV,
        body: csv_document(&header, rows),
    })
}

/// `case_queues_{date}.csv`; `None` when there are no queues.
pub fn queues_csv(queues: &[CaseQueue], date: NaiveDate) -> Option<Download> {
    if queues.is_empty() {
        return None;
    }
    let header = [
        "id",
        "queueName",
        "targetRole",
        "minPriority",
        "maxQueueSize",
        "autoAssign",
        "enabled",
        "queuedNewCount",
        "createdAt",
    ];
    let rows = queues.iter().map(|q| {
        vec![
            q.id.to_string(),
            q.queue_name.clone(),
            q.target_role.clone().unwrap_or_default(),
            q.min_priority.clone().unwrap_or_default(),
            q.max_queue_size.map(|s| s.to_string()).unwrap_or_default(),
            q.auto_assign.to_string(),
            q.enabled.to_string(),
            q.queued_new_count.to_string(),
            q.created_at
                .map(|t| t.inner().to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
        ]
    });
    Some(Download {
        filename: format!("case_queues_{}.csv", date.format("%Y-%m-%d")),
        content_type: CSV,
        body: csv_document(&header, rows),
    })
}

/// `{KIND}_{date}.csv` with the per-kind detail columns; amounts are
/// written as plain numbers. `None` when the report has no rows.
pub fn regulatory_csv(
    kind: RegulatoryReportKind,
    report: &RegulatoryReport,
    date: NaiveDate,
) -> Option<Download> {
    let rows = report.rows();
    if rows.is_empty() {
        return None;
    }
    let currency = report.report_currency();
    let body = csv_document(
        kind.columns(),
        rows.iter().map(|tx| {
            let mut cells = kind.cells(tx, &currency);
            cells[2] = tx.amount_value().map(|a| a.to_string()).unwrap_or_default();
            cells
        }),
    );
    Some(Download {
        filename: format!("{}_{}.csv", kind.label(), date.format("%Y-%m-%d")),
        content_type: CSV,
        body,
    })
}

/// Pretty-printed `{stem}_{date}.json`.
pub fn json_export<T: Serialize>(
    stem: &str,
    value: &T,
    date: NaiveDate,
) -> Result<Download, serde_json::Error> {
    Ok(Download {
        filename: format!("{stem}_{}.json", date.format("%Y-%m-%d")),
        content_type: JSON,
        body: serde_json::to_string_pretty(value)?,
    })
}
