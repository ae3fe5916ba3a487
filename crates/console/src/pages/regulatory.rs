//! Regulatory reports (CTR, LCTR, IFTR) over the last month.

use aml_console_core::export::{Download, json_export, regulatory_csv};
use aml_console_core::format::{format_date, format_money};
use aml_console_core::ui::{field, row, table_or_placeholder};
use aml_console_core::{DateRange, Node, RegulatoryReport, RegulatoryReportKind, Timestamp};

use crate::panel::{PanelData, PanelId, Rendered};
use crate::{Console, ConsoleError};

impl Console {
    /// Generate the selected report for the month ending now.
    pub async fn load_regulatory_report(&self) -> bool {
        let kind = self.state().report_kind;
        let range = DateRange::last_month(self.now());
        self.load(
            PanelId::RegulatoryReport,
            self.client.regulatory_report(kind, &range),
            move |report: RegulatoryReport| {
                let content = render_regulatory_report(kind, &report);
                Rendered::with_data(content, PanelData::Report(kind, report))
            },
        )
        .await
    }

    pub async fn set_report_kind(&self, kind: RegulatoryReportKind) -> bool {
        self.update(|s| s.report_kind = kind);
        self.load_regulatory_report().await
    }

    /// The generated report as `{KIND}_{date}.json`.
    pub fn export_regulatory_json(&self) -> Result<Download, ConsoleError> {
        let today = self.today();
        let exported = self
            .panels
            .with_data(PanelId::RegulatoryReport, |data| match data {
                Some(PanelData::Report(kind, report)) => {
                    Some(json_export(kind.label(), report, today))
                }
                _ => None,
            })
            .ok_or_else(no_report)?;
        Ok(exported?)
    }

    /// Detail rows as `{KIND}_{date}.csv`.
    pub fn export_regulatory_csv(&self) -> Result<Download, ConsoleError> {
        let today = self.today();
        self.panels
            .with_data(PanelId::RegulatoryReport, |data| match data {
                Some(PanelData::Report(kind, report)) => regulatory_csv(*kind, report, today),
                _ => None,
            })
            .ok_or_else(no_report)
    }
}

fn no_report() -> ConsoleError {
    ConsoleError::NoData("No report data available to export. Generate a report first.".into())
}

fn date_or_na(ts: Option<Timestamp>) -> String {
    ts.map_or_else(|| "N/A".to_owned(), |t| format_date(t.inner().date_naive()))
}

pub fn render_regulatory_report(kind: RegulatoryReportKind, report: &RegulatoryReport) -> Node {
    let currency = report.report_currency();
    let period = format!(
        "{} - {}",
        date_or_na(report.start_date),
        date_or_na(report.end_date)
    );
    let totals = Node::el("span")
        .class("report-totals")
        .children(
            report
                .total_lines()
                .into_iter()
                .map(|line| Node::el("span").class("total-line").text(line)),
        );

    let mut summary = Node::el("div")
        .class("report-summary")
        .child(field("Period", period))
        .child(field("Transaction Count", report.transaction_count.to_string()))
        .child(field("Total Amount", totals));
    if let Some(threshold) = report.threshold.filter(|t| *t > 0.0) {
        summary = summary.child(field("Threshold", format_money(Some(threshold), &currency)));
    }

    let rows: Vec<Node> = report
        .rows()
        .iter()
        .map(|tx| row(kind.cells(tx, &currency).into_iter().map(Node::text)))
        .collect();

    Node::el("div")
        .class("regulatory-report")
        .attr("data-report", kind.path())
        .child(Node::el("h3").text(format!("{} Report", kind.label())))
        .child(summary)
        .child(table_or_placeholder(
            kind.columns(),
            rows,
            "No transactions found for this report period.",
        ))
        .into()
}
