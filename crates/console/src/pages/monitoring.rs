//! Transaction monitoring: live feed, analytics widgets, SARs and reports.

use aml_console_core::badge::{
    activity_badge, activity_title, decision_badge, decision_label, risk_level_badge,
    sar_priority_badge, sar_status_badge, status_label,
};
use aml_console_core::export::{Download, json_export};
use aml_console_core::format::{format_date, format_money};
use aml_console_core::monitoring::sort_newest_first;
use aml_console_core::ui::{badge, empty_state};
use aml_console_core::{
    DeclineReport, MonitoredTransaction, MonitoringStats, MonitoringSummary, Node,
    RecentActivity, RiskDistribution, RiskIndicator, SarSummary, Timestamp,
};
use tracing::debug;

use super::{count, datetime_or_na, or_na, stats_grid, time_ago};
use crate::panel::{PanelData, PanelId, Rendered};
use crate::view::MonitoringTab;
use crate::{Console, ConsoleError};

impl Console {
    pub(crate) async fn load_monitoring(&self) {
        let tab = self.state().monitoring_tabs.active();
        self.load_monitoring_tab(tab).await;
    }

    pub(crate) async fn load_monitoring_tab(&self, tab: MonitoringTab) {
        match tab {
            MonitoringTab::Live => {
                self.load_live_feed().await;
            }
            MonitoringTab::Analytics => self.load_monitoring_analytics().await,
            MonitoringTab::Sars => {
                self.load_sars().await;
            }
            MonitoringTab::Reports => debug!("monitoring reports are generated on demand"),
        }
    }

    /// Live feed with the filters currently in the view state.
    pub async fn load_live_feed(&self) -> bool {
        let filter = self.state().transaction_filter;
        let now = self.timestamp();
        self.load(
            PanelId::LiveFeed,
            self.client.list_transactions(&filter),
            |mut transactions: Vec<MonitoredTransaction>| {
                sort_newest_first(&mut transactions);
                render_live_feed(&transactions, now).into()
            },
        )
        .await
    }

    /// Change the feed filters and reload it. `All` or blank clears a filter.
    pub async fn filter_transactions(&self, risk_level: Option<&str>, decision: Option<&str>) {
        fn normalize(value: Option<&str>) -> Option<String> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
                .map(str::to_owned)
        }
        self.update(|s| {
            s.transaction_filter.risk_level = normalize(risk_level);
            s.transaction_filter.decision = normalize(decision);
        });
        self.load_live_feed().await;
    }

    /// Stop the periodic feed refresh; manual loads still work.
    pub fn pause_live_feed(&self) {
        self.update(|s| s.live_paused = true);
        debug!("live feed paused");
    }

    pub fn resume_live_feed(&self) {
        self.update(|s| s.live_paused = false);
        debug!("live feed resumed");
    }

    pub fn is_live_paused(&self) -> bool {
        self.state().live_paused
    }

    /// Stats, distribution, indicators and recent activity, each on its own
    /// panel so one failure leaves the others intact.
    pub async fn load_monitoring_analytics(&self) {
        let now = self.timestamp();
        futures::join!(
            self.load(
                PanelId::MonitoringStats,
                self.client.monitoring_stats(),
                |stats: MonitoringStats| render_monitoring_stats(&stats).into(),
            ),
            self.load(
                PanelId::RiskDistribution,
                self.client.risk_distribution(),
                |dist: RiskDistribution| render_risk_distribution(&dist).into(),
            ),
            self.load(
                PanelId::RiskIndicators,
                self.client.risk_indicators(),
                |indicators: Vec<RiskIndicator>| render_risk_indicators(&indicators).into(),
            ),
            self.load(
                PanelId::RecentActivity,
                self.client.recent_activity(),
                |activity: Vec<RecentActivity>| render_recent_activity(&activity, now).into(),
            ),
        );
    }

    pub async fn load_sars(&self) -> bool {
        self.load(
            PanelId::Sars,
            self.client.monitoring_sars(),
            |sars: Vec<SarSummary>| render_sars(&sars).into(),
        )
        .await
    }

    pub async fn generate_decline_report(&self) -> bool {
        self.load(
            PanelId::MonitoringReport,
            self.client.decline_report(),
            |report: DeclineReport| {
                let content = render_decline_report(&report);
                Rendered::with_data(content, PanelData::Declines(report))
            },
        )
        .await
    }

    pub async fn generate_monitoring_summary(&self) -> bool {
        self.load(
            PanelId::MonitoringReport,
            self.client.monitoring_summary(),
            |summary: MonitoringSummary| {
                let content = render_monitoring_summary(&summary);
                Rendered::with_data(content, PanelData::Summary(summary))
            },
        )
        .await
    }

    /// Pretty JSON of whichever monitoring report was generated last.
    pub fn export_monitoring_report(&self) -> Result<Download, ConsoleError> {
        let today = self.today();
        let exported = self
            .panels
            .with_data(PanelId::MonitoringReport, |data| match data {
                Some(PanelData::Declines(report)) => {
                    Some(json_export("decline_report", report, today))
                }
                Some(PanelData::Summary(summary)) => {
                    Some(json_export("monitoring_report", summary, today))
                }
                _ => None,
            })
            .ok_or_else(|| ConsoleError::NoData("Generate a report first.".into()))?;
        Ok(exported?)
    }
}

fn meta(label: &str, value: impl Into<Node>) -> Node {
    Node::el("div")
        .class("meta-item")
        .child(Node::el("span").class("meta-label").text(format!("{label}:")))
        .child(Node::el("span").class("meta-value").child(value))
        .into()
}

fn flag(label: &str, flagged: bool, class_when_flagged: &str) -> Node {
    let class = if flagged { class_when_flagged } else { "success" };
    Node::el("span").class(class).text(label).into()
}

pub fn transaction_card(txn: &MonitoredTransaction, now: Timestamp) -> Node {
    let level = txn.risk_level_label();
    let decision = txn.decision_code();
    let summary = Node::el("div")
        .class("transaction-summary")
        .child(
            Node::el("div")
                .class("transaction-id")
                .text(format!("Transaction #{}", txn.display_id())),
        )
        .child(
            Node::el("div")
                .class("transaction-amount")
                .text(format_money(Some(txn.amount_value()), txn.currency_or_default())),
        )
        .child(
            Node::el("div")
                .class("transaction-merchant")
                .text(format!("Merchant: {}", or_na(txn.merchant_id.as_deref()))),
        )
        .child(
            Node::el("div")
                .class("transaction-risk-score")
                .text(format!("Risk Score: {}/100", txn.risk_score.unwrap_or(0.0))),
        );
    let badges = Node::el("div")
        .class("transaction-badges")
        .child(badge(risk_level_badge(&level), level.clone()))
        .child(badge(decision_badge(decision), decision_label(decision)));

    let mut details = Node::el("div").class("transaction-meta");
    details = details
        .child(meta("Terminal ID", or_na(txn.terminal_id.as_deref())))
        .child(meta("IP Address", or_na(txn.ip_address.as_deref())));
    if let Some(risk) = txn.device_risk {
        details = details.child(meta("Device Risk", format!("{risk}/100")));
    }
    if let Some(vpn) = txn.vpn_detected {
        let label = if vpn { "Detected" } else { "Clean" };
        details = details.child(meta("VPN/TOR", flag(label, vpn, "warning")));
    }
    if let Some(status) = &txn.sanctions_status {
        let label = if status.is_empty() { "CLEAR" } else { status.as_str() };
        details = details.child(meta("Sanctions", flag(label, txn.sanctions_flagged(), "danger")));
    }
    let occurred = txn.occurred_at();
    details = details.child(meta(
        "Time",
        Node::el("span")
            .text(datetime_or_na(occurred))
            .child(Node::el("small").class("text-muted").text(time_ago(occurred, now))),
    ));

    Node::el("div")
        .class("transaction-card")
        .attr("data-risk", level.clone())
        .child(
            Node::el("div")
                .class("transaction-header")
                .child(summary)
                .child(badges),
        )
        .child(
            Node::el("div")
                .class("risk-tags")
                .children(
                    txn.risk_indicators
                        .iter()
                        .map(|ind| Node::el("span").class("risk-tag").text(ind.clone())),
                ),
        )
        .child(details)
        .into()
}

/// Cards in the given order; callers sort newest first.
pub fn render_live_feed(transactions: &[MonitoredTransaction], now: Timestamp) -> Node {
    if transactions.is_empty() {
        return empty_state("No transactions found matching the filters.");
    }
    Node::el("div")
        .class("transactions-list")
        .children(transactions.iter().map(|t| transaction_card(t, now)))
        .into()
}

pub fn render_monitoring_stats(stats: &MonitoringStats) -> Node {
    stats_grid([
        ("Total Monitored", count(stats.total_monitored).to_string()),
        ("Flagged", count(stats.flagged).to_string()),
        (
            "Flag Rate",
            format!("{:.1}% flag rate", stats.flag_rate.unwrap_or(0.0)),
        ),
        ("High Risk", count(stats.high_risk).to_string()),
        ("Blocked", count(stats.blocked).to_string()),
    ])
}

pub fn render_risk_distribution(dist: &RiskDistribution) -> Node {
    Node::el("div")
        .class("risk-distribution")
        .children(dist.bars().into_iter().map(|bar| {
            Node::el("div")
                .class("risk-bar-item")
                .child(Node::el("div").class("risk-bar-label").text(bar.label))
                .child(
                    Node::el("div")
                        .class("risk-bar-container")
                        .child(
                            Node::el("div")
                                .class("risk-bar")
                                .class(bar.class)
                                .attr("style", format!("width: {:.1}%", bar.width_percent)),
                        )
                        .child(
                            Node::el("span")
                                .class("risk-bar-value")
                                .text(format!("{} transactions", bar.count)),
                        ),
                )
        }))
        .into()
}

pub fn render_risk_indicators(indicators: &[RiskIndicator]) -> Node {
    if indicators.is_empty() {
        return empty_state("No risk indicators recorded");
    }
    Node::el("div")
        .class("risk-indicators")
        .children(indicators.iter().map(|ind| {
            Node::el("div")
                .class("risk-indicator-item")
                .child(Node::el("div").class("indicator-name").text(ind.name.clone()))
                .child(
                    Node::el("div")
                        .class("indicator-description")
                        .text(ind.description.clone().unwrap_or_default()),
                )
                .child(
                    Node::el("div")
                        .class("indicator-count")
                        .text(format!("{} cases", ind.count)),
                )
        }))
        .into()
}

pub fn render_recent_activity(activity: &[RecentActivity], now: Timestamp) -> Node {
    if activity.is_empty() {
        return empty_state("No recent activity");
    }
    Node::el("div")
        .class("recent-activity")
        .children(activity.iter().map(|item| {
            let mut details = vec![format!(
                "Transaction #{}",
                item.transaction_id.as_deref().unwrap_or("N/A")
            )];
            if item.amount.is_some() {
                details.push(format_money(item.amount, "USD"));
            }
            if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
                details.push(description.to_owned());
            }
            Node::el("div")
                .class("activity-item")
                .child(badge(activity_badge(&item.activity_type), activity_title(&item.activity_type)))
                .child(
                    Node::el("div")
                        .class("activity-details")
                        .text(details.join(", ")),
                )
                .child(
                    Node::el("div")
                        .class("activity-time")
                        .text(time_ago(item.timestamp, now)),
                )
        }))
        .into()
}

pub fn sar_card(sar: &SarSummary) -> Node {
    let priority = sar.priority_or_default();
    let status = sar.status_or_default();
    let created = sar
        .created_at
        .map_or_else(|| "N/A".to_owned(), |t| format_date(t.date()));
    Node::el("div")
        .class("sar-card")
        .child(
            Node::el("div")
                .class("sar-header")
                .child(Node::el("div").class("sar-id").text(sar.reference()))
                .child(badge(sar_priority_badge(priority), priority))
                .child(badge(sar_status_badge(status), status_label(status))),
        )
        .child(Node::el("div").class("sar-title").text(sar.heading()))
        .child(Node::el("p").class("sar-description").text(sar.summary()))
        .child(
            Node::el("div")
                .class("sar-meta")
                .child(Node::el("span").text(format!("Created: {created}")))
                .child(Node::el("span").text(format!(
                    "Jurisdiction: {}",
                    or_na(sar.jurisdiction.as_deref())
                )))
                .child(Node::el("span").text(format!("Transactions: {}", sar.transactions())))
                .child(Node::el("span").text(format!("Status: {}", status_label(status)))),
        )
        .into()
}

pub fn render_sars(sars: &[SarSummary]) -> Node {
    if sars.is_empty() {
        return empty_state("No SARs found.");
    }
    Node::el("div")
        .class("sars-list")
        .children(sars.iter().map(sar_card))
        .into()
}

pub fn render_decline_report(report: &DeclineReport) -> Node {
    Node::el("div")
        .class("report-result-card")
        .child(Node::el("h4").text("Decline Report Generated"))
        .child(Node::el("p").text(format!(
            "Total Declines: {}",
            count(report.total_declines)
        )))
        .child(Node::el("p").text(format!(
            "Period: {} to {}",
            or_na(report.start_date.as_deref()),
            or_na(report.end_date.as_deref())
        )))
        .into()
}

pub fn render_monitoring_summary(summary: &MonitoringSummary) -> Node {
    Node::el("div")
        .class("report-result-card")
        .child(Node::el("h4").text("Monitoring Summary Report"))
        .child(Node::el("p").text(format!(
            "Total Monitored: {}",
            count(summary.total_monitored)
        )))
        .child(Node::el("p").text(format!("Flagged: {}", count(summary.flagged))))
        .child(Node::el("p").text(format!("High Risk: {}", count(summary.high_risk))))
        .child(Node::el("p").text(format!("Blocked: {}", count(summary.blocked))))
        .into()
}
