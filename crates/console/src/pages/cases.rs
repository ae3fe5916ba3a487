//! Case list, case stats and the case detail view.

use aml_console_core::badge::{case_status_badge, risk_level_badge, status_label};
use aml_console_core::case::group_events_by_day;
use aml_console_core::format::{format_date, format_event_type};
use aml_console_core::ui::{badge, empty_state, field, row, table_or_placeholder};
use aml_console_core::{
    ActivityPage, Badge, Case, CaseStats, CaseTimeline, NetworkGraph, Node, Timestamp,
};
use tracing::debug;

use super::{datetime_or_na, or_na, stats_grid, time_ago};
use crate::panel::PanelId;
use crate::view::{CaseTab, View};
use crate::{Console, ConsoleError};

pub const CASE_COLUMNS: [&str; 8] = [
    "Case ID",
    "Merchant",
    "Priority",
    "Status",
    "Assigned To",
    "SLA Deadline",
    "Days Open",
    "Actions",
];

impl Console {
    /// Case list and the stats widget, both from one `compliance/cases`
    /// response filtered by the current status filter.
    pub async fn load_cases(&self) {
        let status = self.state().case_status;
        let list = self.panels.begin(PanelId::CaseList);
        let stats = self.panels.begin(PanelId::CaseStats);
        match self.client.list_cases(status.as_deref()).await {
            Ok(cases) => {
                let now = self.timestamp();
                let summary = CaseStats::compute(&cases, now);
                self.panels
                    .commit(stats, Ok(render_case_stats(&summary).into()));
                self.panels
                    .commit(list, Ok(render_case_list(&cases, now).into()));
            }
            Err(e) => {
                self.fail(list, &e);
                self.fail(stats, &e);
            }
        }
    }

    /// Filter the case list by status; blank clears the filter.
    pub async fn filter_cases(&self, status: Option<&str>) {
        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        self.update(|s| s.case_status = status);
        self.load_cases().await;
    }

    /// Select a case and show its detail view on the info tab.
    pub async fn open_case(&self, id: i64) {
        self.update(|s| {
            s.case_id = Some(id);
            s.view = View::CaseDetail;
            s.case_tabs.set(CaseTab::Info);
            s.activities_page = 0;
        });
        self.load_view(View::CaseDetail).await;
    }

    /// Info, timeline and activities of the selected case, then its network.
    pub(crate) async fn load_case_detail(&self) {
        let Some(id) = self.state().case_id else {
            debug!("no case selected");
            return;
        };
        futures::join!(
            self.load_case_info(id),
            self.load_case_timeline(id),
            self.load_case_activities(id),
            self.load_case_network(id),
        );
    }

    pub(crate) async fn load_case_tab(&self, tab: CaseTab) {
        let Some(id) = self.state().case_id else {
            debug!(tab = ?tab, "no case selected");
            return;
        };
        match tab {
            CaseTab::Info => self.load_case_info(id).await,
            CaseTab::Timeline => self.load_case_timeline(id).await,
            CaseTab::Activities => self.load_case_activities(id).await,
        }
    }

    async fn load_case_info(&self, id: i64) {
        let now = self.timestamp();
        self.load(PanelId::CaseInfo, self.client.get_case(id), |case: Case| {
            render_case_info(&case, now).into()
        })
        .await;
    }

    async fn load_case_timeline(&self, id: i64) {
        self.load(
            PanelId::CaseTimeline,
            self.client.case_timeline(id),
            |timeline: CaseTimeline| render_case_timeline(&timeline).into(),
        )
        .await;
    }

    async fn load_case_activities(&self, id: i64) {
        let page = self.state().activities_page;
        let size = self.config.activities_page_size;
        let now = self.timestamp();
        self.load(
            PanelId::CaseActivities,
            self.client.case_activities(id, page, size),
            |activities: ActivityPage| render_case_activities(&activities, now).into(),
        )
        .await;
    }

    async fn load_case_network(&self, id: i64) {
        let depth = self.state().network_depth;
        self.load(
            PanelId::CaseNetwork,
            self.client.case_network(id, depth),
            |graph: NetworkGraph| render_case_network(&graph, depth).into(),
        )
        .await;
    }

    /// Reload the entity network of the selected case `depth` hops out.
    pub async fn set_network_depth(&self, depth: u32) -> Result<(), ConsoleError> {
        let depth = depth.max(1);
        let id = self.update(|s| {
            s.network_depth = depth;
            s.case_id
        });
        let id = id.ok_or_else(|| self.reject(PanelId::CaseNetwork, "Please select a case first"))?;
        self.load_case_network(id).await;
        Ok(())
    }

    /// Page through the activity log of the selected case.
    pub async fn set_activities_page(&self, page: u32) {
        self.update(|s| s.activities_page = page);
        self.load_case_tab(CaseTab::Activities).await;
    }

    /// Escalate the selected case, then reload its detail.
    pub async fn escalate_case(&self, reason: &str) -> Result<(), ConsoleError> {
        let Some(id) = self.state().case_id else {
            return Err(self.reject(PanelId::CaseInfo, "Please select a case first"));
        };
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(self.reject(PanelId::CaseInfo, "Escalation reason is required."));
        }
        self.act(
            PanelId::CaseInfo,
            "escalate case",
            "Case escalated successfully",
            self.client.escalate_case(id, reason),
        )
        .await?;
        futures::join!(
            self.load_case_info(id),
            self.load_case_timeline(id),
            self.load_case_activities(id),
        );
        Ok(())
    }
}

pub fn render_case_stats(stats: &CaseStats) -> Node {
    stats_grid([
        ("Open Cases", stats.open.to_string()),
        ("Overdue", stats.overdue.to_string()),
        ("Escalated", stats.escalated.to_string()),
        ("Unassigned", stats.unassigned.to_string()),
    ])
}

fn priority_badge(case: &Case) -> Node {
    let priority = case.priority_or_default();
    badge(risk_level_badge(priority), priority).into()
}

fn status_badge(case: &Case) -> Node {
    let status = case.status.as_str();
    badge(case_status_badge(status), status_label(status)).into()
}

fn sla_cell(case: &Case, now: Timestamp) -> Node {
    let deadline = case
        .sla_deadline
        .map_or_else(|| "N/A".to_owned(), |d| format_date(d.date()));
    let cell = Node::el("span").text(deadline);
    if case.is_overdue(now) {
        cell.child(badge(Badge::Danger, "OVERDUE")).into()
    } else {
        cell.into()
    }
}

/// One row per case, or a "No cases configured" placeholder.
pub fn render_case_list(cases: &[Case], now: Timestamp) -> Node {
    let rows = cases
        .iter()
        .map(|case| {
            row([
                Node::el("span").class("case-id").text(case.reference()).into(),
                Node::text(or_na(case.merchant_id.as_deref())),
                priority_badge(case),
                status_badge(case),
                Node::text(case.assignee().unwrap_or("Unassigned")),
                sla_cell(case, now),
                Node::text(format!("{} days", case.days_open.unwrap_or(0))),
                Node::el("button")
                    .class("action-btn")
                    .attr("data-action", "view-case")
                    .attr("data-case-id", case.id.to_string())
                    .text("View")
                    .into(),
            ])
        })
        .collect();
    table_or_placeholder(&CASE_COLUMNS, rows, "No cases configured")
}

pub fn render_case_info(case: &Case, now: Timestamp) -> Node {
    Node::el("div")
        .class("case-info")
        .child(Node::el("h3").text(format!("Case: {}", case.reference())))
        .child(field("Status", status_badge(case)))
        .child(field("Priority", priority_badge(case)))
        .child(field("Merchant", or_na(case.merchant_id.as_deref())))
        .child(field("Assigned To", case.assignee().unwrap_or("Unassigned")))
        .child(field("SLA Deadline", {
            let deadline = Node::el("span").text(datetime_or_na(case.sla_deadline));
            if case.is_overdue(now) {
                Node::from(deadline.child(badge(Badge::Danger, "OVERDUE")))
            } else {
                deadline.into()
            }
        }))
        .child(field("Days Open", case.days_open.unwrap_or(0).to_string()))
        .child(field(
            "Escalated",
            if case.escalated { "Yes" } else { "No" },
        ))
        .child(field("Description", or_na(case.description.as_deref())))
        .into()
}

/// Events grouped under one heading per day, newest day first.
pub fn render_case_timeline(timeline: &CaseTimeline) -> Node {
    let days = group_events_by_day(&timeline.events);
    if days.is_empty() {
        return empty_state("No events found for this case");
    }
    Node::el("div")
        .class("timeline")
        .children(days.into_iter().map(|(day, events)| {
            Node::el("div")
                .class("timeline-day")
                .child(Node::el("h4").class("timeline-date").text(format_date(day)))
                .children(events.into_iter().map(|event| {
                    let time = event
                        .timestamp
                        .map(|t| t.inner().format("%H:%M").to_string())
                        .unwrap_or_default();
                    Node::el("div")
                        .class("timeline-event")
                        .child(
                            Node::el("strong")
                                .class("event-type")
                                .text(format_event_type(&event.event_type)),
                        )
                        .child(Node::el("small").text(time))
                        .child(
                            Node::el("p").text(event.description.clone().unwrap_or_default()),
                        )
                }))
        }))
        .into()
}

pub fn render_case_activities(page: &ActivityPage, now: Timestamp) -> Node {
    if page.content.is_empty() {
        return empty_state("No activities recorded for this case");
    }
    let total = page
        .total_elements
        .unwrap_or(page.content.len() as u64);
    Node::el("div")
        .class("activities")
        .children(page.content.iter().map(|activity| {
            Node::el("div")
                .class("activity-item")
                .attr("data-type", activity.activity_type.clone())
                .child(Node::el("strong").text(activity.actor()))
                .child(Node::el("p").text(activity.summary()))
                .child(Node::el("small").text(format!(
                    "{} ({})",
                    datetime_or_na(activity.performed_at),
                    time_ago(activity.performed_at, now)
                )))
        }))
        .child(
            Node::el("p")
                .class("text-muted")
                .text(format!("Showing {} of {total}", page.content.len())),
        )
        .into()
}

/// Summary of the entity network: counts of nodes and links per type.
pub fn render_case_network(graph: &NetworkGraph, depth: u32) -> Node {
    if graph.nodes.is_empty() {
        return empty_state("No linked entities found for this case");
    }
    let counts = |title: &str, counts: std::collections::BTreeMap<&str, usize>| {
        Node::el("div")
            .class("network-counts")
            .child(Node::el("h4").text(title))
            .child(Node::el("ul").children(
                counts
                    .into_iter()
                    .map(|(kind, n)| Node::el("li").text(format!("{kind}: {n}"))),
            ))
    };
    Node::el("div")
        .class("network-summary")
        .child(Node::el("p").text(format!(
            "{} entities, {} links within {depth} hop{}",
            graph.nodes.len(),
            graph.edges.len(),
            if depth == 1 { "" } else { "s" }
        )))
        .child(counts("Entities", graph.node_counts()))
        .child(counts("Links", graph.edge_counts()))
        .into()
}
