//! Panels: independently loaded regions of a view.
//!
//! Every loader takes a [`Ticket`] for its panel before it issues a request
//! and commits with that ticket when the response arrives. Only the newest
//! ticket of a panel may commit, so a slow response never overwrites a
//! faster, later one.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use aml_console_core::{
    CaseQueue, DeclineReport, Deadline, GlobalLimit, MonitoringSummary, Node, RegulatoryReport,
    RegulatoryReportKind, RiskHeatmap,
};
use tracing::debug;

/// Every panel the console renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    CaseList,
    CaseStats,
    CaseInfo,
    CaseTimeline,
    CaseActivities,
    CaseNetwork,
    Queues,
    LiveFeed,
    MonitoringStats,
    RiskDistribution,
    RiskIndicators,
    RecentActivity,
    Sars,
    MonitoringReport,
    Heatmap,
    RiskTrends,
    FalsePositiveRate,
    RegulatoryReport,
    LimitsStats,
    TransactionLimits,
    MerchantLimits,
    GlobalLimits,
    RiskThresholds,
    VelocityRules,
    CountryCompliance,
    Calendar,
    DayDetail,
    UpcomingDeadlines,
    OverdueDeadlines,
}

impl PanelId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CaseList => "case-list",
            Self::CaseStats => "case-stats",
            Self::CaseInfo => "case-info",
            Self::CaseTimeline => "case-timeline",
            Self::CaseActivities => "case-activities",
            Self::CaseNetwork => "case-network",
            Self::Queues => "case-queues",
            Self::LiveFeed => "live-feed",
            Self::MonitoringStats => "monitoring-stats",
            Self::RiskDistribution => "risk-distribution",
            Self::RiskIndicators => "risk-indicators",
            Self::RecentActivity => "recent-activity",
            Self::Sars => "sars",
            Self::MonitoringReport => "monitoring-report",
            Self::Heatmap => "risk-heatmap",
            Self::RiskTrends => "risk-trends",
            Self::FalsePositiveRate => "false-positive-rate",
            Self::RegulatoryReport => "regulatory-report",
            Self::LimitsStats => "limits-stats",
            Self::TransactionLimits => "transaction-limits",
            Self::MerchantLimits => "merchant-limits",
            Self::GlobalLimits => "global-limits",
            Self::RiskThresholds => "risk-thresholds",
            Self::VelocityRules => "velocity-rules",
            Self::CountryCompliance => "country-compliance",
            Self::Calendar => "calendar",
            Self::DayDetail => "calendar-day",
            Self::UpcomingDeadlines => "upcoming-deadlines",
            Self::OverdueDeadlines => "overdue-deadlines",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetched data kept alongside the rendered content for exports and local
/// re-rendering (calendar navigation). Replaced on every accepted commit.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    Heatmap(RiskHeatmap),
    Queues(Vec<CaseQueue>),
    Report(RegulatoryReportKind, RegulatoryReport),
    Declines(DeclineReport),
    Summary(MonitoringSummary),
    Deadlines(Vec<Deadline>),
    GlobalLimits(Vec<GlobalLimit>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanelState {
    #[default]
    Idle,
    Loading,
    Ready {
        content: Node,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Inline message shown above a panel after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panel {
    pub state: PanelState,
    pub data: Option<PanelData>,
    pub notice: Option<Notice>,
    generation: u64,
}

impl Panel {
    pub fn content(&self) -> Option<&Node> {
        match &self.state {
            PanelState::Ready { content } => Some(content),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Permission to commit one load result to one panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket must be committed for the load to take effect"]
pub struct Ticket {
    pub panel: PanelId,
    generation: u64,
}

/// Rendered content plus the data it was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub content: Node,
    pub data: Option<PanelData>,
}

impl Rendered {
    pub fn with_data(content: impl Into<Node>, data: PanelData) -> Self {
        Self {
            content: content.into(),
            data: Some(data),
        }
    }
}

impl<T: Into<Node>> From<T> for Rendered {
    fn from(content: T) -> Self {
        Self {
            content: content.into(),
            data: None,
        }
    }
}

/// All panels of a console, keyed by id.
#[derive(Debug, Default)]
pub struct Panels {
    inner: Mutex<HashMap<PanelId, Panel>>,
}

impl Panels {
    fn lock(&self) -> MutexGuard<'_, HashMap<PanelId, Panel>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a load: bump the panel's generation and mark it loading.
    pub fn begin(&self, id: PanelId) -> Ticket {
        let mut panels = self.lock();
        let panel = panels.entry(id).or_default();
        panel.generation += 1;
        panel.state = PanelState::Loading;
        Ticket {
            panel: id,
            generation: panel.generation,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.lock()
            .get(&ticket.panel)
            .is_some_and(|p| p.generation == ticket.generation)
    }

    /// Commit a load result. Returns `false`, leaving the panel untouched,
    /// when a newer load has started since `ticket` was issued.
    pub fn commit(&self, ticket: Ticket, result: Result<Rendered, String>) -> bool {
        let mut panels = self.lock();
        let panel = panels.entry(ticket.panel).or_default();
        if panel.generation != ticket.generation {
            debug!(
                panel = %ticket.panel,
                ticket = ticket.generation,
                latest = panel.generation,
                "dropping stale response"
            );
            return false;
        }
        match result {
            Ok(rendered) => {
                panel.state = PanelState::Ready {
                    content: rendered.content,
                };
                panel.data = rendered.data;
            }
            Err(message) => {
                panel.state = PanelState::Failed { message };
                panel.data = None;
            }
        }
        true
    }

    /// Replace the content of a panel from its stored data without a fetch.
    /// Returns `false` when the panel has no data.
    pub fn rerender(&self, id: PanelId, render: impl FnOnce(&PanelData) -> Node) -> bool {
        let mut panels = self.lock();
        let Some(panel) = panels.get_mut(&id) else {
            return false;
        };
        let Some(data) = &panel.data else {
            return false;
        };
        panel.state = PanelState::Ready {
            content: render(data),
        };
        true
    }

    /// Set panel content directly, outside the ticket protocol, for panels
    /// derived locally from another panel's data.
    pub fn show(&self, id: PanelId, content: Node) {
        self.lock().entry(id).or_default().state = PanelState::Ready { content };
    }

    pub fn set_notice(&self, id: PanelId, notice: Notice) {
        self.lock().entry(id).or_default().notice = Some(notice);
    }

    pub fn clear_notice(&self, id: PanelId) {
        if let Some(panel) = self.lock().get_mut(&id) {
            panel.notice = None;
        }
    }

    /// Snapshot of a panel; `Idle` default when it was never touched.
    pub fn get(&self, id: PanelId) -> Panel {
        self.lock().get(&id).cloned().unwrap_or_default()
    }

    pub fn state(&self, id: PanelId) -> PanelState {
        self.get(id).state
    }

    /// Read the panel's data under the lock.
    pub fn with_data<R>(&self, id: PanelId, read: impl FnOnce(Option<&PanelData>) -> R) -> R {
        let panels = self.lock();
        read(panels.get(&id).and_then(|p| p.data.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use aml_console_core::Node;

    use super::*;

    #[test]
    fn latest_ticket_wins() {
        let panels = Panels::default();
        let first = panels.begin(PanelId::Heatmap);
        let second = panels.begin(PanelId::Heatmap);
        assert_eq!(panels.state(PanelId::Heatmap), PanelState::Loading);

        assert!(panels.commit(second, Ok(Node::text("new").into())));
        assert!(!panels.commit(first, Ok(Node::text("old").into())));
        assert_eq!(
            panels.get(PanelId::Heatmap).content().map(Node::text_content),
            Some("new".to_owned())
        );
    }

    #[test]
    fn panels_are_independent() {
        let panels = Panels::default();
        let a = panels.begin(PanelId::RiskTrends);
        let b = panels.begin(PanelId::FalsePositiveRate);
        assert!(panels.commit(b, Err("HTTP 500".into())));
        assert!(panels.commit(a, Ok(Node::text("ok").into())));
        assert!(matches!(
            panels.state(PanelId::FalsePositiveRate),
            PanelState::Failed { .. }
        ));
        assert!(panels.get(PanelId::RiskTrends).content().is_some());
    }

    #[test]
    fn failure_clears_data() {
        let panels = Panels::default();
        let t = panels.begin(PanelId::Queues);
        assert!(panels.commit(
            t,
            Ok(Rendered::with_data(Node::text("q"), PanelData::Queues(Vec::new())))
        ));
        assert!(panels.with_data(PanelId::Queues, |d| d.is_some()));

        let t = panels.begin(PanelId::Queues);
        assert!(panels.commit(t, Err("boom".into())));
        assert!(panels.with_data(PanelId::Queues, |d| d.is_none()));
    }

    #[test]
    fn rerender_needs_data() {
        let panels = Panels::default();
        assert!(!panels.rerender(PanelId::Calendar, |_| Node::text("x")));
        let t = panels.begin(PanelId::Calendar);
        assert!(panels.commit(
            t,
            Ok(Rendered::with_data(Node::text("march"), PanelData::Deadlines(Vec::new())))
        ));
        assert!(panels.rerender(PanelId::Calendar, |_| Node::text("april")));
        assert_eq!(
            panels.get(PanelId::Calendar).content().map(Node::text_content),
            Some("april".to_owned())
        );
    }

    #[test]
    fn notices_survive_reloads() {
        let panels = Panels::default();
        panels.set_notice(PanelId::GlobalLimits, Notice::error("delete failed"));
        let t = panels.begin(PanelId::GlobalLimits);
        assert!(panels.commit(t, Ok(Node::text("rows").into())));
        assert_eq!(
            panels.get(PanelId::GlobalLimits).notice,
            Some(Notice::error("delete failed"))
        );
        panels.clear_notice(PanelId::GlobalLimits);
        assert!(panels.get(PanelId::GlobalLimits).notice.is_none());
    }
}
