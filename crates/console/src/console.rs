use std::fmt;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use aml_console_client::ComplianceClient;
use aml_console_core::ui::{empty_state, error_state};
use aml_console_core::{Node, Timestamp};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::panel::{Notice, NoticeKind, Panel, PanelId, PanelState, Panels, Rendered, Ticket};
use crate::view::{CaseTab, LimitsTab, MonitoringTab, View, ViewState};
use crate::{ConsoleConfig, ConsoleError};

/// The dashboard controller.
///
/// Owns the backend client, the [`ViewState`] every loader reads at call
/// time, and the [`Panels`] every loader writes into. Page loaders and
/// actions live in [`crate::pages`] as further `impl Console` blocks.
pub struct Console {
    pub(crate) client: ComplianceClient,
    pub(crate) config: ConsoleConfig,
    state: Mutex<ViewState>,
    pub(crate) panels: Panels,
    clock: fn() -> DateTime<Utc>,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("client", &self.client)
            .field("endpoint", &self.config.endpoint)
            .field("view", &self.lock_state().view)
            .finish_non_exhaustive()
    }
}

impl Console {
    pub fn new(client: ComplianceClient, config: ConsoleConfig) -> Self {
        let clock: fn() -> DateTime<Utc> = Utc::now;
        let state = ViewState::new(&config, clock().date_naive());
        Self {
            client,
            config,
            state: Mutex::new(state),
            panels: Panels::default(),
            clock,
        }
    }

    /// Build the HTTP client from `config` and wrap it.
    pub fn from_config(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        config.validate()?;
        let mut builder = ComplianceClient::builder(&config.endpoint);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(token) = &config.xsrf_token {
            builder = builder.xsrf_token(token);
        }
        if let Some(cookie) = &config.session_cookie {
            builder = builder.session_cookie(cookie);
        }
        Ok(Self::new(builder.build()?, config))
    }

    /// Replace the wall clock. The calendar month is reset to the month of
    /// the new clock's today.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        let today = self.today();
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.calendar_month = aml_console_core::calendar::month_start(today);
        self
    }

    pub fn client(&self) -> &ComplianceClient {
        &self.client
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    pub fn panel(&self, id: PanelId) -> Panel {
        self.panels.get(id)
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub(crate) fn timestamp(&self) -> Timestamp {
        Timestamp(self.now())
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the view state.
    pub fn state(&self) -> ViewState {
        self.lock_state().clone()
    }

    /// Mutate the view state. The lock is never held across an await.
    pub fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        f(&mut self.lock_state())
    }

    pub fn view(&self) -> View {
        self.lock_state().view
    }

    /// Make `view` current and load all of its panels.
    pub async fn switch_view(&self, view: View) {
        self.update(|s| s.view = view);
        debug!(view = %view, "switching view");
        self.load_view(view).await;
    }

    /// Load every panel of `view`.
    pub async fn load_view(&self, view: View) {
        match view {
            View::Cases => self.load_cases().await,
            View::CaseDetail => self.load_case_detail().await,
            View::CaseQueues => {
                self.load_queues().await;
            }
            View::Monitoring => self.load_monitoring().await,
            View::RiskAnalytics => self.load_risk_analytics().await,
            View::RegulatoryReports => {
                self.load_regulatory_report().await;
            }
            View::Limits => self.load_limits().await,
            View::Calendar => self.load_calendar().await,
        }
    }

    /// Activate the tab called `name` on the current view and run its
    /// loader. Names that are not a tab of the current view are ignored.
    pub async fn switch_tab(&self, name: &str) {
        let view = self.view();
        let switched = self.update(|s| match view {
            View::CaseDetail => s.case_tabs.switch(name).map(ActiveTab::Case),
            View::Monitoring => s.monitoring_tabs.switch(name).map(ActiveTab::Monitoring),
            View::Limits => s.limits_tabs.switch(name).map(ActiveTab::Limits),
            _ => None,
        });
        let Some(tab) = switched else {
            debug!(view = %view, tab = name, "ignoring unknown tab");
            return;
        };
        debug!(view = %view, tab = name, "switching tab");
        match tab {
            ActiveTab::Case(tab) => self.load_case_tab(tab).await,
            ActiveTab::Monitoring(tab) => self.load_monitoring_tab(tab).await,
            ActiveTab::Limits(tab) => self.load_limits_tab(tab).await,
        }
    }

    /// Run one load for one panel.
    ///
    /// The ticket is taken before `fetch` is first polled, so of several
    /// overlapping loads of a panel the one issued last is the one kept.
    /// Returns whether the result was committed.
    pub(crate) async fn load<T, E, Fut>(
        &self,
        id: PanelId,
        fetch: Fut,
        render: impl FnOnce(T) -> Rendered,
    ) -> bool
    where
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let ticket = self.panels.begin(id);
        match fetch.await {
            Ok(value) => self.panels.commit(ticket, Ok(render(value))),
            Err(e) => self.fail(ticket, &e),
        }
    }

    /// Record a failed load on the ticket's panel.
    pub(crate) fn fail(&self, ticket: Ticket, error: &impl fmt::Display) -> bool {
        warn!(panel = %ticket.panel, error = %error, "failed to load panel");
        self.panels.commit(ticket, Err(error.to_string()))
    }

    /// Run one mutating request and report the outcome on `panel`.
    ///
    /// Callers re-fetch the affected view on `Ok`; nothing is retried or
    /// rolled back on `Err`.
    pub(crate) async fn act<Fut>(
        &self,
        panel: PanelId,
        action: &str,
        success: &str,
        request: Fut,
    ) -> Result<(), ConsoleError>
    where
        Fut: Future<Output = Result<(), aml_console_client::Error>>,
    {
        match request.await {
            Ok(()) => {
                info!(panel = %panel, action, "action completed");
                self.panels.set_notice(panel, Notice::success(success));
                Ok(())
            }
            Err(e) => {
                warn!(panel = %panel, action, error = %e, "action failed");
                self.panels
                    .set_notice(panel, Notice::error(format!("Failed to {action}: {e}")));
                Err(e.into())
            }
        }
    }

    /// Report rejected form input on `panel` without sending anything.
    pub(crate) fn reject(&self, panel: PanelId, message: &str) -> ConsoleError {
        debug!(panel = %panel, message, "rejected form input");
        self.panels.set_notice(panel, Notice::error(message));
        ConsoleError::Validation(message.to_owned())
    }

    /// One panel with its notice and load state.
    pub fn render_panel(&self, id: PanelId) -> Node {
        let panel = self.panels.get(id);
        let mut el = Node::el("section")
            .class("panel")
            .attr("id", id.as_str());
        if let Some(notice) = &panel.notice {
            let class = match notice.kind {
                NoticeKind::Success => "alert alert-success",
                NoticeKind::Error => "alert alert-danger",
            };
            el = el.child(Node::el("div").class(class).text(notice.message.clone()));
        }
        let body = match panel.state {
            PanelState::Idle => empty_state(""),
            PanelState::Loading => Node::el("div").class("loading").text("Loading...").into(),
            PanelState::Ready { content } => content,
            PanelState::Failed { message } => error_state(&format!("Error: {message}")),
        };
        el.child(body).into()
    }

    /// The current view: title, the active tab bar if any, and its panels.
    pub fn render(&self) -> Node {
        let state = self.state();
        let mut page = Node::el("div")
            .class("view")
            .attr("data-view", state.view.as_str())
            .child(Node::el("h2").text(state.view.title()));
        match state.view {
            View::CaseDetail => page = page.child(state.case_tabs.render()),
            View::Monitoring => page = page.child(state.monitoring_tabs.render()),
            View::Limits => page = page.child(state.limits_tabs.render()),
            _ => {}
        }
        page.children(visible_panels(&state).iter().map(|&id| self.render_panel(id)))
            .into()
    }
}

#[derive(Debug, Clone, Copy)]
enum ActiveTab {
    Case(CaseTab),
    Monitoring(MonitoringTab),
    Limits(LimitsTab),
}

/// Panels shown for the current view and tab, in page order.
pub fn visible_panels(state: &ViewState) -> Vec<PanelId> {
    use PanelId as P;
    match state.view {
        View::Cases => vec![P::CaseStats, P::CaseList],
        View::CaseDetail => {
            let tab = match state.case_tabs.active() {
                CaseTab::Info => P::CaseInfo,
                CaseTab::Timeline => P::CaseTimeline,
                CaseTab::Activities => P::CaseActivities,
            };
            vec![tab, P::CaseNetwork]
        }
        View::CaseQueues => vec![P::Queues],
        View::Monitoring => match state.monitoring_tabs.active() {
            MonitoringTab::Live => vec![P::LiveFeed],
            MonitoringTab::Analytics => vec![
                P::MonitoringStats,
                P::RiskDistribution,
                P::RiskIndicators,
                P::RecentActivity,
            ],
            MonitoringTab::Sars => vec![P::Sars],
            MonitoringTab::Reports => vec![P::MonitoringReport],
        },
        View::RiskAnalytics => vec![P::Heatmap, P::RiskTrends, P::FalsePositiveRate],
        View::RegulatoryReports => vec![P::RegulatoryReport],
        View::Limits => {
            let tab = match state.limits_tabs.active() {
                LimitsTab::MerchantLimits => P::MerchantLimits,
                LimitsTab::GlobalLimits => P::GlobalLimits,
                LimitsTab::RiskThresholds => P::RiskThresholds,
                LimitsTab::VelocityRules => P::VelocityRules,
                LimitsTab::CountryCompliance => P::CountryCompliance,
            };
            vec![P::LimitsStats, P::TransactionLimits, tab]
        }
        View::Calendar => vec![
            P::Calendar,
            P::DayDetail,
            P::UpcomingDeadlines,
            P::OverdueDeadlines,
        ],
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aml_console_client::{ApiRequest, ApiResponse, Error, Transport};
    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;

    struct Failing;

    #[async_trait]
    impl Transport for Failing {
        async fn send(&self, _request: ApiRequest) -> Result<ApiResponse, Error> {
            Ok(ApiResponse::new(503, Bytes::from_static(b"{\"message\":\"down\"}")))
        }
    }

    fn console() -> Console {
        Console::new(
            ComplianceClient::with_transport(Arc::new(Failing)),
            ConsoleConfig::new("http://test"),
        )
    }

    #[tokio::test]
    async fn failed_load_marks_panel() {
        let console = console();
        console.load_heatmap().await;
        let state = console.panels.state(PanelId::Heatmap);
        assert!(matches!(state, PanelState::Failed { ref message } if message.contains("503")));
        let text = console.render_panel(PanelId::Heatmap).to_text();
        assert!(text.starts_with("Error:"), "{text}");
    }

    #[tokio::test]
    async fn failed_action_sets_notice() {
        let console = console();
        let err = console.delete_global_limit(7).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Client(_)));
        let notice = console.panel(PanelId::GlobalLimits).notice.unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.starts_with("Failed to delete global limit"));
    }

    #[tokio::test]
    async fn unknown_tab_is_ignored() {
        let console = console();
        console.update(|s| s.view = View::Limits);
        console.switch_tab("timeline").await;
        assert_eq!(console.state().limits_tabs.active(), LimitsTab::MerchantLimits);
        assert_eq!(console.panels.state(PanelId::CaseTimeline), PanelState::Idle);
    }

    #[test]
    fn visible_panels_follow_tabs() {
        let config = ConsoleConfig::new("http://test");
        let mut state = ViewState::new(&config, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        state.view = View::Limits;
        state.limits_tabs.set(LimitsTab::VelocityRules);
        assert_eq!(
            visible_panels(&state),
            [PanelId::LimitsStats, PanelId::TransactionLimits, PanelId::VelocityRules]
        );
        state.view = View::Monitoring;
        assert_eq!(visible_panels(&state), [PanelId::LiveFeed]);
    }
}
