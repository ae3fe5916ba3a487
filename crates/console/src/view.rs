//! Views, tab sets and the per-console view state.

use std::fmt;

use aml_console_core::{HeatmapKind, Node, RegulatoryReportKind, TransactionFilter};
use chrono::NaiveDate;

use crate::ConsoleConfig;

/// Top-level pages of the console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    Cases,
    CaseDetail,
    CaseQueues,
    Monitoring,
    RiskAnalytics,
    RegulatoryReports,
    Limits,
    Calendar,
}

impl View {
    pub const ALL: [Self; 8] = [
        Self::Cases,
        Self::CaseDetail,
        Self::CaseQueues,
        Self::Monitoring,
        Self::RiskAnalytics,
        Self::RegulatoryReports,
        Self::Limits,
        Self::Calendar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cases => "cases",
            Self::CaseDetail => "case-detail",
            Self::CaseQueues => "case-queues",
            Self::Monitoring => "monitoring",
            Self::RiskAnalytics => "risk-analytics",
            Self::RegulatoryReports => "regulatory-reports",
            Self::Limits => "limits",
            Self::Calendar => "calendar",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Cases => "Cases",
            Self::CaseDetail => "Case Detail",
            Self::CaseQueues => "Case Queues",
            Self::Monitoring => "Transaction Monitoring",
            Self::RiskAnalytics => "Risk Analytics",
            Self::RegulatoryReports => "Regulatory Reports",
            Self::Limits => "Limits & Thresholds",
            Self::Calendar => "Compliance Calendar",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed set of tabs within one view.
pub trait Tab: Copy + Eq + fmt::Debug + Send + 'static {
    const ALL: &'static [Self];

    /// Name used by `switch_tab` and the `data-tab` attribute.
    fn as_str(self) -> &'static str;

    fn label(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CaseTab {
    #[default]
    Info,
    Timeline,
    Activities,
}

impl Tab for CaseTab {
    const ALL: &'static [Self] = &[Self::Info, Self::Timeline, Self::Activities];

    fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Timeline => "timeline",
            Self::Activities => "activities",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Info => "Case Info",
            Self::Timeline => "Timeline",
            Self::Activities => "Activities",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LimitsTab {
    #[default]
    MerchantLimits,
    GlobalLimits,
    RiskThresholds,
    VelocityRules,
    CountryCompliance,
}

impl Tab for LimitsTab {
    const ALL: &'static [Self] = &[
        Self::MerchantLimits,
        Self::GlobalLimits,
        Self::RiskThresholds,
        Self::VelocityRules,
        Self::CountryCompliance,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::MerchantLimits => "merchant-limits",
            Self::GlobalLimits => "global-limits",
            Self::RiskThresholds => "risk-thresholds",
            Self::VelocityRules => "velocity-rules",
            Self::CountryCompliance => "country-compliance",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::MerchantLimits => "Merchant Limits",
            Self::GlobalLimits => "Global Limits",
            Self::RiskThresholds => "Risk Thresholds",
            Self::VelocityRules => "Velocity Rules",
            Self::CountryCompliance => "Country Compliance",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MonitoringTab {
    #[default]
    Live,
    Analytics,
    Sars,
    Reports,
}

impl Tab for MonitoringTab {
    const ALL: &'static [Self] = &[Self::Live, Self::Analytics, Self::Sars, Self::Reports];

    fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Analytics => "analytics",
            Self::Sars => "sars",
            Self::Reports => "reports",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Live => "Live Monitoring",
            Self::Analytics => "Risk Analytics",
            Self::Sars => "SAR Reports",
            Self::Reports => "Reports",
        }
    }
}

/// The active tab of one tab set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabBar<T> {
    active: T,
}

impl<T: Tab> TabBar<T> {
    pub fn new(active: T) -> Self {
        Self { active }
    }

    pub fn active(&self) -> T {
        self.active
    }

    /// Activate the tab called `name`. Unknown names leave the bar as is.
    pub fn switch(&mut self, name: &str) -> Option<T> {
        let tab = T::from_name(name)?;
        self.active = tab;
        Some(tab)
    }

    pub fn set(&mut self, tab: T) {
        self.active = tab;
    }

    /// Tab buttons; exactly one carries the `active` class.
    pub fn render(&self) -> Node {
        Node::el("nav")
            .class("tabs")
            .children(T::ALL.iter().map(|&tab| {
                let button = Node::el("button")
                    .class("tab")
                    .attr("data-tab", tab.as_str())
                    .text(tab.label());
                if tab == self.active {
                    button.class("active")
                } else {
                    button
                }
            }))
            .into()
    }
}

/// Everything the loaders read at call time: filters, selections and the
/// active tabs. Owned by the [`Console`](crate::Console).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub view: View,
    /// Status filter on the case list; `None` lists every case.
    pub case_status: Option<String>,
    pub case_id: Option<i64>,
    pub case_tabs: TabBar<CaseTab>,
    pub activities_page: u32,
    pub network_depth: u32,
    pub monitoring_tabs: TabBar<MonitoringTab>,
    pub transaction_filter: TransactionFilter,
    pub live_paused: bool,
    pub heatmap_kind: HeatmapKind,
    pub analytics_period_days: u32,
    pub report_kind: RegulatoryReportKind,
    pub limits_tabs: TabBar<LimitsTab>,
    /// Global limit being edited; `None` means the form creates a new one.
    pub editing_limit: Option<i64>,
    pub calendar_month: NaiveDate,
    pub selected_day: Option<NaiveDate>,
}

impl ViewState {
    pub fn new(config: &ConsoleConfig, today: NaiveDate) -> Self {
        Self {
            view: View::default(),
            case_status: None,
            case_id: None,
            case_tabs: TabBar::default(),
            activities_page: 0,
            network_depth: config.network_depth,
            monitoring_tabs: TabBar::default(),
            transaction_filter: TransactionFilter {
                limit: config.feed_limit,
                ..TransactionFilter::default()
            },
            live_paused: false,
            heatmap_kind: HeatmapKind::default(),
            analytics_period_days: config.analytics_period_days,
            report_kind: RegulatoryReportKind::Ctr,
            limits_tabs: TabBar::default(),
            editing_limit: None,
            calendar_month: aml_console_core::calendar::month_start(today),
            selected_day: None,
        }
    }
}
