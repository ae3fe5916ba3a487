//! Shared types for the AML compliance console.
//!
//! Everything in this crate is pure: view-models deserialized from the
//! compliance backend, the classification tables that decide badges and
//! labels, the framework-agnostic [`Node`] tree renderers produce, and the
//! client-side export formats.

pub mod analytics;
pub mod badge;
pub mod calendar;
pub mod case;
pub mod export;
pub mod format;
pub mod lenient;
pub mod limits;
pub mod monitoring;
pub mod queue;
pub mod reporting;
pub mod risk;
pub mod time;
pub mod ui;

pub use analytics::{
    DateRange, FalsePositiveRate, HeatmapEntry, HeatmapKind, RiskHeatmap, RiskTrends,
};
pub use badge::Badge;
pub use calendar::{CalendarDay, CalendarMonth, Deadline, NewDeadline};
pub use case::{
    ActivityPage, Case, CaseActivity, CaseStats, CaseStatus, CaseTimeline, NetworkEdge,
    NetworkGraph, NetworkNode, TimelineEvent, UserRef, is_overdue,
};
pub use export::Download;
pub use limits::{
    CountryCompliance, GlobalLimit, GlobalLimitRequest, LimitStatus, LimitsDashboardStats,
    MerchantLimit, MerchantRef, RiskThreshold, StatusUpdate, VelocityRule,
};
pub use monitoring::{
    DeclineReport, MonitoredTransaction, MonitoringStats, MonitoringSummary, RecentActivity,
    RiskDistribution, RiskIndicator, SarSummary, TransactionFilter,
};
pub use queue::{CaseQueue, NewQueue, QueueStats, QueueToggle};
pub use reporting::{RegulatoryReport, RegulatoryReportKind, ReportTransaction};
pub use risk::RiskLevel;
pub use time::Timestamp;
pub use ui::{Element, Node};
