//! Risk analytics: heatmap, case trends and false-positive rate.

use aml_console_core::export::{Download, heatmap_csv};
use aml_console_core::ui::{badge, empty_state, row, table};
use aml_console_core::analytics::MAX_PERIOD_DAYS;
use aml_console_core::{DateRange, FalsePositiveRate, HeatmapKind, Node, RiskHeatmap, RiskTrends};

use super::stats_grid;
use crate::panel::{PanelData, PanelId, Rendered};
use crate::{Console, ConsoleError};

impl Console {
    /// Window ending now, `analytics_period_days` long. A window that cannot
    /// be represented fails `panel` instead of sending a request.
    fn analytics_range(&self, panel: PanelId) -> Option<DateRange> {
        let days = self.state().analytics_period_days;
        let range = DateRange::last_days(days, self.now());
        if range.is_none() {
            self.fail(
                self.panels.begin(panel),
                &format!("Period of {days} days is out of range."),
            );
        }
        range
    }

    pub async fn load_risk_analytics(&self) {
        futures::join!(
            self.load_heatmap(),
            self.load_risk_trends(),
            self.load_false_positive_rate(),
        );
    }

    /// Heatmap for the kind and period currently selected. Of overlapping
    /// calls the one issued last is the one displayed.
    pub async fn load_heatmap(&self) -> bool {
        let kind = self.state().heatmap_kind;
        let Some(range) = self.analytics_range(PanelId::Heatmap) else {
            return false;
        };
        self.load(
            PanelId::Heatmap,
            self.client.risk_heatmap(kind, &range),
            |heatmap: RiskHeatmap| {
                let content = render_heatmap(&heatmap);
                Rendered::with_data(content, PanelData::Heatmap(heatmap))
            },
        )
        .await
    }

    pub async fn load_risk_trends(&self) -> bool {
        let Some(range) = self.analytics_range(PanelId::RiskTrends) else {
            return false;
        };
        self.load(
            PanelId::RiskTrends,
            self.client.risk_trends(&range),
            |trends: RiskTrends| render_risk_trends(&trends).into(),
        )
        .await
    }

    pub async fn load_false_positive_rate(&self) -> bool {
        let Some(range) = self.analytics_range(PanelId::FalsePositiveRate) else {
            return false;
        };
        self.load(
            PanelId::FalsePositiveRate,
            self.client.false_positive_rate(&range),
            |rate: FalsePositiveRate| render_false_positive_rate(&rate).into(),
        )
        .await
    }

    /// Switch between the customer and merchant heatmap.
    pub async fn set_heatmap_kind(&self, kind: HeatmapKind) {
        self.update(|s| s.heatmap_kind = kind);
        self.load_heatmap().await;
    }

    /// Change the analytics window and reload every analytics panel.
    pub async fn set_analytics_period(&self, days: u32) -> Result<(), ConsoleError> {
        if days == 0 {
            return Err(self.reject(PanelId::Heatmap, "Period must be at least one day."));
        }
        if days > MAX_PERIOD_DAYS {
            let message = format!("Period cannot exceed {MAX_PERIOD_DAYS} days.");
            return Err(self.reject(PanelId::Heatmap, &message));
        }
        self.update(|s| s.analytics_period_days = days);
        self.load_risk_analytics().await;
        Ok(())
    }

    pub fn export_heatmap_csv(&self) -> Result<Download, ConsoleError> {
        let today = self.today();
        self.panels
            .with_data(PanelId::Heatmap, |data| match data {
                Some(PanelData::Heatmap(heatmap)) => heatmap_csv(heatmap, today),
                _ => None,
            })
            .ok_or_else(|| ConsoleError::NoData("No heatmap data to export.".into()))
    }
}

pub fn render_heatmap(heatmap: &RiskHeatmap) -> Node {
    let headers = [
        heatmap.kind.column_label(),
        "Case Count",
        "Average Risk Score",
        "Risk Level",
    ];
    let rows: Vec<Node> = heatmap
        .entries
        .iter()
        .map(|(id, entry)| {
            let level = entry.risk_level();
            row([
                Node::text(id.clone()),
                Node::text(entry.case_count.to_string()),
                Node::text(format!("{:.1}%", entry.score() * 100.0)),
                badge(level.badge(), level.as_str()).into(),
            ])
        })
        .collect();
    let body = if rows.is_empty() {
        empty_state("No risk data available")
    } else {
        table(&headers, rows).into()
    };
    Node::el("div")
        .class("risk-heatmap")
        .attr("data-kind", heatmap.kind.as_str())
        .child(Node::el("h3").text(heatmap.kind.title()))
        .child(body)
        .into()
}

pub fn render_risk_trends(trends: &RiskTrends) -> Node {
    let direction = trends.trend_direction.as_deref().unwrap_or("N/A");
    let body: Node = if trends.weekly_trends.is_empty() {
        empty_state("No trend data available")
    } else {
        table(
            &["Week", "Cases"],
            trends
                .weekly_trends
                .iter()
                .map(|(week, cases)| {
                    row([Node::text(week.clone()), Node::text(cases.to_string())])
                }),
        )
        .into()
    };
    Node::el("div")
        .class("risk-trends")
        .child(Node::el("h4").text(format!("Trend: {direction}")))
        .child(body)
        .into()
}

pub fn render_false_positive_rate(rate: &FalsePositiveRate) -> Node {
    stats_grid([("False Positive Rate", rate.display())])
}
