//! Limits and AML rules: dashboard figures, transaction limits and the
//! five tabbed tables.

use aml_console_core::badge::{limit_status_badge, risk_level_badge};
use aml_console_core::format::{
    format_currency, format_date, format_grouped, format_limit_type_name, format_limit_value,
    format_period,
};
use aml_console_core::ui::{badge, row, table_or_placeholder};
use aml_console_core::{
    Badge, CountryCompliance, GlobalLimit, GlobalLimitRequest, LimitStatus, LimitsDashboardStats,
    MerchantLimit, Node, RiskThreshold, VelocityRule,
};

use super::{count, or_na, stats_grid};
use crate::panel::{PanelData, PanelId, Rendered};
use crate::view::LimitsTab;
use crate::{Console, ConsoleError};

pub const MERCHANT_LIMIT_COLUMNS: [&str; 8] = [
    "Merchant",
    "Risk Level",
    "Daily Limit",
    "Weekly Limit",
    "Monthly Limit",
    "Per Transaction",
    "Status",
    "Actions",
];

pub const GLOBAL_LIMIT_COLUMNS: [&str; 7] = [
    "Limit",
    "Type",
    "Value",
    "Current Usage",
    "Period",
    "Status",
    "Actions",
];

pub const RISK_THRESHOLD_COLUMNS: [&str; 8] = [
    "Risk Level",
    "Description",
    "Daily Limit",
    "Per Transaction",
    "Velocity",
    "Merchants",
    "Status",
    "Actions",
];

pub const VELOCITY_RULE_COLUMNS: [&str; 7] = [
    "Rule",
    "Thresholds",
    "Time Window",
    "Risk Level",
    "Triggers",
    "Status",
    "Actions",
];

pub const COUNTRY_COLUMNS: [&str; 6] = [
    "Country",
    "Requirements",
    "Restrictions",
    "Documentation",
    "Status",
    "Actions",
];

pub const TRANSACTION_LIMIT_COLUMNS: [&str; 6] =
    ["Limit Type", "Value", "Period", "Applies To", "Status", "Actions"];

impl Console {
    /// Figures, the transaction-limits table and the active tab.
    pub(crate) async fn load_limits(&self) {
        let tab = self.state().limits_tabs.active();
        futures::join!(self.refresh_limits(), self.load_limits_tab(tab));
    }

    /// The part of the page that is polled: figures and transaction limits.
    pub async fn refresh_limits(&self) {
        futures::join!(self.load_limits_stats(), self.load_transaction_limits());
    }

    pub(crate) async fn load_limits_tab(&self, tab: LimitsTab) {
        match tab {
            LimitsTab::MerchantLimits => self.load_merchant_limits().await,
            LimitsTab::GlobalLimits => self.load_global_limits().await,
            LimitsTab::RiskThresholds => self.load_risk_thresholds().await,
            LimitsTab::VelocityRules => self.load_velocity_rules().await,
            LimitsTab::CountryCompliance => self.load_country_compliance().await,
        };
    }

    pub async fn load_limits_stats(&self) -> bool {
        self.load(
            PanelId::LimitsStats,
            self.client.limits_stats(),
            |stats: LimitsDashboardStats| render_limits_stats(&stats).into(),
        )
        .await
    }

    /// Same backing list as the global-limits tab, shown as a summary.
    pub async fn load_transaction_limits(&self) -> bool {
        self.load(
            PanelId::TransactionLimits,
            self.client.global_limits(),
            |limits: Vec<GlobalLimit>| render_transaction_limits(&limits).into(),
        )
        .await
    }

    pub async fn load_merchant_limits(&self) -> bool {
        self.load(
            PanelId::MerchantLimits,
            self.client.merchant_limits(),
            |limits: Vec<MerchantLimit>| render_merchant_limits(&limits).into(),
        )
        .await
    }

    pub async fn load_global_limits(&self) -> bool {
        self.load(
            PanelId::GlobalLimits,
            self.client.global_limits(),
            |limits: Vec<GlobalLimit>| {
                let content = render_global_limits(&limits);
                Rendered::with_data(content, PanelData::GlobalLimits(limits))
            },
        )
        .await
    }

    pub async fn load_risk_thresholds(&self) -> bool {
        self.load(
            PanelId::RiskThresholds,
            self.client.risk_thresholds(),
            |thresholds: Vec<RiskThreshold>| render_risk_thresholds(&thresholds).into(),
        )
        .await
    }

    pub async fn load_velocity_rules(&self) -> bool {
        self.load(
            PanelId::VelocityRules,
            self.client.velocity_rules(),
            |rules: Vec<VelocityRule>| render_velocity_rules(&rules).into(),
        )
        .await
    }

    pub async fn load_country_compliance(&self) -> bool {
        self.load(
            PanelId::CountryCompliance,
            self.client.country_compliance(),
            |rules: Vec<CountryCompliance>| render_country_compliance(&rules).into(),
        )
        .await
    }

    /// Start editing a loaded global limit; returns its current values.
    pub fn edit_global_limit(&self, id: i64) -> Result<GlobalLimitRequest, ConsoleError> {
        let request = self
            .panels
            .with_data(PanelId::GlobalLimits, |data| match data {
                Some(PanelData::GlobalLimits(limits)) => limits
                    .iter()
                    .find(|l| l.id == Some(id))
                    .map(GlobalLimit::to_request),
                _ => None,
            })
            .ok_or_else(|| ConsoleError::NoData(format!("Global limit {id} is not loaded.")))?;
        self.update(|s| s.editing_limit = Some(id));
        Ok(request)
    }

    pub fn cancel_limit_edit(&self) {
        self.update(|s| s.editing_limit = None);
    }

    /// Create a global limit, or update the one being edited.
    pub async fn save_global_limit(&self, limit: &GlobalLimitRequest) -> Result<(), ConsoleError> {
        let missing = limit.missing_fields();
        if !missing.is_empty() {
            let message = format!("Please fill in all required fields: {}", missing.join(", "));
            return Err(self.reject(PanelId::GlobalLimits, &message));
        }
        let limit = GlobalLimitRequest {
            name: limit.name.trim().to_owned(),
            description: limit.description.trim().to_owned(),
            ..limit.clone()
        };
        match self.state().editing_limit {
            Some(id) => {
                self.act(
                    PanelId::GlobalLimits,
                    "update global limit",
                    "Global limit updated successfully",
                    self.client.update_global_limit(id, &limit),
                )
                .await?;
            }
            None => {
                self.act(
                    PanelId::GlobalLimits,
                    "create global limit",
                    "Global limit created successfully",
                    self.client.create_global_limit(&limit),
                )
                .await?;
            }
        }
        self.update(|s| s.editing_limit = None);
        futures::join!(self.load_global_limits(), self.refresh_limits());
        Ok(())
    }

    /// Delete, then re-fetch only the global-limits table.
    pub async fn delete_global_limit(&self, id: i64) -> Result<(), ConsoleError> {
        self.act(
            PanelId::GlobalLimits,
            "delete global limit",
            "Global limit deleted successfully",
            self.client.delete_global_limit(id),
        )
        .await?;
        self.load_global_limits().await;
        Ok(())
    }

    pub async fn delete_velocity_rule(&self, id: i64) -> Result<(), ConsoleError> {
        self.act(
            PanelId::VelocityRules,
            "delete velocity rule",
            "Velocity rule deleted successfully",
            self.client.delete_velocity_rule(id),
        )
        .await?;
        self.load_velocity_rules().await;
        Ok(())
    }

    pub async fn set_velocity_rule_status(
        &self,
        id: i64,
        status: LimitStatus,
    ) -> Result<(), ConsoleError> {
        let success = match status {
            LimitStatus::Active => "Velocity rule activated",
            LimitStatus::Inactive => "Velocity rule deactivated",
        };
        self.act(
            PanelId::VelocityRules,
            "update velocity rule",
            success,
            self.client.set_velocity_rule_status(id, status),
        )
        .await?;
        self.load_velocity_rules().await;
        Ok(())
    }
}

fn status_badge(status: &str) -> Node {
    let label = if status.trim().is_empty() { "N/A" } else { status };
    badge(limit_status_badge(status), label).into()
}

fn risk_badge(level: &str) -> Node {
    badge(risk_level_badge(level), or_na(Some(level))).into()
}

/// Name over a muted secondary line.
fn titled(title: &str, subtitle: &str) -> Node {
    Node::el("div")
        .child(Node::el("strong").text(title))
        .child(Node::el("div").class("text-muted small").text(subtitle))
        .into()
}

fn action_button(action: &'static str, id: i64, label: &str) -> Node {
    Node::el("button")
        .class("action-btn")
        .attr("data-action", action)
        .attr("data-id", id.to_string())
        .text(label)
        .into()
}

pub fn render_limits_stats(stats: &LimitsDashboardStats) -> Node {
    stats_grid([
        (
            "Daily Transaction Limit",
            format_currency(stats.daily_transaction_limit),
        ),
        ("Monthly Volume Cap", format_currency(stats.monthly_volume_cap)),
        ("High Risk Threshold", format_currency(stats.high_risk_threshold)),
        ("Active Rules", count(stats.active_rules_count).to_string()),
        ("Active Merchants", count(stats.active_merchants).to_string()),
        ("Daily Usage", stats.usage_display()),
        ("Risk Alerts", count(stats.risk_alerts).to_string()),
        (
            "Avg Success Rate",
            stats
                .avg_success_rate
                .map_or_else(|| "N/A".to_owned(), |r| format!("{r:.1}%")),
        ),
    ])
}

pub fn render_transaction_limits(limits: &[GlobalLimit]) -> Node {
    let rows = limits
        .iter()
        .map(|l| {
            let name = l.name.as_deref().unwrap_or(&l.limit_type);
            row([
                Node::el("strong").text(format_limit_type_name(name)).into(),
                Node::text(format_limit_value(l.limit_value, &l.limit_type)),
                Node::text(format_period(l.period.as_deref().unwrap_or_default())),
                Node::text(
                    l.description
                        .clone()
                        .filter(|d| !d.trim().is_empty())
                        .unwrap_or_else(|| "All Merchants".to_owned()),
                ),
                status_badge(&l.status),
                Node::el("span").class("text-muted").text("\u{2014}").into(),
            ])
        })
        .collect();
    table_or_placeholder(
        &TRANSACTION_LIMIT_COLUMNS,
        rows,
        "No transaction limits configured",
    )
}

pub fn render_merchant_limits(limits: &[MerchantLimit]) -> Node {
    let rows = limits
        .iter()
        .map(|m| {
            let id = m.merchant.merchant_id.as_deref().unwrap_or("N/A");
            row([
                titled(m.merchant.display_name(), id),
                risk_badge(m.merchant.risk_level.as_deref().unwrap_or_default()),
                Node::text(format_currency(m.daily_limit)),
                Node::text(format_currency(m.weekly_limit)),
                Node::text(format_currency(m.monthly_limit)),
                Node::text(format_currency(m.per_transaction_limit)),
                status_badge(&m.status),
                Node::el("span").class("text-muted").text("\u{2014}").into(),
            ])
        })
        .collect();
    table_or_placeholder(&MERCHANT_LIMIT_COLUMNS, rows, "No merchant limits configured")
}

pub fn render_global_limits(limits: &[GlobalLimit]) -> Node {
    let rows = limits
        .iter()
        .map(|l| {
            let usage = Node::el("div")
                .child(Node::text(format_limit_value(l.current_usage, &l.limit_type)))
                .child(Node::el("div").class("text-muted small").text(format!(
                    "{:.1}% used",
                    l.usage_percentage.unwrap_or(0.0)
                )));
            let actions: Node = match l.id {
                Some(id) => Node::el("div")
                    .class("action-btns")
                    .child(action_button("edit-global-limit", id, "Edit"))
                    .child(action_button("delete-global-limit", id, "Delete"))
                    .into(),
                None => Node::text("\u{2014}"),
            };
            row([
                titled(
                    l.name.as_deref().unwrap_or("N/A"),
                    l.description.as_deref().unwrap_or_default(),
                ),
                badge(Badge::Info, or_na(Some(l.limit_type.as_str()))).into(),
                Node::text(format_limit_value(l.limit_value, &l.limit_type)),
                usage.into(),
                Node::text(format_period(l.period.as_deref().unwrap_or_default())),
                status_badge(&l.status),
                actions,
            ])
        })
        .collect();
    table_or_placeholder(&GLOBAL_LIMIT_COLUMNS, rows, "No global limits configured")
}

pub fn render_risk_thresholds(thresholds: &[RiskThreshold]) -> Node {
    let rows = thresholds
        .iter()
        .map(|t| {
            row([
                risk_badge(&t.risk_level),
                Node::text(or_na(t.description.as_deref())),
                Node::text(format_currency(t.daily_limit)),
                Node::text(format_currency(t.per_transaction_limit)),
                Node::text(format!("{}/hr", t.velocity_limit.unwrap_or(0))),
                Node::text(format!("{} merchants", t.merchant_count.unwrap_or(0))),
                status_badge(&t.status),
                Node::el("span").class("text-muted").text("\u{2014}").into(),
            ])
        })
        .collect();
    table_or_placeholder(&RISK_THRESHOLD_COLUMNS, rows, "No risk thresholds configured")
}

#[allow(clippy::cast_precision_loss)]
pub fn render_velocity_rules(rules: &[VelocityRule]) -> Node {
    let rows = rules
        .iter()
        .map(|r| {
            let thresholds = Node::el("div")
                .child(Node::el("div").text(format!(
                    "Max Txns: {}",
                    r.max_transactions.map_or_else(|| "N/A".to_owned(), |n| n.to_string())
                )))
                .child(Node::el("div").text(format!(
                    "Max Amount: {}",
                    format_currency(r.max_amount)
                )));
            let last = r
                .last_triggered_at
                .map_or_else(|| "Never".to_owned(), |t| format_date(t.inner().date_naive()));
            let triggers = Node::el("div")
                .child(Node::el("strong").text(format_grouped(r.trigger_count as f64)))
                .child(
                    Node::el("div")
                        .class("text-muted small")
                        .text(format!("Last: {last}")),
                );
            let (toggle_action, toggle_label) = if r.is_active() {
                ("deactivate-velocity-rule", "Deactivate")
            } else {
                ("activate-velocity-rule", "Activate")
            };
            row([
                titled(&r.rule_name, r.description.as_deref().unwrap_or_default()),
                thresholds.into(),
                Node::text(format!("{} minutes", r.time_window_minutes.unwrap_or(0))),
                risk_badge(&r.risk_level),
                triggers.into(),
                status_badge(&r.status),
                Node::el("div")
                    .class("action-btns")
                    .child(action_button(toggle_action, r.id, toggle_label))
                    .child(action_button("delete-velocity-rule", r.id, "Delete"))
                    .into(),
            ])
        })
        .collect();
    table_or_placeholder(&VELOCITY_RULE_COLUMNS, rows, "No velocity rules configured")
}

pub fn render_country_compliance(rules: &[CountryCompliance]) -> Node {
    let rows = rules
        .iter()
        .map(|c| {
            row([
                titled(
                    c.country_name.as_deref().unwrap_or(&c.country_code),
                    &c.country_code,
                ),
                Node::text(or_na(c.compliance_requirements.as_deref())),
                Node::text(or_na(c.transaction_restrictions.as_deref())),
                Node::text(or_na(c.required_documentation.as_deref())),
                status_badge(&c.status),
                Node::el("span").class("text-muted").text("\u{2014}").into(),
            ])
        })
        .collect();
    table_or_placeholder(
        &COUNTRY_COLUMNS,
        rows,
        "No country compliance rules configured",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colspan(node: &Node) -> Option<String> {
        node.find_all_tag("td")[0]
            .attr_value("colspan")
            .map(str::to_owned)
    }

    #[test]
    fn empty_tables_use_their_own_placeholder() {
        let cases = [
            (render_merchant_limits(&[]), "No merchant limits configured", "8"),
            (render_global_limits(&[]), "No global limits configured", "7"),
            (render_risk_thresholds(&[]), "No risk thresholds configured", "8"),
            (render_velocity_rules(&[]), "No velocity rules configured", "7"),
            (
                render_country_compliance(&[]),
                "No country compliance rules configured",
                "6",
            ),
            (
                render_transaction_limits(&[]),
                "No transaction limits configured",
                "6",
            ),
        ];
        for (node, message, span) in cases {
            assert_eq!(node.find_class("placeholder").unwrap().text_content(), message);
            assert_eq!(colspan(&node).as_deref(), Some(span), "{message}");
        }
    }

    #[test]
    fn transaction_limit_rows() {
        let limits: Vec<GlobalLimit> = serde_json::from_str(
            r#"[
                {"id":1,"name":"Daily Transaction Limit","limitType":"VOLUME","limitValue":1000000,"period":"DAY","status":"ACTIVE"},
                {"id":2,"limitType":"COUNT","limitValue":"5000","period":"HOUR","description":"High risk","status":"INACTIVE"}
            ]"#,
        )
        .unwrap();
        let text = render_transaction_limits(&limits).to_text();
        assert!(
            text.contains("Daily Transaction | $1.0M | 24 Hours | All Merchants | ACTIVE"),
            "{text}"
        );
        assert!(text.contains("COUNT | 5,000 | 1 Hour | High risk | INACTIVE"), "{text}");
    }

    #[test]
    fn global_limit_actions_need_an_id() {
        let limits: Vec<GlobalLimit> = serde_json::from_str(
            r#"[{"id":42,"name":"Volume","limitType":"VOLUME","limitValue":50000,"currentUsage":12000,"usagePercentage":24,"period":"DAY","status":"ACTIVE"},
                {"name":"Draft","limitType":"VOLUME","status":"INACTIVE"}]"#,
        )
        .unwrap();
        let node = render_global_limits(&limits);
        let buttons = node.find_all_tag("button");
        assert_eq!(buttons.len(), 2);
        assert_eq!(buttons[1].attr_value("data-action"), Some("delete-global-limit"));
        assert_eq!(buttons[1].attr_value("data-id"), Some("42"));
        assert!(node.to_text().contains("$12K 24.0% used"), "{}", node.to_text());
    }

    #[test]
    fn velocity_rule_row() {
        let rules: Vec<VelocityRule> = serde_json::from_str(
            r#"[{"id":9,"ruleName":"Burst","maxTransactions":20,"maxAmount":5000,"timeWindowMinutes":15,
                 "riskLevel":"HIGH","triggerCount":1234,"status":"INACTIVE"}]"#,
        )
        .unwrap();
        let node = render_velocity_rules(&rules);
        let text = node.to_text();
        assert!(text.contains("Max Txns: 20 Max Amount: $5K"), "{text}");
        assert!(text.contains("15 minutes | HIGH | 1,234 Last: Never | INACTIVE"), "{text}");
        assert_eq!(
            node.find_all_tag("button")[0].attr_value("data-action"),
            Some("activate-velocity-rule")
        );
    }

    #[test]
    fn threshold_and_country_rows() {
        let thresholds: Vec<RiskThreshold> = serde_json::from_str(
            r#"[{"riskLevel":"MEDIUM","dailyLimit":250000,"perTransactionLimit":10000,"velocityLimit":30,"merchantCount":12,"status":"ACTIVE"}]"#,
        )
        .unwrap();
        let text = render_risk_thresholds(&thresholds).to_text();
        assert!(text.contains("MEDIUM | N/A | $250K | $10K | 30/hr | 12 merchants | ACTIVE"), "{text}");

        let countries: Vec<CountryCompliance> = serde_json::from_str(
            r#"[{"countryCode":"CA","countryName":"Canada","complianceRequirements":"FINTRAC","status":"ACTIVE"}]"#,
        )
        .unwrap();
        let text = render_country_compliance(&countries).to_text();
        assert!(text.contains("Canada CA | FINTRAC | N/A | N/A | ACTIVE"), "{text}");
    }
}
