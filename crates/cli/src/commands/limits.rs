use aml_console::{Console, LimitsTab, PanelId, View};
use aml_console_core::{GlobalLimitRequest, LimitStatus};
use clap::{Args, Subcommand};

use crate::OutputFormat;
use crate::output::{print_panels, print_view};

#[derive(Args, Debug)]
pub struct LimitsArgs {
    #[command(subcommand)]
    pub command: LimitsCommand,
}

#[derive(Subcommand, Debug)]
pub enum LimitsCommand {
    /// Show the stats, the transaction limits and one tab.
    Show {
        /// merchant-limits, global-limits, risk-thresholds, velocity-rules
        /// or country-compliance.
        #[arg(long)]
        tab: Option<String>,
    },
    /// Create a global limit.
    CreateGlobal(GlobalLimitFields),
    /// Update a global limit; omitted fields keep their current value.
    UpdateGlobal {
        id: i64,
        #[command(flatten)]
        fields: GlobalLimitFields,
    },
    /// Delete a global limit.
    DeleteGlobal { id: i64 },
    /// Activate a velocity rule.
    ActivateRule { id: i64 },
    /// Deactivate a velocity rule.
    DeactivateRule { id: i64 },
    /// Delete a velocity rule.
    DeleteRule { id: i64 },
}

#[derive(Args, Debug, Default)]
pub struct GlobalLimitFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// e.g. `VOLUME`, `COUNT`, `AMOUNT`.
    #[arg(long = "type")]
    pub limit_type: Option<String>,
    #[arg(long)]
    pub value: Option<f64>,
    /// e.g. `DAY`, `WEEK`, `MONTH`.
    #[arg(long)]
    pub period: Option<String>,
    /// `ACTIVE` or `INACTIVE`.
    #[arg(long, value_parser = parse_status)]
    pub status: Option<LimitStatus>,
}

fn parse_status(raw: &str) -> Result<LimitStatus, String> {
    LimitStatus::parse(raw).ok_or_else(|| format!("expected ACTIVE or INACTIVE, got {raw}"))
}

impl GlobalLimitFields {
    fn apply(&self, mut req: GlobalLimitRequest) -> GlobalLimitRequest {
        if let Some(name) = &self.name {
            req.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            req.description.clone_from(description);
        }
        if let Some(limit_type) = &self.limit_type {
            req.limit_type.clone_from(limit_type);
        }
        if self.value.is_some() {
            req.limit_value = self.value;
        }
        if let Some(period) = &self.period {
            req.period.clone_from(period);
        }
        if let Some(status) = self.status {
            req.status = status;
        }
        req
    }
}

pub async fn run(console: &Console, args: &LimitsArgs, format: OutputFormat) -> anyhow::Result<()> {
    console.update(|s| s.view = View::Limits);
    match &args.command {
        LimitsCommand::Show { tab } => {
            console.switch_view(View::Limits).await;
            if let Some(tab) = tab {
                console.switch_tab(tab).await;
            }
            return print_view(console, format);
        }
        LimitsCommand::CreateGlobal(fields) => {
            console.cancel_limit_edit();
            let req = fields.apply(GlobalLimitRequest::default());
            console.save_global_limit(&req).await?;
        }
        LimitsCommand::UpdateGlobal { id, fields } => {
            console.load_global_limits().await;
            let current = console.edit_global_limit(*id)?;
            console.save_global_limit(&fields.apply(current)).await?;
        }
        LimitsCommand::DeleteGlobal { id } => console.delete_global_limit(*id).await?,
        LimitsCommand::ActivateRule { id } => {
            console.set_velocity_rule_status(*id, LimitStatus::Active).await?;
        }
        LimitsCommand::DeactivateRule { id } => {
            console.set_velocity_rule_status(*id, LimitStatus::Inactive).await?;
        }
        LimitsCommand::DeleteRule { id } => console.delete_velocity_rule(*id).await?,
    }
    let panel = match &args.command {
        LimitsCommand::ActivateRule { .. }
        | LimitsCommand::DeactivateRule { .. }
        | LimitsCommand::DeleteRule { .. } => {
            console.update(|s| s.limits_tabs.set(LimitsTab::VelocityRules));
            PanelId::VelocityRules
        }
        _ => {
            console.update(|s| s.limits_tabs.set(LimitsTab::GlobalLimits));
            PanelId::GlobalLimits
        }
    };
    print_panels(console, &[panel], format)
}
