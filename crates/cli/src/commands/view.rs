use aml_console::{Console, View};
use clap::Args;

use crate::OutputFormat;
use crate::output::print_view;

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// View name: cases, case-queues, monitoring, risk-analytics,
    /// regulatory-reports, limits or calendar.
    pub name: String,
    /// Tab to open after the view loads.
    #[arg(long)]
    pub tab: Option<String>,
}

pub async fn run(console: &Console, args: &ViewArgs, format: OutputFormat) -> anyhow::Result<()> {
    let view = View::from_name(&args.name)
        .ok_or_else(|| anyhow::anyhow!("unknown view: {}", args.name))?;
    if view == View::CaseDetail {
        anyhow::bail!("use `amlctl cases show <id>` to open a case");
    }
    console.switch_view(view).await;
    if let Some(tab) = &args.tab {
        console.switch_tab(tab).await;
    }
    print_view(console, format)
}
