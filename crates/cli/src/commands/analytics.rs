use std::path::PathBuf;

use aml_console::{Console, View};
use aml_console_core::HeatmapKind;
use clap::{Args, ValueEnum};

use crate::OutputFormat;
use crate::output::{print_view, save};

#[derive(Args, Debug)]
pub struct AnalyticsArgs {
    /// Population the heatmap aggregates over.
    #[arg(long, value_enum, default_value = "customer")]
    pub kind: Kind,
    /// Window in days; the configured default when omitted.
    #[arg(long)]
    pub days: Option<u32>,
    /// Export the heatmap as CSV into this directory.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Kind {
    Customer,
    Merchant,
}

impl From<Kind> for HeatmapKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Customer => Self::Customer,
            Kind::Merchant => Self::Merchant,
        }
    }
}

pub async fn run(
    console: &Console,
    args: &AnalyticsArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    console.update(|s| {
        s.view = View::RiskAnalytics;
        s.heatmap_kind = args.kind.into();
    });
    match args.days {
        Some(days) => console.set_analytics_period(days).await?,
        None => console.load_risk_analytics().await,
    }
    print_view(console, format)?;
    if let Some(dir) = &args.output {
        save(&console.export_heatmap_csv()?, Some(dir))?;
    }
    Ok(())
}
