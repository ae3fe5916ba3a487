use std::path::PathBuf;

use aml_console::{Console, View};
use aml_console_core::RegulatoryReportKind;
use clap::{Args, ValueEnum};

use crate::OutputFormat;
use crate::output::{print_view, save};

#[derive(Args, Debug)]
pub struct ReportsArgs {
    /// Report to generate for the last month.
    #[arg(value_enum)]
    pub kind: Kind,
    /// Export the report into this directory.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Export format.
    #[arg(long, value_enum, default_value = "csv")]
    pub export: ExportFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Kind {
    Ctr,
    Lctr,
    Iftr,
}

impl From<Kind> for RegulatoryReportKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Ctr => Self::Ctr,
            Kind::Lctr => Self::Lctr,
            Kind::Iftr => Self::Iftr,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

pub async fn run(console: &Console, args: &ReportsArgs, format: OutputFormat) -> anyhow::Result<()> {
    console.update(|s| s.view = View::RegulatoryReports);
    console.set_report_kind(args.kind.into()).await;
    print_view(console, format)?;
    if let Some(dir) = &args.output {
        let download = match args.export {
            ExportFormat::Csv => console.export_regulatory_csv()?,
            ExportFormat::Json => console.export_regulatory_json()?,
        };
        save(&download, Some(dir))?;
    }
    Ok(())
}
