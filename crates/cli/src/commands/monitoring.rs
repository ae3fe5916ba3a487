use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use aml_console::{Console, MonitoringTab, PanelId, PanelState, RefreshLoop, View};
use clap::{Args, Subcommand, ValueEnum};
use tracing::info;

use crate::OutputFormat;
use crate::output::{format_node, print_panels, save};

#[derive(Args, Debug)]
pub struct MonitoringArgs {
    #[command(subcommand)]
    pub command: MonitoringCommand,
}

#[derive(Subcommand, Debug)]
pub enum MonitoringCommand {
    /// Live transaction feed.
    Live {
        /// Risk level filter (`LOW`, `MEDIUM`, `HIGH`, `CRITICAL` or `All`).
        #[arg(long)]
        risk_level: Option<String>,
        /// Decision filter (`APPROVED`, `DECLINED`, `REVIEW` or `All`).
        #[arg(long)]
        decision: Option<String>,
        /// Keep refreshing until interrupted.
        #[arg(long)]
        watch: bool,
    },
    /// Stats, risk distribution, indicators and recent activity.
    Analytics,
    /// Suspicious activity reports.
    Sars,
    /// Generate a report.
    Report {
        kind: ReportKind,
        /// Also export the report as JSON into this directory.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportKind {
    Declines,
    Summary,
}

pub async fn run(
    console: Console,
    args: &MonitoringArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    console.update(|s| s.view = View::Monitoring);
    match &args.command {
        MonitoringCommand::Live {
            risk_level,
            decision,
            watch,
        } => {
            console.update(|s| s.monitoring_tabs.set(MonitoringTab::Live));
            console
                .filter_transactions(risk_level.as_deref(), decision.as_deref())
                .await;
            if *watch {
                return watch_live_feed(Arc::new(console), format).await;
            }
            print_panels(&console, &[PanelId::LiveFeed], format)
        }
        MonitoringCommand::Analytics => {
            console.switch_tab("analytics").await;
            print_panels(
                &console,
                &[
                    PanelId::MonitoringStats,
                    PanelId::RiskDistribution,
                    PanelId::RiskIndicators,
                    PanelId::RecentActivity,
                ],
                format,
            )
        }
        MonitoringCommand::Sars => {
            console.switch_tab("sars").await;
            print_panels(&console, &[PanelId::Sars], format)
        }
        MonitoringCommand::Report { kind, output } => {
            console.update(|s| s.monitoring_tabs.set(MonitoringTab::Reports));
            match kind {
                ReportKind::Declines => console.generate_decline_report().await,
                ReportKind::Summary => console.generate_monitoring_summary().await,
            };
            print_panels(&console, &[PanelId::MonitoringReport], format)?;
            if let Some(dir) = output {
                save(&console.export_monitoring_report()?, Some(dir))?;
            }
            Ok(())
        }
    }
}

/// Print the feed each time the refresh loop commits a new version of it,
/// until Ctrl-C.
async fn watch_live_feed(console: Arc<Console>, format: OutputFormat) -> anyhow::Result<()> {
    let refresh = RefreshLoop::spawn(&console);
    let mut printed = None;
    let mut poll = tokio::time::interval(Duration::from_millis(250));
    info!(
        every_secs = console.config().live_refresh().as_secs(),
        "watching live feed, Ctrl-C to stop"
    );
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = poll.tick() => {
                let panel = console.panel(PanelId::LiveFeed);
                if matches!(panel.state, PanelState::Loading)
                    || printed == Some(panel.generation())
                {
                    continue;
                }
                printed = Some(panel.generation());
                println!("{}", format_node(&console.render_panel(PanelId::LiveFeed), format)?);
            }
        }
    }
    refresh.shutdown().await;
    Ok(())
}
