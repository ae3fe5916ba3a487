use aml_console::{Console, PanelId, View};
use clap::{Args, Subcommand};

use crate::OutputFormat;
use crate::output::{print_panels, print_view};

#[derive(Args, Debug)]
pub struct CasesArgs {
    #[command(subcommand)]
    pub command: CasesCommand,
}

#[derive(Subcommand, Debug)]
pub enum CasesCommand {
    /// List cases with the stats widget.
    List {
        /// Only cases in this status (e.g. `NEW`, `ESCALATED`).
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one case.
    Show {
        /// Case ID.
        id: i64,
        /// Detail tab to open instead of info: timeline or activities.
        #[arg(long)]
        tab: Option<String>,
        /// Hops of the entity network to fetch.
        #[arg(long)]
        depth: Option<u32>,
        /// Activities page, zero based.
        #[arg(long)]
        page: Option<u32>,
    },
    /// Escalate a case.
    Escalate {
        /// Case ID.
        id: i64,
        /// Why the case is escalated.
        #[arg(long)]
        reason: String,
    },
}

pub async fn run(console: &Console, args: &CasesArgs, format: OutputFormat) -> anyhow::Result<()> {
    match &args.command {
        CasesCommand::List { status } => {
            console.update(|s| s.view = View::Cases);
            console.filter_cases(status.as_deref()).await;
            print_view(console, format)
        }
        CasesCommand::Show {
            id,
            tab,
            depth,
            page,
        } => {
            console.open_case(*id).await;
            if let Some(depth) = depth {
                console.set_network_depth(*depth).await?;
            }
            if let Some(tab) = tab {
                console.switch_tab(tab).await;
            }
            if let Some(page) = page {
                console.set_activities_page(*page).await;
            }
            print_view(console, format)
        }
        CasesCommand::Escalate { id, reason } => {
            console.open_case(*id).await;
            console.escalate_case(reason).await?;
            print_panels(console, &[PanelId::CaseInfo], format)
        }
    }
}
