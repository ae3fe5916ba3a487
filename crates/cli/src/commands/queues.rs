use std::path::PathBuf;

use aml_console::{Console, PanelId, View};
use aml_console_core::NewQueue;
use clap::{Args, Subcommand};

use crate::OutputFormat;
use crate::output::{print_panels, save};

#[derive(Args, Debug)]
pub struct QueuesArgs {
    #[command(subcommand)]
    pub command: QueuesCommand,
}

#[derive(Subcommand, Debug)]
pub enum QueuesCommand {
    /// Show the queue overview.
    List,
    /// Create a queue.
    Create {
        /// Queue name.
        #[arg(long)]
        name: String,
        /// Role whose members receive cases from the queue.
        #[arg(long)]
        role: String,
        /// Lowest case priority accepted (e.g. `HIGH`).
        #[arg(long)]
        min_priority: Option<String>,
        /// Maximum cases held.
        #[arg(long)]
        max_size: Option<u64>,
        /// Assign cases automatically.
        #[arg(long)]
        auto_assign: bool,
        /// Create the queue disabled.
        #[arg(long)]
        disabled: bool,
    },
    /// Enable a queue.
    Enable { id: i64 },
    /// Disable a queue.
    Disable { id: i64 },
    /// Run auto-assignment for a queue now.
    Process { id: i64 },
    /// Export the overview as CSV.
    Export {
        /// Directory to write into; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(console: &Console, args: &QueuesArgs, format: OutputFormat) -> anyhow::Result<()> {
    console.update(|s| s.view = View::CaseQueues);
    match &args.command {
        QueuesCommand::List => {
            console.load_queues().await;
        }
        QueuesCommand::Create {
            name,
            role,
            min_priority,
            max_size,
            auto_assign,
            disabled,
        } => {
            let queue = NewQueue {
                queue_name: name.clone(),
                target_role: role.clone(),
                min_priority: min_priority.clone(),
                max_queue_size: *max_size,
                auto_assign: *auto_assign,
                enabled: !disabled,
            };
            console.create_queue(&queue).await?;
        }
        QueuesCommand::Enable { id } => console.set_queue_enabled(*id, true).await?,
        QueuesCommand::Disable { id } => console.set_queue_enabled(*id, false).await?,
        QueuesCommand::Process { id } => console.process_queue(*id).await?,
        QueuesCommand::Export { output } => {
            console.load_queues().await;
            let download = console.export_queues_csv()?;
            return save(&download, output.as_deref());
        }
    }
    print_panels(console, &[PanelId::Queues], format)
}
