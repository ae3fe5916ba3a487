//! Case work queues.

use aml_console_core::export::{Download, queues_csv};
use aml_console_core::format::format_datetime;
use aml_console_core::queue::QueueStats;
use aml_console_core::ui::{badge, row, table_or_placeholder};
use aml_console_core::{Badge, CaseQueue, NewQueue, Node};

use super::stats_grid;
use crate::panel::{PanelData, PanelId, Rendered};
use crate::{Console, ConsoleError};

pub const QUEUE_COLUMNS: [&str; 9] = [
    "Queue",
    "Target Role",
    "Min Priority",
    "Max Size",
    "Auto Assign",
    "Status",
    "Queued",
    "Created",
    "Actions",
];

impl Console {
    /// Queue overview with totals. Returns whether the result was committed.
    pub async fn load_queues(&self) -> bool {
        self.load(
            PanelId::Queues,
            self.client.queue_overview(),
            |queues: Vec<CaseQueue>| {
                let content = render_queues(&queues);
                Rendered::with_data(content, PanelData::Queues(queues))
            },
        )
        .await
    }

    pub async fn create_queue(&self, queue: &NewQueue) -> Result<(), ConsoleError> {
        if queue.queue_name.trim().is_empty() {
            return Err(self.reject(PanelId::Queues, "Queue name is required."));
        }
        if queue.target_role.trim().is_empty() {
            return Err(self.reject(PanelId::Queues, "Target role is required."));
        }
        let queue = NewQueue {
            queue_name: queue.queue_name.trim().to_owned(),
            target_role: queue.target_role.trim().to_owned(),
            min_priority: queue
                .min_priority
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_owned),
            ..queue.clone()
        };
        self.act(
            PanelId::Queues,
            "create queue",
            "Queue created",
            self.client.create_queue(&queue),
        )
        .await?;
        self.load_queues().await;
        Ok(())
    }

    pub async fn set_queue_enabled(&self, id: i64, enabled: bool) -> Result<(), ConsoleError> {
        let success = if enabled { "Queue enabled" } else { "Queue disabled" };
        self.act(
            PanelId::Queues,
            "update queue",
            success,
            self.client.set_queue_enabled(id, enabled),
        )
        .await?;
        self.load_queues().await;
        Ok(())
    }

    /// Run auto-assignment for one queue now.
    pub async fn process_queue(&self, id: i64) -> Result<(), ConsoleError> {
        self.act(
            PanelId::Queues,
            "process queue",
            "Queue processed",
            self.client.process_queue(id),
        )
        .await?;
        self.load_queues().await;
        Ok(())
    }

    /// CSV of the last loaded overview.
    pub fn export_queues_csv(&self) -> Result<Download, ConsoleError> {
        let today = self.today();
        self.panels
            .with_data(PanelId::Queues, |data| match data {
                Some(PanelData::Queues(queues)) => queues_csv(queues, today),
                _ => None,
            })
            .ok_or_else(|| {
                ConsoleError::NoData(
                    "No queue data available to export. Refresh the view first.".into(),
                )
            })
    }
}

fn queue_row(q: &CaseQueue) -> Node {
    let auto = if q.auto_assign {
        badge(Badge::Info, "YES")
    } else {
        badge(Badge::Warning, "NO")
    };
    let status = if q.enabled {
        badge(Badge::Success, "ENABLED")
    } else {
        badge(Badge::Secondary, "DISABLED")
    };
    let toggle = Node::el("button")
        .class("action-btn")
        .attr("data-action", "toggle-queue")
        .attr("data-queue-id", q.id.to_string())
        .attr("data-enabled", (!q.enabled).to_string())
        .text(if q.enabled { "Disable" } else { "Enable" });
    let process = Node::el("button")
        .class("action-btn")
        .attr("data-action", "process-queue")
        .attr("data-queue-id", q.id.to_string())
        .text("Process");
    row([
        Node::el("span").class("case-id").text(q.queue_name.clone()).into(),
        Node::text(
            q.target_role
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "N/A".to_owned()),
        ),
        Node::text(
            q.min_priority
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "None".to_owned()),
        ),
        Node::text(
            q.max_queue_size
                .map_or_else(|| "\u{2014}".to_owned(), |s| s.to_string()),
        ),
        auto.into(),
        status.into(),
        Node::el("strong").text(q.queued_new_count.to_string()).into(),
        Node::text(
            q.created_at
                .map_or_else(|| "N/A".to_owned(), |t| format_datetime(t.inner())),
        ),
        Node::el("div")
            .class("action-btns")
            .child(toggle)
            .child(process)
            .into(),
    ])
}

pub fn render_queues(queues: &[CaseQueue]) -> Node {
    let stats = QueueStats::compute(queues);
    Node::el("div")
        .class("case-queues")
        .child(stats_grid([
            ("Total Queues", stats.queues.to_string()),
            ("Enabled", stats.enabled.to_string()),
            ("Auto-Assign", stats.auto_assign.to_string()),
            ("Queued Cases", stats.queued.to_string()),
        ]))
        .child(table_or_placeholder(
            &QUEUE_COLUMNS,
            queues.iter().map(queue_row).collect(),
            "No queues found.",
        ))
        .into()
}
