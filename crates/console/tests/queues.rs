mod common;

use aml_console::{ConsoleError, NoticeKind, PanelId, View};
use aml_console_core::NewQueue;
use common::{ScriptedTransport, console};

const OVERVIEW: &str = r#"[
    {"id":1,"queueName":"Sanctions","targetRole":"SENIOR_ANALYST","minPriority":"HIGH","maxQueueSize":50,
     "autoAssign":true,"enabled":true,"queuedNewCount":4,"createdAt":"2024-01-15T08:00:00Z"},
    {"id":2,"queueName":"Fraud","enabled":false,"autoAssign":false,"queuedNewCount":0}
]"#;

fn new_queue(name: &str, role: &str) -> NewQueue {
    NewQueue {
        queue_name: name.to_owned(),
        target_role: role.to_owned(),
        min_priority: Some("  ".to_owned()),
        max_queue_size: None,
        auto_assign: true,
        enabled: true,
    }
}

#[tokio::test]
async fn overview_renders_totals_and_exports() {
    let transport = ScriptedTransport::new();
    transport.on("GET cases/queues/overview", 200, OVERVIEW);
    let console = console(&transport);

    console.switch_view(View::CaseQueues).await;

    let content = console.panel(PanelId::Queues).content().cloned().unwrap();
    let text = content.to_text();
    assert!(text.starts_with("Total Queues 2\nEnabled 1\nAuto-Assign 1\nQueued Cases 4"), "{text}");
    let csv = console.export_queues_csv().unwrap();
    assert_eq!(csv.filename, "case_queues_2024-03-10.csv");
    assert_eq!(csv.body.lines().count(), 3);
}

#[tokio::test]
async fn export_before_load_is_refused() {
    let transport = ScriptedTransport::new();
    let console = console(&transport);
    let err = console.export_queues_csv().unwrap_err();
    assert_eq!(
        err.to_string(),
        "No queue data available to export. Refresh the view first."
    );
}

#[tokio::test]
async fn create_validates_then_posts_and_reloads() {
    let transport = ScriptedTransport::new();
    transport
        .on("POST cases/queues", 201, "{}")
        .on("GET cases/queues/overview", 200, OVERVIEW);
    let console = console(&transport);

    let err = console.create_queue(&new_queue(" ", "ANALYST")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(ref m) if m == "Queue name is required."));
    let err = console.create_queue(&new_queue("PEP", "")).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(ref m) if m == "Target role is required."));
    assert!(transport.requests().is_empty());

    console.create_queue(&new_queue(" PEP ", "ANALYST")).await.unwrap();
    assert_eq!(
        transport.requests(),
        ["POST cases/queues", "GET cases/queues/overview"]
    );
    assert_eq!(
        console.panel(PanelId::Queues).notice.unwrap().kind,
        NoticeKind::Success
    );
}

#[tokio::test]
async fn toggle_and_process_hit_their_endpoints() {
    let transport = ScriptedTransport::new();
    transport
        .on("PATCH cases/queues/2", 200, "{}")
        .on("POST cases/queues/1/process", 200, "{}")
        .on("GET cases/queues/overview", 200, OVERVIEW);
    let console = console(&transport);

    console.set_queue_enabled(2, true).await.unwrap();
    console.process_queue(1).await.unwrap();

    assert_eq!(
        transport.requests(),
        [
            "PATCH cases/queues/2",
            "GET cases/queues/overview",
            "POST cases/queues/1/process",
            "GET cases/queues/overview"
        ]
    );
}
