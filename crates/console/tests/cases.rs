mod common;

use aml_console::{ConsoleError, NoticeKind, PanelId, View};
use common::{ScriptedTransport, console};

const CASE: &str = r#"{"id":12,"caseReference":"CASE-2024-012","merchantId":"M-77","priority":"HIGH",
    "status":"IN_PROGRESS","slaDeadline":"2024-03-08T00:00:00Z","daysOpen":9}"#;

#[tokio::test]
async fn empty_case_list_shows_placeholder_and_zero_stats() {
    let transport = ScriptedTransport::new();
    transport.on("GET compliance/cases", 200, "[]");
    let console = console(&transport);

    console.switch_view(View::Cases).await;

    let list = console.panel(PanelId::CaseList).content().cloned().unwrap();
    let placeholder = list.find_class("placeholder").unwrap();
    assert_eq!(placeholder.text_content(), "No cases configured");
    let stats = console.panel(PanelId::CaseStats).content().cloned().unwrap();
    assert!(stats.to_text().contains("Open Cases 0"), "{}", stats.to_text());
    assert_eq!(transport.requests(), ["GET compliance/cases"]);
}

#[tokio::test]
async fn status_filter_is_sent_and_blank_clears_it() {
    let transport = ScriptedTransport::new();
    transport.on("GET compliance/cases", 200, &format!("[{CASE}]"));
    let console = console(&transport);

    console.filter_cases(Some("ESCALATED")).await;
    console.filter_cases(Some("  ")).await;

    assert_eq!(
        transport.requests(),
        ["GET compliance/cases?status=ESCALATED", "GET compliance/cases"]
    );
    let list = console.panel(PanelId::CaseList).content().cloned().unwrap();
    let text = list.to_text();
    assert!(text.contains("CASE-2024-012"), "{text}");
    assert!(text.contains("OVERDUE"), "{text}");
}

#[tokio::test]
async fn escalation_reloads_the_case_detail() {
    let transport = ScriptedTransport::new();
    transport
        .on("POST cases/12/escalate", 200, "{}")
        .on("GET compliance/cases/12", 200, CASE)
        .on("GET cases/12/timeline", 200, r#"{"events":[]}"#)
        .on("GET cases/12/activities", 200, r#"{"content":[],"totalElements":0}"#);
    let console = console(&transport);
    console.update(|s| s.case_id = Some(12));

    console.escalate_case("  structuring pattern  ").await.unwrap();

    let log = transport.requests();
    assert_eq!(log[0], "POST cases/12/escalate");
    assert_eq!(log.len(), 4, "{log:?}");
    assert_eq!(transport.count("GET compliance/cases/12"), 1);
    assert_eq!(transport.count("GET cases/12/timeline"), 1);
    assert_eq!(transport.count("GET cases/12/activities?page=0&size=20"), 1);
    let notice = console.panel(PanelId::CaseInfo).notice.unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, "Case escalated successfully");
}

#[tokio::test]
async fn escalation_needs_a_case_and_a_reason() {
    let transport = ScriptedTransport::new();
    let console = console(&transport);

    let err = console.escalate_case("reason").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(ref m) if m == "Please select a case first"));

    console.update(|s| s.case_id = Some(12));
    let err = console.escalate_case("   ").await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(ref m) if m == "Escalation reason is required."));

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn opening_a_case_loads_every_detail_panel() {
    let transport = ScriptedTransport::new();
    transport
        .on("GET compliance/cases/12", 200, CASE)
        .on("GET cases/12/timeline", 200, r#"{"events":[]}"#)
        .on("GET cases/12/activities", 200, r#"{"content":[]}"#)
        .on("GET cases/12/network", 200, r#"{"nodes":[],"edges":[]}"#);
    let console = console(&transport);

    console.open_case(12).await;

    assert_eq!(console.view(), View::CaseDetail);
    assert_eq!(transport.count("GET cases/12/network?depth=2"), 1);
    let info = console.panel(PanelId::CaseInfo).content().cloned().unwrap();
    assert!(info.to_text().contains("CASE-2024-012"));
    let timeline = console.panel(PanelId::CaseTimeline).content().cloned().unwrap();
    assert!(timeline.to_text().contains("No events found for this case"));
}
