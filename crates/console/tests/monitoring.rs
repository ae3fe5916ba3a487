mod common;

use aml_console::{ConsoleError, MonitoringTab, PanelId, View};
use common::{ScriptedTransport, console};

const FEED: &str = r#"[
    {"transactionId":"T-1","amount":120.5,"currency":"USD","riskScore":82,"decision":"DECLINED","createdAt":"2024-03-10T11:00:00Z"},
    {"transactionId":"T-2","amount":40,"currency":"USD","riskScore":12,"decision":"APPROVED","createdAt":"2024-03-10T11:55:00Z"}
]"#;

#[tokio::test]
async fn monitoring_view_loads_the_live_feed_with_all_filters() {
    let transport = ScriptedTransport::new();
    transport.on("GET monitoring/transactions", 200, FEED);
    let console = console(&transport);

    console.switch_view(View::Monitoring).await;

    assert_eq!(
        transport.requests(),
        ["GET monitoring/transactions?riskLevel=All&decision=All&limit=100"]
    );
    let feed = console.panel(PanelId::LiveFeed).content().cloned().unwrap();
    let text = feed.to_text();
    let newest = text.find("T-2").unwrap();
    let older = text.find("T-1").unwrap();
    assert!(newest < older, "{text}");
}

#[tokio::test]
async fn filters_are_read_at_call_time() {
    let transport = ScriptedTransport::new();
    transport.on("GET monitoring/transactions", 200, "[]");
    let console = console(&transport);

    console.filter_transactions(Some("HIGH"), Some("all")).await;

    assert_eq!(
        transport.requests(),
        ["GET monitoring/transactions?riskLevel=HIGH&decision=All&limit=100"]
    );
    let feed = console.panel(PanelId::LiveFeed).content().cloned().unwrap();
    assert_eq!(feed.to_text(), "No transactions found matching the filters.");
}

#[tokio::test]
async fn pausing_only_affects_the_periodic_refresh() {
    let transport = ScriptedTransport::new();
    transport.on("GET monitoring/transactions", 200, "[]");
    let console = console(&transport);
    console.update(|s| s.view = View::Monitoring);

    console.pause_live_feed();
    assert!(console.is_live_paused());
    assert!(!aml_console::live_feed_due(&console.state()));

    assert!(console.load_live_feed().await);
    console.resume_live_feed();
    assert!(aml_console::live_feed_due(&console.state()));
}

#[tokio::test]
async fn analytics_tab_loads_four_widgets() {
    let transport = ScriptedTransport::new();
    transport
        .on("GET monitoring/dashboard/stats", 200, r#"{"totalMonitored":1200,"flagged":36,"flagRate":3}"#)
        .on("GET monitoring/risk-distribution", 200, r#"{"low":70,"medium":20,"high":10}"#)
        .on("GET monitoring/risk-indicators", 200, "[]")
        .on("GET monitoring/recent-activity", 200, "[]");
    let console = console(&transport);
    console.update(|s| s.view = View::Monitoring);

    console.switch_tab("analytics").await;

    assert_eq!(console.state().monitoring_tabs.active(), MonitoringTab::Analytics);
    assert_eq!(transport.requests().len(), 4);
    let stats = console.panel(PanelId::MonitoringStats).content().cloned().unwrap();
    assert!(stats.to_text().contains("3.0% flag rate"), "{}", stats.to_text());
}

#[tokio::test]
async fn report_export_follows_the_last_generated_report() {
    let transport = ScriptedTransport::new();
    transport
        .on("GET monitoring/reports/declines", 200, r#"{"totalDeclines":17}"#)
        .on("GET monitoring/reports/summary", 200, r#"{"totalMonitored":900}"#);
    let console = console(&transport);

    let err = console.export_monitoring_report().unwrap_err();
    assert!(matches!(err, ConsoleError::NoData(ref m) if m == "Generate a report first."));

    assert!(console.generate_decline_report().await);
    let download = console.export_monitoring_report().unwrap();
    assert_eq!(download.filename, "decline_report_2024-03-10.json");
    assert!(download.body.contains("\"totalDeclines\": 17.0"), "{}", download.body);

    assert!(console.generate_monitoring_summary().await);
    let download = console.export_monitoring_report().unwrap();
    assert_eq!(download.filename, "monitoring_report_2024-03-10.json");
}
