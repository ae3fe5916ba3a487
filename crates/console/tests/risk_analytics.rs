mod common;

use std::time::Duration;

use aml_console::{ConsoleError, PanelData, PanelId, PanelState, View};
use aml_console_core::HeatmapKind;
use common::{ScriptedTransport, console};

#[tokio::test(start_paused = true)]
async fn last_issued_heatmap_wins() {
    let transport = ScriptedTransport::new();
    transport
        .on_delayed(
            "GET analytics/risk/heatmap/customer",
            Duration::from_millis(500),
            200,
            r#"{"111":{"caseCount":3,"averageRiskScore":0.9}}"#,
        )
        .on_delayed(
            "GET analytics/risk/heatmap/customer",
            Duration::from_millis(10),
            200,
            r#"{"222":{"caseCount":1,"averageRiskScore":0.2}}"#,
        );
    let console = console(&transport);

    let (first, second) = futures::join!(console.load_heatmap(), console.load_heatmap());

    assert!(!first, "the older response must be dropped");
    assert!(second);
    let text = console
        .panel(PanelId::Heatmap)
        .content()
        .unwrap()
        .to_text();
    assert!(text.contains("222"), "{text}");
    assert!(!text.contains("111"), "{text}");
}

#[tokio::test(start_paused = true)]
async fn last_selected_period_wins() {
    let transport = ScriptedTransport::new();
    transport
        .on_delayed(
            "GET analytics/risk/heatmap/customer",
            Duration::from_millis(10),
            200,
            r#"{"777":{"caseCount":7,"averageRiskScore":0.3}}"#,
        )
        .on_delayed(
            "GET analytics/risk/heatmap/customer",
            Duration::from_millis(500),
            200,
            r#"{"999":{"caseCount":9,"averageRiskScore":0.9}}"#,
        )
        .on("GET analytics/risk/trends", 200, "{}")
        .on("GET analytics/risk/false-positive-rate", 200, "{}");
    let console = console(&transport);

    let (week, quarter) = futures::join!(
        console.set_analytics_period(7),
        console.set_analytics_period(90),
    );
    week.unwrap();
    quarter.unwrap();

    assert_eq!(console.state().analytics_period_days, 90);
    // The 7-day answer arrives first and is dropped.
    let text = console
        .panel(PanelId::Heatmap)
        .content()
        .unwrap()
        .to_text();
    assert!(text.contains("999"), "{text}");
    assert!(!text.contains("777"), "{text}");

    let heatmaps: Vec<String> = transport
        .requests()
        .into_iter()
        .filter(|r| r.starts_with("GET analytics/risk/heatmap/customer"))
        .collect();
    assert_eq!(heatmaps.len(), 2);
    assert!(heatmaps[0].contains("startDate=2024-03-03T12%3A00%3A00.000Z"), "{heatmaps:?}");
    assert!(heatmaps[1].contains("startDate=2023-12-11T12%3A00%3A00.000Z"), "{heatmaps:?}");
}

#[tokio::test(start_paused = true)]
async fn stale_failure_does_not_replace_fresh_data() {
    let transport = ScriptedTransport::new();
    transport
        .on_delayed(
            "GET analytics/risk/heatmap/customer",
            Duration::from_millis(300),
            500,
            "slow and broken",
        )
        .on(
            "GET analytics/risk/heatmap/customer",
            200,
            r#"{"9":{"caseCount":2,"averageRiskScore":0.5}}"#,
        );
    let console = console(&transport);

    let (first, second) = futures::join!(console.load_heatmap(), console.load_heatmap());

    assert!(!first);
    assert!(second);
    assert!(console.panel(PanelId::Heatmap).content().is_some());
}

#[tokio::test]
async fn analytics_view_loads_three_panels_for_the_period() {
    let transport = ScriptedTransport::new();
    transport
        .on("GET analytics/risk/heatmap/customer", 200, "{}")
        .on(
            "GET analytics/risk/trends",
            200,
            r#"{"weeklyTrends":{"2024-W09":4},"trendDirection":"STABLE"}"#,
        )
        .on(
            "GET analytics/risk/false-positive-rate",
            200,
            r#"{"falsePositiveRate":3.14159}"#,
        );
    let console = console(&transport);

    console.switch_view(View::RiskAnalytics).await;

    assert_eq!(transport.requests().len(), 3);
    // Thirty days back from 2024-03-10 12:00.
    let expected = "startDate=2024-02-09T12%3A00%3A00.000Z";
    assert!(
        transport.requests().iter().all(|r| r.contains(expected)),
        "{:?}",
        transport.requests()
    );
    let heatmap = console.panel(PanelId::Heatmap).content().cloned().unwrap();
    assert!(heatmap.to_text().contains("No risk data available"));
    let rate = console
        .panel(PanelId::FalsePositiveRate)
        .content()
        .cloned()
        .unwrap();
    assert!(rate.to_text().contains("3.14%"));
    let trends = console.panel(PanelId::RiskTrends).content().cloned().unwrap();
    assert!(trends.to_text().starts_with("Trend: STABLE"));
}

#[tokio::test]
async fn merchant_heatmap_exports_csv() {
    let transport = ScriptedTransport::new();
    transport.on(
        "GET analytics/risk/heatmap/merchant",
        200,
        r#"{"M-1":{"caseCount":4,"averageRiskScore":0.75}}"#,
    );
    let console = console(&transport);

    let err = console.export_heatmap_csv().unwrap_err();
    assert!(matches!(err, ConsoleError::NoData(_)));

    console.set_heatmap_kind(HeatmapKind::Merchant).await;
    console.panels().with_data(PanelId::Heatmap, |data| {
        assert!(matches!(data, Some(PanelData::Heatmap(h)) if h.kind == HeatmapKind::Merchant));
    });

    let download = console.export_heatmap_csv().unwrap();
    assert_eq!(download.filename, "risk_heatmap_merchant_2024-03-10.csv");
    assert_eq!(
        download.body,
        "merchantId,caseCount,averageRiskScore,riskLevel\nM-1,4,0.75,HIGH\n"
    );
}

#[tokio::test]
async fn zero_day_period_is_rejected() {
    let transport = ScriptedTransport::new();
    let console = console(&transport);
    let err = console.set_analytics_period(0).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
    assert!(transport.requests().is_empty());
    assert_eq!(console.state().analytics_period_days, 30);
}

#[tokio::test]
async fn oversized_period_is_rejected() {
    let transport = ScriptedTransport::new();
    let console = console(&transport);
    let err = console.set_analytics_period(200_000_000).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
    assert!(transport.requests().is_empty());
    assert_eq!(console.state().analytics_period_days, 30);
    let notice = console.panel(PanelId::Heatmap).notice.unwrap();
    assert_eq!(notice.message, "Period cannot exceed 3650 days.");
}

#[tokio::test]
async fn unrepresentable_window_fails_the_panels_without_a_request() {
    let transport = ScriptedTransport::new();
    let console = console(&transport);
    console.update(|s| s.analytics_period_days = u32::MAX);

    console.load_risk_analytics().await;

    assert!(transport.requests().is_empty());
    for id in [PanelId::Heatmap, PanelId::RiskTrends, PanelId::FalsePositiveRate] {
        assert!(
            matches!(
                console.panel(id).state,
                PanelState::Failed { ref message } if message.contains("out of range")
            ),
            "{id}"
        );
    }
}
