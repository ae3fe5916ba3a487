mod common;

use aml_console::{NoticeKind, PanelId, PanelState, View};
use aml_console_core::NewDeadline;
use chrono::NaiveDate;
use common::{ScriptedTransport, console};

const UPCOMING: &str = r#"[
    {"id":3,"deadlineType":"CTR_FILING","deadlineDate":"2024-03-20T00:00:00","jurisdiction":"US","description":"Monthly CTR batch"},
    {"id":4,"deadlineType":"AUDIT","deadlineDate":[2024,4,2,9,0]}
]"#;

const OVERDUE: &str = r#"[
    {"id":1,"deadlineType":"SAR_FILING","deadlineDate":"2024-03-05T17:00:00","jurisdiction":"US"}
]"#;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn scripted() -> std::sync::Arc<ScriptedTransport> {
    let transport = ScriptedTransport::new();
    transport
        .on("GET compliance/calendar/upcoming", 200, UPCOMING)
        .on("GET compliance/calendar/overdue", 200, OVERDUE);
    transport
}

fn cell_text(console: &aml_console::Console, date: &str) -> String {
    let grid = console.panel(PanelId::Calendar).content().cloned().unwrap();
    grid.find_all_class("calendar-day")
        .into_iter()
        .find(|d| d.attr_value("data-date") == Some(date))
        .map(|d| d.text_content())
        .unwrap_or_default()
}

#[tokio::test]
async fn calendar_view_draws_both_lists_on_the_grid() {
    let transport = scripted();
    let console = console(&transport);

    console.switch_view(View::Calendar).await;

    let mut log = transport.requests();
    log.sort();
    assert_eq!(
        log,
        [
            "GET compliance/calendar/overdue",
            "GET compliance/calendar/upcoming?daysAhead=30"
        ]
    );
    assert_eq!(cell_text(&console, "2024-03-05"), "5 Overdue: 1");
    assert_eq!(cell_text(&console, "2024-03-20"), "20 Due: 1");

    let overdue = console.panel(PanelId::OverdueDeadlines).content().cloned().unwrap();
    assert!(overdue.to_text().contains("SAR_FILING"));
    let upcoming = console.panel(PanelId::UpcomingDeadlines).content().cloned().unwrap();
    assert!(upcoming.to_text().contains("Monthly CTR batch"));
}

#[tokio::test]
async fn month_navigation_redraws_without_fetching() {
    let transport = scripted();
    let console = console(&transport);
    console.switch_view(View::Calendar).await;
    transport.clear_log();

    console.next_month();

    assert!(transport.requests().is_empty());
    assert_eq!(console.state().calendar_month, ymd(2024, 4, 1));
    let grid = console.panel(PanelId::Calendar).content().cloned().unwrap();
    assert!(grid.to_text().starts_with("April 2024"));
    assert_eq!(cell_text(&console, "2024-04-02"), "2 Due: 1");

    console.prev_month();
    console.prev_month();
    assert_eq!(console.state().calendar_month, ymd(2024, 2, 1));
}

#[tokio::test]
async fn selecting_a_day_shows_its_deadlines() {
    let transport = scripted();
    let console = console(&transport);
    console.switch_view(View::Calendar).await;

    console.select_day(ymd(2024, 3, 5));
    let detail = console.panel(PanelId::DayDetail).content().cloned().unwrap();
    assert!(detail.to_text().starts_with("2024-03-05 (1 deadline)"));

    console.select_day(ymd(2024, 3, 6));
    let detail = console.panel(PanelId::DayDetail).content().cloned().unwrap();
    assert_eq!(detail.to_text(), "2024-03-06\nNo deadlines due on this date.");
}

#[tokio::test]
async fn completing_a_deadline_reloads_the_calendar() {
    let transport = scripted();
    transport.on("POST compliance/calendar/deadlines/1/complete", 200, "");
    let console = console(&transport);

    console.complete_deadline(1).await.unwrap();

    let log = transport.requests();
    assert_eq!(log[0], "POST compliance/calendar/deadlines/1/complete");
    assert_eq!(log.len(), 3);
    let notice = console.panel(PanelId::Calendar).notice.unwrap();
    assert_eq!(notice.kind, NoticeKind::Success);
}

#[tokio::test]
async fn failed_create_leaves_the_calendar_alone() {
    let transport = scripted();
    transport.on("POST compliance/calendar/deadlines", 400, "deadlineDate is invalid");
    let console = console(&transport);

    let deadline = NewDeadline::new(Some("SAR_FILING"), None, ymd(2024, 4, 30), None);
    assert!(console.create_deadline(&deadline).await.is_err());

    assert_eq!(transport.requests(), ["POST compliance/calendar/deadlines"]);
    assert_eq!(console.panel(PanelId::Calendar).state, PanelState::Idle);
    assert_eq!(
        console.panel(PanelId::Calendar).notice.unwrap().message,
        "Failed to save deadline: HTTP 400: deadlineDate is invalid"
    );
}

#[tokio::test]
async fn one_failed_list_fails_the_grid_only() {
    let transport = ScriptedTransport::new();
    transport
        .on("GET compliance/calendar/upcoming", 200, UPCOMING)
        .on("GET compliance/calendar/overdue", 503, "unavailable");
    let console = console(&transport);

    console.switch_view(View::Calendar).await;

    assert!(matches!(
        console.panel(PanelId::Calendar).state,
        PanelState::Failed { .. }
    ));
    assert!(console.panel(PanelId::UpcomingDeadlines).content().is_some());
    assert!(matches!(
        console.panel(PanelId::OverdueDeadlines).state,
        PanelState::Failed { .. }
    ));
}
