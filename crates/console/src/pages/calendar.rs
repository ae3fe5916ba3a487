//! Compliance calendar: month grid, day detail and deadline lists.

use std::collections::HashSet;

use aml_console_core::calendar::{CalendarMonth, WEEKDAYS, deadlines_on};
use aml_console_core::format::format_date;
use aml_console_core::ui::{badge, empty_state};
use aml_console_core::{Badge, Deadline, NewDeadline, Node};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::panel::{PanelData, PanelId, Rendered};
use crate::{Console, ConsoleError};

impl Console {
    /// Upcoming and overdue deadlines, fetched together. Both lists feed
    /// the month grid; each also has its own panel.
    pub(crate) async fn load_calendar(&self) {
        let grid = self.panels.begin(PanelId::Calendar);
        let upcoming_ticket = self.panels.begin(PanelId::UpcomingDeadlines);
        let overdue_ticket = self.panels.begin(PanelId::OverdueDeadlines);

        let (upcoming, overdue) = futures::join!(
            self.client.upcoming_deadlines(self.config.upcoming_days),
            self.client.overdue_deadlines(),
        );

        let state = self.state();
        let today = self.today();
        match (&upcoming, &overdue) {
            (Ok(upcoming), Ok(overdue)) => {
                let all = merge_deadlines(upcoming, overdue);
                let month = CalendarMonth::build(state.calendar_month, &all, today);
                self.panels.commit(
                    grid,
                    Ok(Rendered::with_data(
                        render_calendar(&month),
                        PanelData::Deadlines(all),
                    )),
                );
            }
            (Err(e), _) | (_, Err(e)) => {
                self.fail(grid, e);
            }
        }
        match upcoming {
            Ok(list) => {
                self.panels
                    .commit(upcoming_ticket, Ok(render_upcoming(&list).into()));
            }
            Err(e) => {
                self.fail(upcoming_ticket, &e);
            }
        }
        match overdue {
            Ok(list) => {
                self.panels
                    .commit(overdue_ticket, Ok(render_overdue(&list).into()));
            }
            Err(e) => {
                self.fail(overdue_ticket, &e);
            }
        }

        if let Some(day) = state.selected_day {
            self.select_day(day);
        }
    }

    pub fn prev_month(&self) {
        let month = self.update(|s| {
            s.calendar_month = s
                .calendar_month
                .checked_sub_months(chrono::Months::new(1))
                .unwrap_or(s.calendar_month);
            s.calendar_month
        });
        self.show_month(month);
    }

    pub fn next_month(&self) {
        let month = self.update(|s| {
            s.calendar_month = s
                .calendar_month
                .checked_add_months(chrono::Months::new(1))
                .unwrap_or(s.calendar_month);
            s.calendar_month
        });
        self.show_month(month);
    }

    /// Jump to the month containing `date`.
    pub fn go_to_month(&self, date: NaiveDate) {
        let month = aml_console_core::calendar::month_start(date);
        self.update(|s| s.calendar_month = month);
        self.show_month(month);
    }

    /// Redraw the grid from the deadlines already loaded.
    fn show_month(&self, month: NaiveDate) {
        let today = self.today();
        let redrawn = self.panels.rerender(PanelId::Calendar, |data| {
            let deadlines = match data {
                PanelData::Deadlines(all) => all.as_slice(),
                _ => &[],
            };
            render_calendar(&CalendarMonth::build(month, deadlines, today))
        });
        if !redrawn {
            debug!(month = %month, "no deadlines loaded, month not redrawn");
        }
    }

    /// Show the deadlines due on `date` in the day-detail panel.
    pub fn select_day(&self, date: NaiveDate) {
        self.update(|s| s.selected_day = Some(date));
        let content = self.panels.with_data(PanelId::Calendar, |data| match data {
            Some(PanelData::Deadlines(all)) => render_day_detail(date, &deadlines_on(all, date)),
            _ => render_day_detail(date, &[]),
        });
        self.panels.show(PanelId::DayDetail, content);
    }

    pub async fn create_deadline(&self, deadline: &NewDeadline) -> Result<(), ConsoleError> {
        if deadline.deadline_date.trim().is_empty() {
            return Err(self.reject(PanelId::Calendar, "Due date is required."));
        }
        self.act(
            PanelId::Calendar,
            "save deadline",
            "Deadline added successfully",
            self.client.create_deadline(deadline),
        )
        .await?;
        self.load_calendar().await;
        Ok(())
    }

    pub async fn complete_deadline(&self, id: i64) -> Result<(), ConsoleError> {
        self.act(
            PanelId::Calendar,
            "complete deadline",
            "Deadline marked as complete",
            self.client.complete_deadline(id),
        )
        .await?;
        self.load_calendar().await;
        Ok(())
    }
}

/// Union of both lists; a deadline present in both is kept once.
fn merge_deadlines(upcoming: &[Deadline], overdue: &[Deadline]) -> Vec<Deadline> {
    let mut seen = HashSet::new();
    upcoming
        .iter()
        .chain(overdue)
        .filter(|d| d.key().is_none_or(|k| seen.insert(k)))
        .cloned()
        .collect()
}

fn due_date(deadline: &Deadline) -> String {
    deadline
        .due_on()
        .map_or_else(|| "Date not available".to_owned(), format_date)
}

fn complete_button(id: i64) -> Node {
    Node::el("button")
        .class("btn-small")
        .attr("data-action", "complete-deadline")
        .attr("data-id", id.to_string())
        .text("Mark Complete")
        .into()
}

pub fn render_calendar(month: &CalendarMonth) -> Node {
    let weekdays = WEEKDAYS
        .iter()
        .map(|w| Node::el("div").class("calendar-weekday").text(*w));
    let days = month.days.iter().map(|day| {
        let mut cell = Node::el("div")
            .class("calendar-day")
            .attr("data-date", format_date(day.date));
        if !day.in_month {
            cell = cell.class("is-other-month");
        }
        if day.is_today {
            cell = cell.class("is-today");
        }
        let mut badges = Node::el("div").class("calendar-day-badges");
        if day.due > 0 {
            badges = badges.child(
                Node::el("span")
                    .class("calendar-badge")
                    .text(format!("Due: {}", day.due)),
            );
        }
        if day.overdue > 0 {
            badges = badges.child(
                Node::el("span")
                    .class("calendar-badge overdue")
                    .text(format!("Overdue: {}", day.overdue)),
            );
        }
        cell.child(
            Node::el("span")
                .class("calendar-day-number")
                .text(day.date.day().to_string()),
        )
        .child(badges)
    });
    Node::el("div")
        .class("calendar")
        .child(Node::el("h3").class("calendar-title").text(month.label.clone()))
        .child(
            Node::el("div")
                .class("calendar-grid")
                .children(weekdays)
                .children(days),
        )
        .into()
}

pub fn render_day_detail(date: NaiveDate, deadlines: &[&Deadline]) -> Node {
    let key = format_date(date);
    if deadlines.is_empty() {
        return Node::el("div")
            .class("calendar-day-details")
            .child(Node::el("h4").text(key))
            .child(Node::el("p").text("No deadlines due on this date."))
            .into();
    }
    let plural = if deadlines.len() > 1 { "s" } else { "" };
    let items = deadlines.iter().map(|d| {
        let status = if d.completed { "Completed" } else { "Open" };
        let mut item = Node::el("div")
            .class("calendar-deadline-item")
            .child(Node::el("strong").text(d.type_label()))
            .child(
                Node::el("div")
                    .class("meta")
                    .child(Node::el("span").text(d.jurisdiction.clone().unwrap_or_default()))
                    .child(Node::el("span").text(status)),
            );
        if let Some(description) = d.description.as_deref().filter(|s| !s.is_empty()) {
            item = item.child(Node::el("div").text(description));
        }
        if let Some(id) = d.id.filter(|_| !d.completed) {
            item = item.child(complete_button(id));
        }
        item
    });
    Node::el("div")
        .class("calendar-day-details")
        .child(Node::el("h4").text(format!(
            "{key} ({} deadline{plural})",
            deadlines.len()
        )))
        .children(items)
        .into()
}

fn deadline_item(deadline: &Deadline, overdue: bool) -> Node {
    let mut item = Node::el("div").class("deadline-item");
    let mut date = Node::el("span").class("deadline-date").text(due_date(deadline));
    if overdue {
        item = item.class("overdue");
        date = date.class("overdue");
    }
    item = item
        .child(
            Node::el("div")
                .class("deadline-header")
                .child(Node::el("strong").text(deadline.deadline_type.as_deref().unwrap_or("Unknown")))
                .child(date),
        )
        .child(Node::el("p").text(deadline.description.clone().unwrap_or_default()));
    if overdue {
        if let Some(id) = deadline.key() {
            item = item.child(complete_button(id));
        }
    } else {
        item = item.child(
            Node::el("small").text(deadline.jurisdiction.clone().unwrap_or_default()),
        );
    }
    item.into()
}

pub fn render_upcoming(deadlines: &[Deadline]) -> Node {
    if deadlines.is_empty() {
        return empty_state("No upcoming deadlines");
    }
    Node::el("div")
        .class("deadline-list")
        .children(deadlines.iter().map(|d| deadline_item(d, false)))
        .into()
}

pub fn render_overdue(deadlines: &[Deadline]) -> Node {
    if deadlines.is_empty() {
        return empty_state("No overdue deadlines");
    }
    Node::el("div")
        .class("deadline-list")
        .child(badge(Badge::Danger, format!("{} overdue", deadlines.len())))
        .children(deadlines.iter().map(|d| deadline_item(d, true)))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn deadlines() -> Vec<Deadline> {
        serde_json::from_str(
            r#"[
                {"id":1,"deadlineType":"SAR_FILING","deadlineDate":"2024-03-05T17:00:00","jurisdiction":"US","description":"File SAR for case 12"},
                {"id":2,"deadlineType":"CTR","deadlineDate":"2024-03-05T09:00:00","completed":true},
                {"id":3,"deadlineType":"AUDIT","deadlineDate":"2024-03-20T00:00:00"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn grid_has_headers_and_badges() {
        let month = CalendarMonth::build(ymd(2024, 3, 1), &deadlines(), ymd(2024, 3, 10));
        let node = render_calendar(&month);
        assert_eq!(node.find_all_class("calendar-weekday").len(), 7);
        let days = node.find_all_class("calendar-day");
        assert_eq!(days.len(), 42);
        let fifth = days
            .iter()
            .find(|d| d.attr_value("data-date") == Some("2024-03-05"))
            .unwrap();
        assert_eq!(fifth.text_content(), "5 Due: 1 Overdue: 1");
        assert_eq!(node.find_all_class("is-today").len(), 1);
    }

    #[test]
    fn day_detail_counts_and_actions() {
        let all = deadlines();
        let node = render_day_detail(ymd(2024, 3, 5), &deadlines_on(&all, ymd(2024, 3, 5)));
        let text = node.to_text();
        assert!(text.starts_with("2024-03-05 (2 deadlines)"), "{text}");
        assert!(text.contains("File SAR for case 12"));
        // The completed one has no button.
        assert_eq!(node.find_all_tag("button").len(), 1);

        let empty = render_day_detail(ymd(2024, 3, 6), &[]);
        assert_eq!(empty.to_text(), "2024-03-06\nNo deadlines due on this date.");
    }

    #[test]
    fn lists() {
        assert_eq!(render_upcoming(&[]).to_text(), "No upcoming deadlines");
        assert_eq!(render_overdue(&[]).to_text(), "No overdue deadlines");
        let overdue = render_overdue(&deadlines()[..1]);
        assert!(overdue.to_text().contains("SAR_FILING 2024-03-05"));
        let button = &overdue.find_all_tag("button")[0];
        assert_eq!(button.attr_value("data-id"), Some("1"));
    }

    #[test]
    fn merge_keeps_one_copy() {
        let all = deadlines();
        let merged = merge_deadlines(&all[..2], &all[1..]);
        assert_eq!(merged.len(), 3);
    }
}
