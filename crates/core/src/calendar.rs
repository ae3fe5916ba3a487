//! Compliance deadlines and the month grid they are drawn on.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::time::Timestamp;

pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Cells in a month grid: six Sunday-first weeks.
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadline {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub deadline_id: Option<i64>,
    #[serde(default)]
    pub deadline_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub deadline_date: Option<Timestamp>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub completed_at: Option<Timestamp>,
}

impl Deadline {
    pub fn key(&self) -> Option<i64> {
        self.id.or(self.deadline_id)
    }

    pub fn type_label(&self) -> &str {
        self.deadline_type.as_deref().unwrap_or("GENERAL")
    }

    pub fn due_on(&self) -> Option<NaiveDate> {
        self.deadline_date.map(Timestamp::date)
    }

    /// Strictly past `now` and not completed.
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        self.deadline_date
            .is_some_and(|d| crate::case::is_overdue(d, self.completed, now))
    }
}

/// Body of `POST compliance/calendar/deadlines`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeadline {
    pub deadline_type: String,
    pub description: String,
    /// Midnight local time of the due date, without zone.
    pub deadline_date: String,
    pub jurisdiction: String,
}

impl NewDeadline {
    /// Blank type and jurisdiction default to `GENERAL` and `US`.
    pub fn new(
        deadline_type: Option<&str>,
        description: Option<&str>,
        due: NaiveDate,
        jurisdiction: Option<&str>,
    ) -> Self {
        let non_blank = |v: Option<&str>, default: &str| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_owned()
        };
        Self {
            deadline_type: non_blank(deadline_type, "GENERAL"),
            description: description.unwrap_or_default().to_owned(),
            deadline_date: format!("{}T00:00:00", due.format("%Y-%m-%d")),
            jurisdiction: non_blank(jurisdiction, "US"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub due: usize,
    pub overdue: usize,
}

/// A rendered month: weekday headers plus [`GRID_CELLS`] day cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub first: NaiveDate,
    pub label: String,
    pub days: Vec<CalendarDay>,
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

impl CalendarMonth {
    /// Lay out the month containing `month`.
    ///
    /// A deadline counts as overdue on its cell when it falls before the
    /// start of `today` and is not completed; the rest count as due. At the
    /// ends of the calendar the grid stops at the last representable day.
    pub fn build(month: NaiveDate, deadlines: &[Deadline], today: NaiveDate) -> Self {
        let first = month_start(month);
        let offset = u64::from(first.weekday().num_days_from_sunday());
        let grid_start = first.checked_sub_days(Days::new(offset)).unwrap_or(first);
        let today_start = Timestamp::from_date(today);

        let days = (0u64..)
            .take(GRID_CELLS)
            .map_while(|i| grid_start.checked_add_days(Days::new(i)))
            .map(|date| {
                let on_day = deadlines.iter().filter(|d| d.due_on() == Some(date));
                let (mut due, mut overdue) = (0, 0);
                for d in on_day {
                    if d.is_overdue(today_start) {
                        overdue += 1;
                    } else {
                        due += 1;
                    }
                }
                CalendarDay {
                    date,
                    in_month: date.month() == first.month(),
                    is_today: date == today,
                    due,
                    overdue,
                }
            })
            .collect();

        Self {
            first,
            label: first.format("%B %Y").to_string(),
            days,
        }
    }

    pub fn prev(&self) -> NaiveDate {
        self.first
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.first)
    }

    pub fn next(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .unwrap_or(self.first)
    }
}

/// Deadlines due on `date`, in input order.
pub fn deadlines_on(deadlines: &[Deadline], date: NaiveDate) -> Vec<&Deadline> {
    deadlines
        .iter()
        .filter(|d| d.due_on() == Some(date))
        .collect()
}
