//! Page loaders, renderers and actions.
//!
//! Each page adds an `impl Console` block with its loaders (fetch one
//! resource, render it, commit it to a panel) and actions (one mutating
//! request, then a re-fetch of the affected panels). Renderers are plain
//! functions of the response so they can be tested without a backend.

pub mod calendar;
pub mod cases;
pub mod limits;
pub mod monitoring;
pub mod queues;
pub mod regulatory;
pub mod risk_analytics;

use aml_console_core::Timestamp;
use aml_console_core::format::{format_datetime, format_time_ago};
use aml_console_core::ui::stat_card;
use aml_console_core::Node;

/// `2024-03-10 14:05`, or `N/A`.
pub(crate) fn datetime_or_na(ts: Option<Timestamp>) -> String {
    ts.map_or_else(|| "N/A".to_owned(), |t| format_datetime(t.inner()))
}

/// Relative to `now`, or empty when unknown.
pub(crate) fn time_ago(ts: Option<Timestamp>, now: Timestamp) -> String {
    ts.map(|t| format_time_ago(t.inner(), now.inner()))
        .unwrap_or_default()
}

pub(crate) fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("N/A")
        .to_owned()
}

/// A row of stat cards.
pub(crate) fn stats_grid<'a, I>(cards: I) -> Node
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    Node::el("div")
        .class("stats-grid")
        .children(cards.into_iter().map(|(label, value)| stat_card(label, value)))
        .into()
}

/// Integer-valued figure from a lenient number, zero when absent.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn count(value: Option<f64>) -> i64 {
    value.filter(|v| v.is_finite()).map_or(0, |v| v.round() as i64)
}
