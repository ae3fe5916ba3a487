//! Display formatting for amounts, periods, event codes and times.

use chrono::{DateTime, NaiveDate, Utc};

/// Compact dollar amount.
///
/// Zero, absent and non-finite values all render as `$0`.
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|a| a.is_finite() && *a != 0.0) else {
        return "$0".to_owned();
    };
    if amount >= 1_000_000.0 {
        format!("${:.1}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("${:.0}K", amount / 1_000.0)
    } else {
        format!("${amount:.2}")
    }
}

/// `12345.5` → `12,346`. Rounds to the nearest integer.
#[allow(clippy::cast_possible_truncation)]
pub fn format_grouped(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Full amount with thousands separators and two decimals.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn format_money(amount: Option<f64>, currency: &str) -> String {
    let amount = amount.filter(|a| a.is_finite()).unwrap_or(0.0);
    let total_cents = (amount.abs() * 100.0).round() as i64;
    let sign = if amount < 0.0 && total_cents > 0 { "-" } else { "" };
    let whole = format_grouped((total_cents / 100) as f64);
    let cents = total_cents % 100;
    let symbol = if currency.eq_ignore_ascii_case("USD") {
        "$".to_owned()
    } else {
        format!("{currency} ")
    };
    format!("{sign}{symbol}{whole}.{cents:02}")
}

/// Count and velocity limits are plain numbers; the rest are money.
pub fn format_limit_value(value: Option<f64>, limit_type: &str) -> String {
    let is_count = matches!(
        limit_type.to_ascii_uppercase().as_str(),
        "COUNT" | "VELOCITY"
    );
    match value.filter(|v| v.is_finite()) {
        Some(v) if is_count => format_grouped(v),
        None if is_count => "0".to_owned(),
        other => format_currency(other),
    }
}

/// Human reading of a limit period code.
pub fn format_period(period: &str) -> String {
    if period.is_empty() {
        return "N/A".to_owned();
    }
    match period.to_ascii_uppercase().as_str() {
        "DAY" => "24 Hours",
        "HOUR" => "1 Hour",
        "MINUTE" => "Per Minute",
        "WEEK" => "7 Days",
        "MONTH" => "30 Days",
        "TRANSACTION" => "Per Transaction",
        _ => period,
    }
    .to_owned()
}

/// `"Daily Transaction Limit"` → `"Daily Transaction"`.
pub fn format_limit_type_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "N/A".to_owned();
    }
    let lower = trimmed.to_ascii_lowercase();
    let stripped = if lower.ends_with("limit") {
        &trimmed[..trimmed.len() - "limit".len()]
    } else {
        trimmed
    };
    stripped.trim().to_owned()
}

/// `CASE_ESCALATED` → `Case Escalated`.
pub fn format_event_type(code: &str) -> String {
    code.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                let mut w = first.to_uppercase().collect::<String>();
                w.push_str(&chars.as_str().to_lowercase());
                w
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Relative time between `then` and `now`.
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    if minutes < 1 {
        return "Just now".to_owned();
    }
    if minutes < 60 {
        return format!("{minutes} min ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours} hour{} ago", plural(hours));
    }
    let days = hours / 24;
    format!("{days} day{} ago", plural(days))
}

fn plural(n: i64) -> &'static str {
    if n > 1 { "s" } else { "" }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_datetime(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Percentage with one decimal, `0.125` → `12.5%`.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn currency_thresholds() {
        assert_eq!(format_currency(None), "$0");
        assert_eq!(format_currency(Some(0.0)), "$0");
        assert_eq!(format_currency(Some(f64::NAN)), "$0");
        assert_eq!(format_currency(Some(999.5)), "$999.50");
        assert_eq!(format_currency(Some(1_000.0)), "$1K");
        assert_eq!(format_currency(Some(15_400.0)), "$15K");
        assert_eq!(format_currency(Some(1_000_000.0)), "$1.0M");
        assert_eq!(format_currency(Some(2_460_000.0)), "$2.5M");
    }

    #[test]
    fn grouping() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1_000.0), "1,000");
        assert_eq!(format_grouped(1_234_567.4), "1,234,567");
        assert_eq!(format_grouped(-12_345.0), "-12,345");
    }

    #[test]
    fn money() {
        assert_eq!(format_money(Some(12_345.678), "USD"), "$12,345.68");
        assert_eq!(format_money(Some(10.5), "CAD"), "CAD 10.50");
        assert_eq!(format_money(None, "USD"), "$0.00");
        assert_eq!(format_money(Some(0.999), "USD"), "$1.00");
    }

    #[test]
    fn limit_values() {
        assert_eq!(format_limit_value(Some(1500.0), "COUNT"), "1,500");
        assert_eq!(format_limit_value(None, "velocity"), "0");
        assert_eq!(format_limit_value(Some(50_000.0), "VOLUME"), "$50K");
        assert_eq!(format_limit_value(None, "VOLUME"), "$0");
    }

    #[test]
    fn periods_and_names() {
        assert_eq!(format_period("DAY"), "24 Hours");
        assert_eq!(format_period("transaction"), "Per Transaction");
        assert_eq!(format_period("QUARTER"), "QUARTER");
        assert_eq!(format_period(""), "N/A");
        assert_eq!(format_limit_type_name("Daily Transaction Limit"), "Daily Transaction");
        assert_eq!(format_limit_type_name("Velocity"), "Velocity");
        assert_eq!(format_limit_type_name(""), "N/A");
    }

    #[test]
    fn event_types() {
        assert_eq!(format_event_type("CASE_ESCALATED"), "Case Escalated");
        assert_eq!(format_event_type("NOTE"), "Note");
    }

    #[test]
    fn time_ago() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(format_time_ago(now - Duration::seconds(30), now), "Just now");
        assert_eq!(format_time_ago(now - Duration::minutes(5), now), "5 min ago");
        assert_eq!(format_time_ago(now - Duration::minutes(60), now), "1 hour ago");
        assert_eq!(format_time_ago(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(format_time_ago(now - Duration::days(3), now), "3 days ago");
    }

    #[test]
    fn percent() {
        assert_eq!(format_percent(0.125), "12.5%");
    }
}
