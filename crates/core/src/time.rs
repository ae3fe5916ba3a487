//! Timestamps as the compliance backend sends them.
//!
//! Depending on the endpoint a point in time arrives as an RFC 3339 string,
//! a zone-less ISO string, a bare date, epoch milliseconds, or a
//! `[year, month, day, hour, minute, second, nanos]` array from the
//! backend's default date serializer. [`Timestamp`] accepts all of them and
//! always serializes as RFC 3339.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A UTC instant decoded from any of the backend's date encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(pub DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn inner(self) -> DateTime<Utc> {
        self.0
    }

    pub fn date(self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Midnight UTC of `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    }

    pub fn parse_str(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(Self(Utc.from_utc_datetime(&naive)));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(Self::from_date)
    }

    /// `[y, m, d]` up to `[y, m, d, h, mi, s, nanos]`.
    pub fn from_parts(parts: &[i64]) -> Option<Self> {
        let part = |i: usize| parts.get(i).copied().unwrap_or(0);
        if parts.len() < 3 {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(
            i32::try_from(part(0)).ok()?,
            u32::try_from(part(1)).ok()?,
            u32::try_from(part(2)).ok()?,
        )?;
        let time = NaiveTime::from_hms_nano_opt(
            u32::try_from(part(3)).ok()?,
            u32::try_from(part(4)).ok()?,
            u32::try_from(part(5)).ok()?,
            u32::try_from(part(6)).ok()?,
        )?;
        Some(Self(Utc.from_utc_datetime(&date.and_time(time))))
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self)
    }

    /// Decode from an arbitrary JSON value; `None` if it is not a date.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::parse_str(s),
            Value::Number(n) => n.as_i64().and_then(Self::from_millis),
            Value::Array(items) => {
                let parts: Option<Vec<i64>> = items.iter().map(Value::as_i64).collect();
                Self::from_parts(&parts?)
            }
            _ => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::format::format_datetime(self.0))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: {value}")))
    }
}
