//! Turns the board's relative and year-less dates into absolute ones.
//!
//! Listings show "Aujourd'hui", "Hier", "Avant hier" or a day and month
//! without a year. Everything is rewritten as `%d %B %Y`.

use chrono::{Datelike, Duration, NaiveDate};

use crate::record::{fields, JobRecord};

/// Output format for normalized dates, e.g. `09 March 2024`.
pub const DATE_FORMAT: &str = "%d %B %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDay {
    Today,
    Yesterday,
    DayBeforeYesterday,
}

impl RelativeDay {
    pub fn days_ago(self) -> i64 {
        match self {
            Self::Today => 0,
            Self::Yesterday => 1,
            Self::DayBeforeYesterday => 2,
        }
    }

    /// Recognizes the French labels used on the board and their English equivalents.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded = raw
            .trim()
            .to_lowercase()
            .replace(['’', '`'], "'")
            .replace('-', " ");
        let folded = folded.split_whitespace().collect::<Vec<_>>().join(" ");
        match folded.as_str() {
            "aujourd'hui" | "today" => Some(Self::Today),
            "hier" | "yesterday" => Some(Self::Yesterday),
            "avant hier" | "day before yesterday" => Some(Self::DayBeforeYesterday),
            _ => None,
        }
    }
}

/// Normalizes one raw date relative to `today`.
///
/// Strings that already carry three or more tokens are returned unchanged.
/// So is a blank string.
pub fn normalize_date(raw: &str, today: NaiveDate) -> String {
    if let Some(day) = RelativeDay::parse(raw) {
        let date = today - Duration::days(day.days_ago());
        return date.format(DATE_FORMAT).to_string();
    }

    let trimmed = raw.trim();
    let tokens = trimmed.split_whitespace().count();
    if tokens == 0 || tokens >= 3 {
        return raw.to_string();
    }
    format!("{} {}", trimmed, today.year())
}

/// Normalizes `publish_date` and, when present, the expiry date of a record.
pub fn normalize_record_dates(record: &mut JobRecord, today: NaiveDate) {
    for field in [fields::PUBLISH_DATE, fields::EXPIRY_DATE] {
        if let Some(raw) = record.get(field) {
            let normalized = normalize_date(raw, today);
            record.insert(field, normalized);
        }
    }
}
