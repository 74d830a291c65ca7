//! Due-date urgency classification.
//!
//! Every case falls into exactly one [`Bucket`] based on how many whole days
//! separate its due date from today. Both sides are calendar days, so the
//! time of day never changes the outcome.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::types::CaseSummary;

/// Sort key used for cases without a usable due date.
pub const NO_DUE_SORT_KEY: i64 = i64::MAX;

/// Urgency bucket, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Overdue,
    Today,
    Week,
    Next,
    Later,
    NoDue,
}

impl Bucket {
    /// All buckets in fixed display order.
    pub const ALL: [Bucket; 6] = [
        Bucket::Overdue,
        Bucket::Today,
        Bucket::Week,
        Bucket::Next,
        Bucket::Later,
        Bucket::NoDue,
    ];

    /// Stable machine key.
    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Overdue => "overdue",
            Bucket::Today => "today",
            Bucket::Week => "week",
            Bucket::Next => "next",
            Bucket::Later => "later",
            Bucket::NoDue => "nodue",
        }
    }

    /// Section heading shown above the bucket's cases.
    pub fn title(&self) -> &'static str {
        match self {
            Bucket::Overdue => "Overdue",
            Bucket::Today => "Due Today",
            Bucket::Week => "This Week",
            Bucket::Next => "Next Week",
            Bucket::Later => "Later",
            Bucket::NoDue => "No Deadline",
        }
    }
}

/// Derived urgency of one case. Recomputed on every pass, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyInfo {
    pub bucket: Bucket,
    /// Pill text, e.g. "3 days overdue"
    pub label: String,
    /// Due date with any time part dropped
    pub due_date: Option<NaiveDate>,
    /// Whole days from today to the due date (negative when overdue)
    pub diff_days: Option<i64>,
    /// Day number of the due date, or [`NO_DUE_SORT_KEY`]
    pub sort_key: i64,
}

impl UrgencyInfo {
    fn no_due() -> Self {
        Self {
            bucket: Bucket::NoDue,
            label: "No deadline set".to_string(),
            due_date: None,
            diff_days: None,
            sort_key: NO_DUE_SORT_KEY,
        }
    }
}

/// Parse a stored due date down to its calendar day.
///
/// Accepts plain dates, naive date-times and RFC 3339 timestamps. Returns
/// `None` for blank or unparseable input.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ts| ts.date())
}

/// Classify a case against `today`.
pub fn classify(case: &CaseSummary, today: NaiveDate) -> UrgencyInfo {
    classify_due(case.next_due.as_deref(), today)
}

/// Classify a raw due-date value against `today`.
///
/// Missing and malformed dates both land in [`Bucket::NoDue`].
pub fn classify_due(next_due: Option<&str>, today: NaiveDate) -> UrgencyInfo {
    let Some(due) = next_due.and_then(parse_due_date) else {
        return UrgencyInfo::no_due();
    };

    let diff = due.signed_duration_since(today).num_days();
    let (bucket, label) = match diff {
        d if d < 0 => {
            let n = d.unsigned_abs();
            let unit = if n == 1 { "day" } else { "days" };
            (Bucket::Overdue, format!("{n} {unit} overdue"))
        }
        0 => (Bucket::Today, "Due today".to_string()),
        1 => (Bucket::Week, "Due tomorrow".to_string()),
        2..=3 => (Bucket::Week, format!("Due in {diff} days")),
        4..=7 => (Bucket::Next, format!("Due in {diff} days")),
        _ => (Bucket::Later, format!("Due in {diff} days")),
    };

    UrgencyInfo {
        bucket,
        label,
        due_date: Some(due),
        diff_days: Some(diff),
        sort_key: i64::from(due.num_days_from_ce()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn check(next_due: Option<&str>, bucket: Bucket, label: &str) {
        let info = classify_due(next_due, today());
        assert_eq!(info.bucket, bucket, "bucket for {next_due:?}");
        assert_eq!(info.label, label, "label for {next_due:?}");
    }

    #[test]
    fn test_label_literals() {
        check(Some("2024-06-07"), Bucket::Overdue, "3 days overdue");
        check(Some("2024-06-10"), Bucket::Today, "Due today");
        check(Some("2024-06-11"), Bucket::Week, "Due tomorrow");
        check(Some("2024-06-13"), Bucket::Week, "Due in 3 days");
        check(Some("2024-06-17"), Bucket::Next, "Due in 7 days");
        check(Some("2024-06-25"), Bucket::Later, "Due in 15 days");
        check(None, Bucket::NoDue, "No deadline set");
    }

    #[test]
    fn test_singular_overdue() {
        check(Some("2024-06-09"), Bucket::Overdue, "1 day overdue");
    }

    #[test]
    fn test_bucket_boundaries() {
        check(Some("2024-06-12"), Bucket::Week, "Due in 2 days");
        check(Some("2024-06-14"), Bucket::Next, "Due in 4 days");
        check(Some("2024-06-18"), Bucket::Later, "Due in 8 days");
    }

    #[test]
    fn test_time_of_day_is_ignored() {
        check(Some("2024-06-10T00:01:00"), Bucket::Today, "Due today");
        check(Some("2024-06-10T23:59:59"), Bucket::Today, "Due today");
        check(Some("2024-06-10 23:59"), Bucket::Today, "Due today");
        check(Some("2024-06-11T08:00:00-05:00"), Bucket::Week, "Due tomorrow");
    }

    #[test]
    fn test_malformed_dates_have_no_deadline() {
        check(Some(""), Bucket::NoDue, "No deadline set");
        check(Some("next tuesday"), Bucket::NoDue, "No deadline set");
        check(Some("2024-13-40"), Bucket::NoDue, "No deadline set");
    }

    #[test]
    fn test_sort_key_orders_by_day() {
        let a = classify_due(Some("2024-06-07"), today());
        let b = classify_due(Some("2024-06-07T18:00:00"), today());
        let c = classify_due(Some("2024-06-08"), today());
        let none = classify_due(None, today());

        assert_eq!(a.sort_key, b.sort_key);
        assert!(a.sort_key < c.sort_key);
        assert_eq!(none.sort_key, NO_DUE_SORT_KEY);
        assert_eq!(a.sort_key, i64::from(a.due_date.unwrap().num_days_from_ce()));
    }

    #[test]
    fn test_bucket_order_matches_all() {
        let mut sorted = Bucket::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, Bucket::ALL.to_vec());
        assert_eq!(Bucket::NoDue.key(), "nodue");
    }
}
