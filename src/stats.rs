use crate::models::LogEntry;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;
use std::collections::HashMap;

pub const NO_AVERAGE: &str = "-";
pub const NO_LAST_ENTRY: &str = "--:--";
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Summary cards shown above the history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub today_count: usize,
    pub last_entry_time: Option<String>,
    pub average_bristol: Option<f64>,
}

impl DashboardStats {
    pub fn average_display(&self) -> String {
        match self.average_bristol {
            Some(avg) => format!("{avg:.1}"),
            None => NO_AVERAGE.to_string(),
        }
    }

    pub fn last_entry_display(&self) -> &str {
        self.last_entry_time.as_deref().unwrap_or(NO_LAST_ENTRY)
    }
}

/// Entries sharing one local calendar date, in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub date: Option<NaiveDate>,
    pub label: String,
    pub entries: Vec<&'a LogEntry>,
}

pub fn build_dashboard(logs: &[LogEntry]) -> DashboardStats {
    build_dashboard_at(&Local, Local::now().date_naive(), logs)
}

/// `logs` must already be sorted newest first, as the store returns them.
pub fn build_dashboard_at<Tz: TimeZone>(tz: &Tz, today: NaiveDate, logs: &[LogEntry]) -> DashboardStats {
    let today_count = logs
        .iter()
        .filter(|log| local_datetime(tz, &log.timestamp).map(|dt| dt.date()) == Some(today))
        .count();

    let last_entry_time = logs
        .first()
        .and_then(|log| local_datetime(tz, &log.timestamp))
        .map(|dt| dt.format("%H:%M").to_string());

    let average_bristol = if logs.is_empty() {
        None
    } else {
        let total: i64 = logs.iter().map(|log| log.bristol_score).sum();
        Some(total as f64 / logs.len() as f64)
    };

    DashboardStats {
        today_count,
        last_entry_time,
        average_bristol,
    }
}

pub fn group_by_day(logs: &[LogEntry]) -> Vec<DayGroup<'_>> {
    group_by_day_in(&Local, logs)
}

/// Buckets appear in first-seen order, so a newest-first list yields the most
/// recent day first.
pub fn group_by_day_in<'a, Tz: TimeZone>(tz: &Tz, logs: &'a [LogEntry]) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    let mut index: HashMap<Option<NaiveDate>, usize> = HashMap::new();

    for log in logs {
        let date = local_datetime(tz, &log.timestamp).map(|dt| dt.date());
        let slot = *index.entry(date).or_insert_with(|| {
            groups.push(DayGroup {
                date,
                label: day_label(date),
                entries: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].entries.push(log);
    }

    groups
}

pub fn day_label(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%A, %b %-d").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Wall-clock time of a stored timestamp in `tz`.
///
/// RFC 3339 values are converted; offset-less values (as produced by an HTML
/// `datetime-local` input) are taken as already local.
pub fn local_datetime<Tz: TimeZone>(tz: &Tz, timestamp: &str) -> Option<NaiveDateTime> {
    let timestamp = timestamp.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(parsed.with_timezone(tz).naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
}
