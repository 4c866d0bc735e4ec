//! Weekly and monthly mood reports.
//!
//! Reports are built from an in-memory entry list filtered to a calendar
//! window in the user's time zone:
//! - **Week:** compared against the previous week
//! - **Month:** second half (day 16 onward) compared against the first half

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Weekday};
use serde::Serialize;

use super::stats::{aggregate_with, AggregateOptions, EmotionSummary};
use super::trend::{classify_trend, score, Trend};
use crate::types::JournalEntry;

/// Day on which a month's second half starts.
const MONTH_SPLIT_DAY: u32 = 16;

/// Calendar window covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportPeriod {
    /// Seven days starting on the given date
    Week(NaiveDate),
    /// Specific month (year, month 1-12)
    Month(i32, u32),
}

impl ReportPeriod {
    /// Week containing `date`, starting on `week_start`.
    pub fn week_containing(date: NaiveDate, week_start: Weekday) -> Self {
        let offset = (date.weekday().num_days_from_monday() + 7
            - week_start.num_days_from_monday())
            % 7;
        ReportPeriod::Week(date - Duration::days(offset as i64))
    }

    /// Month containing `date`.
    pub fn month_containing(date: NaiveDate) -> Self {
        ReportPeriod::Month(date.year(), date.month())
    }

    /// First day of the period.
    pub fn start(&self) -> NaiveDate {
        match self {
            ReportPeriod::Week(start) => *start,
            ReportPeriod::Month(year, month) => first_of_month(*year, *month),
        }
    }

    /// Day after the last day of the period (exclusive).
    pub fn end(&self) -> NaiveDate {
        match self {
            ReportPeriod::Week(start) => *start + Duration::days(7),
            ReportPeriod::Month(year, month) => {
                let (next_year, next_month) = if *month == 12 {
                    (*year + 1, 1)
                } else {
                    (*year, *month + 1)
                };
                first_of_month(next_year, next_month)
            }
        }
    }

    /// Get the previous period.
    pub fn previous(&self) -> Self {
        match self {
            ReportPeriod::Week(start) => ReportPeriod::Week(*start - Duration::days(7)),
            ReportPeriod::Month(year, month) => {
                if *month == 1 {
                    ReportPeriod::Month(*year - 1, 12)
                } else {
                    ReportPeriod::Month(*year, *month - 1)
                }
            }
        }
    }

    pub fn total_days(&self) -> u32 {
        (self.end() - self.start()).num_days() as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date < self.end()
    }

    /// Get display name for this period.
    pub fn display_name(&self) -> String {
        match self {
            ReportPeriod::Week(start) => format!("Week of {}", start.format("%b %d, %Y")),
            ReportPeriod::Month(year, month) => {
                let month_name = match month {
                    1 => "January",
                    2 => "February",
                    3 => "March",
                    4 => "April",
                    5 => "May",
                    6 => "June",
                    7 => "July",
                    8 => "August",
                    9 => "September",
                    10 => "October",
                    11 => "November",
                    12 => "December",
                    _ => "Unknown",
                };
                format!("{} {}", month_name, year)
            }
        }
    }
}

/// Month numbers outside 1-12 are clamped so the period stays total.
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month.clamp(1, 12), 1).unwrap_or(NaiveDate::MIN)
}

/// Configuration for report generation.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Number of top triggers to include
    pub top_triggers: usize,
    /// Include the trend comparison
    pub include_trend: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_triggers: AggregateOptions::default().top_triggers,
            include_trend: true,
        }
    }
}

/// Score comparison between two windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendComparison {
    pub current_score: f64,
    pub previous_score: f64,
    pub trend: Trend,
}

impl TrendComparison {
    pub fn between(current: &[JournalEntry], previous: &[JournalEntry]) -> Self {
        let current_score = score(current);
        let previous_score = score(previous);
        Self {
            current_score,
            previous_score,
            trend: classify_trend(current_score, previous_score),
        }
    }

    /// Format the score change for display (e.g., "+0.45").
    pub fn format_delta(&self) -> String {
        format!("{:+.2}", self.current_score - self.previous_score)
    }
}

/// A complete report for one period.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub period: ReportPeriod,
    pub summary: EmotionSummary,
    /// Mean valence of the period's entries
    pub score: f64,
    /// `None` when not requested or either window has no moods
    pub trend: Option<TrendComparison>,
    /// Days in the period with at least one entry
    pub active_days: u32,
    pub total_days: u32,
}

impl Report {
    /// Percentage of days in the period with an entry.
    pub fn activity_percentage(&self) -> f64 {
        if self.total_days == 0 {
            0.0
        } else {
            (self.active_days as f64 / self.total_days as f64) * 100.0
        }
    }
}

/// Entries whose local date falls in `[start, end)`.
pub fn entries_between<Tz: TimeZone>(
    entries: &[JournalEntry],
    start: NaiveDate,
    end: NaiveDate,
    tz: &Tz,
) -> Vec<JournalEntry> {
    entries
        .iter()
        .filter(|e| {
            let date = e.local_date(tz);
            date >= start && date < end
        })
        .cloned()
        .collect()
}

/// Generate a report for `period` from the full entry list.
pub fn generate_report<Tz: TimeZone>(
    entries: &[JournalEntry],
    period: ReportPeriod,
    config: &ReportConfig,
    tz: &Tz,
) -> Report {
    let in_period = entries_between(entries, period.start(), period.end(), tz);

    let summary = aggregate_with(
        &in_period,
        &AggregateOptions {
            top_triggers: config.top_triggers,
        },
    );

    let mut days: Vec<NaiveDate> = in_period.iter().map(|e| e.local_date(tz)).collect();
    days.sort_unstable();
    days.dedup();

    let trend = if config.include_trend {
        let (current, previous) = comparison_windows(entries, &in_period, period, tz);
        let has_moods = |window: &[JournalEntry]| window.iter().any(|e| e.emotion.is_some());
        if has_moods(&current) && has_moods(&previous) {
            Some(TrendComparison::between(&current, &previous))
        } else {
            None
        }
    } else {
        None
    };

    tracing::debug!(
        period = %period.display_name(),
        entries = in_period.len(),
        "Report generated"
    );

    Report {
        period,
        score: score(&in_period),
        summary,
        trend,
        active_days: days.len() as u32,
        total_days: period.total_days(),
    }
}

/// (current, previous) windows for the trend comparison.
fn comparison_windows<Tz: TimeZone>(
    entries: &[JournalEntry],
    in_period: &[JournalEntry],
    period: ReportPeriod,
    tz: &Tz,
) -> (Vec<JournalEntry>, Vec<JournalEntry>) {
    match period {
        ReportPeriod::Week(_) => {
            let previous = period.previous();
            (
                in_period.to_vec(),
                entries_between(entries, previous.start(), previous.end(), tz),
            )
        }
        ReportPeriod::Month(year, month) => {
            let split = NaiveDate::from_ymd_opt(year, month.clamp(1, 12), MONTH_SPLIT_DAY)
                .unwrap_or_else(|| period.start());
            let (second, first): (Vec<JournalEntry>, Vec<JournalEntry>) = in_period
                .iter()
                .cloned()
                .partition(|e| e.local_date(tz) >= split);
            (second, first)
        }
    }
}

/// Report for the week containing `now`.
pub fn current_week<Tz: TimeZone>(
    entries: &[JournalEntry],
    now: &DateTime<Tz>,
    week_start: Weekday,
    config: &ReportConfig,
) -> Report {
    let period = ReportPeriod::week_containing(now.date_naive(), week_start);
    generate_report(entries, period, config, &now.timezone())
}

/// Report for the month containing `now`.
pub fn current_month<Tz: TimeZone>(
    entries: &[JournalEntry],
    now: &DateTime<Tz>,
    config: &ReportConfig,
) -> Report {
    let period = ReportPeriod::month_containing(now.date_naive());
    generate_report(entries, period, config, &now.timezone())
}
