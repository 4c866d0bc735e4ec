//! Monthly entry limit lookup.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{Error, Result};

/// Remaining entries this month, or [`Error::EntryLimitReached`].
///
/// `limit = None` means unlimited and always succeeds with `u32::MAX`.
pub fn check_entry_limit(used: u32, limit: Option<u32>) -> Result<u32> {
    match limit {
        None => Ok(u32::MAX),
        Some(limit) if used >= limit => Err(Error::EntryLimitReached { limit, used }),
        Some(limit) => Ok(limit - used),
    }
}

/// Start of the local month containing `now`, as UTC.
///
/// An ambiguous local midnight resolves to the earlier instant; a skipped
/// one falls back to midnight UTC.
pub fn month_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap_or_else(|| now.date_naive())
        .and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&first)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| first.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_unlimited() {
        assert_eq!(check_entry_limit(1_000, None).unwrap(), u32::MAX);
    }

    #[test]
    fn test_remaining_and_exhausted() {
        assert_eq!(check_entry_limit(3, Some(10)).unwrap(), 7);
        match check_entry_limit(10, Some(10)) {
            Err(Error::EntryLimitReached { limit, used }) => {
                assert_eq!(limit, 10);
                assert_eq!(used, 10);
            }
            other => panic!("expected limit error, got {:?}", other),
        }
    }

    #[test]
    fn test_month_start_in_local_zone() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        let start = month_start(&now);
        assert_eq!(start.to_rfc3339(), "2024-05-31T21:00:00+00:00");
    }
}
