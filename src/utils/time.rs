use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use rand::Rng;
use std::time::Duration;

use crate::error::{Error, Result};

/// Timestamp layout used by the Product Hunt API.
pub const SOURCE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub async fn sleep_with_jitter(base_ms: u64, jitter_ms: u64) {
    let jitter = rand::rng().random_range(0..=jitter_ms);
    tokio::time::sleep(Duration::from_millis(base_ms + jitter)).await;
}

pub fn display_offset(utc_offset_hours: i32) -> Result<FixedOffset> {
    utc_offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| Error::UnexpectedPayload(format!("invalid UTC offset: {utc_offset_hours}h")))
}

/// Converts a `YYYY-MM-DDTHH:MM:SSZ` timestamp into the display zone and format.
pub fn to_display_time(utc_time: &str, offset: FixedOffset, format: &str) -> Result<String> {
    let naive = NaiveDateTime::parse_from_str(utc_time, SOURCE_TIME_FORMAT)?;
    let local = naive.and_utc().with_timezone(&offset);
    Ok(local.format(format).to_string())
}

/// The UTC calendar day before `now`.
pub fn previous_day(now: DateTime<Utc>) -> NaiveDate {
    (now - ChronoDuration::days(1)).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BEIJING_FORMAT: &str = "%Y年%m月%d日 %p%I:%M (北京时间)";

    #[test]
    fn converts_to_beijing_display_time() {
        let offset = display_offset(8).unwrap();
        let first = to_display_time("2025-03-07T16:01:00Z", offset, BEIJING_FORMAT).unwrap();
        let second = to_display_time("2025-03-07T16:01:00Z", offset, BEIJING_FORMAT).unwrap();

        assert_eq!(first, "2025年03月08日 AM12:01 (北京时间)");
        assert_eq!(first, second);
    }

    #[test]
    fn afternoon_uses_pm_marker() {
        let offset = display_offset(8).unwrap();
        let shown = to_display_time("2025-09-19T07:01:00Z", offset, BEIJING_FORMAT).unwrap();
        assert_eq!(shown, "2025年09月19日 PM03:01 (北京时间)");
    }

    #[test]
    fn rejects_other_layouts() {
        let offset = display_offset(8).unwrap();
        assert!(to_display_time("2025-03-07 16:01:00", offset, BEIJING_FORMAT).is_err());
    }

    #[test]
    fn out_of_range_offsets_are_errors() {
        assert!(display_offset(-8).is_ok());
        assert!(display_offset(24).is_err());
        assert!(display_offset(i32::MAX).is_err());
        assert!(display_offset(i32::MIN).is_err());
    }

    #[test]
    fn previous_day_crosses_month_boundary() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 30, 0).unwrap();
        assert_eq!(previous_day(now), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }
}
