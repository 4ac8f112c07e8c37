//! Date stamps for summary pages.
//!
//! Every created page is titled with the day it was generated
//! (`"Tuesday [10/28/25]"`), and the model is told the long-form date
//! (`"October 28, 2025"`) so relative phrases in the transcript resolve.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use taskscribe_types::config::DEFAULT_TIMEZONE;

/// Source of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock [`Clock`] reading the calendar date in a fixed zone, so the
/// title does not depend on the host's local time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: Tz,
}

impl SystemClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// Calendar date of `instant` in this clock's zone.
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.zone).date_naive()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

/// A [`Clock`] frozen on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Both renderings of one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStamp {
    /// `"Sunday [10/26/25]"`
    pub page_title: String,
    /// `"October 26, 2025"`
    pub prompt_date: String,
}

impl DateStamp {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            page_title: date.format("%A [%m/%d/%y]").to_string(),
            prompt_date: date.format("%B %d, %Y").to_string(),
        }
    }

    pub fn today(clock: &dyn Clock) -> Self {
        Self::for_date(clock.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_page_title_format() {
        let stamp = DateStamp::for_date(date(2025, 10, 28));
        assert_eq!(stamp.page_title, "Tuesday [10/28/25]");
    }

    #[test]
    fn test_prompt_date_format() {
        let stamp = DateStamp::for_date(date(2025, 10, 27));
        assert_eq!(stamp.prompt_date, "October 27, 2025");
    }

    #[test]
    fn test_single_digit_fields_are_zero_padded() {
        let stamp = DateStamp::for_date(date(2026, 3, 5));
        assert_eq!(stamp.page_title, "Thursday [03/05/26]");
        assert_eq!(stamp.prompt_date, "March 05, 2026");
    }

    #[test]
    fn test_system_clock_uses_its_zone_near_midnight() {
        // 23:30 on Oct 28 in Detroit (EDT), already Oct 29 in UTC.
        let instant = "2025-10-29T03:30:00Z".parse::<DateTime<Utc>>().unwrap();

        let detroit = SystemClock::default();
        assert_eq!(detroit.date_at(instant), date(2025, 10, 28));
        assert_eq!(
            DateStamp::for_date(detroit.date_at(instant)).page_title,
            "Tuesday [10/28/25]"
        );

        let utc = SystemClock::new(chrono_tz::UTC);
        assert_eq!(utc.date_at(instant), date(2025, 10, 29));

        let after_midnight = "2025-10-29T04:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(detroit.date_at(after_midnight), date(2025, 10, 29));
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock(date(2025, 10, 26));
        assert_eq!(DateStamp::today(&clock).page_title, "Sunday [10/26/25]");
    }
}
