//! Date range for filtering events.

use chrono::{NaiveDateTime, NaiveTime};

use crate::error::DatebookResult;
use crate::event::Event;
use crate::timestamp;

/// Inclusive window over event times.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateRange {
    /// Build a range from user input.
    /// - `from`: a date (start of day) or a timestamp
    /// - `to`: a date (end of day) or a timestamp
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> DatebookResult<Self> {
        let from_dt = from.map(timestamp::parse).transpose()?;
        let to_dt = to.map(parse_end).transpose()?;

        Ok(DateRange {
            from: from_dt,
            to: to_dt,
        })
    }

    /// Whether the event overlaps the window at all.
    pub fn overlaps(&self, event: &Event) -> bool {
        let after_from = self.from.is_none_or(|from| event.end >= from);
        let before_to = self.to.is_none_or(|to| event.start <= to);
        after_from && before_to
    }
}

/// A bare date as an upper bound covers the whole day.
fn parse_end(s: &str) -> DatebookResult<NaiveDateTime> {
    match timestamp::parse_date(s) {
        Ok(date) => Ok(date.and_time(end_of_day())),
        Err(_) => timestamp::parse(s),
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Category, NewEvent};
    use chrono::NaiveDate;

    fn event_on(day: u32) -> Event {
        let start = NaiveDate::from_ymd_opt(2026, 1, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        NewEvent::new(1, "x", start, start + chrono::Duration::hours(1), Category::Other).into_event(1)
    }

    #[test]
    fn test_bare_dates_cover_whole_days() {
        let range = DateRange::from_args(Some("2026-01-10"), Some("2026-01-12")).unwrap();
        assert!(!range.overlaps(&event_on(9)));
        assert!(range.overlaps(&event_on(10)));
        assert!(range.overlaps(&event_on(12)));
        assert!(!range.overlaps(&event_on(13)));
    }

    #[test]
    fn test_unbounded() {
        let range = DateRange::from_args(None, None).unwrap();
        assert_eq!(range, DateRange::default());
        assert!(range.overlaps(&event_on(1)));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(DateRange::from_args(Some("soon"), None).is_err());
    }
}
