//! Recurrence rules and occurrence expansion.
//!
//! A rule repeats its base event `times - 1` more times at a fixed interval.
//! Generated occurrences are never persisted; they are rebuilt on every read.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DatebookError;
use crate::event::Event;

/// Repetition unit of a recurrence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Interval {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Interval {
    pub fn code(&self) -> &'static str {
        match self {
            Interval::None => "None",
            Interval::Daily => "1d",
            Interval::Weekly => "1w",
            Interval::Monthly => "1m",
            Interval::Yearly => "1y",
        }
    }

    /// Shift `dt` forward by `count` units. Month and year steps clamp to the
    /// last valid day of the target month.
    fn shift(&self, dt: NaiveDateTime, count: u32) -> Option<NaiveDateTime> {
        match self {
            Interval::None => Some(dt),
            Interval::Daily => dt.checked_add_signed(Duration::days(i64::from(count))),
            Interval::Weekly => dt.checked_add_signed(Duration::weeks(i64::from(count))),
            Interval::Monthly => dt.checked_add_months(Months::new(count)),
            Interval::Yearly => dt.checked_add_months(Months::new(count.checked_mul(12)?)),
        }
    }
}

impl FromStr for Interval {
    type Err = DatebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Interval::None),
            "1d" => Ok(Interval::Daily),
            "1w" => Ok(Interval::Weekly),
            "1m" => Ok(Interval::Monthly),
            "1y" => Ok(Interval::Yearly),
            _ => Err(DatebookError::invalid("interval", s.trim())),
        }
    }
}

impl TryFrom<String> for Interval {
    type Error = DatebookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for &'static str {
    fn from(interval: Interval) -> Self {
        interval.code()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Recurrence descriptor for one base event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub event_id: u64,
    pub interval: Interval,
    /// Total number of occurrences including the base event.
    pub times: u32,
    #[serde(default, with = "crate::timestamp::optional_date")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Largest accepted `times`.
    pub const MAX_TIMES: u32 = 1000;

    pub fn new(event_id: u64, interval: Interval, times: u32) -> Self {
        RecurrenceRule {
            event_id,
            interval,
            times,
            end_date: None,
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Whether this rule produces anything beyond the base event.
    pub fn is_repeating(&self) -> bool {
        self.interval != Interval::None && self.times > 1
    }
}

/// How the optional `end_date` of a rule bounds generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndDatePolicy {
    /// Generation is governed by `times` alone.
    #[default]
    Ignore,
    /// Occurrences starting after `end_date` are dropped.
    Inclusive,
}

impl EndDatePolicy {
    fn allows(&self, start: NaiveDateTime, end_date: Option<NaiveDate>) -> bool {
        match (self, end_date) {
            (EndDatePolicy::Inclusive, Some(limit)) => start.date() <= limit,
            _ => true,
        }
    }
}

/// Identity of one occurrence: the base event plus its position in the series.
/// The base event itself is index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OccurrenceKey {
    pub event_id: u64,
    pub index: u32,
}

/// A base event or one of its generated repetitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    #[serde(flatten)]
    pub key: OccurrenceKey,
    pub event: Event,
}

impl Occurrence {
    pub fn base(event: Event) -> Self {
        Occurrence {
            key: OccurrenceKey {
                event_id: event.id,
                index: 0,
            },
            event,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.key.index > 0
    }
}

/// Expand a base event into its additional occurrences, ignoring `end_date`.
///
/// The base event is not included.
pub fn expand(base: &Event, rule: &RecurrenceRule) -> Vec<Occurrence> {
    expand_with(base, rule, EndDatePolicy::Ignore)
}

/// Expand a base event into occurrences `1..times` under the given end-date policy.
pub fn expand_with(base: &Event, rule: &RecurrenceRule, policy: EndDatePolicy) -> Vec<Occurrence> {
    repetitions(base, rule, policy).collect()
}

/// Lazily generate the occurrences of [`expand_with`] in start order.
///
/// Never yields more than `RecurrenceRule::MAX_TIMES - 1` items, even for a
/// rule read from a hand-edited file.
pub fn repetitions<'a>(
    base: &'a Event,
    rule: &'a RecurrenceRule,
    policy: EndDatePolicy,
) -> impl Iterator<Item = Occurrence> + 'a {
    let count = if rule.is_repeating() {
        rule.times.min(RecurrenceRule::MAX_TIMES)
    } else {
        1
    };

    (1..count)
        .map_while(move |index| {
            let start = rule.interval.shift(base.start, index)?;
            let end = rule.interval.shift(base.end, index)?;
            Some(Occurrence {
                key: OccurrenceKey {
                    event_id: base.id,
                    index,
                },
                event: Event {
                    start,
                    end,
                    ..base.clone()
                },
            })
        })
        .take_while(move |occ| policy.allows(occ.event.start, rule.end_date))
}
