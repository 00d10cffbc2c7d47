//! Per-user event statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::event::{Category, Event};
use crate::recurrence::{EndDatePolicy, RecurrenceRule, repetitions};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_events: usize,
    pub recurring_events: usize,
    pub generated_occurrences: usize,
    pub by_category: BTreeMap<Category, usize>,
}

impl Stats {
    pub fn collect(
        events: &[Event],
        rules: &BTreeMap<u64, RecurrenceRule>,
        policy: EndDatePolicy,
    ) -> Self {
        // Every category appears, even with a zero count.
        let mut by_category: BTreeMap<Category, usize> =
            Category::ALL.into_iter().map(|c| (c, 0)).collect();
        let mut recurring_events = 0;
        let mut generated_occurrences = 0;

        for event in events {
            *by_category.entry(event.category).or_default() += 1;

            if let Some(rule) = rules.get(&event.id).filter(|r| r.is_repeating()) {
                recurring_events += 1;
                generated_occurrences += repetitions(event, rule, policy).count();
            }
        }

        Stats {
            total_events: events.len(),
            recurring_events,
            generated_occurrences,
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NewEvent;
    use crate::recurrence::Interval;
    use chrono::NaiveDate;

    #[test]
    fn test_collect() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let events = vec![
            NewEvent::new(1, "a", start, start, Category::Work).into_event(1),
            NewEvent::new(1, "b", start, start, Category::Work).into_event(2),
            NewEvent::new(1, "c", start, start, Category::Health).into_event(3),
        ];
        let rules = BTreeMap::from([
            (1, RecurrenceRule::new(1, Interval::Weekly, 4)),
            (3, RecurrenceRule::new(3, Interval::None, 4)),
        ]);

        let stats = Stats::collect(&events, &rules, EndDatePolicy::Ignore);

        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.recurring_events, 1);
        assert_eq!(stats.generated_occurrences, 3);
        assert_eq!(stats.by_category[&Category::Work], 2);
        assert_eq!(stats.by_category[&Category::Social], 0);
    }
}
