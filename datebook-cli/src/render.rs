//! Terminal formatting for events and rules.

use chrono::{NaiveDate, NaiveDateTime};
use datebook_core::{Interval, Occurrence, RecurrenceRule};
use owo_colors::OwoColorize;

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn format_date_label(start: &NaiveDateTime) -> String {
    date_label(start.date(), chrono::Local::now().date_naive())
}

fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}

/// Format the time span of an event (e.g. "15:00-16:00")
fn format_span(start: &NaiveDateTime, end: &NaiveDateTime) -> String {
    if start.date() == end.date() {
        format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
    } else {
        format!("{}-{}", start.format("%H:%M"), end.format("%b %-d %H:%M"))
    }
}

/// One listing line: time span, title, category and id.
pub fn render_occurrence(occ: &Occurrence) -> String {
    let event = &occ.event;
    let span = format_span(&event.start, &event.end);
    let tag = if occ.is_generated() {
        format!("[{} #{}.{}]", event.category, occ.key.event_id, occ.key.index)
    } else {
        format!("[{} #{}]", event.category, occ.key.event_id)
    };

    format!("  {:>13} {} {}", span, event.title, tag.dimmed())
}

/// Describe a rule, e.g. "Repeats weekly, 4 times until 2026-03-01"
pub fn render_rule(rule: &RecurrenceRule) -> String {
    let unit = match rule.interval {
        Interval::None => return "Does not repeat".to_string(),
        Interval::Daily => "daily",
        Interval::Weekly => "weekly",
        Interval::Monthly => "monthly",
        Interval::Yearly => "yearly",
    };

    let mut text = format!("Repeats {}, {} times", unit, rule.times);
    if let Some(until) = rule.end_date {
        text.push_str(&format!(" until {}", until));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_label() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 24).unwrap();
        assert_eq!(date_label(today, today), "Today");
        assert_eq!(date_label(today.succ_opt().unwrap(), today), "Tomorrow");
        assert_eq!(
            date_label(NaiveDate::from_ymd_opt(2026, 2, 27).unwrap(), today),
            "Fri Feb 27 2026"
        );
    }

    #[test]
    fn test_render_rule() {
        let rule = RecurrenceRule::new(1, Interval::Weekly, 4)
            .until(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(render_rule(&rule), "Repeats weekly, 4 times until 2026-03-01");
        assert_eq!(
            render_rule(&RecurrenceRule::new(1, Interval::None, 1)),
            "Does not repeat"
        );
    }

    #[test]
    fn test_format_span() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let end = start + chrono::Duration::minutes(45);
        assert_eq!(format_span(&start, &end), "09:30-10:15");
    }
}
