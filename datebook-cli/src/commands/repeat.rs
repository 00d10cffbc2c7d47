use anyhow::{Context, Result};
use datebook_core::{Datebook, Interval, RecurrenceRule, timestamp};
use owo_colors::OwoColorize;

use crate::render::render_rule;

pub fn run(
    datebook: &Datebook,
    id: u64,
    interval: Option<String>,
    times: Option<u32>,
    until: Option<String>,
) -> Result<()> {
    let (Some(interval), Some(times)) = (interval, times) else {
        anyhow::bail!("Give an interval and a count, e.g. `datebook repeat {} 1w 4`", id);
    };

    let interval: Interval = interval.parse()?;
    let mut rule = RecurrenceRule::new(id, interval, times);
    rule.end_date = until
        .as_deref()
        .map(timestamp::parse_date)
        .transpose()
        .context("Invalid --until")?;
    let repeating = rule.is_repeating();

    match datebook.set_recurrence(rule)? {
        Some(current) if repeating => println!("  {}", render_rule(&current).green()),
        Some(current) => println!(
            "  {} {}",
            "Not repeating; kept existing rule:".yellow(),
            render_rule(&current)
        ),
        None => println!("{}", "  Event does not repeat".dimmed()),
    }

    Ok(())
}

pub fn clear(datebook: &Datebook, id: u64) -> Result<()> {
    if datebook.clear_recurrence(id)? {
        println!("{}", format!("  Cleared recurrence for #{}", id).green());
    } else {
        println!("{}", format!("  #{} has no recurrence rule", id).dimmed());
    }
    Ok(())
}
