use anyhow::Result;
use datebook_core::date_range::DateRange;
use datebook_core::{Datebook, EventFilter, Occurrence};
use owo_colors::OwoColorize;

use crate::render::{format_date_label, render_occurrence, render_rule};

pub fn run(
    datebook: &Datebook,
    user: Option<u64>,
    expand: bool,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let filter = EventFilter {
        user_id: user,
        ..Default::default()
    }
    .within(DateRange::from_args(from, to)?);

    let mut listing = datebook.events_with_occurrences(&filter);
    if !expand {
        listing.retain(|occ| !occ.is_generated());
    }

    if listing.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    print_grouped(&listing);
    Ok(())
}

/// Print occurrences grouped under a label per day.
fn print_grouped(listing: &[Occurrence]) {
    let mut current_date: Option<String> = None;

    for occ in listing {
        let date_label = format_date_label(&occ.event.start);

        if current_date.as_ref() != Some(&date_label) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label.bold());
            current_date = Some(date_label);
        }

        println!("{}", render_occurrence(occ));
    }
}

pub fn show(datebook: &Datebook, id: u64) -> Result<()> {
    let event = datebook.event(id)?;

    println!("{} {}", format!("#{}", event.id).dimmed(), event.title.bold());
    println!("  {} → {}", event.start, event.end);
    println!("  {} · user {}", event.category, event.user_id);
    if !event.description.is_empty() {
        println!("  {}", event.description);
    }
    if let Some(rule) = datebook.rules().get(id) {
        println!("  {}", render_rule(&rule).cyan());
    }

    Ok(())
}
