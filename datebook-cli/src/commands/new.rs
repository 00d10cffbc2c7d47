use anyhow::{Context, Result};
use chrono::Duration;
use datebook_core::{Category, Datebook, Interval, NewEvent, Repeat, timestamp};
use owo_colors::OwoColorize;

use crate::render::render_rule;

pub struct NewArgs {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub user: u64,
    pub repeat: Option<String>,
    pub times: u32,
    pub until: Option<String>,
}

pub fn run(datebook: &Datebook, args: NewArgs) -> Result<()> {
    let new = build_event(&args)?;
    let repeat = build_repeat(&args)?;

    let (event, rule) = match repeat {
        Some(repeat) => datebook.create_repeating_event(new, repeat)?,
        None => (datebook.create_event(new)?, None),
    };

    println!("{}", format!("  Created #{}: {}", event.id, event.title).green());
    if let Some(rule) = rule {
        println!("  {}", render_rule(&rule).cyan());
    }

    Ok(())
}

fn build_event(args: &NewArgs) -> Result<NewEvent> {
    let start = timestamp::parse(&args.start).context("Invalid --start")?;
    let end = match &args.end {
        Some(end) => timestamp::parse(end).context("Invalid --end")?,
        None => default_end(start),
    };
    let category: Category = args.category.parse()?;

    let mut event = NewEvent::new(args.user, args.title.clone(), start, end, category);
    if let Some(description) = &args.description {
        event = event.with_description(description.clone());
    }
    Ok(event)
}

fn build_repeat(args: &NewArgs) -> Result<Option<Repeat>> {
    let Some(code) = &args.repeat else {
        return Ok(None);
    };

    let interval: Interval = code.parse()?;
    let until = args
        .until
        .as_deref()
        .map(timestamp::parse_date)
        .transpose()
        .context("Invalid --until")?;

    Ok(Some(Repeat {
        interval,
        times: args.times,
        until,
    }))
}

/// Events without an explicit end last one hour.
fn default_end(start: chrono::NaiveDateTime) -> chrono::NaiveDateTime {
    start + Duration::hours(1)
}
