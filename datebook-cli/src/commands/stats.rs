use anyhow::Result;
use datebook_core::{Datebook, Session};
use owo_colors::OwoColorize;

pub fn run(datebook: &Datebook, user: u64) -> Result<()> {
    let session = Session::new(user)?;
    let user = datebook.user_for(session)?;
    let stats = datebook.stats(session)?;

    println!("{}", format!("Statistics for {}", user.name).bold());
    println!("  Events:      {}", stats.total_events);
    println!("  Recurring:   {}", stats.recurring_events);
    println!("  Repetitions: {}", stats.generated_occurrences);
    println!();
    for (category, count) in &stats.by_category {
        let line = format!("  {:<10} {}", category.as_str(), count);
        if *count == 0 {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }

    Ok(())
}
