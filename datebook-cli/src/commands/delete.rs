use anyhow::Result;
use datebook_core::Datebook;
use owo_colors::OwoColorize;

pub fn run(datebook: &Datebook, id: u64) -> Result<()> {
    if datebook.delete_event(id)? {
        println!("{}", format!("  Deleted #{}", id).green());
    } else {
        anyhow::bail!("Event {} not found", id);
    }
    Ok(())
}
