use anyhow::Result;
use datebook_core::{Datebook, NewUser};
use owo_colors::OwoColorize;

pub fn add(datebook: &Datebook, name: String, email: String, password: String) -> Result<()> {
    let user = datebook.register(NewUser {
        name,
        email,
        password,
    })?;

    println!(
        "{}",
        format!("  Registered #{}: {} <{}>", user.id, user.name, user.email).green()
    );
    Ok(())
}
