//! The `roadquiz whoami` command.

use anyhow::Result;

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    match store.current_user() {
        Some(user) => {
            println!("[{}] {}", user.initial(), user.username);
            println!("Email: {}", user.email.as_deref().unwrap_or("not set"));
            println!("Saved results: {}", user.results.len());
        }
        None => println!("Not logged in."),
    }
    Ok(())
}
