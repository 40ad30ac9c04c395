//! The `roadquiz login` command.

use anyhow::Result;

use super::{prompt_line, Context};

pub fn execute(ctx: &Context, username: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_line("Password")?,
    };

    let mut store = ctx.store()?;
    let user = store.login(&username, &password)?;
    println!("Logged in as {}", user.username);
    Ok(())
}
