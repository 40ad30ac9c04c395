//! The `roadquiz register` command.

use anyhow::Result;
use roadquiz_profile::RegisterForm;

use super::{prompt_line, Context};

pub fn execute(
    ctx: &Context,
    username: String,
    email: Option<String>,
    password: Option<String>,
    accept_terms: bool,
) -> Result<()> {
    let (password, confirm_password) = match password {
        Some(p) => (p.clone(), p),
        None => (prompt_line("Password")?, prompt_line("Confirm password")?),
    };

    let form = RegisterForm {
        username,
        email,
        password,
        confirm_password,
        accept_terms,
    };

    let mut store = ctx.store()?;
    let user = store.register(&form)?;
    println!("Registered and logged in as {}", user.username);
    Ok(())
}
