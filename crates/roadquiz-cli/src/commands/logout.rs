//! The `roadquiz logout` command.

use anyhow::Result;

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let mut store = ctx.store()?;
    if store.logout()? {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}
