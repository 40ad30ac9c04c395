//! The `roadquiz theme` command.

use anyhow::Result;
use roadquiz_profile::Theme;

use super::Context;

pub fn execute(ctx: &Context, mode: Option<String>) -> Result<()> {
    let mut store = ctx.store()?;

    let theme = match mode.as_deref().map(str::trim) {
        None => {
            let source = if store.stored_theme().is_some() {
                "saved"
            } else {
                "system"
            };
            println!("Theme: {} ({source})", store.theme());
            return Ok(());
        }
        Some("toggle") => store.toggle_theme()?,
        Some(value) => {
            let theme: Theme = value.parse().map_err(anyhow::Error::msg)?;
            store.set_theme(theme)?;
            theme
        }
    };

    println!("Theme: {theme}");
    Ok(())
}
