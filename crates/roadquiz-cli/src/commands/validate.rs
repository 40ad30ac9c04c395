//! The `roadquiz validate` command.

use std::path::PathBuf;

use anyhow::Result;
use roadquiz_core::parser::{has_errors, load_banks, validate_bank};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = load_banks(&bank_path)?;
    anyhow::ensure!(
        !banks.is_empty(),
        "no question banks found in {}",
        bank_path.display()
    );

    let mut total_warnings = 0;
    let mut failed = false;

    for bank in &banks {
        println!("Bank: {} ({} questions)", bank.name, bank.len());

        let warnings = validate_bank(bank);
        for w in &warnings {
            let prefix = w
                .question_id
                .map(|id| format!("  [#{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            let level = if w.is_error { "ERROR" } else { "WARNING" };
            println!("{prefix} {level}: {}", w.message);
        }
        total_warnings += warnings.len();
        failed |= has_errors(&warnings);
    }

    if failed {
        anyhow::bail!("question bank validation failed");
    }
    if total_warnings == 0 {
        println!("All question banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
