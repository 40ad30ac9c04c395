//! The `roadquiz init` command.

use std::path::Path;

use anyhow::Result;
use roadquiz_core::config::CONFIG_FILE_NAME;

pub fn execute() -> Result<()> {
    // Create roadquiz.toml
    if Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE_NAME, SAMPLE_CONFIG)?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    // Create example question bank
    std::fs::create_dir_all("banks")?;
    let example_path = Path::new("banks/speed.toml");
    if example_path.exists() {
        println!("banks/speed.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/speed.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: roadquiz validate --bank banks/speed.toml");
    println!("  2. Run: roadquiz register --username <name> --accept-terms");
    println!("  3. Run: roadquiz run");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# roadquiz configuration

time_limit_secs = 1200
reveal_delay_ms = 500
auto_finish = false
default_bank = "banks/speed.toml"
results_dir = "./roadquiz-results"
# data_dir = "${HOME}/.local/share/roadquiz"
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "speed"
name = "Speed Limits"
description = "Speed limits and safe speed choice"
time_limit_secs = 300

[[questions]]
id = 1
prompt = "What is the maximum speed for a car in a built-up area unless signs say otherwise?"
answers = ["50 km/h", "60 km/h", "70 km/h"]
correct = 1

[[questions]]
id = 2
prompt = "What is the maximum speed for a car on a motorway?"
answers = ["90 km/h", "110 km/h", "130 km/h"]
correct = 2

[[questions]]
id = 3
prompt = "What is the speed limit in a residential zone?"
answers = ["20 km/h", "30 km/h", "40 km/h"]
correct = 0
"#;
