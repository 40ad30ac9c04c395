//! One module per subcommand.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use roadquiz_core::config::{load_config_from, RoadquizConfig};
use roadquiz_profile::ProfileStore;

pub mod history;
pub mod init;
pub mod login;
pub mod logout;
pub mod register;
pub mod review;
pub mod run;
pub mod theme;
pub mod validate;
pub mod whoami;

/// Global options shared by every command.
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl Context {
    pub fn config(&self) -> Result<RoadquizConfig> {
        let mut config = load_config_from(self.config_path.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }

    pub fn store(&self) -> Result<ProfileStore> {
        let config = self.config()?;
        ProfileStore::open_in(&config.data_dir)
    }
}

/// Read one line from stdin after printing `label` to stderr.
pub fn prompt_line(label: &str) -> Result<String> {
    eprint!("{label}: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("failed to read {}", label.to_lowercase()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
