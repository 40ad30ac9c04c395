//! Light and dark color themes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Environment variable that forces the system theme.
pub const THEME_ENV_VAR: &str = "ROADQUIZ_THEME";

/// Color theme for rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Background color announced to the host (`theme-color`).
    pub fn theme_color(self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Dark => "#0f172a",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Theme the terminal environment asks for.
    ///
    /// Checks `ROADQUIZ_THEME`, then the `COLORFGBG` hint set by many
    /// terminals; falls back to light.
    pub fn system_preference() -> Self {
        detect(
            std::env::var(THEME_ENV_VAR).ok().as_deref(),
            std::env::var("COLORFGBG").ok().as_deref(),
        )
    }
}

fn detect(forced: Option<&str>, colorfgbg: Option<&str>) -> Theme {
    if let Some(theme) = forced.and_then(|v| v.parse().ok()) {
        return theme;
    }
    colorfgbg.and_then(from_colorfgbg).unwrap_or_default()
}

/// Interpret a `COLORFGBG` value such as `15;0` (light text on black).
fn from_colorfgbg(value: &str) -> Option<Theme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    // ANSI colors 0-6 and 8 are dark backgrounds
    if bg <= 6 || bg == 8 {
        Some(Theme::Dark)
    } else {
        Some(Theme::Light)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}' (expected light or dark)")),
        }
    }
}
