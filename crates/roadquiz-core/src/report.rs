//! Quiz result reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuestionBank;
use crate::scoring::QuizOutcome;

/// A complete record of one finished attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the bank the attempt was taken on.
    pub bank: BankSummary,
    /// Username of the person who took the quiz, if logged in.
    #[serde(default)]
    pub user: Option<String>,
    /// Score, timing, and review entries.
    pub outcome: QuizOutcome,
}

/// Summary of a question bank (without the questions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl From<&QuestionBank> for BankSummary {
    fn from(bank: &QuestionBank) -> Self {
        Self {
            id: bank.id.clone(),
            name: bank.name.clone(),
            question_count: bank.questions.len(),
        }
    }
}

impl QuizReport {
    pub fn new(bank: &QuestionBank, user: Option<String>, outcome: QuizOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bank: BankSummary::from(bank),
            user,
            outcome,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// File name used when saving into a results directory.
    ///
    /// Ends with a short form of the report id, so attempts saved within
    /// the same second do not collide.
    pub fn file_stem(&self) -> String {
        let id = self.id.simple().to_string();
        format!(
            "result-{}-{}-{}",
            self.bank.id,
            self.created_at.format("%Y-%m-%dT%H%M%S"),
            &id[..8]
        )
    }
}
