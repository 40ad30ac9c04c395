//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionBank, MIN_OPTIONS};

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    time_limit_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u32,
    #[serde(alias = "question")]
    prompt: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(alias = "options")]
    answers: Vec<String>,
    #[serde(alias = "correct_answer")]
    correct: usize,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            prompt: q.prompt.trim().to_string(),
            image: q.image.filter(|i| !i.trim().is_empty()),
            options: q.answers,
            correct: q.correct,
        })
        .collect();

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        time_limit_secs: parsed.bank.time_limit_secs,
        questions,
    })
}

/// Recursively load all `.toml` question banks from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank from a file, or every bank from a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_bank(path)?])
    }
}

/// A finding from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<u32>,
    /// Warning message.
    pub message: String,
    /// Whether the quiz engine would refuse the bank because of it.
    pub is_error: bool,
}

impl ValidationWarning {
    fn error(question_id: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            question_id,
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(question_id: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            question_id,
            message: message.into(),
            is_error: false,
        }
    }
}

/// Validate a question bank for common issues.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning::error(None, "bank has no questions"));
    }

    if bank.time_limit_secs == Some(0) {
        warnings.push(ValidationWarning::warning(
            None,
            "time_limit_secs is 0, the quiz ends on the first tick",
        ));
    }

    let mut seen_ids = HashSet::new();
    let mut last_id = 0;
    for q in &bank.questions {
        let id = Some(q.id);

        if q.id == 0 {
            warnings.push(ValidationWarning::error(id, "question id must be positive"));
        }
        if !seen_ids.insert(q.id) {
            warnings.push(ValidationWarning::warning(
                id,
                format!("duplicate question ID: {}", q.id),
            ));
        } else if q.id < last_id {
            warnings.push(ValidationWarning::warning(
                id,
                format!("question {} listed after question {last_id}", q.id),
            ));
        }
        last_id = last_id.max(q.id);

        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning::warning(id, "prompt is empty"));
        }
        if q.options.len() < MIN_OPTIONS {
            warnings.push(ValidationWarning::error(
                id,
                format!("needs at least {MIN_OPTIONS} answers, has {}", q.options.len()),
            ));
        }
        if q.correct >= q.options.len() {
            warnings.push(ValidationWarning::error(
                id,
                format!(
                    "correct answer index {} out of range ({} answers)",
                    q.correct,
                    q.options.len()
                ),
            ));
        }
        let distinct: HashSet<&str> = q.options.iter().map(|o| o.trim()).collect();
        if distinct.len() != q.options.len() {
            warnings.push(ValidationWarning::warning(id, "answers contain duplicates"));
        }
    }

    warnings
}

/// Returns `true` if any finding would make the engine reject the bank.
pub fn has_errors(warnings: &[ValidationWarning]) -> bool {
    warnings.iter().any(|w| w.is_error)
}
