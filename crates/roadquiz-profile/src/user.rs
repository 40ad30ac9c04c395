//! Registered users and their saved results.

use chrono::{DateTime, Utc};
use roadquiz_core::report::QuizReport;
use roadquiz_core::scoring::ResultBand;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProfileError;

/// Allowed username length, in characters.
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
/// Minimum password length, in characters.
pub const PASSWORD_MIN: usize = 6;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Display name as typed at registration.
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub created: DateTime<Utc>,
    /// Saved attempts, newest first.
    #[serde(default)]
    pub results: Vec<ResultRecord>,
}

impl User {
    /// Case-insensitive username comparison.
    pub fn matches_name(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.trim().to_lowercase()
    }

    /// Initial shown as the avatar.
    pub fn initial(&self) -> char {
        self.username
            .chars()
            .next()
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or('?')
    }
}

/// One finished attempt in a user's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Id of the report this record was taken from.
    pub id: Uuid,
    pub test_name: String,
    pub bank_id: String,
    pub score: usize,
    pub total_questions: usize,
    pub percentage: u32,
    pub band: ResultBand,
    pub elapsed_secs: u64,
    #[serde(default)]
    pub timed_out: bool,
    /// Ids of questions answered wrong or left unanswered.
    #[serde(default)]
    pub wrong_answers: Vec<u32>,
    pub date: DateTime<Utc>,
}

impl From<&QuizReport> for ResultRecord {
    fn from(report: &QuizReport) -> Self {
        let outcome = &report.outcome;
        Self {
            id: report.id,
            test_name: report.bank.name.clone(),
            bank_id: report.bank.id.clone(),
            score: outcome.correct_count,
            total_questions: outcome.total_questions,
            percentage: outcome.percentage,
            band: outcome.band,
            elapsed_secs: outcome.elapsed_secs,
            timed_out: outcome.timed_out,
            wrong_answers: outcome
                .review_entries
                .iter()
                .map(|e| e.question.id)
                .collect(),
            date: report.created_at,
        }
    }
}

/// Input collected by the registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl RegisterForm {
    /// Check field rules that do not depend on existing users.
    ///
    /// Returns the trimmed username on success.
    pub fn check(&self) -> Result<&str, ProfileError> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(ProfileError::MissingFields);
        }

        let len = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            return Err(ProfileError::UsernameLength {
                len,
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        if self.password.chars().count() < PASSWORD_MIN {
            return Err(ProfileError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if self.password != self.confirm_password {
            return Err(ProfileError::PasswordMismatch);
        }
        if !self.accept_terms {
            return Err(ProfileError::TermsNotAccepted);
        }
        Ok(username)
    }

    /// Trimmed email, `None` when blank.
    pub fn email(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
    }
}
