//! JSON-file profile store.
//!
//! Holds every registered user, the id of the logged-in user, and the
//! stored theme preference. Each mutating call writes the file back.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use roadquiz_core::report::QuizReport;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProfileError;
use crate::password::{hash_password, verify_password};
use crate::theme::Theme;
use crate::user::{RegisterForm, ResultRecord, User};

/// File name of the store inside the data directory.
pub const PROFILE_FILE_NAME: &str = "profile.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    current_user: Option<Uuid>,
    #[serde(default)]
    theme: Option<Theme>,
}

/// Users, session, and preferences backed by a single JSON file.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    data: StoreData,
}

impl ProfileStore {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store. A file that cannot be parsed
    /// is logged and treated as empty; it is overwritten on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read profile store: {}", path.display()))?;
            match serde_json::from_str::<StoreData>(&content) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(
                        "profile store {} is corrupt, starting empty: {e}",
                        path.display()
                    );
                    StoreData::default()
                }
            }
        } else {
            StoreData::default()
        };

        Ok(Self { path, data })
    }

    /// Open `profile.json` inside a data directory.
    pub fn open_in(data_dir: &Path) -> Result<Self> {
        Self::open(data_dir.join(PROFILE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the store back to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create data directory: {}", parent.display())
            })?;
        }
        let json =
            serde_json::to_string_pretty(&self.data).context("failed to serialize profile store")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write profile store: {}", self.path.display()))?;
        Ok(())
    }

    /// All registered users.
    pub fn users(&self) -> &[User] {
        &self.data.users
    }

    fn find_by_name(&self, username: &str) -> Option<&User> {
        self.data.users.iter().find(|u| u.matches_name(username))
    }

    /// Register a new user and log them in.
    pub fn register(&mut self, form: &RegisterForm) -> Result<&User> {
        let username = form.check()?.to_string();
        if self.find_by_name(&username).is_some() {
            return Err(ProfileError::UsernameTaken(username).into());
        }

        let user = User {
            id: Uuid::new_v4(),
            username,
            email: form.email(),
            password_hash: hash_password(&form.password)?,
            created: Utc::now(),
            results: Vec::new(),
        };
        tracing::info!("registered user {}", user.username);

        self.data.current_user = Some(user.id);
        self.data.users.push(user);
        self.save()?;
        Ok(&self.data.users[self.data.users.len() - 1])
    }

    /// Log in with a username (case-insensitive) and password.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&User> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ProfileError::MissingFields.into());
        }

        let index = self
            .data
            .users
            .iter()
            .position(|u| u.matches_name(username) && verify_password(password, &u.password_hash))
            .ok_or(ProfileError::InvalidCredentials)?;

        self.data.current_user = Some(self.data.users[index].id);
        self.save()?;
        tracing::debug!("logged in as {}", self.data.users[index].username);
        Ok(&self.data.users[index])
    }

    /// Clear the session. Returns `false` if nobody was logged in.
    pub fn logout(&mut self) -> Result<bool> {
        let was_logged_in = self.data.current_user.take().is_some();
        if was_logged_in {
            self.save()?;
        }
        Ok(was_logged_in)
    }

    /// The logged-in user, if the session points at an existing user.
    pub fn current_user(&self) -> Option<&User> {
        let id = self.data.current_user?;
        self.data.users.iter().find(|u| u.id == id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    fn current_user_mut(&mut self) -> Option<&mut User> {
        let id = self.data.current_user?;
        self.data.users.iter_mut().find(|u| u.id == id)
    }

    /// Add a finished attempt to the front of the current user's history.
    ///
    /// Returns `false` without saving when nobody is logged in.
    pub fn save_result(&mut self, report: &QuizReport) -> Result<bool> {
        let Some(user) = self.current_user_mut() else {
            return Ok(false);
        };
        user.results.insert(0, ResultRecord::from(report));
        self.save()?;
        Ok(true)
    }

    /// The current user's history, newest first.
    pub fn results(&self) -> &[ResultRecord] {
        self.current_user()
            .map(|u| u.results.as_slice())
            .unwrap_or_default()
    }

    /// Stored preference, or the system preference when none is stored.
    pub fn theme(&self) -> Theme {
        self.data.theme.unwrap_or_else(Theme::system_preference)
    }

    /// The explicitly stored preference, if any.
    pub fn stored_theme(&self) -> Option<Theme> {
        self.data.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.data.theme = Some(theme);
        self.save()
    }

    /// Switch to the other theme and store it.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadquiz_core::model::{Question, QuestionBank};
    use roadquiz_core::scoring::QuizOutcome;

    fn form(username: &str) -> RegisterForm {
        RegisterForm {
            username: username.into(),
            email: Some("driver@example.com".into()),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            accept_terms: true,
        }
    }

    fn report(answers: &[Option<usize>]) -> QuizReport {
        let bank = QuestionBank {
            id: "speed".into(),
            name: "Speed Limits".into(),
            description: String::new(),
            time_limit_secs: None,
            questions: (1..=2)
                .map(|id| Question {
                    id,
                    prompt: format!("Question {id}"),
                    image: None,
                    options: vec!["A".into(), "B".into()],
                    correct: 0,
                })
                .collect(),
        };
        let outcome = QuizOutcome::compute(&bank.questions, answers, 42, false);
        QuizReport::new(&bank, None, outcome)
    }

    fn profile_error(err: &anyhow::Error) -> Option<&ProfileError> {
        err.downcast_ref::<ProfileError>()
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::open_in(dir.path()).unwrap();
        assert!(store.users().is_empty());
        assert!(store.current_user().is_none());
        assert!(store.results().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn register_logs_in_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open_in(dir.path()).unwrap();

        let user = store.register(&form(" Driver ")).unwrap();
        assert_eq!(user.username, "Driver");
        assert_eq!(user.email.as_deref(), Some("driver@example.com"));
        assert_ne!(user.password_hash, "secret1");
        assert_eq!(user.initial(), 'D');
        assert!(store.is_authenticated());

        let reopened = ProfileStore::open_in(dir.path()).unwrap();
        assert_eq!(reopened.users().len(), 1);
        assert_eq!(reopened.current_user().unwrap().username, "Driver");
    }

    #[test]
    fn username_is_unique_ignoring_case() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open_in(dir.path()).unwrap();
        store.register(&form("driver")).unwrap();

        let err = store.register(&form("DRIVER")).unwrap_err();
        assert_eq!(
            profile_error(&err),
            Some(&ProfileError::UsernameTaken("DRIVER".into()))
        );
        assert_eq!(store.users().len(), 1);
    }

    #[test]
    fn invalid_form_is_rejected_before_hashing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open_in(dir.path()).unwrap();
        let mut f = form("driver");
        f.accept_terms = false;

        let err = store.register(&f).unwrap_err();
        assert_eq!(profile_error(&err), Some(&ProfileError::TermsNotAccepted));
        assert!(store.users().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn login_logout_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open_in(dir.path()).unwrap();
        store.register(&form("driver")).unwrap();
        assert!(store.logout().unwrap());
        assert!(!store.logout().unwrap());
        assert!(store.current_user().is_none());

        let err = store.login("driver", "wrong-password").unwrap_err();
        assert_eq!(profile_error(&err), Some(&ProfileError::InvalidCredentials));

        let err = store.login("nobody", "secret1").unwrap_err();
        assert_eq!(profile_error(&err), Some(&ProfileError::InvalidCredentials));

        let err = store.login("  ", "secret1").unwrap_err();
        assert_eq!(profile_error(&err), Some(&ProfileError::MissingFields));

        let user = store.login("DRIVER", "secret1").unwrap();
        assert_eq!(user.username, "driver");
        assert!(store.is_authenticated());
    }

    #[test]
    fn results_saved_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open_in(dir.path()).unwrap();

        assert!(!store.save_result(&report(&[Some(0), Some(0)])).unwrap());

        store.register(&form("driver")).unwrap();
        let first = report(&[Some(0), Some(1)]);
        let second = report(&[Some(0), Some(0)]);
        assert!(store.save_result(&first).unwrap());
        assert!(store.save_result(&second).unwrap());

        let results = store.results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, second.id);
        assert_eq!(results[0].percentage, 100);
        assert_eq!(results[1].score, 1);
        assert_eq!(results[1].wrong_answers, vec![2]);
        assert_eq!(results[1].test_name, "Speed Limits");

        store.logout().unwrap();
        assert!(store.results().is_empty());

        let reopened = ProfileStore::open_in(dir.path()).unwrap();
        assert_eq!(reopened.users()[0].results.len(), 2);
    }

    #[test]
    fn theme_preference_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open_in(dir.path()).unwrap();
        assert_eq!(store.stored_theme(), None);

        store.set_theme(Theme::Dark).unwrap();
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.toggle_theme().unwrap(), Theme::Light);

        let reopened = ProfileStore::open_in(dir.path()).unwrap();
        assert_eq!(reopened.stored_theme(), Some(Theme::Light));
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROFILE_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = ProfileStore::open(&path).unwrap();
        assert!(store.users().is_empty());

        store.set_theme(Theme::Dark).unwrap();
        let reopened = ProfileStore::open(&path).unwrap();
        assert_eq!(reopened.stored_theme(), Some(Theme::Dark));
    }

    #[test]
    fn dangling_session_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROFILE_FILE_NAME);
        std::fs::write(
            &path,
            format!(r#"{{"users": [], "current_user": "{}"}}"#, Uuid::new_v4()),
        )
        .unwrap();

        let store = ProfileStore::open(&path).unwrap();
        assert!(store.current_user().is_none());
    }
}
