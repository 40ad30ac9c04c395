//! roadquiz-profile: Local user profiles and preferences.
//!
//! A single JSON file holds the registered users, the logged-in user,
//! the theme preference, and each user's result history. Storage is
//! best effort: a damaged file is discarded with a warning.

pub mod error;
pub mod password;
pub mod store;
pub mod theme;
pub mod user;

pub use error::ProfileError;
pub use store::ProfileStore;
pub use theme::Theme;
pub use user::{RegisterForm, ResultRecord, User};
