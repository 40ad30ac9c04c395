//! roadquiz-core: Quiz engine, question banks, and scoring.
//!
//! This crate defines the question model, the speed-test state machine,
//! and the scoring rules that the rest of roadquiz builds on. It has no
//! knowledge of how results, users, or themes are stored or displayed.

pub mod clock;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
