//! roadquiz-report: Rendering for quiz screens and result reports.
//!
//! [`text`] renders the question, result, and review screens for a
//! terminal; [`html`] writes a self-contained result page.

pub mod html;
pub mod text;
