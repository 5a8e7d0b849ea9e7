//! timestable-report: progress reports.
//!
//! Renders a stored `UserProgress` as a self-contained HTML page or as a
//! markdown summary.

pub mod html;
pub mod markdown;

pub use html::{generate_html, write_html_report};
pub use markdown::generate_markdown;
