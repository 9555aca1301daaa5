//! HTTP handlers for the summary service.

pub mod health;
pub mod summary;

pub use health::{health_check, readiness_check};
pub use summary::{generate_summary, NO_PROMPT_MESSAGE};
