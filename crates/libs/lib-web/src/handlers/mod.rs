//! # HTTP Request Handlers
//!
//! Axum handlers for the REST side of the forum. The chat room itself lives
//! behind `GET /ws` in [`crate::chat::handlers`].
//!
//! - **[`questions`]**: `GET /previous-questions`
//! - **[`alerts`]**: `POST /submit-report`, `GET /alerts`
//! - **[`detect`]**: `POST /detect`
//!
//! Handlers pull what they need out of [`crate::server::AppState`] through
//! `FromRef`, delegate to [`crate::services`], and return
//! `Result<_, AppError>`; `AppError` renders itself as
//! `{"error": "...", "code": "..."}` with the matching status.

pub mod alerts;
pub mod detect;
pub mod questions;

#[cfg(test)]
mod tests;
