//! # Services Layer
//!
//! Business logic behind the REST handlers.
//!
//! ```text
//! Handlers (HTTP) → Services → Repository / Database / Inference API
//! ```
//!
//! - [`question`] - Assistant question history
//! - [`alert`] - Symptom reports and map alerts
//! - [`detection`] - Eye disease detection
//!
//! All services return `Result<T, AppError>`; lower-level errors (database,
//! HTTP, decoding) are converted into the matching `AppError` variant here so
//! handlers stay thin.

pub mod alert;
pub mod detection;
pub mod question;

pub use alert::AlertService;
pub use detection::DetectionService;
pub use question::QuestionService;
