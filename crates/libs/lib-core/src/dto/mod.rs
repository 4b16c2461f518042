//! # Data Transfer Objects (DTOs)
//!
//! JSON shapes exchanged with web clients over the REST API. Identifiers are
//! exposed as `_id` to stay compatible with existing forum clients.

pub mod alert;
pub mod detection;
pub mod question;

pub use alert::*;
pub use detection::*;
pub use question::*;
