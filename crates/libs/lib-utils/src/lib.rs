//! # Utilities Library
//!
//! Shared utility functions for base64 data URLs, environment variables, time, and validation.

pub mod b64;
pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64_decode, split_data_url};
pub use envs::{get_env_opt, get_env_or, get_env_parse_or};
pub use time::{now_utc, format_report_stamp};
pub use validation::{validate_not_empty, truncate_chars};
