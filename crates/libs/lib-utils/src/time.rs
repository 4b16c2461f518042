//! # Time Utilities
//!
//! Utilities for time formatting using chrono.

use chrono::{DateTime, Local, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format the current local time the way symptom reports are stamped
/// (`2024-03-01 14:05:09`).
pub fn format_report_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
