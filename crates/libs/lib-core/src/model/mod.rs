//! # Model Layer
//!
//! Persistence for questions and alerts.

pub mod store;
