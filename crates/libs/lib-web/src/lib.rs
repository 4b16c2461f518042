//! # Web Library
//!
//! The health forum's network surface: the `/ws` chat room with its
//! assistant commands, the REST handlers, their services and middleware, and
//! server bootstrap.

pub mod chat;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{create_router, start_server, AppState, ServerConfig};
