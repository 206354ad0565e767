//! Memaster - offline caching agent
//!
//! Keeps a versioned cache generation of the Memaster app shell, answers
//! requests cache-first and degrades to a cached document or a fixed 503
//! when the network is gone.

pub mod agent;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod host;
pub mod http;
pub mod journal;
pub mod notification;
pub mod ui;

pub use error::{AgentError, AgentResult};
