//! Decision Core - configuration and errors for the decision task
//!
//! This crate provides the ambient CI configuration, queue settings and the
//! error taxonomy shared by the task graph builder and the binary.

pub mod config;
pub mod error;

pub use config::{AmbientConfig, QueueSettings};
pub use error::{ConfigError, DecisionError, GraphError, Result};
