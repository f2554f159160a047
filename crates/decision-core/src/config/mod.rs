//! Configuration for the decision task
//!
//! Two sources: the ambient CI environment (required) and an optional queue
//! settings file.

pub mod ambient;
pub mod defaults;
mod loader;
mod types;
pub mod validation;

pub use ambient::*;
pub use defaults::*;
pub use loader::*;
pub use types::*;
pub use validation::*;
