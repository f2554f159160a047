//! Task descriptors and queue submission for the decision task
//!
//! This crate owns the wire contract of the task queue: the JSON task
//! descriptor a decision task submits, and the clients that submit it.
//!
//! ## Clients
//!
//! - **HttpQueue**: talks to the queue service over HTTP (normally through the
//!   worker's credential-injecting proxy)
//! - **RecordingQueue**: keeps submissions in memory, for tests and dry runs
//!
//! ## Usage
//!
//! ```ignore
//! use decision_queue::{HttpQueue, HttpQueueConfig, QueueClient};
//!
//! let queue = HttpQueue::new(HttpQueueConfig::default())?;
//! queue.create_task(&task_id, &descriptor).await?;
//! ```

pub mod error;
pub mod http;
pub mod recording;
pub mod traits;
pub mod types;

pub use error::QueueError;
pub use http::{HttpQueue, HttpQueueConfig, DEFAULT_QUEUE_URL};
pub use recording::{RecordedTask, RecordingQueue};
pub use traits::QueueClient;
pub use types::*;
