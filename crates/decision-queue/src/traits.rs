//! Queue client trait

use crate::error::Result;
use crate::types::{TaskDescriptor, TaskId};

/// Capability to enqueue a task in the remote queue
///
/// Implementations submit one descriptor under a caller-chosen id. They do
/// not retry: a failed call is reported to the caller as-is.
#[async_trait::async_trait]
pub trait QueueClient: Send + Sync {
    /// Get the client name
    fn name(&self) -> &str;

    /// Create a task with the given id
    async fn create_task(&self, task_id: &TaskId, descriptor: &TaskDescriptor) -> Result<()>;
}
