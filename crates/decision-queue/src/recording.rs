//! In-memory queue that records submissions

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::{QueueError, Result};
use crate::traits::QueueClient;
use crate::types::{TaskDescriptor, TaskId};

/// A submission captured by [`RecordingQueue`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTask {
    pub task_id: TaskId,
    pub descriptor: TaskDescriptor,
}

/// Queue that keeps every descriptor it is given instead of sending it
///
/// Used by the test suites and by dry runs. It can be told to reject the
/// n-th submission to exercise fail-fast behaviour.
#[derive(Debug, Default)]
pub struct RecordingQueue {
    tasks: Mutex<Vec<RecordedTask>>,
    fail_at: Option<usize>,
}

impl RecordingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the submission with this zero-based index
    pub fn failing_at(index: usize) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            fail_at: Some(index),
        }
    }

    /// All recorded submissions, in submission order
    pub fn tasks(&self) -> Vec<RecordedTask> {
        self.lock().clone()
    }

    /// Number of accepted submissions
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Look up a recorded descriptor by id
    pub fn get(&self, task_id: &TaskId) -> Option<TaskDescriptor> {
        self.lock()
            .iter()
            .find(|t| &t.task_id == task_id)
            .map(|t| t.descriptor.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedTask>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl QueueClient for RecordingQueue {
    fn name(&self) -> &str {
        "recording"
    }

    async fn create_task(&self, task_id: &TaskId, descriptor: &TaskDescriptor) -> Result<()> {
        let mut tasks = self.lock();
        if self.fail_at == Some(tasks.len()) {
            return Err(QueueError::Rejected {
                task_id: task_id.to_string(),
                reason: "configured to fail".to_string(),
            });
        }

        debug!(task_id = %task_id, index = tasks.len(), "recorded task");
        tasks.push(RecordedTask {
            task_id: task_id.clone(),
            descriptor: descriptor.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskImage, TaskMetadata, TaskPayload};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn descriptor(name: &str) -> TaskDescriptor {
        TaskDescriptor {
            task_group_id: TaskId::new("root"),
            dependencies: vec![TaskId::new("root")],
            scheduler_id: "s".to_string(),
            provisioner_id: "p".to_string(),
            worker_type: "w".to_string(),
            created: Utc::now(),
            deadline: Utc::now(),
            metadata: TaskMetadata {
                name: name.to_string(),
                description: String::new(),
                owner: "o".to_string(),
                source: "s".to_string(),
            },
            scopes: Vec::new(),
            payload: TaskPayload {
                cache: BTreeMap::new(),
                max_run_time: 1,
                image: TaskImage::from("img"),
                command: Vec::new(),
                env: BTreeMap::new(),
                artifacts: BTreeMap::new(),
                features: BTreeMap::new(),
            },
        }
    }

    #[tokio::test]
    async fn test_records_in_order() {
        let queue = RecordingQueue::new();
        assert!(queue.is_empty());

        queue.create_task(&TaskId::new("a"), &descriptor("first")).await.unwrap();
        queue.create_task(&TaskId::new("b"), &descriptor("second")).await.unwrap();

        let tasks = queue.tasks();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task_id, TaskId::new("a"));
        assert_eq!(tasks[1].descriptor.metadata.name, "second");
        assert_eq!(queue.get(&TaskId::new("b")).unwrap().metadata.name, "second");
        assert!(queue.get(&TaskId::new("c")).is_none());
    }

    #[tokio::test]
    async fn test_failing_at_index() {
        let queue = RecordingQueue::failing_at(1);

        queue.create_task(&TaskId::new("a"), &descriptor("first")).await.unwrap();
        let err = queue
            .create_task(&TaskId::new("b"), &descriptor("second"))
            .await
            .unwrap_err();

        assert!(matches!(err, QueueError::Rejected { ref task_id, .. } if task_id == "b"));
        assert_eq!(queue.len(), 1);
    }
}
