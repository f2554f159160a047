//! Task graph builder
//!
//! Turns [`TaskRequest`]s into full queue descriptors and submits them one at
//! a time. The builder remembers every id it hands out so that a request can
//! only depend on tasks created earlier in the same run.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use decision_core::{AmbientConfig, ConfigError, GraphError, QueueSettings, Result};
use decision_queue::{
    ArtifactSpec, QueueClient, TaskDescriptor, TaskId, TaskMetadata, TaskPayload,
};

use crate::id::{IdGenerator, SlugIdGenerator};
use crate::reporter::{TaskEvent, TaskReporterRegistry};
use crate::task::TaskRequest;

/// Prefix under which artifacts are published
pub const PUBLIC_ARTIFACT_PREFIX: &str = "public/";

/// Builds and submits the tasks of one decision run
pub struct TaskGraphBuilder {
    ambient: AmbientConfig,
    settings: QueueSettings,
    queue: Arc<dyn QueueClient>,
    ids: Box<dyn IdGenerator>,
    reporters: TaskReporterRegistry,
    issued: HashSet<TaskId>,
    submitted: Vec<TaskId>,
}

impl TaskGraphBuilder {
    /// Create a builder that generates slug ids and logs progress
    pub fn new(ambient: AmbientConfig, settings: QueueSettings, queue: Arc<dyn QueueClient>) -> Self {
        Self {
            ambient,
            settings,
            queue,
            ids: Box::new(SlugIdGenerator),
            reporters: TaskReporterRegistry::new(),
            issued: HashSet::new(),
            submitted: Vec::new(),
        }
    }

    /// Use a different id generator
    pub fn with_id_generator<G: IdGenerator + 'static>(mut self, ids: G) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Use a different set of reporters
    pub fn with_reporters(mut self, reporters: TaskReporterRegistry) -> Self {
        self.reporters = reporters;
        self
    }

    pub fn ambient(&self) -> &AmbientConfig {
        &self.ambient
    }

    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    /// Ids accepted by the queue so far, in submission order
    pub fn submitted(&self) -> &[TaskId] {
        &self.submitted
    }

    pub(crate) fn reporters(&self) -> &TaskReporterRegistry {
        &self.reporters
    }

    /// Assemble the descriptor for a request as if created at `created`.
    ///
    /// Pure: no id is generated and nothing is submitted.
    pub fn describe(&self, request: &TaskRequest, created: DateTime<Utc>) -> Result<TaskDescriptor> {
        let deadline = offset(created, "deadline_secs", self.settings.deadline())?;
        let expires = offset(created, "artifact_expiry_days", self.settings.artifact_expiry()?)?;

        let root = self.ambient.decision_task_id.clone();
        let mut dependencies = Vec::with_capacity(request.dependencies.len() + 1);
        dependencies.push(root.clone());
        dependencies.extend(request.dependencies.iter().cloned());

        let mut env = request.env.clone();
        for (key, value) in self.ambient.forwarded_env() {
            env.entry(key.to_string()).or_insert_with(|| value.to_string());
        }

        let artifacts: BTreeMap<String, ArtifactSpec> = request
            .artifacts
            .iter()
            .map(|(name, path)| {
                (
                    format!("{}{}", PUBLIC_ARTIFACT_PREFIX, name),
                    ArtifactSpec::file(path.clone(), expires),
                )
            })
            .collect();

        Ok(TaskDescriptor {
            task_group_id: root,
            dependencies,
            scheduler_id: self.settings.scheduler_id.clone(),
            provisioner_id: self.settings.provisioner_id.clone(),
            worker_type: self.settings.worker_type.clone(),
            created,
            deadline,
            metadata: TaskMetadata {
                name: format!("{}{}", self.settings.name_prefix, request.name),
                description: String::new(),
                owner: self.ambient.owner.clone(),
                source: self.ambient.source.clone(),
            },
            scopes: request.scopes.clone(),
            payload: TaskPayload {
                cache: request.cache.clone(),
                max_run_time: self.settings.max_run_time_secs,
                image: request.image.clone(),
                command: request.full_command(),
                env,
                artifacts,
                features: request.features.clone(),
            },
        })
    }

    /// Submit a task and return its id.
    ///
    /// Dependencies are checked before an id is drawn or anything is sent.
    /// Queue failures are returned as-is; tasks already submitted stay queued.
    #[instrument(skip_all, fields(task = %request.name))]
    pub async fn submit(&mut self, request: TaskRequest) -> Result<TaskId> {
        self.check_dependencies(&request)?;

        let task_id = self.ids.next_id();
        if !self.issued.insert(task_id.clone()) {
            return Err(GraphError::DuplicateTaskId(task_id.to_string()).into());
        }

        let descriptor = self.describe(&request, Utc::now())?;
        debug!(
            task_id = %task_id,
            dependencies = descriptor.dependencies.len(),
            queue = self.queue.name(),
            "submitting task"
        );

        self.queue.create_task(&task_id, &descriptor).await?;
        self.submitted.push(task_id.clone());

        self.reporters.broadcast(&TaskEvent::Scheduled {
            name: request.name,
            id: task_id.clone(),
        });
        Ok(task_id)
    }

    fn check_dependencies(&self, request: &TaskRequest) -> Result<()> {
        let root = &self.ambient.decision_task_id;
        for dependency in &request.dependencies {
            if dependency != root && !self.issued.contains(dependency) {
                return Err(GraphError::UnknownDependency {
                    task: request.name.clone(),
                    dependency: dependency.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// `created + duration`, as a configuration error when out of range
fn offset(created: DateTime<Utc>, field: &str, duration: Duration) -> Result<DateTime<Utc>> {
    let invalid = |message: String| ConfigError::InvalidValue {
        field: field.to_string(),
        message,
    };

    let delta = chrono::Duration::from_std(duration).map_err(|e| invalid(e.to_string()))?;
    let timestamp = created
        .checked_add_signed(delta)
        .ok_or_else(|| invalid(format!("{} from {} is out of range", delta, created)))?;
    Ok(timestamp)
}
