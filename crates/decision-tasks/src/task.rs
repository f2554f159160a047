//! Task requests: what a caller asks the graph builder to schedule

use std::collections::BTreeMap;

use decision_queue::{TaskId, TaskImage};

/// Interpreter every task command runs under
pub const SHELL: [&str; 3] = ["/bin/bash", "--login", "-c"];

/// Checks out the commit under test before the task's own script runs
pub const CHECKOUT_PREAMBLE: &str = "
set -e
set -x
git clone $GITHUB_EVENT_CLONE_URL repo
cd repo
git checkout $GITHUB_EVENT_COMMIT_SHA
";

/// Definition of one task to schedule
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRequest {
    /// Human-readable task name
    pub name: String,

    /// Shell script run in the repository checkout
    pub command: String,

    /// Image the task runs in
    pub image: TaskImage,

    /// `(public name, in-container path)` pairs to publish
    pub artifacts: Vec<(String, String)>,

    /// Earlier tasks of this run that must complete first
    pub dependencies: Vec<TaskId>,

    /// Environment variables for the task
    pub env: BTreeMap<String, String>,

    /// Named caches and their mount points
    pub cache: BTreeMap<String, String>,

    /// Scopes required by the caches and features
    pub scopes: Vec<String>,

    /// Worker features to enable or disable
    pub features: BTreeMap<String, bool>,
}

impl TaskRequest {
    /// Create a new task request
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        image: impl Into<TaskImage>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            image: image.into(),
            artifacts: Vec::new(),
            dependencies: Vec::new(),
            env: BTreeMap::new(),
            cache: BTreeMap::new(),
            scopes: Vec::new(),
            features: BTreeMap::new(),
        }
    }

    /// Publish a file artifact
    pub fn with_artifact(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.artifacts.push((name.into(), path.into()));
        self
    }

    /// Add a dependency on an earlier task
    pub fn with_dependency(mut self, task_id: TaskId) -> Self {
        self.dependencies.push(task_id);
        self
    }

    /// Set an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Mount a named cache
    pub fn with_cache(mut self, name: impl Into<String>, mount: impl Into<String>) -> Self {
        self.cache.insert(name.into(), mount.into());
        self
    }

    /// Require a scope
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Toggle a worker feature
    pub fn with_feature(mut self, feature: impl Into<String>, enabled: bool) -> Self {
        self.features.insert(feature.into(), enabled);
        self
    }

    /// Full worker command: the shell plus preamble and script
    pub fn full_command(&self) -> Vec<String> {
        let mut command: Vec<String> = SHELL.iter().map(|s| s.to_string()).collect();
        command.push(format!("{}{}", CHECKOUT_PREAMBLE, self.command));
        command
    }
}
