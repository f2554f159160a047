//! CLI definition and execution
//!
//! The decision task is started by the queue itself with no arguments. The
//! flags exist for local debugging.

pub mod output;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use decision_core::config::load_settings_or_default;
use decision_core::{AmbientConfig, DecisionError, QueueSettings};
use decision_queue::{HttpQueue, RecordingQueue};
use decision_tasks::{schedule_graph, TaskGraphBuilder, TaskReporterRegistry};

use output::ConsoleReporter;

/// Schedule the CI task graph for the current commit
#[derive(Debug, Parser)]
#[command(name = "decision")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Build the task graph and print it as JSON instead of submitting it
    #[arg(long, env = "DECISION_DRY_RUN")]
    pub dry_run: bool,
}

impl Cli {
    /// Execute the decision task
    pub fn execute(self) -> anyhow::Result<()> {
        let ambient = AmbientConfig::from_env()?;

        let cwd = std::env::current_dir()?;
        let (settings, settings_path) = load_settings_or_default(&cwd)?;
        if let Some(path) = &settings_path {
            if !self.dry_run {
                output::info(&format!("Using queue settings from {}", path.display()));
            }
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        if self.dry_run {
            runtime.block_on(dry_run(ambient, settings))
        } else {
            runtime.block_on(submit(ambient, settings))
        }
    }
}

async fn submit(ambient: AmbientConfig, settings: QueueSettings) -> anyhow::Result<()> {
    let queue = HttpQueue::new(settings.http_config()).map_err(DecisionError::from)?;
    info!(queue_url = %settings.queue_url, "submitting task graph");

    let mut reporters = TaskReporterRegistry::new();
    reporters.register(ConsoleReporter);

    let mut builder =
        TaskGraphBuilder::new(ambient, settings, Arc::new(queue)).with_reporters(reporters);
    schedule_graph(&mut builder).await?;
    Ok(())
}

async fn dry_run(ambient: AmbientConfig, settings: QueueSettings) -> anyhow::Result<()> {
    let queue = Arc::new(RecordingQueue::new());
    let mut builder = TaskGraphBuilder::new(ambient, settings, queue.clone());
    schedule_graph(&mut builder).await?;

    println!("{}", render_dry_run(&queue)?);
    Ok(())
}

/// JSON array of `{"taskId": ..., "task": ...}` objects in submission order
fn render_dry_run(queue: &RecordingQueue) -> Result<String, DecisionError> {
    let tasks: Vec<serde_json::Value> = queue
        .tasks()
        .into_iter()
        .map(|task| -> Result<serde_json::Value, serde_json::Error> {
            Ok(serde_json::json!({
                "taskId": task.task_id,
                "task": serde_json::to_value(&task.descriptor)?,
            }))
        })
        .collect::<Result<_, _>>()?;

    Ok(serde_json::to_string_pretty(&tasks)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use decision_queue::TaskId;
    use decision_tasks::SequentialIdGenerator;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["decision"]).unwrap();
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_dry_run_flag() {
        let cli = Cli::try_parse_from(["decision", "--dry-run"]).unwrap();
        assert!(cli.dry_run);
    }

    #[test]
    fn test_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["decision", "extra"]).is_err());
    }

    #[tokio::test]
    async fn test_render_dry_run() {
        let ambient = AmbientConfig {
            decision_task_id: TaskId::new("root"),
            clone_url: "https://github.com/servo/servo.git".to_string(),
            commit_sha: "0123abcd".to_string(),
            owner: "dev@example.com".to_string(),
            source: "https://github.com/servo/servo/pull/1".to_string(),
        };
        let queue = Arc::new(RecordingQueue::new());
        let mut builder = TaskGraphBuilder::new(ambient, QueueSettings::default(), queue.clone())
            .with_id_generator(SequentialIdGenerator::new("task"))
            .with_reporters(TaskReporterRegistry::empty());
        schedule_graph(&mut builder).await.unwrap();

        let rendered = render_dry_run(&queue).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let tasks = parsed.as_array().unwrap();

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0]["taskId"], "task-0");
        assert_eq!(tasks[1]["task"]["payload"]["image"]["taskId"], "task-0");
        assert_eq!(tasks[2]["task"]["payload"]["env"]["BUILD_TASK_ID"], "task-1");
    }
}
