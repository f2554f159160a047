//! HTTP queue client
//!
//! Submits tasks with `PUT <base>/task/<taskId>`. Inside a docker worker the
//! base URL points at the taskcluster proxy, which signs requests with the
//! decision task's own credentials, so no authentication happens here.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{QueueError, Result};
use crate::traits::QueueClient;
use crate::types::{TaskDescriptor, TaskId};

/// Queue endpoint as seen through the worker's taskcluster proxy
pub const DEFAULT_QUEUE_URL: &str = "http://taskcluster/queue/v1/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const BODY_PREVIEW_LIMIT: usize = 512;

/// HTTP queue configuration
#[derive(Debug, Clone)]
pub struct HttpQueueConfig {
    /// Base URL of the queue API
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HttpQueueConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUEUE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Queue client backed by the queue's REST API
pub struct HttpQueue {
    base_url: Url,
    client: Client,
}

impl HttpQueue {
    /// Create a new HTTP queue client
    pub fn new(config: HttpQueueConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(QueueError::InvalidUrl(config.base_url));
        }
        // Url::join drops the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("decision/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base_url, client })
    }

    /// URL a task is created at
    pub fn task_url(&self, task_id: &TaskId) -> Result<Url> {
        Ok(self.base_url.join(&format!("task/{}", task_id))?)
    }
}

#[derive(Debug, Deserialize)]
struct CreateTaskResponse {
    status: TaskStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskStatus {
    #[serde(default)]
    state: Option<String>,
}

#[async_trait::async_trait]
impl QueueClient for HttpQueue {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip_all, fields(task_id = %task_id, name = %descriptor.metadata.name))]
    async fn create_task(&self, task_id: &TaskId, descriptor: &TaskDescriptor) -> Result<()> {
        let url = self.task_url(task_id)?;
        debug!(url = %url, "creating task");

        let response = self.client.put(url.clone()).json(descriptor).send().await?;
        let status = response.status();
        let body = response.text().await;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), body));
        }

        let created = body
            .ok()
            .and_then(|body| serde_json::from_str::<CreateTaskResponse>(&body).ok());
        match created {
            Some(created) => info!(
                url = %url,
                state = created.status.state.as_deref().unwrap_or("unknown"),
                "task created"
            ),
            None => info!(url = %url, "task created"),
        }

        Ok(())
    }
}

fn api_error<E: std::fmt::Display>(status: u16, body: std::result::Result<String, E>) -> QueueError {
    let message = match body {
        Ok(body) => preview_body(&body),
        Err(e) => format!("<failed to read body: {}>", e),
    };
    QueueError::ApiError { status, message }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if trimmed.len() <= BODY_PREVIEW_LIMIT {
        return trimmed.to_string();
    }
    let mut end = BODY_PREVIEW_LIMIT;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskImage, TaskMetadata, TaskPayload};
    use chrono::Utc;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn descriptor() -> TaskDescriptor {
        TaskDescriptor {
            task_group_id: TaskId::new("root"),
            dependencies: vec![TaskId::new("root")],
            scheduler_id: "taskcluster-github".to_string(),
            provisioner_id: "aws-provisioner-v1".to_string(),
            worker_type: "servo-docker-worker".to_string(),
            created: Utc::now(),
            deadline: Utc::now(),
            metadata: TaskMetadata {
                name: "run task".to_string(),
                description: String::new(),
                owner: "owner@example.com".to_string(),
                source: "https://github.com/servo/servo".to_string(),
            },
            scopes: Vec::new(),
            payload: TaskPayload {
                cache: BTreeMap::new(),
                max_run_time: 3600,
                image: TaskImage::from("ubuntu:bionic"),
                command: vec!["/bin/bash".to_string()],
                env: BTreeMap::new(),
                artifacts: BTreeMap::new(),
                features: BTreeMap::new(),
            },
        }
    }

    fn queue_for(base_url: String) -> HttpQueue {
        HttpQueue::new(HttpQueueConfig {
            base_url,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = HttpQueueConfig::default();
        assert_eq!(config.base_url, DEFAULT_QUEUE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_task_url_with_trailing_slash() {
        let queue = queue_for(DEFAULT_QUEUE_URL.to_string());
        let url = queue.task_url(&TaskId::new("abc")).unwrap();
        assert_eq!(url.as_str(), "http://taskcluster/queue/v1/task/abc");
    }

    #[test]
    fn test_task_url_without_trailing_slash() {
        let queue = queue_for("http://taskcluster/queue/v1".to_string());
        let url = queue.task_url(&TaskId::new("abc")).unwrap();
        assert_eq!(url.as_str(), "http://taskcluster/queue/v1/task/abc");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpQueue::new(HttpQueueConfig {
            base_url: "not a url".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(QueueError::InvalidUrl(_))));
    }

    #[test]
    fn test_preview_body_empty() {
        assert_eq!(preview_body("  "), "<empty body>");
    }

    #[test]
    fn test_preview_body_truncates() {
        let body = "a".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.len(), BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn test_api_error_keeps_body_read_failure() {
        let err = api_error(502, Err::<String, _>("connection reset"));
        match err {
            QueueError::ApiError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<failed to read body: connection reset>");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_api_error_previews_body() {
        let err = api_error(500, Ok::<_, String>("  internal error \n".to_string()));
        assert_eq!(err.to_string(), "API error: 500 - internal error");
    }

    #[tokio::test]
    async fn test_create_task_puts_descriptor() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/task/abc")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "taskGroupId": "root",
                "workerType": "servo-docker-worker",
                "payload": {"image": "ubuntu:bionic"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":{"taskId":"abc","state":"unscheduled"}}"#)
            .create_async()
            .await;

        let queue = queue_for(server.url());
        queue
            .create_task(&TaskId::new("abc"), &descriptor())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_task_accepts_unexpected_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PUT", "/task/abc")
            .with_status(200)
            .create_async()
            .await;

        let queue = queue_for(server.url());
        assert!(queue
            .create_task(&TaskId::new("abc"), &descriptor())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_create_task_status_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("PUT", "/task/abc")
            .with_status(403)
            .with_body(r#"{"code":"InsufficientScopes","message":"missing scope"}"#)
            .create_async()
            .await;

        let queue = queue_for(server.url());
        let err = queue
            .create_task(&TaskId::new("abc"), &descriptor())
            .await
            .unwrap_err();

        match err {
            QueueError::ApiError { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("InsufficientScopes"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_task_connection_refused() {
        // Bind then drop to get a local port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let queue = queue_for(format!("http://127.0.0.1:{}/queue/v1/", port));
        let err = queue
            .create_task(&TaskId::new("abc"), &descriptor())
            .await
            .unwrap_err();

        assert!(matches!(err, QueueError::Http(_)), "got {err:?}");
    }
}
