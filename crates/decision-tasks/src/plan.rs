//! The task graph scheduled for every push
//!
//! Three tasks in a chain: build the docker image, compile with it, then run
//! the result on a stock image.

use tracing::{info, instrument};

use decision_core::Result;
use decision_queue::{TaskId, TaskImage};

use crate::builder::TaskGraphBuilder;
use crate::reporter::TaskEvent;
use crate::task::TaskRequest;

/// Image with docker and lz4 used to build our own image
pub const IMAGE_BUILDER_IMAGE: &str = "servobrowser/image-builder@sha256:f2370c4b28aa537e47c0cacb82cc53272233fa256b6634c0eebc46e2dd019333";

/// Stock image the compiled executable runs on
pub const RUN_IMAGE: &str = "ubuntu:bionic-20180821@sha256:b5309340de7a9a540cf6c0cba3eabdfb9c9bc5153026d37991fd0028180fc725";

/// Build context under `docker/` and tag of the image
pub const BUILD_IMAGE_NAME: &str = "servo-x86_64-linux";

pub const IMAGE_ARTIFACT: &str = "image.tar.lz4";
pub const EXECUTABLE_ARTIFACT: &str = "executable.gz";

/// Variable through which the run task finds the build task
pub const BUILD_TASK_ID_VAR: &str = "BUILD_TASK_ID";

const CARGO_CACHES: [(&str, &str); 2] = [
    ("cargo-registry-cache", "/root/.cargo/registry"),
    ("cargo-git-cache", "/root/.cargo/git"),
];

/// Ids of the scheduled graph, in creation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledGraph {
    pub image_build: TaskId,
    pub build: TaskId,
    pub run: TaskId,
}

impl ScheduledGraph {
    pub fn ids(&self) -> [&TaskId; 3] {
        [&self.image_build, &self.build, &self.run]
    }
}

/// Builds the docker image and publishes it compressed
pub fn image_build_task() -> TaskRequest {
    TaskRequest::new(
        "docker image build task",
        "
docker build -t \"$IMAGE\" \"docker/$IMAGE\"
docker save \"$IMAGE\" | lz4 > /image.tar.lz4
",
        IMAGE_BUILDER_IMAGE,
    )
    .with_env("IMAGE", BUILD_IMAGE_NAME)
    .with_artifact(IMAGE_ARTIFACT, format!("/{}", IMAGE_ARTIFACT))
    // docker-in-docker
    .with_feature("dind", true)
}

/// Compiles inside the image published by `image_build`
pub fn build_task(image_build: &TaskId) -> TaskRequest {
    let mut request = TaskRequest::new(
        "build task",
        "./build-task.sh",
        TaskImage::from_task(image_build.clone(), format!("public/{}", IMAGE_ARTIFACT)),
    )
    .with_dependency(image_build.clone())
    .with_artifact(EXECUTABLE_ARTIFACT, "/repo/something-rust/something-rust.gz");

    for (name, mount) in CARGO_CACHES {
        request = request
            .with_scope(format!("docker-worker:cache:{}", name))
            .with_cache(name, mount);
    }
    request
}

/// Runs the executable published by `build`
pub fn run_task(build: &TaskId) -> TaskRequest {
    TaskRequest::new("run task", "./run-task.sh", RUN_IMAGE)
        .with_dependency(build.clone())
        .with_env(BUILD_TASK_ID_VAR, build.to_string())
}

/// Submit the whole graph, stopping at the first failure
#[instrument(skip_all)]
pub async fn schedule_graph(builder: &mut TaskGraphBuilder) -> Result<ScheduledGraph> {
    info!(
        decision_task_id = %builder.ambient().decision_task_id,
        commit = %builder.ambient().commit_sha,
        "scheduling task graph"
    );

    let image_build = builder.submit(image_build_task()).await?;
    let build = builder.submit(build_task(&image_build)).await?;
    let run = builder.submit(run_task(&build)).await?;

    let graph = ScheduledGraph {
        image_build,
        build,
        run,
    };
    builder
        .reporters()
        .broadcast(&TaskEvent::GraphScheduled { task_count: 3 });
    Ok(graph)
}
