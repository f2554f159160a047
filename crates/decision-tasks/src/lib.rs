//! Decision Tasks - task graph construction and submission
//!
//! This crate turns task requests into queue descriptors, wires their
//! dependencies, submits them in order and reports progress.

pub mod builder;
pub mod id;
pub mod plan;
pub mod reporter;
pub mod task;

pub use builder::TaskGraphBuilder;
pub use id::{slug_id, IdGenerator, SequentialIdGenerator, SlugIdGenerator};
pub use plan::{schedule_graph, ScheduledGraph};
pub use reporter::{CollectingReporter, TaskEvent, TaskReporter, TaskReporterRegistry, TracingReporter};
pub use task::TaskRequest;
