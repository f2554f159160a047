//! Task id generation

use std::sync::atomic::{AtomicUsize, Ordering};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use uuid::Uuid;

use decision_queue::TaskId;

/// Source of fresh task ids
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> TaskId;
}

impl<F> IdGenerator for F
where
    F: Fn() -> TaskId + Send + Sync,
{
    fn next_id(&self) -> TaskId {
        self()
    }
}

/// Random v4 UUID as a 22-character URL-safe slug.
///
/// The high bit of the first byte is cleared so the slug never starts with
/// `-`, which would read as an option on a command line.
pub fn slug_id() -> TaskId {
    let mut bytes = *Uuid::new_v4().as_bytes();
    bytes[0] &= 0x7f;
    TaskId::new(URL_SAFE_NO_PAD.encode(bytes))
}

/// Generator producing [`slug_id`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct SlugIdGenerator;

impl IdGenerator for SlugIdGenerator {
    fn next_id(&self) -> TaskId {
        slug_id()
    }
}

/// Deterministic generator: `<prefix>-0`, `<prefix>-1`, ...
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicUsize,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicUsize::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> TaskId {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        TaskId::new(format!("{}-{}", self.prefix, n))
    }
}
