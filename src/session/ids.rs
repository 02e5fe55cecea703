//! Item id synthesis.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::store::Category;

/// Synthesizes store ids for newly added items.
///
/// Ids are practically unique within a process lifetime; callers must not
/// assume anything stronger. Injecting the generator keeps the guarantee
/// explicit and lets tests pin ids deterministically.
pub trait IdGenerator: Send + Sync {
    /// Produce the id for a new item of the given category.
    fn next_id(&self, category: Category) -> String;
}

/// Default generator: category prefix plus a random UUID v4.
#[derive(Debug, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self, category: Category) -> String {
        format!("{}-{}", category.id_prefix(), Uuid::new_v4())
    }
}

/// Deterministic generator: category prefix plus a process-wide monotonic
/// counter. Intended for tests and reproducible fixtures.
#[derive(Debug, Default)]
pub struct CounterIdGenerator {
    counter: AtomicU64,
}

impl CounterIdGenerator {
    /// Create a generator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for CounterIdGenerator {
    fn next_id(&self, category: Category) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", category.id_prefix(), n)
    }
}
