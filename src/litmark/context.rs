//! # Context-Name Allocation
//!
//! Blocks that ask for isolation get a fresh, uniquely-named evaluation
//! context instead of joining a named one. The allocator owns the counter
//! behind those names; whatever orchestrates per-document processing decides
//! its scope. Names are unique per allocator, and only within a process run
//! — nothing is persisted.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

static GLOBAL_ALLOCATOR: Lazy<ContextAllocator> = Lazy::new(ContextAllocator::new);

/// Mints autogenerated context names of the form `_autogenerated__<n>`.
///
/// The counter starts at 0 and increments atomically, so an allocator shared
/// across threads never hands the same name to two blocks.
#[derive(Debug, Default)]
pub struct ContextAllocator {
    next_id: AtomicU64,
}

impl ContextAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide allocator, for hosts that derive directives without
    /// threading their own allocator through the pipeline.
    pub fn global() -> &'static ContextAllocator {
        &GLOBAL_ALLOCATOR
    }

    /// Consume the next counter value and return a fresh context name.
    pub fn mint(&self) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        format!("_autogenerated__{}", id)
    }
}
