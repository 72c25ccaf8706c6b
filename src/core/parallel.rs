//! Parallel processing utilities

use crate::error::{Result, ResultExt};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

/// Progress update information for parallel operations
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// A rayon pool with at most `concurrency` workers
pub fn bounded_pool(concurrency: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .thread_name(|i| format!("reachability-{}", i))
        .build()
        .with_context(|| format!("failed to build a pool of {} threads", concurrency))
}

/// Results of a deadline-bounded parallel run
#[derive(Debug)]
pub struct BoundedRun<R> {
    /// Results of the items that ran, in input order
    pub results: Vec<R>,
    /// False when the deadline stopped some items from starting
    pub completed: bool,
}

/// Execute a function in parallel on a collection of items with progress reporting.
///
/// Items not yet started when `deadline` passes are dropped. Items already
/// running finish normally.
pub fn parallel_process_with_deadline<T, F, R, P>(
    items: Vec<T>,
    deadline: Option<Instant>,
    f: F,
    progress_callback: P,
) -> BoundedRun<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
    P: Fn(ProgressUpdate) + Send + Sync,
{
    let total = items.len();
    let counter = AtomicUsize::new(0);
    let expired = AtomicBool::new(false);

    let results: Vec<R> = items
        .into_par_iter()
        .filter_map(|item| {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                expired.store(true, Ordering::Relaxed);
                return None;
            }

            let result = f(item);
            let current = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress_callback(ProgressUpdate::new(
                current,
                total,
                format!("Processing item {}/{}", current, total),
            ));
            Some(result)
        })
        .collect();

    BoundedRun {
        results,
        completed: !expired.load(Ordering::Relaxed),
    }
}
