//! vote_pool — schedule independent verification queries onto a bounded
//! number of worker threads.
//!
//! Grounded on `original_source/src/workqueue.c`'s `workqueue_schedule`/
//! `workqueue_launch` shape (queue work first, then run it across a fixed
//! thread count and wait for completion), re-expressed over `rayon`'s
//! scoped thread pool instead of a hand-rolled mutex-protected linked list
//! and `pthread_create`/`pthread_join` pair.

#![forbid(unsafe_code)]

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to build a {nb_threads}-thread pool: {source}")]
    Build {
        nb_threads: usize,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}

/// A queue of independent jobs, each producing a `T`, to be run across a
/// fixed number of worker threads.
///
/// Jobs are collected with [`Pool::schedule`] and only start running once
/// [`Pool::launch`] is called; there is no streaming or incremental result
/// delivery, matching the original's run-to-completion `workqueue_launch`.
pub struct Pool<T: Send> {
    jobs: Vec<Box<dyn FnOnce() -> T + Send>>,
}

impl<T: Send> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> Pool<T> {
    pub fn new() -> Self {
        Pool { jobs: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Queue one job for later execution.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        self.jobs.push(Box::new(job));
    }

    /// Run every scheduled job across `nb_threads` worker threads, blocking
    /// until all of them complete, and return their results in scheduling
    /// order.
    pub fn launch(self, nb_threads: usize) -> Result<Vec<T>, PoolError>
    where
        T: Send,
    {
        debug!(
            "vote_pool: launching {} jobs across {} threads",
            self.jobs.len(),
            nb_threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(nb_threads)
            .build()
            .map_err(|source| PoolError::Build { nb_threads, source })?;

        let results = pool.install(|| {
            use rayon::prelude::*;
            self.jobs.into_par_iter().map(|job| job()).collect()
        });

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn runs_every_scheduled_job() {
        let mut pool: Pool<usize> = Pool::new();
        for i in 0..8 {
            pool.schedule(move || i * i);
        }
        let mut results = pool.launch(4).unwrap();
        results.sort_unstable();
        assert_eq!(results, vec![0, 1, 4, 9, 16, 25, 36, 49]);
    }

    #[test]
    fn an_empty_pool_launches_to_an_empty_result() {
        let pool: Pool<()> = Pool::new();
        assert!(pool.is_empty());
        let results = pool.launch(2).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn jobs_actually_run_concurrently_across_threads() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut pool: Pool<()> = Pool::new();
        for _ in 0..16 {
            let counter = Arc::clone(&counter);
            pool.schedule(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.launch(4).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 16);
    }
}
