//! Job dispatch — sequential or batch-scoped rayon pool.
//!
//! Jobs are pure functions of their inputs, so dispatch is a pluggable
//! execution strategy, not part of the fitting logic. The worker pool is an
//! explicit resource scoped to one batch invocation: built here before the
//! fan-out, released when this function returns on every path (RAII drop),
//! including panics unwinding out of a job. `par_iter().map().collect()`
//! preserves input order, so the report order never depends on completion
//! order.

use rayon::prelude::*;

use crate::confidence::{
    core::Execution,
    errors::{ConfError, ConfResult},
};

/// Map `job` over `jobs` under the configured execution strategy.
///
/// Sequential execution runs on the calling thread. Parallel execution
/// builds a rayon pool bounded by `workers` (default: available parallelism
/// minus one, at least one) and fans the jobs out over it; result order is
/// the input order either way.
///
/// # Errors
/// - [`ConfError::InvalidWorkerCount`] for an explicit zero bound.
/// - [`ConfError::PoolBuild`] when the pool cannot be constructed.
pub fn run_jobs<T, R, F>(jobs: &[T], execution: &Execution, job: F) -> ConfResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    execution.validate()?;
    match execution {
        Execution::Sequential => Ok(jobs.iter().map(job).collect()),
        Execution::Parallel { workers } => {
            let threads = workers.unwrap_or_else(default_workers);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| ConfError::PoolBuild { text: e.to_string() })?;
            // The pool is dropped at the end of this scope, releasing its
            // workers on success and on unwind alike.
            Ok(pool.install(|| jobs.par_iter().map(|t| job(t)).collect()))
        }
    }
}

/// Default pool size: available compute units minus one, at least one.
fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get().saturating_sub(1).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Order preservation under both execution strategies.
    // - The zero-worker rejection.
    //
    // They intentionally DO NOT cover:
    // - Real fitting jobs, covered by the integration pipeline tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Results come back in input order regardless of execution strategy.
    //
    // Given
    // -----
    // - Jobs computing i² over 0..32, sequential and with a 2-worker pool.
    //
    // Expect
    // ------
    // - Both outputs equal the in-order map.
    fn order_is_preserved_under_both_strategies() {
        let jobs: Vec<usize> = (0..32).collect();
        let expected: Vec<usize> = jobs.iter().map(|&i| i * i).collect();
        let sequential =
            run_jobs(&jobs, &Execution::Sequential, |&i| i * i).expect("sequential runs");
        assert_eq!(sequential, expected);
        let parallel = run_jobs(&jobs, &Execution::Parallel { workers: Some(2) }, |&i| i * i)
            .expect("parallel runs");
        assert_eq!(parallel, expected);
    }

    #[test]
    // Purpose
    // -------
    // An explicit zero worker bound fails before any job runs.
    //
    // Given
    // -----
    // - Execution::Parallel { workers: Some(0) }.
    //
    // Expect
    // ------
    // - InvalidWorkerCount.
    fn zero_workers_fail_fast() {
        let jobs = [1usize];
        assert!(matches!(
            run_jobs(&jobs, &Execution::Parallel { workers: Some(0) }, |&i| i),
            Err(ConfError::InvalidWorkerCount { workers: 0 })
        ));
    }
}
