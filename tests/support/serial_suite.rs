//! Shared plumbing for the `rspec` suites.
//!
//! rspec hands every example a clone of the environment, so the harness is
//! kept behind a mutex and the suite runs on one thread.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rspec::report::Report;
use rspec::{block::Suite, ConfigurationBuilder, Logger, Runner};
use test_utils::AiHarness;

/// Harness shared between the examples of one suite.
#[derive(Clone, Default)]
pub struct SharedHarness(Arc<Mutex<AiHarness>>);

impl SharedHarness {
    pub fn new(harness: AiHarness) -> Self {
        Self(Arc::new(Mutex::new(harness)))
    }

    /// Locks the harness, recovering from a poisoned mutex left by a
    /// failed example.
    pub fn lock(&self) -> MutexGuard<'_, AiHarness> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SharedHarness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedHarness").finish_non_exhaustive()
    }
}

/// Runs `suite` serially and panics if any example failed.
pub fn run_serial<T>(suite: &Suite<T>)
where
    T: Clone + Send + Sync + fmt::Debug,
{
    let logger = Arc::new(Logger::new(std::io::stdout()));
    let config = ConfigurationBuilder::default()
        .parallel(false)
        .exit_on_failure(false)
        .build()
        .unwrap_or_else(|e| panic!("rspec configuration failed: {e}"));
    let report = Runner::new(config, vec![logger]).run(suite);
    assert!(report.is_success(), "rspec suite reported failures");
}
