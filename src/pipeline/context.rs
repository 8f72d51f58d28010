//! Pipeline context: everything a stage shares with its siblings for one batch.

use anyhow::Result;
use log::{debug, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::engine::{CancelToken, HashProvider, SlowHashGate};
use crate::error::PipelineError;
use crate::types::Phase;
use crate::utils::config::{PoolLimits, THREAD_NAME_PREFIX};

/// First failure of a batch. Later failures are logged and dropped.
pub type FirstError = Arc<Mutex<Option<PipelineError>>>;

/// Shared context for one batch. Built once per run and handed to every stage by `Arc`.
///
/// Holds the fast provider, the slow-hash gate, the per-item worker pool, the cancel token,
/// and the first recorded error. Stages share nothing else.
pub struct PipelineContext {
    pub fast: Arc<dyn HashProvider>,
    pub gate: SlowHashGate,
    pub cancel: CancelToken,
    pool: ThreadPool,
    first_error: FirstError,
    phase: AtomicU8,
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

fn record_failure(first_error: &FirstError, cancel: &CancelToken, err: PipelineError) {
    let mut slot = first_error.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(first) = slot.as_ref() {
        if err != PipelineError::Cancelled {
            warn!("discarding error after first failure ({}): {}", first, err);
        }
    } else {
        debug!("batch failed: {}", err);
        *slot = Some(err);
    }
    drop(slot);
    cancel.cancel();
}

impl PipelineContext {
    /// Build a context with a worker pool of `num_threads` (resolved through [`PoolLimits`]).
    /// A panicking per-item task is recorded as [`PipelineError::TaskPanicked`] and cancels the batch.
    pub fn new(
        fast: Arc<dyn HashProvider>,
        gate: SlowHashGate,
        cancel: CancelToken,
        num_threads: Option<usize>,
    ) -> Result<Self> {
        let threads = PoolLimits::current().resolve(num_threads);
        let first_error: FirstError = Arc::new(Mutex::new(None));

        let handler_error = Arc::clone(&first_error);
        let handler_cancel = cancel.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("{THREAD_NAME_PREFIX}-worker-{i}"))
            .panic_handler(move |payload| {
                let message = panic_message(payload.as_ref());
                record_failure(
                    &handler_error,
                    &handler_cancel,
                    PipelineError::TaskPanicked { message },
                );
            })
            .build()
            .map_err(|e| PipelineError::Config(format!("worker pool: {e}")))?;
        debug!("Worker pool: {} threads", threads);

        Ok(Self {
            fast,
            gate,
            cancel,
            pool,
            first_error,
            phase: AtomicU8::new(Phase::NotStarted as u8),
        })
    }

    /// Pool that runs per-item tasks and their sub-tasks.
    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }

    pub fn fast_hash(&self, data: &str) -> Result<String, PipelineError> {
        self.fast.hash(data)
    }

    pub fn slow_hash(&self, data: &str) -> Result<String, PipelineError> {
        self.gate.sign(data, &self.cancel)
    }

    /// Record a failure and cancel the batch (fail-fast).
    pub fn fail(&self, err: PipelineError) {
        record_failure(&self.first_error, &self.cancel, err);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The first recorded error, or `Cancelled` if the token fired without one.
    pub fn outcome(&self) -> Result<(), PipelineError> {
        let slot = self
            .first_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(err) => Err(err.clone()),
            None if self.is_cancelled() => Err(PipelineError::Cancelled),
            None => Ok(()),
        }
    }

    pub fn phase(&self) -> Phase {
        Phase::from_u8(self.phase.load(Ordering::Acquire))
    }

    pub fn set_phase(&self, phase: Phase) {
        let prev = Phase::from_u8(self.phase.swap(phase as u8, Ordering::AcqRel));
        if prev != phase {
            debug!("phase: {:?} -> {:?}", prev, phase);
        }
    }
}
