//! Batch runner split into focused submodules.
//!
//! - [`batch_task`] - the sequential per-entry loop executed on the worker
//! - [`prepare`] - pre-run checks (destination, source, empty batch)
//!
//! A [`BatchRunner`] owns the backend and at most one in-flight batch. Starting
//! a batch returns a [`BatchHandle`] immediately; the work happens on a spawned
//! tokio task and is observed through a [`Reporter`].

mod batch_task;
mod prepare;


pub use prepare::{PreparedBatch, prepare_batch};

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

use crate::backend::{MediaBackend, backend_from_config};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::job::JobConfig;
use crate::reporter::Reporter;
use crate::types::{BatchTally, RunState};

use batch_task::{BatchTaskContext, run_batch_task};

/// State shared between the runner and its worker task
struct RunnerShared {
    /// Current [`RunState`], stored as `u8`
    state: AtomicU8,
    /// Cancellation token of the most recent batch
    cancel_token: Mutex<Option<CancellationToken>>,
}

/// Sequential batch runner (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct BatchRunner {
    backend: Arc<dyn MediaBackend>,
    shared: Arc<RunnerShared>,
}

/// Marks the runner Completed when the worker exits, including by panic
struct RunGuard {
    shared: Arc<RunnerShared>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.shared
            .state
            .store(RunState::Completed.to_u8(), Ordering::Release);
    }
}

impl BatchRunner {
    /// Create a runner around an existing backend
    pub fn new(backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            backend,
            shared: Arc::new(RunnerShared {
                state: AtomicU8::new(RunState::Idle.to_u8()),
                cancel_token: Mutex::new(None),
            }),
        }
    }

    /// Create a runner with the backend selected by `config.tools`
    pub fn from_config(config: &Config) -> Self {
        Self::new(backend_from_config(&config.tools))
    }

    /// Name of the backend this runner dispatches to
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        RunState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    /// Start a batch on a dedicated worker task and return immediately
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyBatch`] if `entries` is empty
    /// - [`Error::Config`] if the job's destination no longer exists
    /// - [`Error::Busy`] if another batch is running on this runner
    ///
    /// No reporter method is called when starting fails.
    pub fn start(
        &self,
        entries: Vec<String>,
        job: Arc<JobConfig>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<BatchHandle> {
        if entries.is_empty() {
            return Err(Error::EmptyBatch);
        }
        job.ensure_destination()?;

        // Held across the state transition so cancel() never sees Running with a stale token
        let mut slot = self
            .shared
            .cancel_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.try_begin()?;
        let guard = RunGuard {
            shared: Arc::clone(&self.shared),
        };
        let cancel_token = CancellationToken::new();
        *slot = Some(cancel_token.clone());
        drop(slot);

        let ctx = BatchTaskContext {
            entries,
            job,
            backend: Arc::clone(&self.backend),
            reporter,
            cancel_token: cancel_token.clone(),
        };

        let join = tokio::spawn(async move {
            let _guard = guard;
            run_batch_task(ctx).await
        });

        Ok(BatchHandle { cancel_token, join })
    }

    /// Start a batch and wait for its tally
    pub async fn run(
        &self,
        entries: Vec<String>,
        job: Arc<JobConfig>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<BatchTally> {
        self.start(entries, job, reporter)?.wait().await
    }

    /// Request cancellation of the running batch
    ///
    /// The current item finishes; no further items are started. Returns
    /// `false` if no batch is running.
    pub fn cancel(&self) -> bool {
        let token = self
            .shared
            .cancel_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.state() != RunState::Running {
            return false;
        }
        match token.as_ref() {
            Some(token) => {
                token.cancel();
                tracing::info!("Batch cancellation requested");
                true
            }
            None => false,
        }
    }

    fn try_begin(&self) -> Result<()> {
        let mut current = self.shared.state.load(Ordering::Acquire);
        loop {
            if RunState::from_u8(current) == RunState::Running {
                return Err(Error::Busy);
            }
            match self.shared.state.compare_exchange(
                current,
                RunState::Running.to_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }
}

/// Handle to a batch running on its worker task
pub struct BatchHandle {
    cancel_token: CancellationToken,
    join: tokio::task::JoinHandle<BatchTally>,
}

impl BatchHandle {
    /// Request cancellation; the current item finishes first
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Token that cancels this batch, for wiring into other shutdown paths
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Handle that aborts the worker task outright
    ///
    /// Unlike [`cancel`](Self::cancel) this drops the item in flight, killing
    /// its backend process. [`wait`](Self::wait) then returns [`Error::Worker`].
    pub fn abort_handle(&self) -> tokio::task::AbortHandle {
        self.join.abort_handle()
    }

    /// Wait for the batch to complete and return its tally
    ///
    /// # Errors
    ///
    /// [`Error::Worker`] if the worker task panicked outside the per-item
    /// boundary (e.g. inside a reporter) or was aborted.
    pub async fn wait(self) -> Result<BatchTally> {
        self.join.await.map_err(|e| {
            tracing::error!(error = %e, "Batch worker terminated abnormally");
            Error::Worker(e.to_string())
        })
    }
}
