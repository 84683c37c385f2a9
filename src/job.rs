//! Background execution of one run at a time
//!
//! The interactive thread calls [`RunController::start`], consumes the
//! progress messages through [`RunHandle::wait_with`] and gets back exactly
//! one [`RunOutcome`]. While a run is in flight the controller refuses to
//! start another one; the busy flag is cleared by a guard owned by the
//! worker thread, so it is released however the worker ends.

use crate::progress::ChannelReporter;
use crate::splitter::{RunRequest, RunResult, SplitError, ValidationError, execute};
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("A run is already in progress")]
    Busy,

    #[error("Failed to start worker thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Split(#[from] SplitError),

    #[error("Run aborted unexpectedly: {0}")]
    Panicked(String),
}

/// How a run attempt ended
#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunResult),
    /// The options never made it to a worker
    Rejected(ValidationError),
    Failed(JobError),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Starts runs on a worker thread, never more than one at a time
#[derive(Debug, Clone, Default)]
pub struct RunController {
    busy: Arc<AtomicBool>,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Spawn a worker for `request`
    pub fn start(&self, request: RunRequest) -> Result<RunHandle, JobError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(JobError::Busy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let (reporter, progress) = ChannelReporter::channel();
        let worker = thread::Builder::new()
            .name("log-splitter-run".to_string())
            .spawn(move || {
                let _guard = guard;
                execute(&request, &reporter)
            })
            .map_err(JobError::Spawn)?;

        tracing::debug!("worker started");
        Ok(RunHandle { progress, worker })
    }
}

/// A run in flight
pub struct RunHandle {
    progress: Receiver<String>,
    worker: JoinHandle<Result<RunResult, SplitError>>,
}

impl RunHandle {
    /// Deliver every progress message to `on_message`, then collect the outcome
    ///
    /// The worker blocks on each message until it is taken here, so this
    /// must be called for the run to make progress.
    pub fn wait_with(self, mut on_message: impl FnMut(String)) -> RunOutcome {
        for message in self.progress.iter() {
            on_message(message);
        }

        match self.worker.join() {
            Ok(Ok(result)) => RunOutcome::Completed(result),
            Ok(Err(e)) => RunOutcome::Failed(JobError::Split(e)),
            Err(payload) => RunOutcome::Failed(JobError::Panicked(panic_message(payload))),
        }
    }

    /// Wait for the outcome, discarding progress
    pub fn wait(self) -> RunOutcome {
        self.wait_with(|_| {})
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
