//! Concurrency Governor.
//!
//! Holds one semaphore permit per running target. A task is only spawned
//! once its permit is acquired, so at most `max_in_flight` targets are ever
//! between probe and terminal state.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

use snmpscan_common::scanning::{LivenessProbe, SessionConnector};

use super::executor::{ScanRequest, TargetState, TargetTask};
use crate::output::Output;

/// Called with `(finished, total)` each time a target reaches a terminal
/// state.
pub type ProgressFn = Arc<dyn Fn(usize, usize) + Send + Sync>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub done: usize,
    pub unreachable: usize,
    pub connect_failed: usize,
    pub query_failed: usize,
    pub aborted: usize,
}

impl Tally {
    fn record(&mut self, state: TargetState) {
        match state {
            TargetState::Done => self.done += 1,
            TargetState::Unreachable => self.unreachable += 1,
            TargetState::ConnectFailed => self.connect_failed += 1,
            TargetState::QueryFailed => self.query_failed += 1,
            other => {
                error!("target task ended in non-terminal state {other:?}");
                self.aborted += 1;
            }
        }
    }

    fn record_join(&mut self, joined: Result<TargetState, JoinError>) {
        match joined {
            Ok(state) => self.record(state),
            Err(e) => {
                error!("target task did not finish: {e}");
                self.aborted += 1;
            }
        }
    }

    pub fn total(&self) -> usize {
        self.done + self.unreachable + self.connect_failed + self.query_failed + self.aborted
    }
}

pub(crate) struct Governor {
    permits: Arc<Semaphore>,
    progress: Option<ProgressFn>,
}

impl Governor {
    pub(crate) fn new(max_in_flight: usize, progress: Option<ProgressFn>) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
            progress,
        }
    }

    /// Runs every target to completion and returns once the last task has
    /// been joined.
    pub(crate) async fn run<P, C>(
        &self,
        targets: Vec<Ipv4Addr>,
        request: Arc<ScanRequest>,
        prober: Arc<P>,
        connector: Arc<C>,
        output: Arc<Output>,
    ) -> Tally
    where
        P: LivenessProbe + 'static,
        C: SessionConnector + 'static,
    {
        let total: usize = targets.len();
        let finished = Arc::new(AtomicUsize::new(0));
        let mut tasks: JoinSet<TargetState> = JoinSet::new();
        let mut tally = Tally::default();

        for target in targets {
            let permit: OwnedSemaphorePermit = match self.permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    // Only happens if the semaphore is closed, which nothing does.
                    error!("concurrency limiter closed: {e}");
                    tally.aborted += 1;
                    continue;
                }
            };

            let task = TargetTask::new(
                target,
                request.clone(),
                prober.clone(),
                connector.clone(),
                output.clone(),
            );
            let finished = finished.clone();
            let progress: Option<ProgressFn> = self.progress.clone();

            tasks.spawn(async move {
                let state: TargetState = task.run().await;
                drop(permit);

                let n: usize = finished.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(progress) = progress {
                    (*progress)(n, total);
                }
                state
            });

            while let Some(joined) = tasks.try_join_next() {
                tally.record_join(joined);
            }
        }

        debug!("all {total} targets dispatched, waiting for {} tasks", tasks.len());
        while let Some(joined) = tasks.join_next().await {
            tally.record_join(joined);
        }

        tally
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
