//! Fixed-interval polling of an asynchronous generation task.
//!
//! State machine: `Idle -> Polling -> {Completed, Failed, Cancelled}`.
//!
//! A status fetch is issued once per interval, starting one interval after
//! the task id becomes available. There is no backoff, no jitter and no
//! attempt limit; a fetch error is terminal. Cancellation is cooperative:
//! the token is checked before every tick, and an in-flight fetch is allowed
//! to finish. Every exit path drops the timer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{GenerationJob, JobState, VideoOutput};

/// Interval between status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

pub const GENERATION_FAILED: &str = "Video generation failed. Please try again.";
pub const POLLING_CANCELLED: &str = "Polling cancelled";

/// Something that can report the status of a task.
#[async_trait]
pub trait TaskStatusSource: Send + Sync {
    async fn fetch_status(&self, task_id: &str) -> AppResult<GenerationJob>;
}

/// Polling state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling { task_id: String, attempts: u32 },
    Completed(VideoOutput),
    Failed(String),
    Cancelled,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Completed(_) | PollState::Failed(_) | PollState::Cancelled
        )
    }

    /// Apply one status fetch result.
    ///
    /// Terminal states absorb every input. `completed` without a video URL
    /// keeps polling.
    pub fn on_fetch(self, result: AppResult<GenerationJob>) -> PollState {
        let (task_id, attempts) = match self {
            PollState::Polling { task_id, attempts } => (task_id, attempts + 1),
            other => return other,
        };

        match result {
            Ok(job) => match (job.state, job.output) {
                (JobState::Completed, Some(output)) => PollState::Completed(output),
                (JobState::Failed, _) => PollState::Failed(GENERATION_FAILED.to_string()),
                _ => PollState::Polling { task_id, attempts },
            },
            Err(e) => PollState::Failed(e.to_string()),
        }
    }

    /// Cancel unless already terminal.
    pub fn cancel(self) -> PollState {
        if self.is_terminal() {
            self
        } else {
            PollState::Cancelled
        }
    }

    /// Convert a terminal state into the caller-facing result.
    pub fn into_result(self) -> AppResult<VideoOutput> {
        match self {
            PollState::Completed(output) => Ok(output),
            PollState::Failed(message) => Err(AppError::Polling(message)),
            PollState::Cancelled => Err(AppError::Polling(POLLING_CANCELLED.to_string())),
            PollState::Idle | PollState::Polling { .. } => Err(AppError::Polling(
                "Polling has not finished".to_string(),
            )),
        }
    }
}

/// Drives a [`TaskStatusSource`] until the task reaches a terminal state.
pub struct TaskPoller<S> {
    source: Arc<S>,
    interval: Duration,
}

impl<S> Clone for TaskPoller<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            interval: self.interval,
        }
    }
}

impl<S: TaskStatusSource + 'static> TaskPoller<S> {
    pub fn new(source: Arc<S>, interval: Duration) -> Self {
        Self { source, interval }
    }

    /// Poll until terminal or until `cancel` fires, returning the final state.
    pub async fn run(&self, task_id: &str, cancel: &CancellationToken) -> PollState {
        let (state_tx, _state_rx) = watch::channel(PollState::Idle);
        self.drive(task_id, cancel, &state_tx).await
    }

    /// Poll on a background task. Dropping the handle cancels polling.
    pub fn spawn(&self, task_id: impl Into<String>) -> PollHandle {
        let task_id = task_id.into();
        let cancel = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(PollState::Idle);

        let poller = self.clone();
        let token = cancel.clone();
        let join = tokio::spawn(async move { poller.drive(&task_id, &token, &state_tx).await });

        PollHandle {
            cancel,
            state: state_rx,
            join: Some(join),
        }
    }

    async fn drive(
        &self,
        task_id: &str,
        cancel: &CancellationToken,
        state_tx: &watch::Sender<PollState>,
    ) -> PollState {
        let mut state = PollState::Polling {
            task_id: task_id.to_string(),
            attempts: 0,
        };
        state_tx.send_replace(state.clone());
        info!(task_id, interval_secs = self.interval.as_secs(), "Polling task status");

        // Ticks are anchored to the start so a slow fetch does not push back
        // the next one; the period must be non-zero
        let period = self.interval.max(Duration::from_millis(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    state = state.cancel();
                    break;
                }
                _ = ticker.tick() => {}
            }

            let result = self.source.fetch_status(task_id).await;
            state = state.on_fetch(result);
            state_tx.send_replace(state.clone());

            match &state {
                PollState::Polling { attempts, .. } => {
                    debug!(task_id, attempts, "Task still pending");
                }
                PollState::Completed(output) => {
                    info!(task_id, video_url = %output.video_url, "Task completed");
                    break;
                }
                PollState::Failed(message) => {
                    warn!(task_id, %message, "Task polling failed");
                    break;
                }
                PollState::Idle | PollState::Cancelled => break,
            }
        }

        if matches!(state, PollState::Cancelled) {
            info!(task_id, "Polling cancelled");
        }
        state_tx.send_replace(state.clone());
        state
    }
}

/// Handle to a spawned poll.
pub struct PollHandle {
    cancel: CancellationToken,
    state: watch::Receiver<PollState>,
    join: Option<JoinHandle<PollState>>,
}

impl PollHandle {
    /// Stop issuing further status fetches.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Latest observed state.
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// Wait for the poll to reach a terminal state.
    pub async fn wait(mut self) -> PollState {
        match self.join.take() {
            Some(join) => join.await.unwrap_or_else(|e| {
                warn!(error = %e, "Polling task aborted");
                PollState::Failed("Polling task aborted".to_string())
            }),
            None => self.state(),
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
