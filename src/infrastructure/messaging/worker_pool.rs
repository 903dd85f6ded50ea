use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

use crate::application::services::PipelineError;

/// Tuning for one worker pool. Kept explicit so tests can shrink
/// parallelism and zero out the backoff.
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    pub parallelism: usize,
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub backoff_base: u32,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            parallelism: 20,
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            backoff_base: 2,
        }
    }
}

impl WorkerPoolConfig {
    fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        self.initial_backoff * self.backoff_base.saturating_pow(attempt.saturating_sub(1))
    }
}

/// What a pool runs per job. `run` is retried up to `max_attempts` times;
/// `on_exhausted` fires once when the retry budget runs out.
#[async_trait]
pub trait JobHandler<J: Send + Sync + 'static>: Send + Sync {
    async fn run(&self, job: &J) -> Result<(), PipelineError>;
    async fn on_exhausted(&self, job: &J, error: PipelineError);
}

#[derive(Debug)]
pub struct SubmitError;

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Worker pool channel closed")
    }
}

impl std::error::Error for SubmitError {}

/// A fixed set of workers pulling jobs off a shared unbounded queue. Each
/// worker retries a failed job with exponential backoff before giving up.
pub struct WorkerPool<J: Send + Sync + 'static> {
    sender: mpsc::UnboundedSender<J>,
}

impl<J: Send + Sync + 'static> WorkerPool<J> {
    pub fn start(handler: Arc<dyn JobHandler<J>>, config: WorkerPoolConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver = Arc::new(Mutex::new(receiver));

        for worker_id in 0..config.parallelism.max(1) {
            let receiver = receiver.clone();
            let handler = handler.clone();
            let config = config.clone();

            tokio::spawn(async move {
                worker_loop(worker_id, receiver, handler, config).await;
            });
        }

        Self { sender }
    }

    pub fn submit(&self, job: J) -> Result<(), SubmitError> {
        self.sender.send(job).map_err(|_| SubmitError)
    }
}

async fn worker_loop<J: Send + Sync + 'static>(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<J>>>,
    handler: Arc<dyn JobHandler<J>>,
    config: WorkerPoolConfig,
) {
    tracing::debug!(worker_id, "worker started");

    loop {
        let job = {
            let mut receiver = receiver.lock().await;
            receiver.recv().await
        };

        match job {
            Some(job) => run_with_retries(&job, handler.as_ref(), &config).await,
            None => break,
        }
    }

    tracing::debug!(worker_id, "worker stopped");
}

async fn run_with_retries<J: Send + Sync + 'static>(
    job: &J,
    handler: &dyn JobHandler<J>,
    config: &WorkerPoolConfig,
) {
    for attempt in 1..=config.max_attempts.max(1) {
        match handler.run(job).await {
            Ok(()) => return,
            Err(error) => {
                if attempt >= config.max_attempts {
                    handler.on_exhausted(job, error).await;
                    return;
                }

                let backoff = config.backoff_for_attempt(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %error,
                    "job attempt failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
        }
    }
}
