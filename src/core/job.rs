use crate::utils::error::{DesignError, Result};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Single-flight unit of work. Invocations run one at a time in arrival order
/// (`tokio::sync::Mutex` is fair), and all of them stop once the job is cancelled.
pub struct SerialJob {
    name: &'static str,
    queue: Mutex<()>,
    token: CancellationToken,
    waiting: AtomicUsize,
}

struct WaitingGuard<'a>(&'a AtomicUsize);

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SerialJob {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            queue: Mutex::new(()),
            token: CancellationToken::new(),
            waiting: AtomicUsize::new(0),
        }
    }

    /// Queues `work` behind any in-flight invocation. The future is not polled
    /// until it reaches the front of the queue.
    pub async fn perform<T, F>(&self, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.token.is_cancelled() {
            return Err(DesignError::Cancelled);
        }

        self.waiting.fetch_add(1, Ordering::SeqCst);
        let waiting = WaitingGuard(&self.waiting);

        let _turn = tokio::select! {
            _ = self.token.cancelled() => {
                tracing::debug!("{}: cancelled while queued", self.name);
                return Err(DesignError::Cancelled);
            }
            turn = self.queue.lock() => turn,
        };
        drop(waiting);

        tracing::debug!("{}: started", self.name);
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                tracing::debug!("{}: cancelled in flight", self.name);
                Err(DesignError::Cancelled)
            }
            result = work => result,
        }
    }

    pub fn is_running(&self) -> bool {
        self.queue.try_lock().is_err()
    }

    /// Invocations waiting behind the running one.
    pub fn queued(&self) -> usize {
        self.waiting.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
