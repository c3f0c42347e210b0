//! Single-flight Request Queue
//!
//! Serializes outbound AI-service calls so at most one is in flight. Callers
//! are served in submission order and each receives its own result.
//!
//! ## Mechanics
//!
//! - A mutex-guarded FIFO of type-erased jobs plus an `active` flag
//! - The first enqueue on an idle queue spawns a drain task; the task runs
//!   jobs one after another and clears `active` once the FIFO is empty
//! - Each caller waits on a oneshot channel. Clearing the queue drops the
//!   pending jobs (and their senders), which rejects those callers
//! - Panics inside a job are caught and reported to that job's caller

use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::types::{PhotomonixError, Result};

type Job = BoxFuture<'static, ()>;

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Job>,
    active: bool,
}

/// FIFO queue running one request at a time
///
/// Cloning is cheap; clones share the same queue.
#[derive(Clone, Default)]
pub struct RequestQueue {
    state: Arc<Mutex<QueueState>>,
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("RequestQueue")
            .field("pending", &state.pending.len())
            .field("active", &state.active)
            .finish()
    }
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a request and get a future for its result.
    ///
    /// The request is placed in the queue immediately, before the returned
    /// future is first polled, so submission order is call order. Dropping
    /// the returned future does not remove the request.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn enqueue<T, F, Fut>(
        &self,
        request: F,
    ) -> impl Future<Output = Result<T>> + Send + use<T, F, Fut>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel::<Result<T>>();

        let job = async move {
            let outcome = AssertUnwindSafe(async move { request().await })
                .catch_unwind()
                .await;
            let result = outcome.unwrap_or_else(|_| {
                Err(PhotomonixError::Queue("queued request panicked".to_string()))
            });
            // Caller may have stopped waiting
            let _ = tx.send(result);
        }
        .boxed();

        let start_drain = {
            let mut state = self.lock();
            state.pending.push_back(job);
            debug!(pending = state.pending.len(), active = state.active, "Request enqueued");
            !std::mem::replace(&mut state.active, true)
        };

        if start_drain {
            tokio::spawn(Self::drain(Arc::clone(&self.state)));
        }

        async move {
            match rx.await {
                Ok(result) => result,
                Err(_) => Err(PhotomonixError::QueueCleared),
            }
        }
    }

    /// Run queued jobs until the FIFO is empty
    async fn drain(state: Arc<Mutex<QueueState>>) {
        loop {
            let next = {
                let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
                match guard.pending.pop_front() {
                    Some(job) => job,
                    None => {
                        guard.active = false;
                        return;
                    }
                }
            };
            next.await;
        }
    }

    /// Number of requests waiting to run (excluding the running one)
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a request is currently running or about to run
    pub fn is_active(&self) -> bool {
        self.lock().active
    }

    /// Reject all pending requests. The running request is left alone.
    ///
    /// Returns how many requests were rejected.
    pub fn clear(&self) -> usize {
        let dropped: Vec<Job> = self.lock().pending.drain(..).collect();
        let count = dropped.len();
        drop(dropped);
        if count > 0 {
            warn!(rejected = count, "Request queue cleared");
        }
        count
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_never_runs_two_at_once() {
        let queue = RequestQueue::new();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let futures: Vec<_> = (0..8u64)
            .map(|i| {
                let in_flight = Arc::clone(&in_flight);
                let max_seen = Arc::clone(&max_seen);
                queue.enqueue(move || async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    // uneven durations so overlap would show up
                    tokio::time::sleep(Duration::from_millis(50 * ((i % 3) + 1))).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, PhotomonixError>(i)
                })
            })
            .collect();

        let results = futures::future::join_all(futures).await;
        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fifo_order() {
        let queue = RequestQueue::new();
        let started = Arc::new(Mutex::new(Vec::new()));
        let finished = Arc::new(Mutex::new(Vec::new()));

        let futures: Vec<_> = (0..6usize)
            .map(|i| {
                let started = Arc::clone(&started);
                let finished = Arc::clone(&finished);
                queue.enqueue(move || async move {
                    started.lock().unwrap().push(i);
                    // later requests are faster; order must still hold
                    tokio::time::sleep(Duration::from_millis(100 - (i as u64) * 10)).await;
                    finished.lock().unwrap().push(i);
                    Ok::<_, PhotomonixError>(i * 10)
                })
            })
            .collect();

        let results: Vec<usize> = futures::future::join_all(futures)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(results, vec![0, 10, 20, 30, 40, 50]);
        assert_eq!(*started.lock().unwrap(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(*finished.lock().unwrap(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_each_caller_gets_own_error() {
        let queue = RequestQueue::new();

        let ok = queue.enqueue(|| async { Ok::<_, PhotomonixError>("fine") });
        let failed = queue.enqueue(|| async {
            Err::<&str, _>(PhotomonixError::http(500, "Failed to generate images"))
        });
        let after = queue.enqueue(|| async { Ok::<_, PhotomonixError>("still fine") });

        assert_eq!(ok.await.unwrap(), "fine");
        assert_eq!(
            failed.await.unwrap_err().to_string(),
            "HTTP 500: Failed to generate images"
        );
        assert_eq!(after.await.unwrap(), "still fine");
    }

    #[tokio::test]
    async fn test_clear_rejects_pending_only() {
        let queue = RequestQueue::new();
        let (started_tx, started_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let running = queue.enqueue(move || async move {
            let _ = started_tx.send(());
            let _ = release_rx.await;
            Ok::<_, PhotomonixError>(1)
        });
        let second = queue.enqueue(|| async { Ok::<_, PhotomonixError>(2) });
        let third = queue.enqueue(|| async { Ok::<_, PhotomonixError>(3) });

        started_rx.await.unwrap();
        assert!(queue.is_active());
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());

        assert!(matches!(second.await, Err(PhotomonixError::QueueCleared)));
        assert!(matches!(third.await, Err(PhotomonixError::QueueCleared)));

        release_tx.send(()).unwrap();
        assert_eq!(running.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_panic_does_not_wedge_queue() {
        let queue = RequestQueue::new();

        let panicking = queue.enqueue(|| async {
            if true {
                panic!("boom");
            }
            Ok::<u8, PhotomonixError>(0)
        });
        let next = queue.enqueue(|| async { Ok::<_, PhotomonixError>(7u8) });

        assert!(matches!(panicking.await, Err(PhotomonixError::Queue(_))));
        assert_eq!(next.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_idle_after_drain() {
        let queue = RequestQueue::new();
        queue
            .enqueue(|| async { Ok::<_, PhotomonixError>(()) })
            .await
            .unwrap();

        // drain task flips the flag after the last job; give it a turn
        for _ in 0..10 {
            if !queue.is_active() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(!queue.is_active());
        assert!(queue.is_empty());
    }
}
