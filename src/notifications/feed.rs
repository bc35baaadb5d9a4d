//! Polling notification feed with optimistic read tracking.
//!
//! A feed owns one timer task. Each fetch is tagged with a sequence
//! number and only applied if nothing newer has been applied yet, so a slow
//! poll can never overwrite a later manual refresh. After [`NotificationFeed::stop`]
//! (or drop) the timer is gone and any late response is thrown away.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::source::NotificationSource;
use super::types::FeedState;
use crate::errors::ApiError;

/// Prevent a zero interval from turning the poller into a busy loop.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What happened to one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// New list applied.
    Applied,
    /// Request failed; previous list kept and `error` set.
    Failed,
    /// A newer response had already been applied; result dropped.
    Stale,
    /// Another fetch was in flight, nothing sent.
    Skipped,
    /// Feed was stopped; nothing sent or result dropped.
    Disposed,
}

struct FeedInner {
    source: Arc<dyn NotificationSource>,
    state: watch::Sender<FeedState>,
    next_seq: AtomicU64,
    in_flight: AtomicUsize,
    disposed: AtomicBool,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// Decrements the in-flight count even if the fetch future is dropped
/// part-way through.
struct InFlight<'a>(&'a FeedInner);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let remaining = self.0.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        self.0.state.send_if_modified(|s| s.set_loading(remaining > 0));
    }
}

impl FeedInner {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `guarded` fetches are skipped while any other fetch is running.
    async fn fetch(&self, guarded: bool) -> FetchOutcome {
        if self.is_disposed() {
            return FetchOutcome::Disposed;
        }
        if guarded {
            if self
                .in_flight
                .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                log::debug!("Notification fetch already in flight, skipping");
                return FetchOutcome::Skipped;
            }
        } else {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
        }
        let guard = InFlight(self);
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_if_modified(|s| s.set_loading(true));

        let result = self.source.fetch().await;
        drop(guard);

        if self.is_disposed() {
            log::debug!("Dropping notification response #{seq}: feed stopped");
            return FetchOutcome::Disposed;
        }

        let mut outcome = FetchOutcome::Stale;
        self.state.send_if_modified(|s| {
            if seq <= s.last_applied_seq {
                return false;
            }
            s.last_applied_seq = seq;
            outcome = match result {
                Ok(snapshot) => {
                    s.apply_snapshot(snapshot);
                    FetchOutcome::Applied
                }
                Err(e) => {
                    s.apply_error(e.to_string());
                    FetchOutcome::Failed
                }
            };
            true
        });
        if outcome == FetchOutcome::Stale {
            log::warn!("Discarding stale notification response #{seq}");
        }
        outcome
    }

    /// Undo an optimistic read unless a fetch has replaced the list since.
    fn rollback(&self, generation: u64, ids: &[i64]) {
        self.state.send_if_modified(|s| {
            if s.generation != generation {
                log::info!("Not rolling back read state: list was refreshed since");
                return false;
            }
            s.mark_unread_local(ids);
            true
        });
    }
}

/// Bell-icon data source for one page view.
///
/// Construct once, call [`start`](Self::start), and [`stop`](Self::stop)
/// (or drop) when the page goes away. Must be used inside a Tokio runtime.
pub struct NotificationFeed {
    inner: Arc<FeedInner>,
}

impl NotificationFeed {
    pub fn new(source: Arc<dyn NotificationSource>) -> Self {
        let (state, _) = watch::channel(FeedState::default());
        NotificationFeed {
            inner: Arc::new(FeedInner {
                source,
                state,
                next_seq: AtomicU64::new(0),
                in_flight: AtomicUsize::new(0),
                disposed: AtomicBool::new(false),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Fetch now, then every `interval` until stopped. Calling again
    /// replaces the running timer.
    pub fn start(&self, interval: Duration) {
        if self.inner.is_disposed() {
            log::warn!("Ignoring start() on a stopped notification feed");
            return;
        }
        let interval = interval.max(MIN_POLL_INTERVAL);
        // The timer only holds a weak handle so dropping the feed ends it.
        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                if inner.is_disposed() {
                    break;
                }
                inner.fetch(true).await;
            }
            log::debug!("Notification poller exited");
        });

        if let Some(previous) = self.inner.timer().replace(handle) {
            previous.abort();
        }
        log::info!("Notification feed polling every {interval:?}");
    }

    /// Cancel the timer and discard any response still in flight. Safe to
    /// call more than once.
    pub fn stop(&self) {
        let already = self.inner.disposed.swap(true, Ordering::SeqCst);
        if let Some(handle) = self.inner.timer().take() {
            handle.abort();
        }
        self.inner.state.send_if_modified(|s| s.set_loading(false));
        if !already {
            log::debug!("Notification feed stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Whether a poll timer is currently scheduled.
    pub fn is_polling(&self) -> bool {
        self.inner.timer().as_ref().is_some_and(|h| !h.is_finished())
    }

    /// One fetch, skipped if another is already running (timer path).
    pub async fn fetch(&self) -> FetchOutcome {
        self.inner.fetch(true).await
    }

    /// User-initiated refresh. Always issued; an older request that lands
    /// afterwards is discarded.
    pub async fn refresh(&self) -> FetchOutcome {
        self.inner.fetch(false).await
    }

    /// Flip one entry to read locally, then tell the backend. Rolled back
    /// if the backend call fails and no fetch has landed in between.
    pub async fn mark_as_read(&self, id: i64) -> Result<(), ApiError> {
        let mut generation = 0;
        let mut changed = false;
        self.inner.state.send_if_modified(|s| {
            generation = s.generation;
            changed = s.mark_read_local(id);
            changed
        });

        let result = self.inner.source.mark_read(id).await;
        if result.is_err() && changed {
            self.inner.rollback(generation, &[id]);
        }
        result
    }

    /// Flip everything to read locally, then tell the backend once.
    pub async fn mark_all_as_read(&self) -> Result<(), ApiError> {
        let mut generation = 0;
        let mut flipped = Vec::new();
        self.inner.state.send_if_modified(|s| {
            generation = s.generation;
            flipped = s.mark_all_read_local();
            !flipped.is_empty()
        });

        let result = self.inner.source.mark_all_read().await;
        if result.is_err() && !flipped.is_empty() {
            self.inner.rollback(generation, &flipped);
        }
        result
    }

    /// Copy of the current state.
    pub fn state(&self) -> FeedState {
        self.inner.state.borrow().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.inner.state.borrow().unread_count()
    }

    /// Receiver that wakes on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.inner.state.subscribe()
    }
}

impl Drop for NotificationFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for NotificationFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationFeed")
            .field("stopped", &self.is_stopped())
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}
