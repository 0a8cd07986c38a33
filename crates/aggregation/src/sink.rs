//! AggregationSink - the shared batch buffer.
//!
//! Monitor pattern: one mutex guards the batch, one condition variable bound
//! to that mutex wakes the single consumer. Producers only ever hold the lock
//! for a `push`; the consumer releases it while waiting.

use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use contracts::{Batch, Reading, ReadingSink, ShutdownListener, ShutdownSignal};
use tracing::trace;

/// Lock-protected batch plus wake signal
///
/// Every `submit` that returns before a drain's swap is part of that drain;
/// a reading is never observed by two drains.
pub struct AggregationSink {
    batch: Mutex<Batch>,
    wake: Condvar,
    shutdown: ShutdownSignal,
    drains: AtomicU64,
}

impl AggregationSink {
    /// Create a sink subscribed to `shutdown`
    ///
    /// Triggering the signal wakes a consumer blocked in
    /// [`AggregationSink::drain_or_wait`].
    pub fn new(shutdown: &ShutdownSignal) -> Arc<Self> {
        let sink = Arc::new(Self {
            batch: Mutex::new(Vec::new()),
            wake: Condvar::new(),
            shutdown: shutdown.clone(),
            drains: AtomicU64::new(0),
        });
        shutdown.subscribe(&sink);
        sink
    }

    /// Append one reading and signal the consumer
    pub fn submit(&self, reading: Reading) {
        self.lock().push(reading);
        self.wake.notify_all();
    }

    /// Wait for `timeout` (or shutdown), then swap out the batch
    ///
    /// Submissions during the wait do not end it early. The returned batch
    /// may be empty.
    pub fn drain_or_wait(&self, timeout: Duration) -> Batch {
        let deadline = Instant::now().checked_add(timeout);
        let mut batch = self.lock();

        while !self.shutdown.is_triggered() {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => timeout,
            };
            if remaining.is_zero() {
                break;
            }

            let (guard, _) = self
                .wake
                .wait_timeout(batch, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            batch = guard;
        }

        let drained = mem::take(&mut *batch);
        self.drains.fetch_add(1, Ordering::Relaxed);
        trace!(readings = drained.len(), "batch drained");
        drained
    }

    /// Swap out the batch without waiting
    pub fn drain(&self) -> Batch {
        let drained = mem::take(&mut *self.lock());
        self.drains.fetch_add(1, Ordering::Relaxed);
        drained
    }

    /// Completed drains of either kind
    pub fn drains(&self) -> u64 {
        self.drains.load(Ordering::Relaxed)
    }

    /// Readings currently buffered
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// The buffer is a plain `Vec`, still consistent if a holder panicked
    fn lock(&self) -> MutexGuard<'_, Batch> {
        self.batch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReadingSink for AggregationSink {
    fn submit(&self, reading: Reading) {
        AggregationSink::submit(self, reading);
    }
}

impl ShutdownListener for AggregationSink {
    fn on_shutdown(&self) {
        // Notify under the lock so a consumer between its flag check and
        // its wait cannot miss the wakeup.
        let _guard = self.lock();
        self.wake.notify_all();
    }
}

impl fmt::Debug for AggregationSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregationSink")
            .field("pending", &self.pending())
            .field("drains", &self.drains())
            .field("shutdown", &self.shutdown.is_triggered())
            .finish()
    }
}
