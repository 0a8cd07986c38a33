//! ShutdownSignal - cooperative cancellation for the whole pipeline
//!
//! A one-way flag paired with a broadcast wake. Sources poll the flag once per
//! tick; blocking components subscribe a [`ShutdownListener`] so they are
//! woken as soon as the flag flips instead of at their next timeout.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Component woken when shutdown is triggered
pub trait ShutdownListener: Send + Sync {
    /// Called exactly once, from the thread that triggered shutdown (or from
    /// the subscriber itself when subscribing after the fact).
    fn on_shutdown(&self);
}

struct Inner {
    triggered: AtomicBool,
    listeners: Mutex<Vec<Weak<dyn ShutdownListener>>>,
}

/// Process-wide shutdown signal
///
/// Cheap to clone; every clone observes the same flag. The transition
/// false -> true happens at most once.
#[derive(Clone)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    /// Create an untriggered signal
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                triggered: AtomicBool::new(false),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Check whether shutdown has been requested
    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    /// Request shutdown and wake every live listener
    ///
    /// Returns `true` if this call performed the transition.
    pub fn trigger(&self) -> bool {
        if self.inner.triggered.swap(true, Ordering::SeqCst) {
            return false;
        }

        let listeners = std::mem::take(
            &mut *self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for listener in listeners.iter().filter_map(Weak::upgrade) {
            listener.on_shutdown();
        }
        true
    }

    /// Register a listener to be woken on trigger
    ///
    /// Only a weak reference is kept. A listener subscribing after the
    /// trigger is woken immediately.
    pub fn subscribe<L: ShutdownListener + 'static>(&self, listener: &Arc<L>) {
        let weak: Weak<dyn ShutdownListener> = Arc::downgrade(listener) as Weak<dyn ShutdownListener>;
        {
            let mut listeners = self
                .inner
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !self.is_triggered() {
                listeners.push(weak);
                return;
            }
        }
        listener.on_shutdown();
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownSignal")
            .field("triggered", &self.is_triggered())
            .finish()
    }
}
