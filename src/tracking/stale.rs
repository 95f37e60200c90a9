//! Stale-location watchdog
//!
//! One cancellable timer, scheduled through the injected [`AsyncSpawner`],
//! flags the location as stale when no fix arrives within the timeout. Every
//! fix cancels and reposts it. Timer tasks carry a generation number so a fire
//! that races with a reset is dropped.

use crate::prelude::{Arc, Duration};
use crate::runtime::{spawn_after, AsyncHandle, AsyncSpawner};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Weak};

pub type StaleListener = Arc<dyn Fn(bool) + Send + Sync>;

struct WatchdogState {
    /// Staleness detection turned on in the options
    enabled: bool,
    /// Between `start` and `stop`
    running: bool,
    timeout: Duration,
    pending: Option<Box<dyn AsyncHandle>>,
    generation: u64,
    listener: Option<StaleListener>,
}

struct WatchdogInner {
    stale: AtomicBool,
    state: Mutex<WatchdogState>,
    spawner: Arc<dyn AsyncSpawner>,
}

impl WatchdogInner {
    /// Flip the stale flag and notify on an actual transition.
    ///
    /// Called with the state lock held so transitions reach the listener in order.
    fn transition(&self, state: &WatchdogState, stale: bool) {
        if self.stale.swap(stale, Ordering::AcqRel) != stale {
            log::debug!("location stale state changed to {}", stale);
            if let Some(listener) = &state.listener {
                listener(stale);
            }
        }
    }

    fn cancel_pending(state: &mut WatchdogState) {
        state.generation = state.generation.wrapping_add(1);
        if let Some(handle) = state.pending.take() {
            handle.cancel();
        }
    }

    fn arm(self: &Arc<Self>, state: &mut WatchdogState) {
        Self::cancel_pending(state);
        if !state.enabled || !state.running || self.stale.load(Ordering::Acquire) {
            return;
        }

        let generation = state.generation;
        let weak: Weak<WatchdogInner> = Arc::downgrade(self);
        let handle = spawn_after(self.spawner.as_ref(), state.timeout, move || {
            if let Some(inner) = weak.upgrade() {
                inner.fire(generation);
            }
        });
        state.pending = Some(handle);
    }

    fn fire(&self, generation: u64) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return,
        };
        if state.generation != generation {
            return;
        }
        state.pending = None;
        self.transition(&state, true);
    }
}

/// Flags the location as stale after a period without fixes.
///
/// Cheap to clone; clones share one timer. The listener is invoked from the
/// thread that caused the transition and must not call back into the
/// watchdog's mutating methods.
#[derive(Clone)]
pub struct StaleWatchdog {
    inner: Arc<WatchdogInner>,
}

impl StaleWatchdog {
    pub fn new(spawner: Arc<dyn AsyncSpawner>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(WatchdogInner {
                stale: AtomicBool::new(true),
                state: Mutex::new(WatchdogState {
                    enabled: true,
                    running: false,
                    timeout,
                    pending: None,
                    generation: 0,
                    listener: None,
                }),
                spawner,
            }),
        }
    }

    fn with_state(&self, f: impl FnOnce(&Arc<WatchdogInner>, &mut WatchdogState)) {
        match self.inner.state.lock() {
            Ok(mut state) => f(&self.inner, &mut *state),
            Err(_) => log::warn!("stale watchdog state poisoned"),
        }
    }

    pub fn set_listener(&self, listener: Option<StaleListener>) {
        self.with_state(|_, state| state.listener = listener);
    }

    /// A fresh fix arrived: clear staleness and restart the window.
    pub fn on_fix_received(&self) {
        self.with_state(|inner, state| {
            if state.enabled {
                inner.transition(state, false);
            }
            inner.arm(state);
        });
    }

    pub fn start(&self) {
        self.with_state(|inner, state| {
            state.running = true;
            inner.arm(state);
        });
    }

    /// Cancel the pending timer. The stale flag keeps its value.
    pub fn stop(&self) {
        self.with_state(|_, state| {
            state.running = false;
            WatchdogInner::cancel_pending(state);
        });
    }

    /// Change the timeout; a pending timer is reposted with the new duration.
    pub fn set_timeout(&self, timeout: Duration) {
        self.with_state(|inner, state| {
            state.timeout = timeout;
            if state.pending.is_some() {
                inner.arm(state);
            }
        });
    }

    /// Turn staleness detection on or off. Disabling reports the location as fresh.
    pub fn set_enabled(&self, enabled: bool) {
        self.with_state(|inner, state| {
            if state.enabled == enabled {
                return;
            }
            state.enabled = enabled;
            if enabled {
                inner.arm(state);
            } else {
                WatchdogInner::cancel_pending(state);
                inner.transition(state, false);
            }
        });
    }

    pub fn is_stale(&self) -> bool {
        self.inner.stale.load(Ordering::Acquire)
    }

    pub fn timeout(&self) -> Duration {
        self.inner
            .state
            .lock()
            .map(|state| state.timeout)
            .unwrap_or_default()
    }

    pub fn is_pending(&self) -> bool {
        self.inner
            .state
            .lock()
            .map(|state| state.pending.is_some())
            .unwrap_or(false)
    }
}

impl fmt::Debug for StaleWatchdog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaleWatchdog")
            .field("stale", &self.is_stale())
            .field("timeout", &self.timeout())
            .finish()
    }
}
