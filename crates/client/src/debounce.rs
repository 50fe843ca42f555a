//! Debounce scheduler for the interactive query stream.
//!
//! A single register holds the latest submission. Each submission gets a
//! generation number; a timer that fires only proceeds if its generation is
//! still the registered one, so a later query with the same text as an older,
//! canceled one is never confused with it.
//!
//! ```text
//! Idle ──submit──▶ Pending(gen, key) ──timer──▶ InFlight(gen, key) ──done──▶ Idle
//!                      │                            │
//!                      └──submit (newer)──▶ Superseded / Canceled
//! ```
//!
//! Superseding a `Pending` request always cancels its timer. Superseding an
//! `InFlight` request cancels the fetch only when the new query text differs;
//! an identical query lets it finish so its result lands in the cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use svgl_core::Error;
use svgl_core::cache::cache_key;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
enum Slot {
    Idle,
    Pending(Registered),
    InFlight(Registered),
}

#[derive(Debug)]
struct Registered {
    generation: u64,
    key: String,
    /// The request's own token first, then tokens of identical in-flight
    /// requests it took over.
    tokens: Vec<CancellationToken>,
}

impl Registered {
    fn cancel(&self) {
        for token in &self.tokens {
            token.cancel();
        }
    }
}

/// Coalesces a burst of submissions into one request.
#[derive(Debug)]
pub struct Debouncer {
    slot: Mutex<Slot>,
    next_generation: AtomicU64,
    parent: CancellationToken,
}

impl Debouncer {
    /// Create a scheduler whose requests are all canceled with `parent`.
    pub fn new(parent: CancellationToken) -> Self {
        Self { slot: Mutex::new(Slot::Idle), next_generation: AtomicU64::new(0), parent }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `query` as the latest submission, superseding any earlier one.
    pub fn submit(&self, query: &str, interval: Duration) -> Ticket<'_> {
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let key = cache_key(query);
        let token = self.parent.child_token();
        let mut tokens = vec![token.clone()];

        let mut slot = self.lock();
        match std::mem::replace(&mut *slot, Slot::Idle) {
            Slot::Idle => {}
            Slot::Pending(previous) => {
                tracing::debug!(superseded = %previous.key, query = %key, "debounce timer superseded");
                previous.cancel();
            }
            Slot::InFlight(previous) if previous.key == key => {
                tokens.extend(previous.tokens);
            }
            Slot::InFlight(previous) => {
                tracing::debug!(canceled = %previous.key, query = %key, "canceling in-flight search");
                previous.cancel();
            }
        }
        *slot = Slot::Pending(Registered { generation, key, tokens });

        Ticket { debouncer: self, generation, token, interval }
    }

    /// Record a newer query that is answered without a fetch.
    ///
    /// The pending timer is always canceled; the in-flight request is
    /// canceled only when its text differs from `query`.
    pub fn supersede(&self, query: &str) {
        let key = cache_key(query);
        let mut slot = self.lock();
        match std::mem::replace(&mut *slot, Slot::Idle) {
            Slot::Idle => {}
            Slot::Pending(previous) => {
                tracing::debug!(superseded = %previous.key, query = %key, "debounce timer superseded");
                previous.cancel();
            }
            Slot::InFlight(previous) if previous.key == key => {
                *slot = Slot::InFlight(previous);
            }
            Slot::InFlight(previous) => {
                tracing::debug!(canceled = %previous.key, query = %key, "canceling in-flight search");
                previous.cancel();
            }
        }
    }

    /// Cancel whatever is pending or in flight.
    pub fn cancel_all(&self) {
        let mut slot = self.lock();
        if let Slot::Pending(registered) | Slot::InFlight(registered) = std::mem::replace(&mut *slot, Slot::Idle) {
            registered.cancel();
        }
    }

    /// Whether nothing is pending or in flight.
    pub fn is_idle(&self) -> bool {
        matches!(*self.lock(), Slot::Idle)
    }

    /// Normalized text of the latest pending query, if its timer is running.
    pub fn pending_query(&self) -> Option<String> {
        match &*self.lock() {
            Slot::Pending(registered) => Some(registered.key.clone()),
            _ => None,
        }
    }

    fn fire(&self, generation: u64) -> bool {
        let mut slot = self.lock();
        match std::mem::replace(&mut *slot, Slot::Idle) {
            Slot::Pending(registered) if registered.generation == generation => {
                *slot = Slot::InFlight(registered);
                true
            }
            other => {
                *slot = other;
                false
            }
        }
    }

    fn release(&self, generation: u64, in_flight: bool) {
        let mut slot = self.lock();
        let owned = match &*slot {
            Slot::Pending(registered) => !in_flight && registered.generation == generation,
            Slot::InFlight(registered) => in_flight && registered.generation == generation,
            Slot::Idle => false,
        };
        if owned {
            *slot = Slot::Idle;
        }
    }
}

/// A submitted query waiting for its quiet period to elapse.
#[derive(Debug)]
pub struct Ticket<'a> {
    debouncer: &'a Debouncer,
    generation: u64,
    token: CancellationToken,
    interval: Duration,
}

impl<'a> Ticket<'a> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Wait out the quiet period.
    ///
    /// # Errors
    ///
    /// Returns `Error::Canceled` if a newer submission superseded this one or
    /// the scheduler was shut down.
    pub async fn settle(self) -> Result<InFlight<'a>, Error> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => return Err(Error::Canceled),
            _ = tokio::time::sleep(self.interval) => {}
        }

        if !self.debouncer.fire(self.generation) {
            return Err(Error::Canceled);
        }

        Ok(InFlight { debouncer: self.debouncer, generation: self.generation, token: self.token.clone() })
    }
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        self.debouncer.release(self.generation, false);
    }
}

/// A fired request; dropping it returns the scheduler to idle.
#[derive(Debug)]
pub struct InFlight<'a> {
    debouncer: &'a Debouncer,
    generation: u64,
    token: CancellationToken,
}

impl InFlight<'_> {
    /// Token canceled when a newer, different query arrives.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.debouncer.release(self.generation, true);
    }
}
