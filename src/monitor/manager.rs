//! The interface-state synchronization core.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::event::InterfaceEvent;
use super::reconcile::reconcile;
use super::relay::EventRelay;
use super::table::InterfaceTable;
use crate::network::{AcquisitionError, InterfaceRecord, SnapshotBackend, physical_name};

/// Keeps the canonical [`InterfaceTable`] in sync with a [`SnapshotBackend`].
///
/// # Concurrency
///
/// - `update()` calls are serialized by a cycle lock held for the whole
///   cycle, backend I/O included
/// - The committed table sits behind a separate guard that is only held to
///   swap in a new `Arc` or clone the current one out, never across I/O
/// - Notifications of one cycle are posted before the cycle lock is
///   released, so cycles never interleave on the relay
///
/// # State
///
/// The manager starts FRESH: the first successful update populates the
/// table without announcing additions. Any failure clears the table and
/// returns to FRESH.
#[derive(Debug)]
pub struct InterfaceManager<B> {
    backend: B,
    relay: EventRelay,
    cycle: Mutex<()>,
    fresh: AtomicBool,
    table: Mutex<Arc<InterfaceTable>>,
}

impl<B: SnapshotBackend> InterfaceManager<B> {
    /// Creates a FRESH manager with an empty table.
    #[must_use]
    pub fn new(backend: B, relay: EventRelay) -> Self {
        Self {
            backend,
            relay,
            cycle: Mutex::new(()),
            fresh: AtomicBool::new(true),
            table: Mutex::new(Arc::new(InterfaceTable::new())),
        }
    }

    /// Runs one acquisition and reconciliation cycle.
    ///
    /// Blocks for the duration of the backend queries; call it from a
    /// blocking-capable context.
    ///
    /// Returns the number of notifications raised.
    ///
    /// # Errors
    ///
    /// Returns the [`AcquisitionError`] that aborted the snapshot. By then
    /// the table has been cleared, the manager is FRESH again and an
    /// [`InterfaceEvent::UpdateFailed`] has been posted.
    pub fn update(&self) -> Result<usize, AcquisitionError> {
        let _cycle = self.cycle.lock().unwrap_or_else(PoisonError::into_inner);
        let fresh = self.fresh.load(Ordering::Acquire);

        match self.acquire() {
            Ok(snapshot) => {
                let mut next = InterfaceTable::clone(&self.interfaces());
                let events = reconcile(&mut next, snapshot, !fresh);
                let size = next.len();

                self.commit(next);
                self.fresh.store(false, Ordering::Release);

                tracing::debug!(
                    "Update cycle complete: {} interface(s), {} notification(s){}",
                    size,
                    events.len(),
                    if fresh { " (initial population)" } else { "" }
                );

                let count = events.len();
                self.relay.post_all(events);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Update cycle failed, clearing interface table: {e}");

                self.commit(InterfaceTable::new());
                self.fresh.store(true, Ordering::Release);
                self.relay.post(InterfaceEvent::UpdateFailed);
                Err(e)
            }
        }
    }

    /// Takes a complete snapshot. Any failure aborts the whole snapshot.
    fn acquire(&self) -> Result<Vec<InterfaceRecord>, AcquisitionError> {
        self.backend
            .fetch_raw_interfaces()?
            .into_iter()
            .map(|raw| {
                let kind = self.backend.classify_type(raw.type_code);
                let link = self
                    .backend
                    .query_link_state(physical_name(&raw.name), kind)?;
                Ok(InterfaceRecord::from_parts(raw.name, kind, link))
            })
            .collect()
    }
}

impl<B> InterfaceManager<B> {
    /// Returns the last committed table.
    ///
    /// The returned snapshot is immutable and never reflects a cycle in
    /// progress.
    #[must_use]
    pub fn interfaces(&self) -> Arc<InterfaceTable> {
        Arc::clone(&self.table.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns true until the first successful update after construction
    /// or after a failure.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.fresh.load(Ordering::Acquire)
    }

    /// Returns a reference to the backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    fn commit(&self, table: InterfaceTable) {
        *self.table.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
