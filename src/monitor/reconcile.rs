//! Reconciliation of a fresh snapshot against the known table.

use std::collections::HashSet;

use super::event::InterfaceEvent;
use super::table::InterfaceTable;
use crate::network::InterfaceRecord;

/// Merges `snapshot` into `table` and returns the resulting notifications.
///
/// This is a pure function: all backend queries have already happened and
/// `snapshot` holds fully populated records in enumeration order.
///
/// Events are produced in this order:
/// 1. [`InterfaceEvent::Removed`] for every known name absent from the
///    snapshot, in table (name) order, carrying the last known record.
/// 2. In snapshot order, [`InterfaceEvent::Added`] for every new name
///    (only when `announce_additions` is set), or
///    [`InterfaceEvent::StatusChanged`] for a known name whose active flag
///    flipped. A freshly added interface never also gets a status change.
///
/// A name listed more than once in `snapshot` is taken from its first
/// occurrence; later copies are ignored.
///
/// Type and address of known interfaces are refreshed silently.
///
/// # Arguments
///
/// * `table` - The known interfaces, updated in place
/// * `snapshot` - The freshly acquired records
/// * `announce_additions` - False for the first successful cycle after a reset,
///   whose population the consumer reads from the table directly
///
/// # Example
///
/// ```
/// use ifwatch::monitor::{InterfaceEvent, InterfaceTable, reconcile};
/// use ifwatch::network::{HardwareAddress, InterfaceKind, InterfaceRecord};
///
/// let eth0 = |active| {
///     InterfaceRecord::new("eth0", InterfaceKind::Ethernet, HardwareAddress::empty(), active)
/// };
///
/// let mut table = InterfaceTable::new();
/// assert!(reconcile(&mut table, vec![eth0(true)], false).is_empty());
///
/// let events = reconcile(&mut table, vec![eth0(false)], true);
/// assert_eq!(events, vec![InterfaceEvent::status_changed("eth0", false)]);
/// ```
#[must_use]
pub fn reconcile(
    table: &mut InterfaceTable,
    snapshot: Vec<InterfaceRecord>,
    announce_additions: bool,
) -> Vec<InterfaceEvent> {
    let present: HashSet<&str> = snapshot.iter().map(|r| r.name.as_str()).collect();
    let gone: Vec<String> = table
        .names()
        .filter(|name| !present.contains(name.as_str()))
        .cloned()
        .collect();

    let mut events = Vec::new();
    let mut merged: HashSet<String> = HashSet::with_capacity(snapshot.len());

    for name in gone {
        if let Some(record) = table.remove(&name) {
            events.push(InterfaceEvent::Removed(record));
        }
    }

    for fresh in snapshot {
        if !merged.insert(fresh.name.clone()) {
            continue;
        }

        match table.get_mut(&fresh.name) {
            Some(known) => {
                if let Some(event) = refresh(known, fresh) {
                    events.push(event);
                }
            }
            None => {
                if announce_additions {
                    events.push(InterfaceEvent::Added(fresh.clone()));
                }
                table.insert(fresh);
            }
        }
    }

    events
}

/// Updates a known record in place, returning a status change if the
/// active flag flipped.
fn refresh(known: &mut InterfaceRecord, fresh: InterfaceRecord) -> Option<InterfaceEvent> {
    known.kind = fresh.kind;
    known.hardware_address = fresh.hardware_address;

    if known.is_active == fresh.is_active {
        return None;
    }

    known.is_active = fresh.is_active;
    Some(InterfaceEvent::status_changed(
        known.name.clone(),
        fresh.is_active,
    ))
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
