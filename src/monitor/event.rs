//! Interface change notifications.

use crate::network::InterfaceRecord;

/// A notification raised by one update cycle.
///
/// Events own their payload: the worker hands them over by value and moves
/// on without waiting for the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceEvent {
    /// A new interface appeared. Carries its freshly queried record.
    Added(InterfaceRecord),
    /// An interface disappeared. Carries its last known record.
    Removed(InterfaceRecord),
    /// A known interface flipped its active flag.
    StatusChanged {
        /// Interface name.
        name: String,
        /// The new active flag.
        active: bool,
    },
    /// Snapshot acquisition failed; the table has been cleared.
    UpdateFailed,
}

impl InterfaceEvent {
    /// Creates a status change event.
    #[must_use]
    pub fn status_changed(name: impl Into<String>, active: bool) -> Self {
        Self::StatusChanged {
            name: name.into(),
            active,
        }
    }

    /// Returns the interface this event is about, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Added(record) | Self::Removed(record) => Some(&record.name),
            Self::StatusChanged { name, .. } => Some(name),
            Self::UpdateFailed => None,
        }
    }

    /// Returns true if this is an addition.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    /// Returns true if this is a removal.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{HardwareAddress, InterfaceKind};

    fn record(name: &str) -> InterfaceRecord {
        InterfaceRecord::new(name, InterfaceKind::Ethernet, HardwareAddress::empty(), true)
    }

    #[test]
    fn name_of_each_variant() {
        assert_eq!(InterfaceEvent::Added(record("eth0")).name(), Some("eth0"));
        assert_eq!(InterfaceEvent::Removed(record("eth1")).name(), Some("eth1"));
        assert_eq!(
            InterfaceEvent::status_changed("wlan0", false).name(),
            Some("wlan0")
        );
        assert_eq!(InterfaceEvent::UpdateFailed.name(), None);
    }

    #[test]
    fn predicates() {
        assert!(InterfaceEvent::Added(record("eth0")).is_added());
        assert!(!InterfaceEvent::Added(record("eth0")).is_removed());
        assert!(InterfaceEvent::Removed(record("eth0")).is_removed());
        assert!(!InterfaceEvent::UpdateFailed.is_added());
    }
}
