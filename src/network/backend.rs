//! Snapshot backend trait and error types.

use std::io;

use super::{InterfaceKind, LinkState, RawInterface};
use thiserror::Error;

/// Error type for snapshot acquisition.
///
/// Any of these aborts the whole snapshot: a partially classified
/// interface list is never handed to the reconciler.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// An OS call or file read failed.
    #[error("I/O error while {context}: {source}")]
    Io {
        /// What was being read when the error occurred.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The data source answered, but with something unparseable.
    #[error("Malformed data while {context}: '{value}'")]
    Malformed {
        /// What was being parsed.
        context: String,
        /// The offending value.
        value: String,
    },

    /// Permission denied to access network information.
    #[error("Permission denied: {context}")]
    PermissionDenied {
        /// Additional context about what permission was denied.
        context: String,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

impl AcquisitionError {
    /// Wraps an I/O error, promoting permission failures to [`Self::PermissionDenied`].
    #[must_use]
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        let context = context.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { context }
        } else {
            Self::Io { context, source }
        }
    }

    /// Creates a [`Self::Malformed`] error.
    #[must_use]
    pub fn malformed(context: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Malformed {
            context: context.into(),
            value: value.into(),
        }
    }
}

impl From<io::Error> for AcquisitionError {
    fn from(source: io::Error) -> Self {
        Self::io("querying the operating system", source)
    }
}

/// Error returned when a backend cannot be constructed at all.
#[derive(Debug, Error)]
#[error("Failed to initialise interface backend: {reason}")]
pub struct InitError {
    /// Why initialisation failed.
    pub reason: String,
}

impl InitError {
    /// Creates a new initialisation error.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Capability for obtaining a point-in-time view of the host's interfaces.
///
/// # Design
///
/// - The synchronization core is written against this trait only; the
///   concrete backend is chosen and injected by the application
/// - Enables dependency injection for testing with mock implementations
/// - Platform-specific implementations provided in [`super::platform`]
///
/// # Example
///
/// ```ignore
/// use ifwatch::network::{AcquisitionError, InterfaceKind, LinkState, RawInterface, SnapshotBackend};
///
/// struct StaticBackend;
///
/// impl SnapshotBackend for StaticBackend {
///     fn fetch_raw_interfaces(&self) -> Result<Vec<RawInterface>, AcquisitionError> {
///         Ok(vec![RawInterface::new("eth0", 1)])
///     }
///
///     fn classify_type(&self, _type_code: u32) -> InterfaceKind {
///         InterfaceKind::Ethernet
///     }
///
///     fn query_link_state(&self, _name: &str, _kind: InterfaceKind) -> Result<LinkState, AcquisitionError> {
///         Ok(LinkState::new(Default::default(), true))
///     }
/// }
/// ```
pub trait SnapshotBackend: Send + Sync {
    /// Enumerates every interface currently visible to the OS.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError`] if the list cannot be read. The list is
    /// all-or-nothing; implementations never return a partial enumeration.
    ///
    /// # Implementation Notes
    ///
    /// - Each identity appears once, in a stable order
    /// - Virtual identities resolve their type code through the physical parent
    fn fetch_raw_interfaces(&self) -> Result<Vec<RawInterface>, AcquisitionError>;

    /// Maps a platform type code to an [`InterfaceKind`].
    ///
    /// Pure function; unrecognised codes map to [`InterfaceKind::Unknown`].
    fn classify_type(&self, type_code: u32) -> InterfaceKind;

    /// Queries the hardware address and running state of one interface.
    ///
    /// Callers pass the physical name; alias suffixes are stripped before
    /// this is called.
    ///
    /// # Errors
    ///
    /// Returns [`AcquisitionError`] if the interface cannot be queried.
    fn query_link_state(
        &self,
        name: &str,
        kind: InterfaceKind,
    ) -> Result<LinkState, AcquisitionError>;
}

impl<T: SnapshotBackend + ?Sized> SnapshotBackend for Box<T> {
    fn fetch_raw_interfaces(&self) -> Result<Vec<RawInterface>, AcquisitionError> {
        (**self).fetch_raw_interfaces()
    }

    fn classify_type(&self, type_code: u32) -> InterfaceKind {
        (**self).classify_type(type_code)
    }

    fn query_link_state(
        &self,
        name: &str,
        kind: InterfaceKind,
    ) -> Result<LinkState, AcquisitionError> {
        (**self).query_link_state(name, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::HardwareAddress;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A mock backend that returns predefined enumerations.
    ///
    /// Uses `Mutex<VecDeque>` to avoid requiring `Clone` on `AcquisitionError`.
    struct MockBackend {
        results: Mutex<VecDeque<Result<Vec<RawInterface>, AcquisitionError>>>,
    }

    impl MockBackend {
        fn new(results: Vec<Result<Vec<RawInterface>, AcquisitionError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
            }
        }
    }

    impl SnapshotBackend for MockBackend {
        fn fetch_raw_interfaces(&self) -> Result<Vec<RawInterface>, AcquisitionError> {
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(vec![]))
        }

        fn classify_type(&self, type_code: u32) -> InterfaceKind {
            if type_code == 1 {
                InterfaceKind::Ethernet
            } else {
                InterfaceKind::Unknown
            }
        }

        fn query_link_state(
            &self,
            _name: &str,
            _kind: InterfaceKind,
        ) -> Result<LinkState, AcquisitionError> {
            Ok(LinkState::new(HardwareAddress::empty(), true))
        }
    }

    #[test]
    fn boxed_backend_delegates() {
        let backend: Box<dyn SnapshotBackend> =
            Box::new(MockBackend::new(vec![Ok(vec![RawInterface::new("eth0", 1)])]));

        let raw = backend.fetch_raw_interfaces().unwrap();

        assert_eq!(raw, vec![RawInterface::new("eth0", 1)]);
        assert_eq!(backend.classify_type(1), InterfaceKind::Ethernet);
        assert_eq!(backend.classify_type(42), InterfaceKind::Unknown);
        assert!(
            backend
                .query_link_state("eth0", InterfaceKind::Ethernet)
                .unwrap()
                .is_active
        );
    }

    #[test]
    fn mock_backend_can_return_errors() {
        let backend = MockBackend::new(vec![Err(AcquisitionError::Platform {
            message: "test error".to_string(),
        })]);

        let error = backend.fetch_raw_interfaces().unwrap_err();

        assert!(error.to_string().contains("test error"));
    }

    #[test]
    fn io_error_with_permission_kind_becomes_permission_denied() {
        let source = io::Error::from(io::ErrorKind::PermissionDenied);
        let error = AcquisitionError::io("reading /sys/class/net/eth0/type", source);

        assert!(matches!(error, AcquisitionError::PermissionDenied { .. }));
        assert!(error.to_string().contains("/sys/class/net/eth0/type"));
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error as _;

        let source = io::Error::new(io::ErrorKind::NotFound, "gone");
        let error = AcquisitionError::io("reading flags", source);

        assert!(matches!(error, AcquisitionError::Io { .. }));
        assert!(error.source().unwrap().to_string().contains("gone"));
    }

    #[test]
    fn malformed_displays_value() {
        let error = AcquisitionError::malformed("parsing type code", "banana");
        assert!(error.to_string().contains("banana"));
        assert!(error.to_string().contains("parsing type code"));
    }

    #[test]
    fn init_error_displays_reason() {
        let error = InitError::new("sysfs not mounted");
        assert!(error.to_string().contains("sysfs not mounted"));
    }
}
