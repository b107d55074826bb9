//! Shared test fixtures for monitor tests.

use crate::monitor::{LinkListener, ListenerError};
use crate::network::{
    AcquisitionError, HardwareAddress, InterfaceKind, LinkState, RawInterface, SnapshotBackend,
};
use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;

pub const ETHER: u32 = 1;
pub const LOOPBACK: u32 = 772;

/// One interface as the fake host reports it.
#[derive(Debug, Clone)]
pub struct FakeIface {
    pub name: String,
    pub type_code: u32,
    pub hardware_address: HardwareAddress,
    pub is_active: bool,
    pub fail_query: bool,
}

impl FakeIface {
    pub fn ethernet(name: &str, is_active: bool) -> Self {
        Self {
            name: name.to_string(),
            type_code: ETHER,
            hardware_address: HardwareAddress::from([0x52, 0x54, 0, 0, 0, 1]),
            is_active,
            fail_query: false,
        }
    }

    pub fn loopback() -> Self {
        Self {
            name: "lo".to_string(),
            type_code: LOOPBACK,
            hardware_address: HardwareAddress::empty(),
            is_active: true,
            fail_query: false,
        }
    }

    /// Marks this interface's link query as failing.
    pub fn failing(mut self) -> Self {
        self.fail_query = true;
        self
    }
}

/// Backend replaying a script of snapshots.
///
/// Each `fetch_raw_interfaces` consumes one step. When the script runs out,
/// the last successful snapshot is repeated.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<Vec<FakeIface>, AcquisitionError>>>,
    current: Mutex<Vec<FakeIface>>,
    fetches: AtomicUsize,
    queries: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<Vec<FakeIface>, AcquisitionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            current: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    /// Backend returning the same snapshot forever.
    pub fn constant(ifaces: Vec<FakeIface>) -> Self {
        Self::new(vec![Ok(ifaces)])
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl SnapshotBackend for ScriptedBackend {
    fn fetch_raw_interfaces(&self) -> Result<Vec<RawInterface>, AcquisitionError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let mut current = self.current.lock().unwrap();
        if let Some(step) = self.script.lock().unwrap().pop_front() {
            *current = step?;
        }
        Ok(current
            .iter()
            .map(|i| RawInterface::new(i.name.clone(), i.type_code))
            .collect())
    }

    fn classify_type(&self, type_code: u32) -> InterfaceKind {
        match type_code {
            ETHER => InterfaceKind::Ethernet,
            LOOPBACK => InterfaceKind::Loopback,
            _ => InterfaceKind::Unknown,
        }
    }

    fn query_link_state(
        &self,
        name: &str,
        _kind: InterfaceKind,
    ) -> Result<LinkState, AcquisitionError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let current = self.current.lock().unwrap();
        let iface = current
            .iter()
            .find(|i| i.name == name)
            .ok_or_else(|| AcquisitionError::io(format!("querying {name}"), io::ErrorKind::NotFound.into()))?;
        if iface.fail_query {
            return Err(AcquisitionError::io(
                format!("querying {name}"),
                io::Error::other("device vanished"),
            ));
        }
        Ok(LinkState::new(iface.hardware_address.clone(), iface.is_active))
    }
}

/// Convenience error for scripted failures.
pub fn enumeration_failure() -> AcquisitionError {
    AcquisitionError::Platform {
        message: "enumeration failed".to_string(),
    }
}

/// Link notification stream fed by a test-held sender.
///
/// Dropping the sender ends the stream.
pub struct MockLinkStream {
    receiver: mpsc::UnboundedReceiver<Result<(), ListenerError>>,
}

impl Stream for MockLinkStream {
    type Item = Result<(), ListenerError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Link listener whose notifications are pushed by the test.
pub struct MockLinkListener {
    receiver: mpsc::UnboundedReceiver<Result<(), ListenerError>>,
}

impl MockLinkListener {
    /// Returns the listener and the sender driving it.
    pub fn channel() -> (mpsc::UnboundedSender<Result<(), ListenerError>>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self { receiver })
    }
}

impl LinkListener for MockLinkListener {
    type Stream = MockLinkStream;

    fn into_stream(self) -> Self::Stream {
        MockLinkStream {
            receiver: self.receiver,
        }
    }
}
