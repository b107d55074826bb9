//! Linux link change listener using a `NETLINK_ROUTE` socket.

use crate::monitor::{LinkListener, ListenerError};
use netlink_sys::{Socket, SocketAddr, protocols::NETLINK_ROUTE};
use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use std::io::{self, ErrorKind};
use std::os::fd::{AsRawFd, BorrowedFd};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::thread::JoinHandle;
use tokio::sync::mpsc as tokio_mpsc;
use tokio_stream::Stream;

/// Multicast group bitmask for link (`RTM_NEWLINK`/`RTM_DELLINK`) messages.
const RTMGRP_LINK: u32 = 0x0000_0001;

const RECV_BUFFER_SIZE: usize = 8192;

/// How long the reader thread waits for a datagram before checking the
/// stop flag again. Bounds how long dropping the stream takes.
const STOP_CHECK_MS: u16 = 100;

/// Linux implementation of [`LinkListener`] subscribed to rtnetlink link
/// messages.
///
/// Messages are not decoded. Every datagram the kernel delivers on the
/// link group counts as one notification, so a burst of changes may
/// produce several updates that find nothing new.
///
/// # Example
///
/// ```no_run
/// use ifwatch::monitor::LinkListener;
/// use ifwatch::monitor::platform::NetlinkListener;
/// use tokio_stream::StreamExt;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let listener = NetlinkListener::new()?;
/// let mut stream = listener.into_stream();
///
/// while let Some(result) = stream.next().await {
///     match result {
///         Ok(()) => println!("link changed"),
///         Err(e) => {
///             eprintln!("Listener error: {e}");
///             break;
///         }
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct NetlinkListener {
    socket: Socket,
}

impl NetlinkListener {
    /// Opens a netlink socket and joins the link multicast group.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Socket`] if the socket cannot be created,
    /// bound, or switched to non-blocking mode.
    pub fn new() -> Result<Self, ListenerError> {
        let mut socket = Socket::new(NETLINK_ROUTE)?;
        socket.bind(&SocketAddr::new(0, RTMGRP_LINK))?;
        socket.set_non_blocking(true)?;
        Ok(Self { socket })
    }
}

impl LinkListener for NetlinkListener {
    type Stream = NetlinkStream;

    fn into_stream(self) -> Self::Stream {
        NetlinkStream::spawn(self.socket)
    }
}

/// Stream of link change notifications read from a netlink socket.
///
/// A dedicated thread waits on the socket with `poll` and forwards one
/// `Ok(())` per datagram. Dropping the stream stops that thread and closes
/// the socket.
pub struct NetlinkStream {
    receiver: tokio_mpsc::UnboundedReceiver<Result<(), ListenerError>>,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
    terminated: bool,
}

impl std::fmt::Debug for NetlinkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetlinkStream")
            .field("terminated", &self.terminated)
            .field("has_reader", &self.reader.is_some())
            .finish_non_exhaustive()
    }
}

impl NetlinkStream {
    fn spawn(socket: Socket) -> Self {
        let (sender, receiver) = tokio_mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));

        let thread_stop = Arc::clone(&stop);
        let thread_sender = sender.clone();
        let reader = std::thread::Builder::new()
            .name("netlink-link".to_string())
            .spawn(move || read_loop(&socket, &thread_sender, &thread_stop));

        let reader = match reader {
            Ok(handle) => Some(handle),
            Err(e) => {
                let _ = sender.send(Err(ListenerError::Socket(e)));
                None
            }
        };

        Self {
            receiver,
            stop,
            reader,
            terminated: false,
        }
    }
}

/// Waits until the socket is readable or the stop check interval elapses.
///
/// Returns `Ok(false)` on timeout or signal interruption.
fn wait_readable(socket: &Socket) -> io::Result<bool> {
    // SAFETY: the descriptor is owned by `socket`, which outlives this borrow.
    let fd = unsafe { BorrowedFd::borrow_raw(socket.as_raw_fd()) };
    let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];

    match poll(&mut fds, PollTimeout::from(STOP_CHECK_MS)) {
        Ok(0) | Err(Errno::EINTR) => Ok(false),
        Ok(_) => Ok(true),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

fn read_loop(
    socket: &Socket,
    sender: &tokio_mpsc::UnboundedSender<Result<(), ListenerError>>,
    stop: &AtomicBool,
) {
    let mut buffer = Vec::with_capacity(RECV_BUFFER_SIZE);

    while !stop.load(Ordering::Relaxed) {
        match wait_readable(socket) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                let _ = sender.send(Err(ListenerError::Socket(e)));
                break;
            }
        }

        buffer.clear();
        let outcome = match socket.recv(&mut buffer, 0) {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                continue;
            }
            // Kernel dropped messages; something changed all the same
            Err(e) if e.raw_os_error() == Some(Errno::ENOBUFS as i32) => {
                tracing::debug!("Netlink receive buffer overrun");
                Ok(())
            }
            Err(e) => Err(ListenerError::Socket(e)),
        };

        let failed = outcome.is_err();
        if sender.send(outcome).is_err() || failed {
            break;
        }
    }

    tracing::debug!("Netlink reader exiting");
}

impl Stream for NetlinkStream {
    type Item = Result<(), ListenerError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.terminated {
            return Poll::Ready(None);
        }

        match self.receiver.poll_recv(cx) {
            Poll::Ready(Some(Ok(()))) => Poll::Ready(Some(Ok(()))),
            Poll::Ready(Some(Err(e))) => {
                self.terminated = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                // Reader thread is gone without reporting why
                self.terminated = true;
                Poll::Ready(Some(Err(ListenerError::Stopped)))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for NetlinkStream {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}
