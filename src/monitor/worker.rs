//! Update worker and scheduler.
//!
//! This module provides [`Monitor`], the builder that wires an
//! [`InterfaceManager`] to a trigger source, and [`MonitorHandle`], the
//! running instance.
//!
//! A started monitor runs two tasks:
//! - the **worker** receives work items from a bounded queue and runs each
//!   `update()` on the blocking pool, one at a time, in submission order
//! - the **scheduler** turns every [`Trigger`] into a work item without
//!   waiting for earlier ones to finish; when the queue is full the tick
//!   is dropped

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};

use super::error::{ListenerError, MonitorError};
use super::listener::LinkListener;
use super::manager::InterfaceManager;
use super::table::InterfaceTable;
use super::trigger::{NoLinkStream, Trigger, TriggerStream};
use crate::network::SnapshotBackend;

/// Capacity of the update queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

type Reply = oneshot::Sender<Result<usize, MonitorError>>;

/// One queued update request.
#[derive(Debug)]
struct WorkItem {
    origin: &'static str,
    reply: Option<Reply>,
}

impl WorkItem {
    const fn scheduled(trigger: Trigger) -> Self {
        Self {
            origin: trigger.label(),
            reply: None,
        }
    }

    const fn requested(reply: Reply) -> Self {
        Self {
            origin: "request",
            reply: Some(reply),
        }
    }
}

#[derive(Debug)]
enum TriggerSource<S> {
    Interval(Duration),
    Link { stream: S, fallback_period: Duration },
}

/// Builder for a running interface monitor.
///
/// # Type Parameters
///
/// * `B` - The [`SnapshotBackend`] the manager reads from
/// * `S` - The link notification stream (unused in polling mode)
///
/// # Example
///
/// ```ignore
/// use ifwatch::monitor::{InterfaceManager, Monitor, relay};
/// use ifwatch::network::platform::LinuxBackend;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let (relay, mut inbox) = relay::channel();
/// let manager = Arc::new(InterfaceManager::new(LinuxBackend::new()?, relay));
/// let handle = Monitor::polling(manager, Duration::from_millis(500)).start();
///
/// while let Some(event) = inbox.recv().await {
///     println!("{event:?}");
/// }
/// handle.stop().await;
/// ```
#[derive(Debug)]
pub struct Monitor<B, S = NoLinkStream> {
    manager: Arc<InterfaceManager<B>>,
    source: TriggerSource<S>,
}

impl<B> Monitor<B> {
    /// Creates a monitor that updates every `period`.
    #[must_use]
    pub const fn polling(manager: Arc<InterfaceManager<B>>, period: Duration) -> Self {
        Self {
            manager,
            source: TriggerSource::Interval(period),
        }
    }
}

impl<B, S> Monitor<B, S> {
    /// Creates a monitor that updates whenever `listener` reports a link
    /// change, after one initial update.
    ///
    /// If the listener fails, the monitor falls back to polling every
    /// `fallback_period`.
    #[must_use]
    pub fn listening<L>(
        manager: Arc<InterfaceManager<B>>,
        listener: L,
        fallback_period: Duration,
    ) -> Self
    where
        L: LinkListener<Stream = S>,
    {
        Self {
            manager,
            source: TriggerSource::Link {
                stream: listener.into_stream(),
                fallback_period,
            },
        }
    }

    /// Returns the manager this monitor drives.
    #[must_use]
    pub const fn manager(&self) -> &Arc<InterfaceManager<B>> {
        &self.manager
    }
}

impl<B, S> Monitor<B, S>
where
    B: SnapshotBackend + 'static,
    S: Stream<Item = Result<(), ListenerError>> + Send + Unpin + 'static,
{
    /// Spawns the worker and scheduler tasks.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(self) -> MonitorHandle<B, S> {
        let (work_tx, work_rx) = mpsc::channel(DEFAULT_QUEUE_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let triggers = match self.source {
            TriggerSource::Interval(period) => {
                tracing::info!("Monitor started, polling every {period:?}");
                TriggerStream::polling_with(period)
            }
            TriggerSource::Link {
                stream,
                fallback_period,
            } => {
                tracing::info!("Monitor started, listening for link events");
                TriggerStream::listening(stream, fallback_period)
            }
        };

        let worker = tokio::spawn(run_worker(
            Arc::clone(&self.manager),
            work_rx,
            shutdown_rx.clone(),
        ));
        let scheduler = tokio::spawn(run_scheduler(triggers, work_tx.clone(), shutdown_rx));

        MonitorHandle {
            manager: self.manager,
            work_tx,
            shutdown_tx,
            worker,
            scheduler,
        }
    }
}

/// A running monitor.
///
/// Dropping the handle without calling [`stop`](Self::stop) also shuts the
/// tasks down, but without waiting for them.
#[derive(Debug)]
pub struct MonitorHandle<B, S = NoLinkStream> {
    manager: Arc<InterfaceManager<B>>,
    work_tx: mpsc::Sender<WorkItem>,
    shutdown_tx: watch::Sender<bool>,
    worker: JoinHandle<()>,
    scheduler: JoinHandle<TriggerStream<S>>,
}

impl<B, S> MonitorHandle<B, S> {
    /// Queues an update behind any pending ones and waits for its outcome.
    ///
    /// Returns the number of notifications raised.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::Acquisition`] if the update failed
    /// - [`MonitorError::Stopped`] if the monitor stopped first
    pub async fn update_now(&self) -> Result<usize, MonitorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.work_tx
            .send(WorkItem::requested(reply_tx))
            .await
            .map_err(|_| MonitorError::Stopped)?;
        reply_rx.await.map_err(|_| MonitorError::Stopped)?
    }

    /// Returns the last committed interface table.
    #[must_use]
    pub fn interfaces(&self) -> Arc<InterfaceTable> {
        self.manager.interfaces()
    }

    /// Returns the manager this monitor drives.
    #[must_use]
    pub const fn manager(&self) -> &Arc<InterfaceManager<B>> {
        &self.manager
    }

    /// Stops the monitor.
    ///
    /// No update is scheduled after this is called. An update already
    /// running completes; queued ones are discarded and their callers see
    /// [`MonitorError::Stopped`]. The worker is joined before the scheduler,
    /// and the trigger source (with any listener resources) is released
    /// last.
    pub async fn stop(self) {
        let Self {
            work_tx,
            shutdown_tx,
            worker,
            scheduler,
            ..
        } = self;

        shutdown_tx.send_replace(true);
        drop(work_tx);

        if let Err(e) = worker.await {
            tracing::error!("Update worker terminated abnormally: {e}");
        }
        match scheduler.await {
            Ok(triggers) => drop(triggers),
            Err(e) => tracing::error!("Scheduler terminated abnormally: {e}"),
        }

        tracing::info!("Monitor stopped");
    }
}

async fn run_worker<B>(
    manager: Arc<InterfaceManager<B>>,
    mut work_rx: mpsc::Receiver<WorkItem>,
    mut shutdown: watch::Receiver<bool>,
) where
    B: SnapshotBackend + 'static,
{
    loop {
        let item = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            item = work_rx.recv() => match item {
                Some(item) => item,
                None => break,
            },
        };

        tracing::trace!("Running update triggered by {}", item.origin);
        let cycle = Arc::clone(&manager);
        let outcome = match tokio::task::spawn_blocking(move || cycle.update()).await {
            Ok(result) => result.map_err(MonitorError::from),
            Err(e) => {
                tracing::error!("Update cycle panicked: {e}");
                Err(MonitorError::Stopped)
            }
        };

        if let Some(reply) = item.reply {
            // The requester may have given up waiting
            let _ = reply.send(outcome);
        }
    }

    tracing::debug!("Update worker exiting");
}

async fn run_scheduler<S>(
    mut triggers: TriggerStream<S>,
    work_tx: mpsc::Sender<WorkItem>,
    mut shutdown: watch::Receiver<bool>,
) -> TriggerStream<S>
where
    S: Stream<Item = Result<(), ListenerError>> + Unpin,
{
    loop {
        let trigger = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            trigger = triggers.next() => match trigger {
                Some(trigger) => trigger,
                None => break,
            },
        };

        match work_tx.try_send(WorkItem::scheduled(trigger)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::debug!("Update queue full, dropping {} tick", trigger.label());
            }
            Err(TrySendError::Closed(_)) => break,
        }
    }

    tracing::debug!("Scheduler exiting");
    triggers
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
