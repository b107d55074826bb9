//! Application execution logic.
//!
//! This module contains the printer loop that starts the interface
//! monitor, prints the table periodically and prints every notification
//! as it arrives.

use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::signal;
use tokio::time::MissedTickBehavior;

use ifwatch::config::ValidatedConfig;
use ifwatch::monitor::platform::PlatformListener;
use ifwatch::monitor::{
    EventInbox, InterfaceEvent, InterfaceManager, Monitor, MonitorError, MonitorHandle, relay,
};
use ifwatch::network::filter::FilteredBackend;
use ifwatch::network::platform::PlatformBackend;
use ifwatch::network::{InitError, SnapshotBackend};
use ifwatch::output::Printer;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The interface backend could not be created.
    #[error("Failed to initialize interface backend: {0}")]
    BackendInit(#[source] InitError),

    /// Writing to stdout failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),

    /// The notification inbox closed while the monitor was running.
    #[error("Notification relay closed unexpectedly")]
    RelayClosed,
}

impl RunError {
    /// Returns true if the failure stems from the host setup rather than
    /// from running the monitor.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::BackendInit(_))
    }
}

/// Executes the main application loop.
///
/// This function:
/// 1. Creates the platform backend wrapped in the configured filters
/// 2. Runs one update synchronously and prints the table
/// 3. Starts the monitor (link listener or polling, based on config)
/// 4. Prints notifications and periodic tables until Ctrl+C or SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - The backend fails to initialize
/// - Writing to stdout fails
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - Platform-specific network APIs
/// - Real async runtime with signal handling
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let backend = PlatformBackend::new().map_err(RunError::BackendInit)?;
    let backend = FilteredBackend::new(backend, config.filter);

    let (relay, inbox) = relay::channel();
    let manager = Arc::new(InterfaceManager::new(backend, relay));
    let printer = Printer::new(io::stdout(), config.format);

    initial_update(&manager).await;

    if config.listen {
        match PlatformListener::new() {
            Ok(listener) => {
                let handle = Monitor::listening(manager, listener, config.update_interval).start();
                return print_loop(handle, inbox, printer, config.print_interval, shutdown_signal())
                    .await;
            }
            Err(e) => {
                let cause = MonitorError::ListenerFailed(e);
                tracing::warn!(
                    "{cause}; polling every {:?} instead",
                    config.update_interval
                );
            }
        }
    }

    let handle = Monitor::polling(manager, config.update_interval).start();
    print_loop(handle, inbox, printer, config.print_interval, shutdown_signal()).await
}

/// Populates the table before the monitor starts.
///
/// Failures are already logged by the manager; the monitor keeps retrying.
async fn initial_update<B: SnapshotBackend + 'static>(manager: &Arc<InterfaceManager<B>>) {
    let manager = Arc::clone(manager);
    match tokio::task::spawn_blocking(move || manager.update()).await {
        Ok(Ok(_)) => tracing::debug!("Initial interface table populated"),
        Ok(Err(_)) => {}
        Err(e) => tracing::error!("Initial update panicked: {e}"),
    }
}

/// Prints the table right away, then notifications as they arrive and the
/// whole table every `print_interval`, until `shutdown` completes.
///
/// The monitor is stopped before returning, whatever the outcome.
async fn print_loop<B, S, W>(
    handle: MonitorHandle<B, S>,
    mut inbox: EventInbox,
    mut printer: Printer<W>,
    print_interval: Duration,
    shutdown: impl Future<Output = ()>,
) -> Result<(), RunError>
where
    W: Write,
{
    let mut ticker = tokio::time::interval(print_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let outcome = loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping...");
                break Ok(());
            }

            event = inbox.recv() => {
                let Some(event) = event else {
                    break Err(RunError::RelayClosed);
                };
                if event == InterfaceEvent::UpdateFailed {
                    tracing::warn!("Interface update failed, table cleared until the next update");
                }
                if let Err(e) = printer.print_event(&event) {
                    break Err(RunError::Output(e));
                }
            }

            _ = ticker.tick() => {
                if let Err(e) = printer.print_table(&handle.interfaces()) {
                    break Err(RunError::Output(e));
                }
            }
        }
    };

    handle.stop().await;
    outcome
}

/// Returns a future that completes when a shutdown signal is received.
///
/// If a signal handler cannot be installed, that signal is ignored.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
