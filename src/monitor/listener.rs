//! Link listener trait for event-fed monitoring.
//!
//! This module provides the [`LinkListener`] trait that abstracts OS
//! mechanisms pushing a notification whenever a network link appears,
//! disappears or changes state.

use super::ListenerError;
use tokio_stream::Stream;

/// Trait for platform-specific link change notification sources.
///
/// Notifications carry no payload: each one only means "the interface set
/// may have changed", and the monitor answers it with a regular update
/// cycle. Event-fed and polled updates therefore share one reconciliation
/// path.
///
/// # One-time Semantics
///
/// The `into_stream` method consumes `self`, enforcing one-time use.
/// If the underlying source fails, callers should fall back to polling
/// rather than attempting to recreate the listener.
///
/// # Stream Items
///
/// The stream yields `Result<(), ListenerError>`:
/// - `Ok(())` - A link notification arrived; caller should run an update
/// - `Err(ListenerError)` - The listener failed; caller should degrade to polling
///
/// Dropping the stream releases the listener's OS resources.
///
/// # Example
///
/// ```ignore
/// use ifwatch::monitor::{LinkListener, ListenerError};
/// use tokio_stream::StreamExt;
///
/// async fn handle_events<L: LinkListener>(listener: L) {
///     let mut stream = listener.into_stream();
///     while let Some(result) = stream.next().await {
///         match result {
///             Ok(()) => println!("link change notification received"),
///             Err(e) => {
///                 eprintln!("Listener failed: {e}");
///                 break; // Fall back to polling
///             }
///         }
///     }
/// }
/// ```
pub trait LinkListener: Send {
    /// The stream type returned by `into_stream`.
    type Stream: Stream<Item = Result<(), ListenerError>> + Send + Unpin + 'static;

    /// Converts this listener into a notification stream.
    ///
    /// Consumes `self` to enforce one-time semantics.
    fn into_stream(self) -> Self::Stream;
}
