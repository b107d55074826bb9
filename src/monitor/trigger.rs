//! Update triggers for the scheduler.
//!
//! This module provides [`TriggerStream`], a stream that tells the scheduler
//! when to run an update: on a fixed period, or whenever the link listener
//! reports a change.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior, interval};
use tokio_stream::{Pending, Stream};

use super::error::{ListenerError, MonitorError};

/// The reason an update was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Initial population in listening mode.
    Startup,
    /// Polling period elapsed.
    Interval,
    /// The link listener reported a change.
    LinkEvent,
}

impl Trigger {
    /// Returns a human-readable label for logging.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Interval => "polling interval",
            Self::LinkEvent => "link event",
        }
    }
}

/// Internal state of the trigger stream.
#[derive(Debug)]
enum TriggerState<S> {
    /// Listener-driven mode.
    Listening {
        /// The link notification stream.
        link_stream: S,
        /// Whether the startup trigger has been emitted.
        started: bool,
    },
    /// Interval-driven mode, either configured or after degradation.
    Polling,
}

/// What the current poll produced.
#[derive(Debug)]
enum Polled {
    Ready(Trigger),
    Degraded(Option<ListenerError>),
    Pending,
}

/// The stream type used when no listener is involved.
pub type NoLinkStream = Pending<Result<(), ListenerError>>;

/// A stream of update triggers.
///
/// The stream operates in two modes:
/// - **Polling**: yields [`Trigger::Interval`] every period, the first
///   one immediately
/// - **Listening**: yields [`Trigger::Startup`] once, then
///   [`Trigger::LinkEvent`] per listener notification
///
/// If the listener fails or ends, a listening stream degrades to polling
/// at the fallback period. Degradation is permanent for the lifetime of
/// this stream. The stream itself never ends.
///
/// The interval timer is created on first use, so a stream must be polled
/// from within a tokio runtime.
#[derive(Debug)]
pub struct TriggerStream<S = NoLinkStream> {
    state: TriggerState<S>,
    period: Duration,
    interval: Option<Interval>,
    degraded: bool,
}

impl TriggerStream {
    /// Creates a stream ticking every `period`.
    #[must_use]
    pub fn polling(period: Duration) -> Self {
        Self::polling_with(period)
    }
}

impl<S> TriggerStream<S>
where
    S: Stream<Item = Result<(), ListenerError>> + Unpin,
{
    /// Creates a polling stream whose type still names a link stream.
    pub(crate) const fn polling_with(period: Duration) -> Self {
        Self {
            state: TriggerState::Polling,
            period,
            interval: None,
            degraded: false,
        }
    }

    /// Creates a stream driven by `link_stream`, falling back to polling
    /// every `fallback_period` if it fails.
    #[must_use]
    pub const fn listening(link_stream: S, fallback_period: Duration) -> Self {
        Self {
            state: TriggerState::Listening {
                link_stream,
                started: false,
            },
            period: fallback_period,
            interval: None,
            degraded: false,
        }
    }

    /// Returns true if a listening stream has fallen back to polling.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Returns true if the stream is currently interval-driven.
    #[must_use]
    pub const fn is_polling(&self) -> bool {
        matches!(self.state, TriggerState::Polling)
    }

    /// Transitions to polling mode, dropping the failed link stream.
    fn degrade_to_polling(&mut self, cause: Option<ListenerError>) {
        let cause = MonitorError::ListenerFailed(cause.unwrap_or(ListenerError::Stopped));
        tracing::warn!(
            "{cause}; falling back to polling every {:?}",
            self.period
        );
        self.state = TriggerState::Polling;
        self.degraded = true;
    }

    fn poll_interval(&mut self, cx: &mut Context<'_>) -> Polled {
        let period = self.period;
        let timer = self.interval.get_or_insert_with(|| {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            timer
        });
        if timer.poll_tick(cx).is_ready() {
            Polled::Ready(Trigger::Interval)
        } else {
            Polled::Pending
        }
    }
}

impl<S> Stream for TriggerStream<S>
where
    S: Stream<Item = Result<(), ListenerError>> + Unpin,
{
    type Item = Trigger;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            let polled = match &mut this.state {
                TriggerState::Listening {
                    link_stream,
                    started,
                } => {
                    if *started {
                        match Pin::new(link_stream).poll_next(cx) {
                            Poll::Ready(Some(Ok(()))) => Polled::Ready(Trigger::LinkEvent),
                            Poll::Ready(Some(Err(e))) => Polled::Degraded(Some(e)),
                            Poll::Ready(None) => Polled::Degraded(None),
                            Poll::Pending => Polled::Pending,
                        }
                    } else {
                        *started = true;
                        Polled::Ready(Trigger::Startup)
                    }
                }
                TriggerState::Polling => this.poll_interval(cx),
            };

            match polled {
                Polled::Ready(trigger) => return Poll::Ready(Some(trigger)),
                Polled::Pending => return Poll::Pending,
                // Continue loop to start the interval
                Polled::Degraded(cause) => this.degrade_to_polling(cause),
            }
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
