//! Monitor layer for tracking network interfaces.
//!
//! This module provides types and functions for:
//! - Representing interface notifications ([`InterfaceEvent`])
//! - Keeping the authoritative interface table ([`InterfaceTable`], [`InterfaceManager`])
//! - Computing notifications between table and snapshot ([`reconcile`])
//! - Delivering notifications to the consumer ([`relay`])
//! - Scheduling updates by polling or link events ([`Monitor`], [`TriggerStream`])
//! - Link change notifications ([`LinkListener`], [`platform`])
//! - Error handling ([`MonitorError`], [`ListenerError`])

mod error;
mod event;
mod listener;
mod manager;
pub mod platform;
mod reconcile;
pub mod relay;
mod table;
mod trigger;
mod worker;

#[cfg(test)]
mod test_fixtures;

pub use error::{ListenerError, MonitorError};
pub use event::InterfaceEvent;
pub use listener::LinkListener;
pub use manager::InterfaceManager;
pub use reconcile::reconcile;
pub use relay::{EventInbox, EventRelay, InterfaceObserver};
pub use table::InterfaceTable;
pub use trigger::{NoLinkStream, Trigger, TriggerStream};
pub use worker::{DEFAULT_QUEUE_CAPACITY, Monitor, MonitorHandle};
