//! ifwatch: Network Interface Watcher
//!
//! A library for keeping an up-to-date table of the host's network
//! interfaces and notifying a consumer whenever an interface appears,
//! disappears, or changes its link state.

pub mod config;
pub mod monitor;
pub mod network;
pub mod output;
