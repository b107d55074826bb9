//! Network layer for acquiring and representing interface information.
//!
//! This module provides types and traits for:
//! - Representing interface state ([`InterfaceRecord`], [`HardwareAddress`])
//! - Interface type classification ([`InterfaceKind`])
//! - Acquiring snapshots through a pluggable backend ([`SnapshotBackend`])
//! - Name and kind filtering ([`filter`])
//! - Platform-specific implementations ([`platform`])

mod backend;
pub mod filter;
mod interface;
pub mod platform;

pub use backend::{AcquisitionError, InitError, SnapshotBackend};
pub use interface::{
    HardwareAddress, InterfaceKind, InterfaceRecord, LinkState, ParseHardwareAddressError,
    RawInterface, VIRTUAL_SEPARATOR, physical_name,
};
