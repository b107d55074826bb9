//! Platform-specific link change listener implementations.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`LinkListener`](super::LinkListener) trait.
//!
//! # Platform Support
//!
//! - **Linux**: Subscribes to rtnetlink link messages via `netlink-sys`.

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::{NetlinkListener, NetlinkStream};

// Re-export platform-specific listener as PlatformListener for convenience
#[cfg(target_os = "linux")]
pub use linux::NetlinkListener as PlatformListener;
