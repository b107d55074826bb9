//! Platform-specific snapshot backend implementations.
//!
//! This module provides conditional compilation for platform-specific
//! implementations of the [`SnapshotBackend`](super::SnapshotBackend) trait.
//!
//! # Platform Support
//!
//! - **Linux**: `getifaddrs` for enumeration, sysfs for link attributes.

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::{DEFAULT_SYSFS_ROOT, LinuxBackend};

// Re-export the platform backend as PlatformBackend for convenience
#[cfg(target_os = "linux")]
pub use linux::LinuxBackend as PlatformBackend;
