//! Linux interface snapshots using `getifaddrs` and sysfs.

use std::collections::HashSet;
use std::ffi::c_int;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use nix::net::if_::InterfaceFlags;

use crate::network::{
    AcquisitionError, HardwareAddress, InitError, InterfaceKind, LinkState, RawInterface,
    SnapshotBackend, physical_name,
};

/// Default location of the per-interface sysfs directories.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/net";

/// Link type codes from `<linux/if_arp.h>`.
/// Not all of them are exported by `nix`, so they are spelled out here.
const ARPHRD_ETHER: u32 = 1;
const ARPHRD_TUNNEL: u32 = 768;
const ARPHRD_TUNNEL6: u32 = 769;
const ARPHRD_LOOPBACK: u32 = 772;
const ARPHRD_SIT: u32 = 776;
const ARPHRD_IPGRE: u32 = 778;

/// Linux implementation of [`SnapshotBackend`].
///
/// Interface identities come from `getifaddrs`, which also lists address
/// aliases such as `eth0:1`. Everything else is read from sysfs under the
/// physical parent's directory.
///
/// # Example
///
/// ```no_run
/// use ifwatch::network::SnapshotBackend;
/// use ifwatch::network::platform::LinuxBackend;
///
/// let backend = LinuxBackend::new().expect("sysfs not available");
/// for raw in backend.fetch_raw_interfaces().expect("enumeration failed") {
///     println!("{} ({})", raw.name, backend.classify_type(raw.type_code));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct LinuxBackend {
    sysfs_root: PathBuf,
}

impl LinuxBackend {
    /// Creates a backend reading from `/sys/class/net`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if sysfs is not mounted.
    pub fn new() -> Result<Self, InitError> {
        Self::with_sysfs_root(DEFAULT_SYSFS_ROOT)
    }

    /// Creates a backend reading interface attributes below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if `root` is not a directory.
    pub fn with_sysfs_root(root: impl Into<PathBuf>) -> Result<Self, InitError> {
        let sysfs_root = root.into();
        if !sysfs_root.is_dir() {
            return Err(InitError::new(format!(
                "{} is not a directory",
                sysfs_root.display()
            )));
        }
        Ok(Self { sysfs_root })
    }

    /// Returns the sysfs directory this backend reads from.
    #[must_use]
    pub fn sysfs_root(&self) -> &Path {
        &self.sysfs_root
    }

    /// Turns enumerated identities into raw descriptors.
    ///
    /// Duplicates are dropped keeping first-seen order; `getifaddrs` yields
    /// one entry per address family.
    fn describe<I>(&self, names: I) -> Result<Vec<RawInterface>, AcquisitionError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let mut raw = Vec::new();

        for name in names {
            if !seen.insert(name.clone()) {
                continue;
            }
            let type_code = self.read_type_code(physical_name(&name))?;
            raw.push(RawInterface::new(name, type_code));
        }

        Ok(raw)
    }

    fn read_attribute(&self, name: &str, attribute: &str) -> Result<String, AcquisitionError> {
        let path = self.sysfs_root.join(name).join(attribute);
        fs::read_to_string(&path)
            .map(|text| text.trim().to_string())
            .map_err(|e| AcquisitionError::io(format!("reading {}", path.display()), e))
    }

    fn read_type_code(&self, name: &str) -> Result<u32, AcquisitionError> {
        let text = self.read_attribute(name, "type")?;
        text.parse()
            .map_err(|_| AcquisitionError::malformed(format!("parsing type of {name}"), text))
    }

    fn read_flags(&self, name: &str) -> Result<InterfaceFlags, AcquisitionError> {
        let text = self.read_attribute(name, "flags")?;
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(&text);
        let bits = c_int::from_str_radix(digits, 16)
            .map_err(|_| AcquisitionError::malformed(format!("parsing flags of {name}"), &text))?;
        Ok(InterfaceFlags::from_bits_truncate(bits))
    }

    fn read_is_running(&self, name: &str) -> Result<bool, AcquisitionError> {
        let operstate = self.read_attribute(name, "operstate")?;
        Ok(operstate_is_running(&operstate))
    }

    fn read_hardware_address(&self, name: &str) -> Result<HardwareAddress, AcquisitionError> {
        let text = self.read_attribute(name, "address")?;
        text.parse().map_err(|_| {
            AcquisitionError::malformed(format!("parsing hardware address of {name}"), text)
        })
    }
}

impl SnapshotBackend for LinuxBackend {
    fn fetch_raw_interfaces(&self) -> Result<Vec<RawInterface>, AcquisitionError> {
        let addrs = nix::ifaddrs::getifaddrs()
            .map_err(|errno| AcquisitionError::io("enumerating interfaces", io::Error::from(errno)))?;
        self.describe(addrs.map(|ifaddr| ifaddr.interface_name))
    }

    fn classify_type(&self, type_code: u32) -> InterfaceKind {
        classify_arphrd(type_code)
    }

    fn query_link_state(
        &self,
        name: &str,
        kind: InterfaceKind,
    ) -> Result<LinkState, AcquisitionError> {
        let flags = self.read_flags(name)?;
        let is_active = flags.contains(InterfaceFlags::IFF_UP) && self.read_is_running(name)?;

        let hardware_address = if kind.is_loopback() {
            HardwareAddress::empty()
        } else {
            self.read_hardware_address(name)?
        };

        Ok(LinkState::new(hardware_address, is_active))
    }
}

/// Maps Linux `ARPHRD_*` codes to [`InterfaceKind`].
const fn classify_arphrd(type_code: u32) -> InterfaceKind {
    match type_code {
        ARPHRD_ETHER => InterfaceKind::Ethernet,
        ARPHRD_TUNNEL | ARPHRD_TUNNEL6 | ARPHRD_SIT | ARPHRD_IPGRE => InterfaceKind::Tunnel,
        ARPHRD_LOOPBACK => InterfaceKind::Loopback,
        _ => InterfaceKind::Unknown,
    }
}

/// Mirrors the kernel's `IFF_RUNNING` rule: drivers without carrier
/// reporting stay in `unknown`, which counts as running.
fn operstate_is_running(operstate: &str) -> bool {
    matches!(operstate, "up" | "unknown")
}
