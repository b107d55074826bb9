//! Core network types for interface representation.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Separator that distinguishes a sub-interface (e.g. an alias `eth0:1`)
/// from its physical parent.
pub const VIRTUAL_SEPARATOR: char = ':';

/// Returns the physical interface name behind an identity.
///
/// For `eth0:1` this is `eth0`; for a physical name it is the name itself.
#[must_use]
pub fn physical_name(name: &str) -> &str {
    name.split_once(VIRTUAL_SEPARATOR)
        .map_or(name, |(parent, _)| parent)
}

/// Platform-independent interface type classification.
///
/// Backends map their raw type codes onto this enum; anything they do not
/// recognise becomes [`InterfaceKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InterfaceKind {
    /// Ethernet-framed link.
    Ethernet,
    /// IP tunnel (IPIP, SIT, GRE, ...).
    Tunnel,
    /// Loopback interface.
    Loopback,
    /// Any other link type.
    Unknown,
}

impl InterfaceKind {
    /// Returns true if this is a loopback interface.
    #[must_use]
    pub const fn is_loopback(self) -> bool {
        matches!(self, Self::Loopback)
    }

    /// Returns true if this is a tunnel interface.
    #[must_use]
    pub const fn is_tunnel(self) -> bool {
        matches!(self, Self::Tunnel)
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ethernet => write!(f, "Ethernet"),
            Self::Tunnel => write!(f, "Tunnel"),
            Self::Loopback => write!(f, "Loopback"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Link-layer address of an interface.
///
/// Usually 6 bytes, but the length is whatever the platform reports
/// (tunnels expose 4 or 16 bytes, loopback nothing at all).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HardwareAddress(Vec<u8>);

impl HardwareAddress {
    /// Creates an address from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Creates an empty address.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Returns the raw address bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns true if no address is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<[u8; 6]> for HardwareAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Error returned when a hardware address string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hardware address '{0}'")]
pub struct ParseHardwareAddressError(pub String);

impl FromStr for HardwareAddress {
    type Err = ParseHardwareAddressError;

    /// Parses colon-separated hex octets (`aa:bb:cc:dd:ee:ff`).
    ///
    /// An empty (or whitespace-only) string yields an empty address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::empty());
        }

        trimmed
            .split(':')
            .map(|octet| {
                if octet.is_empty() || octet.len() > 2 {
                    return Err(ParseHardwareAddressError(s.to_string()));
                }
                u8::from_str_radix(octet, 16).map_err(|_| ParseHardwareAddressError(s.to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(Self)
    }
}

impl Serialize for HardwareAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A raw interface descriptor as enumerated by a backend.
///
/// Carries only what enumeration yields: the identity and the
/// platform-specific type code. Link state is queried separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInterface {
    /// Interface identity (e.g. `eth0`, `eth0:1`).
    pub name: String,
    /// Platform-specific link type code (ARPHRD value on Linux).
    pub type_code: u32,
}

impl RawInterface {
    /// Creates a new raw descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, type_code: u32) -> Self {
        Self {
            name: name.into(),
            type_code,
        }
    }
}

/// Result of a per-interface link query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkState {
    /// Link-layer address (may be empty for loopback or tunnels).
    pub hardware_address: HardwareAddress,
    /// True iff the interface is administratively up and operationally running.
    pub is_active: bool,
}

impl LinkState {
    /// Creates a new link state.
    #[must_use]
    pub const fn new(hardware_address: HardwareAddress, is_active: bool) -> Self {
        Self {
            hardware_address,
            is_active,
        }
    }
}

/// The last known state of one interface.
///
/// # Equality
///
/// Two records are equal if every field matches, including the active flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceRecord {
    /// Interface identity, unique within a table.
    pub name: String,
    /// Link-layer address.
    pub hardware_address: HardwareAddress,
    /// Platform-independent type.
    #[serde(rename = "type")]
    pub kind: InterfaceKind,
    /// True iff the interface is up and running.
    pub is_active: bool,
    /// True iff the identity names a sub-interface of a physical device.
    pub is_virtual: bool,
}

impl InterfaceRecord {
    /// Creates a record, deriving `is_virtual` from the name.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: InterfaceKind,
        hardware_address: HardwareAddress,
        is_active: bool,
    ) -> Self {
        let name = name.into();
        let is_virtual = name.contains(VIRTUAL_SEPARATOR);
        Self {
            name,
            hardware_address,
            kind,
            is_active,
            is_virtual,
        }
    }

    /// Builds a record from a raw descriptor's identity and a link query result.
    #[must_use]
    pub fn from_parts(name: impl Into<String>, kind: InterfaceKind, link: LinkState) -> Self {
        Self::new(name, kind, link.hardware_address, link.is_active)
    }

    /// Returns the name of the physical interface behind this record.
    #[must_use]
    pub fn physical_name(&self) -> &str {
        physical_name(&self.name)
    }
}
