//! Interface filtering for selective monitoring.
//!
//! This module provides traits and types for filtering network interfaces
//! based on various criteria (name patterns, interface kind).
//!
//! # Design
//!
//! - **Pure Matchers**: [`KindFilter`] and [`NameRegexFilter`] only answer
//!   "does this interface match?" without include/exclude semantics.
//! - **Filter Chain**: [`FilterChain`] combines matchers with correct semantics:
//!   - Exclude filters: AND logic (must pass ALL excludes)
//!   - Include filters: OR logic (pass ANY include, empty = match all)
//! - **Decorator**: [`FilteredBackend`] applies filtering transparently
//!   to any [`SnapshotBackend`] implementation, before any per-interface query.

use std::collections::HashSet;

use regex::Regex;

use super::{AcquisitionError, InterfaceKind, LinkState, RawInterface, SnapshotBackend};

/// Trait for filtering network interfaces.
///
/// Filters see the identity and the classified kind, which is everything
/// known about an interface before its link state is queried.
pub trait InterfaceFilter: Send + Sync {
    /// Returns `true` if the interface matches this filter.
    fn matches(&self, name: &str, kind: InterfaceKind) -> bool;
}

/// Filters interfaces by their kind (pure matcher).
///
/// # Examples
///
/// ```
/// use ifwatch::network::filter::{InterfaceFilter, KindFilter};
/// use ifwatch::network::InterfaceKind;
///
/// let filter = KindFilter::new([InterfaceKind::Loopback]);
///
/// assert!(filter.matches("lo", InterfaceKind::Loopback));
/// assert!(!filter.matches("eth0", InterfaceKind::Ethernet));
/// ```
#[derive(Debug, Clone)]
pub struct KindFilter {
    kinds: HashSet<InterfaceKind>,
}

impl KindFilter {
    /// Creates a kind filter matching any of the specified kinds.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = InterfaceKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Returns true if no kinds are configured (matches nothing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl InterfaceFilter for KindFilter {
    fn matches(&self, _name: &str, kind: InterfaceKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Filters interfaces by name pattern (pure matcher).
///
/// # Examples
///
/// ```
/// use ifwatch::network::filter::{InterfaceFilter, NameRegexFilter};
/// use ifwatch::network::InterfaceKind;
///
/// let filter = NameRegexFilter::new(r"^eth").unwrap();
///
/// assert!(filter.matches("eth0", InterfaceKind::Ethernet));
/// assert!(!filter.matches("wlan0", InterfaceKind::Ethernet));
/// ```
#[derive(Debug)]
pub struct NameRegexFilter {
    pattern: Regex,
}

impl NameRegexFilter {
    /// Creates a name filter with the given regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns a reference to the regex pattern.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Regex is not a const type
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl InterfaceFilter for NameRegexFilter {
    fn matches(&self, name: &str, _kind: InterfaceKind) -> bool {
        self.pattern.is_match(name)
    }
}

/// Filter chain with include/exclude semantics.
///
/// Evaluation order:
/// 1. **Exclude filters (AND)**: Any match → reject.
/// 2. **Include filters (OR)**: Any match → accept. Empty includes = match all.
///
/// # Examples
///
/// ```
/// use ifwatch::network::filter::{FilterChain, InterfaceFilter, KindFilter, NameRegexFilter};
/// use ifwatch::network::InterfaceKind;
///
/// let chain = FilterChain::new()
///     .exclude(KindFilter::new([InterfaceKind::Loopback]))
///     .include(NameRegexFilter::new("^eth").unwrap());
///
/// assert!(chain.matches("eth0", InterfaceKind::Ethernet));
/// assert!(!chain.matches("tun0", InterfaceKind::Tunnel));
/// assert!(!chain.matches("lo", InterfaceKind::Loopback));
/// ```
#[derive(Default)]
pub struct FilterChain {
    includes: Vec<Box<dyn InterfaceFilter>>,
    excludes: Vec<Box<dyn InterfaceFilter>>,
}

impl FilterChain {
    /// Creates an empty filter chain (matches all interfaces).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an include filter (OR semantics).
    #[must_use]
    pub fn include<F: InterfaceFilter + 'static>(mut self, filter: F) -> Self {
        self.includes.push(Box::new(filter));
        self
    }

    /// Adds an exclude filter (AND semantics - must not match ANY).
    #[must_use]
    pub fn exclude<F: InterfaceFilter + 'static>(mut self, filter: F) -> Self {
        self.excludes.push(Box::new(filter));
        self
    }

    /// Returns the number of include filters.
    #[must_use]
    pub fn include_count(&self) -> usize {
        self.includes.len()
    }

    /// Returns the number of exclude filters.
    #[must_use]
    pub fn exclude_count(&self) -> usize {
        self.excludes.len()
    }

    /// Returns true if no filters are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}

impl InterfaceFilter for FilterChain {
    fn matches(&self, name: &str, kind: InterfaceKind) -> bool {
        if self.excludes.iter().any(|f| f.matches(name, kind)) {
            return false;
        }

        self.includes.is_empty() || self.includes.iter().any(|f| f.matches(name, kind))
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("include_count", &self.includes.len())
            .field("exclude_count", &self.excludes.len())
            .finish()
    }
}

/// A backend decorator that drops filtered interfaces at enumeration time.
///
/// Filtered interfaces are never queried for link state, so a broken
/// interface that is filtered out cannot fail a snapshot.
///
/// # Examples
///
/// ```ignore
/// use ifwatch::network::filter::{FilteredBackend, FilterChain, KindFilter};
/// use ifwatch::network::platform::LinuxBackend;
/// use ifwatch::network::InterfaceKind;
///
/// let chain = FilterChain::new().exclude(KindFilter::new([InterfaceKind::Loopback]));
/// let backend = FilteredBackend::new(LinuxBackend::new()?, chain);
/// ```
#[derive(Debug)]
pub struct FilteredBackend<B, F> {
    inner: B,
    filter: F,
}

impl<B, F> FilteredBackend<B, F> {
    /// Creates a new filtered backend.
    #[must_use]
    pub const fn new(inner: B, filter: F) -> Self {
        Self { inner, filter }
    }

    /// Returns a reference to the inner backend.
    pub const fn inner(&self) -> &B {
        &self.inner
    }

    /// Returns a reference to the filter.
    pub const fn filter(&self) -> &F {
        &self.filter
    }
}

impl<B: SnapshotBackend, F: InterfaceFilter> SnapshotBackend for FilteredBackend<B, F> {
    fn fetch_raw_interfaces(&self) -> Result<Vec<RawInterface>, AcquisitionError> {
        let raw = self.inner.fetch_raw_interfaces()?;
        Ok(raw
            .into_iter()
            .filter(|iface| {
                self.filter
                    .matches(&iface.name, self.inner.classify_type(iface.type_code))
            })
            .collect())
    }

    fn classify_type(&self, type_code: u32) -> InterfaceKind {
        self.inner.classify_type(type_code)
    }

    fn query_link_state(
        &self,
        name: &str,
        kind: InterfaceKind,
    ) -> Result<LinkState, AcquisitionError> {
        self.inner.query_link_state(name, kind)
    }
}

// Blanket implementation: any &T where T: InterfaceFilter also implements InterfaceFilter
impl<T: InterfaceFilter + ?Sized> InterfaceFilter for &T {
    fn matches(&self, name: &str, kind: InterfaceKind) -> bool {
        (*self).matches(name, kind)
    }
}

impl InterfaceFilter for Box<dyn InterfaceFilter> {
    fn matches(&self, name: &str, kind: InterfaceKind) -> bool {
        self.as_ref().matches(name, kind)
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
