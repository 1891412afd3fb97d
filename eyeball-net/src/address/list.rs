use super::{AddrKind, NetAddr};
use std::fmt;
use std::net::IpAddr;

/// An ordered collection of [`NetAddr`] values which all share the same [`AddrKind`].
///
/// The order is significant: it reflects the preference of the caller or
/// resolver and address filters rely on it to break ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrList {
    kind: AddrKind,
    addrs: Vec<NetAddr>,
}

impl AddrList {
    /// Create a new empty [`AddrList`] for addresses of the given kind.
    #[must_use]
    pub const fn new(kind: AddrKind) -> Self {
        Self {
            kind,
            addrs: Vec::new(),
        }
    }

    /// Create a new empty [`AddrList`] with the same kind as `self`.
    #[must_use]
    pub fn new_like(&self) -> Self {
        Self {
            kind: self.kind,
            addrs: Vec::with_capacity(self.addrs.len()),
        }
    }

    /// Create an [`AddrList`] from the given addresses.
    ///
    /// Fails if not all addresses are of the given kind.
    pub fn from_addrs(
        kind: AddrKind,
        addrs: impl IntoIterator<Item = NetAddr>,
    ) -> Result<Self, AddrKindMismatch> {
        let mut list = Self::new(kind);
        for addr in addrs {
            list.push(addr)?;
        }
        Ok(list)
    }

    /// The kind shared by all addresses in this list.
    #[must_use]
    pub const fn kind(&self) -> AddrKind {
        self.kind
    }

    /// The number of addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// Returns `true` if the list contains no addresses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// The address at index `i`.
    #[must_use]
    pub fn addr(&self, i: usize) -> Option<&NetAddr> {
        self.addrs.get(i)
    }

    /// The IP address at index `i`,
    /// `None` if out of bounds or if the address carries no IP.
    #[must_use]
    pub fn ip(&self, i: usize) -> Option<IpAddr> {
        self.addrs.get(i).and_then(NetAddr::ip)
    }

    /// The IP address of each element, in order.
    #[must_use]
    pub fn ips(&self) -> Vec<Option<IpAddr>> {
        self.addrs.iter().map(NetAddr::ip).collect()
    }

    /// Append an address, which has to be of the same kind as the list.
    pub fn push(&mut self, addr: NetAddr) -> Result<(), AddrKindMismatch> {
        if addr.kind() != self.kind {
            return Err(AddrKindMismatch {
                expected: self.kind,
                found: addr.kind(),
            });
        }
        self.addrs.push(addr);
        Ok(())
    }

    /// Append the element at index `i` of `src` to this list.
    ///
    /// Does nothing if `i` is out of bounds or the kinds differ.
    pub fn append_from(&mut self, src: &Self, i: usize) {
        if src.kind == self.kind
            && let Some(addr) = src.addrs.get(i)
        {
            self.addrs.push(addr.clone());
        }
    }

    /// A new list holding the elements at the given indices, in that order.
    ///
    /// Out of bound indices are skipped.
    #[must_use]
    pub fn select(&self, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut list = self.new_like();
        for i in indices {
            list.append_from(self, i);
        }
        list
    }

    /// Swap the elements at index `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` are out of bounds.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.addrs.swap(i, j);
    }

    /// The addresses as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[NetAddr] {
        &self.addrs
    }

    /// Iterate over the addresses.
    pub fn iter(&self) -> std::slice::Iter<'_, NetAddr> {
        self.addrs.iter()
    }
}

impl<'a> IntoIterator for &'a AddrList {
    type Item = &'a NetAddr;
    type IntoIter = std::slice::Iter<'a, NetAddr>;

    fn into_iter(self) -> Self::IntoIter {
        self.addrs.iter()
    }
}

impl IntoIterator for AddrList {
    type Item = NetAddr;
    type IntoIter = std::vec::IntoIter<NetAddr>;

    fn into_iter(self) -> Self::IntoIter {
        self.addrs.into_iter()
    }
}

impl fmt::Display for AddrList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, addr) in self.addrs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            addr.fmt(f)?;
        }
        f.write_str("]")
    }
}

/// Error returned when adding an address of the wrong kind to an [`AddrList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddrKindMismatch {
    expected: AddrKind,
    found: AddrKind,
}

impl AddrKindMismatch {
    /// Create a new [`AddrKindMismatch`].
    #[must_use]
    pub const fn new(expected: AddrKind, found: AddrKind) -> Self {
        Self { expected, found }
    }

    /// The kind that was expected.
    #[must_use]
    pub const fn expected(&self) -> AddrKind {
        self.expected
    }

    /// The kind that was found instead.
    #[must_use]
    pub const fn found(&self) -> AddrKind {
        self.found
    }
}

impl fmt::Display for AddrKindMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "address kind mismatch: expected {} address, found {}",
            self.expected, self.found
        )
    }
}

impl std::error::Error for AddrKindMismatch {}
