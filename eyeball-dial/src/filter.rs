//! Address selection policies.
//!
//! A filter picks which of the resolved addresses are dialed, and in
//! what order. Filters work on the IP addresses of a list only and
//! return the indices of the selected entries, which makes them usable
//! on an [`AddrList`] as well as on a plain list of IP addresses.
//!
//! Unless documented otherwise, a filter keeps the relative order
//! of the addresses it selects and leaves lists of zero or one
//! address untouched.

use eyeball_net::address::AddrList;
use rand::seq::SliceRandom;
use std::{fmt, net::IpAddr, sync::Arc};

/// Selects addresses to dial from a list of candidates.
pub trait AddrFilter: Send + Sync + 'static {
    /// Select entries of `ips` by index, in the order they should be dialed.
    ///
    /// `None` marks an address without IP, such as a unix socket path.
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize>;

    /// Apply the filter to an [`AddrList`], returning a new list.
    fn filter_addrs(&self, list: &AddrList) -> AddrList {
        list.select(self.select(&list.ips()))
    }

    /// Apply the filter to a list of IP addresses, returning a new list.
    fn filter_ips(&self, ips: &[IpAddr]) -> Vec<IpAddr> {
        let candidates: Vec<_> = ips.iter().copied().map(Some).collect();
        self.select(&candidates)
            .into_iter()
            .filter_map(|i| ips.get(i).copied())
            .collect()
    }

    /// Box this filter to allow for dynamic dispatch.
    fn boxed(self) -> BoxAddrFilter
    where
        Self: Sized,
    {
        BoxAddrFilter::new(self)
    }
}

impl<F> AddrFilter for F
where
    F: Fn(&[Option<IpAddr>]) -> Vec<usize> + Send + Sync + 'static,
{
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        (self)(ips)
    }
}

/// A type-erased, cheaply cloneable [`AddrFilter`].
#[derive(Clone)]
pub struct BoxAddrFilter(Arc<dyn AddrFilter>);

impl BoxAddrFilter {
    /// Create a new [`BoxAddrFilter`] from the given filter.
    pub fn new(filter: impl AddrFilter) -> Self {
        Self(Arc::new(filter))
    }
}

impl fmt::Debug for BoxAddrFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxAddrFilter").finish()
    }
}

impl AddrFilter for BoxAddrFilter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        self.0.select(ips)
    }

    fn boxed(self) -> BoxAddrFilter {
        self
    }
}

fn is_ipv4(ip: &Option<IpAddr>) -> bool {
    matches!(ip, Some(IpAddr::V4(_)))
}

fn is_ipv6(ip: &Option<IpAddr>) -> bool {
    matches!(ip, Some(IpAddr::V6(_)))
}

fn all(ips: &[Option<IpAddr>]) -> Vec<usize> {
    (0..ips.len()).collect()
}

fn first_where(ips: &[Option<IpAddr>], f: impl Fn(&Option<IpAddr>) -> bool) -> Vec<usize> {
    ips.iter().position(f).into_iter().collect()
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects the first IPv4 address, or if there is none, the first IPv6 address.
///
/// This is the filter used by a dialer unless configured otherwise.
pub struct DefaultFilter;

impl AddrFilter for DefaultFilter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        if ips.len() <= 1 {
            return all(ips);
        }
        ips.iter()
            .position(is_ipv4)
            .or_else(|| ips.iter().position(is_ipv6))
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects the first IPv4 and the first IPv6 address, whichever comes first
/// in the list is dialed first.
pub struct DualStackFilter;

impl AddrFilter for DualStackFilter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        if ips.len() <= 1 {
            return all(ips);
        }
        let (mut ipv4, mut ipv6) = (false, false);
        let mut selected = Vec::with_capacity(2);
        for (i, ip) in ips.iter().enumerate() {
            if !ipv4 && is_ipv4(ip) {
                selected.push(i);
                ipv4 = true;
            } else if !ipv6 && is_ipv6(ip) {
                selected.push(i);
                ipv6 = true;
            }
            if ipv4 && ipv6 {
                break;
            }
        }
        selected
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects the first address, of any family.
pub struct FirstFilter;

impl AddrFilter for FirstFilter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        if ips.is_empty() { Vec::new() } else { vec![0] }
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects the first IPv4 address.
pub struct FirstIpv4Filter;

impl AddrFilter for FirstIpv4Filter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        if ips.len() <= 1 {
            return all(ips);
        }
        first_where(ips, is_ipv4)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects the first IPv6 address.
pub struct FirstIpv6Filter;

impl AddrFilter for FirstIpv6Filter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        if ips.len() <= 1 {
            return all(ips);
        }
        first_where(ips, is_ipv6)
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects all IPv4 addresses.
///
/// Unlike most filters this one also applies to a single address.
pub struct Ipv4Filter;

impl AddrFilter for Ipv4Filter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        (0..ips.len()).filter(|&i| is_ipv4(&ips[i])).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects all IPv6 addresses.
///
/// Unlike most filters this one also applies to a single address.
pub struct Ipv6Filter;

impl AddrFilter for Ipv6Filter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        (0..ips.len()).filter(|&i| is_ipv6(&ips[i])).collect()
    }
}

/// Selects up to `n` addresses, split evenly between IPv4 and IPv6.
///
/// When one family has fewer addresses than its share the other family
/// fills the remaining space. With an odd `n` the extra slot goes to IPv4.
/// Addresses toward the front of the list are preferred.
#[derive(Debug, Clone, Copy)]
pub struct MaxFilter(usize);

impl MaxFilter {
    /// Create a new [`MaxFilter`] selecting at most `n` addresses.
    #[must_use]
    pub const fn new(n: usize) -> Self {
        Self(n)
    }

    /// The maximum number of addresses selected.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.0
    }
}

impl AddrFilter for MaxFilter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        let max = self.0;
        if ips.len() <= max {
            return all(ips);
        }

        let mut ipv4 = ips.iter().filter(|ip| is_ipv4(ip)).count();
        let mut ipv6 = ips.iter().filter(|ip| is_ipv6(ip)).count();
        let half = max / 2;
        if ipv6 <= half {
            ipv4 = max - ipv6;
        } else if ipv4 <= half {
            ipv6 = max - ipv4;
        } else {
            ipv4 = max - half;
            ipv6 = half;
        }

        let mut selected = Vec::with_capacity(max);
        for (i, ip) in ips.iter().enumerate() {
            if ipv4 > 0 && is_ipv4(ip) {
                selected.push(i);
                ipv4 -= 1;
            } else if ipv6 > 0 && is_ipv6(ip) {
                selected.push(i);
                ipv6 -= 1;
            }
        }
        selected
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects all addresses, in reverse order.
pub struct ReverseFilter;

impl AddrFilter for ReverseFilter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        (0..ips.len()).rev().collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects all addresses, in a uniformly random order.
pub struct ShuffleFilter;

impl AddrFilter for ShuffleFilter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        let mut indices = all(ips);
        if indices.len() > 1 {
            indices.shuffle(&mut rand::rng());
        }
        indices
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Selects all addresses, as they are.
pub struct NoFilter;

impl AddrFilter for NoFilter {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        all(ips)
    }
}

/// Applies a sequence of filters, each one to the result of the previous.
///
/// An empty sequence selects all addresses.
///
/// # Example
///
/// ```
/// use eyeball_dial::filter::{AddrFilter, Compose, DualStackFilter, Ipv4Filter, FirstFilter};
/// use std::net::IpAddr;
///
/// let ips: Vec<IpAddr> = ["::1", "10.0.0.1", "10.0.0.2"]
///     .into_iter()
///     .map(|ip| ip.parse().unwrap())
///     .collect();
///
/// // equivalent to FirstIpv4Filter
/// let filter = Compose::new([Ipv4Filter.boxed(), FirstFilter.boxed()]);
/// assert_eq!(filter.filter_ips(&ips), vec![ips[1]]);
///
/// let filter = Compose::new([DualStackFilter.boxed()]);
/// assert_eq!(filter.filter_ips(&ips), vec![ips[0], ips[1]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compose(Vec<BoxAddrFilter>);

impl Compose {
    /// Create a new [`Compose`] filter applying `filters` in order.
    pub fn new(filters: impl IntoIterator<Item = BoxAddrFilter>) -> Self {
        Self(filters.into_iter().collect())
    }

    /// Append a filter to the sequence.
    #[must_use]
    pub fn with_filter(mut self, filter: impl AddrFilter) -> Self {
        self.0.push(filter.boxed());
        self
    }
}

impl AddrFilter for Compose {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        compose_select(self.0.iter().map(|f| f as &dyn AddrFilter), ips)
    }
}

pub(crate) fn compose_select<'a>(
    filters: impl IntoIterator<Item = &'a dyn AddrFilter>,
    ips: &[Option<IpAddr>],
) -> Vec<usize> {
    let mut selected = all(ips);
    for filter in filters {
        let current: Vec<_> = selected.iter().map(|&i| ips[i]).collect();
        selected = filter
            .select(&current)
            .into_iter()
            .filter_map(|j| selected.get(j).copied())
            .collect();
    }
    selected
}

macro_rules! impl_addr_filter_for_tuple {
    ($($ty:ident),+) => {
        /// Applies the filters in order, like [`Compose`].
        impl<$($ty),+> AddrFilter for ($($ty,)+)
        where
            $($ty: AddrFilter),+
        {
            #[expect(non_snake_case, reason = "bindings reuse the type parameter names")]
            fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
                let ($($ty,)+) = self;
                compose_select([$($ty as &dyn AddrFilter),+], ips)
            }
        }
    };
}

impl_addr_filter_for_tuple!(A, B);
impl_addr_filter_for_tuple!(A, B, C);
impl_addr_filter_for_tuple!(A, B, C, D);
