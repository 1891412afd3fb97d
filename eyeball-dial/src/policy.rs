use crate::filter::{
    AddrFilter, DefaultFilter, DualStackFilter, FirstFilter, FirstIpv4Filter, FirstIpv6Filter,
    Ipv4Filter, Ipv6Filter, MaxFilter, NoFilter, ReverseFilter, ShuffleFilter, compose_select,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A serializable description of an address filter.
///
/// Unit policies are written as plain strings, the others as
/// single key maps:
///
/// ```
/// use eyeball_dial::FilterPolicy;
///
/// let policy: FilterPolicy =
///     serde_json::from_str(r#"{"compose": ["shuffle", {"max": 2}]}"#).unwrap();
/// assert_eq!(
///     policy,
///     FilterPolicy::Compose(vec![FilterPolicy::Shuffle, FilterPolicy::Max(2)]),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPolicy {
    /// See [`DefaultFilter`].
    #[default]
    Default,
    /// See [`DualStackFilter`].
    DualStack,
    /// See [`FirstFilter`].
    First,
    /// See [`FirstIpv4Filter`].
    FirstIpv4,
    /// See [`FirstIpv6Filter`].
    FirstIpv6,
    /// See [`Ipv4Filter`].
    Ipv4,
    /// See [`Ipv6Filter`].
    Ipv6,
    /// See [`MaxFilter`].
    Max(usize),
    /// See [`ReverseFilter`].
    Reverse,
    /// See [`ShuffleFilter`].
    Shuffle,
    /// See [`NoFilter`].
    All,
    /// Applies the policies in order.
    Compose(Vec<FilterPolicy>),
}

impl AddrFilter for FilterPolicy {
    fn select(&self, ips: &[Option<IpAddr>]) -> Vec<usize> {
        match self {
            Self::Default => DefaultFilter.select(ips),
            Self::DualStack => DualStackFilter.select(ips),
            Self::First => FirstFilter.select(ips),
            Self::FirstIpv4 => FirstIpv4Filter.select(ips),
            Self::FirstIpv6 => FirstIpv6Filter.select(ips),
            Self::Ipv4 => Ipv4Filter.select(ips),
            Self::Ipv6 => Ipv6Filter.select(ips),
            Self::Max(n) => MaxFilter::new(*n).select(ips),
            Self::Reverse => ReverseFilter.select(ips),
            Self::Shuffle => ShuffleFilter.select(ips),
            Self::All => NoFilter.select(ips),
            Self::Compose(policies) => {
                compose_select(policies.iter().map(|p| p as &dyn AddrFilter), ips)
            }
        }
    }
}
