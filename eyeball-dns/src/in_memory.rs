use crate::Resolver;
use eyeball_error::static_str_error;
use eyeball_net::address::Domain;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, net::IpAddr};

#[derive(Debug, Clone, Default)]
/// A [`Resolver`] serving a fixed, in-memory mapping of hosts to IP addresses.
///
/// Can be used to overwrite the resolution of specific hosts
/// (e.g. chained in front of a [`SystemResolver`](crate::SystemResolver))
/// or as a deterministic resolver in tests.
pub struct StaticResolver {
    hosts: HashMap<Domain, Vec<IpAddr>>,
}

impl StaticResolver {
    /// Create a new empty [`StaticResolver`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `host` onto the given addresses.
    ///
    /// Existing mappings will be overwritten.
    pub fn insert(&mut self, host: Domain, ips: impl IntoIterator<Item = IpAddr>) -> &mut Self {
        self.hosts.insert(host, ips.into_iter().collect());
        self
    }

    /// Map `host` onto the given addresses, returning the resolver.
    ///
    /// Existing mappings will be overwritten.
    #[must_use]
    pub fn with_host(mut self, host: Domain, ips: impl IntoIterator<Item = IpAddr>) -> Self {
        self.insert(host, ips);
        self
    }

    /// Extend the [`StaticResolver`] with the given mappings.
    ///
    /// Existing mappings will be overwritten.
    pub fn extend(&mut self, hosts: impl IntoIterator<Item = (Domain, Vec<IpAddr>)>) -> &mut Self {
        self.hosts.extend(hosts);
        self
    }

    /// Returns `true` if no host is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

static_str_error! {
    #[doc = "domain not mapped in memory"]
    pub struct DomainNotMappedError;
}

impl Resolver for StaticResolver {
    type Error = DomainNotMappedError;

    async fn resolve(&self, host: Domain) -> Result<Vec<IpAddr>, Self::Error> {
        self.hosts
            .get(&host)
            .filter(|ips| !ips.is_empty())
            .cloned()
            .ok_or(DomainNotMappedError)
    }
}

impl<'de> Deserialize<'de> for StaticResolver {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map = HashMap::<String, Vec<IpAddr>>::deserialize(deserializer)?;
        let hosts = map
            .into_iter()
            .map(|(host, ips)| {
                Domain::try_from(host)
                    .map(|host| (host, ips))
                    .map_err(serde::de::Error::custom)
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { hosts })
    }
}

impl Serialize for StaticResolver {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.hosts.iter().map(|(host, ips)| (host.as_str(), ips)))
    }
}
