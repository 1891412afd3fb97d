//! Turning `(network, address)` pairs into address lists.

use crate::error::{InvalidDomainError, MissingAddressError, ResolveError};
use eyeball_dns::{Resolver, SystemResolver};
use eyeball_error::BoxError;
use eyeball_net::{
    IpFamily, IpStackCapability, Network,
    address::{
        AddrKind, AddrList, Domain, NetAddr, ScopedIp, ServiceLookup, WellKnownServices,
        parse_ipv4, parse_ipv6, parse_port, split_host_port, split_host_zone,
    },
};
use smol_str::SmolStr;
use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    sync::Arc,
};
use tokio::time::Instant;

/// Everything needed to resolve an address, borrowed from a dialer.
pub(crate) struct ResolveContext<'a, R> {
    pub(crate) resolver: &'a Arc<R>,
    pub(crate) capability: IpStackCapability,
    pub(crate) services: &'a dyn ServiceLookup,
    pub(crate) deadline: Option<Instant>,
}

impl<R: Resolver> ResolveContext<'_, R> {
    /// Resolve `address` into a list of addresses of the kind used by `network`.
    ///
    /// Literal IP addresses are used as is, names are resolved with the
    /// resolver. The result is narrowed to the IP family of the network
    /// and the IP stacks available.
    pub(crate) async fn resolve(
        &self,
        network: &Network,
        address: &str,
    ) -> Result<AddrList, ResolveError> {
        if address.is_empty() {
            return Err(ResolveError::malformed(MissingAddressError));
        }

        let kind = network.addr_kind();
        if kind == AddrKind::Local {
            return with_addrs(kind, [NetAddr::local(address)]);
        }
        let (host, port) = match network.transport() {
            Some(transport) => {
                let (host, port) = split_host_port(address).map_err(ResolveError::malformed)?;
                let port =
                    parse_port(transport, port, self.services).map_err(ResolveError::malformed)?;
                (host, port)
            }
            None => (address, 0),
        };

        let family = network.family();
        if host.is_empty() {
            let ip: IpAddr = match family {
                IpFamily::V6 => Ipv6Addr::UNSPECIFIED.into(),
                IpFamily::Any | IpFamily::V4 => Ipv4Addr::UNSPECIFIED.into(),
            };
            return with_ips(kind, [ip], None, port);
        }

        let (ips, zone) = if let Some(ip) = parse_ipv4(host) {
            (vec![IpAddr::V4(ip)], None)
        } else if let Some((ip, zone)) = parse_ipv6(host, true) {
            (vec![IpAddr::V6(ip)], zone)
        } else {
            let (name, zone) = split_host_zone(host);
            let domain: Domain = name.parse().map_err(|err: eyeball_error::OpaqueError| {
                tracing::debug!(host = name, "reject invalid domain name: {err}");
                ResolveError::resolution(InvalidDomainError)
            })?;
            let ips = lookup(self.resolver, domain, self.deadline).await?;
            (ips, (!zone.is_empty()).then(|| SmolStr::new(zone)))
        };

        let zoned = zone.is_some();
        let ips = ips
            .into_iter()
            .filter_map(|ip| self.capability.narrow(ip, family, zoned));
        let list = with_ips(kind, ips, zone, port)?;
        if list.is_empty() {
            tracing::debug!(%network, address, "no address left after narrowing");
            return Err(ResolveError::no_suitable_address());
        }
        Ok(list)
    }
}

fn with_addrs(
    kind: AddrKind,
    addrs: impl IntoIterator<Item = NetAddr>,
) -> Result<AddrList, ResolveError> {
    AddrList::from_addrs(kind, addrs).map_err(ResolveError::malformed)
}

fn with_ips(
    kind: AddrKind,
    ips: impl IntoIterator<Item = IpAddr>,
    zone: Option<SmolStr>,
    port: u16,
) -> Result<AddrList, ResolveError> {
    with_addrs(
        kind,
        ips.into_iter().filter_map(|ip| {
            NetAddr::with_ip(kind, ScopedIp::with_zone(ip, zone.clone()), port)
        }),
    )
}

/// Look up `host`, giving up once `deadline` passes.
///
/// The lookup runs in its own task, which is left to finish
/// on its own when the deadline passes first. Its result is dropped.
async fn lookup<R: Resolver>(
    resolver: &Arc<R>,
    host: Domain,
    deadline: Option<Instant>,
) -> Result<Vec<IpAddr>, ResolveError> {
    let Some(deadline) = deadline else {
        tracing::trace!(%host, "resolve host");
        return resolver
            .resolve(host)
            .await
            .map_err(ResolveError::resolution);
    };

    if deadline <= Instant::now() {
        return Err(ResolveError::timeout());
    }

    tracing::trace!(%host, "resolve host with deadline");
    let resolver = resolver.clone();
    let handle = tokio::spawn(async move {
        resolver.resolve(host).await.map_err(Into::<BoxError>::into)
    });

    match tokio::time::timeout_at(deadline, handle).await {
        Ok(Ok(result)) => result.map_err(ResolveError::resolution),
        Ok(Err(err)) => Err(ResolveError::resolution(err)),
        Err(_) => {
            tracing::debug!("resolution did not finish before the deadline");
            Err(ResolveError::timeout())
        }
    }
}

async fn resolve_kind(
    expected: &[AddrKind],
    network: &str,
    address: &str,
) -> Result<AddrList, ResolveError> {
    let parsed: Network = network.parse().map_err(ResolveError::malformed)?;
    if !expected.contains(&parsed.addr_kind()) {
        return Err(ResolveError::malformed(
            eyeball_net::UnknownNetworkError::new(network),
        ));
    }
    let resolver = Arc::new(SystemResolver::new());
    ResolveContext {
        resolver: &resolver,
        capability: IpStackCapability::system(),
        services: &WellKnownServices::new(),
        deadline: None,
    }
    .resolve(&parsed, address)
    .await
}

/// Resolve `address` on any known network using the system resolver.
///
/// See [`Dialer::resolve`](crate::Dialer::resolve) to resolve with a
/// custom resolver or a deadline.
pub async fn resolve_addrs(network: &str, address: &str) -> Result<AddrList, ResolveError> {
    resolve_kind(
        &[
            AddrKind::Stream,
            AddrKind::Datagram,
            AddrKind::RawIp,
            AddrKind::Local,
        ],
        network,
        address,
    )
    .await
}

/// Resolve `host:port` on a TCP network (`tcp`, `tcp4` or `tcp6`).
pub async fn resolve_tcp_addrs(network: &str, address: &str) -> Result<AddrList, ResolveError> {
    resolve_kind(&[AddrKind::Stream], network, address).await
}

/// Resolve `host:port` on a UDP network (`udp`, `udp4` or `udp6`).
pub async fn resolve_udp_addrs(network: &str, address: &str) -> Result<AddrList, ResolveError> {
    resolve_kind(&[AddrKind::Datagram], network, address).await
}

/// Resolve `host` on an IP network (`ip`, `ip4` or `ip6`).
pub async fn resolve_ip_addrs(network: &str, address: &str) -> Result<AddrList, ResolveError> {
    resolve_kind(&[AddrKind::RawIp], network, address).await
}

/// Resolve a socket path on a unix network (`unix`, `unixgram` or `unixpacket`).
pub async fn resolve_unix_addrs(network: &str, address: &str) -> Result<AddrList, ResolveError> {
    resolve_kind(&[AddrKind::Local], network, address).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DialErrorKind, NoSuitableAddressError, TimeoutError};
    use eyeball_dns::StaticResolver;
    use std::time::Duration;

    fn foo_resolver() -> Arc<StaticResolver> {
        Arc::new(StaticResolver::new().with_host(
            Domain::from_static("foo.com"),
            [
                IpAddr::from(Ipv4Addr::LOCALHOST),
                IpAddr::from(Ipv6Addr::LOCALHOST),
            ],
        ))
    }

    async fn resolve_with(
        capability: IpStackCapability,
        network: &str,
        address: &str,
    ) -> Result<AddrList, ResolveError> {
        let resolver = foo_resolver();
        ResolveContext {
            resolver: &resolver,
            capability,
            services: &WellKnownServices::new(),
            deadline: None,
        }
        .resolve(&network.parse().unwrap(), address)
        .await
    }

    #[tokio::test]
    async fn test_family_narrowing() {
        let v4_only = IpStackCapability::new(true, false);
        let v6_only = IpStackCapability::new(false, true);
        let dual = IpStackCapability::dual_stack();

        // (capability, network, address, expected addresses or None for no suitable address)
        let table: &[(IpStackCapability, &str, &str, Option<&[&str]>)] = &[
            (dual, "tcp", "foo.com:80", Some(&["127.0.0.1:80", "[::1]:80"])),
            (v4_only, "tcp4", "foo.com:80", Some(&["127.0.0.1:80"])),
            (v6_only, "tcp4", "foo.com:80", None),
            (v6_only, "tcp6", "foo.com:80", Some(&["[::1]:80"])),
            (v4_only, "tcp6", "foo.com:80", None),
            (v4_only, "tcp", "127.0.0.1:80", Some(&["127.0.0.1:80"])),
            (v6_only, "tcp6", "127.0.0.1:80", None),
            (v6_only, "tcp", "[::1%911]:80", Some(&["[::1%911]:80"])),
            (v4_only, "tcp", "[::1%911]:80", None),
            (v4_only, "udp4", "foo.com:53", Some(&["127.0.0.1:53"])),
            (v6_only, "udp6", "foo.com:domain", Some(&["[::1]:53"])),
            (v4_only, "udp6", "foo.com:53", None),
            (v4_only, "ip4", "foo.com", Some(&["127.0.0.1"])),
            (v6_only, "ip6:icmp", "foo.com", Some(&["::1"])),
            (v6_only, "ip4", "127.0.0.1", None),
            (dual, "ip", "::1%911", Some(&["::1%911"])),
            (v4_only, "ip", "::1%911", None),
        ];

        for (capability, network, address, expected) in table {
            let result = resolve_with(*capability, network, address).await;
            match expected {
                Some(expected) => {
                    let list = result.unwrap_or_else(|err| {
                        panic!("{network} {address}: unexpected error: {err}")
                    });
                    let got: Vec<_> = list.iter().map(ToString::to_string).collect();
                    assert_eq!(&got, expected, "{network} {address}");
                }
                None => {
                    let err = result.unwrap_err();
                    assert_eq!(
                        err.kind(),
                        DialErrorKind::NoSuitableAddress,
                        "{network} {address}: {err}"
                    );
                    assert!(eyeball_error::has::<NoSuitableAddressError>(&err));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_ipv4_mapped_is_canonicalized() {
        let list = resolve_with(IpStackCapability::dual_stack(), "tcp", "[::ffff:10.0.0.1]:80")
            .await
            .unwrap();
        assert_eq!(list.ip(0), Some(IpAddr::from(Ipv4Addr::new(10, 0, 0, 1))));

        let err = resolve_with(IpStackCapability::dual_stack(), "tcp6", "[::ffff:10.0.0.1]:80")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::NoSuitableAddress);
    }

    #[tokio::test]
    async fn test_malformed_input() {
        let dual = IpStackCapability::dual_stack();
        for (network, address) in [
            ("tcp", ""),
            ("tcp", "foo.com"),
            ("tcp", "foo.com:99999"),
            ("tcp", "foo.com:nope"),
            ("udp", "[::1:53"),
            ("tcp", "a:b:80"),
        ] {
            let err = resolve_with(dual, network, address).await.unwrap_err();
            assert_eq!(
                err.kind(),
                DialErrorKind::MalformedInput,
                "{network} {address}: {err}"
            );
        }

        let err = resolve_with(dual, "tcp", "").await.unwrap_err();
        assert_eq!(err.to_string(), "missing address");
    }

    #[tokio::test]
    async fn test_invalid_domain_is_not_resolved() {
        let dual = IpStackCapability::dual_stack();
        for address in ["123:80", "-a.com:80", "a..com:80", "300.1.2.3:80"] {
            let err = resolve_with(dual, "tcp", address).await.unwrap_err();
            assert_eq!(err.kind(), DialErrorKind::Resolution, "{address}");
            assert!(
                eyeball_error::has::<InvalidDomainError>(&err),
                "{address}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_resolver_error() {
        let err = resolve_with(IpStackCapability::dual_stack(), "tcp", "bar.com:80")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::Resolution);
        assert!(eyeball_error::has::<eyeball_dns::DomainNotMappedError>(&err));
    }

    #[tokio::test]
    async fn test_empty_host_is_unspecified() {
        let dual = IpStackCapability::dual_stack();
        let list = resolve_with(dual, "tcp", ":80").await.unwrap();
        assert_eq!(list.addr(0).unwrap().to_string(), "0.0.0.0:80");
        // http is a tcp service only
        let err = resolve_with(dual, "udp6", ":http").await.unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::MalformedInput);
        let list = resolve_with(dual, "tcp6", ":http").await.unwrap();
        assert_eq!(list.addr(0).unwrap().to_string(), "[::]:80");
    }

    #[tokio::test]
    async fn test_local_address() {
        let list = resolve_with(IpStackCapability::dual_stack(), "unixgram", "/tmp/sock")
            .await
            .unwrap();
        assert_eq!(list.kind(), AddrKind::Local);
        assert_eq!(list.len(), 1);
        assert_eq!(
            list.addr(0).unwrap().path(),
            Some(std::path::Path::new("/tmp/sock"))
        );
    }

    #[derive(Debug, Clone)]
    struct SlowResolver(Duration);

    impl Resolver for SlowResolver {
        type Error = BoxError;

        async fn resolve(&self, _: Domain) -> Result<Vec<IpAddr>, Self::Error> {
            tokio::time::sleep(self.0).await;
            Ok(vec![Ipv4Addr::LOCALHOST.into()])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolution_deadline() {
        let resolver = Arc::new(SlowResolver(Duration::from_secs(5)));
        let network: Network = "tcp".parse().unwrap();

        let ctx = ResolveContext {
            resolver: &resolver,
            capability: IpStackCapability::dual_stack(),
            services: &WellKnownServices::new(),
            deadline: Some(Instant::now() + Duration::from_secs(1)),
        };
        let start = Instant::now();
        let err = ctx.resolve(&network, "slow.example:80").await.unwrap_err();
        assert!(err.is_timeout());
        assert!(eyeball_error::has::<TimeoutError>(&err));
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() < Duration::from_secs(5));

        let ctx = ResolveContext {
            deadline: Some(Instant::now() + Duration::from_secs(10)),
            ..ctx
        };
        let list = ctx.resolve(&network, "slow.example:80").await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_skips_resolver() {
        let resolver = Arc::new(SlowResolver(Duration::from_secs(5)));
        let network: Network = "tcp".parse().unwrap();
        let deadline = Instant::now();
        tokio::time::advance(Duration::from_millis(1)).await;

        let ctx = ResolveContext {
            resolver: &resolver,
            capability: IpStackCapability::dual_stack(),
            services: &WellKnownServices::new(),
            deadline: Some(deadline),
        };
        let err = ctx.resolve(&network, "slow.example:80").await.unwrap_err();
        assert!(err.is_timeout());

        // literals need no resolution, so the deadline does not matter here
        let list = ctx.resolve(&network, "10.0.0.1:80").await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_public_helpers_check_network_kind() {
        let err = resolve_tcp_addrs("udp", "127.0.0.1:53").await.unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::MalformedInput);
        assert_eq!(err.to_string(), "unknown network udp");

        let err = resolve_addrs("sctp", "127.0.0.1:53").await.unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::MalformedInput);

        let list = resolve_udp_addrs("udp", "127.0.0.1:53").await.unwrap();
        assert_eq!(list.kind(), AddrKind::Datagram);
        let list = resolve_ip_addrs("ip4:1", "127.0.0.1").await.unwrap();
        assert_eq!(list.kind(), AddrKind::RawIp);
        let list = resolve_unix_addrs("unix", "/run/app.sock").await.unwrap();
        assert_eq!(list.kind(), AddrKind::Local);
    }
}
