use std::{io, net::IpAddr};

use eyeball_net::address::Domain;

use crate::Resolver;

#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
/// A [`Resolver`] using the name resolution facility of the platform
/// (`getaddrinfo` on unix), run on tokio's blocking pool.
pub struct SystemResolver;

impl SystemResolver {
    #[inline]
    /// Create a new [`SystemResolver`].
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Resolver for SystemResolver {
    type Error = io::Error;

    async fn resolve(&self, host: Domain) -> Result<Vec<IpAddr>, Self::Error> {
        tracing::trace!(%host, "resolve host using system resolver");
        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in tokio::net::lookup_host((host.as_str(), 0)).await? {
            let ip = addr.ip();
            if !ips.contains(&ip) {
                ips.push(ip);
            }
        }
        if ips.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such host {host}"),
            ));
        }
        Ok(ips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_localhost() {
        let ips = SystemResolver::new()
            .resolve(Domain::localhost())
            .await
            .unwrap();
        assert!(!ips.is_empty());
        assert!(ips.iter().all(IpAddr::is_loopback), "{ips:?}");
    }
}
