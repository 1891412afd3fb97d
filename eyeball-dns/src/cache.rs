use std::{collections::HashMap, fmt, net::IpAddr, time::Duration};

use eyeball_net::address::Domain;
use parking_lot::RwLock;
use tokio::time::Instant;

use crate::{DialEvent, Resolver, SystemResolver};

/// A [`Resolver`] which caches the results of an inner resolver
/// for a fixed time-to-live.
///
/// - A TTL of zero means cached entries never expire.
/// - Failed lookups are never cached.
/// - Entries are not evicted: an expired entry stays around until the
///   next successful lookup of its host overwrites it.
/// - Every call returns its own copy of the addresses.
///
/// Concurrent lookups of the same uncached (or expired) host are not
/// de-duplicated: each of them reaches the inner resolver and the last
/// one to finish determines the cached value.
pub struct CacheResolver<R = SystemResolver> {
    inner: R,
    ttl: Duration,
    entries: RwLock<HashMap<Domain, CacheEntry>>,
}

struct CacheEntry {
    ips: Vec<IpAddr>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }
}

impl CacheResolver {
    /// Create a new [`CacheResolver`] on top of the [`SystemResolver`].
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_resolver(SystemResolver::new(), ttl)
    }
}

impl<R> CacheResolver<R> {
    /// Create a new [`CacheResolver`] on top of the given resolver.
    pub fn with_resolver(inner: R, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The time-to-live of cached entries, zero if they never expire.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Reference to the inner resolver.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// The number of cached entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    fn lookup(&self, host: &Domain) -> Option<Vec<IpAddr>> {
        let entries = self.entries.read();
        let entry = entries.get(host)?;
        entry.is_fresh(Instant::now()).then(|| entry.ips.clone())
    }

    fn store(&self, host: Domain, ips: Vec<IpAddr>) {
        // a ttl beyond the clock's range never expires
        let expires_at = (!self.ttl.is_zero())
            .then(|| Instant::now().checked_add(self.ttl))
            .flatten();
        self.entries
            .write()
            .insert(host, CacheEntry { ips, expires_at });
    }
}

impl<R: fmt::Debug> fmt::Debug for CacheResolver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheResolver")
            .field("inner", &self.inner)
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}

impl<R: Resolver> Resolver for CacheResolver<R> {
    type Error = R::Error;

    async fn resolve(&self, host: Domain) -> Result<Vec<IpAddr>, Self::Error> {
        if let Some(ips) = self.lookup(&host) {
            tracing::trace!(%host, "dns cache hit");
            return Ok(ips);
        }

        tracing::trace!(%host, "dns cache miss: resolve using inner resolver");
        let ips = self.inner.resolve(host.clone()).await?;

        tracing::debug!(%host, count = ips.len(), ttl = ?self.ttl, "dns cache store");
        self.store(host, ips.clone());
        Ok(ips)
    }

    fn on_dial(&self, event: &DialEvent<'_>) {
        self.inner.on_dial(event)
    }
}
