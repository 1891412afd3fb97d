use eyeball_error::BoxError;
use eyeball_net::Network;
use eyeball_net::address::{Domain, NetAddr};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::BoxResolver;

/// A resolver maps a hostname onto the IP addresses it is known by.
///
/// Implementations must be safe to use from many tasks at once.
pub trait Resolver: Send + Sync + 'static {
    /// Error returned by the resolver.
    type Error: Into<BoxError> + Send + 'static;

    /// Resolve `host` to its IP addresses, in order of preference.
    fn resolve(
        &self,
        host: Domain,
    ) -> impl Future<Output = Result<Vec<IpAddr>, Self::Error>> + Send + '_;

    /// Called by a dialer after every individual connection attempt,
    /// for observability purposes only.
    ///
    /// Does nothing by default.
    fn on_dial(&self, event: &DialEvent<'_>) {
        let _ = event;
    }

    /// Box this resolver to allow for dynamic dispatch.
    fn boxed(self) -> BoxResolver
    where
        Self: Sized,
    {
        BoxResolver::new(self)
    }
}

impl<R: Resolver> Resolver for Arc<R> {
    type Error = R::Error;

    #[inline]
    fn resolve(
        &self,
        host: Domain,
    ) -> impl Future<Output = Result<Vec<IpAddr>, Self::Error>> + Send + '_ {
        (**self).resolve(host)
    }

    #[inline]
    fn on_dial(&self, event: &DialEvent<'_>) {
        (**self).on_dial(event)
    }
}

/// The outcome of a single connection attempt, reported to [`Resolver::on_dial`].
#[derive(Debug, Clone, Copy)]
pub struct DialEvent<'a> {
    network: &'a Network,
    addr: &'a NetAddr,
    elapsed: Duration,
    error: Option<&'a (dyn std::error::Error + Send + Sync + 'static)>,
}

impl<'a> DialEvent<'a> {
    /// Create a new [`DialEvent`].
    #[must_use]
    pub fn new(
        network: &'a Network,
        addr: &'a NetAddr,
        elapsed: Duration,
        error: Option<&'a (dyn std::error::Error + Send + Sync + 'static)>,
    ) -> Self {
        Self {
            network,
            addr,
            elapsed,
            error,
        }
    }

    /// The network that was dialed.
    #[must_use]
    pub fn network(&self) -> &'a Network {
        self.network
    }

    /// The address that was dialed.
    #[must_use]
    pub fn addr(&self) -> &'a NetAddr {
        self.addr
    }

    /// How long the attempt took.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// The error of a failed attempt, `None` if it succeeded.
    #[must_use]
    pub fn error(&self) -> Option<&'a (dyn std::error::Error + Send + Sync + 'static)> {
        self.error
    }
}
