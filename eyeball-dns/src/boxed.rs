use std::{net::IpAddr, pin::Pin, sync::Arc};

use eyeball_error::BoxError;
use eyeball_net::address::Domain;

use crate::{DialEvent, Resolver};

/// Internal trait for dynamic dispatch of async traits,
/// as described in
/// <https://blog.rust-lang.org/inside-rust/2023/05/03/stabilizing-async-fn-in-trait.html>.
trait DynResolver: Send + Sync + 'static {
    fn resolve_box(
        &self,
        host: Domain,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IpAddr>, BoxError>> + Send + '_>>;

    fn on_dial_dyn(&self, event: &DialEvent<'_>);
}

impl<R: Resolver> DynResolver for R {
    fn resolve_box(
        &self,
        host: Domain,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IpAddr>, BoxError>> + Send + '_>> {
        Box::pin(async move { self.resolve(host).await.map_err(Into::into) })
    }

    fn on_dial_dyn(&self, event: &DialEvent<'_>) {
        self.on_dial(event)
    }
}

/// A boxed [`Resolver`], for where you require dynamic dispatch.
#[derive(Clone)]
pub struct BoxResolver {
    inner: Arc<dyn DynResolver>,
}

impl BoxResolver {
    /// Create a new [`BoxResolver`] from the given resolver.
    #[inline]
    pub fn new(resolver: impl Resolver) -> Self {
        Self {
            inner: Arc::new(resolver),
        }
    }
}

impl std::fmt::Debug for BoxResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxResolver").finish()
    }
}

impl Resolver for BoxResolver {
    type Error = BoxError;

    #[inline]
    fn resolve(
        &self,
        host: Domain,
    ) -> impl Future<Output = Result<Vec<IpAddr>, Self::Error>> + Send + '_ {
        self.inner.resolve_box(host)
    }

    #[inline]
    fn on_dial(&self, event: &DialEvent<'_>) {
        self.inner.on_dial_dyn(event)
    }

    fn boxed(self) -> BoxResolver {
        self
    }
}
