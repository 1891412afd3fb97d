use crate::Resolver;
use eyeball_error::static_str_error;
use eyeball_net::address::Domain;
use std::net::IpAddr;

#[derive(Debug, Clone, Default)]
#[non_exhaustive]
/// a [`Resolver`] implementation which
/// denies all lookups with a [`DnsDeniedError`].
pub struct DenyAllResolver;

impl DenyAllResolver {
    #[inline]
    /// Create a new [`Default`] [`DenyAllResolver`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

static_str_error! {
    #[doc = "dns resolve denied"]
    pub struct DnsDeniedError;
}

impl Resolver for DenyAllResolver {
    type Error = DnsDeniedError;

    fn resolve(
        &self,
        _: Domain,
    ) -> impl Future<Output = Result<Vec<IpAddr>, Self::Error>> + Send + '_ {
        std::future::ready(Err(DnsDeniedError))
    }
}
