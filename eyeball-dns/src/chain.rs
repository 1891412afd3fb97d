use std::net::IpAddr;

use eyeball_error::{BoxError, OpaqueError};
use eyeball_net::address::Domain;

use crate::{DialEvent, Resolver};

/// Tries each resolver in order, the first success wins.
///
/// If all resolvers fail the error of the last one is returned.
impl<R: Resolver> Resolver for Vec<R> {
    type Error = BoxError;

    async fn resolve(&self, host: Domain) -> Result<Vec<IpAddr>, Self::Error> {
        let mut last_err = None;
        for resolver in self {
            match resolver.resolve(host.clone()).await {
                Ok(ips) => return Ok(ips),
                Err(err) => last_err = Some(err.into()),
            }
        }
        Err(last_err
            .unwrap_or_else(|| OpaqueError::from_display("empty resolver chain").into_boxed()))
    }

    fn on_dial(&self, event: &DialEvent<'_>) {
        for resolver in self {
            resolver.on_dial(event);
        }
    }
}
