//! Eyeball dials network addresses the way a patient client should:
//! resolve the name, keep the addresses the host can actually reach,
//! pick the ones worth trying and race them.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), eyeball::error::BoxError> {
//! use tokio::io::AsyncWriteExt;
//!
//! let mut conn = eyeball::dial("tcp", "example.com:http").await?;
//! conn.write_all(b"GET / HTTP/1.0\r\nHost: example.com\r\n\r\n")
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! The building blocks live in their own crates and are re-exported here:
//!
//! | module | crate | contents |
//! |-|-|-|
//! | [`error`] | `eyeball-error` | boxed errors, context and chain helpers |
//! | [`net`] | `eyeball-net` | address parsing, network tokens, IP stack capability |
//! | [`dns`] | `eyeball-dns` | resolvers: system, cached, static, deny-all |
//! | [`dial`] | `eyeball-dial` | address filters, connectors and the racing [`Dialer`](dial::Dialer) |
//!
//! The `dns` and `dial` modules are behind the features of the same name,
//! both enabled by default.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(
    not(test),
    warn(clippy::print_stdout, clippy::dbg_macro),
    deny(clippy::unwrap_used, clippy::expect_used)
)]

#[doc(inline)]
pub use ::eyeball_error as error;

#[doc(inline)]
pub use ::eyeball_net as net;

#[cfg(feature = "dns")]
#[doc(inline)]
pub use ::eyeball_dns as dns;

#[cfg(feature = "dial")]
#[doc(inline)]
pub use ::eyeball_dial as dial;

#[cfg(feature = "dial")]
use std::time::Duration;

#[cfg(feature = "dial")]
/// Connect to `address` on the named `network` using a default [`Dialer`](dial::Dialer).
///
/// See [`Dialer::dial`](dial::Dialer::dial) for the accepted networks and addresses.
pub async fn dial(network: &str, address: &str) -> Result<dial::Conn, dial::DialError> {
    dial::Dialer::new().dial(network, address).await
}

#[cfg(feature = "dial")]
/// Like [`dial`] but gives up once `timeout` has passed,
/// name resolution included. A zero timeout means no timeout.
pub async fn dial_timeout(
    network: &str,
    address: &str,
    timeout: Duration,
) -> Result<dial::Conn, dial::DialError> {
    dial::Dialer::new()
        .with_timeout(timeout)
        .dial(network, address)
        .await
}
