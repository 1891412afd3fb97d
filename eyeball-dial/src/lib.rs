//! Dialing for eyeball: resolve, select and race connection attempts.
//!
//! A [`Dialer`] turns a `(network, address)` pair such as
//! `("tcp", "example.com:https")` into a connection:
//!
//! 1. the address is parsed and, when needed, resolved through an
//!    [`eyeball_dns::Resolver`], bounded by the dial timeout;
//! 2. resolved addresses are narrowed to the IP stacks the platform supports;
//! 3. an [`filter::AddrFilter`] selects the addresses worth dialing;
//! 4. the remaining addresses are raced on stream networks, the first
//!    connection established wins and all others are closed.
//!
//! Connections are established by a [`Connector`], the [`SystemConnector`]
//! opening real sockets. Addresses can also be resolved on their own
//! using [`resolve_addrs`] and friends.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(
    not(test),
    warn(clippy::print_stdout, clippy::dbg_macro),
    deny(clippy::unwrap_used, clippy::expect_used)
)]

pub mod filter;

mod policy;
#[doc(inline)]
pub use policy::FilterPolicy;

mod error;
#[doc(inline)]
pub use error::{
    DialError, DialErrorKind, InvalidDomainError, MissingAddressError, NoSuitableAddressError,
    ResolveError, TimeoutError,
};

mod resolve;
#[doc(inline)]
pub use resolve::{
    resolve_addrs, resolve_ip_addrs, resolve_tcp_addrs, resolve_udp_addrs, resolve_unix_addrs,
};

mod conn;
#[doc(inline)]
pub use conn::Conn;

mod connector;
#[doc(inline)]
pub use connector::{
    ConnectDeniedError, ConnectOptions, Connector, DenyConnector, MissingProtocolError,
    SystemConnector, UnsupportedNetworkError,
};

mod dialer;
#[doc(inline)]
pub use dialer::Dialer;

mod config;
#[doc(inline)]
pub use config::DialerConfig;
