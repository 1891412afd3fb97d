//! Hostname resolution for eyeball.
//!
//! Resolution is abstracted by the [`Resolver`] capability: given a [`Domain`]
//! it produces the list of IP addresses the name maps to. This crate does not
//! speak the DNS protocol itself, the [`SystemResolver`] delegates to the
//! name resolution facility of the platform.
//!
//! Resolvers compose:
//!
//! - [`CacheResolver`] wraps any resolver with a TTL bound, concurrency safe cache;
//! - [`StaticResolver`] serves a fixed in-memory mapping, useful for overwrites and tests;
//! - [`DenyAllResolver`] refuses every lookup;
//! - a `Vec` of resolvers tries each one in turn until one succeeds;
//! - [`BoxResolver`] erases the type of a resolver for dynamic dispatch.
//!
//! # Example
//!
//! ```
//! use eyeball_dns::{CacheResolver, Resolver, StaticResolver};
//! use eyeball_net::address::Domain;
//! use std::{net::IpAddr, time::Duration};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let resolver = CacheResolver::with_resolver(
//!     StaticResolver::new().with_host(
//!         Domain::from_static("example.com"),
//!         ["127.0.0.1".parse::<IpAddr>().unwrap()],
//!     ),
//!     Duration::from_secs(30),
//! );
//! let ips = resolver.resolve(Domain::from_static("example.com")).await.unwrap();
//! assert_eq!(ips, vec!["127.0.0.1".parse::<IpAddr>().unwrap()]);
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(
    not(test),
    warn(clippy::print_stdout, clippy::dbg_macro),
    deny(clippy::unwrap_used, clippy::expect_used)
)]

#[doc(no_inline)]
pub use eyeball_net::address::Domain;

mod resolver;
#[doc(inline)]
pub use resolver::{DialEvent, Resolver};

mod boxed;
#[doc(inline)]
pub use boxed::BoxResolver;

mod chain;

mod system;
#[doc(inline)]
pub use system::SystemResolver;

mod cache;
#[doc(inline)]
pub use cache::CacheResolver;

mod in_memory;
#[doc(inline)]
pub use in_memory::{DomainNotMappedError, StaticResolver};

mod deny_all;
#[doc(inline)]
pub use deny_all::{DenyAllResolver, DnsDeniedError};
