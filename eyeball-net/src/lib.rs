//! Network types and utilities for eyeball.
//!
//! This crate holds everything that can be decided about an address
//! _without_ going to the network:
//!
//! - [`address`]: literal IPv4/IPv6 parsing, `host:port` splitting,
//!   domain name validation, port parsing and the [`address::AddrList`]
//!   collection used to carry resolved addresses around;
//! - [`Network`]: classification of network tokens such as `tcp6` or `ip4:icmp`;
//! - [`IpStackCapability`]: a snapshot of which IP stacks the platform supports.
//!
//! Resolution of names lives in `eyeball-dns`, dialing in `eyeball-dial`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(
    not(test),
    warn(clippy::print_stdout, clippy::dbg_macro),
    deny(clippy::unwrap_used, clippy::expect_used)
)]

pub mod address;

mod network;
#[doc(inline)]
pub use network::{IpFamily, Network, UnixType, UnknownNetworkError};

mod capability;
#[doc(inline)]
pub use capability::IpStackCapability;

mod zone;
#[doc(inline)]
pub use zone::zone_to_scope_id;
