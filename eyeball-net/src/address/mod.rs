//! Parsing and representation of network addresses.
//!
//! Nothing in this module performs I/O: names are only validated here,
//! resolving them is the job of a resolver.

mod ip;
#[doc(inline)]
pub use ip::{ScopedIp, parse_ipv4, parse_ipv6, split_host_zone};

mod domain;
#[doc(inline)]
pub use domain::{Domain, is_domain_name};

mod host_port;
#[doc(inline)]
pub use host_port::{AddrError, join_host_port, split_host_port};

mod port;
#[doc(inline)]
pub use port::{ServiceLookup, Transport, UnknownServiceError, WellKnownServices, parse_port};

mod net_addr;
#[doc(inline)]
pub use net_addr::{AddrKind, NetAddr};

mod list;
#[doc(inline)]
pub use list::{AddrKindMismatch, AddrList};
