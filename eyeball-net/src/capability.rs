use crate::IpFamily;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::OnceLock;

/// Snapshot of the IP stacks supported by the platform.
///
/// Resolved addresses of a family the platform cannot use are dropped
/// before dialing. The snapshot is taken once, by [`IpStackCapability::system`],
/// or constructed explicitly (e.g. in tests) and injected where needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpStackCapability {
    ipv4: bool,
    ipv6: bool,
    ipv4_mapped: bool,
}

impl Default for IpStackCapability {
    fn default() -> Self {
        Self::system()
    }
}

impl IpStackCapability {
    /// Create a new [`IpStackCapability`] with explicit IPv4 and IPv6 support,
    /// without support for IPv4-mapped IPv6 sockets.
    #[must_use]
    pub const fn new(ipv4: bool, ipv6: bool) -> Self {
        Self {
            ipv4,
            ipv6,
            ipv4_mapped: false,
        }
    }

    /// A fully capable dual stack.
    #[must_use]
    pub const fn dual_stack() -> Self {
        Self {
            ipv4: true,
            ipv6: true,
            ipv4_mapped: true,
        }
    }

    /// Set whether IPv6 sockets can also serve IPv4-mapped addresses.
    #[must_use]
    pub const fn with_ipv4_mapped(mut self, ipv4_mapped: bool) -> Self {
        self.ipv4_mapped = ipv4_mapped;
        self
    }

    /// Returns `true` if the IPv4 stack is available.
    #[must_use]
    pub const fn ipv4(&self) -> bool {
        self.ipv4
    }

    /// Returns `true` if the IPv6 stack is available.
    #[must_use]
    pub const fn ipv6(&self) -> bool {
        self.ipv6
    }

    /// Returns `true` if IPv6 sockets can serve IPv4-mapped addresses.
    #[must_use]
    pub const fn ipv4_mapped(&self) -> bool {
        self.ipv4_mapped
    }

    /// The capabilities of this process, probed on first use.
    pub fn system() -> Self {
        static SYSTEM: OnceLock<IpStackCapability> = OnceLock::new();
        *SYSTEM.get_or_init(|| {
            let capability = Self::probe();
            tracing::debug!(
                ipv4 = capability.ipv4,
                ipv6 = capability.ipv6,
                ipv4_mapped = capability.ipv4_mapped,
                "probed ip stack capability"
            );
            capability
        })
    }

    /// Probe the platform for its IP stack capabilities.
    ///
    /// IPv4 is assumed to be there unless creating a socket fails because
    /// the family or protocol is not supported. IPv6 (and IPv4 mapping)
    /// is available when an IPv6 socket can bind to `[::1]`
    /// (resp. `[::ffff:127.0.0.1]` in dual mode).
    #[must_use]
    pub fn probe() -> Self {
        let ipv4 = match Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP)) {
            Ok(_) => true,
            Err(err) => !is_unsupported_family(&err),
        };
        Self {
            ipv4,
            ipv6: probe_ipv6_bind(true, Ipv6Addr::LOCALHOST),
            ipv4_mapped: probe_ipv6_bind(false, Ipv4Addr::LOCALHOST.to_ipv6_mapped()),
        }
    }

    /// A version of `ip` the platform supports, if any.
    ///
    /// IPv4-mapped IPv6 addresses are turned into plain IPv4 addresses.
    #[must_use]
    pub fn supported_ip(&self, ip: IpAddr) -> Option<IpAddr> {
        if self.ipv4
            && let Some(v4) = as_ipv4(ip)
        {
            return Some(v4.into());
        }
        if self.ipv6 {
            return Some(match ip {
                IpAddr::V4(v4) => v4.to_ipv6_mapped().into(),
                IpAddr::V6(_) => ip,
            });
        }
        None
    }

    /// `ip` as IPv4 address, if the IPv4 stack is available and `ip`
    /// is IPv4 (or IPv4-mapped IPv6).
    #[must_use]
    pub fn ipv4_only(&self, ip: IpAddr) -> Option<IpAddr> {
        if self.ipv4 {
            as_ipv4(ip).map(Into::into)
        } else {
            None
        }
    }

    /// `ip` if the IPv6 stack is available and `ip` is a non-mapped IPv6 address.
    #[must_use]
    pub fn ipv6_only(&self, ip: IpAddr) -> Option<IpAddr> {
        match ip {
            IpAddr::V6(v6) if self.ipv6 && v6.to_ipv4_mapped().is_none() => Some(ip),
            _ => None,
        }
    }

    /// Narrow `ip` for a network pinned to `family`.
    ///
    /// A zoned address can only be IPv6 and is narrowed as such.
    #[must_use]
    pub fn narrow(&self, ip: IpAddr, family: IpFamily, zoned: bool) -> Option<IpAddr> {
        match family {
            IpFamily::V6 => self.ipv6_only(ip),
            _ if zoned => self.ipv6_only(ip),
            IpFamily::V4 => self.ipv4_only(ip),
            IpFamily::Any => self.supported_ip(ip),
        }
    }
}

fn as_ipv4(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(v4) => Some(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

fn probe_ipv6_bind(only_v6: bool, ip: Ipv6Addr) -> bool {
    let Ok(socket) = Socket::new(Domain::IPV6, Type::STREAM, Some(Protocol::TCP)) else {
        return false;
    };
    if let Err(err) = socket.set_only_v6(only_v6) {
        tracing::trace!("failed to set IPV6_V6ONLY={only_v6} on probe socket: {err}");
    }
    let addr = SocketAddr::new(ip.into(), 0);
    socket.bind(&addr.into()).is_ok()
}

#[cfg(unix)]
fn is_unsupported_family(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(libc::EAFNOSUPPORT | libc::EPROTONOSUPPORT)
    )
}

#[cfg(not(unix))]
fn is_unsupported_family(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Unsupported
}
