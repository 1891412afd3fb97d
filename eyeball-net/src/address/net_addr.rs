use super::ScopedIp;
use crate::zone_to_scope_id;
use std::fmt;
use std::net::{IpAddr, SocketAddr, SocketAddrV6};
use std::path::{Path, PathBuf};

/// The kind of a [`NetAddr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrKind {
    /// IP address and port of a stream (TCP) endpoint.
    Stream,
    /// IP address and port of a datagram (UDP) endpoint.
    Datagram,
    /// IP address of a raw IP endpoint.
    RawIp,
    /// Filesystem path of a local (unix domain) socket.
    Local,
}

impl AddrKind {
    /// Returns `true` if addresses of this kind carry an IP address.
    #[must_use]
    pub const fn has_ip(&self) -> bool {
        !matches!(self, Self::Local)
    }

    /// Returns `true` if addresses of this kind carry a port.
    #[must_use]
    pub const fn has_port(&self) -> bool {
        matches!(self, Self::Stream | Self::Datagram)
    }
}

impl fmt::Display for AddrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Stream => "stream",
            Self::Datagram => "datagram",
            Self::RawIp => "raw-ip",
            Self::Local => "local",
        })
    }
}

/// A network address, tagged by its [`AddrKind`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NetAddr {
    /// Stream endpoint.
    Stream { ip: ScopedIp, port: u16 },
    /// Datagram endpoint.
    Datagram { ip: ScopedIp, port: u16 },
    /// Raw IP endpoint.
    RawIp { ip: ScopedIp },
    /// Local socket path.
    Local { path: PathBuf },
}

impl NetAddr {
    /// Create a new [`NetAddr`] of the given kind.
    ///
    /// The port is ignored for raw IP addresses. Returns `None` for
    /// [`AddrKind::Local`], use [`NetAddr::local`] instead.
    #[must_use]
    pub fn with_ip(kind: AddrKind, ip: ScopedIp, port: u16) -> Option<Self> {
        match kind {
            AddrKind::Stream => Some(Self::Stream { ip, port }),
            AddrKind::Datagram => Some(Self::Datagram { ip, port }),
            AddrKind::RawIp => Some(Self::RawIp { ip }),
            AddrKind::Local => None,
        }
    }

    /// Create a new local socket address.
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    /// The kind of this address.
    #[must_use]
    pub const fn kind(&self) -> AddrKind {
        match self {
            Self::Stream { .. } => AddrKind::Stream,
            Self::Datagram { .. } => AddrKind::Datagram,
            Self::RawIp { .. } => AddrKind::RawIp,
            Self::Local { .. } => AddrKind::Local,
        }
    }

    /// The scoped IP address, if this is not a local address.
    #[must_use]
    pub fn scoped_ip(&self) -> Option<&ScopedIp> {
        match self {
            Self::Stream { ip, .. } | Self::Datagram { ip, .. } | Self::RawIp { ip } => Some(ip),
            Self::Local { .. } => None,
        }
    }

    /// The IP address, if this is not a local address.
    #[must_use]
    pub fn ip(&self) -> Option<IpAddr> {
        self.scoped_ip().map(ScopedIp::ip)
    }

    /// The IPv6 zone, if any.
    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        self.scoped_ip().and_then(ScopedIp::zone)
    }

    /// The port of stream and datagram addresses.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        match self {
            Self::Stream { port, .. } | Self::Datagram { port, .. } => Some(*port),
            Self::RawIp { .. } | Self::Local { .. } => None,
        }
    }

    /// The path of a local address.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Local { path } => Some(path),
            _ => None,
        }
    }

    /// Converts an IP-based address into a [`SocketAddr`].
    ///
    /// Raw IP addresses use port `0`. A zone on an IPv6 address
    /// is mapped onto the scope id of the socket address.
    #[must_use]
    pub fn to_socket_addr(&self) -> Option<SocketAddr> {
        let ip = self.scoped_ip()?;
        let port = self.port().unwrap_or_default();
        Some(match ip.ip() {
            IpAddr::V4(v4) => SocketAddr::new(v4.into(), port),
            IpAddr::V6(v6) => {
                let scope_id = ip.zone().map(zone_to_scope_id).unwrap_or_default();
                SocketAddrV6::new(v6, port, 0, scope_id).into()
            }
        })
    }
}

impl fmt::Display for NetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream { ip, port } | Self::Datagram { ip, port } => match ip.ip() {
                IpAddr::V4(_) => write!(f, "{ip}:{port}"),
                IpAddr::V6(_) => write!(f, "[{ip}]:{port}"),
            },
            Self::RawIp { ip } => ip.fmt(f),
            Self::Local { path } => path.display().fmt(f),
        }
    }
}

impl From<SocketAddr> for NetAddr {
    fn from(addr: SocketAddr) -> Self {
        Self::Stream {
            ip: ScopedIp::new(addr.ip()),
            port: addr.port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn test_net_addr_display() {
        let v4 = ScopedIp::new(Ipv4Addr::LOCALHOST.into());
        let v6 = ScopedIp::parse("fe80::1%eth0").unwrap();

        assert_eq!(
            NetAddr::with_ip(AddrKind::Stream, v4.clone(), 80).unwrap().to_string(),
            "127.0.0.1:80"
        );
        assert_eq!(
            NetAddr::with_ip(AddrKind::Datagram, v6.clone(), 53).unwrap().to_string(),
            "[fe80::1%eth0]:53"
        );
        assert_eq!(
            NetAddr::with_ip(AddrKind::RawIp, v6, 99).unwrap().to_string(),
            "fe80::1%eth0"
        );
        assert_eq!(NetAddr::local("/tmp/sock").to_string(), "/tmp/sock");
        assert!(NetAddr::with_ip(AddrKind::Local, v4, 0).is_none());
    }

    #[test]
    fn test_net_addr_accessors() {
        let addr = NetAddr::with_ip(
            AddrKind::Stream,
            ScopedIp::new(Ipv6Addr::LOCALHOST.into()),
            443,
        )
        .unwrap();
        assert_eq!(addr.kind(), AddrKind::Stream);
        assert_eq!(addr.ip(), Some(Ipv6Addr::LOCALHOST.into()));
        assert_eq!(addr.port(), Some(443));
        assert!(addr.zone().is_none());
        assert!(addr.path().is_none());
        assert_eq!(
            addr.to_socket_addr(),
            Some(SocketAddr::new(Ipv6Addr::LOCALHOST.into(), 443))
        );

        let local = NetAddr::local("/run/app.sock");
        assert_eq!(local.kind(), AddrKind::Local);
        assert!(local.ip().is_none());
        assert!(local.port().is_none());
        assert!(local.to_socket_addr().is_none());
    }

    #[test]
    fn test_numeric_zone_scope_id() {
        let addr = NetAddr::with_ip(
            AddrKind::Stream,
            ScopedIp::parse("fe80::1%7").unwrap(),
            22,
        )
        .unwrap();
        match addr.to_socket_addr() {
            Some(SocketAddr::V6(v6)) => assert_eq!(v6.scope_id(), 7),
            other => panic!("unexpected socket addr: {other:?}"),
        }
    }
}
