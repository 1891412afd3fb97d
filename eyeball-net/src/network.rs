use crate::address::{AddrKind, Transport};
use smol_str::SmolStr;
use std::{fmt, str::FromStr};

/// IP family a network is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IpFamily {
    /// Either family.
    #[default]
    Any,
    /// IPv4 only.
    V4,
    /// IPv6 only.
    V6,
}

impl IpFamily {
    const fn suffix(&self) -> &'static str {
        match self {
            Self::Any => "",
            Self::V4 => "4",
            Self::V6 => "6",
        }
    }
}

/// Socket type of a unix domain network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnixType {
    /// `unix`
    Stream,
    /// `unixgram`
    Datagram,
    /// `unixpacket`
    SeqPacket,
}

/// A classified network token such as `tcp`, `udp6`, `ip4:icmp` or `unixgram`.
///
/// # Example
///
/// ```
/// use eyeball_net::{IpFamily, Network};
///
/// let network: Network = "tcp6".parse().unwrap();
/// assert_eq!(network, Network::Tcp(IpFamily::V6));
/// assert!(network.is_stream());
///
/// assert!("sctp".parse::<Network>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Network {
    /// `tcp`, `tcp4`, `tcp6`
    Tcp(IpFamily),
    /// `udp`, `udp4`, `udp6`
    Udp(IpFamily),
    /// `ip`, `ip4`, `ip6`, optionally followed by `:protocol`
    Ip {
        family: IpFamily,
        protocol: Option<SmolStr>,
    },
    /// `unix`, `unixgram`, `unixpacket`
    Unix(UnixType),
}

impl Network {
    /// The kind of addresses used on this network.
    #[must_use]
    pub const fn addr_kind(&self) -> AddrKind {
        match self {
            Self::Tcp(_) => AddrKind::Stream,
            Self::Udp(_) => AddrKind::Datagram,
            Self::Ip { .. } => AddrKind::RawIp,
            Self::Unix(_) => AddrKind::Local,
        }
    }

    /// The IP family this network is pinned to,
    /// [`IpFamily::Any`] for unix networks.
    #[must_use]
    pub const fn family(&self) -> IpFamily {
        match self {
            Self::Tcp(family) | Self::Udp(family) | Self::Ip { family, .. } => *family,
            Self::Unix(_) => IpFamily::Any,
        }
    }

    /// The transport used for port lookups, if the network has ports.
    #[must_use]
    pub const fn transport(&self) -> Option<Transport> {
        match self {
            Self::Tcp(_) => Some(Transport::Tcp),
            Self::Udp(_) => Some(Transport::Udp),
            Self::Ip { .. } | Self::Unix(_) => None,
        }
    }

    /// Returns `true` for the TCP networks, the only ones which are raced.
    #[must_use]
    pub const fn is_stream(&self) -> bool {
        matches!(self, Self::Tcp(_))
    }

    /// The IP protocol qualifier of a raw IP network, if any.
    #[must_use]
    pub fn protocol(&self) -> Option<&str> {
        match self {
            Self::Ip { protocol, .. } => protocol.as_deref(),
            _ => None,
        }
    }

    /// The IP protocol number of a raw IP network.
    ///
    /// The qualifier is either a decimal number or one of the
    /// well known names `icmp`, `igmp`, `tcp`, `udp`, `ipv6-icmp` and `ospf`.
    /// Returns `Ok(None)` when no qualifier was given.
    pub fn protocol_number(&self) -> Result<Option<u8>, UnknownNetworkError> {
        let Some(protocol) = self.protocol() else {
            return Ok(None);
        };
        let number = match protocol.to_ascii_lowercase().as_str() {
            "icmp" => 1,
            "igmp" => 2,
            "tcp" => 6,
            "udp" => 17,
            "ipv6-icmp" => 58,
            "ospf" => 89,
            other => other
                .parse()
                .map_err(|_| UnknownNetworkError::new(self.to_string()))?,
        };
        Ok(Some(number))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(family) => write!(f, "tcp{}", family.suffix()),
            Self::Udp(family) => write!(f, "udp{}", family.suffix()),
            Self::Ip { family, protocol } => {
                write!(f, "ip{}", family.suffix())?;
                match protocol {
                    Some(protocol) => write!(f, ":{protocol}"),
                    None => Ok(()),
                }
            }
            Self::Unix(UnixType::Stream) => f.write_str("unix"),
            Self::Unix(UnixType::Datagram) => f.write_str("unixgram"),
            Self::Unix(UnixType::SeqPacket) => f.write_str("unixpacket"),
        }
    }
}

impl FromStr for Network {
    type Err = UnknownNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((base, protocol)) = s.rsplit_once(':') {
            // the protocol is only looked at once a raw socket is opened
            let family = match base {
                "ip" => IpFamily::Any,
                "ip4" => IpFamily::V4,
                "ip6" => IpFamily::V6,
                _ => return Err(UnknownNetworkError::new(s)),
            };
            return Ok(Self::Ip {
                family,
                protocol: (!protocol.is_empty()).then(|| SmolStr::new(protocol)),
            });
        }

        Ok(match s {
            "tcp" => Self::Tcp(IpFamily::Any),
            "tcp4" => Self::Tcp(IpFamily::V4),
            "tcp6" => Self::Tcp(IpFamily::V6),
            "udp" => Self::Udp(IpFamily::Any),
            "udp4" => Self::Udp(IpFamily::V4),
            "udp6" => Self::Udp(IpFamily::V6),
            "ip" => Self::Ip {
                family: IpFamily::Any,
                protocol: None,
            },
            "ip4" => Self::Ip {
                family: IpFamily::V4,
                protocol: None,
            },
            "ip6" => Self::Ip {
                family: IpFamily::V6,
                protocol: None,
            },
            "unix" => Self::Unix(UnixType::Stream),
            "unixgram" => Self::Unix(UnixType::Datagram),
            "unixpacket" => Self::Unix(UnixType::SeqPacket),
            _ => return Err(UnknownNetworkError::new(s)),
        })
    }
}

impl TryFrom<&str> for Network {
    type Error = UnknownNetworkError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Error returned for a network token that is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNetworkError(SmolStr);

impl UnknownNetworkError {
    /// Create a new [`UnknownNetworkError`] for the given network token.
    pub fn new(network: impl AsRef<str>) -> Self {
        Self(SmolStr::new(network))
    }

    /// The rejected network token.
    #[must_use]
    pub fn network(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnknownNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown network {}", self.0)
    }
}

impl std::error::Error for UnknownNetworkError {}
