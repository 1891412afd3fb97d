//! Literal IP address parsing.
//!
//! The parsers in this module operate on bytes and are deliberately strict:
//! a literal either covers the full input or it is not a literal at all.

use smol_str::SmolStr;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Bigger than we need, not too big to worry about overflow.
const BIG: u32 = 0xFF_FFFF;

const IPV4_LEN: usize = 4;
const IPV6_LEN: usize = 16;

/// Decimal scanner shared by the literal parsers.
///
/// Reads the run of ASCII digits starting at `start`,
/// returning the value and the index of the first non-digit.
pub(crate) fn dtoi(s: &[u8], start: usize) -> Option<(u32, usize)> {
    let mut n: u32 = 0;
    let mut i = start;
    while i < s.len() && s[i].is_ascii_digit() {
        n = n * 10 + u32::from(s[i] - b'0');
        if n >= BIG {
            return None;
        }
        i += 1;
    }
    (i != start).then_some((n, i))
}

/// Hexadecimal scanner for a single IPv6 group of at most 4 digits.
fn xtoi(s: &[u8], start: usize) -> Option<(u32, usize)> {
    let mut n: u32 = 0;
    let mut i = start;
    while i < s.len() {
        let digit = match s[i] {
            c @ b'0'..=b'9' => c - b'0',
            c @ b'a'..=b'f' => c - b'a' + 10,
            c @ b'A'..=b'F' => c - b'A' + 10,
            _ => break,
        };
        if i - start == 4 {
            return None;
        }
        n = n * 16 + u32::from(digit);
        i += 1;
    }
    (i != start).then_some((n, i))
}

/// Parses `s` as a dotted-quad IPv4 literal such as `192.0.2.1`.
///
/// Exactly four decimal octets in the range `0..=255` are accepted,
/// separated by single dots and with nothing before or after them.
#[must_use]
pub fn parse_ipv4(s: &str) -> Option<Ipv4Addr> {
    parse_ipv4_bytes(s.as_bytes())
}

fn parse_ipv4_bytes(s: &[u8]) -> Option<Ipv4Addr> {
    let mut octets = [0u8; IPV4_LEN];
    let mut i = 0;
    for (j, octet) in octets.iter_mut().enumerate() {
        if i >= s.len() {
            // missing octets
            return None;
        }
        if j > 0 {
            if s[i] != b'.' {
                return None;
            }
            i += 1;
        }
        let (n, next) = dtoi(s, i)?;
        *octet = u8::try_from(n).ok()?;
        i = next;
    }
    (i == s.len()).then(|| Ipv4Addr::from(octets))
}

/// Parses `s` as an IPv6 literal as described in RFC 4291 and RFC 5952.
///
/// When `zone_allowed` is `true` a scoped literal (RFC 4007) such as
/// `fe80::1%eth0` is accepted as well, in which case the zone is returned
/// alongside the address. An empty zone is reported as `None`.
#[must_use]
pub fn parse_ipv6(s: &str, zone_allowed: bool) -> Option<(Ipv6Addr, Option<SmolStr>)> {
    let (s, zone) = if zone_allowed {
        split_host_zone(s)
    } else {
        (s, "")
    };
    let ip = parse_ipv6_bytes(s.as_bytes())?;
    Some((ip, (!zone.is_empty()).then(|| SmolStr::new(zone))))
}

fn parse_ipv6_bytes(s: &[u8]) -> Option<Ipv6Addr> {
    let mut ip = [0u8; IPV6_LEN];
    // position of the ellipsis in ip
    let mut ellipsis: Option<usize> = None;
    // index in s
    let mut i = 0;

    if s.len() >= 2 && s[0] == b':' && s[1] == b':' {
        ellipsis = Some(0);
        i = 2;
        if i == s.len() {
            return Some(Ipv6Addr::UNSPECIFIED);
        }
    }

    let mut j = 0;
    while j < IPV6_LEN {
        let (n, i1) = xtoi(s, i)?;

        // trailing IPv4 literal
        if i1 < s.len() && s[i1] == b'.' {
            if ellipsis.is_none() && j != IPV6_LEN - IPV4_LEN {
                return None;
            }
            if j + IPV4_LEN > IPV6_LEN {
                return None;
            }
            let ip4 = parse_ipv4_bytes(&s[i..])?;
            ip[j..j + IPV4_LEN].copy_from_slice(&ip4.octets());
            i = s.len();
            j += IPV4_LEN;
            break;
        }

        let [hi, lo] = u16::try_from(n).ok()?.to_be_bytes();
        ip[j] = hi;
        ip[j + 1] = lo;
        j += 2;

        i = i1;
        if i == s.len() {
            break;
        }

        if s[i] != b':' || i + 1 == s.len() {
            return None;
        }
        i += 1;

        if s[i] == b':' {
            if ellipsis.is_some() {
                return None;
            }
            ellipsis = Some(j);
            i += 1;
            if i == s.len() {
                break;
            }
        }
    }

    if i != s.len() {
        return None;
    }

    if j < IPV6_LEN {
        let ellipsis = ellipsis?;
        let gap = IPV6_LEN - j;
        ip.copy_within(ellipsis..j, ellipsis + gap);
        ip[ellipsis..ellipsis + gap].fill(0);
    } else if ellipsis.is_some() {
        // an ellipsis must represent at least one zero group
        return None;
    }

    Some(Ipv6Addr::from(ip))
}

/// Splits a host into the host itself and its IPv6 zone.
///
/// The zone is everything after the last `%`, provided that
/// the `%` is not the very first character.
#[must_use]
pub fn split_host_zone(s: &str) -> (&str, &str) {
    match s.rfind('%') {
        Some(i) if i > 0 => (&s[..i], &s[i + 1..]),
        _ => (s, ""),
    }
}

/// An IP address with an optional IPv6 zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedIp {
    ip: IpAddr,
    zone: Option<SmolStr>,
}

impl ScopedIp {
    /// Create a new [`ScopedIp`] without zone.
    #[must_use]
    pub const fn new(ip: IpAddr) -> Self {
        Self { ip, zone: None }
    }

    /// Create a new [`ScopedIp`] with an optional zone.
    ///
    /// An empty zone is normalised to `None`.
    #[must_use]
    pub fn with_zone(ip: IpAddr, zone: Option<SmolStr>) -> Self {
        Self {
            ip,
            zone: zone.filter(|z| !z.is_empty()),
        }
    }

    /// Parse a literal IPv4 or (possibly scoped) IPv6 address.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(ip) = parse_ipv4(s) {
            return Some(Self::new(ip.into()));
        }
        let (ip, zone) = parse_ipv6(s, true)?;
        Some(Self::with_zone(ip.into(), zone))
    }

    /// The IP address.
    #[must_use]
    pub const fn ip(&self) -> IpAddr {
        self.ip
    }

    /// The zone, if any.
    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }
}

impl From<IpAddr> for ScopedIp {
    fn from(ip: IpAddr) -> Self {
        Self::new(ip)
    }
}

impl fmt::Display for ScopedIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.zone {
            Some(zone) => write!(f, "{}%{zone}", self.ip),
            None => self.ip.fmt(f),
        }
    }
}
