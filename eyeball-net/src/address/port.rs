use super::AddrError;
use super::ip::dtoi;
use eyeball_error::BoxError;
use std::fmt;

/// The transport a port number is looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Transmission Control Protocol.
    Tcp,
    /// User Datagram Protocol.
    Udp,
}

impl Transport {
    /// The canonical name of the transport.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps service names such as `http` to a port number.
///
/// The returned value is bound-checked by the caller,
/// so implementations do not have to care about the port range.
pub trait ServiceLookup: Send + Sync + 'static {
    /// Look up the port for the named service on the given transport.
    fn lookup_port(&self, transport: Transport, service: &str) -> Result<u32, BoxError>;
}

impl<F> ServiceLookup for F
where
    F: Fn(Transport, &str) -> Result<u32, BoxError> + Send + Sync + 'static,
{
    fn lookup_port(&self, transport: Transport, service: &str) -> Result<u32, BoxError> {
        (self)(transport, service)
    }
}

/// Error returned when a service name is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownServiceError {
    transport: Transport,
    service: String,
}

impl UnknownServiceError {
    /// Create a new [`UnknownServiceError`].
    pub fn new(transport: Transport, service: impl Into<String>) -> Self {
        Self {
            transport,
            service: service.into(),
        }
    }

    /// The service that could not be found.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for UnknownServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown port {}/{}", self.transport, self.service)
    }
}

impl std::error::Error for UnknownServiceError {}

/// A built-in table of well known services (RFC 6335).
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct WellKnownServices;

impl WellKnownServices {
    const TCP: &'static [(&'static str, u32)] = &[
        ("ftp", 21),
        ("ftps", 990),
        ("gopher", 70),
        ("http", 80),
        ("https", 443),
        ("imap2", 143),
        ("imap3", 220),
        ("imaps", 993),
        ("pop3", 110),
        ("pop3s", 995),
        ("smtp", 25),
        ("ssh", 22),
        ("submissions", 465),
        ("telnet", 23),
    ];

    const UDP: &'static [(&'static str, u32)] = &[("domain", 53)];

    /// Create a new [`WellKnownServices`] table.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ServiceLookup for WellKnownServices {
    fn lookup_port(&self, transport: Transport, service: &str) -> Result<u32, BoxError> {
        let table = match transport {
            Transport::Tcp => Self::TCP,
            Transport::Udp => Self::UDP,
        };
        table
            .iter()
            .find_map(|(name, port)| name.eq_ignore_ascii_case(service).then_some(*port))
            .ok_or_else(|| UnknownServiceError::new(transport, service).into())
    }
}

/// Parses `port` as a service port number for the given transport.
///
/// A port made up solely of decimal digits is used as is,
/// anything else is handed to `services`. Either way the
/// result has to fit in `0..=65535`.
pub fn parse_port(
    transport: Transport,
    port: &str,
    services: &dyn ServiceLookup,
) -> Result<u16, BoxError> {
    let n = if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
        match dtoi(port.as_bytes(), 0) {
            Some((n, _)) => n,
            // too big for the scanner
            None => return Err(AddrError::new("invalid port", port).into()),
        }
    } else {
        services.lookup_port(transport, port)?
    };
    u16::try_from(n).map_err(|_| AddrError::new("invalid port", port).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_numeric() {
        let services = WellKnownServices::new();
        for (input, expected) in [("0", 0), ("80", 80), ("00443", 443), ("65535", 65535)] {
            assert_eq!(
                parse_port(Transport::Tcp, input, &services).unwrap(),
                expected,
                "{input}"
            );
        }
    }

    #[test]
    fn test_parse_port_out_of_range() {
        let services = WellKnownServices::new();
        for input in ["65536", "99999", "123456789012"] {
            let err = parse_port(Transport::Tcp, input, &services).unwrap_err();
            let err = err.downcast_ref::<AddrError>().unwrap();
            assert_eq!(err.reason(), "invalid port", "{input}");
            assert_eq!(err.addr(), input);
        }
    }

    #[test]
    fn test_parse_port_service_name() {
        let services = WellKnownServices::new();
        assert_eq!(parse_port(Transport::Tcp, "http", &services).unwrap(), 80);
        assert_eq!(parse_port(Transport::Tcp, "HTTPS", &services).unwrap(), 443);
        assert_eq!(parse_port(Transport::Udp, "domain", &services).unwrap(), 53);

        let err = parse_port(Transport::Udp, "http", &services).unwrap_err();
        assert!(err.downcast_ref::<UnknownServiceError>().is_some());
        assert_eq!(err.to_string(), "unknown port udp/http");

        assert!(parse_port(Transport::Tcp, "", &services).is_err());
        assert!(parse_port(Transport::Tcp, "-1", &services).is_err());
    }

    #[test]
    fn test_parse_port_custom_lookup() {
        let services = |_: Transport, name: &str| -> Result<u32, BoxError> {
            match name {
                "big" => Ok(70_000),
                _ => Ok(8080),
            }
        };
        assert_eq!(parse_port(Transport::Tcp, "alt", &services).unwrap(), 8080);
        let err = parse_port(Transport::Tcp, "big", &services).unwrap_err();
        assert!(err.downcast_ref::<AddrError>().is_some());
    }
}
