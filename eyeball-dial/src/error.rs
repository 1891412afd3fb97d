use eyeball_error::{BoxError, static_str_error};
use smol_str::SmolStr;
use std::{error::Error as StdError, fmt, io};

static_str_error! {
    #[doc = "missing address"]
    pub struct MissingAddressError;
}

static_str_error! {
    #[doc = "no suitable address found"]
    pub struct NoSuitableAddressError;
}

static_str_error! {
    #[doc = "invalid domain name"]
    pub struct InvalidDomainError;
}

static_str_error! {
    #[doc = "i/o timeout"]
    pub struct TimeoutError;
}

impl TimeoutError {
    /// Always `true`.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        true
    }

    /// Always `true`, a timed out operation may succeed when retried.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        true
    }
}

/// Classification of a failed dial or resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialErrorKind {
    /// Unknown network, missing address, invalid port or
    /// a malformed literal.
    MalformedInput,
    /// The resolver failed or the host is not a valid domain name.
    Resolution,
    /// The host resolved, but no usable address remained
    /// after capability narrowing and filtering.
    NoSuitableAddress,
    /// The deadline passed during resolution or connecting.
    Timeout,
    /// The connection attempt itself failed.
    Connect,
}

impl fmt::Display for DialErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MalformedInput => "malformed input",
            Self::Resolution => "resolution failure",
            Self::NoSuitableAddress => "no suitable address",
            Self::Timeout => "timeout",
            Self::Connect => "connect failure",
        })
    }
}

/// Error returned when turning an address into an [`AddrList`].
///
/// It displays as its source, [`ResolveError::kind`] tells
/// what went wrong without having to downcast.
///
/// [`AddrList`]: eyeball_net::address::AddrList
#[derive(Debug)]
pub struct ResolveError {
    kind: DialErrorKind,
    source: BoxError,
}

impl ResolveError {
    pub(crate) fn new(kind: DialErrorKind, source: impl Into<BoxError>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    pub(crate) fn malformed(source: impl Into<BoxError>) -> Self {
        Self::new(DialErrorKind::MalformedInput, source)
    }

    pub(crate) fn resolution(source: impl Into<BoxError>) -> Self {
        Self::new(DialErrorKind::Resolution, source)
    }

    pub(crate) fn timeout() -> Self {
        Self::new(DialErrorKind::Timeout, TimeoutError)
    }

    pub(crate) fn no_suitable_address() -> Self {
        Self::new(DialErrorKind::NoSuitableAddress, NoSuitableAddressError)
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> DialErrorKind {
        self.kind
    }

    /// Returns `true` if resolution did not finish before the deadline.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == DialErrorKind::Timeout
    }

    /// Consume the error, returning the underlying cause.
    #[must_use]
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.source.fmt(f)
    }
}

impl StdError for ResolveError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Error returned by a failed dial.
///
/// Displays as `dial <network> <address>: <cause>`, the address being
/// omitted when the failure happened before an address was picked.
#[derive(Debug)]
pub struct DialError {
    kind: DialErrorKind,
    network: SmolStr,
    addr: Option<String>,
    source: BoxError,
}

impl DialError {
    pub(crate) fn new(
        kind: DialErrorKind,
        network: &str,
        addr: Option<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            network: SmolStr::new(network),
            addr,
            source: source.into(),
        }
    }

    pub(crate) fn from_resolve(network: &str, err: ResolveError) -> Self {
        Self::new(err.kind, network, None, err.source)
    }

    /// Classify a failed connection attempt.
    pub(crate) fn from_connect(network: &str, addr: String, source: BoxError) -> Self {
        let kind = if is_timeout_error(source.as_ref()) {
            DialErrorKind::Timeout
        } else {
            DialErrorKind::Connect
        };
        Self::new(kind, network, Some(addr), source)
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> DialErrorKind {
        self.kind
    }

    /// The operation that failed, always `"dial"`.
    #[must_use]
    pub fn op(&self) -> &'static str {
        "dial"
    }

    /// The network as passed to the dialer.
    #[must_use]
    pub fn network(&self) -> &str {
        &self.network
    }

    /// The address of the attempt that failed, if one was made.
    #[must_use]
    pub fn addr(&self) -> Option<&str> {
        self.addr.as_deref()
    }

    /// Returns `true` if the deadline passed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == DialErrorKind::Timeout
    }

    /// Returns `true` if retrying the dial may succeed.
    ///
    /// Only timeouts are considered temporary.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.is_timeout()
    }

    /// Consume the error, returning the underlying cause.
    #[must_use]
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

impl fmt::Display for DialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op(), self.network)?;
        if let Some(addr) = &self.addr {
            write!(f, " {addr}")?;
        }
        write!(f, ": {}", self.source)
    }
}

impl StdError for DialError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

fn is_timeout_error(err: &(dyn StdError + 'static)) -> bool {
    eyeball_error::chain(err).any(|e| {
        e.is::<TimeoutError>()
            || e.downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::TimedOut)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyeball_error::ErrorExt;

    #[test]
    fn test_timeout_error() {
        let err = TimeoutError::new();
        assert!(err.is_timeout());
        assert!(err.is_temporary());
        assert_eq!(err.to_string(), "i/o timeout");
    }

    #[test]
    fn test_dial_error_display() {
        let err = DialError::new(
            DialErrorKind::Connect,
            "tcp",
            Some("127.0.0.1:80".to_owned()),
            io::Error::from(io::ErrorKind::ConnectionRefused),
        );
        assert!(
            err.to_string().starts_with("dial tcp 127.0.0.1:80: "),
            "{err}"
        );

        let err = DialError::from_resolve("udp6", ResolveError::no_suitable_address());
        assert_eq!(err.to_string(), "dial udp6: no suitable address found");
        assert_eq!(err.kind(), DialErrorKind::NoSuitableAddress);
        assert!(err.addr().is_none());
        assert!(err.has::<NoSuitableAddressError>());
    }

    #[test]
    fn test_connect_error_classification() {
        let err = DialError::from_connect(
            "tcp",
            "[::1]:443".to_owned(),
            TimeoutError::new().context("connect"),
        );
        assert!(err.is_timeout());
        assert!(err.is_temporary());

        let err = DialError::from_connect(
            "tcp",
            "[::1]:443".to_owned(),
            io::Error::from(io::ErrorKind::TimedOut).into(),
        );
        assert_eq!(err.kind(), DialErrorKind::Timeout);

        let err = DialError::from_connect(
            "tcp",
            "[::1]:443".to_owned(),
            io::Error::from(io::ErrorKind::ConnectionRefused).into(),
        );
        assert_eq!(err.kind(), DialErrorKind::Connect);
        assert!(!err.is_temporary());
    }
}
