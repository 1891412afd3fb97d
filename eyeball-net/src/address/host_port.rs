use std::fmt;

/// Error returned for a malformed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddrError {
    reason: &'static str,
    addr: String,
}

impl AddrError {
    /// Create a new [`AddrError`] for the given (raw) address.
    pub fn new(reason: &'static str, addr: impl Into<String>) -> Self {
        Self {
            reason,
            addr: addr.into(),
        }
    }

    /// What is wrong with the address.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.reason
    }

    /// The offending address as it was given.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl fmt::Display for AddrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.addr.is_empty() {
            f.write_str(self.reason)
        } else {
            write!(f, "address {}: {}", self.addr, self.reason)
        }
    }
}

impl std::error::Error for AddrError {}

/// Splits a network address of the form `host:port`, `[host]:port`
/// or `[host%zone]:port` into host (or `host%zone`) and port.
///
/// A literal IPv6 address in `hostport` must be enclosed in square brackets.
/// Neither host nor port are validated.
pub fn split_host_port(hostport: &str) -> Result<(&str, &str), AddrError> {
    let missing_port = || AddrError::new("missing port in address", hostport);
    let too_many_colons = || AddrError::new("too many colons in address", hostport);

    // the port starts after the last colon
    let i = hostport.rfind(':').ok_or_else(missing_port)?;

    let (host, j, k) = if hostport.starts_with('[') {
        // expect the first ']' just before the last ':'
        let end = hostport
            .find(']')
            .ok_or_else(|| AddrError::new("missing ']' in address", hostport))?;
        if end + 1 == hostport.len() {
            // there can't be a ':' behind the ']' now
            return Err(missing_port());
        }
        if end + 1 != i {
            return Err(if hostport.as_bytes()[end + 1] == b':' {
                too_many_colons()
            } else {
                missing_port()
            });
        }
        (&hostport[1..end], 1, end + 1)
    } else {
        let host = &hostport[..i];
        if host.contains(':') {
            return Err(too_many_colons());
        }
        (host, 0, 0)
    };

    if hostport[j..].contains('[') {
        return Err(AddrError::new("unexpected '[' in address", hostport));
    }
    if hostport[k..].contains(']') {
        return Err(AddrError::new("unexpected ']' in address", hostport));
    }

    Ok((host, &hostport[i + 1..]))
}

/// Combines host and port into a network address of the form `host:port`,
/// or `[host]:port` if the host contains a colon or a percent sign.
#[must_use]
pub fn join_host_port(host: &str, port: &str) -> String {
    if host.contains([':', '%']) {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_host_port_valid() {
        for (input, host, port) in [
            ("localhost:http", "localhost", "http"),
            ("localhost:80", "localhost", "80"),
            ("127.0.0.1:8080", "127.0.0.1", "8080"),
            ("[::1]:80", "::1", "80"),
            ("[fe80::1%eth0]:443", "fe80::1%eth0", "443"),
            ("[localhost%lo0]:0", "localhost%lo0", "0"),
            (":80", "", "80"),
            ("example.com:", "example.com", ""),
            ("[]:80", "", "80"),
        ] {
            assert_eq!(split_host_port(input), Ok((host, port)), "{input}");
        }
    }

    #[test]
    fn test_split_host_port_invalid() {
        for (input, reason) in [
            ("golang.org", "missing port in address"),
            ("127.0.0.1", "missing port in address"),
            ("[::1]", "missing port in address"),
            ("[fe80::1%lo0]", "missing port in address"),
            ("[::1]x80", "missing port in address"),
            ("::1:80", "too many colons in address"),
            ("[::1]:80:90", "too many colons in address"),
            ("[::1", "missing ']' in address"),
            ("[foo:bar]]:80", "missing port in address"),
            ("[foo[bar]:80", "unexpected '[' in address"),
            ("fo[o:80", "unexpected '[' in address"),
            ("foo]:80", "unexpected ']' in address"),
        ] {
            let err = split_host_port(input).unwrap_err();
            assert_eq!(err.reason(), reason, "{input}");
            assert_eq!(err.addr(), input);
        }
    }

    #[test]
    fn test_addr_error_display() {
        let err = split_host_port("golang.org").unwrap_err();
        assert_eq!(err.to_string(), "address golang.org: missing port in address");
        assert_eq!(AddrError::new("invalid port", "").to_string(), "invalid port");
    }

    #[test]
    fn test_join_host_port() {
        assert_eq!(join_host_port("localhost", "80"), "localhost:80");
        assert_eq!(join_host_port("::1", "80"), "[::1]:80");
        assert_eq!(join_host_port("fe80::1%lo0", "http"), "[fe80::1%lo0]:http");
        assert_eq!(join_host_port("", "80"), ":80");
    }
}
