use eyeball_error::OpaqueError;
use smol_str::SmolStr;
use std::fmt;

/// A syntactically valid domain name.
///
/// # Remarks
///
/// Equality and hashing are exact (case-sensitive), names are used
/// as given by the caller, for example as cache keys.
/// Whether the name actually exists is up to a resolver to decide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(SmolStr);

impl Domain {
    /// The maximum length of a domain label.
    pub const MAX_LABEL_LEN: usize = 63;

    /// The maximum length of a domain name.
    pub const MAX_NAME_LEN: usize = 255;

    /// Creates a domain at compile time.
    ///
    /// # Panics
    ///
    /// This function panics at **compile time** when the static string is not a valid domain.
    #[must_use]
    pub const fn from_static(s: &'static str) -> Self {
        if !is_domain_name(s) {
            panic!("static str is an invalid domain");
        }
        Self(SmolStr::new_static(s))
    }

    /// Creates the localhost [`Domain`].
    #[must_use]
    pub const fn localhost() -> Self {
        Self::from_static("localhost")
    }

    /// Returns `true` if this domain is a Fully Qualified Domain Name.
    #[must_use]
    pub fn is_fqdn(&self) -> bool {
        self.0.ends_with('.')
    }

    /// Gets the domain name as reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Gets the length of domain
    #[expect(clippy::len_without_is_empty, reason = "a domain is never empty")]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Consumes the domain, returning the inner name.
    #[must_use]
    pub fn into_inner(self) -> SmolStr {
        self.0
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for Domain {
    type Err = OpaqueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_domain_name(s) {
            Ok(Self(SmolStr::new(s)))
        } else {
            Err(OpaqueError::from_display("invalid domain"))
        }
    }
}

impl TryFrom<String> for Domain {
    type Error = OpaqueError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        if is_domain_name(&name) {
            Ok(Self(SmolStr::new(name)))
        } else {
            Err(OpaqueError::from_display("invalid domain"))
        }
    }
}

impl TryFrom<&str> for Domain {
    type Error = OpaqueError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl PartialEq<str> for Domain {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Domain {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Checks if `name` is a syntactically valid domain name
/// as described in RFC 1035 and RFC 3696.
///
/// Labels consist of letters, digits, underscores and hyphens,
/// are 1 to 63 bytes long and may neither start nor end with a hyphen.
/// A single trailing dot (FQDN) is allowed.
///
/// A name needs at least one letter or underscore: an all-numeric name
/// that failed to parse as an IP literal is not looked up either.
#[must_use]
pub const fn is_domain_name(name: &str) -> bool {
    let name = name.as_bytes();
    if name.is_empty() || name.len() > Domain::MAX_NAME_LEN {
        return false;
    }

    let mut last = b'.';
    let mut non_numeric = false;
    let mut label_len = 0;
    let mut i = 0;
    while i < name.len() {
        let c = name[i];
        match c {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                non_numeric = true;
                label_len += 1;
            }
            b'0'..=b'9' => label_len += 1,
            b'-' => {
                // label can't start with a hyphen
                if last == b'.' {
                    return false;
                }
                label_len += 1;
            }
            b'.' => {
                // label can't end with a hyphen or be empty
                if last == b'.' || last == b'-' {
                    return false;
                }
                if label_len > Domain::MAX_LABEL_LEN || label_len == 0 {
                    return false;
                }
                label_len = 0;
            }
            _ => return false,
        }
        last = c;
        i += 1;
    }

    if last == b'-' || label_len > Domain::MAX_LABEL_LEN {
        return false;
    }
    non_numeric
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_domain_name_valid() {
        for name in [
            "a-b.com",
            "example.com",
            "example.com.",
            "www.example.com",
            "_acme-challenge.example.com",
            "localhost",
            "1.a",
            "a.1",
            "x1-2-3.example",
            "EXAMPLE.COM",
        ] {
            assert!(is_domain_name(name), "{name}");
        }
    }

    #[test]
    fn test_is_domain_name_invalid() {
        let long_label = format!("{}.com", "a".repeat(64));
        let long_name = ["abcdefghi"; 26].join(".");
        for name in [
            "",
            "123",
            "1.2.3.4",
            "-a.com",
            "a-.com",
            "a..com",
            ".a.com",
            "a.com..",
            "a.com-",
            "a b.com",
            "a@b.com",
            "ex*mple.com",
            "例子.com",
            long_label.as_str(),
            long_name.as_str(),
        ] {
            assert!(!is_domain_name(name), "{name}");
        }
    }

    #[test]
    fn test_label_len_boundary() {
        let label = "a".repeat(63);
        assert!(is_domain_name(&format!("{label}.com")));
    }

    #[test]
    fn test_domain_from_str() {
        let domain: Domain = "Example.com".parse().unwrap();
        assert_eq!(domain, "Example.com");
        assert_ne!(domain, Domain::from_static("example.com"));
        assert!(!domain.is_fqdn());
        assert!("123".parse::<Domain>().is_err());
        assert!(Domain::try_from(String::from("a..b")).is_err());
    }

    #[test]
    fn test_domain_localhost() {
        assert_eq!(Domain::localhost().as_str(), "localhost");
        assert_eq!(Domain::localhost().len(), 9);
    }
}
