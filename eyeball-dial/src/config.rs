use crate::{Dialer, FilterPolicy};
use eyeball_dns::{BoxResolver, CacheResolver, Resolver, SystemResolver};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Serializable settings of a [`Dialer`].
///
/// Durations are expressed in (fractional) seconds.
/// All fields are optional:
///
/// ```
/// use eyeball_dial::{DialerConfig, FilterPolicy};
/// use std::time::Duration;
///
/// let config: DialerConfig = serde_json::from_str(
///     r#"{"timeout": 2.5, "filter": "dual_stack", "cache_ttl": 60}"#,
/// )
/// .unwrap();
/// assert_eq!(config.timeout, Some(Duration::from_millis(2500)));
/// assert_eq!(config.filter, FilterPolicy::DualStack);
///
/// let dialer = config.into_dialer();
/// assert_eq!(dialer.timeout(), Some(Duration::from_millis(2500)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialerConfig {
    /// Timeout of a whole dial, resolution included. Zero means none.
    #[serde(with = "secs", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    /// Keep-alive period of stream connections. Zero disables keep-alive.
    #[serde(with = "secs", skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<Duration>,
    /// How addresses to dial are selected.
    pub filter: FilterPolicy,
    /// Cache resolved hosts for this long. Zero caches forever,
    /// `None` disables the cache.
    #[serde(with = "secs", skip_serializing_if = "Option::is_none")]
    pub cache_ttl: Option<Duration>,
}

impl DialerConfig {
    /// Build a [`Dialer`] using the system resolver and sockets.
    #[must_use]
    pub fn into_dialer(self) -> Dialer<BoxResolver> {
        let resolver = match self.cache_ttl {
            Some(ttl) => CacheResolver::new(ttl).boxed(),
            None => SystemResolver::new().boxed(),
        };
        let mut dialer = Dialer::new().with_resolver(resolver).with_filter(self.filter);
        if let Some(timeout) = self.timeout {
            dialer = dialer.with_timeout(timeout);
        }
        if let Some(period) = self.keep_alive {
            dialer = dialer.with_keep_alive(period);
        }
        dialer
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        value: &Option<Duration>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => ser.serialize_f64(duration.as_secs_f64()),
            None => ser.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(de)?
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(D::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config: DialerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DialerConfig::default());
        assert_eq!(config.filter, FilterPolicy::Default);
        assert_eq!(serde_json::to_string(&config).unwrap(), r#"{"filter":"default"}"#);
    }

    #[test]
    fn test_config_serde() {
        let config = DialerConfig {
            timeout: Some(Duration::from_millis(1500)),
            keep_alive: Some(Duration::from_secs(15)),
            filter: FilterPolicy::Compose(vec![FilterPolicy::Shuffle, FilterPolicy::Max(4)]),
            cache_ttl: Some(Duration::ZERO),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"timeout":1.5,"keep_alive":15.0,"filter":{"compose":["shuffle",{"max":4}]},"cache_ttl":0.0}"#
        );
        let parsed: DialerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_rejects_bad_durations() {
        assert!(serde_json::from_str::<DialerConfig>(r#"{"timeout": -1}"#).is_err());
        assert!(serde_json::from_str::<DialerConfig>(r#"{"timeout": "1s"}"#).is_err());
        assert!(serde_json::from_str::<DialerConfig>(r#"{"filter": "nearest"}"#).is_err());
    }

    #[tokio::test]
    async fn test_into_dialer() {
        let dialer = DialerConfig {
            timeout: Some(Duration::from_secs(3)),
            keep_alive: Some(Duration::from_secs(30)),
            cache_ttl: Some(Duration::from_secs(60)),
            ..Default::default()
        }
        .into_dialer();
        assert_eq!(dialer.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(dialer.keep_alive(), Some(Duration::from_secs(30)));
        assert!(dialer.deadline().is_none());

        let conn = dialer.dial("udp", "127.0.0.1:9").await.unwrap();
        assert_eq!(
            conn.peer_addr().unwrap().to_string(),
            "127.0.0.1:9",
        );
    }
}
