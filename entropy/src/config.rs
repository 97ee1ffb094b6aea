use http::Uri;
use qrand_types::PacketShape;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// The ANU Quantum Random Numbers Server JSON API.
pub const DEFAULT_ENDPOINT: &str = "https://qrng.anu.edu.au/API/jsonI.php";

/// Settings for a [`RandomAcquirer`](crate::RandomAcquirer), fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquirerConfig {
    /// Base URL of the remote service, without a query string.
    pub endpoint: String,
    /// Shape requested on every fetch, however few bytes are still missing.
    pub packet: PacketShape,
    /// Applied to the GET only; decoding failures are never retried.
    pub retry: RetryPolicy,
    /// Bound on each GET and each body read.
    #[serde(rename = "request_timeout_ms", with = "duration_ms")]
    pub request_timeout: Duration,
}

impl Default for AcquirerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            packet: PacketShape::default(),
            retry: RetryPolicy::default(),
            request_timeout: qrand_transport::client::DEFAULT_TIMEOUT,
        }
    }
}

impl AcquirerConfig {
    /// Parse a YAML document; missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Validate that the configuration is self-consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.request_uri()?;

        if !self.packet.is_within_limits() {
            return Err(ConfigError::PacketShape {
                length: self.packet.length,
                size: self.packet.size,
            });
        }

        if self.retry.attempts == 0 {
            return Err(ConfigError::Retry("attempts must be at least 1".into()));
        }

        if !self.retry.backoff.is_finite() || self.retry.backoff < 1.0 {
            return Err(ConfigError::Retry(format!(
                "backoff must be a finite factor >= 1, got {}",
                self.retry.backoff
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::Timeout);
        }

        Ok(())
    }

    /// The full request URI: endpoint plus the packet-shape query.
    pub fn request_uri(&self) -> Result<Uri, ConfigError> {
        let base: Uri = self
            .endpoint
            .parse()
            .map_err(|e: http::uri::InvalidUri| ConfigError::Endpoint(e.to_string()))?;

        match base.scheme_str() {
            Some("http") | Some("https") => {}
            _ => {
                return Err(ConfigError::Endpoint(format!(
                    "{} is not an http(s) url",
                    self.endpoint
                )))
            }
        }
        if base.query().is_some() {
            return Err(ConfigError::Endpoint(format!(
                "{} must not carry a query string",
                self.endpoint
            )));
        }

        format!("{}?{}", self.endpoint, self.packet.query())
            .parse()
            .map_err(|e: http::uri::InvalidUri| ConfigError::Endpoint(e.to_string()))
    }
}

/// Errors arising from acquirer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error("packet shape {length}x{size} outside service limits (1..=1024 items of 1..=1024 bytes)")]
    PacketShape { length: usize, size: usize },
    #[error("invalid retry policy: {0}")]
    Retry(String),
    #[error("request timeout must be non-zero")]
    Timeout,
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

pub(crate) mod option_duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrand_types::MAX_PACKET_LENGTH;

    #[test]
    fn default_config_is_valid() {
        let cfg = AcquirerConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.retry.attempts, 2);
        assert_eq!(cfg.retry.delay, Duration::from_secs(1));
    }

    #[test]
    fn request_uri_carries_packet_shape() {
        let uri = AcquirerConfig::default().request_uri().unwrap();
        assert_eq!(
            uri.to_string(),
            "https://qrng.anu.edu.au/API/jsonI.php?length=10&type=hex16&size=2"
        );
    }

    #[test]
    fn endpoint_with_query_is_invalid() {
        let cfg = AcquirerConfig {
            endpoint: "https://example.com/api?x=1".into(),
            ..AcquirerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Endpoint(_))));
    }

    #[test]
    fn non_http_endpoint_is_invalid() {
        let cfg = AcquirerConfig {
            endpoint: "ftp://example.com/random".into(),
            ..AcquirerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Endpoint(_))));
    }

    #[test]
    fn oversized_packet_is_invalid() {
        let cfg = AcquirerConfig {
            packet: PacketShape::new(MAX_PACKET_LENGTH + 1, 2),
            ..AcquirerConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::PacketShape { length: 1025, size: 2 })
        ));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let cfg = AcquirerConfig {
            retry: RetryPolicy::new(0, Duration::ZERO),
            ..AcquirerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Retry(_))));
    }

    #[test]
    fn shrinking_backoff_is_invalid() {
        let cfg = AcquirerConfig {
            retry: RetryPolicy::default().with_backoff(0.5, Duration::from_secs(1)),
            ..AcquirerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn loads_partial_yaml_over_defaults() {
        let cfg = AcquirerConfig::from_yaml_str(
            r#"
endpoint: http://127.0.0.1:9000/random
packet:
  length: 4
  size: 8
retry:
  attempts: 5
  delay_ms: 250
  backoff: 2.0
  max_delay_ms: 2000
"#,
        )
        .unwrap();

        assert_eq!(cfg.endpoint, "http://127.0.0.1:9000/random");
        assert_eq!(cfg.packet, PacketShape::new(4, 8));
        assert_eq!(cfg.retry.attempts, 5);
        assert_eq!(cfg.retry.delay, Duration::from_millis(250));
        assert_eq!(cfg.retry.max_delay, Some(Duration::from_secs(2)));
        assert_eq!(cfg.request_timeout, qrand_transport::client::DEFAULT_TIMEOUT);
    }

    #[test]
    fn yaml_round_trips_through_serialize() {
        let cfg = AcquirerConfig::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert!(yaml.contains("request_timeout_ms: 30000"));
        assert_eq!(AcquirerConfig::from_yaml_str(&yaml).unwrap(), cfg);
    }

    #[test]
    fn huge_durations_saturate_when_serialized() {
        let cfg = AcquirerConfig {
            request_timeout: Duration::MAX,
            retry: RetryPolicy::default().with_backoff(2.0, Duration::MAX),
            ..AcquirerConfig::default()
        };
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        assert!(yaml.contains("request_timeout_ms: 18446744073709551615"));
        assert!(yaml.contains("max_delay_ms: 18446744073709551615"));
    }

    #[test]
    fn invalid_yaml_values_are_rejected() {
        let err = AcquirerConfig::from_yaml_str("request_timeout_ms: 0").unwrap_err();
        assert!(matches!(err, ConfigError::Timeout));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AcquirerConfig::from_yaml_file("/nonexistent/qrand.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
