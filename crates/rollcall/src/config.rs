//! Barrier configuration.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// How an incoming `ACK` is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AckPolicy {
    /// An `ACK` proves its sender is up and marks it ready.
    #[default]
    CountsAsReady,
    /// An `ACK` only stops our `READY` retries to that peer; readiness
    /// requires the peer's own `READY`.
    ReadyOnly,
}

/// Tuning for one barrier round.
///
/// Every field has a default, so an empty TOML file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrierConfig {
    /// UDP port to bind locally and to address peers on (default: 8080).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Local bind address (default: 0.0.0.0).
    #[serde(default = "default_bind_ip")]
    pub bind_ip: IpAddr,

    /// Interval between `READY` sweeps, in milliseconds.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,

    /// Pause between binding and the first sweep, in milliseconds.
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,

    /// Give up after this many milliseconds. Unset waits forever.
    #[serde(default)]
    pub max_wait_ms: Option<u64>,

    /// Keep acknowledging late `READY`s for this long after completion.
    #[serde(default)]
    pub linger_ms: u64,

    /// Interpretation of incoming `ACK`s.
    #[serde(default)]
    pub ack_policy: AckPolicy,

    /// Line written to stderr once every peer is ready.
    #[serde(default = "default_signal_line")]
    pub signal_line: String,
}

impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_ip: default_bind_ip(),
            retry_interval_ms: default_retry_interval_ms(),
            startup_delay_ms: default_startup_delay_ms(),
            max_wait_ms: None,
            linger_ms: 0,
            ack_policy: AckPolicy::default(),
            signal_line: default_signal_line(),
        }
    }
}

impl BarrierConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                crate::BarrierError::Config(format!("failed to read {}: {e}", path.display()))
            })?;
            let config: Self =
                toml::from_str(&content).map_err(|e| crate::BarrierError::Config(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> crate::Result<()> {
        if self.retry_interval_ms == 0 {
            return Err(crate::BarrierError::Config(
                "retry_interval_ms must be greater than zero".into(),
            ));
        }
        if self.signal_line.contains('\n') {
            return Err(crate::BarrierError::Config(
                "signal_line must be a single line".into(),
            ));
        }
        Ok(())
    }

    /// Address the socket binds to.
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    pub const fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    pub const fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_ms.map(Duration::from_millis)
    }

    pub const fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }
}

// Default value functions for serde.
const fn default_port() -> u16 {
    8080
}

const fn default_bind_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

const fn default_retry_interval_ms() -> u64 {
    1000
}

const fn default_startup_delay_ms() -> u64 {
    5000
}

fn default_signal_line() -> String {
    String::from("READY")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BarrierConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.retry_interval(), Duration::from_secs(1));
        assert_eq!(config.startup_delay(), Duration::from_secs(5));
        assert_eq!(config.max_wait(), None);
        assert_eq!(config.linger(), Duration::ZERO);
        assert_eq!(config.ack_policy, AckPolicy::CountsAsReady);
        assert_eq!(config.signal_line, "READY");
    }

    #[test]
    fn test_empty_file_is_default() {
        let parsed: BarrierConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, BarrierConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmpfile,
            r#"
                port = 9000
                retry_interval_ms = 250
                max_wait_ms = 60000
                ack_policy = "ready-only"
            "#
        )
        .unwrap();

        let config = BarrierConfig::load(tmpfile.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.retry_interval(), Duration::from_millis(250));
        assert_eq!(config.max_wait(), Some(Duration::from_secs(60)));
        assert_eq!(config.ack_policy, AckPolicy::ReadyOnly);
        // Untouched fields keep their defaults.
        assert_eq!(config.startup_delay_ms, 5000);
        assert_eq!(config.signal_line, "READY");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = BarrierConfig::load(Path::new("/tmp/nonexistent_rollcall_config.toml")).unwrap();
        assert_eq!(config, BarrierConfig::default());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut tmpfile = tempfile::NamedTempFile::new().unwrap();
        write!(tmpfile, "retry_interval_ms = 0").unwrap();
        assert!(matches!(
            BarrierConfig::load(tmpfile.path()),
            Err(crate::BarrierError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let parsed: Result<BarrierConfig, _> = toml::from_str(r#"ack_policy = "maybe""#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = BarrierConfig {
            linger_ms: 1500,
            ..BarrierConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: BarrierConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
