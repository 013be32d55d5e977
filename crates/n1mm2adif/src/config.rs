//! Configuration management for n1mm2adif.
//!
//! Configuration is loaded with figment from defaults, a TOML file, and
//! environment variables.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::formatter::{ContestRules, ExchangeRule};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the user config directory.
const CONFIG_DIR_NAME: &str = "n1mm2adif";

/// Port N1MM Logger+ broadcasts contact info to by default.
pub const DEFAULT_PORT: u16 = 12061;

/// Largest payload a UDP datagram can carry.
const MAX_UDP_PAYLOAD: usize = 65_507;

/// Application configuration.
///
/// Loaded from (in order of precedence, highest first):
/// 1. Environment variables prefixed with `N1MM2ADIF_`, nested keys split on
///    `__` (e.g. `N1MM2ADIF_LISTENER__PORT`)
/// 2. TOML config file at `~/.config/n1mm2adif/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inbound socket configuration.
    pub listener: ListenerConfig,
    /// ADIF output configuration.
    pub output: OutputConfig,
    /// Contest rule extensions.
    pub contests: ContestConfig,
}

/// Inbound socket configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Address to bind.
    pub bind_address: IpAddr,
    /// UDP port to bind.
    pub port: u16,
    /// IPv4 multicast group to join, if N1MM is set to multicast.
    pub multicast_group: Option<Ipv4Addr>,
    /// Local interface used to join the multicast group.
    pub interface: Ipv4Addr,
    /// Longest wait for a single datagram, in milliseconds.
    pub poll_timeout_ms: u64,
    /// Pause after a receive timeout, in milliseconds.
    pub timeout_backoff_ms: u64,
    /// Receive buffer size in bytes. Longer datagrams are truncated.
    pub max_datagram_size: usize,
}

/// ADIF output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the ADIF logs.
    /// Defaults to the home directory.
    pub directory: Option<PathBuf>,
    /// Idle time between queue drains, in milliseconds.
    pub drain_interval_ms: u64,
}

/// Contest rule extensions on top of the built-in tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContestConfig {
    /// Extra contests logged as RTTY regardless of reported mode.
    pub rtty_contests: Vec<String>,
    /// Exchange rule per contest identifier. Overrides built-in entries.
    pub exchange_rules: BTreeMap<String, ExchangeRule>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            multicast_group: None,
            interface: Ipv4Addr::UNSPECIFIED,
            poll_timeout_ms: 100,
            timeout_backoff_ms: 1000,
            max_datagram_size: 1500,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None, // Resolved to the home directory at runtime
            drain_interval_ms: 1000,
        }
    }
}

impl ListenerConfig {
    /// Socket address to bind.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("N1MM2ADIF_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let listener = &self.listener;
        if listener.port == 0 {
            return Err(Error::config_validation("listener.port must be greater than 0"));
        }

        if listener.poll_timeout_ms == 0 {
            return Err(Error::config_validation(
                "listener.poll_timeout_ms must be greater than 0",
            ));
        }

        if listener.max_datagram_size == 0 || listener.max_datagram_size > MAX_UDP_PAYLOAD {
            return Err(Error::config_validation(format!(
                "listener.max_datagram_size must be between 1 and {MAX_UDP_PAYLOAD}"
            )));
        }

        if let Some(group) = listener.multicast_group {
            if !group.is_multicast() {
                return Err(Error::config_validation(format!(
                    "listener.multicast_group {group} is not a multicast address"
                )));
            }
        }

        if self.output.drain_interval_ms == 0 {
            return Err(Error::config_validation(
                "output.drain_interval_ms must be greater than 0",
            ));
        }

        let contests = &self.contests;
        let ids = contests
            .rtty_contests
            .iter()
            .chain(contests.exchange_rules.keys());
        for id in ids {
            if id.trim().is_empty() {
                return Err(Error::config_validation(
                    "contest identifiers must not be empty",
                ));
            }
        }

        Ok(())
    }

    /// Directory holding the ADIF logs, resolving the default if not set.
    #[must_use]
    pub fn output_directory(&self) -> PathBuf {
        self.output
            .directory
            .clone()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the poll timeout as a Duration.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.listener.poll_timeout_ms)
    }

    /// Get the timeout backoff as a Duration.
    #[must_use]
    pub fn timeout_backoff(&self) -> Duration {
        Duration::from_millis(self.listener.timeout_backoff_ms)
    }

    /// Get the drain interval as a Duration.
    #[must_use]
    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.output.drain_interval_ms)
    }

    /// Contest rules: built-in tables plus configured extensions.
    #[must_use]
    pub fn contest_rules(&self) -> ContestRules {
        ContestRules::from_config(&self.contests)
    }
}
