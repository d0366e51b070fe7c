//! Server configuration from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::store::Source;

/// Where stop records are read from.
pub const STOPS_SOURCE_VAR: &str = "BUS_STOPS_SOURCE";
/// Where route records are read from.
pub const ROUTES_SOURCE_VAR: &str = "BUS_ROUTES_SOURCE";
pub const BIND_ADDR_VAR: &str = "BUS_BIND_ADDR";
pub const SNAPSHOT_TTL_VAR: &str = "BUS_SNAPSHOT_TTL_SECS";
pub const DEFAULT_COUNT_VAR: &str = "BUS_DEFAULT_COUNT";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SNAPSHOT_TTL_SECS: u64 = 300;
const DEFAULT_COUNT: usize = 10;

/// Errors reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Required variable not set
    #[error("{0} must be set")]
    Missing(&'static str),

    /// Variable set to an unusable value
    #[error("invalid {name}={value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub stops_source: Source,
    pub routes_source: Source,
    pub bind_addr: SocketAddr,
    /// How long a loaded snapshot is served before reloading.
    pub snapshot_ttl: Duration,
    /// Itineraries returned when a request gives no count.
    pub default_count: usize,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's
    /// value if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let source = |name: &'static str| -> Result<Source, ConfigError> {
            let value = required(name)?;
            Source::parse(&value).map_err(|e| ConfigError::Invalid {
                name,
                value,
                reason: e.to_string(),
            })
        };

        let stops_source = source(STOPS_SOURCE_VAR)?;
        let routes_source = source(ROUTES_SOURCE_VAR)?;

        let bind_addr = parse_or(&lookup, BIND_ADDR_VAR, DEFAULT_BIND_ADDR.parse().ok())?;
        let ttl_secs = parse_or(&lookup, SNAPSHOT_TTL_VAR, Some(DEFAULT_SNAPSHOT_TTL_SECS))?;
        let default_count: usize = parse_or(&lookup, DEFAULT_COUNT_VAR, Some(DEFAULT_COUNT))?;

        if default_count == 0 {
            return Err(ConfigError::Invalid {
                name: DEFAULT_COUNT_VAR,
                value: default_count.to_string(),
                reason: "must be greater than or equal to 1".into(),
            });
        }

        Ok(Self {
            stops_source,
            routes_source,
            bind_addr,
            snapshot_ttl: Duration::from_secs(ttl_secs),
            default_count,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: Option<T>,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
        None => default.ok_or(ConfigError::Missing(name)),
    }
}
