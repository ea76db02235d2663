//! Connection settings for a single query-engine cluster.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::address::ClusterAddress;
use crate::duration::ConfigDuration;
use crate::error::{ConfigError, Result, Violation};
use crate::options::ConfigOptions;

pub const HOST: &str = "host";
pub const JDBC_PORT: &str = "jdbc-port";
pub const HTTP_PORT: &str = "http-port";
pub const JDBC_URL_PARAMETERS: &str = "jdbc-url-parameters";
pub const QUERY_TIMEOUT: &str = "query-timeout";
pub const METADATA_TIMEOUT: &str = "metadata-timeout";
pub const CHECKSUM_TIMEOUT: &str = "checksum-timeout";

/// Every option key understood by [`ClusterConnectionConfigBuilder::apply`].
pub const OPTION_KEYS: [&str; 7] = [
    HOST,
    JDBC_PORT,
    HTTP_PORT,
    JDBC_URL_PARAMETERS,
    QUERY_TIMEOUT,
    METADATA_TIMEOUT,
    CHECKSUM_TIMEOUT,
];

const PORT_MIN: i64 = 0;
const PORT_MAX: i64 = 65_535;

pub fn default_query_timeout() -> ConfigDuration {
    ConfigDuration::from_mins(60)
}

pub fn default_metadata_timeout() -> ConfigDuration {
    ConfigDuration::from_mins(3)
}

pub fn default_checksum_timeout() -> ConfigDuration {
    ConfigDuration::from_mins(30)
}

/// Floor shared by all three timeouts.
pub fn minimum_timeout() -> ConfigDuration {
    ConfigDuration::from_secs(1)
}

/// Option keys for a cluster namespace (`control` → `control.host`, ...).
pub fn cluster_option_keys(prefix: &str) -> Vec<String> {
    OPTION_KEYS
        .iter()
        .map(|key| {
            if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", prefix, key)
            }
        })
        .collect()
}

/// Mutable staging area for a [`ClusterConnectionConfig`].
///
/// Setters store values as given. Nothing is checked until
/// [`validate`](Self::validate) runs, except `jdbc-url-parameters`, whose
/// JSON is parsed on the spot.
#[derive(Debug, Clone)]
pub struct ClusterConnectionConfigBuilder {
    host: Option<String>,
    jdbc_port: i64,
    http_port: i64,
    jdbc_url_parameters: BTreeMap<String, String>,
    query_timeout: ConfigDuration,
    metadata_timeout: ConfigDuration,
    checksum_timeout: ConfigDuration,
}

impl Default for ClusterConnectionConfigBuilder {
    fn default() -> Self {
        Self {
            host: None,
            jdbc_port: 0,
            http_port: 0,
            jdbc_url_parameters: BTreeMap::new(),
            query_timeout: default_query_timeout(),
            metadata_timeout: default_metadata_timeout(),
            checksum_timeout: default_checksum_timeout(),
        }
    }
}

impl ClusterConnectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn set_host(&mut self, host: impl Into<String>) -> &mut Self {
        self.host = Some(host.into());
        self
    }

    pub fn jdbc_port(&self) -> i64 {
        self.jdbc_port
    }

    pub fn set_jdbc_port(&mut self, port: i64) -> &mut Self {
        self.jdbc_port = port;
        self
    }

    pub fn http_port(&self) -> i64 {
        self.http_port
    }

    pub fn set_http_port(&mut self, port: i64) -> &mut Self {
        self.http_port = port;
        self
    }

    pub fn jdbc_url_parameters(&self) -> &BTreeMap<String, String> {
        &self.jdbc_url_parameters
    }

    /// Replace the JDBC URL parameters with a JSON object of strings.
    ///
    /// `None` or blank input leaves the current parameters untouched.
    /// Anything else must be a JSON object whose values are all strings;
    /// otherwise this fails with [`ConfigError::Parse`] and the caller is
    /// expected to abort rather than fall back to defaults.
    pub fn set_jdbc_url_parameters(&mut self, raw_json: Option<&str>) -> Result<&mut Self> {
        let raw_json = match raw_json {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(self),
        };

        let parameters: BTreeMap<String, String> =
            serde_json::from_str(raw_json).map_err(|source| ConfigError::Parse {
                key: JDBC_URL_PARAMETERS.to_string(),
                source,
            })?;
        self.jdbc_url_parameters = parameters;
        Ok(self)
    }

    pub fn query_timeout(&self) -> ConfigDuration {
        self.query_timeout
    }

    pub fn set_query_timeout(&mut self, timeout: ConfigDuration) -> &mut Self {
        self.query_timeout = timeout;
        self
    }

    pub fn metadata_timeout(&self) -> ConfigDuration {
        self.metadata_timeout
    }

    pub fn set_metadata_timeout(&mut self, timeout: ConfigDuration) -> &mut Self {
        self.metadata_timeout = timeout;
        self
    }

    pub fn checksum_timeout(&self) -> ConfigDuration {
        self.checksum_timeout
    }

    pub fn set_checksum_timeout(&mut self, timeout: ConfigDuration) -> &mut Self {
        self.checksum_timeout = timeout;
        self
    }

    /// Apply one named option from its textual value.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        match key {
            HOST => Ok(self.set_host(value)),
            JDBC_PORT => {
                let port = parse_port(key, value)?;
                Ok(self.set_jdbc_port(port))
            }
            HTTP_PORT => {
                let port = parse_port(key, value)?;
                Ok(self.set_http_port(port))
            }
            JDBC_URL_PARAMETERS => self.set_jdbc_url_parameters(Some(value)),
            QUERY_TIMEOUT => {
                let timeout = parse_duration(key, value)?;
                Ok(self.set_query_timeout(timeout))
            }
            METADATA_TIMEOUT => {
                let timeout = parse_duration(key, value)?;
                Ok(self.set_metadata_timeout(timeout))
            }
            CHECKSUM_TIMEOUT => {
                let timeout = parse_duration(key, value)?;
                Ok(self.set_checksum_timeout(timeout))
            }
            _ => Err(ConfigError::UnknownOption {
                key: key.to_string(),
            }),
        }
    }

    /// Run the validation checkpoint.
    ///
    /// Checks host, then ports, then timeouts, and reports every violation
    /// found in that order.
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();

        if self.host.as_deref().map_or(true, str::is_empty) {
            violations.push(Violation::MissingRequiredField { field: HOST });
        }

        for (field, value) in [(JDBC_PORT, self.jdbc_port), (HTTP_PORT, self.http_port)] {
            if !(PORT_MIN..=PORT_MAX).contains(&value) {
                violations.push(Violation::OutOfRangeField {
                    field,
                    value,
                    min: PORT_MIN,
                    max: PORT_MAX,
                });
            }
        }

        let floor = minimum_timeout();
        for (field, value) in [
            (QUERY_TIMEOUT, self.query_timeout),
            (METADATA_TIMEOUT, self.metadata_timeout),
            (CHECKSUM_TIMEOUT, self.checksum_timeout),
        ] {
            if value < floor {
                violations.push(Violation::BelowMinimumDuration {
                    field,
                    value,
                    min: floor,
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(violations))
        }
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<ClusterConnectionConfig> {
        self.validate()?;

        Ok(ClusterConnectionConfig {
            host: self.host.unwrap_or_default(),
            jdbc_port: checked_port(JDBC_PORT, self.jdbc_port)?,
            http_port: checked_port(HTTP_PORT, self.http_port)?,
            jdbc_url_parameters: self.jdbc_url_parameters,
            query_timeout: self.query_timeout,
            metadata_timeout: self.metadata_timeout,
            checksum_timeout: self.checksum_timeout,
        })
    }
}

fn parse_port(key: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_duration(key: &str, value: &str) -> Result<ConfigDuration> {
    value.parse().map_err(|e: crate::duration::ParseDurationError| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

fn checked_port(field: &'static str, value: i64) -> Result<u16> {
    u16::try_from(value).map_err(|_| {
        ConfigError::Validation(vec![Violation::OutOfRangeField {
            field,
            value,
            min: PORT_MIN,
            max: PORT_MAX,
        }])
    })
}

/// Validated, immutable connection settings for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterConnectionConfig {
    host: String,
    jdbc_port: u16,
    http_port: u16,
    jdbc_url_parameters: BTreeMap<String, String>,
    query_timeout: ConfigDuration,
    metadata_timeout: ConfigDuration,
    checksum_timeout: ConfigDuration,
}

impl ClusterConnectionConfig {
    pub fn builder() -> ClusterConnectionConfigBuilder {
        ClusterConnectionConfigBuilder::new()
    }

    /// Build a config from the options under `prefix`.
    ///
    /// With a non-empty prefix only `<prefix>.<key>` options are considered
    /// and the rest are left for other clusters. An empty prefix applies
    /// every option.
    pub fn from_options(options: &ConfigOptions, prefix: &str) -> Result<Self> {
        let mut builder = Self::builder();
        for (key, value) in options.scoped(prefix) {
            builder.apply(key, value).map_err(|e| e.qualify(prefix))?;
            debug!(cluster = prefix, option = key, "applied cluster option");
        }

        let config = builder.build()?;
        debug!(
            cluster = prefix,
            host = %config.host,
            jdbc_port = config.jdbc_port,
            http_port = config.http_port,
            "cluster connection config validated"
        );
        Ok(config)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn jdbc_port(&self) -> u16 {
        self.jdbc_port
    }

    pub fn http_port(&self) -> u16 {
        self.http_port
    }

    pub fn jdbc_url_parameters(&self) -> &BTreeMap<String, String> {
        &self.jdbc_url_parameters
    }

    /// Upper bound for a single query run against the cluster.
    pub fn query_timeout(&self) -> ConfigDuration {
        self.query_timeout
    }

    /// Upper bound for metadata lookups (table and column descriptions).
    pub fn metadata_timeout(&self) -> ConfigDuration {
        self.metadata_timeout
    }

    /// Upper bound for checksum queries.
    pub fn checksum_timeout(&self) -> ConfigDuration {
        self.checksum_timeout
    }
}

impl ClusterAddress for ClusterConnectionConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn jdbc_port(&self) -> u16 {
        self.jdbc_port
    }

    fn http_port(&self) -> u16 {
        self.http_port
    }

    fn jdbc_url_parameters(&self) -> &BTreeMap<String, String> {
        &self.jdbc_url_parameters
    }
}
