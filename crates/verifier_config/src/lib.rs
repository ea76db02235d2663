//! Cluster connection configuration for the query verifier.
//!
//! A verifier talks to one or more query-engine clusters (typically a
//! `control` and a `test` cluster). Each is described by a
//! [`ClusterConnectionConfig`]: where the cluster lives, which JDBC URL
//! parameters to pass, and how long queries, metadata fetches and checksum
//! queries may run.
//!
//! Configs are assembled from named options ([`ConfigOptions`]) read from a
//! properties or TOML file and overlaid with environment variables. Values
//! are applied field by field to a [`ClusterConnectionConfigBuilder`] and
//! checked once by a single validation pass before the frozen config is
//! handed out.
//!
//! ```
//! use verifier_config::{ClusterAddress, ClusterConnectionConfig, ConfigOptions};
//!
//! let options = ConfigOptions::from_properties_str(
//!     "control.host=cluster1\ncontrol.jdbc-port=8080\ncontrol.http-port=8081\n",
//! )
//! .unwrap();
//! let config = ClusterConnectionConfig::from_options(&options, "control").unwrap();
//! assert_eq!(config.jdbc_url(), "jdbc:presto://cluster1:8080");
//! ```

pub mod address;
pub mod cluster;
pub mod duration;
pub mod error;
pub mod options;

pub use address::{ClusterAddress, JDBC_URL_SCHEME};
pub use cluster::{
    cluster_option_keys, default_checksum_timeout, default_metadata_timeout,
    default_query_timeout, minimum_timeout, ClusterConnectionConfig,
    ClusterConnectionConfigBuilder, OPTION_KEYS,
};
pub use duration::{ConfigDuration, ParseDurationError, TimeUnit};
pub use error::{ConfigError, Result, Violation};
pub use options::ConfigOptions;
