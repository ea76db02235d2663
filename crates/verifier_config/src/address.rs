//! Addressing a cluster over JDBC and HTTP.

use std::collections::BTreeMap;

use url::Url;

use crate::error::{ConfigError, Result};

/// Scheme prefix of the JDBC URLs handed to the driver.
pub const JDBC_URL_SCHEME: &str = "jdbc:presto";

/// Where a cluster can be reached.
///
/// Implementors supply the raw coordinates; the provided methods derive the
/// JDBC URL and HTTP endpoints from them.
pub trait ClusterAddress {
    fn host(&self) -> &str;

    fn jdbc_port(&self) -> u16;

    fn http_port(&self) -> u16;

    fn jdbc_url_parameters(&self) -> &BTreeMap<String, String>;

    /// `jdbc:presto://host:port`, followed by `?k=v&...` when parameters are
    /// set. Parameters appear in key order.
    fn jdbc_url(&self) -> String {
        let mut url = format!("{}://{}:{}", JDBC_URL_SCHEME, self.host(), self.jdbc_port());
        let parameters = self.jdbc_url_parameters();
        if !parameters.is_empty() {
            let query = parameters
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Resolve `path` against `http://host:port`.
    fn http_uri(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&format!("http://{}:{}", self.host(), self.http_port())).map_err(
            |e| ConfigError::InvalidAddress {
                reason: format!("{}: {}", self.host(), e),
            },
        )?;
        base.join(path).map_err(|e| ConfigError::InvalidAddress {
            reason: format!("{}: {}", path, e),
        })
    }
}
