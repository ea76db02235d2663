//! Flat named options and the sources they are read from.
//!
//! Options are plain `key → value` strings. Keys may carry a cluster
//! namespace (`control.host`, `test.jdbc-port`); [`ConfigOptions::scoped`]
//! strips it again.
//!
//! Supported sources:
//! - properties text: `key=value` or `key: value`, `#`/`!` comments
//! - TOML: nested tables are flattened with `.`
//! - environment: `<PREFIX>_<KEY>` with the key upper-cased and `.`/`-`
//!   replaced by `_`, overriding whatever a file provided

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Named configuration options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOptions {
    values: BTreeMap<String, String>,
}

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Options under `prefix.`, with the prefix removed.
    ///
    /// An empty prefix yields every option unchanged.
    pub fn scoped<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.iter().filter_map(move |(key, value)| {
            if prefix.is_empty() {
                return Some((key, value));
            }
            key.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(|local| (local, value))
        })
    }

    /// Parse properties text.
    pub fn from_properties_str(text: &str) -> Result<Self> {
        let mut options = Self::new();
        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let separator = line.find(|c| c == '=' || c == ':').ok_or_else(|| {
                ConfigError::source_error(format!(
                    "line {}: expected key=value, got '{}'",
                    index + 1,
                    line
                ))
            })?;
            let key = line[..separator].trim();
            let value = line[separator + 1..].trim();
            if key.is_empty() {
                return Err(ConfigError::source_error(format!(
                    "line {}: missing key before '{}'",
                    index + 1,
                    &line[separator..separator + 1]
                )));
            }
            options.set(key, value);
        }
        Ok(options)
    }

    /// Parse TOML text, flattening nested tables into dotted keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| ConfigError::source_error(e.to_string()))?;
        let mut options = Self::new();
        flatten_toml(&mut options, "", &table)?;
        Ok(options)
    }

    /// Load options from a file. `.toml` files are read as TOML, anything
    /// else as properties.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false);
        let options = if is_toml {
            Self::from_toml_str(&text)?
        } else {
            Self::from_properties_str(&text)?
        };

        info!(
            path = %path.display(),
            options = options.len(),
            "loaded configuration options"
        );
        Ok(options)
    }

    /// Environment variable consulted for `key`.
    pub fn env_var_name(env_prefix: &str, key: &str) -> String {
        let key: String = key
            .chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        if env_prefix.is_empty() {
            key
        } else {
            format!("{}_{}", env_prefix.to_ascii_uppercase(), key)
        }
    }

    /// Override `keys` with values returned by `lookup` for their variable
    /// names. Returns how many options were overridden.
    pub fn apply_env_overrides<I, K, F>(&mut self, env_prefix: &str, keys: I, lookup: F) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        for key in keys {
            let key = key.as_ref();
            let var = Self::env_var_name(env_prefix, key);
            if let Some(value) = lookup(&var) {
                debug!(option = key, variable = %var, "option overridden from environment");
                self.set(key, value);
                applied += 1;
            }
        }
        applied
    }

    /// [`apply_env_overrides`](Self::apply_env_overrides) against the
    /// process environment.
    pub fn apply_process_env<I, K>(&mut self, env_prefix: &str, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        self.apply_env_overrides(env_prefix, keys, |name| std::env::var(name).ok())
    }
}

fn flatten_toml(options: &mut ConfigOptions, prefix: &str, table: &toml::Table) -> Result<()> {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        let text = match value {
            toml::Value::Table(nested) => {
                flatten_toml(options, &full_key, nested)?;
                continue;
            }
            toml::Value::String(s) => s.clone(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(dt) => dt.to_string(),
            toml::Value::Array(_) => {
                return Err(ConfigError::source_error(format!(
                    "{}: arrays are not supported",
                    full_key
                )));
            }
        };
        options.set(full_key, text);
    }
    Ok(())
}

impl<K, V> FromIterator<(K, V)> for ConfigOptions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.set(key, value);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_properties_parsing() {
        let text = r#"
# control cluster
control.host = control.example.com
control.jdbc-port=8080
! legacy comment style
control.jdbc-url-parameters={"SSL":"true"}
test.query-timeout: 90m
"#;
        let options = ConfigOptions::from_properties_str(text).unwrap();
        assert_eq!(options.len(), 4);
        assert_eq!(options.get("control.host"), Some("control.example.com"));
        assert_eq!(options.get("control.jdbc-port"), Some("8080"));
        assert_eq!(
            options.get("control.jdbc-url-parameters"),
            Some(r#"{"SSL":"true"}"#)
        );
        assert_eq!(options.get("test.query-timeout"), Some("90m"));
    }

    #[test]
    fn test_properties_value_keeps_later_separators() {
        let options =
            ConfigOptions::from_properties_str(r#"params={"a":"b=c"}"#).unwrap();
        assert_eq!(options.get("params"), Some(r#"{"a":"b=c"}"#));
    }

    #[test]
    fn test_properties_last_value_wins() {
        let options = ConfigOptions::from_properties_str("host=a\nhost=b\n").unwrap();
        assert_eq!(options.get("host"), Some("b"));
    }

    #[test]
    fn test_properties_errors() {
        let err = ConfigOptions::from_properties_str("host=a\njust-a-key\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));

        let err = ConfigOptions::from_properties_str("=value").unwrap_err();
        assert!(err.to_string().contains("missing key"));
    }

    #[test]
    fn test_toml_flattening() {
        let text = r#"
[control]
host = "control.example.com"
jdbc-port = 8080
jdbc-url-parameters = '{"SSL":"true"}'

[test]
host = "test.example.com"
checksum-timeout = "45m"
"#;
        let options = ConfigOptions::from_toml_str(text).unwrap();
        assert_eq!(options.get("control.host"), Some("control.example.com"));
        assert_eq!(options.get("control.jdbc-port"), Some("8080"));
        assert_eq!(
            options.get("control.jdbc-url-parameters"),
            Some(r#"{"SSL":"true"}"#)
        );
        assert_eq!(options.get("test.checksum-timeout"), Some("45m"));
    }

    #[test]
    fn test_toml_rejects_arrays_and_syntax_errors() {
        let err = ConfigOptions::from_toml_str("[control]\nhost = [\"a\", \"b\"]\n").unwrap_err();
        assert!(err.to_string().contains("control.host"));

        assert!(ConfigOptions::from_toml_str("[control\nhost=").is_err());
    }

    #[test]
    fn test_scoped_strips_prefix() {
        let options: ConfigOptions = [
            ("control.host", "a"),
            ("controlled.host", "b"),
            ("test.host", "c"),
            ("host", "d"),
        ]
        .into_iter()
        .collect();

        let control: Vec<_> = options.scoped("control").collect();
        assert_eq!(control, vec![("host", "a")]);

        let all: Vec<_> = options.scoped("").collect();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(
            ConfigOptions::env_var_name("verifier", "control.jdbc-port"),
            "VERIFIER_CONTROL_JDBC_PORT"
        );
        assert_eq!(ConfigOptions::env_var_name("", "host"), "HOST");
    }

    #[test]
    fn test_env_overrides_win() {
        let mut options: ConfigOptions = [("control.host", "from-file"), ("control.jdbc-port", "1")]
            .into_iter()
            .collect();
        let env: HashMap<&str, &str> = [
            ("VERIFIER_CONTROL_HOST", "from-env"),
            ("VERIFIER_CONTROL_HTTP_PORT", "8081"),
        ]
        .into_iter()
        .collect();

        let applied = options.apply_env_overrides(
            "VERIFIER",
            ["control.host", "control.jdbc-port", "control.http-port"],
            |name| env.get(name).map(|v| v.to_string()),
        );

        assert_eq!(applied, 2);
        assert_eq!(options.get("control.host"), Some("from-env"));
        assert_eq!(options.get("control.jdbc-port"), Some("1"));
        assert_eq!(options.get("control.http-port"), Some("8081"));
    }
}
