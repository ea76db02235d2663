//! `verifier defaults`: print the values an unset option falls back to.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;
use verifier_config::{
    default_checksum_timeout, default_metadata_timeout, default_query_timeout, minimum_timeout,
    ConfigDuration,
};

use crate::cli::output;

#[derive(Debug, Serialize)]
pub struct Defaults {
    pub query_timeout: ConfigDuration,
    pub metadata_timeout: ConfigDuration,
    pub checksum_timeout: ConfigDuration,
    pub minimum_timeout: ConfigDuration,
    pub jdbc_url_parameters: BTreeMap<String, String>,
}

impl Defaults {
    pub fn current() -> Self {
        Self {
            query_timeout: default_query_timeout(),
            metadata_timeout: default_metadata_timeout(),
            checksum_timeout: default_checksum_timeout(),
            minimum_timeout: minimum_timeout(),
            jdbc_url_parameters: BTreeMap::new(),
        }
    }
}

pub fn run(json: bool) -> Result<()> {
    let defaults = Defaults::current();
    if json {
        println!("{}", serde_json::to_string_pretty(&defaults)?);
    } else {
        println!("{}", output::defaults_table(&defaults));
    }
    Ok(())
}
