//! `verifier check`: resolve and validate every cluster's settings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use verifier_config::{
    cluster_option_keys, ClusterAddress, ClusterConnectionConfig, ConfigOptions,
};

use crate::cli::output;

pub struct CheckArgs {
    pub config: PathBuf,
    pub clusters: Vec<String>,
    pub env_prefix: String,
    pub json: bool,
}

/// One validated cluster as reported to the user.
#[derive(Debug, Serialize)]
pub struct ClusterReport {
    pub cluster: String,
    pub jdbc_url: String,
    pub http_uri: String,
    #[serde(flatten)]
    pub config: ClusterConnectionConfig,
}

impl ClusterReport {
    fn new(cluster: &str, config: ClusterConnectionConfig) -> Result<Self> {
        let http_uri = config
            .http_uri("/")
            .with_context(|| format!("Cluster '{}' has no usable HTTP address", cluster))?;
        Ok(Self {
            cluster: cluster.to_string(),
            jdbc_url: config.jdbc_url(),
            http_uri: http_uri.to_string(),
            config,
        })
    }
}

pub fn run(args: CheckArgs) -> Result<()> {
    let reports = resolve_clusters(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!("{}", output::cluster_table(&reports));
        println!("{} cluster(s) valid", reports.len());
    }
    Ok(())
}

pub fn resolve_clusters(args: &CheckArgs) -> Result<Vec<ClusterReport>> {
    let mut options = ConfigOptions::load(&args.config)
        .with_context(|| format!("Failed to load options from {}", args.config.display()))?;

    for cluster in &args.clusters {
        let overridden =
            options.apply_process_env(&args.env_prefix, cluster_option_keys(cluster));
        if overridden > 0 {
            info!(cluster = %cluster, overridden, "applied environment overrides");
        }
    }

    args.clusters
        .iter()
        .map(|cluster| {
            let config = ClusterConnectionConfig::from_options(&options, cluster)
                .with_context(|| format!("Invalid configuration for cluster '{}'", cluster))?;
            ClusterReport::new(cluster, config)
        })
        .collect()
}
