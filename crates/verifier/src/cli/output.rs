//! Output formatting for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};

use crate::cli::check::ClusterReport;
use crate::cli::defaults::Defaults;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
    table
}

/// One row per cluster: where it lives and how long its operations may run.
pub fn cluster_table(reports: &[ClusterReport]) -> Table {
    let mut table = new_table(&[
        "CLUSTER",
        "JDBC URL",
        "HTTP",
        "QUERY",
        "METADATA",
        "CHECKSUM",
    ]);
    for report in reports {
        table.add_row(vec![
            Cell::new(&report.cluster).fg(Color::Green),
            Cell::new(&report.jdbc_url),
            Cell::new(&report.http_uri),
            Cell::new(report.config.query_timeout()),
            Cell::new(report.config.metadata_timeout()),
            Cell::new(report.config.checksum_timeout()),
        ]);
    }
    table
}

pub fn defaults_table(defaults: &Defaults) -> Table {
    let mut table = new_table(&["OPTION", "DEFAULT"]);
    let parameters = if defaults.jdbc_url_parameters.is_empty() {
        "{}".to_string()
    } else {
        format!("{:?}", defaults.jdbc_url_parameters)
    };
    table
        .add_row(vec!["query-timeout".to_string(), defaults.query_timeout.to_string()])
        .add_row(vec![
            "metadata-timeout".to_string(),
            defaults.metadata_timeout.to_string(),
        ])
        .add_row(vec![
            "checksum-timeout".to_string(),
            defaults.checksum_timeout.to_string(),
        ])
        .add_row(vec!["jdbc-url-parameters".to_string(), parameters])
        .add_row(vec![
            "minimum timeout".to_string(),
            defaults.minimum_timeout.to_string(),
        ]);
    table
}

/// Print a failed command as `{"error": ...}` on stdout.
pub fn print_json_error(err: &anyhow::Error) {
    let causes: Vec<String> = err.chain().skip(1).map(|cause| cause.to_string()).collect();
    let payload = serde_json::json!({
        "error": err.to_string(),
        "causes": causes,
    });
    println!("{}", payload);
}
