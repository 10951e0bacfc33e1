use std::path::PathBuf;

use clap::Parser;
use colalign_config::{AnalyzerConfig, ReportFormat};
use colalign_introspect::RowCountMode;

use crate::pipeline::RunOptions;

#[derive(Parser, Debug)]
#[command(
    name = "colalign",
    version,
    about = "Recommend PostgreSQL column orders that waste less alignment padding"
)]
pub struct Cli {
    /// Database name [default: postgres]
    #[arg(short = 'd', long)]
    pub database: Option<String>,

    /// Database user [default: postgres]
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    #[arg(short = 'p', long)]
    pub password: Option<String>,

    /// Database host [default: localhost]
    #[arg(short = 'l', long)]
    pub host: Option<String>,

    /// Database port [default: 5432]
    #[arg(short = 't', long)]
    pub port: Option<u16>,

    /// Schema to analyze [default: public]
    #[arg(short = 's', long)]
    pub schema: Option<String>,

    /// Directory receiving one report per table [default: reports]
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report format: csv or json [default: csv]
    #[arg(short = 'f', long)]
    pub format: Option<ReportFormat>,

    /// Only analyze this table. Repeat to analyze several.
    #[arg(long = "table", value_name = "NAME")]
    pub tables: Vec<String>,

    /// Use planner row estimates instead of counting rows.
    #[arg(long, default_value_t = false)]
    pub estimate_rows: bool,

    /// TOML configuration file. Environment variables and flags override it.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    /// Config file, then environment, then flags given on the command line.
    pub fn resolve_config(&self) -> anyhow::Result<AnalyzerConfig> {
        let config = AnalyzerConfig::load(self.config.as_deref())?;
        Ok(self.apply_overrides(config))
    }

    pub fn apply_overrides(&self, mut config: AnalyzerConfig) -> AnalyzerConfig {
        let connection = &mut config.connection;
        if let Some(database) = &self.database {
            connection.dbname.clone_from(database);
        }
        if let Some(username) = &self.username {
            connection.user.clone_from(username);
        }
        if let Some(password) = &self.password {
            connection.password = Some(password.clone());
        }
        if let Some(host) = &self.host {
            connection.host.clone_from(host);
        }
        if let Some(port) = self.port {
            connection.port = port;
        }
        if let Some(schema) = &self.schema {
            connection.schema.clone_from(schema);
        }

        if let Some(dir) = &self.output_dir {
            config.report.output_dir.clone_from(dir);
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        config
    }

    pub fn run_options(&self, config: &AnalyzerConfig) -> RunOptions {
        RunOptions {
            schema: config.connection.schema.clone(),
            tables: self.tables.clone(),
            row_count_mode: if self.estimate_rows {
                RowCountMode::Estimate
            } else {
                RowCountMode::Exact
            },
            output_dir: config.report.output_dir.clone(),
            format: config.report.format,
            catalog: config.types.catalog(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["colalign"]);
        let config = cli.apply_overrides(AnalyzerConfig::default());
        assert_eq!(config, AnalyzerConfig::default());
        assert!(!cli.verbose);

        let options = cli.run_options(&config);
        assert_eq!(options.schema, "public");
        assert_eq!(options.row_count_mode, RowCountMode::Exact);
        assert!(options.tables.is_empty());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "colalign", "-d", "shop", "-u", "analyst", "-p", "hunter2", "-l", "db.local", "-t",
            "6543", "-s", "sales", "-o", "/tmp/out", "-f", "json", "--table", "orders",
            "--table", "items", "--estimate-rows", "-v",
        ]);

        let mut base = AnalyzerConfig::default();
        base.connection.host = "from-env".to_string();
        let config = cli.apply_overrides(base);

        assert_eq!(config.connection.dbname, "shop");
        assert_eq!(config.connection.user, "analyst");
        assert_eq!(config.connection.password.as_deref(), Some("hunter2"));
        assert_eq!(config.connection.host, "db.local");
        assert_eq!(config.connection.port, 6543);
        assert_eq!(config.connection.schema, "sales");
        assert_eq!(config.report.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.report.format, ReportFormat::Json);
        assert!(cli.verbose);

        let options = cli.run_options(&config);
        assert_eq!(options.schema, "sales");
        assert_eq!(options.tables, ["orders", "items"]);
        assert_eq!(options.row_count_mode, RowCountMode::Estimate);
        assert_eq!(options.format, ReportFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Cli::try_parse_from(["colalign", "-f", "xml"]).is_err());
        assert!(Cli::try_parse_from(["colalign", "-t", "99999"]).is_err());
    }
}
