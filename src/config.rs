use std::path::PathBuf;

use clap::Parser;

use crate::data::DatePolicy;

/// Command-line / environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "hr-dashboard", about = "Filterable HR dashboard", version)]
pub struct Config {
    /// Employee table to load (.csv, .json or .parquet)
    #[arg(
        value_name = "DATA",
        env = "HR_DASHBOARD_DATA",
        default_value = "data/hr_data.csv"
    )]
    pub data: PathBuf,

    /// How unparseable hire dates affect the hiring series
    #[arg(
        long,
        value_enum,
        env = "HR_DASHBOARD_DATE_POLICY",
        default_value_t = DatePolicy::Strict
    )]
    pub date_policy: DatePolicy,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, env = "HR_DASHBOARD_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Install `env_logger` with `log_level` as the fallback filter.
    pub fn init_logging(&self) {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();
    }
}
