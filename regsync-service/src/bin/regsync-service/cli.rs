use clap::Parser;
use regsync_core::infrastructure::config::{CONFIG_PATH_ENV, DATA_DIR_ENV, ENV_PREFIX};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "regsync-service")]
#[command(about = "Validator registration and native delegation reconciliation service", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Override execution node RPC URL
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// Log filters: a level (trace, debug, info, warn, error), `crate=level` or `root=level`, comma separated
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Also write rolled log files into this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// CLI values win over the environment, which wins over the config file.
    pub fn apply_to_env(&self) {
        if let Some(config_path) = &self.config {
            std::env::set_var(CONFIG_PATH_ENV, config_path);
        }

        if let Some(data_dir) = &self.data_dir {
            std::env::set_var(DATA_DIR_ENV, data_dir);
        }

        if let Some(rpc_url) = &self.rpc_url {
            std::env::set_var(format!("{ENV_PREFIX}CHAIN__RPC_URL"), rpc_url);
        }
    }
}
