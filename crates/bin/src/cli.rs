//! CLI argument definitions for the plotacl binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Plotacl account and tag administration
#[derive(Parser, Debug)]
#[command(name = "plotacl")]
#[command(about = "Plotacl: manage accounts, tags and stream permissions")]
#[command(version)]
pub struct Cli {
    /// JSON file holding the configuration store.
    /// Created on first save if it does not exist.
    #[arg(short = 'D', long, default_value = "plotacl.json", env = "PLOTACL_DATA_FILE")]
    pub data_file: PathBuf,

    /// Key prefix isolating this deployment's configuration inside the store
    #[arg(short = 'p', long, env = "PLOTACL_KEY_PREFIX")]
    pub key_prefix: Option<String>,

    /// Timeout in seconds for each store call
    #[arg(short, long, env = "PLOTACL_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Command to run once instead of starting the interactive prompt,
    /// e.g. `plotacl lsusers al`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// The configured key prefix, treating an empty value as unset.
    pub fn key_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref().filter(|prefix| !prefix.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}
