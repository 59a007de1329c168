use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use lockenv_config::{ConfigFile, DEFAULT_ENV_PREFIX};

#[derive(Parser)]
#[command(name = "lockenv", version)]
#[command(about = "Assemble and inspect a locked settings environment")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to read (default: ~/.config/lockenv/default.toml if present)
    #[arg(long, global = true, conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Do not read any config file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Prefix of environment variables read as overrides
    #[arg(long, global = true, default_value = DEFAULT_ENV_PREFIX)]
    pub env_prefix: String,

    /// Override a setting (name=value); repeatable, wins over every other source
    #[arg(long = "set", value_name = "NAME=VALUE", global = true)]
    pub overrides: Vec<String>,

    /// Output format (text or json)
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,
}

impl Cli {
    pub fn config_file(&self) -> ConfigFile {
        match (&self.config, self.no_config) {
            (_, true) => ConfigFile::Disabled,
            (Some(path), false) => ConfigFile::Path(path.clone()),
            (None, false) => ConfigFile::Default,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every setting, sorted by name
    Show,

    /// Print a single setting
    Get {
        /// Setting name
        name: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
