use anyhow::Result;
use clap::Parser;

mod cli;
mod show_cmd;

use cli::{Cli, Commands};
use lockenv_config::{Sources, bootstrap};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let sources = Sources::gather(&cli.config_file(), &cli.env_prefix, cli.overrides.as_slice())?;
    let env = bootstrap(sources)?;

    match &cli.command {
        Commands::Show => show_cmd::handle_show(&env, cli.format),
        Commands::Get { name } => show_cmd::handle_get(&env, name, cli.format),
    }
}
