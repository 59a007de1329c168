//! Construct → populate → merge → lock.
//!
//! Sources are merged most authoritative first: command-line overrides
//! strictly (a conflict is an error), then the environment and the config
//! file quietly (names already settled are skipped). Write-once therefore
//! yields the precedence overrides > environment > file > defaults.

use anyhow::{Context, Result};
use lockenv_core::{Env, populate_defaults};
use std::path::PathBuf;

use crate::paths::default_config_path;
use crate::sources::{Mapping, load_toml_file, parse_overrides, process_env_overrides};

/// Which config file to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigFile {
    /// `~/.config/lockenv/default.toml`, skipped when absent.
    #[default]
    Default,
    /// An explicit file, which must exist.
    Path(PathBuf),
    Disabled,
}

/// Already-loaded source mappings, one per layer.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub overrides: Mapping,
    pub environment: Mapping,
    pub file: Mapping,
}

impl Sources {
    /// Load every layer from the real process: `overrides` as
    /// `name=value` pairs, variables under `env_prefix`, and `config`.
    pub fn gather<S: AsRef<str>>(
        config: &ConfigFile,
        env_prefix: &str,
        overrides: &[S],
    ) -> Result<Self> {
        let overrides = parse_overrides(overrides)?;
        let environment = process_env_overrides(env_prefix)?;
        let file = match config {
            ConfigFile::Path(path) => load_toml_file(path)?,
            ConfigFile::Default => match default_config_path() {
                Some(path) if path.exists() => load_toml_file(&path)?,
                _ => Mapping::new(),
            },
            ConfigFile::Disabled => Mapping::new(),
        };
        tracing::debug!(
            overrides = overrides.len(),
            environment = environment.len(),
            file = file.len(),
            "sources gathered"
        );
        Ok(Self {
            overrides,
            environment,
            file,
        })
    }
}

/// Build the locked process environment from `sources`.
pub fn bootstrap(sources: Sources) -> Result<Env> {
    let mut env = Env::new();
    populate_defaults(&mut env).context("Failed to populate defaults")?;
    env.bulk_update(sources.overrides, false)
        .context("Failed to apply command-line overrides")?;
    env.bulk_update(sources.environment, true)
        .context("Failed to apply environment overrides")?;
    env.bulk_update(sources.file, true)
        .context("Failed to apply config file")?;
    env.lock()?;
    tracing::debug!(entries = env.len(), "environment locked");
    Ok(env)
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
