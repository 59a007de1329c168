//! Source loaders and bootstrap for a locked `lockenv_core::Env`.

pub mod bootstrap;
pub mod paths;
pub mod sources;

pub use bootstrap::{ConfigFile, Sources, bootstrap};
pub use paths::{config_dir, default_config_path};
pub use sources::{
    DEFAULT_ENV_PREFIX, Mapping, env_overrides, env_overrides_os, load_toml_file, parse_overrides, parse_toml,
    process_env_overrides,
};
