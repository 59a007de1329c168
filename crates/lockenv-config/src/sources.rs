//! Loaders turning external sources into plain name → value mappings.
//!
//! Each loader only produces a [`Mapping`]; merging into an environment is
//! the caller's job (see [`crate::bootstrap`]).

use anyhow::{Context, Result, anyhow, bail};
use lockenv_core::Value;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;

pub type Mapping = BTreeMap<String, Value>;

/// The only TOML section whose keys are read; they join the top-level keys.
pub const GLOBAL_SECTION: &str = "global";

/// Default prefix for environment variable overrides (`LOCKENV_REALM=...`).
pub const DEFAULT_ENV_PREFIX: &str = "LOCKENV";

/// Read a TOML config file into a mapping.
pub fn load_toml_file(path: &Path) -> Result<Mapping> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    parse_toml(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Parse TOML text. Top-level keys and keys of `[global]` become names;
/// any other table is an error, as are values that are not booleans,
/// integers, strings or arrays of those.
pub fn parse_toml(content: &str) -> Result<Mapping> {
    let table: toml::Table = toml::from_str(content)?;
    let mut mapping = Mapping::new();
    for (key, raw) in table {
        match raw {
            toml::Value::Table(section) if key == GLOBAL_SECTION => {
                for (name, raw) in section {
                    insert_toml(&mut mapping, name, raw)?;
                }
            }
            toml::Value::Table(_) => {
                bail!("unsupported section [{key}]: only [{GLOBAL_SECTION}] is read")
            }
            raw => insert_toml(&mut mapping, key, raw)?,
        }
    }
    Ok(mapping)
}

fn insert_toml(mapping: &mut Mapping, name: String, raw: toml::Value) -> Result<()> {
    let value: Value = raw
        .try_into()
        .with_context(|| format!("unsupported value for '{name}'"))?;
    if mapping.contains_key(&name) {
        bail!("'{name}' is set both at top level and in [{GLOBAL_SECTION}]");
    }
    mapping.insert(name, value);
    Ok(())
}

/// Pick `<PREFIX>_<NAME>` variables out of `vars`. Names are lower-cased;
/// values stay strings and are coerced when they replace a typed default.
pub fn env_overrides<I>(prefix: &str, vars: I) -> Mapping
where
    I: IntoIterator<Item = (String, String)>,
{
    let prefix = format!("{}_", prefix.to_ascii_uppercase());
    vars.into_iter()
        .filter_map(|(key, value)| {
            let name = key.strip_prefix(&prefix)?;
            if name.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), Value::Str(value)))
        })
        .collect()
}

/// [`env_overrides`] over raw OS pairs. Variables outside `prefix` that are
/// not valid Unicode are skipped; one under `prefix` is an error.
pub fn env_overrides_os<I>(prefix: &str, vars: I) -> Result<Mapping>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let wanted = format!("{}_", prefix.to_ascii_uppercase());
    let mut utf8 = Vec::new();
    for (key, value) in vars {
        if !key.to_string_lossy().starts_with(&wanted) {
            continue;
        }
        let key = key
            .into_string()
            .map_err(|key| anyhow!("environment variable {key:?} is not valid UTF-8"))?;
        let value = value
            .into_string()
            .map_err(|_| anyhow!("value of environment variable {key} is not valid UTF-8"))?;
        utf8.push((key, value));
    }
    Ok(env_overrides(prefix, utf8))
}

/// [`env_overrides_os`] over the current process environment.
pub fn process_env_overrides(prefix: &str) -> Result<Mapping> {
    env_overrides_os(prefix, std::env::vars_os())
}

/// Parse `name=value` command-line overrides.
///
/// The value is read as a TOML literal (`true`, `636`, `["a", "b"]`,
/// `"quoted"`); anything that is not a literal is taken as a bare string.
/// Values spanning more than one line are rejected.
pub fn parse_overrides<S: AsRef<str>>(pairs: &[S]) -> Result<Mapping> {
    let mut mapping = Mapping::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let Some((name, raw)) = pair.split_once('=') else {
            bail!("invalid override '{pair}': expected name=value");
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("invalid override '{pair}': empty name");
        }
        if mapping.contains_key(name) {
            bail!("override '{name}' given more than once");
        }
        if raw.contains(['\n', '\r']) {
            bail!("invalid override '{name}': value must be a single line");
        }
        mapping.insert(name.to_string(), parse_literal(raw.trim()));
    }
    Ok(mapping)
}

fn parse_literal(raw: &str) -> Value {
    toml::from_str::<toml::Table>(&format!("v = {raw}"))
        .ok()
        .and_then(|mut table| table.remove("v"))
        .and_then(|value| value.try_into::<Value>().ok())
        .unwrap_or_else(|| Value::Str(raw.to_string()))
}

#[cfg(test)]
#[path = "sources_tests.rs"]
mod tests;
