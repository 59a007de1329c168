use anyhow::{Context, Result};
use lockenv_core::{Env, Value};

use crate::cli::OutputFormat;

pub(crate) fn handle_show(env: &Env, format: OutputFormat) -> Result<()> {
    print!("{}", render_all(env, format)?);
    Ok(())
}

pub(crate) fn handle_get(env: &Env, name: &str, format: OutputFormat) -> Result<()> {
    let value = env
        .value(name)
        .with_context(|| format!("Unknown or unresolvable setting {name:?}"))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&value)?),
        OutputFormat::Text => println!("{}", plain(&value)),
    }
    Ok(())
}

/// Every setting resolved, sorted by name. Sequences are drained into lists.
fn render_all(env: &Env, format: OutputFormat) -> Result<String> {
    let mut resolved = Vec::with_capacity(env.len());
    for name in env.names() {
        let value = env
            .value(name)
            .with_context(|| format!("Failed to resolve {name:?}"))?;
        resolved.push((name, value));
    }
    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = resolved
                .into_iter()
                .map(|(name, value)| -> Result<(String, serde_json::Value)> {
                    Ok((name.to_string(), serde_json::to_value(value)?))
                })
                .collect::<Result<_>>()?;
            Ok(format!("{}\n", serde_json::to_string_pretty(&map)?))
        }
        OutputFormat::Text => {
            let width = resolved.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            Ok(resolved
                .into_iter()
                .map(|(name, value)| format!("{name:<width$} = {value}\n"))
                .collect())
        }
    }
}

/// Strings unquoted, everything else as displayed.
fn plain(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}
