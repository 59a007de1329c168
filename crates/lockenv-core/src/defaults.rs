//! Built-in defaults bound into every fresh environment.

use crate::env::{Entry, Env};
use crate::error::{EnvError, Result};
use crate::lazy::{LazyIter, LazyValue};
use crate::value::{TargetType, Value};

pub const DEFAULT_DOMAIN: &str = "example.com";
pub const DEFAULT_LDAP_PORT: i64 = 389;

/// Names bound by [`populate_defaults`], sorted.
pub const DEFAULT_NAMES: &[&str] = &[
    "basedn",
    "container_accounts",
    "container_group",
    "container_user",
    "domain",
    "interactive",
    "ldap_host",
    "ldap_port",
    "query_dns",
    "realm",
    "server",
    "server_context",
    "verbose",
];

fn computed(target: TargetType, producer: fn() -> Value) -> LazyValue {
    LazyValue::new(target, producer)
}

fn basedn_for(domain: &str) -> String {
    domain
        .split('.')
        .map(|part| format!("dc={part}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Bind the default catalog into `env`.
///
/// Every default is a deferred value with a declared type, so sources merged
/// afterwards can replace any of them once (see [`Env::bind`]). Fails with
/// `AlreadyBound`, before binding anything, if a catalog name is already
/// bound, and with `AlreadyLocked` on a locked environment.
///
/// `realm` and `basedn` are derived from [`DEFAULT_DOMAIN`], not from the
/// bound `domain`: overriding `domain` leaves them at `EXAMPLE.COM` and
/// `dc=example,dc=com` unless they are overridden too.
pub fn populate_defaults(env: &mut Env) -> Result<()> {
    let catalog: Vec<(&str, Entry)> = vec![
        (
            "basedn",
            computed(TargetType::Str, || Value::Str(basedn_for(DEFAULT_DOMAIN))).into(),
        ),
        (
            "container_accounts",
            LazyValue::fixed(TargetType::Str, "cn=accounts")?.into(),
        ),
        (
            "container_user",
            LazyValue::fixed(TargetType::Str, "cn=users,cn=accounts")?.into(),
        ),
        (
            "container_group",
            LazyValue::fixed(TargetType::Str, "cn=groups,cn=accounts")?.into(),
        ),
        (
            "domain",
            computed(TargetType::Str, || Value::from(DEFAULT_DOMAIN)).into(),
        ),
        (
            "realm",
            computed(TargetType::Str, || {
                Value::Str(DEFAULT_DOMAIN.to_ascii_uppercase())
            })
            .into(),
        ),
        ("interactive", LazyValue::fixed(TargetType::Bool, true)?.into()),
        (
            "query_dns",
            computed(TargetType::Bool, || Value::Bool(true)).into(),
        ),
        ("server_context", LazyValue::fixed(TargetType::Bool, true)?.into()),
        ("verbose", LazyValue::fixed(TargetType::Bool, false)?.into()),
        ("ldap_host", LazyValue::fixed(TargetType::Str, "localhost")?.into()),
        ("ldap_port", LazyValue::fixed(TargetType::Int, DEFAULT_LDAP_PORT)?.into()),
        (
            "server",
            LazyIter::new(TargetType::Str, || {
                [Value::from("first"), Value::from("second")]
            })
            .into(),
        ),
    ];
    if !env.is_locked() {
        if let Some((name, entry)) = catalog.iter().find(|(name, _)| env.contains(name)) {
            return Err(EnvError::AlreadyBound {
                kind: env.kind(),
                name: name.to_string(),
                value: entry.to_string(),
            });
        }
    }
    for (name, entry) in catalog {
        env.bind(name, entry)?;
    }
    tracing::debug!(count = DEFAULT_NAMES.len(), "default environment populated");
    Ok(())
}

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;
