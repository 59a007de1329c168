//! The resolving environment: a [`Namespace`] of tagged entries whose reads
//! resolve deferred values.

use std::fmt;

use crate::error::Result;
use crate::lazy::{DeferredValue, LazyIter, LazyValue, Resolved};
use crate::namespace::Namespace;
use crate::value::Value;

type ComputedFn = dyn Fn() -> Value + Send + Sync;

/// One slot of an [`Env`].
pub enum Entry {
    /// Stored verbatim.
    Plain(Value),
    /// Ad hoc callable, invoked on every read. Hidden from
    /// [`Env::field_names`].
    Computed(Box<ComputedFn>),
    Deferred(DeferredValue),
}

impl Entry {
    pub fn computed<F>(producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self::Computed(Box::new(producer))
    }

    /// Whether the entry shows up as a settable field.
    pub fn is_listed(&self) -> bool {
        !matches!(self, Self::Computed(_))
    }

    pub fn resolve(&self) -> Result<Resolved> {
        match self {
            Self::Plain(value) => Ok(Resolved::Value(value.clone())),
            Self::Computed(producer) => Ok(Resolved::Value(producer())),
            Self::Deferred(deferred) => deferred.resolve(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => write!(f, "{value}"),
            Self::Computed(_) => write!(f, "<computed>"),
            Self::Deferred(deferred) => write!(f, "{deferred}"),
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(value) => f.debug_tuple("Plain").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
            Self::Deferred(deferred) => f.debug_tuple("Deferred").field(deferred).finish(),
        }
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Self::Plain(value)
    }
}

impl From<bool> for Entry {
    fn from(b: bool) -> Self {
        Self::Plain(Value::Bool(b))
    }
}

impl From<i64> for Entry {
    fn from(i: i64) -> Self {
        Self::Plain(Value::Int(i))
    }
}

impl From<&str> for Entry {
    fn from(s: &str) -> Self {
        Self::Plain(Value::from(s))
    }
}

impl From<String> for Entry {
    fn from(s: String) -> Self {
        Self::Plain(Value::Str(s))
    }
}

impl From<DeferredValue> for Entry {
    fn from(deferred: DeferredValue) -> Self {
        Self::Deferred(deferred)
    }
}

impl From<LazyValue> for Entry {
    fn from(lazy: LazyValue) -> Self {
        Self::Deferred(DeferredValue::Single(lazy))
    }
}

impl From<LazyIter> for Entry {
    fn from(lazy: LazyIter) -> Self {
        Self::Deferred(DeferredValue::Iter(lazy))
    }
}

/// Process settings assembled once, then locked and read.
///
/// Built with [`Env::new`], filled through [`Env::bind`] and
/// [`Env::bulk_update`], frozen with [`Env::lock`]. Pass it (or an `Arc` of
/// it) to whoever needs it; there is no global instance.
///
/// Writes follow the namespace's write-once rule with one exception: a plain
/// value bound over a deferred default that is not yet settled is coerced
/// and installed into that default with `set_value`, so sources can replace
/// built-in defaults they have never observed.
#[derive(Debug)]
pub struct Env {
    ns: Namespace<Entry>,
}

impl Env {
    pub fn new() -> Self {
        Self {
            ns: Namespace::new("Env"),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.ns.kind()
    }

    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Entry>) -> Result<()> {
        self.bind_entry(name.into(), value.into(), false)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<Entry>) -> Result<()> {
        self.bind(name, value)
    }

    pub fn set_item(&mut self, name: impl Into<String>, value: impl Into<Entry>) -> Result<()> {
        self.bind(name, value)
    }

    /// Bind every pair of `mapping`; see [`Namespace::bulk_update`] for the
    /// strict/quiet conflict rules. Unsettled deferred defaults take the
    /// incoming value in either mode.
    ///
    /// Each name is replaced on its own: defaults derived from another
    /// default (`realm` and `basedn` from the built-in domain) do not follow
    /// an override of that name.
    pub fn bulk_update<I, K, T>(&mut self, mapping: I, quiet: bool) -> Result<()>
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Entry>,
    {
        self.ns.ensure_update_allowed()?;
        for (name, value) in mapping {
            self.bind_entry(name.into(), value.into(), quiet)?;
        }
        Ok(())
    }

    fn bind_entry(&mut self, name: String, entry: Entry, quiet: bool) -> Result<()> {
        if self.ns.is_locked() {
            return self.ns.bind(name, entry);
        }
        let entry = match entry {
            Entry::Plain(value) => match self.override_deferred(&name, value)? {
                Some(value) => Entry::Plain(value),
                None => return Ok(()),
            },
            other => other,
        };
        if quiet && self.ns.contains(&name) {
            tracing::trace!(%name, "skipping already-bound name");
            return Ok(());
        }
        self.ns.bind(name, entry)
    }

    /// Install `value` into an unsettled deferred slot. Hands the value back
    /// when the slot is anything else.
    fn override_deferred(&mut self, name: &str, value: Value) -> Result<Option<Value>> {
        match self.ns.slot_mut(name) {
            Some(Entry::Deferred(deferred)) if !deferred.is_settled() => {
                deferred.set_value(value)?;
                tracing::debug!(name, "deferred default overridden");
                Ok(None)
            }
            _ => Ok(Some(value)),
        }
    }

    /// Key-style read, resolving deferred and computed entries.
    pub fn get(&self, name: &str) -> Result<Resolved> {
        self.ns.get(name)?.resolve()
    }

    /// Attribute-style read, resolving deferred and computed entries.
    pub fn attr(&self, name: &str) -> Result<Resolved> {
        self.ns.attr(name)?.resolve()
    }

    /// Read and collapse into a single value (sequences become lists).
    pub fn value(&self, name: &str) -> Result<Value> {
        self.get(name)?.into_value()
    }

    /// `None` for an unbound name; only resolution can fail.
    pub fn get_opt(&self, name: &str) -> Result<Option<Resolved>> {
        self.ns.get_opt(name).map(Entry::resolve).transpose()
    }

    /// `default` for an unbound name; only resolution can fail.
    pub fn get_or(&self, name: &str, default: Value) -> Result<Resolved> {
        Ok(self
            .get_opt(name)?
            .unwrap_or(Resolved::Value(default)))
    }

    /// The stored slot, unresolved.
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.ns.get_opt(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ns.contains(name)
    }

    pub fn unbind(&mut self, name: &str) -> Result<()> {
        self.ns.unbind(name)
    }

    pub fn lock(&mut self) -> Result<()> {
        self.ns.lock()
    }

    pub fn is_locked(&self) -> bool {
        self.ns.is_locked()
    }

    /// All bound names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.ns.names()
    }

    /// Sorted names of settable fields: everything except computed entries.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.ns
            .iter()
            .filter(|(_, entry)| entry.is_listed())
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> + '_ {
        self.ns.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.ns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ns.is_empty()
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
