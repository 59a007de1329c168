//! Write-once, lockable name → value store.
//!
//! Names can be bound once and never removed. After [`Namespace::lock`] the
//! store is read-only for the rest of its life. Attribute-style
//! ([`Namespace::attr`], [`Namespace::set_attr`]) and key-style
//! ([`Namespace::get`], [`Namespace::set_item`], `ns["name"]`) access go
//! through the same map and only differ in how a missing name is reported.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::ops::Index;

use crate::error::{EnvError, Result};

pub struct Namespace<V> {
    kind: &'static str,
    entries: BTreeMap<String, V>,
    locked: bool,
}

impl<V> Namespace<V> {
    /// Create an empty, unlocked namespace. `kind` labels it in error
    /// messages (`"cannot overwrite Env.realm ..."`).
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
            locked: false,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Key-style read. A missing name is reported as `'name'`.
    pub fn get(&self, name: &str) -> Result<&V> {
        self.entries
            .get(name)
            .ok_or_else(|| EnvError::NotFound(format!("'{name}'")))
    }

    /// Attribute-style read. A missing name is reported as `Kind.name`.
    pub fn attr(&self, name: &str) -> Result<&V> {
        self.entries
            .get(name)
            .ok_or_else(|| EnvError::NotFound(format!("{}.{name}", self.kind)))
    }

    pub fn get_opt(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    pub fn get_or<'a>(&'a self, name: &str, default: &'a V) -> &'a V {
        self.entries.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Deletion is never supported, bound or not, locked or not.
    pub fn unbind(&mut self, name: &str) -> Result<()> {
        Err(EnvError::DeletionUnsupported {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    /// Freeze the namespace. Only the first call succeeds.
    pub fn lock(&mut self) -> Result<()> {
        if self.locked {
            return Err(EnvError::LockAlreadyCalled { kind: self.kind });
        }
        self.locked = true;
        tracing::debug!(kind = self.kind, entries = self.entries.len(), "namespace locked");
        Ok(())
    }

    /// Bound names in sorted order. Call again to restart.
    pub fn names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, V> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mutable access to a bound slot for in-place overrides. Refuses once
    /// locked.
    pub(crate) fn slot_mut(&mut self, name: &str) -> Option<&mut V> {
        if self.locked {
            return None;
        }
        self.entries.get_mut(name)
    }

    pub(crate) fn ensure_update_allowed(&self) -> Result<()> {
        if self.locked {
            return Err(EnvError::UpdateLocked { kind: self.kind });
        }
        Ok(())
    }
}

impl<V: fmt::Display> Namespace<V> {
    /// Bind `name` to `value`.
    ///
    /// Fails with [`EnvError::AlreadyLocked`] once locked and with
    /// [`EnvError::AlreadyBound`] if the name already holds a value; in both
    /// cases the namespace is unchanged.
    pub fn bind(&mut self, name: impl Into<String>, value: V) -> Result<()> {
        let name = name.into();
        if self.locked {
            return Err(EnvError::AlreadyLocked {
                kind: self.kind,
                name,
                value: value.to_string(),
            });
        }
        match self.entries.entry(name) {
            btree_map::Entry::Occupied(occupied) => Err(EnvError::AlreadyBound {
                kind: self.kind,
                name: occupied.key().clone(),
                value: value.to_string(),
            }),
            btree_map::Entry::Vacant(vacant) => {
                vacant.insert(value);
                Ok(())
            }
        }
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: V) -> Result<()> {
        self.bind(name, value)
    }

    pub fn set_item(&mut self, name: impl Into<String>, value: V) -> Result<()> {
        self.bind(name, value)
    }

    /// Bind every pair of `mapping`.
    ///
    /// A bound name fails the whole call at that point unless `quiet`, in
    /// which case it is skipped. Pairs applied before a failure stay
    /// applied. A locked namespace fails before any pair is looked at.
    pub fn bulk_update<I, K>(&mut self, mapping: I, quiet: bool) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        self.ensure_update_allowed()?;
        for (name, value) in mapping {
            let name = name.into();
            if quiet && self.contains(&name) {
                tracing::trace!(kind = self.kind, %name, "skipping already-bound name");
                continue;
            }
            self.bind(name, value)?;
        }
        Ok(())
    }
}

impl<V> Default for Namespace<V> {
    fn default() -> Self {
        Self::new("Namespace")
    }
}

impl<V> Index<&str> for Namespace<V> {
    type Output = V;

    fn index(&self, name: &str) -> &V {
        match self.entries.get(name) {
            Some(value) => value,
            None => panic!("{} has no entry '{name}'", self.kind),
        }
    }
}

impl<'a, V> IntoIterator for &'a Namespace<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = btree_map::Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<V: fmt::Debug> fmt::Debug for Namespace<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("kind", &self.kind)
            .field("locked", &self.locked)
            .field("entries", &self.entries)
            .finish()
    }
}

#[cfg(test)]
#[path = "namespace_tests.rs"]
mod tests;
