//! Deferred values: defaults that are computed, coerced or enumerated only
//! when somebody reads them.
//!
//! [`DeferredValue`] is a closed set of two wrappers:
//! - [`LazyValue`] computes a single value once and caches it;
//! - [`LazyIter`] hands out a fresh [`LazySeq`] per read, pulling elements
//!   from its producer only as the consumer advances.
//!
//! A wrapper is *settled* once it has been resolved or overridden with
//! `set_value`. Until then an environment treats the slot as open for one
//! override (see [`crate::Env::bind`]).

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::error::Result;
use crate::value::{TargetType, Value};

type ValueFn = dyn Fn() -> Value + Send + Sync;
type ElemIter = Box<dyn Iterator<Item = Value> + Send>;
type SeqFn = dyn Fn() -> ElemIter + Send + Sync;

enum Origin {
    Producer(Box<ValueFn>),
    Fixed(Value),
}

/// A single deferred value of a declared type.
pub struct LazyValue {
    target: TargetType,
    origin: Origin,
    initial: Option<Value>,
    cached: OnceLock<Value>,
}

impl LazyValue {
    pub fn new<F>(target: TargetType, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            target,
            origin: Origin::Producer(Box::new(producer)),
            initial: None,
            cached: OnceLock::new(),
        }
    }

    /// A deferred value with no producer: `value`, coerced now, is what it
    /// resolves to until overridden.
    pub fn fixed(target: TargetType, value: impl Into<Value>) -> Result<Self> {
        let value = target.coerce(value.into())?;
        Ok(Self {
            target,
            origin: Origin::Fixed(value),
            initial: None,
            cached: OnceLock::new(),
        })
    }

    /// Supply a value returned in place of the producer's until overridden.
    pub fn with_initial(mut self, initial: impl Into<Value>) -> Result<Self> {
        self.initial = Some(self.target.coerce(initial.into())?);
        Ok(self)
    }

    pub fn target(&self) -> &TargetType {
        &self.target
    }

    /// Return the cached value, the initial value, or the producer's coerced
    /// result (the fixed value for [`LazyValue::fixed`]), in that order. The producer runs at most once per successful
    /// resolution; a coercion failure is returned and nothing is cached.
    pub fn resolve(&self) -> Result<Value> {
        if let Some(value) = self.cached.get() {
            return Ok(value.clone());
        }
        let value = match &self.initial {
            Some(initial) => initial.clone(),
            None => match &self.origin {
                Origin::Producer(producer) => self.target.coerce(producer())?,
                Origin::Fixed(value) => value.clone(),
            },
        };
        Ok(self.cached.get_or_init(|| value).clone())
    }

    /// Coerce `value` and make it the result of every later resolution.
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        let value = self.target.coerce(value)?;
        self.cached = OnceLock::from(value);
        Ok(())
    }

    pub fn is_settled(&self) -> bool {
        self.cached.get().is_some()
    }
}

impl fmt::Debug for LazyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyValue")
            .field("target", &self.target)
            .field(
                "fixed",
                &match &self.origin {
                    Origin::Fixed(value) => Some(value),
                    Origin::Producer(_) => None,
                },
            )
            .field("initial", &self.initial)
            .field("cached", &self.cached.get())
            .finish()
    }
}

/// A deferred sequence whose elements share one declared type.
pub struct LazyIter {
    target: TargetType,
    producer: Arc<SeqFn>,
    initial: Option<Value>,
    replaced: Option<Vec<Value>>,
    observed: AtomicBool,
}

impl LazyIter {
    /// `target` is the element type; `producer` is called once per
    /// [`LazySeq`], on its first advance past the initial value.
    pub fn new<F, I>(target: TargetType, producer: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        let producer: Arc<SeqFn> = Arc::new(move || Box::new(producer().into_iter()) as ElemIter);
        Self {
            target,
            producer,
            initial: None,
            replaced: None,
            observed: AtomicBool::new(false),
        }
    }

    /// Supply an element yielded before the producer's own elements.
    pub fn with_initial(mut self, initial: impl Into<Value>) -> Result<Self> {
        self.initial = Some(self.target.coerce(initial.into())?);
        Ok(self)
    }

    pub fn target(&self) -> &TargetType {
        &self.target
    }

    /// Hand out a fresh lazy sequence. Nothing is produced until the caller
    /// advances it.
    pub fn resolve(&self) -> LazySeq {
        self.observed.store(true, Ordering::Relaxed);
        let state = match &self.replaced {
            Some(items) => SeqState::Fixed(items.clone().into_iter()),
            None => SeqState::Pending(Arc::clone(&self.producer)),
        };
        LazySeq {
            target: self.target.clone(),
            head: if self.replaced.is_some() {
                None
            } else {
                self.initial.clone()
            },
            state,
        }
    }

    /// Replace the whole sequence. A list becomes the sequence; a scalar
    /// becomes a one-element sequence. Elements are coerced up front.
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        let items = match TargetType::list_of(self.target.clone()).coerce(value)? {
            Value::List(items) => items,
            other => vec![other],
        };
        self.replaced = Some(items);
        Ok(())
    }

    pub fn is_settled(&self) -> bool {
        self.replaced.is_some() || self.observed.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for LazyIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyIter")
            .field("target", &self.target)
            .field("initial", &self.initial)
            .field("replaced", &self.replaced)
            .finish()
    }
}

enum SeqState {
    Pending(Arc<SeqFn>),
    Running(ElemIter),
    Fixed(std::vec::IntoIter<Value>),
    Done,
}

/// On-demand sequence returned by [`LazyIter::resolve`].
///
/// Yields `Some(Ok(value))` per element, `Some(Err(_))` for an element that
/// fails coercion, and `None` once exhausted.
pub struct LazySeq {
    target: TargetType,
    head: Option<Value>,
    state: SeqState,
}

impl Iterator for LazySeq {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(head) = self.head.take() {
            return Some(Ok(head));
        }
        loop {
            match &mut self.state {
                SeqState::Pending(producer) => {
                    let iter = (**producer)();
                    self.state = SeqState::Running(iter);
                }
                SeqState::Running(iter) => match iter.next() {
                    Some(raw) => return Some(self.target.coerce(raw)),
                    None => {
                        self.state = SeqState::Done;
                        return None;
                    }
                },
                SeqState::Fixed(items) => return items.next().map(Ok),
                SeqState::Done => return None,
            }
        }
    }
}

impl fmt::Debug for LazySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            SeqState::Pending(_) => "pending",
            SeqState::Running(_) => "running",
            SeqState::Fixed(_) => "fixed",
            SeqState::Done => "done",
        };
        f.debug_struct("LazySeq")
            .field("target", &self.target)
            .field("head", &self.head)
            .field("state", &state)
            .finish()
    }
}

/// A value whose computation is deferred until read.
#[derive(Debug)]
pub enum DeferredValue {
    Single(LazyValue),
    Iter(LazyIter),
}

impl DeferredValue {
    pub fn resolve(&self) -> Result<Resolved> {
        match self {
            Self::Single(lazy) => lazy.resolve().map(Resolved::Value),
            Self::Iter(lazy) => Ok(Resolved::Seq(lazy.resolve())),
        }
    }

    pub fn set_value(&mut self, value: Value) -> Result<()> {
        match self {
            Self::Single(lazy) => lazy.set_value(value),
            Self::Iter(lazy) => lazy.set_value(value),
        }
    }

    pub fn is_settled(&self) -> bool {
        match self {
            Self::Single(lazy) => lazy.is_settled(),
            Self::Iter(lazy) => lazy.is_settled(),
        }
    }
}

impl fmt::Display for DeferredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(lazy) => write!(f, "<deferred {}>", lazy.target()),
            Self::Iter(lazy) => write!(f, "<deferred iter {}>", lazy.target()),
        }
    }
}

impl From<LazyValue> for DeferredValue {
    fn from(lazy: LazyValue) -> Self {
        Self::Single(lazy)
    }
}

impl From<LazyIter> for DeferredValue {
    fn from(lazy: LazyIter) -> Self {
        Self::Iter(lazy)
    }
}

/// What a read of an environment entry produces.
#[derive(Debug)]
pub enum Resolved {
    Value(Value),
    Seq(LazySeq),
}

impl Resolved {
    /// Collapse into a single value, draining a sequence into a list.
    pub fn into_value(self) -> Result<Value> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Seq(seq) => seq.collect::<Result<Vec<_>>>().map(Value::List),
        }
    }

    pub fn into_seq(self) -> Option<LazySeq> {
        match self {
            Self::Seq(seq) => Some(seq),
            Self::Value(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "lazy_tests.rs"]
mod tests;
