//! Write-once, lockable settings environment with deferred defaults.

pub mod defaults;
pub mod env;
pub mod error;
pub mod lazy;
pub mod namespace;
pub mod value;

pub use defaults::{DEFAULT_NAMES, populate_defaults};
pub use env::{Entry, Env};
pub use error::{EnvError, Result};
pub use lazy::{DeferredValue, LazyIter, LazySeq, LazyValue, Resolved};
pub use namespace::Namespace;
pub use value::{TargetType, Value};
