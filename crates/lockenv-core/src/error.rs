use crate::value::TargetType;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("locked: cannot set {kind}.{name} to {value}")]
    AlreadyLocked {
        kind: &'static str,
        name: String,
        value: String,
    },

    #[error("locked: cannot update {kind}")]
    UpdateLocked { kind: &'static str },

    #[error("{kind}.lock() already called")]
    LockAlreadyCalled { kind: &'static str },

    #[error("cannot overwrite {kind}.{name} with {value}")]
    AlreadyBound {
        kind: &'static str,
        name: String,
        value: String,
    },

    /// Carries the rendered lookup: `'name'` for key-style reads,
    /// `Kind.name` for attribute-style reads.
    #[error("{0}")]
    NotFound(String),

    #[error("cannot del {kind}.{name}")]
    DeletionUnsupported { kind: &'static str, name: String },

    #[error("cannot coerce {found} to {expected}")]
    TypeCoercion {
        expected: TargetType,
        found: String,
    },
}

impl EnvError {
    /// True for every mutation refused because the namespace is locked,
    /// including a redundant `lock()` call.
    pub fn is_already_locked(&self) -> bool {
        matches!(
            self,
            Self::AlreadyLocked { .. }
                | Self::UpdateLocked { .. }
                | Self::LockAlreadyCalled { .. }
        )
    }

    pub fn is_already_bound(&self) -> bool {
        matches!(self, Self::AlreadyBound { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, EnvError>;
