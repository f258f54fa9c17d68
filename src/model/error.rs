//! Error types for model construction.

use thiserror::Error;

use crate::base::QName;

/// Errors raised while building or materializing the service model.
///
/// Lookups never produce these: a missing operation, part, binding or schema
/// is reported as `None`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A name with no local part was supplied where one is required.
    #[error("{kind} name cannot be empty")]
    NameRequired { kind: &'static str },

    /// An entity with the same name is already registered on the owner.
    #[error("duplicate {kind} name {name} in {owner}")]
    Duplicate {
        kind: &'static str,
        name: QName,
        owner: QName,
    },

    /// The compiled schema could not be turned into an element.
    #[error("schema error: {0}")]
    Schema(String),
}

impl ModelError {
    /// Create a missing-name error.
    pub fn name_required(kind: &'static str) -> Self {
        Self::NameRequired { kind }
    }

    /// Create a duplicate operation error.
    pub fn duplicate_operation(name: QName, owner: QName) -> Self {
        Self::Duplicate {
            kind: "operation",
            name,
            owner,
        }
    }

    /// Create a duplicate fault error.
    pub fn duplicate_fault(name: QName, owner: QName) -> Self {
        Self::Duplicate {
            kind: "fault",
            name,
            owner,
        }
    }

    /// Create a schema materialization error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Returns true for duplicate-registration errors.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

pub type Result<T, E = ModelError> = std::result::Result<T, E>;

/// Reject names with no local part.
pub(crate) fn require_name(name: &QName, kind: &'static str) -> Result<()> {
    if name.is_empty() {
        return Err(ModelError::name_required(kind));
    }
    Ok(())
}
