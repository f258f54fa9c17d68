//! Namespace-qualified names.

use std::fmt;

use smol_str::SmolStr;

/// A namespace-qualified name.
///
/// Equality and hashing consider both the namespace URI and the local part.
/// Clones are cheap: both halves are `SmolStr`, which stores short strings
/// inline and shares longer ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QName {
    namespace: SmolStr,
    local_part: SmolStr,
}

impl QName {
    /// Create a name in the given namespace.
    pub fn new(namespace: impl Into<SmolStr>, local_part: impl Into<SmolStr>) -> Self {
        Self {
            namespace: namespace.into(),
            local_part: local_part.into(),
        }
    }

    /// Create a name with no namespace.
    pub fn local(local_part: impl Into<SmolStr>) -> Self {
        Self::new(SmolStr::default(), local_part)
    }

    /// Parse Clark notation: `{namespace}local` or a bare `local`.
    ///
    /// Returns `None` for an unterminated `{`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.strip_prefix('{') {
            Some(rest) => {
                let (ns, local) = rest.split_once('}')?;
                Some(Self::new(ns, local))
            }
            None => Some(Self::local(text)),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// A name without a local part stands for an absent name.
    pub fn is_empty(&self) -> bool {
        self.local_part.is_empty()
    }

    /// A name in the same namespace with a different local part.
    pub fn with_local_part(&self, local_part: impl Into<SmolStr>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            local_part: local_part.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.local_part)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local_part)
        }
    }
}

impl From<&str> for QName {
    fn from(s: &str) -> Self {
        Self::local(s)
    }
}

impl From<(&str, &str)> for QName {
    fn from((namespace, local_part): (&str, &str)) -> Self {
        Self::new(namespace, local_part)
    }
}
