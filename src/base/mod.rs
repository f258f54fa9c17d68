//! Foundation types for the service model.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`QName`] - Namespace-qualified names for every contract entity
//! - Domain constants (default message suffixes, well-known namespaces)
//!
//! This module has NO dependencies on other svcmodel modules.

pub mod constants;
mod qname;

pub use qname::QName;

// Re-export the string type used inside names for convenience
pub use smol_str::SmolStr;
