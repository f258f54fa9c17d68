//! Helpers built on top of the model: dispatch lookup and traversal.

mod visitor;
mod wrapper;

pub use visitor::{ServiceModelVisitor, walk};
pub use wrapper::{operation_for_wrapper_element, wrapper_element};
