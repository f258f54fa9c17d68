//! # service-model
//!
//! In-memory model of a service contract: interfaces, operations, messages,
//! bindings, endpoints and schemas, shared read-mostly between threads.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! util      → Wrapper-element dispatch lookup, model visitor
//!   ↓
//! model     → Service graph, property store, derived indexes
//!   ↓
//! base      → Primitives (QName, naming constants)
//! ```
//!
//! ## Example
//!
//! ```
//! use svcmodel::{BindingInfo, MessageDirection, QName, ServiceInfo};
//!
//! let service = ServiceInfo::new(QName::new("urn:greeter", "SOAPService"));
//! let interface = service.create_interface(QName::new("urn:greeter", "Greeter"));
//! let op = interface.add_operation(QName::new("urn:greeter", "sayHi")).unwrap();
//! let input = op.create_message(QName::new("urn:greeter", "sayHiRequest"), MessageDirection::Input);
//! op.set_input(None, Some(input));
//!
//! let binding = BindingInfo::new(&service, "http://schemas.xmlsoap.org/wsdl/soap/", QName::new("urn:greeter", "GreeterBinding"));
//! let bop = binding.build_operation(op.name(), None, None).unwrap();
//! binding.add_operation(bop).unwrap();
//! service.add_binding(binding);
//!
//! assert!(op.is_one_way());
//! assert_eq!(service.messages().len(), 1);
//! ```

// ============================================================================
// MODULES (dependency order: base → model → util)
// ============================================================================

/// Foundation types: QName, naming constants
pub mod base;

/// The service graph and its shared property store
pub mod model;

/// Lookups and traversal over a built model
pub mod util;

// Re-export foundation types
pub use base::QName;

// Re-export the model
pub use model::{
    BindingFaultInfo, BindingInfo, BindingMessageInfo, BindingOperationInfo, CompiledSchema,
    DescriptionInfo, EndpointInfo, Extensions, FaultInfo, FormDefault, InterfaceInfo,
    MessageContainer, MessageDirection, MessageIndex, MessageInfo, MessagePartContainer,
    MessagePartInfo, ModelError, OperationInfo, PartOwner, PropertiesHolder, Result,
    SchemaElement, SchemaInfo, ServiceInfo, Value,
};

pub use util::{ServiceModelVisitor, operation_for_wrapper_element, walk};
